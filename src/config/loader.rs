//! Configuration Loader
//!
//! Builds the server configuration from defaults, an optional TOML file and
//! environment overrides, then validates it.

use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Marker left in unconfigured bearer values
pub const BEARER_PLACEHOLDER: &str = "<YOUR-BEARER-HERE>";

/// Treasury receiving launch fees unless `LIME_TREASURY` overrides it
pub const DEFAULT_TREASURY: &str = "4zhqLxD1ZcE1T96a6BGXvqbY5ZLpagwwEqbanb8vWbp";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerSection,
    pub upstream: UpstreamSection,
    pub launchpad: LaunchpadSection,
    pub solana: SolanaSection,
    pub launch: LaunchSection,
    pub storage: StorageSection,
    pub logging: LoggingSection,
}

/// HTTP listener and static files
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub port: u16,
    /// Directory served for unmatched paths
    pub public_dir: String,
    /// Origins allowed in addition to the built-in list
    pub extra_origins: Vec<String>,
    /// Public URL of the deployment (`RENDER_EXTERNAL_URL`)
    pub external_url: Option<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: 3000,
            public_dir: "public".to_string(),
            extra_origins: Vec::new(),
            external_url: None,
        }
    }
}

/// Proxied read API
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamSection {
    pub api_url: String,
    /// Full Authorization value (`Bearer ...`) for authed proxy routes
    pub bearer: Option<String>,
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            api_url: crate::adapters::proxy::DEFAULT_UPSTREAM_API.to_string(),
            bearer: None,
        }
    }
}

/// Token-launch API used for metadata, configs, launches and claims
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LaunchpadSection {
    pub api_url: String,
    pub api_key: Option<String>,
}

impl Default for LaunchpadSection {
    fn default() -> Self {
        Self {
            api_url: crate::adapters::bags::DEFAULT_LAUNCHPAD_API.to_string(),
            api_key: None,
        }
    }
}

/// Solana RPC configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SolanaSection {
    pub rpc_url: String,
    /// Commitment level: "processed", "confirmed", "finalized"
    pub commitment: String,
}

impl Default for SolanaSection {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
            commitment: "processed".to_string(),
        }
    }
}

/// Launch flow settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LaunchSection {
    pub treasury: String,
    /// Pre-created treasury config; invalid keys are dropped on load
    pub treasury_config_key: Option<String>,
    /// "off", "auto" or "suffix:<text>"
    pub vanity_mode: String,
    /// Vanity search budget; `None` only after an unparseable override
    pub vanity_max_ms: Option<u64>,
}

impl Default for LaunchSection {
    fn default() -> Self {
        Self {
            treasury: DEFAULT_TREASURY.to_string(),
            treasury_config_key: None,
            vanity_mode: "off".to_string(),
            vanity_max_ms: Some(0),
        }
    }
}

impl LaunchSection {
    pub fn treasury_pubkey(&self) -> Option<Pubkey> {
        Pubkey::from_str(&self.treasury).ok()
    }

    pub fn treasury_config_pubkey(&self) -> Option<Pubkey> {
        self.treasury_config_key
            .as_deref()
            .and_then(|k| Pubkey::from_str(k).ok())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Directory holding `launched.json`; `~` is expanded
    pub data_dir: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
        }
    }
}

impl StorageSection {
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.data_dir).to_string())
    }
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration: file (if given), then process environment, then validate
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => Config::default(),
    };
    config.apply_env(|key| std::env::var(key).ok());
    config.normalize();
    config.validate()?;
    Ok(config)
}

/// Whether `.env` should be read: not on Render and not in production
pub fn should_load_dotenv<F>(env: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    let set = |key: &str| env(key).is_some_and(|v| !v.is_empty());
    let on_render = set("RENDER") || set("RENDER_EXTERNAL_URL");
    let production = env("NODE_ENV").as_deref() == Some("production");
    !on_render && !production
}

/// Usable bearer value, or None for empty and placeholder values
pub fn usable_bearer(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|b| !b.is_empty() && !b.contains(BEARER_PLACEHOLDER))
        .map(str::to_string)
}

impl Config {
    /// Apply environment overrides read through `env`
    pub fn apply_env<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| env(key).filter(|v| !v.is_empty());

        if let Some(port) = get("PORT") {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT {:?}", port),
            }
        }
        if let Some(url) = get("RENDER_EXTERNAL_URL") {
            self.server.external_url = Some(url);
        }
        if let Some(key) = get("BAGS_API_KEY") {
            self.launchpad.api_key = Some(key);
        }
        if let Some(bearer) = get("BAGS_BEARER") {
            self.upstream.bearer = Some(bearer);
        }
        if let Some(url) = get("SOLANA_RPC_URL") {
            self.solana.rpc_url = url;
        }
        if let Some(treasury) = get("LIME_TREASURY") {
            self.launch.treasury = treasury;
        }
        if let Some(key) = get("BAGS_TREASURY_CONFIG_KEY") {
            self.launch.treasury_config_key = Some(key);
        }
        if let Some(mode) = get("BAGS_VANITY_MODE") {
            self.launch.vanity_mode = mode;
        }
        if let Some(max_ms) = get("BAGS_VANITY_MAX_MS") {
            match max_ms.trim().parse() {
                Ok(ms) => self.launch.vanity_max_ms = Some(ms),
                Err(_) => {
                    tracing::warn!("Invalid BAGS_VANITY_MAX_MS {:?}, using the default budget", max_ms);
                    self.launch.vanity_max_ms = None;
                }
            }
        }
    }

    /// Drop unusable optional values and canonicalize modes
    pub fn normalize(&mut self) {
        self.upstream.bearer = usable_bearer(self.upstream.bearer.as_deref());
        self.launchpad.api_key = self
            .launchpad
            .api_key
            .take()
            .filter(|k| !k.trim().is_empty());
        self.launch.vanity_mode = crate::domain::vanity::normalize_mode(&self.launch.vanity_mode);

        if let Some(key) = self.launch.treasury_config_key.take() {
            if Pubkey::from_str(&key).is_ok() {
                self.launch.treasury_config_key = Some(key);
            } else {
                tracing::warn!("Ignoring invalid treasury config key {:?}", key);
            }
        }
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.launch.treasury_pubkey().is_none() {
            return Err(ConfigError::ValidationError(format!(
                "treasury must be a base58 address, got {:?}",
                self.launch.treasury
            )));
        }

        for (name, url) in [
            ("upstream.api_url", &self.upstream.api_url),
            ("launchpad.api_url", &self.launchpad.api_url),
            ("solana.rpc_url", &self.solana.rpc_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be an http(s) URL, got {:?}",
                    name, url
                )));
            }
        }

        if !matches!(self.solana.commitment.as_str(), "processed" | "confirmed" | "finalized") {
            return Err(ConfigError::ValidationError(format!(
                "commitment must be processed, confirmed or finalized, got {:?}",
                self.solana.commitment
            )));
        }

        if self.server.public_dir.is_empty() {
            return Err(ConfigError::ValidationError(
                "public_dir cannot be empty".to_string(),
            ));
        }

        if self.storage.data_dir.is_empty() {
            return Err(ConfigError::ValidationError(
                "data_dir cannot be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Origins allowed to make cross-origin requests
    pub fn allowed_origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = [
            "https://limescope.fun",
            "https://www.limescope.fun",
            "https://sagb.xyz",
            "https://www.sagb.xyz",
            "http://localhost:3000",
            "http://127.0.0.1:3000",
        ]
        .iter()
        .map(|o| o.to_string())
        .collect();

        origins.extend(self.server.external_url.iter().cloned());
        origins.extend(self.server.extra_origins.iter().cloned());
        origins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::domain::VanityHint;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn with_env(pairs: &[(&str, &str)]) -> Config {
        let mut config = Config::default();
        config.apply_env(env_of(pairs));
        config.normalize();
        config
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.public_dir, "public");
        assert_eq!(config.launch.vanity_mode, "off");
        assert_eq!(config.solana.commitment, "processed");
        assert_eq!(config.upstream.api_url, "https://api2.bags.fm/api/v1");
        assert!(config.launchpad.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            br#"
[server]
port = 8080
extra_origins = ["https://preview.limescope.fun"]

[storage]
data_dir = "/tmp/limescope"

[logging]
level = "debug"
"#,
        )
        .unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        let config: Config = toml::from_str(&content).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.public_dir, "public");
        assert_eq!(config.storage.data_path(), PathBuf::from("/tmp/limescope"));
        assert_eq!(config.logging.level, "debug");
        assert!(config
            .allowed_origins()
            .contains(&"https://preview.limescope.fun".to_string()));
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_config(Some(Path::new("/nonexistent/path/config.toml")));
        assert!(matches!(result.unwrap_err(), ConfigError::IoError(_)));
    }

    #[test]
    fn test_load_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[server\nport = ").unwrap();
        let result = load_config(Some(file.path()));
        assert!(matches!(result.unwrap_err(), ConfigError::ParseError(_)));
    }

    #[test]
    fn test_env_overrides() {
        let config = with_env(&[
            ("PORT", "4000"),
            ("BAGS_API_KEY", "key"),
            ("BAGS_BEARER", "Bearer abc"),
            ("SOLANA_RPC_URL", "http://localhost:8899"),
            ("BAGS_VANITY_MODE", "  Suffix:LIME "),
            ("BAGS_VANITY_MAX_MS", "2500"),
            ("RENDER_EXTERNAL_URL", "https://limescope.onrender.com"),
        ]);

        assert_eq!(config.server.port, 4000);
        assert_eq!(config.launchpad.api_key.as_deref(), Some("key"));
        assert_eq!(config.upstream.bearer.as_deref(), Some("Bearer abc"));
        assert_eq!(config.solana.rpc_url, "http://localhost:8899");
        assert_eq!(config.launch.vanity_mode, "suffix:lime");
        assert_eq!(config.launch.vanity_max_ms, Some(2500));
        assert!(config
            .allowed_origins()
            .contains(&"https://limescope.onrender.com".to_string()));
    }

    #[test]
    fn test_placeholder_bearer_is_unset() {
        let config = with_env(&[("BAGS_BEARER", "Bearer <YOUR-BEARER-HERE>")]);
        assert!(config.upstream.bearer.is_none());
        assert_eq!(usable_bearer(Some("   ")), None);
    }

    #[test]
    fn test_invalid_treasury_config_key_dropped() {
        let config = with_env(&[("BAGS_TREASURY_CONFIG_KEY", "not-a-key")]);
        assert!(config.launch.treasury_config_key.is_none());

        let key = Pubkey::new_unique().to_string();
        let config = with_env(&[("BAGS_TREASURY_CONFIG_KEY", &key)]);
        assert_eq!(
            config.launch.treasury_config_pubkey().map(|k| k.to_string()),
            Some(key)
        );
    }

    #[test]
    fn test_invalid_treasury_rejected() {
        let config = with_env(&[("LIME_TREASURY", "nope")]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_invalid_numbers_ignored() {
        let config = with_env(&[("PORT", "eighty"), ("BAGS_VANITY_MAX_MS", "-1")]);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.launch.vanity_max_ms, None);
    }

    #[test]
    fn test_vanity_budget_defaults_to_zero() {
        let config = with_env(&[("BAGS_VANITY_MODE", "suffix:lime")]);
        assert_eq!(config.launch.vanity_max_ms, Some(0));

        let hint = VanityHint::from_mode(&config.launch.vanity_mode, config.launch.vanity_max_ms);
        assert_eq!(hint.map(|h| h.max_millis()), Some(0));
    }

    #[test]
    fn test_bad_commitment_rejected() {
        let mut config = Config::default();
        config.solana.commitment = "eventually".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_dotenv_rule() {
        assert!(should_load_dotenv(env_of(&[])));
        assert!(!should_load_dotenv(env_of(&[("RENDER", "true")])));
        assert!(!should_load_dotenv(env_of(&[("RENDER_EXTERNAL_URL", "https://x.onrender.com")])));
        assert!(!should_load_dotenv(env_of(&[("NODE_ENV", "production")])));
        assert!(should_load_dotenv(env_of(&[("NODE_ENV", "development")])));
    }
}
