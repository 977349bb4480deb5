//! CLI Command Handlers
//!
//! Implementation of the LimeScope proxy commands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::bags::{BagsClient, BagsConfig};
use crate::adapters::http::{self, AppState, CorsPolicy, HealthInfo};
use crate::adapters::proxy::{ProxyForwarder, UpstreamApi};
use crate::adapters::solana::SolanaClient;
use crate::application::{FeeClaimService, LaunchOrchestrator, LaunchSettings, TransactionFinalizer};
use crate::config::{load_config, Config};
use crate::domain::launch_ledger::{clamp_page, clamp_page_size};
use crate::domain::LaunchLedger;

/// LimeScope - launchpad proxy and unsigned transaction builder
#[derive(Parser, Debug)]
#[command(
    name = "limescope-proxy",
    version = env!("CARGO_PKG_VERSION"),
    about = "Backend-for-frontend for the LimeScope token launch site",
    long_about = "Proxies launchpad API reads, keeps a local list of launched tokens and \
                  assembles unsigned Solana transactions for client wallets to sign."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeCmd),

    /// Print a page of the launch ledger as JSON
    Launched(LaunchedCmd),
}

/// Run the HTTP server
#[derive(Parser, Debug)]
pub struct ServeCmd {
    /// Path to configuration file (environment variables still apply)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override listen port
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,
}

/// Inspect the launch ledger
#[derive(Parser, Debug)]
pub struct LaunchedCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Page number (1-based)
    #[arg(long, value_name = "N", default_value = "1")]
    pub page: i64,

    /// Records per page (max 50)
    #[arg(long, value_name = "N", default_value = "10")]
    pub page_size: i64,
}

impl Command {
    fn config_path(&self) -> Option<&PathBuf> {
        match self {
            Command::Serve(cmd) => cmd.config.as_ref(),
            Command::Launched(cmd) => cmd.config.as_ref(),
        }
    }
}

/// Execute the parsed command
pub async fn execute(app: CliApp) -> Result<()> {
    let config = load_config(app.command.config_path().map(PathBuf::as_path))
        .context("Failed to load configuration")?;
    init_logging(app.verbose, app.debug, &config.logging.level)?;

    match app.command {
        Command::Serve(cmd) => serve_command(cmd, config).await,
        Command::Launched(cmd) => launched_command(cmd, config),
    }
}

/// Initialize logging system
///
/// Flags win over `RUST_LOG`, which wins over the configured level.
fn init_logging(verbose: bool, debug: bool, configured: &str) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(configured))
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Wire long-lived clients into handler state
pub fn build_state(config: &Config) -> Result<AppState> {
    let proxy = Arc::new(
        ProxyForwarder::new(config.upstream.bearer.clone())
            .context("Failed to create proxy client")?,
    );
    let upstream = UpstreamApi::new(&config.upstream.api_url)
        .context("Invalid upstream API url")?;

    let launchpad = Arc::new(
        BagsClient::with_config(BagsConfig {
            api_base_url: config.launchpad.api_url.clone(),
            api_key: config.launchpad.api_key.clone(),
        })
        .context("Failed to create launchpad client")?,
    );
    let solana = SolanaClient::with_commitment_name(
        config.solana.rpc_url.clone(),
        &config.solana.commitment,
    )
    .context("Failed to create Solana client")?;
    let finalizer = TransactionFinalizer::new(Arc::new(solana));

    let launch = LaunchOrchestrator::new(
        launchpad.clone(),
        proxy.clone(),
        finalizer.clone(),
        LaunchSettings {
            vanity_mode: config.launch.vanity_mode.clone(),
            vanity_max_ms: config.launch.vanity_max_ms,
        },
    );
    let fees = FeeClaimService::new(launchpad, finalizer);
    let ledger = LaunchLedger::new(config.storage.data_path());

    Ok(AppState {
        proxy: proxy.clone(),
        upstream: Arc::new(upstream),
        assets: proxy,
        launch: Arc::new(launch),
        fees: Arc::new(fees),
        ledger: Arc::new(ledger),
        cors: Arc::new(CorsPolicy::new(config.allowed_origins())),
        public_dir: PathBuf::from(shellexpand::tilde(&config.server.public_dir).to_string()),
        health: HealthInfo {
            vanity_mode: config.launch.vanity_mode.clone(),
            vanity_max_ms: config.launch.vanity_max_ms.unwrap_or(0),
            treasury: config.launch.treasury.clone(),
            treasury_config_key_set: config.launch.treasury_config_pubkey().is_some(),
        },
    })
}

fn warn_missing_settings(config: &Config) {
    if config.launchpad.api_key.is_none() {
        tracing::warn!("Missing BAGS_API_KEY. Launch/fees endpoints will fail.");
    }
    if config.upstream.bearer.is_none() {
        tracing::warn!("BAGS_BEARER is not set. Auth-only routes may return 401.");
    }
    if config.launch.treasury_config_key.is_none() {
        tracing::warn!(
            "BAGS_TREASURY_CONFIG_KEY not set. The treasury config will be looked up on first launch."
        );
    }
}

/// Handle serve command
async fn serve_command(cmd: ServeCmd, mut config: Config) -> Result<()> {
    if let Some(port) = cmd.port {
        config.server.port = port;
    }

    warn_missing_settings(&config);
    tracing::info!("Upstream API: {}", config.upstream.api_url);
    tracing::info!("Launchpad API: {}", config.launchpad.api_url);
    tracing::info!("Ledger: {}", config.storage.data_path().display());

    let state = build_state(&config)?;
    http::start_server(state, config.server.port).await
}

/// Handle launched command
fn launched_command(cmd: LaunchedCmd, config: Config) -> Result<()> {
    let ledger = LaunchLedger::new(config.storage.data_path());
    let page = ledger.list(clamp_page(Some(cmd.page)), clamp_page_size(Some(cmd.page_size)));

    let output = serde_json::to_string_pretty(&page).context("Failed to encode ledger page")?;
    println!("{}", output);
    Ok(())
}
