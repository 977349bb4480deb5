//! Configuration Module
//!
//! Loads configuration from defaults, an optional TOML file and the
//! environment.

pub mod loader;

pub use loader::{
    load_config, should_load_dotenv, usable_bearer, Config, ConfigError, BEARER_PLACEHOLDER,
};
