//! Adapters Layer - External System Implementations
//!
//! This module contains implementations of the port traits and the outer
//! surfaces:
//! - Bags: token-launch REST API client
//! - Solana: RPC blockhash source
//! - Proxy: upstream GET passthrough and asset fetches
//! - HTTP: axum server
//! - CLI: Command-line interface handlers

pub mod bags;
pub mod solana;
pub mod proxy;
pub mod http;
pub mod cli;

pub use bags::BagsClient;
pub use solana::SolanaClient;
pub use proxy::{ProxyForwarder, UpstreamApi};
pub use http::{create_app, AppState};
pub use cli::CliApp;
