//! LimeScope Proxy Library
//!
//! Backend-for-frontend for the LimeScope token launch site: proxies the
//! launchpad API, keeps a local ledger of launched tokens and assembles
//! unsigned Solana transactions for client wallets to sign.
//!
//! # Modules
//!
//! - `domain`: Core types (UnsignedTransaction, FeePosition, LaunchLedger)
//! - `ports`: Trait abstractions (LaunchpadPort, BlockhashPort, AssetPort)
//! - `application`: Use cases (finalizer, launch orchestrator, fee claims)
//! - `adapters`: External implementations (launchpad API, Solana, HTTP, CLI)
//! - `config`: Configuration loading and validation

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod config;
pub mod application;
