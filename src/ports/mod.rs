//! Ports Layer - Trait definitions for external dependencies
//!
//! This module defines the interfaces (ports) that adapters must implement.
//! Following hexagonal architecture, these traits abstract:
//! - The token-launch platform SDK (metadata, config, launch, fee claims)
//! - Chain state (recent blockhash)
//! - Remote asset fetches (token images, logos)

pub mod launchpad;
pub mod chain;
pub mod assets;
#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use launchpad::{
    ImageUpload, LaunchTransactionParams, LaunchpadError, LaunchpadPort, TokenInfo,
    TokenMetadataRequest, WalletConfig,
};
pub use chain::{BlockhashPort, ChainError};
pub use assets::{AssetError, AssetPort, FetchedAsset};
