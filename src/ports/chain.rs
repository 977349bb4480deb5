//! Chain Port
//!
//! The one piece of chain state transaction assembly needs: a recent blockhash.

use async_trait::async_trait;
use solana_sdk::hash::Hash;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChainError {
    #[error("RPC request failed: {0}")]
    RpcError(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlockhashPort: Send + Sync {
    async fn get_latest_blockhash(&self) -> Result<Hash, ChainError>;
}
