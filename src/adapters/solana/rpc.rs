use async_trait::async_trait;
use solana_client::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, hash::Hash};
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::ports::{BlockhashPort, ChainError};

#[derive(Debug, Error)]
pub enum SolanaClientError {
    #[error("RPC request failed: {0}")]
    RpcError(String),
    #[error("Invalid commitment level: {0}")]
    InvalidCommitment(String),
}

impl From<SolanaClientError> for ChainError {
    fn from(err: SolanaClientError) -> Self {
        match err {
            SolanaClientError::RpcError(msg) => ChainError::RpcError(msg),
            other => ChainError::RpcError(other.to_string()),
        }
    }
}

/// Wrapper around Solana RPC client with async-compatible methods
#[derive(Clone)]
pub struct SolanaClient {
    client: Arc<RpcClient>,
    rpc_url: String,
}

impl SolanaClient {
    /// Create a new Solana RPC client at `processed` commitment
    pub fn new(rpc_url: String) -> Self {
        Self::with_commitment(rpc_url, CommitmentConfig::processed())
    }

    pub fn with_commitment(rpc_url: String, commitment: CommitmentConfig) -> Self {
        let client = Arc::new(RpcClient::new_with_commitment(rpc_url.clone(), commitment));
        Self { client, rpc_url }
    }

    /// Create a client from a commitment name ("processed", "confirmed", "finalized")
    pub fn with_commitment_name(rpc_url: String, commitment: &str) -> Result<Self, SolanaClientError> {
        let commitment = CommitmentConfig::from_str(commitment)
            .map_err(|_| SolanaClientError::InvalidCommitment(commitment.to_string()))?;
        Ok(Self::with_commitment(rpc_url, commitment))
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Get recent blockhash (needed for transaction building)
    pub async fn get_latest_blockhash(&self) -> Result<Hash, SolanaClientError> {
        // Spawn blocking to make sync RPC call async-compatible
        let client = Arc::clone(&self.client);
        tokio::task::spawn_blocking(move || {
            client
                .get_latest_blockhash()
                .map_err(|e| SolanaClientError::RpcError(e.to_string()))
        })
        .await
        .map_err(|e| SolanaClientError::RpcError(format!("Task join error: {}", e)))?
    }
}

#[async_trait]
impl BlockhashPort for SolanaClient {
    async fn get_latest_blockhash(&self) -> Result<Hash, ChainError> {
        SolanaClient::get_latest_blockhash(self).await.map_err(ChainError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = SolanaClient::new("https://api.devnet.solana.com".to_string());
        assert_eq!(client.rpc_url(), "https://api.devnet.solana.com");
    }

    #[test]
    fn test_commitment_names() {
        assert!(SolanaClient::with_commitment_name("http://localhost:8899".to_string(), "confirmed").is_ok());
        assert!(matches!(
            SolanaClient::with_commitment_name("http://localhost:8899".to_string(), "eventually"),
            Err(SolanaClientError::InvalidCommitment(_))
        ));
    }

    #[test]
    fn test_error_display() {
        let err = SolanaClientError::RpcError("test".to_string());
        assert!(err.to_string().contains("RPC request failed"));

        let chain: ChainError = SolanaClientError::InvalidCommitment("x".to_string()).into();
        assert!(chain.to_string().contains("Invalid commitment"));
    }
}
