//! Launchpad Port
//!
//! Abstraction over the token-launch platform SDK: metadata creation,
//! per-wallet fee configuration, launch transactions and fee claims.

use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use crate::domain::{FeePosition, TransactionError, UnsignedTransaction, VanityHint};

#[derive(Debug, Error)]
pub enum LaunchpadError {
    #[error("Launchpad API key not configured")]
    NotConfigured,
    #[error("HTTP request failed: {0}")]
    HttpError(String),
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },
    #[error("Failed to parse response: {0}")]
    ParseError(String),
    #[error(transparent)]
    Transaction(#[from] TransactionError),
}

/// Image bytes for token metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub file_name: String,
}

impl ImageUpload {
    pub fn new(bytes: Vec<u8>, content_type: Option<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.unwrap_or_else(|| "image/png".to_string()),
            file_name: "image".to_string(),
        }
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }
}

/// Metadata creation request
#[derive(Debug, Clone)]
pub struct TokenMetadataRequest {
    pub image: ImageUpload,
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub twitter: String,
    pub website: String,
    pub vanity: Option<VanityHint>,
}

/// Result of metadata creation
#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    /// Mint reserved for the new token (base58)
    pub token_mint: String,
    /// URL of the uploaded metadata document
    pub token_metadata: String,
}

/// Per-wallet fee configuration
#[derive(Debug, Clone)]
pub struct WalletConfig {
    pub config_key: Pubkey,
    /// Present when the config does not exist yet and must be signed once
    pub transaction: Option<UnsignedTransaction>,
}

/// Launch transaction parameters
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchTransactionParams {
    pub metadata_url: String,
    pub token_mint: Pubkey,
    pub launch_wallet: Pubkey,
    pub initial_buy_lamports: u64,
    pub config_key: Pubkey,
}

#[async_trait]
pub trait LaunchpadPort: Send + Sync {
    /// Whether credentials for the platform are present
    fn is_configured(&self) -> bool {
        true
    }

    async fn create_token_info_and_metadata(
        &self,
        request: TokenMetadataRequest,
    ) -> Result<TokenInfo, LaunchpadError>;

    async fn get_or_create_config(&self, wallet: &Pubkey) -> Result<WalletConfig, LaunchpadError>;

    async fn create_launch_transaction(
        &self,
        params: LaunchTransactionParams,
    ) -> Result<UnsignedTransaction, LaunchpadError>;

    async fn get_all_claimable_positions(
        &self,
        wallet: &Pubkey,
    ) -> Result<Vec<FeePosition>, LaunchpadError>;

    /// Zero or more claim transactions for one position
    async fn get_claim_transactions(
        &self,
        owner: &Pubkey,
        position: &FeePosition,
    ) -> Result<Vec<UnsignedTransaction>, LaunchpadError>;
}
