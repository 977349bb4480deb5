//! Asset Port
//!
//! Plain binary fetches of remote assets (token images, logos).

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AssetError {
    #[error("Asset request failed: {0}")]
    RequestFailed(String),
}

/// A fetched asset with whatever status the remote returned
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedAsset {
    pub status: u16,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FetchedAsset {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait AssetPort: Send + Sync {
    async fn fetch_asset(&self, url: &str) -> Result<FetchedAsset, AssetError>;
}
