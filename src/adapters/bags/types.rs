//! Launchpad API Types
//!
//! Request and response bodies for the token-launch REST API. Every
//! response is wrapped in a `{success, response, error}` envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response envelope shared by all launchpad endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub response: Option<T>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl<T> ApiEnvelope<T> {
    /// Error text carried by the envelope, if any
    pub fn error_message(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Body of `create-token-info`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenInfoResponse {
    pub token_mint: String,
    /// Metadata document URL (IPFS)
    pub token_metadata: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConfigRequest {
    pub launch_wallet: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConfigResponse {
    pub config_key: String,
    /// Base58 transaction, present only when the config is new
    #[serde(default)]
    pub tx: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLaunchTransactionRequest {
    pub ipfs: String,
    pub token_mint: String,
    pub wallet: String,
    pub initial_buy_lamports: u64,
    pub config_key: String,
}

/// One element of the `claim-txs/v2` response
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimTransaction {
    /// Base58 transaction
    pub tx: String,
}
