//! API response types

use serde::Serialize;
use serde_json::Value;

use crate::application::{ClaimFailure, LaunchStep};
use crate::domain::{FeePosition, LedgerPage};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub ok: bool,
    pub with_bearer: bool,
    pub vanity_mode: String,
    pub vanity_max_ms: u64,
    pub treasury: String,
    pub treasury_config_key_set: bool,
}

#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub success: bool,
    pub recorded: bool,
}

#[derive(Debug, Serialize)]
pub struct LaunchedPageResponse {
    pub success: bool,
    #[serde(flatten)]
    pub page: LedgerPage,
}

#[derive(Debug, Serialize)]
pub struct ClaimableResponse {
    pub success: bool,
    pub positions: Vec<FeePosition>,
}

#[derive(Debug, Serialize)]
pub struct ClaimTxsResponse {
    pub success: bool,
    pub txs: Vec<String>,
    pub errors: Vec<ClaimFailure>,
}

#[derive(Debug, Serialize)]
pub struct LaunchResponse {
    pub success: bool,
    #[serde(flatten)]
    pub step: LaunchStep,
}

/// Convert claim failures to the `details` payload of an error
pub fn failure_details(errors: &[ClaimFailure]) -> Value {
    serde_json::to_value(errors).unwrap_or(Value::Null)
}
