//! Shared handler state

use std::path::PathBuf;
use std::sync::Arc;

use super::cors::CorsPolicy;
use crate::adapters::proxy::{ProxyForwarder, UpstreamApi};
use crate::application::{FeeClaimService, LaunchOrchestrator};
use crate::domain::LaunchLedger;
use crate::ports::AssetPort;

/// Values reported by `/api/health`
#[derive(Debug, Clone, Default)]
pub struct HealthInfo {
    pub vanity_mode: String,
    pub vanity_max_ms: u64,
    pub treasury: String,
    pub treasury_config_key_set: bool,
}

/// Long-lived clients shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub proxy: Arc<ProxyForwarder>,
    pub upstream: Arc<UpstreamApi>,
    /// Fetcher for the logo passthrough
    pub assets: Arc<dyn AssetPort>,
    pub launch: Arc<LaunchOrchestrator>,
    pub fees: Arc<FeeClaimService>,
    pub ledger: Arc<LaunchLedger>,
    pub cors: Arc<CorsPolicy>,
    pub public_dir: PathBuf,
    pub health: HealthInfo,
}
