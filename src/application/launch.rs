//! Launch Orchestrator
//!
//! Drives a token launch for a client wallet in two passes:
//!
//! 1. Upload metadata, then look up the wallet's fee configuration. If the
//!    configuration still has to be created, hand back its setup transaction
//!    (`need_config`) and stop; the client signs it and submits again.
//! 2. Once the configuration exists, build the launch transaction against
//!    its key and hand that back (`launch`).
//!
//! Nothing is persisted here. The client records the launch separately
//! after broadcasting the signed transaction.

use std::str::FromStr;
use std::sync::Arc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use super::finalizer::{FinalizeError, TransactionFinalizer};
use crate::domain::VanityHint;
use crate::ports::{
    AssetError, AssetPort, ImageUpload, LaunchTransactionParams, LaunchpadError, LaunchpadPort,
    TokenMetadataRequest,
};

/// Shortest string accepted as a wallet address before parsing
pub const MIN_WALLET_LEN: usize = 32;

const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

pub const NEED_CONFIG_NOTE: &str =
    "Sign this one-time LimeSCOPE config tx, then submit /api/launch/create again.";

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("{0}")]
    Validation(String),
    #[error("BAGS_API_KEY not configured")]
    NotConfigured,
    #[error("Failed to fetch imageUrl: HTTP {0}")]
    ImageUnavailable(u16),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Launchpad(#[from] LaunchpadError),
    #[error(transparent)]
    Finalize(#[from] FinalizeError),
}

impl LaunchError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Inbound launch form
#[derive(Debug, Clone, Default)]
pub struct LaunchRequest {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub website_url: String,
    pub image_url: String,
    pub image: Option<ImageUpload>,
    pub wallet: Option<String>,
    pub initial_buy_sol: Option<String>,
    pub vanity_mode: Option<String>,
}

/// Terminal response of one orchestrator call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum LaunchStep {
    /// The wallet's fee config must be created first
    NeedConfig { tx: String, note: String },
    /// Final unsigned launch transaction
    Launch {
        tx: String,
        #[serde(rename = "tokenMint")]
        token_mint: String,
        #[serde(rename = "metadataUrl")]
        metadata_url: String,
        #[serde(rename = "vanityModeUsed")]
        vanity_mode_used: String,
    },
}

/// Server-side launch defaults
#[derive(Debug, Clone, Default)]
pub struct LaunchSettings {
    /// Normalized vanity mode applied when the request names none
    pub vanity_mode: String,
    pub vanity_max_ms: Option<u64>,
}

#[derive(Clone)]
pub struct LaunchOrchestrator {
    launchpad: Arc<dyn LaunchpadPort>,
    assets: Arc<dyn AssetPort>,
    finalizer: TransactionFinalizer,
    settings: LaunchSettings,
}

impl LaunchOrchestrator {
    pub fn new(
        launchpad: Arc<dyn LaunchpadPort>,
        assets: Arc<dyn AssetPort>,
        finalizer: TransactionFinalizer,
        settings: LaunchSettings,
    ) -> Self {
        Self {
            launchpad,
            assets,
            finalizer,
            settings,
        }
    }

    pub async fn launch(&self, request: LaunchRequest) -> Result<LaunchStep, LaunchError> {
        if !self.launchpad.is_configured() {
            return Err(LaunchError::NotConfigured);
        }

        let wallet_str = request
            .wallet
            .as_deref()
            .filter(|w| w.len() >= MIN_WALLET_LEN)
            .ok_or_else(|| LaunchError::Validation("missing or invalid wallet".to_string()))?;

        if request.name.is_empty() || request.symbol.is_empty() {
            return Err(LaunchError::Validation("name & symbol are required".to_string()));
        }

        let image = self.resolve_image(&request).await?;

        let wallet = Pubkey::from_str(wallet_str)
            .map_err(|_| LaunchError::Validation("missing or invalid wallet".to_string()))?;
        let initial_buy_lamports = parse_initial_buy(request.initial_buy_sol.as_deref())?;

        let vanity_mode_used = request
            .vanity_mode
            .clone()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.settings.vanity_mode.clone());
        let vanity = VanityHint::from_mode(&vanity_mode_used, self.settings.vanity_max_ms);

        let info = self
            .launchpad
            .create_token_info_and_metadata(TokenMetadataRequest {
                image,
                name: request.name.clone(),
                symbol: normalize_symbol(&request.symbol),
                description: request.description.clone(),
                twitter: String::new(),
                website: request.website_url.clone(),
                vanity,
            })
            .await?;
        tracing::info!(
            "Metadata created for {} (mint {}, wallet {})",
            request.name,
            info.token_mint,
            wallet
        );

        let config = self.launchpad.get_or_create_config(&wallet).await?;
        if let Some(setup_tx) = config.transaction {
            tracing::info!("Wallet {} needs a one-time config signature", wallet);
            let tx = self.finalizer.finalize_to_base64(setup_tx, Some(&wallet)).await?;
            return Ok(LaunchStep::NeedConfig {
                tx,
                note: NEED_CONFIG_NOTE.to_string(),
            });
        }

        let token_mint = Pubkey::from_str(&info.token_mint).map_err(|e| {
            LaunchpadError::ParseError(format!("invalid tokenMint {}: {}", info.token_mint, e))
        })?;

        let launch_tx = self
            .launchpad
            .create_launch_transaction(LaunchTransactionParams {
                metadata_url: info.token_metadata.clone(),
                token_mint,
                launch_wallet: wallet,
                initial_buy_lamports,
                config_key: config.config_key,
            })
            .await?;
        let tx = self.finalizer.finalize_to_base64(launch_tx, Some(&wallet)).await?;

        tracing::info!("Launch transaction built for mint {}", info.token_mint);
        Ok(LaunchStep::Launch {
            tx,
            token_mint: info.token_mint,
            metadata_url: info.token_metadata,
            vanity_mode_used,
        })
    }

    /// Uploaded file wins; otherwise the image URL is fetched
    async fn resolve_image(&self, request: &LaunchRequest) -> Result<ImageUpload, LaunchError> {
        if let Some(image) = &request.image {
            return Ok(image.clone());
        }
        if request.image_url.is_empty() {
            return Err(LaunchError::Validation(
                "provide an image file (field: image) or imageUrl".to_string(),
            ));
        }

        let asset = self.assets.fetch_asset(&request.image_url).await?;
        if !asset.is_success() {
            return Err(LaunchError::ImageUnavailable(asset.status));
        }
        Ok(ImageUpload::new(asset.bytes, asset.content_type))
    }

    pub fn settings(&self) -> &LaunchSettings {
        &self.settings
    }
}

/// Upper-case and drop the first `$`
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.to_uppercase().replacen('$', "", 1)
}

/// SOL amount from the form to lamports. Empty means zero, negatives clamp to zero.
pub fn parse_initial_buy(value: Option<&str>) -> Result<u64, LaunchError> {
    let raw = value.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Ok(0);
    }

    let invalid = || LaunchError::Validation("invalid initialBuySol".to_string());
    let sol = Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|_| invalid())?;
    if sol.is_sign_negative() {
        return Ok(0);
    }

    sol.checked_mul(Decimal::from(LAMPORTS_PER_SOL))
        .and_then(|lamports| lamports.trunc().to_u64())
        .ok_or_else(invalid)
}
