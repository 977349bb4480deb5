//! Launchpad API Client
//!
//! HTTP client for the token-launch REST API. Authenticates with
//! `x-api-key` and decodes the base58 transactions it returns.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

use super::types::{
    ApiEnvelope, ClaimTransaction, CreateConfigRequest, CreateConfigResponse,
    CreateLaunchTransactionRequest, TokenInfoResponse,
};
use crate::domain::{FeePosition, UnsignedTransaction, VanityHint};
use crate::ports::launchpad::{
    LaunchTransactionParams, LaunchpadError, LaunchpadPort, TokenInfo, TokenMetadataRequest,
    WalletConfig,
};

/// Default base URL of the launchpad API
pub const DEFAULT_LAUNCHPAD_API: &str = "https://public-api-v2.bags.fm/api/v1";

/// Launchpad client configuration
#[derive(Debug, Clone)]
pub struct BagsConfig {
    pub api_base_url: String,
    /// Without a key every call fails with `NotConfigured`
    pub api_key: Option<String>,
}

impl Default for BagsConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_LAUNCHPAD_API.to_string(),
            api_key: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BagsClient {
    config: BagsConfig,
    http: Client,
}

impl BagsClient {
    pub fn with_config(config: BagsConfig) -> Result<Self, LaunchpadError> {
        let http = Client::builder()
            .build()
            .map_err(|e| LaunchpadError::HttpError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    pub fn with_api_key(api_key: String) -> Result<Self, LaunchpadError> {
        Self::with_config(BagsConfig {
            api_key: Some(api_key),
            ..BagsConfig::default()
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.config.api_base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base_url.trim_end_matches('/'), path)
    }

    fn authed(&self, req: RequestBuilder) -> Result<RequestBuilder, LaunchpadError> {
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or(LaunchpadError::NotConfigured)?;
        Ok(req.header("x-api-key", key))
    }

    /// Send and unwrap the response envelope
    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, LaunchpadError> {
        let response = self
            .authed(req)?
            .send()
            .await
            .map_err(|e| LaunchpadError::HttpError(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| LaunchpadError::HttpError(e.to_string()))?;

        parse_envelope(status, &body)
    }
}

/// Decode a launchpad response body.
///
/// Non-2xx statuses and `success: false` envelopes become `ApiError` with the
/// envelope's error text, or the raw body when it is not an envelope.
pub fn parse_envelope<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, LaunchpadError> {
    let envelope = serde_json::from_str::<ApiEnvelope<T>>(body);
    let ok_status = (200..300).contains(&status);

    match envelope {
        Ok(env) if ok_status && env.success => env
            .response
            .ok_or_else(|| LaunchpadError::ParseError("envelope has no response".to_string())),
        Ok(env) => Err(LaunchpadError::ApiError {
            status,
            message: env
                .error_message()
                .unwrap_or_else(|| format!("request failed with status {}", status)),
        }),
        Err(_) if !ok_status => Err(LaunchpadError::ApiError {
            status,
            message: body.trim().to_string(),
        }),
        Err(e) => Err(LaunchpadError::ParseError(e.to_string())),
    }
}

fn parse_pubkey(field: &str, value: &str) -> Result<Pubkey, LaunchpadError> {
    Pubkey::from_str(value)
        .map_err(|_| LaunchpadError::ParseError(format!("invalid {}: {}", field, value)))
}

fn metadata_form(request: TokenMetadataRequest) -> Result<Form, LaunchpadError> {
    let image = Part::bytes(request.image.bytes)
        .file_name(request.image.file_name)
        .mime_str(&request.image.content_type)
        .map_err(|e| LaunchpadError::ParseError(format!("invalid image content type: {}", e)))?;

    let mut form = Form::new()
        .part("image", image)
        .text("name", request.name)
        .text("symbol", request.symbol)
        .text("description", request.description)
        .text("twitter", request.twitter)
        .text("website", request.website);

    form = match request.vanity {
        Some(VanityHint::Disabled { max_millis }) => form
            .text("vanityMode", "off")
            .text("vanityMaxMs", max_millis.to_string()),
        Some(VanityHint::Suffix { suffix, max_millis }) => form
            .text("vanityMode", "suffix")
            .text("vanitySuffix", suffix)
            .text("vanityMaxMs", max_millis.to_string()),
        None => form,
    };
    Ok(form)
}

#[async_trait]
impl LaunchpadPort for BagsClient {
    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn create_token_info_and_metadata(
        &self,
        request: TokenMetadataRequest,
    ) -> Result<TokenInfo, LaunchpadError> {
        let symbol = request.symbol.clone();
        let req = self
            .http
            .post(self.url("token-launch/create-token-info"))
            .multipart(metadata_form(request)?);

        let info: TokenInfoResponse = self.send(req).await?;
        tracing::info!("Created token info for {} (mint {})", symbol, info.token_mint);

        Ok(TokenInfo {
            token_mint: info.token_mint,
            token_metadata: info.token_metadata,
        })
    }

    async fn get_or_create_config(&self, wallet: &Pubkey) -> Result<WalletConfig, LaunchpadError> {
        let req = self
            .http
            .post(self.url("token-launch/create-config"))
            .json(&CreateConfigRequest {
                launch_wallet: wallet.to_string(),
            });

        let cfg: CreateConfigResponse = self.send(req).await?;
        let transaction = cfg
            .tx
            .as_deref()
            .filter(|tx| !tx.is_empty())
            .map(UnsignedTransaction::from_base58)
            .transpose()?;

        tracing::debug!(
            "Config {} for {} (pending tx: {})",
            cfg.config_key,
            wallet,
            transaction.is_some()
        );
        Ok(WalletConfig {
            config_key: parse_pubkey("configKey", &cfg.config_key)?,
            transaction,
        })
    }

    async fn create_launch_transaction(
        &self,
        params: LaunchTransactionParams,
    ) -> Result<UnsignedTransaction, LaunchpadError> {
        let req = self
            .http
            .post(self.url("token-launch/create-launch-transaction"))
            .json(&CreateLaunchTransactionRequest {
                ipfs: params.metadata_url,
                token_mint: params.token_mint.to_string(),
                wallet: params.launch_wallet.to_string(),
                initial_buy_lamports: params.initial_buy_lamports,
                config_key: params.config_key.to_string(),
            });

        let encoded: String = self.send(req).await?;
        Ok(UnsignedTransaction::from_base58(&encoded)?)
    }

    async fn get_all_claimable_positions(
        &self,
        wallet: &Pubkey,
    ) -> Result<Vec<FeePosition>, LaunchpadError> {
        let req = self
            .http
            .get(self.url("token-launch/claimable-positions"))
            .query(&[("wallet", wallet.to_string())]);

        let raw: Vec<Value> = self.send(req).await?;
        Ok(raw
            .iter()
            .enumerate()
            .filter_map(|(index, p)| match FeePosition::revive(p) {
                Ok(position) => Some(position),
                Err(e) => {
                    tracing::warn!("Skipping claimable position {}: {}", index, e);
                    None
                }
            })
            .collect())
    }

    async fn get_claim_transactions(
        &self,
        owner: &Pubkey,
        position: &FeePosition,
    ) -> Result<Vec<UnsignedTransaction>, LaunchpadError> {
        let mut body = position.to_json();
        if let Value::Object(map) = &mut body {
            map.insert("feeClaimer".to_string(), Value::String(owner.to_string()));
        }

        let req = self.http.post(self.url("token-launch/claim-txs/v2")).json(&body);
        let txs: Vec<ClaimTransaction> = self.send(req).await?;

        txs.iter()
            .map(|c| UnsignedTransaction::from_base58(&c.tx).map_err(LaunchpadError::from))
            .collect()
    }
}
