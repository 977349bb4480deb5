//! API request handlers

use std::collections::HashMap;
use std::str::FromStr;

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Multipart, Path, Query, Request, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::Value;
use solana_sdk::pubkey::Pubkey;

use super::error::ApiError;
use super::responses::*;
use super::state::AppState;
use crate::adapters::proxy::{OhlcvRange, ProxyAuth, GMGN_LOGO_URL};
use crate::application::LaunchRequest;
use crate::config::BEARER_PLACEHOLDER;
use crate::domain::launch_ledger::{clamp_page, clamp_page_size};
use crate::domain::LaunchRecord;
use crate::ports::ImageUpload;

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMintQuery {
    pub token_mint: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAddressQuery {
    pub token_address: Option<String>,
}

/// Candle window; `tokenAddress` is ignored on the path-style route
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OhlcvQuery {
    pub token_address: Option<String>,
    pub resolution: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimableQuery {
    pub wallet: Option<String>,
    pub token_mint: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn required(value: Option<String>, error: &str) -> ApiResult<String> {
    present(value).ok_or_else(|| ApiError::bad_request(error))
}

fn inbound_authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Leading integer of `raw`, the way lenient query parsers read `12abc`
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

async fn relay(state: &AppState, url: reqwest::Url, auth: ProxyAuth) -> Response {
    match state.proxy.forward(url, auth).await {
        Ok(proxied) => {
            let status = StatusCode::from_u16(proxied.status).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, [(CONTENT_TYPE, proxied.content_type)], proxied.body).into_response()
        }
        Err(e) => ApiError::internal(e.to_string()).into_response(),
    }
}

fn ohlcv_range(query: OhlcvQuery) -> ApiResult<OhlcvRange> {
    match (present(query.from), present(query.to)) {
        (Some(from), Some(to)) => Ok(OhlcvRange {
            resolution: present(query.resolution).unwrap_or_else(|| "1".to_string()),
            from,
            to,
        }),
        _ => Err(ApiError::bad_request("missing from or to timestamp")),
    }
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        with_bearer: state.proxy.has_bearer(),
        vanity_mode: state.health.vanity_mode.clone(),
        vanity_max_ms: state.health.vanity_max_ms,
        treasury: state.health.treasury.clone(),
        treasury_config_key_set: state.health.treasury_config_key_set,
    })
}

pub async fn feed(State(state): State<AppState>) -> Response {
    relay(&state, state.upstream.feed(), ProxyAuth::Public).await
}

pub async fn leaderboard(State(state): State<AppState>) -> Response {
    relay(&state, state.upstream.leaderboard(), ProxyAuth::Public).await
}

pub async fn lifetime_fees(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TokenMintQuery>,
) -> ApiResult<Response> {
    let mint = required(query.token_mint, "missing tokenMint")?;
    let auth = ProxyAuth::Authed(inbound_authorization(&headers));
    Ok(relay(&state, state.upstream.lifetime_fees(&mint), auth).await)
}

pub async fn market(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TokenAddressQuery>,
) -> ApiResult<Response> {
    let ca = required(query.token_address, "missing tokenAddress")?;
    let auth = ProxyAuth::Authed(inbound_authorization(&headers));
    Ok(relay(&state, state.upstream.market(&ca), auth).await)
}

pub async fn token_overview(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TokenAddressQuery>,
) -> ApiResult<Response> {
    let ca = required(query.token_address, "missing tokenAddress")?;
    Ok(overview_by_path(State(state), headers, Path(ca)).await)
}

pub async fn token_trades(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TokenAddressQuery>,
) -> ApiResult<Response> {
    let ca = required(query.token_address, "missing tokenAddress")?;
    Ok(trades_by_path(State(state), headers, Path(ca)).await)
}

pub async fn token_top_holders(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TokenAddressQuery>,
) -> ApiResult<Response> {
    let ca = required(query.token_address, "missing tokenAddress")?;
    Ok(top_holders_by_path(State(state), headers, Path(ca)).await)
}

pub async fn token_ohlcv(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<OhlcvQuery>,
) -> ApiResult<Response> {
    let ca = required(query.token_address.clone(), "missing tokenAddress")?;
    ohlcv_by_path(State(state), headers, Path(ca), Query(query)).await
}

pub async fn overview_by_path(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(ca): Path<String>,
) -> Response {
    let auth = ProxyAuth::Authed(inbound_authorization(&headers));
    relay(&state, state.upstream.token_overview(&ca), auth).await
}

pub async fn trades_by_path(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(ca): Path<String>,
) -> Response {
    let auth = ProxyAuth::Authed(inbound_authorization(&headers));
    relay(&state, state.upstream.token_trades(&ca), auth).await
}

pub async fn top_holders_by_path(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(ca): Path<String>,
) -> Response {
    let auth = ProxyAuth::Authed(inbound_authorization(&headers));
    relay(&state, state.upstream.token_top_holders(&ca), auth).await
}

pub async fn ohlcv_by_path(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(ca): Path<String>,
    Query(query): Query<OhlcvQuery>,
) -> ApiResult<Response> {
    let range = ohlcv_range(query)?;
    let auth = ProxyAuth::Authed(inbound_authorization(&headers));
    Ok(relay(&state, state.upstream.token_ohlcv(&ca, &range), auth).await)
}

pub async fn creator(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<TokenMintQuery>,
) -> ApiResult<Response> {
    let mint = required(query.token_mint, "missing tokenMint")?;
    let auth = ProxyAuth::Authed(inbound_authorization(&headers));
    Ok(relay(&state, state.upstream.creator(&mint), auth).await)
}

pub async fn subscription(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<Response> {
    let inbound = inbound_authorization(&headers).filter(|h| !h.contains(BEARER_PLACEHOLDER));
    if inbound.is_none() && !state.proxy.has_bearer() {
        return Err(ApiError::unauthorized("missing authorization"));
    }
    Ok(relay(&state, state.upstream.subscription(), ProxyAuth::Authed(inbound)).await)
}

pub async fn subscription_info(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(uuid): Path<String>,
) -> Response {
    let auth = ProxyAuth::Authed(inbound_authorization(&headers));
    relay(&state, state.upstream.subscription_info(&uuid), auth).await
}

/// Relay the GMGN logo as SVG
pub async fn gmgn_logo(State(state): State<AppState>) -> Response {
    match state.assets.fetch_asset(GMGN_LOGO_URL).await {
        Ok(asset) => {
            let status = StatusCode::from_u16(asset.status).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, [(CONTENT_TYPE, "image/svg+xml")], asset.bytes).into_response()
        }
        Err(e) => {
            tracing::error!("[Proxy] GMGN logo error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load GMGN.ai logo").into_response()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordRequest {
    pub token_mint: Option<String>,
    pub signature: Option<String>,
    pub wallet: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub image_url: Option<String>,
}

pub async fn record_launch(
    State(state): State<AppState>,
    body: Result<Json<RecordRequest>, JsonRejection>,
) -> ApiResult<Json<RecordResponse>> {
    let Json(body) = body?;
    let token_mint = required(body.token_mint, "missing tokenMint")?;

    let record = LaunchRecord::new(token_mint)
        .with_signature(body.signature.unwrap_or_default())
        .with_wallet(body.wallet.unwrap_or_default())
        .with_token_details(
            body.name.unwrap_or_default(),
            body.symbol.unwrap_or_default(),
            body.image_url.unwrap_or_default(),
        );

    let ledger = state.ledger.clone();
    let inserted = tokio::task::spawn_blocking(move || ledger.append_if_new(record))
        .await
        .map_err(|e| ApiError::internal(format!("ledger task failed: {}", e)))??;
    tracing::debug!("Launch record inserted: {}", inserted);

    Ok(Json(RecordResponse {
        success: true,
        recorded: true,
    }))
}

pub async fn my_launched(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<LaunchedPageResponse>> {
    let page = clamp_page(query.page.as_deref().and_then(parse_leading_int));
    let page_size = clamp_page_size(query.page_size.as_deref().and_then(parse_leading_int));

    let ledger = state.ledger.clone();
    let page = tokio::task::spawn_blocking(move || ledger.list(page, page_size))
        .await
        .map_err(|e| ApiError::internal(format!("ledger task failed: {}", e)))?;

    Ok(Json(LaunchedPageResponse {
        success: true,
        page,
    }))
}

pub async fn claimable_fees(
    State(state): State<AppState>,
    Query(query): Query<ClaimableQuery>,
) -> ApiResult<Json<ClaimableResponse>> {
    let wallet = required(query.wallet, "missing wallet")?;
    let wallet = Pubkey::from_str(&wallet).map_err(|_| ApiError::bad_request("invalid wallet"))?;

    let positions = state
        .fees
        .claimable(&wallet, present(query.token_mint).as_deref())
        .await?;

    Ok(Json(ClaimableResponse {
        success: true,
        positions,
    }))
}

pub async fn build_claims(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<ClaimTxsResponse>> {
    let Json(body) = body?;
    let wallet = body.get("wallet").and_then(Value::as_str).filter(|w| !w.is_empty());
    let positions = body
        .get("positions")
        .and_then(Value::as_array)
        .filter(|p| !p.is_empty());

    let (Some(wallet), Some(positions)) = (wallet, positions) else {
        return Err(ApiError::bad_request("wallet and positions[] required"));
    };
    let owner = Pubkey::from_str(wallet).map_err(|_| ApiError::bad_request("invalid wallet"))?;

    let batch = state.fees.build_claims(&owner, positions).await;
    if batch.all_failed() {
        return Err(ApiError::internal("failed to build any claim transactions")
            .with_details(failure_details(&batch.errors)));
    }

    Ok(Json(ClaimTxsResponse {
        success: true,
        txs: batch.txs,
        errors: batch.errors,
    }))
}

/// Text form of a JSON scalar field
fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn launch_request(mut fields: HashMap<String, String>, image: Option<ImageUpload>) -> LaunchRequest {
    let mut take = |key: &str| fields.remove(key);
    LaunchRequest {
        name: take("name").unwrap_or_default(),
        symbol: take("symbol").unwrap_or_default(),
        description: take("description").unwrap_or_default(),
        website_url: take("websiteUrl").unwrap_or_default(),
        image_url: take("imageUrl").unwrap_or_default(),
        wallet: take("wallet"),
        initial_buy_sol: take("initialBuySol"),
        vanity_mode: take("vanityMode"),
        image,
    }
}

async fn read_multipart(mut multipart: Multipart) -> ApiResult<LaunchRequest> {
    let mut fields = HashMap::new();
    let mut image = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "image" && field.file_name().is_some() {
            let content_type = field.content_type().map(str::to_string);
            let file_name = field.file_name().unwrap_or("image").to_string();
            let bytes: Bytes = field.bytes().await?;
            image = Some(ImageUpload::new(bytes.to_vec(), content_type).with_file_name(file_name));
        } else {
            fields.insert(name, field.text().await?);
        }
    }

    Ok(launch_request(fields, image))
}

/// Accepts a multipart form (field `image` for the file) or a JSON body
pub async fn create_launch(
    State(state): State<AppState>,
    request: Request,
) -> ApiResult<Json<LaunchResponse>> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    let launch = if is_multipart {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        read_multipart(multipart).await?
    } else {
        let Json(body) = Json::<Value>::from_request(request, &state).await?;
        let fields = body
            .as_object()
            .map(|map| {
                map.iter()
                    .filter_map(|(k, v)| text_of(v).map(|t| (k.clone(), t)))
                    .collect()
            })
            .unwrap_or_default();
        launch_request(fields, None)
    };

    let step = state.launch.launch(launch).await?;
    Ok(Json(LaunchResponse {
        success: true,
        step,
    }))
}
