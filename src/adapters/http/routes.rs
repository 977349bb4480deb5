//! API route definitions

use super::handlers::*;
use super::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

/// Largest accepted launch form, image included
pub const LAUNCH_BODY_LIMIT: usize = 15 * 1024 * 1024;

/// Upstream passthrough routes
pub fn create_proxy_routes() -> Router<AppState> {
    Router::new()
        .route("/api/feed", get(feed))
        .route("/api/leaderboard", get(leaderboard))
        .route("/api/lifetime-fees", get(lifetime_fees))
        .route("/api/market", get(market))
        .route("/api/token-overview", get(token_overview))
        .route("/api/token-trades", get(token_trades))
        .route("/api/token-top-holders", get(token_top_holders))
        .route("/api/token-ohlcv", get(token_ohlcv))
        .route("/api/token/:ca/overview", get(overview_by_path))
        .route("/api/token/:ca/trades", get(trades_by_path))
        .route("/api/token/:ca/top-holders", get(top_holders_by_path))
        .route("/api/token/:ca/ohlcv", get(ohlcv_by_path))
        .route("/api/creator", get(creator))
        .route("/api/subscription", get(subscription))
        .route("/api/subscription/info/:uuid", get(subscription_info))
        .route("/api/gmgn-logo", get(gmgn_logo))
}

/// Local launch ledger routes
pub fn create_ledger_routes() -> Router<AppState> {
    Router::new()
        .route("/api/launch/record", post(record_launch))
        .route("/api/my-launched", get(my_launched))
}

/// Fee claim routes
pub fn create_fee_routes() -> Router<AppState> {
    Router::new()
        .route("/api/fees/claimable", get(claimable_fees))
        .route("/api/fees/build-claims", post(build_claims))
}

/// Token launch routes
pub fn create_launch_routes() -> Router<AppState> {
    Router::new().route(
        "/api/launch/create",
        post(create_launch).layer(DefaultBodyLimit::max(LAUNCH_BODY_LIMIT)),
    )
}
