//! HTTP surface
//!
//! axum router exposing the proxy, ledger, fee and launch endpoints plus the
//! static site.

mod cors;
mod error;
mod handlers;
mod responses;
mod routes;
mod state;
mod statics;

pub use cors::CorsPolicy;
pub use error::{address_hint, ApiError, ErrorBody, ADDRESS_HINT};
pub use handlers::parse_leading_int;
pub use routes::*;
pub use state::{AppState, HealthInfo};

use anyhow::Result;
use axum::routing::get;
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Create the main application
pub fn create_app(state: AppState) -> Router {
    let cors = state.cors.clone();
    let public_dir = state.public_dir.clone();

    let api = Router::new()
        .route("/api/health", get(handlers::health))
        .merge(create_proxy_routes())
        .merge(create_ledger_routes())
        .merge(create_fee_routes())
        .merge(create_launch_routes())
        .route("/token/:token_address", get(statics::token_page))
        .with_state(state);

    statics::with_public_files(api, &public_dir).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(middleware::from_fn_with_state(cors, cors::apply_cors))
            .layer(CompressionLayer::new()),
    )
}

/// Serve until Ctrl+C
pub async fn start_server(state: AppState, port: u16) -> Result<()> {
    let app = create_app(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    info!("LimeScope server running on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
