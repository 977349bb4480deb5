//! Static site serving
//!
//! Files come from the public directory. Token pages always get
//! `token.html`; other misses from browsers get `index.html`.

use std::path::{Path, PathBuf};

use axum::extract::{Request, State};
use axum::handler::HandlerWithoutStateExt;
use axum::http::header::ACCEPT;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower::ServiceExt;
use tower_http::services::{ServeDir, ServeFile};

use super::state::AppState;

async fn serve_file(path: PathBuf, request: Request) -> Response {
    match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

fn wants_html(request: &Request) -> bool {
    request
        .headers()
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// `/token/:tokenAddress`
pub async fn token_page(State(state): State<AppState>, request: Request) -> Response {
    serve_file(state.public_dir.join("token.html"), request).await
}

/// Serve the public directory for every request no route matched
pub fn with_public_files(router: Router, public_dir: &Path) -> Router {
    let index = public_dir.join("index.html");
    let html_fallback = move |request: Request| async move {
        if wants_html(&request) {
            serve_file(index, request).await
        } else {
            StatusCode::NOT_FOUND.into_response()
        }
    };

    router.fallback_service(ServeDir::new(public_dir).fallback(html_fallback.into_service()))
}
