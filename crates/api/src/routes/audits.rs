//! Route definitions for the audit pipeline endpoints.
//!
//! Mounted at the root of the `/api/v1` tree.
//!
//! ```text
//! POST   /audits                 -> run_audit   (own generous timeout)
//! GET    /audits/current         -> current_result
//! GET    /audits/current/export  -> export_csv
//! ```

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use tower_http::timeout::TimeoutLayer;

use crate::config::ServerConfig;
use crate::handlers::audits;
use crate::state::AppState;

/// Build the long-running run route with its own timeout and body limit.
///
/// The framework's default body limit is far below a realistic video
/// upload, so this route raises it to the configured ceiling.
pub fn run_router(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .route("/audits", post(audits::run_audit))
        .layer(DefaultBodyLimit::max(config.max_video_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::GATEWAY_TIMEOUT,
            config.audit_timeout(),
        ))
}

/// Build the short result-reading routes.
pub fn results_router() -> Router<AppState> {
    Router::new()
        .route("/audits/current", get(audits::current_result))
        .route("/audits/current/export", get(audits::export_csv))
}
