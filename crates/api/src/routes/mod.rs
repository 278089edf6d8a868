pub mod audits;
pub mod health;
pub mod models;

use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use tower_http::timeout::TimeoutLayer;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /audits                     run an audit (POST, multipart)
/// /audits/current             last outcome for the session (GET)
/// /audits/current/export      CSV attachment of the current findings (GET)
///
/// /models                     selectable models (+ ?refresh=true) (GET)
/// /models/selected            set the session's model (PUT)
/// ```
///
/// Timeouts are applied per group here rather than globally: an audit
/// run legitimately blocks through remote processing plus inference and
/// would be killed by any sane request-wide timeout.
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    let short = Router::new()
        .merge(audits::results_router())
        .merge(models::router())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ));

    short.merge(audits::run_router(config))
}
