//! Route definitions for model selection endpoints.
//!
//! ```text
//! GET    /models           -> list_models
//! PUT    /models/selected  -> select_model
//! ```

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::models;
use crate::state::AppState;

/// Build the `/models` router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/models", get(models::list_models))
        .route("/models/selected", put(models::select_model))
}
