//! Handlers for model selection endpoints.
//!
//! The selectable set is a fixed preset list; `?refresh=true` folds in
//! whatever the remote service currently reports as generation-capable.
//! Refresh is an explicit operator action, not a live subscription.

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::PRESET_MODELS;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::{session_from_headers, AppState};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for the model listing endpoint.
#[derive(Debug, Deserialize)]
pub struct ListModelsParams {
    /// When true, query the remote service and fold its generation-
    /// capable models into the preset list.
    pub refresh: Option<bool>,
}

/// Response body for the model listing endpoint.
#[derive(Debug, Serialize)]
pub struct ModelList {
    pub session_id: Uuid,
    /// Selectable identifiers, presets first, in stable order.
    pub models: Vec<String>,
    /// The model the next run will use.
    pub selected: String,
}

/// Request body for selecting a model.
#[derive(Debug, Deserialize)]
pub struct SelectModelRequest {
    /// Any non-empty identifier; free text overrides are allowed.
    pub model: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/models
///
/// The selectable model set and the session's current selection.
pub async fn list_models(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<ListModelsParams>,
) -> AppResult<Json<DataResponse<ModelList>>> {
    let session = session_from_headers(&headers);

    let mut models: Vec<String> = PRESET_MODELS.iter().map(|m| m.to_string()).collect();

    if params.refresh.unwrap_or(false) {
        let remote = state.remote.list_model_ids().await?;
        for id in remote {
            if !models.contains(&id) {
                models.push(id);
            }
        }
    }

    let selected = state
        .sessions
        .model(session)
        .await
        .unwrap_or_else(|| state.config.default_model.clone());

    Ok(Json(DataResponse {
        data: ModelList {
            session_id: session,
            models,
            selected,
        },
    }))
}

/// PUT /api/v1/models/selected
///
/// Set the session's model for subsequent runs.
pub async fn select_model(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<SelectModelRequest>,
) -> AppResult<Json<DataResponse<ModelList>>> {
    let session = session_from_headers(&headers);

    let model = input.model.trim().to_string();
    if model.is_empty() {
        return Err(AppError::BadRequest(
            "Model identifier must not be empty".to_string(),
        ));
    }

    state.sessions.set_model(session, model.clone()).await;

    let models = PRESET_MODELS.iter().map(|m| m.to_string()).collect();
    Ok(Json(DataResponse {
        data: ModelList {
            session_id: session,
            models,
            selected: model,
        },
    }))
}
