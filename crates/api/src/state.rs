use std::collections::HashMap;
use std::sync::Arc;

use axum::http::HeaderMap;
use tokio::sync::RwLock;
use uuid::Uuid;
use vidqa_core::run::RunOutcome;
use vidqa_gemini::service::RemoteAuditService;

use crate::config::ServerConfig;

/// Header carrying the browser session identifier.
pub const SESSION_HEADER: &str = "x-session-id";

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Remote analysis service (Gemini in production, a mock in tests).
    pub remote: Arc<dyn RemoteAuditService>,
    /// Session-scoped last-result slots.
    pub sessions: Arc<SessionStore>,
}

/// Per-session state: the last run outcome and the selected model.
///
/// Replaced wholesale on each run; nothing persists beyond the session.
#[derive(Debug, Clone)]
pub struct SessionSlot {
    pub outcome: RunOutcome,
    /// Operator-selected model, if any; `None` falls back to the
    /// configured default.
    pub model: Option<String>,
}

impl Default for SessionSlot {
    fn default() -> Self {
        Self {
            outcome: RunOutcome::NotRun,
            model: None,
        }
    }
}

/// In-memory store of session slots.
///
/// Each slot has single-writer-single-reader semantics per session; the
/// lock only guards the map against concurrent sessions.
#[derive(Default)]
pub struct SessionStore {
    slots: RwLock<HashMap<Uuid, SessionSlot>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last run outcome for a session (`NotRun` for fresh sessions).
    pub async fn outcome(&self, session: Uuid) -> RunOutcome {
        self.slots
            .read()
            .await
            .get(&session)
            .map(|s| s.outcome.clone())
            .unwrap_or(RunOutcome::NotRun)
    }

    /// Replace the session's outcome wholesale.
    pub async fn set_outcome(&self, session: Uuid, outcome: RunOutcome) {
        self.slots.write().await.entry(session).or_default().outcome = outcome;
    }

    /// Operator-selected model for a session, if any.
    pub async fn model(&self, session: Uuid) -> Option<String> {
        self.slots
            .read()
            .await
            .get(&session)
            .and_then(|s| s.model.clone())
    }

    /// Set the session's selected model.
    pub async fn set_model(&self, session: Uuid, model: String) {
        self.slots.write().await.entry(session).or_default().model = Some(model);
    }
}

/// Resolve the session id from request headers, minting a fresh one when
/// the header is absent or malformed.
pub fn session_from_headers(headers: &HeaderMap) -> Uuid {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v).ok())
        .unwrap_or_else(Uuid::new_v4)
}
