use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use vidqa_core::error::CoreError;
use vidqa_gemini::client::GeminiApiError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`GeminiApiError`] for
/// remote-service failures, and adds HTTP-specific variants. Implements
/// [`IntoResponse`] to produce consistent JSON error responses; remote
/// failures carry a remediation `advice` field when one exists.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `vidqa_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A remote-service error from `vidqa_gemini`.
    #[error(transparent)]
    Remote(#[from] GeminiApiError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let advice = match &self {
            AppError::Remote(remote) => remote.advice(),
            _ => None,
        };

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::MissingInput(msg) => {
                    (StatusCode::BAD_REQUEST, "MISSING_INPUT", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            // --- Remote-service errors ---
            AppError::Remote(remote) => classify_remote_error(remote),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(advice) = advice {
            body["advice"] = json!(advice);
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a remote-service error into an HTTP status, code, and message.
///
/// Quota rejections, unknown models, and timeouts keep their specific
/// codes so the frontend can advise the operator; transport errors are
/// sanitized and logged.
fn classify_remote_error(err: &GeminiApiError) -> (StatusCode, &'static str, String) {
    match err {
        GeminiApiError::Quota { .. } => (
            StatusCode::TOO_MANY_REQUESTS,
            "QUOTA_EXCEEDED",
            err.to_string(),
        ),
        GeminiApiError::UnknownModel { .. } => {
            (StatusCode::BAD_REQUEST, "UNKNOWN_MODEL", err.to_string())
        }
        GeminiApiError::Timeout => (
            StatusCode::GATEWAY_TIMEOUT,
            "INFERENCE_TIMEOUT",
            err.to_string(),
        ),
        GeminiApiError::PollTimeout { .. } => (
            StatusCode::GATEWAY_TIMEOUT,
            "PROCESSING_TIMEOUT",
            err.to_string(),
        ),
        GeminiApiError::ProcessingFailed => (
            StatusCode::BAD_GATEWAY,
            "PROCESSING_FAILED",
            err.to_string(),
        ),
        GeminiApiError::Cancelled => (
            StatusCode::SERVICE_UNAVAILABLE,
            "RUN_CANCELLED",
            err.to_string(),
        ),
        GeminiApiError::Request(inner) => {
            tracing::error!(error = %inner, "Remote transport error");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "The remote analysis service could not be reached".to_string(),
            )
        }
        GeminiApiError::Api { status, body } => {
            tracing::error!(status, body = %body, "Remote API error");
            (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                format!("The remote analysis service returned status {status}"),
            )
        }
    }
}
