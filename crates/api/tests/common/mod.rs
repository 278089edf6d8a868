//! Shared helpers for API integration tests.
//!
//! Builds the full application router with the exact middleware stack
//! production uses, with the remote analysis service replaced by
//! [`MockRemote`] so no network is involved.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use vidqa_api::config::ServerConfig;
use vidqa_api::router::build_app_router;
use vidqa_api::state::{AppState, SessionStore, SESSION_HEADER};
use vidqa_core::severity::UnknownSeverityPolicy;
use vidqa_gemini::client::GeminiApiError;
use vidqa_gemini::files::{FileState, RemoteFile};
use vidqa_gemini::service::RemoteAuditService;

// ---------------------------------------------------------------------------
// Mock remote service
// ---------------------------------------------------------------------------

/// Which stage of the pipeline the mock should fail at, if any.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Succeed end to end, answering inference with this raw text.
    Respond(String),
    /// Report the uploaded video as FAILED during processing.
    FailProcessing,
    /// Reject the inference call with a quota error.
    QuotaRejected,
}

/// In-memory stand-in for the Gemini service.
pub struct MockRemote {
    behavior: MockBehavior,
    /// Prompts received by `run_audit`, for content assertions.
    pub prompts: std::sync::Mutex<Vec<String>>,
    /// Byte sizes received by `upload_video`, in call order.
    pub upload_sizes: std::sync::Mutex<Vec<usize>>,
    pub uploads: AtomicUsize,
    pub deletes: AtomicUsize,
}

impl MockRemote {
    pub fn new(behavior: MockBehavior) -> Arc<MockRemote> {
        Arc::new(MockRemote {
            behavior,
            prompts: std::sync::Mutex::new(Vec::new()),
            upload_sizes: std::sync::Mutex::new(Vec::new()),
            uploads: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
        })
    }

    pub fn responding(raw: &str) -> Arc<MockRemote> {
        Self::new(MockBehavior::Respond(raw.to_string()))
    }

    fn mock_file(state: FileState) -> RemoteFile {
        RemoteFile {
            name: "files/mock-1".to_string(),
            uri: "https://mock/files/mock-1".to_string(),
            mime_type: "video/mp4".to_string(),
            state,
        }
    }
}

#[async_trait]
impl RemoteAuditService for MockRemote {
    async fn upload_video(
        &self,
        bytes: Vec<u8>,
        _display_name: &str,
        _mime_type: &str,
    ) -> Result<RemoteFile, GeminiApiError> {
        self.upload_sizes.lock().unwrap().push(bytes.len());
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(Self::mock_file(FileState::Processing))
    }

    async fn await_processing(
        &self,
        _uploaded: RemoteFile,
        _cancel: &CancellationToken,
    ) -> Result<RemoteFile, GeminiApiError> {
        match self.behavior {
            MockBehavior::FailProcessing => Err(GeminiApiError::ProcessingFailed),
            _ => Ok(Self::mock_file(FileState::Active)),
        }
    }

    async fn run_audit(
        &self,
        _file: &RemoteFile,
        prompt: &str,
        _model: &str,
    ) -> Result<String, GeminiApiError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.behavior {
            MockBehavior::Respond(raw) => Ok(raw.clone()),
            MockBehavior::QuotaRejected => Err(GeminiApiError::Quota {
                body: "quota exhausted".to_string(),
            }),
            MockBehavior::FailProcessing => unreachable!("processing already failed"),
        }
    }

    async fn delete_video(&self, _name: &str) -> Result<(), GeminiApiError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn list_model_ids(&self) -> Result<Vec<String>, GeminiApiError> {
        Ok(vec![
            "gemini-1.5-flash".to_string(),
            "gemini-experimental".to_string(),
        ])
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        gemini_api_key: "test-key".to_string(),
        gemini_base_url: "http://localhost:0".to_string(),
        default_model: "gemini-1.5-flash".to_string(),
        poll_interval: std::time::Duration::from_millis(1),
        poll_max_wait: std::time::Duration::from_secs(1),
        inference_timeout: std::time::Duration::from_secs(5),
        unknown_severity_policy: UnknownSeverityPolicy::Keep,
        staging_dir: std::env::temp_dir()
            .join("vidqa-test-staging")
            .to_string_lossy()
            .into_owned(),
        max_video_bytes: 64 * 1024 * 1024,
    }
}

/// Build the full application router backed by the given mock remote.
///
/// Mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack that production uses.
pub fn build_test_app(remote: Arc<MockRemote>) -> Router {
    let config = test_config();
    let state = AppState {
        config: Arc::new(config.clone()),
        remote,
        sessions: Arc::new(SessionStore::new()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub const TEST_BOUNDARY: &str = "vidqa-test-boundary";

/// Build a multipart body for the audit run endpoint.
///
/// `script` maps to the `script` text field; `model` to the `model`
/// field. The video part always declares `video/mp4`.
pub fn audit_form(
    video_name: &str,
    video_bytes: &[u8],
    script: Option<&str>,
    model: Option<&str>,
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{TEST_BOUNDARY}\r\nContent-Disposition: form-data; name=\"video\"; \
             filename=\"{video_name}\"\r\nContent-Type: video/mp4\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(video_bytes);
    body.extend_from_slice(b"\r\n");

    if let Some(script) = script {
        body.extend_from_slice(
            format!(
                "--{TEST_BOUNDARY}\r\nContent-Disposition: form-data; name=\"script\"\r\n\r\n{script}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(model) = model {
        body.extend_from_slice(
            format!(
                "--{TEST_BOUNDARY}\r\nContent-Disposition: form-data; name=\"model\"\r\n\r\n{model}\r\n"
            )
            .as_bytes(),
        );
    }

    body.extend_from_slice(format!("--{TEST_BOUNDARY}--\r\n").as_bytes());
    body
}

/// POST a multipart audit form, optionally pinning the session id.
pub async fn post_audit(
    app: Router,
    form: Vec<u8>,
    session: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/v1/audits")
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={TEST_BOUNDARY}"),
        );
    if let Some(session) = session {
        builder = builder.header(SESSION_HEADER, session);
    }
    app.oneshot(builder.body(Body::from(form)).unwrap())
        .await
        .unwrap()
}

/// GET a path, optionally with a session header.
pub async fn get(app: Router, uri: &str, session: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(session) = session {
        builder = builder.header(SESSION_HEADER, session);
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// PUT a JSON body, optionally with a session header.
pub async fn put_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    session: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("PUT")
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(session) = session {
        builder = builder.header(SESSION_HEADER, session);
    }
    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

/// Collect a response body as parsed JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body as a UTF-8 string.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Assert a response status, with the body in the failure message.
pub async fn assert_status(response: Response<Body>, expected: StatusCode) -> serde_json::Value {
    let status = response.status();
    let json = body_json(response).await;
    assert_eq!(status, expected, "unexpected status, body: {json}");
    json
}
