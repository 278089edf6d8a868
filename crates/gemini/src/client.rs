//! REST API client for the Generative Language endpoints.
//!
//! Wraps file upload, file status, file deletion, model listing, and
//! `generateContent` using [`reqwest`]. One client instance serves the
//! whole process; per-request timeouts are applied to the long-running
//! inference call only.

use std::time::Duration;

use crate::files::{
    GenerateContentResponse, ListModelsResponse, ModelInfo, RemoteFile, UploadResponse,
};

/// HTTP client for one Generative Language API endpoint + credential.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// Tunables for the single inference request of a run.
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    /// Sampling temperature. Kept low to favor deterministic, factual
    /// output.
    pub temperature: f32,
    /// Per-request timeout. Generous, since a long video can take the
    /// model minutes to work through.
    pub timeout: Duration,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            timeout: Duration::from_secs(600),
        }
    }
}

/// Errors from the Generative Language REST layer.
///
/// Quota rejections, unknown models, and timeouts are first-class
/// variants because the caller must give different advice for each.
#[derive(Debug, thiserror::Error)]
pub enum GeminiApiError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(reqwest::Error),

    /// The request exceeded its timeout.
    #[error("Request timed out")]
    Timeout,

    /// The service rejected the request for quota or rate-limit reasons.
    #[error("Quota exceeded: {body}")]
    Quota { body: String },

    /// The requested model identifier is unknown or unavailable.
    #[error("Unknown or unavailable model: {model}")]
    UnknownModel { model: String },

    /// Any other non-2xx response.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The remote service reported the uploaded video as FAILED.
    #[error("Remote video processing failed")]
    ProcessingFailed,

    /// Polling gave up before the file left PROCESSING.
    #[error("Remote processing did not finish within {}s", waited.as_secs())]
    PollTimeout { waited: Duration },

    /// The run was cancelled while waiting for remote processing.
    #[error("Run cancelled while waiting for remote processing")]
    Cancelled,
}

impl From<reqwest::Error> for GeminiApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeminiApiError::Timeout
        } else {
            GeminiApiError::Request(err)
        }
    }
}

impl GeminiApiError {
    /// User-facing remediation hint for this failure.
    pub fn advice(&self) -> Option<&'static str> {
        match self {
            GeminiApiError::Quota { .. } => {
                Some("Switch to a model with more available quota and retry.")
            }
            GeminiApiError::UnknownModel { .. } => {
                Some("Select one of the known-good models from the model list.")
            }
            GeminiApiError::Timeout | GeminiApiError::PollTimeout { .. } => {
                Some("Try a shorter video or raise the configured timeout.")
            }
            _ => None,
        }
    }
}

impl GeminiClient {
    /// Create a new client for the given endpoint and API key.
    ///
    /// * `base_url` - e.g. `https://generativelanguage.googleapis.com`.
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: String, api_key: String) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Upload a video and obtain its remote handle.
    ///
    /// Sends a `POST /upload/v1beta/files` multipart request with a JSON
    /// metadata part and the raw media part. The returned file usually
    /// starts in the `PROCESSING` state; callers poll it to readiness
    /// with [`crate::poll::poll_until_ready`].
    pub async fn upload_file(
        &self,
        bytes: Vec<u8>,
        display_name: &str,
        mime_type: &str,
    ) -> Result<RemoteFile, GeminiApiError> {
        let metadata = serde_json::json!({
            "file": { "display_name": display_name }
        });

        let form = reqwest::multipart::Form::new()
            .part(
                "metadata",
                reqwest::multipart::Part::text(metadata.to_string())
                    .mime_str("application/json")
                    .map_err(GeminiApiError::Request)?,
            )
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes)
                    .file_name(display_name.to_string())
                    .mime_str(mime_type)
                    .map_err(GeminiApiError::Request)?,
            );

        let response = self
            .client
            .post(format!(
                "{}/upload/v1beta/files?key={}",
                self.base_url, self.api_key
            ))
            .multipart(form)
            .send()
            .await?;

        let upload: UploadResponse = Self::parse_response(response).await?;
        tracing::info!(
            name = %upload.file.name,
            state = ?upload.file.state,
            "Uploaded video to remote service",
        );
        Ok(upload.file)
    }

    /// Fetch the current state of an uploaded file.
    ///
    /// * `name` - opaque handle, e.g. `files/abc-123`.
    pub async fn get_file(&self, name: &str) -> Result<RemoteFile, GeminiApiError> {
        let response = self
            .client
            .get(format!(
                "{}/v1beta/{}?key={}",
                self.base_url, name, self.api_key
            ))
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Delete an uploaded file to release remote storage quota.
    ///
    /// Called fire-and-forget after a successful run; failures are for
    /// the caller to log, not to surface.
    pub async fn delete_file(&self, name: &str) -> Result<(), GeminiApiError> {
        let response = self
            .client
            .delete(format!(
                "{}/v1beta/{}?key={}",
                self.base_url, name, self.api_key
            ))
            .send()
            .await?;

        Self::check_status(response).await
    }

    /// List models that can serve `generateContent` requests.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, GeminiApiError> {
        let response = self
            .client
            .get(format!("{}/v1beta/models?key={}", self.base_url, self.api_key))
            .send()
            .await?;

        let list: ListModelsResponse = Self::parse_response(response).await?;
        Ok(list
            .models
            .into_iter()
            .filter(ModelInfo::supports_generation)
            .collect())
    }

    /// Run the single inference call of a run and return the raw text.
    ///
    /// Constrains the response to a JSON array of five-string-field issue
    /// objects via `response_mime_type` + `response_schema`, and applies
    /// the per-request timeout from `options`. Exactly one request; no
    /// internal retry. The returned text is NOT parsed here.
    pub async fn generate_audit(
        &self,
        file: &RemoteFile,
        prompt: &str,
        model: &str,
        options: &GenerationOptions,
    ) -> Result<String, GeminiApiError> {
        let body = serde_json::json!({
            "contents": [{
                "parts": [
                    { "file_data": { "file_uri": file.uri, "mime_type": file.mime_type } },
                    { "text": prompt },
                ]
            }],
            "generation_config": {
                "response_mime_type": "application/json",
                "response_schema": audit_report_schema(),
                "temperature": options.temperature,
            },
        });

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent?key={}",
                self.base_url, model, self.api_key
            ))
            .timeout(options.timeout)
            .json(&body)
            .send()
            .await?;

        let parsed: GenerateContentResponse = Self::parse_response(response)
            .await
            .map_err(|e| classify_generate_error(e, model))?;
        Ok(parsed.text())
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success; classifies quota rejections and
    /// wraps everything else as [`GeminiApiError::Api`] on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GeminiApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(GeminiApiError::Quota { body });
            }
            return Err(GeminiApiError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GeminiApiError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }

    /// Assert the response has a success status code, discarding the body.
    async fn check_status(response: reqwest::Response) -> Result<(), GeminiApiError> {
        Self::ensure_success(response).await?;
        Ok(())
    }
}

/// Map a 404 on the generate path to [`GeminiApiError::UnknownModel`].
fn classify_generate_error(err: GeminiApiError, model: &str) -> GeminiApiError {
    match err {
        GeminiApiError::Api { status: 404, .. } => GeminiApiError::UnknownModel {
            model: model.to_string(),
        },
        other => other,
    }
}

/// JSON schema for the structured audit report: an array of objects with
/// exactly the five issue fields, all strings.
fn audit_report_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "timestamp": { "type": "STRING" },
                "severity": { "type": "STRING" },
                "category": { "type": "STRING" },
                "issue_description": { "type": "STRING" },
                "suggested_fix": { "type": "STRING" },
            },
            "required": [
                "timestamp",
                "severity",
                "category",
                "issue_description",
                "suggested_fix",
            ],
        },
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
