//! Remote audit service trait and the Gemini-backed implementation.
//!
//! The trait is the seam between the HTTP layer and the remote service:
//! handlers depend on `Arc<dyn RemoteAuditService>`, production wires in
//! [`GeminiAuditService`], and tests substitute a mock.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::client::{GeminiApiError, GeminiClient, GenerationOptions};
use crate::files::RemoteFile;
use crate::poll::{poll_until_ready, PollConfig, PollOutcome};

/// Operations the audit pipeline needs from the remote service.
#[async_trait]
pub trait RemoteAuditService: Send + Sync {
    /// Upload a video and return its (possibly still processing) handle.
    async fn upload_video(
        &self,
        bytes: Vec<u8>,
        display_name: &str,
        mime_type: &str,
    ) -> Result<RemoteFile, GeminiApiError>;

    /// Wait until the uploaded video is ready for inference.
    async fn await_processing(
        &self,
        uploaded: RemoteFile,
        cancel: &CancellationToken,
    ) -> Result<RemoteFile, GeminiApiError>;

    /// Issue the single inference call and return the raw response text.
    async fn run_audit(
        &self,
        file: &RemoteFile,
        prompt: &str,
        model: &str,
    ) -> Result<String, GeminiApiError>;

    /// Delete the remote copy of the video (storage-quota cleanup).
    async fn delete_video(&self, name: &str) -> Result<(), GeminiApiError>;

    /// Model identifiers that support content generation.
    async fn list_model_ids(&self) -> Result<Vec<String>, GeminiApiError>;
}

/// Production implementation backed by [`GeminiClient`].
pub struct GeminiAuditService {
    client: GeminiClient,
    poll: PollConfig,
    generation: GenerationOptions,
}

impl GeminiAuditService {
    pub fn new(client: GeminiClient, poll: PollConfig, generation: GenerationOptions) -> Self {
        Self {
            client,
            poll,
            generation,
        }
    }
}

#[async_trait]
impl RemoteAuditService for GeminiAuditService {
    async fn upload_video(
        &self,
        bytes: Vec<u8>,
        display_name: &str,
        mime_type: &str,
    ) -> Result<RemoteFile, GeminiApiError> {
        self.client.upload_file(bytes, display_name, mime_type).await
    }

    async fn await_processing(
        &self,
        uploaded: RemoteFile,
        cancel: &CancellationToken,
    ) -> Result<RemoteFile, GeminiApiError> {
        match poll_until_ready(&self.client, uploaded, &self.poll, cancel).await? {
            PollOutcome::Ready(file) => Ok(file),
            PollOutcome::Failed => Err(GeminiApiError::ProcessingFailed),
            PollOutcome::TimedOut => Err(GeminiApiError::PollTimeout {
                waited: self.poll.max_wait,
            }),
            PollOutcome::Cancelled => Err(GeminiApiError::Cancelled),
        }
    }

    async fn run_audit(
        &self,
        file: &RemoteFile,
        prompt: &str,
        model: &str,
    ) -> Result<String, GeminiApiError> {
        self.client
            .generate_audit(file, prompt, model, &self.generation)
            .await
    }

    async fn delete_video(&self, name: &str) -> Result<(), GeminiApiError> {
        self.client.delete_file(name).await
    }

    async fn list_model_ids(&self) -> Result<Vec<String>, GeminiApiError> {
        let models = self.client.list_models().await?;
        Ok(models.iter().map(|m| m.id().to_string()).collect())
    }
}
