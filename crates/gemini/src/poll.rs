//! Bounded, cancellable polling for remote media processing.
//!
//! An uploaded video sits in `PROCESSING` until the remote service has
//! ingested it. The source behavior re-checked the state every two
//! seconds with no upper bound; here the loop is bounded by a maximum
//! wait and can be cancelled between checks, returning a discriminated
//! outcome instead of looping unconditionally.

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::client::{GeminiApiError, GeminiClient};
use crate::files::{FileState, RemoteFile};

/// Tunable parameters for the processing poll loop.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Fixed pause between status re-checks.
    pub interval: Duration,
    /// Upper bound on total waiting before giving up.
    pub max_wait: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_wait: Duration::from_secs(600),
        }
    }
}

/// Terminal outcome of a poll loop.
#[derive(Debug)]
pub enum PollOutcome {
    /// The file reached `ACTIVE` and is ready for inference.
    Ready(RemoteFile),
    /// The remote service reported `FAILED`. Terminal; never retried.
    Failed,
    /// `max_wait` elapsed without the file leaving `PROCESSING`.
    TimedOut,
    /// The caller cancelled the wait.
    Cancelled,
}

/// Poll an uploaded file until it is ready, failed, timed out, or
/// cancelled.
///
/// Starts from the state reported at upload time, so a file that is
/// already `ACTIVE` returns without sleeping. One status fetch follows
/// each pause; a file that reports `PROCESSING` exactly k times costs
/// exactly k pauses.
pub async fn poll_until_ready(
    client: &GeminiClient,
    uploaded: RemoteFile,
    config: &PollConfig,
    cancel: &CancellationToken,
) -> Result<PollOutcome, GeminiApiError> {
    poll_with(uploaded, |name| client_fetch(client, name), config, cancel).await
}

async fn client_fetch(client: &GeminiClient, name: String) -> Result<RemoteFile, GeminiApiError> {
    client.get_file(&name).await
}

/// Poll loop over an arbitrary status-fetch function.
///
/// Split out from [`poll_until_ready`] so the loop can be exercised
/// without a live endpoint.
pub async fn poll_with<F, Fut>(
    uploaded: RemoteFile,
    mut fetch: F,
    config: &PollConfig,
    cancel: &CancellationToken,
) -> Result<PollOutcome, GeminiApiError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<RemoteFile, GeminiApiError>>,
{
    let mut file = uploaded;
    let mut waited = Duration::ZERO;

    loop {
        match file.state {
            FileState::Active => return Ok(PollOutcome::Ready(file)),
            FileState::Failed => {
                tracing::warn!(name = %file.name, "Remote video processing failed");
                return Ok(PollOutcome::Failed);
            }
            // Unknown states are treated like PROCESSING: keep checking
            // until the bound runs out.
            FileState::Processing | FileState::Unknown => {}
        }

        if waited >= config.max_wait {
            tracing::warn!(
                name = %file.name,
                waited_secs = waited.as_secs(),
                "Gave up waiting for remote processing",
            );
            return Ok(PollOutcome::TimedOut);
        }

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!(name = %file.name, "Processing wait cancelled");
                return Ok(PollOutcome::Cancelled);
            }
            _ = tokio::time::sleep(config.interval) => {}
        }
        waited += config.interval;

        file = fetch(file.name.clone()).await?;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
