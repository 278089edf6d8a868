//! Scoped staging of uploaded video bytes.
//!
//! The uploaded video is written to a uniquely named temp file for the
//! duration of one run. Removal is a scoped-resource obligation, not
//! optional cleanup: the file must not outlive the run on any exit path,
//! so the guard removes it on `Drop`.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// A staged video temp file, removed when the guard is dropped.
#[derive(Debug)]
pub struct StagedVideo {
    path: PathBuf,
}

impl StagedVideo {
    /// Write `bytes` to a uniquely named file under `staging_dir`.
    ///
    /// The directory is created if missing. The file name is prefixed
    /// with a UUID so concurrent sessions never collide.
    pub async fn create(
        staging_dir: &str,
        display_name: &str,
        bytes: &[u8],
    ) -> std::io::Result<StagedVideo> {
        tokio::fs::create_dir_all(staging_dir).await?;

        // Keep only the basename of whatever the browser sent.
        let basename = display_name.rsplit(['/', '\\']).next().unwrap_or("video");
        let path = Path::new(staging_dir).join(format!("{}-{basename}", Uuid::new_v4()));

        tokio::fs::write(&path, bytes).await?;
        tracing::debug!(path = %path.display(), size = bytes.len(), "Staged video");
        Ok(StagedVideo { path })
    }

    /// Path of the staged file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedVideo {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            // Already-gone files are fine; anything else is worth a log.
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove staged video");
            }
        }
    }
}
