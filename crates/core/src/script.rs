//! Reference-script capture.
//!
//! A script can be pasted as text or uploaded as a text file. Once
//! captured for a run it is immutable; the prompt builder decides whether
//! it is long enough to audit against.

use crate::error::CoreError;
use crate::prompt::script_is_usable;

/// Capture the reference script for one run.
///
/// Pasted text wins when both inputs are present. Uploaded bytes must be
/// valid UTF-8. Returns `None` when the captured text is too short to be
/// treated as a script (the run proceeds as a blind audit).
pub fn capture_script(
    pasted: Option<&str>,
    uploaded: Option<&[u8]>,
) -> Result<Option<String>, CoreError> {
    let text = match (pasted, uploaded) {
        (Some(p), _) if !p.trim().is_empty() => p.to_string(),
        (_, Some(bytes)) => std::str::from_utf8(bytes)
            .map_err(|_| {
                CoreError::Validation("Uploaded script file is not valid UTF-8".to_string())
            })?
            .to_string(),
        _ => return Ok(None),
    };

    if script_is_usable(&text) {
        Ok(Some(text))
    } else {
        Ok(None)
    }
}
