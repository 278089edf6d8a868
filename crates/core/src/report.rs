//! Audit report parsing and normalization.
//!
//! The model is asked for a JSON array of issue objects. Decoding is a
//! single typed decode-or-fail step: either the whole array parses into
//! [`AuditIssue`] rows, or the raw text is handed back untouched inside
//! [`ReportParseError`] for manual inspection. There is no partial table.

use serde::{Deserialize, Serialize};

/// Fixed left-to-right column order for display and CSV export.
pub const REPORT_COLUMNS: [&str; 5] = [
    "timestamp",
    "severity",
    "category",
    "issue_description",
    "suggested_fix",
];

// ---------------------------------------------------------------------------
// AuditIssue
// ---------------------------------------------------------------------------

/// One finding row produced by the model.
///
/// All fields default to empty strings so a row missing a field still
/// decodes; extra fields on the wire are ignored. The application never
/// synthesizes or mutates field content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditIssue {
    /// Position in the video, mm:ss style.
    #[serde(default)]
    pub timestamp: String,
    /// Free-text severity label (classified later, never rewritten).
    #[serde(default)]
    pub severity: String,
    /// Free-text category label.
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub issue_description: String,
    #[serde(default)]
    pub suggested_fix: String,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// The response text was not a JSON array of issue objects.
///
/// Carries the raw text so it can be shown to the user instead of a table.
#[derive(Debug, thiserror::Error)]
#[error("Response was not a valid audit report: {message}")]
pub struct ReportParseError {
    /// The unparseable response body, verbatim.
    pub raw: String,
    /// The underlying JSON error message.
    pub message: String,
}

/// Parse raw model output into audit rows.
///
/// Strips a surrounding Markdown code fence first, since models sometimes
/// wrap their JSON despite the response-format constraint. An empty array
/// is a valid, distinct outcome (clean audit).
pub fn parse_report(raw: &str) -> Result<Vec<AuditIssue>, ReportParseError> {
    let body = strip_code_fence(raw);
    serde_json::from_str::<Vec<AuditIssue>>(body).map_err(|e| ReportParseError {
        raw: raw.to_string(),
        message: e.to_string(),
    })
}

/// Strip a ```json ... ``` (or bare ```) fence wrapping the whole text.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
