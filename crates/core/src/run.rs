//! Audit run lifecycle types.
//!
//! One run is a fresh pass through `Idle -> Uploading -> Polling ->
//! Requesting -> Rendered | Failed`. The only state that survives a run is
//! the session's last [`RunOutcome`], replaced wholesale on the next run.

use serde::{Deserialize, Serialize};

use crate::report::AuditIssue;

/// Phase of an in-flight audit run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Idle,
    Uploading,
    Polling,
    Requesting,
    Rendered,
    Failed,
}

/// Terminal result of a run, held in the session's last-result slot.
///
/// `Clean`, `NotRun`, and `ParseFailure` are deliberately distinct
/// states: an empty findings array means "clean audit", not "nothing
/// happened" and not "error".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    /// No audit has been run in this session yet.
    NotRun,
    /// The model returned an empty findings array.
    Clean,
    /// The model returned one or more findings.
    Findings { rows: Vec<AuditIssue> },
    /// The response text was not a valid report; raw text preserved.
    ParseFailure { raw: String, message: String },
    /// Upload, processing, or inference failed before a report existed.
    RunFailed { message: String },
}

impl RunOutcome {
    /// Rows to display and export. Only `Clean` and `Findings` have any;
    /// `Clean` exports as a header-only CSV.
    pub fn rows(&self) -> Option<&[AuditIssue]> {
        match self {
            RunOutcome::Clean => Some(&[]),
            RunOutcome::Findings { rows } => Some(rows),
            _ => None,
        }
    }
}
