//! Domain logic for the forensic video QA auditor.
//!
//! Everything in this crate is pure: prompt construction, severity
//! classification, report parsing, CSV export, and the run lifecycle
//! types. All remote I/O lives in `vidqa-gemini`; all HTTP surface in
//! `vidqa-api`.

pub mod csv;
pub mod error;
pub mod prompt;
pub mod report;
pub mod run;
pub mod script;
pub mod severity;
