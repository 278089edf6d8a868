//! CSV export of audit reports.
//!
//! The export must show exactly the rows and column order of the display
//! table, with a fixed header, UTF-8 text, and no index column, and must
//! be byte-for-byte reproducible for the same input rows.

use crate::report::{AuditIssue, REPORT_COLUMNS};

/// Serialize audit rows to CSV.
///
/// Header matches [`REPORT_COLUMNS`]; one row per issue in input order;
/// `\n` line endings. Fields containing commas, quotes, or newlines are
/// quoted per RFC 4180 (the model's free text routinely contains commas).
pub fn report_to_csv(issues: &[AuditIssue]) -> String {
    let mut out = String::new();
    out.push_str(&REPORT_COLUMNS.join(","));
    out.push('\n');

    for issue in issues {
        let fields = [
            &issue.timestamp,
            &issue.severity,
            &issue.category,
            &issue.issue_description,
            &issue.suggested_fix,
        ];
        let row: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Quote a field if it contains a delimiter, quote, or line break.
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
