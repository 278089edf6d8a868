//! Severity vocabulary and presentation classification.
//!
//! Severities arrive as free-text labels produced by the model. They are
//! classified case-insensitively into a fixed vocabulary; classification
//! drives presentation emphasis only and never rewrites row content.

use serde::{Deserialize, Serialize};

/// Canonical severity labels the output contract asks the model to use.
pub const SEVERITY_VOCABULARY: &[&str] = &["Critical", "Major", "Minor", "Pass"];

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Classified severity of one audit finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Critical,
    Major,
    Minor,
    /// Explicit "nothing wrong here" marker some model revisions emit.
    Pass,
    /// Any label outside the fixed vocabulary.
    Unknown,
}

impl Severity {
    /// Classify a free-text severity label.
    ///
    /// Matching is case-insensitive and substring-based ("CRITICAL ERROR"
    /// still classifies as `Critical`, matching the source behavior of
    /// highlighting on `'Critical' in val`). Classification is idempotent:
    /// classifying a canonical label returns the variant it names.
    pub fn classify(label: &str) -> Severity {
        let lower = label.to_lowercase();
        if lower.contains("critical") {
            Severity::Critical
        } else if lower.contains("major") {
            Severity::Major
        } else if lower.contains("minor") {
            Severity::Minor
        } else if lower.contains("pass") {
            Severity::Pass
        } else {
            Severity::Unknown
        }
    }

    /// Canonical display label for this severity.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::Major => "Major",
            Severity::Minor => "Minor",
            Severity::Pass => "Pass",
            Severity::Unknown => "Unknown",
        }
    }

    /// Presentation emphasis for this severity under the given policy.
    pub fn highlight(&self, policy: UnknownSeverityPolicy) -> Highlight {
        match self {
            Severity::Critical => Highlight::Strong,
            Severity::Major => Highlight::Medium,
            Severity::Minor => Highlight::Subtle,
            Severity::Pass => Highlight::None,
            Severity::Unknown => match policy {
                UnknownSeverityPolicy::Keep => Highlight::None,
                UnknownSeverityPolicy::FoldIntoMinor => Highlight::Subtle,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Highlight
// ---------------------------------------------------------------------------

/// Visual emphasis applied to a row. Presentation-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    /// Strongest highlight (critical findings).
    Strong,
    /// Medium highlight (major findings).
    Medium,
    /// De-emphasized (minor findings).
    Subtle,
    /// No highlight.
    None,
}

// ---------------------------------------------------------------------------
// Unknown-severity policy
// ---------------------------------------------------------------------------

/// How severity labels outside the fixed vocabulary are presented.
///
/// The upstream behavior is undefined here, so it is an explicit
/// configuration choice rather than an inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownSeverityPolicy {
    /// Keep unknown labels as-is with no highlight.
    #[default]
    Keep,
    /// Present unknown labels with the same subtle emphasis as `Minor`.
    FoldIntoMinor,
}

impl UnknownSeverityPolicy {
    /// Parse a policy from its configuration string.
    ///
    /// Accepts `keep` and `fold-into-minor`. Anything else is `None`.
    pub fn parse(s: &str) -> Option<UnknownSeverityPolicy> {
        match s {
            "keep" => Some(UnknownSeverityPolicy::Keep),
            "fold-into-minor" => Some(UnknownSeverityPolicy::FoldIntoMinor),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Classification --

    #[test]
    fn classify_is_case_insensitive() {
        assert_eq!(Severity::classify("CRITICAL"), Severity::Critical);
        assert_eq!(Severity::classify("Critical"), Severity::Critical);
        assert_eq!(Severity::classify("critical"), Severity::Critical);
        assert_eq!(Severity::classify("mAjOr"), Severity::Major);
    }

    #[test]
    fn classify_matches_substrings() {
        assert_eq!(Severity::classify("CRITICAL ERROR"), Severity::Critical);
        assert_eq!(Severity::classify("minor issue"), Severity::Minor);
    }

    #[test]
    fn classify_is_idempotent_on_canonical_labels() {
        for sev in [
            Severity::Critical,
            Severity::Major,
            Severity::Minor,
            Severity::Pass,
        ] {
            assert_eq!(Severity::classify(sev.label()), sev);
        }
    }

    #[test]
    fn classify_unknown_labels() {
        assert_eq!(Severity::classify("Blocker"), Severity::Unknown);
        assert_eq!(Severity::classify(""), Severity::Unknown);
    }

    // -- Highlighting --

    #[test]
    fn highlight_ladder() {
        let p = UnknownSeverityPolicy::Keep;
        assert_eq!(Severity::Critical.highlight(p), Highlight::Strong);
        assert_eq!(Severity::Major.highlight(p), Highlight::Medium);
        assert_eq!(Severity::Minor.highlight(p), Highlight::Subtle);
        assert_eq!(Severity::Pass.highlight(p), Highlight::None);
    }

    #[test]
    fn unknown_highlight_follows_policy() {
        assert_eq!(
            Severity::Unknown.highlight(UnknownSeverityPolicy::Keep),
            Highlight::None
        );
        assert_eq!(
            Severity::Unknown.highlight(UnknownSeverityPolicy::FoldIntoMinor),
            Highlight::Subtle
        );
    }

    #[test]
    fn pass_never_folds_into_minor() {
        assert_eq!(
            Severity::Pass.highlight(UnknownSeverityPolicy::FoldIntoMinor),
            Highlight::None
        );
    }

    // -- Policy parsing --

    #[test]
    fn policy_parses_known_values() {
        assert_eq!(
            UnknownSeverityPolicy::parse("keep"),
            Some(UnknownSeverityPolicy::Keep)
        );
        assert_eq!(
            UnknownSeverityPolicy::parse("fold-into-minor"),
            Some(UnknownSeverityPolicy::FoldIntoMinor)
        );
        assert_eq!(UnknownSeverityPolicy::parse("minor"), None);
    }
}
