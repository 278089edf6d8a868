//! Audit prompt construction.
//!
//! The prompt is the entire "algorithm" sent to the model: a fixed
//! forensic checklist, the reference script (or a blind-audit marker when
//! none is usable), and the output contract describing the exact JSON
//! shape of the findings. Construction is pure string assembly so the
//! same inputs always produce byte-identical text.

// ---------------------------------------------------------------------------
// Thresholds and markers
// ---------------------------------------------------------------------------

/// Trimmed script text at or below this length counts as "not provided".
pub const MIN_SCRIPT_LEN: usize = 10;

/// Sentinel injected into the prompt when no usable script is supplied.
pub const BLIND_AUDIT_MARKER: &str =
    "SCRIPT NOT PROVIDED - PERFORM A BLIND AUDIT";

/// Returns true when the script is long enough to audit against.
pub fn script_is_usable(script: &str) -> bool {
    script.trim().len() > MIN_SCRIPT_LEN
}

// ---------------------------------------------------------------------------
// Prompt rendering
// ---------------------------------------------------------------------------

/// Render the full audit instruction for one run.
///
/// With a usable script the first checklist item demands strict verbatim
/// comparison against it; without one the marker is injected and the first
/// item switches to narrative and logical-flow checks instead.
///
/// Pure function: identical inputs yield byte-identical output.
pub fn build_audit_prompt(script: Option<&str>) -> String {
    let usable = script.filter(|s| script_is_usable(s));

    let (script_section, fidelity_item) = match usable {
        Some(text) => (
            format!("**Approved Script (ground truth):**\n{}", text.trim()),
            "**Strict Script Fidelity:** Compare narration verbatim against the \
             approved script. Flag skipped lines, ad-libs, reordered sections, \
             or placeholder text (gibberish).",
        ),
        None => (
            format!("**Approved Script:** {BLIND_AUDIT_MARKER}"),
            "**Narrative Coherence:** No script is available, so audit the \
             narrative and logical flow instead. Flag contradictions, abrupt \
             jumps, placeholder text (gibberish), and claims the video itself \
             undermines.",
        ),
    };

    format!(
        "You are a Senior Video Quality Assurance (QA) Auditor. Your auditing \
         style is forensic.\n\
         \n\
         OBJECTIVE:\n\
         Conduct a minute-by-minute audit of the video. Catch every visual, \
         audio, factual, or compliance error.\n\
         \n\
         INPUT CONTEXT:\n\
         1. {script_section}\n\
         \n\
         AUDIT PARAMETERS (The Forensic Checklist):\n\
         1. {fidelity_item}\n\
         2. **Factual Integrity:** CRITICAL. Verify all numbers (GST rates, tax \
         slabs, statistics) against real-world facts. If the video says \"4% \
         GST\" but reality is 5% or 18%, flag it as CRITICAL MISINFORMATION.\n\
         3. **Visual Forensics:** Check text legibility (contrast), prop \
         continuity between shots, and PII leaks on phone screens (names, \
         numbers).\n\
         4. **Compliance:** Ensure parody brands (e.g. \"Bomato\") do not \
         violate trade dress.\n\
         5. **Audio:** Check mix levels, lip sync, and pacing.\n\
         \n\
         OUTPUT INSTRUCTION:\n\
         Analyze the entire video. Return a JSON array of issue objects, each \
         with exactly these string fields: \"timestamp\" (mm:ss), \"severity\" \
         (one of Critical, Major, Minor, Pass), \"category\", \
         \"issue_description\", \"suggested_fix\". Return [] if the video is \
         clean.\n"
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Usability threshold --

    #[test]
    fn short_scripts_are_not_usable() {
        assert!(!script_is_usable(""));
        assert!(!script_is_usable("   "));
        assert!(!script_is_usable("ten chars!"));
        assert!(!script_is_usable("  padded    "));
    }

    #[test]
    fn scripts_over_threshold_are_usable() {
        assert!(script_is_usable("eleven chars"));
        assert!(script_is_usable("Say: Buy now."));
    }

    // -- Blind audit path --

    #[test]
    fn missing_script_injects_marker() {
        let prompt = build_audit_prompt(None);
        assert!(prompt.contains(BLIND_AUDIT_MARKER));
        assert!(prompt.contains("Narrative Coherence"));
    }

    #[test]
    fn short_script_injects_marker_and_omits_text() {
        let prompt = build_audit_prompt(Some("too short"));
        assert!(prompt.contains(BLIND_AUDIT_MARKER));
        assert!(!prompt.contains("too short"));
    }

    // -- Scripted path --

    #[test]
    fn usable_script_is_verbatim_and_marker_absent() {
        let script = "Welcome to our annual tax explainer video.";
        let prompt = build_audit_prompt(Some(script));
        assert!(prompt.contains(script));
        assert!(!prompt.contains(BLIND_AUDIT_MARKER));
        assert!(prompt.contains("Strict Script Fidelity"));
    }

    // -- Determinism --

    #[test]
    fn rendering_is_deterministic() {
        let script = Some("A perfectly ordinary reference script.");
        assert_eq!(build_audit_prompt(script), build_audit_prompt(script));
        assert_eq!(build_audit_prompt(None), build_audit_prompt(None));
    }

    // -- Output contract --

    #[test]
    fn prompt_names_all_five_fields() {
        let prompt = build_audit_prompt(None);
        for field in [
            "timestamp",
            "severity",
            "category",
            "issue_description",
            "suggested_fix",
        ] {
            assert!(prompt.contains(field), "missing field {field}");
        }
    }
}
