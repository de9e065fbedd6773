//! # postcheck-core
//!
//! Deterministic authenticity scoring for job and internship postings.
//!
//! This crate answers one question for a piece of free text: does this
//! posting look genuine, suspect, or fake?
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: Same input always produces same output
//! 2. **No model calls**: All scoring here is rule-based
//! 3. **Explained**: Every verdict carries a human-readable justification
//! 4. **Shared scale**: One threshold rule labels every confidence value
//!
//! The optional learned tier lives in `postcheck-runtime`, which falls back
//! to this crate whenever no model is available.
//!
//! ## Example
//!
//! ```rust
//! use postcheck_core::{evaluate, Label};
//!
//! let verdict = evaluate("Pay a registration fee and message us on WhatsApp. Urgent hiring!");
//! assert_eq!(verdict.label, Label::Fake);
//! println!("{} ({}%): {}", verdict.label, verdict.percent(), verdict.explanation);
//! ```

pub mod config;
pub mod heuristic;
pub mod patterns;
pub mod types;

// Re-export main types at crate root
pub use config::{ArtifactsConfig, Calibration, ConfigError, EngineConfig};
pub use heuristic::{HeuristicResult, HeuristicScorer, NO_FLAGS_REASON};
pub use patterns::{registry, RedFlag, RedFlagCategory};
pub use types::{clamp_confidence, confidence_percent, Label, Thresholds, Verdict, VerdictSource};

/// Score a posting with the heuristic tier only, using default calibration.
///
/// Empty or whitespace-only text yields the fixed empty-submission verdict.
pub fn evaluate(text: &str) -> Verdict {
    evaluate_with_calibration(text, &Calibration::default())
}

/// Score a posting with the heuristic tier only.
pub fn evaluate_with_calibration(text: &str, calibration: &Calibration) -> Verdict {
    let text = text.trim();
    if text.is_empty() {
        return Verdict::empty_submission();
    }

    let result = HeuristicScorer::with_calibration(calibration).score(text);
    Verdict::new(
        result.score,
        result.explanation(),
        VerdictSource::Heuristic,
        &calibration.thresholds(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scam_posting_is_fake() {
        let verdict = evaluate(
            "Pay ₹500 registration fee, contact us on WhatsApp, urgent hiring, no experience required",
        );
        assert_eq!(verdict.label, Label::Fake);
        assert_eq!(verdict.confidence, 0.25);
        assert_eq!(verdict.source, VerdictSource::Heuristic);
        assert!(verdict.explanation.starts_with("Mentions fees/payments"));
    }

    #[test]
    fn test_clean_posting_is_genuine() {
        let verdict = evaluate(
            "We are hiring a backend engineering intern to work on our payments API, apply via our corporate portal.",
        );
        assert_eq!(verdict.label, Label::Genuine);
        assert_eq!(verdict.confidence, 1.0);
        assert_eq!(verdict.percent(), 100);
    }

    #[test]
    fn test_single_flag_stays_above_genuine_threshold() {
        // 0.75 >= 0.70, so one flag alone still labels genuine.
        let verdict = evaluate("Contact hr@gmail.com for details");
        assert_eq!(verdict.confidence, 0.75);
        assert_eq!(verdict.label, Label::Genuine);
    }

    #[test]
    fn test_two_flags_is_suspect() {
        let verdict = evaluate("Contact hr@gmail.com or ping us on telegram");
        assert_eq!(verdict.confidence, 0.5);
        assert_eq!(verdict.label, Label::Suspect);
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(evaluate(""), Verdict::empty_submission());
        assert_eq!(evaluate("   \n\t"), Verdict::empty_submission());
    }

    #[test]
    fn test_calibration_changes_labels() {
        let strict = Calibration {
            genuine_threshold: 0.9,
            ..Calibration::default()
        };
        let verdict = evaluate_with_calibration("Contact hr@gmail.com for details", &strict);
        assert_eq!(verdict.label, Label::Suspect);
    }
}
