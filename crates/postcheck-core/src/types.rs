//! Verdict types shared by the heuristic and model tiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trust judgment for a posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Genuine,
    Suspect,
    Fake,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Genuine => "genuine",
            Label::Suspect => "suspect",
            Label::Fake => "fake",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which tier produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictSource {
    Model,
    Heuristic,
}

impl fmt::Display for VerdictSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerdictSource::Model => f.write_str("model"),
            VerdictSource::Heuristic => f.write_str("heuristic"),
        }
    }
}

/// Label thresholds applied to a confidence value.
///
/// The same instance labels model and heuristic confidences, so both
/// sources are read on one scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Confidence at or above this is `genuine`
    pub genuine: f64,

    /// Confidence at or below this is `fake`
    pub fake: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            genuine: 0.70,
            fake: 0.40,
        }
    }
}

impl Thresholds {
    /// Map a confidence to a label.
    ///
    /// Total over all inputs: anything that is neither `>= genuine` nor
    /// `<= fake` (including NaN) is `suspect`.
    pub fn label_for(&self, confidence: f64) -> Label {
        if confidence >= self.genuine {
            Label::Genuine
        } else if confidence <= self.fake {
            Label::Fake
        } else {
            Label::Suspect
        }
    }
}

/// The engine's answer for one posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    pub label: Label,

    /// Always within [0.0, 1.0]
    pub confidence: f64,

    /// Human-readable justification
    pub explanation: String,

    pub source: VerdictSource,
}

impl Verdict {
    /// Build a verdict, clamping confidence and deriving the label.
    pub fn new(
        confidence: f64,
        explanation: impl Into<String>,
        source: VerdictSource,
        thresholds: &Thresholds,
    ) -> Self {
        let confidence = clamp_confidence(confidence);
        Self {
            label: thresholds.label_for(confidence),
            confidence,
            explanation: explanation.into(),
            source,
        }
    }

    /// The fixed result for empty or whitespace-only submissions.
    pub fn empty_submission() -> Self {
        Self {
            label: Label::Suspect,
            confidence: 0.0,
            explanation: "empty text submitted".to_string(),
            source: VerdictSource::Heuristic,
        }
    }

    /// Confidence as a whole percentage for display.
    pub fn percent(&self) -> u8 {
        confidence_percent(self.confidence)
    }
}

/// Clamp into [0.0, 1.0]. NaN becomes 0.0.
pub fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

/// Round a confidence to the nearest whole percent, clamped to 0..=100.
///
/// Non-finite input yields 0, except +inf which clamps to 100.
pub fn confidence_percent(confidence: f64) -> u8 {
    if confidence.is_nan() {
        return 0;
    }
    (confidence * 100.0).round().clamp(0.0, 100.0) as u8
}
