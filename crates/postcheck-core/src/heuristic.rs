//! Heuristic scorer.
//!
//! Scores a posting against the red-flag registry. Every triggered category
//! costs a flat penalty; the penalty count saturates at `penalty_cap`.
//!
//! ## Saturation
//!
//! With the default penalty (0.25) and cap (4) a posting that triggers four
//! categories already scores 0.0. A fifth category cannot push the score
//! lower. This is intended: the score is a floor-clamped confidence, not a
//! count of flags.

use serde::{Deserialize, Serialize};

use crate::config::Calibration;
use crate::patterns::{registry, RedFlag};

/// Reason emitted when nothing triggers.
pub const NO_FLAGS_REASON: &str = "No obvious red flags detected; use judgment.";

/// Output of one heuristic scoring call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicResult {
    /// Confidence in [0.0, 1.0]
    pub score: f64,

    /// Triggered categories, in registry order
    pub triggered: Vec<RedFlag>,

    /// One sentence per triggered category, or the default reason
    pub reasons: Vec<String>,
}

impl HeuristicResult {
    /// Reasons joined into a single display string.
    pub fn explanation(&self) -> String {
        self.reasons.join("; ")
    }

    pub fn is_triggered(&self, flag: RedFlag) -> bool {
        self.triggered.contains(&flag)
    }
}

/// Rule-based scorer over the red-flag registry.
#[derive(Debug, Clone)]
pub struct HeuristicScorer {
    flag_penalty: f64,
    penalty_cap: usize,
}

impl HeuristicScorer {
    pub fn new() -> Self {
        Self::with_calibration(&Calibration::default())
    }

    pub fn with_calibration(calibration: &Calibration) -> Self {
        Self {
            flag_penalty: calibration.flag_penalty,
            penalty_cap: calibration.penalty_cap,
        }
    }

    /// Score free text. Pure: same input, same result.
    pub fn score(&self, text: &str) -> HeuristicResult {
        let lowered = text.to_lowercase();

        // Each category short-circuits on its first matching rule, but all
        // categories are always checked.
        let triggered: Vec<RedFlag> = registry()
            .iter()
            .filter(|category| category.matches(&lowered))
            .map(|category| category.flag)
            .collect();

        let score = self.score_for_count(triggered.len());

        let mut reasons: Vec<String> = triggered.iter().map(|f| f.reason().to_string()).collect();
        if reasons.is_empty() {
            reasons.push(NO_FLAGS_REASON.to_string());
        }

        tracing::trace!(triggered = ?triggered, score, "Heuristic scored posting");

        HeuristicResult {
            score,
            triggered,
            reasons,
        }
    }

    /// `max(0, 1 - penalty * min(cap, count))`
    pub fn score_for_count(&self, count: usize) -> f64 {
        let penalised = count.min(self.penalty_cap) as f64;
        (1.0 - self.flag_penalty * penalised).max(0.0)
    }
}

impl Default for HeuristicScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Score with the default calibration.
pub fn score(text: &str) -> HeuristicResult {
    HeuristicScorer::new().score(text)
}
