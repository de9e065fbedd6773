//! Why a verdict came from the heuristic tier instead of the model.

use serde::Serialize;
use std::fmt;

/// Reason the engine used heuristic scoring for a call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FallbackReason {
    /// Input was empty after trimming; nothing was scored
    EmptyInput,

    /// The model provider had no usable artifacts
    ModelUnavailable,

    /// The model was loaded but failed on this input
    ModelFailed { error: String },
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::EmptyInput => f.write_str("empty input"),
            FallbackReason::ModelUnavailable => f.write_str("model unavailable"),
            FallbackReason::ModelFailed { error } => write!(f, "model failed: {}", error),
        }
    }
}
