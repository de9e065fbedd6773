//! Scoring orchestrator.
//!
//! The engine is the public entry point for authenticity scoring. It owns
//! the model provider, the heuristic scorer and the label thresholds.
//!
//! # Execution Flow
//! 1. Empty input short-circuits to a fixed `suspect` verdict
//! 2. Ask the provider for artifacts
//! 3. If available, vectorize and classify; on any failure fall back
//! 4. Otherwise score heuristically
//! 5. Label the confidence with the shared thresholds
//!
//! `predict` never returns an error and never panics on model failure.

use std::panic::{self, AssertUnwindSafe};

use postcheck_core::{
    Calibration, EngineConfig, HeuristicScorer, Thresholds, Verdict, VerdictSource,
};

use crate::artifacts::{
    genuine_probability, panic_message, Classifier, ClassifierArtifacts, ModelError,
};
use crate::fallback::FallbackReason;
use crate::provider::{ModelAvailability, ModelProvider};

/// Explanation attached to every model verdict.
pub const MODEL_EXPLANATION: &str = "model-based prediction";

/// A verdict plus the reason the model was bypassed, if it was.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub verdict: Verdict,
    pub fallback: Option<FallbackReason>,
}

/// Two-tier authenticity scoring engine.
///
/// Safe to share between threads; the only mutable state is the
/// provider's artifact cache.
pub struct Engine {
    provider: ModelProvider,
    scorer: HeuristicScorer,
    thresholds: Thresholds,
}

impl Engine {
    /// Create an engine from a provider and calibration.
    pub fn new(provider: ModelProvider, calibration: &Calibration) -> Self {
        Self {
            provider,
            scorer: HeuristicScorer::with_calibration(calibration),
            thresholds: calibration.thresholds(),
        }
    }

    /// Create an engine with file-backed artifacts as configured.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            ModelProvider::from_config(&config.artifacts),
            &config.calibration,
        )
    }

    /// Engine that never consults a model.
    pub fn heuristic_only() -> Self {
        Self::new(ModelProvider::disabled(), &Calibration::default())
    }

    pub fn provider(&self) -> &ModelProvider {
        &self.provider
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Score a posting.
    pub fn predict(&self, text: &str) -> Verdict {
        self.predict_explained(text).verdict
    }

    /// Score a posting and report whether and why the model was bypassed.
    pub fn predict_explained(&self, text: &str) -> Prediction {
        let text = text.trim();
        if text.is_empty() {
            return Prediction {
                verdict: Verdict::empty_submission(),
                fallback: Some(FallbackReason::EmptyInput),
            };
        }

        let prediction = match self.provider.get_classifier() {
            ModelAvailability::Unavailable => {
                self.heuristic(text, FallbackReason::ModelUnavailable)
            }
            ModelAvailability::Available(artifacts) => match run_model(&artifacts, text) {
                Ok(confidence) => Prediction {
                    verdict: Verdict::new(
                        confidence,
                        MODEL_EXPLANATION,
                        VerdictSource::Model,
                        &self.thresholds,
                    ),
                    fallback: None,
                },
                Err(e) => {
                    tracing::warn!(error = %e, "Model prediction failed, falling back to heuristic");
                    self.heuristic(
                        text,
                        FallbackReason::ModelFailed {
                            error: e.to_string(),
                        },
                    )
                }
            },
        };

        tracing::debug!(
            label = %prediction.verdict.label,
            confidence = prediction.verdict.confidence,
            source = %prediction.verdict.source,
            "Posting scored"
        );

        prediction
    }

    fn heuristic(&self, text: &str, reason: FallbackReason) -> Prediction {
        let result = self.scorer.score(text);
        Prediction {
            verdict: Verdict::new(
                result.score,
                result.explanation(),
                VerdictSource::Heuristic,
                &self.thresholds,
            ),
            fallback: Some(reason),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

/// Vectorize and classify, converting every failure (including panics in
/// the model code) into a `ModelError`.
fn run_model(artifacts: &ClassifierArtifacts, text: &str) -> Result<f64, ModelError> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> Result<f64, ModelError> {
        let features = artifacts.vectorizer.transform(text)?;
        match &artifacts.classifier {
            Classifier::Probabilistic(model) => {
                let probs = model.predict_proba(&features)?;
                genuine_probability(model.classes(), &probs)
            }
            Classifier::Label(model) => Ok(if model.predict(&features)? { 1.0 } else { 0.0 }),
        }
    }));

    let confidence = match outcome {
        Ok(result) => result?,
        Err(payload) => return Err(ModelError::Panicked(panic_message(payload.as_ref()))),
    };

    if !confidence.is_finite() || !(0.0..=1.0).contains(&confidence) {
        return Err(ModelError::InvalidOutput(format!(
            "confidence {} outside [0, 1]",
            confidence
        )));
    }

    Ok(confidence)
}
