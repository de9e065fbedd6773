//! # postcheck-runtime
//!
//! Model-assisted authenticity scoring for postcheck.
//!
//! This crate adds an optional learned tier on top of the deterministic
//! heuristic in `postcheck-core`:
//!
//! - [`ModelProvider`] lazily loads a trained vectorizer and classifier and
//!   caches them for the life of the process
//! - [`Engine`] uses the model when both artifacts are present and usable,
//!   and falls back to the heuristic scorer otherwise
//!
//! ## Important
//!
//! The model tier is OPTIONAL. Missing artifacts are an expected state, not
//! an error, and [`Engine::predict`] always returns a complete [`Verdict`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use postcheck_runtime::{Engine, EngineConfig};
//!
//! let config = EngineConfig::from_file("postcheck.yaml")?;
//! let engine = Engine::from_config(&config);
//!
//! let verdict = engine.predict("Urgent hiring! Pay a small registration fee.");
//! println!("{} ({}%) via {}: {}", verdict.label, verdict.percent(), verdict.source, verdict.explanation);
//! # Ok::<(), postcheck_runtime::ConfigError>(())
//! ```

pub mod artifacts;
pub mod fallback;
pub mod orchestrator;
pub mod provider;

pub use artifacts::{
    ArtifactError, Classifier, ClassifierArtifacts, FeatureVector, LabelClassifier, ModelError,
    ProbabilisticClassifier, TextVectorizer,
};
pub use fallback::FallbackReason;
pub use orchestrator::{Engine, Prediction, MODEL_EXPLANATION};
pub use provider::{
    ArtifactLoader, ArtifactStatus, FileArtifactLoader, ModelAvailability, ModelProvider,
    ProviderStatus,
};

// Core types callers need alongside the engine
pub use postcheck_core::{
    ArtifactsConfig, Calibration, ConfigError, EngineConfig, HeuristicResult, Label, Verdict,
    VerdictSource,
};

