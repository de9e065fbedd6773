//! Trained artifacts: a text vectorizer and a classifier.
//!
//! Both are exported by the training pipeline as JSON documents tagged by
//! `kind`. The classifier's output shape (probabilities or a hard label) is
//! resolved once, at load time, into a [`Classifier`] variant.
//!
//! ## Formats
//!
//! | Artifact | `kind` | Shape |
//! |----------|--------|-------|
//! | vectorizer | `tfidf` | sparse TF-IDF features |
//! | classifier | `multinomial_nb` | probabilistic, with classes |
//! | classifier | `logistic_regression` | probabilistic, binary |
//! | classifier | `linear_svc` | hard label |

use serde::Deserialize;
use std::any::Any;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

mod linear;
mod naive_bayes;
mod tfidf;

pub use linear::{LinearSvc, LogisticRegression};
pub use naive_bayes::MultinomialNb;
pub use tfidf::{Norm, TfIdfVectorizer};

/// Class label whose probability is read as "genuine" confidence.
pub const GENUINE_CLASS: &str = "genuine";

/// Errors while loading an artifact. Never surfaced past the provider.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("Artifact not found: {}", .0.display())]
    Missing(PathBuf),

    #[error("Failed to read artifact: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse artifact: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Incompatible artifact: {0}")]
    Incompatible(String),

    #[error("Model tier disabled")]
    Disabled,
}

/// Errors while running a loaded model. Never surfaced past the engine.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Feature dimension mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Invalid model output: {0}")]
    InvalidOutput(String),

    #[error("Model panicked: {0}")]
    Panicked(String),
}

/// Sparse feature vector produced by a vectorizer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    dim: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    /// Build from `(column, value)` pairs. Columns must be `< dim`.
    pub fn new(dim: usize, entries: Vec<(usize, f64)>) -> Self {
        Self { dim, entries }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Non-zero entries, ordered by column.
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dot product with a dense row of the same dimension.
    pub fn dot(&self, dense: &[f64]) -> Result<f64, ModelError> {
        if dense.len() != self.dim {
            return Err(ModelError::ShapeMismatch {
                expected: dense.len(),
                actual: self.dim,
            });
        }
        Ok(self.entries.iter().map(|&(j, v)| v * dense[j]).sum())
    }
}

/// Turns text into features.
pub trait TextVectorizer: Send + Sync {
    fn transform(&self, text: &str) -> Result<FeatureVector, ModelError>;
}

/// A classifier exposing a probability per class.
pub trait ProbabilisticClassifier: Send + Sync {
    /// Known class labels, aligned with `predict_proba` output, if the model has them.
    fn classes(&self) -> Option<&[String]>;

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError>;
}

/// A classifier exposing only a hard binary label.
pub trait LabelClassifier: Send + Sync {
    /// `true` for a positive prediction.
    fn predict(&self, features: &FeatureVector) -> Result<bool, ModelError>;
}

/// A loaded classifier, tagged by output shape.
#[derive(Clone)]
pub enum Classifier {
    Probabilistic(Arc<dyn ProbabilisticClassifier>),
    Label(Arc<dyn LabelClassifier>),
}

impl Classifier {
    pub fn kind(&self) -> &'static str {
        match self {
            Classifier::Probabilistic(_) => "probabilistic",
            Classifier::Label(_) => "label",
        }
    }
}

impl fmt::Debug for Classifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Classifier").field(&self.kind()).finish()
    }
}

/// A vectorizer and classifier that were both loaded.
#[derive(Clone)]
pub struct ClassifierArtifacts {
    pub vectorizer: Arc<dyn TextVectorizer>,
    pub classifier: Classifier,
}

impl ClassifierArtifacts {
    pub fn new(vectorizer: Arc<dyn TextVectorizer>, classifier: Classifier) -> Self {
        Self {
            vectorizer,
            classifier,
        }
    }
}

impl fmt::Debug for ClassifierArtifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassifierArtifacts")
            .field("classifier", &self.classifier)
            .finish_non_exhaustive()
    }
}

/// Pick the confidence out of a probability distribution.
///
/// Uses the probability of the `genuine` class when the model knows that
/// label. Otherwise falls back to the largest probability, whatever class
/// it belongs to. That fallback is an approximation: for a model trained on
/// a different label vocabulary it can report confidence in the wrong class.
pub fn genuine_probability(classes: Option<&[String]>, probs: &[f64]) -> Result<f64, ModelError> {
    if probs.is_empty() {
        return Err(ModelError::InvalidOutput(
            "empty probability vector".to_string(),
        ));
    }

    if let Some(p) = probs.iter().find(|p| !p.is_finite() || !(0.0..=1.0).contains(*p)) {
        return Err(ModelError::InvalidOutput(format!(
            "probability {} outside [0, 1]",
            p
        )));
    }

    if let Some(idx) = classes.and_then(|c| c.iter().position(|label| label == GENUINE_CLASS)) {
        return probs.get(idx).copied().ok_or_else(|| {
            ModelError::InvalidOutput(format!(
                "{} probabilities for at least {} classes",
                probs.len(),
                idx + 1
            ))
        });
    }

    Ok(probs.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

/// Text carried by a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum VectorizerDocument {
    Tfidf(TfIdfVectorizer),
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ClassifierDocument {
    MultinomialNb(MultinomialNb),
    LogisticRegression(LogisticRegression),
    LinearSvc(LinearSvc),
}

/// Parse a vectorizer document.
pub fn parse_vectorizer(json: &str) -> Result<Arc<dyn TextVectorizer>, ArtifactError> {
    match serde_json::from_str::<VectorizerDocument>(json)? {
        VectorizerDocument::Tfidf(v) => {
            v.validate()?;
            Ok(Arc::new(v))
        }
    }
}

/// Parse a classifier document and resolve its output shape.
pub fn parse_classifier(json: &str) -> Result<Classifier, ArtifactError> {
    let classifier = match serde_json::from_str::<ClassifierDocument>(json)? {
        ClassifierDocument::MultinomialNb(m) => {
            m.validate()?;
            Classifier::Probabilistic(Arc::new(m))
        }
        ClassifierDocument::LogisticRegression(m) => {
            m.validate()?;
            Classifier::Probabilistic(Arc::new(m))
        }
        ClassifierDocument::LinearSvc(m) => {
            m.validate()?;
            Classifier::Label(Arc::new(m))
        }
    };
    Ok(classifier)
}

/// Load a vectorizer from disk.
pub fn load_vectorizer(path: &Path) -> Result<Arc<dyn TextVectorizer>, ArtifactError> {
    parse_vectorizer(&read_artifact(path)?)
}

/// Load a classifier from disk.
pub fn load_classifier(path: &Path) -> Result<Classifier, ArtifactError> {
    parse_classifier(&read_artifact(path)?)
}

fn read_artifact(path: &Path) -> Result<String, ArtifactError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ArtifactError::Missing(path.to_path_buf()),
        _ => ArtifactError::IoError(e),
    })
}
