//! Multinomial naive Bayes classifier.

use serde::Deserialize;

use super::{ArtifactError, FeatureVector, ModelError, ProbabilisticClassifier};

/// A fitted multinomial naive Bayes model.
#[derive(Debug, Clone, Deserialize)]
pub struct MultinomialNb {
    pub classes: Vec<String>,

    /// Log prior per class
    pub class_log_prior: Vec<f64>,

    /// Log P(feature | class), one row per class
    pub feature_log_prob: Vec<Vec<f64>>,
}

impl MultinomialNb {
    pub fn n_features(&self) -> usize {
        self.feature_log_prob.first().map_or(0, Vec::len)
    }

    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        let n_classes = self.classes.len();
        if n_classes == 0 {
            return Err(ArtifactError::Incompatible(
                "naive bayes model has no classes".to_string(),
            ));
        }

        if self.class_log_prior.len() != n_classes || self.feature_log_prob.len() != n_classes {
            return Err(ArtifactError::Incompatible(format!(
                "{} classes but {} priors and {} probability rows",
                n_classes,
                self.class_log_prior.len(),
                self.feature_log_prob.len()
            )));
        }

        let n_features = self.n_features();
        if n_features == 0 || self.feature_log_prob.iter().any(|row| row.len() != n_features) {
            return Err(ArtifactError::Incompatible(
                "feature_log_prob rows must be non-empty and equal length".to_string(),
            ));
        }

        Ok(())
    }

    fn joint_log_likelihood(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError> {
        self.class_log_prior
            .iter()
            .zip(&self.feature_log_prob)
            .map(|(prior, row)| Ok(prior + features.dot(row)?))
            .collect()
    }
}

impl ProbabilisticClassifier for MultinomialNb {
    fn classes(&self) -> Option<&[String]> {
        Some(&self.classes)
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError> {
        let jll = self.joint_log_likelihood(features)?;

        // Normalize in log space before exponentiating.
        let max = jll.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let log_norm = max + jll.iter().map(|v| (v - max).exp()).sum::<f64>().ln();

        Ok(jll.iter().map(|v| (v - log_norm).exp()).collect())
    }
}
