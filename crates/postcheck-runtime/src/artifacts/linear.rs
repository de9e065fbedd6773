//! Linear models: logistic regression (probabilistic) and a linear SVM
//! (hard label only).

use serde::Deserialize;

use super::{ArtifactError, FeatureVector, LabelClassifier, ModelError, ProbabilisticClassifier};

fn validate_coef(coef: &[f64], intercept: f64) -> Result<(), ArtifactError> {
    if coef.is_empty() {
        return Err(ArtifactError::Incompatible(
            "linear model has no coefficients".to_string(),
        ));
    }
    if !intercept.is_finite() || coef.iter().any(|c| !c.is_finite()) {
        return Err(ArtifactError::Incompatible(
            "linear model has non-finite weights".to_string(),
        ));
    }
    Ok(())
}

/// Binary logistic regression. Output is `[P(classes[0]), P(classes[1])]`.
#[derive(Debug, Clone, Deserialize)]
pub struct LogisticRegression {
    /// Optional; without it the engine falls back to the most probable class
    #[serde(default)]
    pub classes: Option<Vec<String>>,

    pub coef: Vec<f64>,

    #[serde(default)]
    pub intercept: f64,
}

impl LogisticRegression {
    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        validate_coef(&self.coef, self.intercept)?;
        if let Some(classes) = &self.classes {
            if classes.len() != 2 {
                return Err(ArtifactError::Incompatible(format!(
                    "binary logistic regression needs 2 classes, got {}",
                    classes.len()
                )));
            }
        }
        Ok(())
    }
}

impl ProbabilisticClassifier for LogisticRegression {
    fn classes(&self) -> Option<&[String]> {
        self.classes.as_deref()
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError> {
        let z = features.dot(&self.coef)? + self.intercept;
        let p = 1.0 / (1.0 + (-z).exp());
        Ok(vec![1.0 - p, p])
    }
}

/// Linear SVM decision function. Positive when `coef . x + intercept > 0`.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearSvc {
    pub coef: Vec<f64>,

    #[serde(default)]
    pub intercept: f64,
}

impl LinearSvc {
    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        validate_coef(&self.coef, self.intercept)
    }
}

impl LabelClassifier for LinearSvc {
    fn predict(&self, features: &FeatureVector) -> Result<bool, ModelError> {
        Ok(features.dot(&self.coef)? + self.intercept > 0.0)
    }
}
