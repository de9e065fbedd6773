//! Engine configuration from YAML/JSON.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::schema::validate_config_schema;
use crate::types::Thresholds;

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Config does not match schema: {}", .0.join("; "))]
    SchemaError(Vec<String>),

    #[error("Config validation failed: {0}")]
    ValidationError(String),
}

/// Where the trained artifacts live.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtifactsConfig {
    /// Directory holding both artifacts
    #[serde(default = "default_dir")]
    pub dir: PathBuf,

    /// Vectorizer file name, relative to `dir`
    #[serde(default = "default_vectorizer")]
    pub vectorizer: PathBuf,

    /// Classifier file name, relative to `dir`
    #[serde(default = "default_classifier")]
    pub classifier: PathBuf,

    /// When false the model tier is never attempted
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_dir() -> PathBuf {
    PathBuf::from("model")
}

fn default_vectorizer() -> PathBuf {
    PathBuf::from("vectorizer.json")
}

fn default_classifier() -> PathBuf {
    PathBuf::from("internship_model.json")
}

fn default_enabled() -> bool {
    true
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            vectorizer: default_vectorizer(),
            classifier: default_classifier(),
            enabled: default_enabled(),
        }
    }
}

impl ArtifactsConfig {
    /// Default file names under a given directory.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Default::default()
        }
    }

    pub fn vectorizer_path(&self) -> PathBuf {
        self.dir.join(&self.vectorizer)
    }

    pub fn classifier_path(&self) -> PathBuf {
        self.dir.join(&self.classifier)
    }
}

/// Scoring constants.
///
/// Defaults reproduce the historical behaviour: 0.25 per flag, saturating
/// at four flags, genuine at >= 0.70, fake at <= 0.40.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Calibration {
    #[serde(default = "default_flag_penalty")]
    pub flag_penalty: f64,

    #[serde(default = "default_penalty_cap")]
    pub penalty_cap: usize,

    #[serde(default = "default_genuine_threshold")]
    pub genuine_threshold: f64,

    #[serde(default = "default_fake_threshold")]
    pub fake_threshold: f64,
}

fn default_flag_penalty() -> f64 {
    0.25
}

fn default_penalty_cap() -> usize {
    4
}

fn default_genuine_threshold() -> f64 {
    0.70
}

fn default_fake_threshold() -> f64 {
    0.40
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            flag_penalty: default_flag_penalty(),
            penalty_cap: default_penalty_cap(),
            genuine_threshold: default_genuine_threshold(),
            fake_threshold: default_fake_threshold(),
        }
    }
}

impl Calibration {
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            genuine: self.genuine_threshold,
            fake: self.fake_threshold,
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let in_unit = |v: f64| (0.0..=1.0).contains(&v);

        if !in_unit(self.genuine_threshold) || !in_unit(self.fake_threshold) {
            return Err(ConfigError::ValidationError(
                "thresholds must be within [0, 1]".to_string(),
            ));
        }

        if self.fake_threshold >= self.genuine_threshold {
            return Err(ConfigError::ValidationError(format!(
                "fake_threshold ({}) must be below genuine_threshold ({})",
                self.fake_threshold, self.genuine_threshold
            )));
        }

        if !(self.flag_penalty > 0.0 && self.flag_penalty <= 1.0) {
            return Err(ConfigError::ValidationError(format!(
                "flag_penalty must be within (0, 1], got {}",
                self.flag_penalty
            )));
        }

        if self.penalty_cap == 0 {
            return Err(ConfigError::ValidationError(
                "penalty_cap must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EngineConfig {
    #[serde(default)]
    pub artifacts: ArtifactsConfig,

    #[serde(default)]
    pub calibration: Calibration,
}

impl EngineConfig {
    /// Parse from a YAML string. An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = if yaml.trim().is_empty() {
            serde_json::json!({})
        } else {
            serde_yaml::from_str(yaml)?
        };
        Self::from_value(value)
    }

    /// Parse from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Load from a file, choosing the format by extension.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        // A bare `~` document deserializes to null
        let value = if value.is_null() {
            serde_json::json!({})
        } else {
            value
        };

        validate_config_schema(&value).map_err(ConfigError::SchemaError)?;

        let config: EngineConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.calibration.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_CONFIG: &str = r#"
artifacts:
  dir: /srv/postcheck/model
  vectorizer: tfidf.json
  classifier: nb.json
  enabled: true
calibration:
  flag_penalty: 0.2
  penalty_cap: 5
  genuine_threshold: 0.8
  fake_threshold: 0.3
"#;

    #[test]
    fn test_parse_full_config() {
        let config = EngineConfig::from_yaml(FULL_CONFIG).unwrap();
        assert_eq!(
            config.artifacts.vectorizer_path(),
            PathBuf::from("/srv/postcheck/model/tfidf.json")
        );
        assert_eq!(config.calibration.penalty_cap, 5);
        assert_eq!(config.calibration.thresholds().genuine, 0.8);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::from_yaml("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(
            config.artifacts.classifier_path(),
            PathBuf::from("model/internship_model.json")
        );
        assert_eq!(config.calibration.flag_penalty, 0.25);
        assert_eq!(config.calibration.thresholds(), Thresholds::default());
    }

    #[test]
    fn test_partial_config() {
        let config = EngineConfig::from_yaml("artifacts:\n  enabled: false\n").unwrap();
        assert!(!config.artifacts.enabled);
        assert_eq!(config.artifacts.dir, PathBuf::from("model"));
        assert_eq!(config.calibration, Calibration::default());
    }

    #[test]
    fn test_json_config() {
        let config =
            EngineConfig::from_json(r#"{"calibration": {"genuine_threshold": 0.9}}"#).unwrap();
        assert_eq!(config.calibration.genuine_threshold, 0.9);
        assert_eq!(config.calibration.fake_threshold, 0.40);
    }

    #[test]
    fn test_inverted_thresholds_rejected() {
        let yaml = r#"
calibration:
  genuine_threshold: 0.3
  fake_threshold: 0.6
"#;
        let result = EngineConfig::from_yaml(yaml);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_unknown_field_rejected_by_schema() {
        let result = EngineConfig::from_yaml("calibration:\n  per_flag: 0.1\n");
        assert!(matches!(result, Err(ConfigError::SchemaError(_))));
    }

    #[test]
    fn test_out_of_range_penalty_rejected() {
        let result = EngineConfig::from_yaml("calibration:\n  flag_penalty: 1.5\n");
        assert!(matches!(result, Err(ConfigError::SchemaError(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = EngineConfig::from_file("/nonexistent/postcheck.yaml");
        assert!(matches!(result, Err(ConfigError::IoError(_))));
    }
}
