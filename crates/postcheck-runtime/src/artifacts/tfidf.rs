//! TF-IDF vectorizer.
//!
//! Tokens are runs of two or more word characters. Term counts are scaled
//! by the stored inverse document frequencies and, by default, the row is
//! L2-normalized.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};

use super::{ArtifactError, FeatureVector, ModelError, TextVectorizer};

lazy_static! {
    static ref TOKEN_PATTERN: Regex = Regex::new(r"\b\w\w+\b").unwrap();
}

/// Row normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    None,
}

/// A fitted TF-IDF vectorizer.
#[derive(Debug, Clone, Deserialize)]
pub struct TfIdfVectorizer {
    /// Term to column index
    pub vocabulary: HashMap<String, usize>,

    /// Inverse document frequency per column
    pub idf: Vec<f64>,

    #[serde(default)]
    pub stop_words: HashSet<String>,

    #[serde(default = "default_lowercase")]
    pub lowercase: bool,

    #[serde(default)]
    pub norm: Norm,

    /// Use `1 + ln(tf)` instead of raw counts
    #[serde(default)]
    pub sublinear_tf: bool,
}

fn default_lowercase() -> bool {
    true
}

impl TfIdfVectorizer {
    /// Number of output columns.
    pub fn dim(&self) -> usize {
        self.idf.len()
    }

    pub(crate) fn validate(&self) -> Result<(), ArtifactError> {
        if self.idf.is_empty() {
            return Err(ArtifactError::Incompatible(
                "tfidf vectorizer has no columns".to_string(),
            ));
        }

        if let Some(bad) = self.idf.iter().find(|v| !v.is_finite()) {
            return Err(ArtifactError::Incompatible(format!(
                "non-finite idf value {}",
                bad
            )));
        }

        if let Some((term, idx)) = self.vocabulary.iter().find(|(_, &idx)| idx >= self.dim()) {
            return Err(ArtifactError::Incompatible(format!(
                "term '{}' maps to column {} but only {} idf values exist",
                term,
                idx,
                self.dim()
            )));
        }

        Ok(())
    }

    fn term_counts(&self, text: &str) -> BTreeMap<usize, u32> {
        let text = if self.lowercase {
            text.to_lowercase()
        } else {
            text.to_string()
        };

        let mut counts = BTreeMap::new();
        for token in TOKEN_PATTERN.find_iter(&text).map(|m| m.as_str()) {
            if self.stop_words.contains(token) {
                continue;
            }
            if let Some(&idx) = self.vocabulary.get(token) {
                *counts.entry(idx).or_insert(0) += 1;
            }
        }
        counts
    }
}

impl TextVectorizer for TfIdfVectorizer {
    fn transform(&self, text: &str) -> Result<FeatureVector, ModelError> {
        let mut entries: Vec<(usize, f64)> = self
            .term_counts(text)
            .into_iter()
            .map(|(idx, count)| {
                let tf = if self.sublinear_tf {
                    1.0 + (count as f64).ln()
                } else {
                    count as f64
                };
                (idx, tf * self.idf[idx])
            })
            .collect();

        if self.norm == Norm::L2 {
            let length = entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
            if length > 0.0 {
                for (_, v) in entries.iter_mut() {
                    *v /= length;
                }
            }
        }

        Ok(FeatureVector::new(self.dim(), entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::fixtures;

    fn fixture() -> TfIdfVectorizer {
        let value: serde_json::Value = serde_json::from_str(fixtures::VECTORIZER).unwrap();
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_transform_counts_and_normalizes() {
        let v = fixture();
        let fv = v.transform("Backend engineering, backend!").unwrap();
        assert_eq!(fv.dim(), 4);

        let entries = fv.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, 0);
        assert_eq!(entries[1].0, 1);

        // raw: backend 2 * 1.5 = 3.0, engineering 1 * 1.2 = 1.2
        let norm = (3.0f64 * 3.0 + 1.2 * 1.2).sqrt();
        assert!((entries[0].1 - 3.0 / norm).abs() < 1e-12);
        assert!((entries[1].1 - 1.2 / norm).abs() < 1e-12);
    }

    #[test]
    fn test_stop_words_and_unknown_terms_dropped() {
        let v = fixture();
        let fv = v.transform("the and our interns").unwrap();
        assert!(fv.is_empty());
    }

    #[test]
    fn test_single_character_tokens_ignored() {
        let mut v = fixture();
        v.vocabulary.insert("a".to_string(), 0);
        let fv = v.transform("a a a").unwrap();
        assert!(fv.is_empty());
    }

    #[test]
    fn test_sublinear_without_norm() {
        let mut v = fixture();
        v.sublinear_tf = true;
        v.norm = Norm::None;
        let fv = v.transform("fee fee fee").unwrap();
        let expected = (1.0 + 3.0f64.ln()) * 2.0;
        assert!((fv.entries()[0].1 - expected).abs() < 1e-12);
    }

    #[test]
    fn test_vocabulary_out_of_range_rejected() {
        let mut v = fixture();
        v.vocabulary.insert("stipend".to_string(), 9);
        assert!(matches!(v.validate(), Err(ArtifactError::Incompatible(_))));
    }
}
