//! Model provider: lazily loads and caches the trained artifacts.
//!
//! Each artifact sits in its own slot. A slot is filled by the first
//! successful load and then kept for the life of the provider. A failed load
//! leaves the slot empty, so the next call tries again; an artifact that
//! shows up on disk later is picked up without a restart.
//!
//! Loads are serialized per slot, so concurrent first callers trigger a
//! single load per artifact.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;

use postcheck_core::ArtifactsConfig;

use crate::artifacts::{
    load_classifier, load_vectorizer, panic_message, ArtifactError, Classifier, ClassifierArtifacts,
    TextVectorizer,
};

/// Source of artifacts for a [`ModelProvider`].
///
/// Implement this to load from somewhere other than the local filesystem.
pub trait ArtifactLoader: Send + Sync {
    fn load_vectorizer(&self) -> Result<Arc<dyn TextVectorizer>, ArtifactError>;

    fn load_classifier(&self) -> Result<Classifier, ArtifactError>;

    /// Short description for status output.
    fn describe(&self) -> String {
        "custom loader".to_string()
    }
}

/// Loads both artifacts from JSON files.
#[derive(Debug, Clone)]
pub struct FileArtifactLoader {
    vectorizer_path: PathBuf,
    classifier_path: PathBuf,
}

impl FileArtifactLoader {
    pub fn new(vectorizer_path: impl Into<PathBuf>, classifier_path: impl Into<PathBuf>) -> Self {
        Self {
            vectorizer_path: vectorizer_path.into(),
            classifier_path: classifier_path.into(),
        }
    }

    pub fn from_config(config: &ArtifactsConfig) -> Self {
        Self::new(config.vectorizer_path(), config.classifier_path())
    }
}

impl ArtifactLoader for FileArtifactLoader {
    fn load_vectorizer(&self) -> Result<Arc<dyn TextVectorizer>, ArtifactError> {
        load_vectorizer(&self.vectorizer_path)
    }

    fn load_classifier(&self) -> Result<Classifier, ArtifactError> {
        load_classifier(&self.classifier_path)
    }

    fn describe(&self) -> String {
        format!(
            "files: {}, {}",
            self.vectorizer_path.display(),
            self.classifier_path.display()
        )
    }
}

/// Loader that never produces anything.
struct DisabledLoader;

impl ArtifactLoader for DisabledLoader {
    fn load_vectorizer(&self) -> Result<Arc<dyn TextVectorizer>, ArtifactError> {
        Err(ArtifactError::Disabled)
    }

    fn load_classifier(&self) -> Result<Classifier, ArtifactError> {
        Err(ArtifactError::Disabled)
    }

    fn describe(&self) -> String {
        "disabled".to_string()
    }
}

/// Result of asking for the classifier.
#[derive(Debug, Clone)]
pub enum ModelAvailability {
    Available(ClassifierArtifacts),
    Unavailable,
}

impl ModelAvailability {
    pub fn is_available(&self) -> bool {
        matches!(self, ModelAvailability::Available(_))
    }
}

/// Load state of one artifact.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ArtifactStatus {
    pub loaded: bool,
    pub loaded_at: Option<DateTime<Utc>>,
}

/// Snapshot of the provider's cache.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProviderStatus {
    pub source: String,
    pub vectorizer: ArtifactStatus,
    pub classifier: ArtifactStatus,
}

struct Slot<T> {
    value: Option<T>,
    loaded_at: Option<DateTime<Utc>>,
}

impl<T> Slot<T> {
    fn empty() -> Self {
        Self {
            value: None,
            loaded_at: None,
        }
    }

    fn filled(value: T) -> Self {
        Self {
            value: Some(value),
            loaded_at: Some(Utc::now()),
        }
    }

    fn status(&self) -> ArtifactStatus {
        ArtifactStatus {
            loaded: self.value.is_some(),
            loaded_at: self.loaded_at,
        }
    }
}

/// Lazily-populated cache of the vectorizer and classifier.
pub struct ModelProvider {
    loader: Box<dyn ArtifactLoader>,
    vectorizer: Mutex<Slot<Arc<dyn TextVectorizer>>>,
    classifier: Mutex<Slot<Classifier>>,
}

impl ModelProvider {
    /// Provider backed by an arbitrary loader. Nothing is loaded until first use.
    pub fn new(loader: impl ArtifactLoader + 'static) -> Self {
        Self {
            loader: Box::new(loader),
            vectorizer: Mutex::new(Slot::empty()),
            classifier: Mutex::new(Slot::empty()),
        }
    }

    /// File-backed provider, or a disabled one if the config says so.
    pub fn from_config(config: &ArtifactsConfig) -> Self {
        if config.enabled {
            Self::new(FileArtifactLoader::from_config(config))
        } else {
            Self::disabled()
        }
    }

    /// Provider whose cache is already populated.
    pub fn preloaded(artifacts: ClassifierArtifacts) -> Self {
        Self {
            loader: Box::new(DisabledLoader),
            vectorizer: Mutex::new(Slot::filled(artifacts.vectorizer)),
            classifier: Mutex::new(Slot::filled(artifacts.classifier)),
        }
    }

    /// Provider that is always unavailable.
    pub fn disabled() -> Self {
        Self::new(DisabledLoader)
    }

    /// Get both artifacts, loading whichever is not cached yet.
    ///
    /// Never fails: any load problem is logged and reported as `Unavailable`.
    pub fn get_classifier(&self) -> ModelAvailability {
        // Both slots are attempted on every call so each can fill independently.
        let classifier = self.classifier_slot();
        let vectorizer = self.vectorizer_slot();

        match (vectorizer, classifier) {
            (Some(vectorizer), Some(classifier)) => {
                ModelAvailability::Available(ClassifierArtifacts::new(vectorizer, classifier))
            }
            _ => ModelAvailability::Unavailable,
        }
    }

    /// Current cache state. Does not trigger a load.
    pub fn status(&self) -> ProviderStatus {
        let vectorizer = self.vectorizer.lock().status();
        let classifier = self.classifier.lock().status();
        ProviderStatus {
            source: self.loader.describe(),
            vectorizer,
            classifier,
        }
    }

    fn vectorizer_slot(&self) -> Option<Arc<dyn TextVectorizer>> {
        load_into(&self.vectorizer, "vectorizer", || self.loader.load_vectorizer())
    }

    fn classifier_slot(&self) -> Option<Classifier> {
        load_into(&self.classifier, "classifier", || self.loader.load_classifier())
    }
}

impl Default for ModelProvider {
    fn default() -> Self {
        Self::from_config(&ArtifactsConfig::default())
    }
}

fn load_into<T: Clone>(
    slot: &Mutex<Slot<T>>,
    artifact: &'static str,
    load: impl FnOnce() -> Result<T, ArtifactError>,
) -> Option<T> {
    let mut slot = slot.lock();
    if let Some(value) = &slot.value {
        return Some(value.clone());
    }

    let outcome = match panic::catch_unwind(AssertUnwindSafe(load)) {
        Ok(outcome) => outcome,
        Err(payload) => {
            tracing::warn!(
                artifact,
                panic = %panic_message(payload.as_ref()),
                "Artifact loader panicked, model tier unavailable"
            );
            return None;
        }
    };

    match outcome {
        Ok(value) => {
            tracing::debug!(artifact, "Artifact loaded");
            *slot = Slot::filled(value.clone());
            Some(value)
        }
        Err(ArtifactError::Disabled) => None,
        Err(ArtifactError::Missing(path)) => {
            tracing::debug!(artifact, path = %path.display(), "Artifact not present");
            None
        }
        Err(e) => {
            tracing::warn!(artifact, error = %e, "Artifact failed to load, model tier unavailable");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{fixtures, parse_classifier, parse_vectorizer};
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    /// Counts loads; succeeds with fixtures.
    #[derive(Default)]
    struct CountingLoader {
        vectorizer_loads: AtomicUsize,
        classifier_loads: AtomicUsize,
    }

    impl ArtifactLoader for Arc<CountingLoader> {
        fn load_vectorizer(&self) -> Result<Arc<dyn TextVectorizer>, ArtifactError> {
            self.vectorizer_loads.fetch_add(1, Ordering::SeqCst);
            thread::sleep(std::time::Duration::from_millis(5));
            parse_vectorizer(fixtures::VECTORIZER)
        }

        fn load_classifier(&self) -> Result<Classifier, ArtifactError> {
            self.classifier_loads.fetch_add(1, Ordering::SeqCst);
            parse_classifier(fixtures::NAIVE_BAYES)
        }
    }

    /// Loader whose vectorizer load panics on every call.
    struct PanickingLoader;

    impl ArtifactLoader for PanickingLoader {
        fn load_vectorizer(&self) -> Result<Arc<dyn TextVectorizer>, ArtifactError> {
            panic!("vectorizer store unreachable");
        }

        fn load_classifier(&self) -> Result<Classifier, ArtifactError> {
            parse_classifier(fixtures::NAIVE_BAYES)
        }
    }

    #[test]
    fn test_panicking_loader_is_unavailable() {
        let provider = ModelProvider::new(PanickingLoader);
        assert!(!provider.get_classifier().is_available());
        // Retried, not poisoned.
        assert!(!provider.get_classifier().is_available());

        let status = provider.status();
        assert!(!status.vectorizer.loaded);
        assert!(status.classifier.loaded);
    }

    #[test]
    fn test_missing_files_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let provider = ModelProvider::from_config(&ArtifactsConfig::in_dir(dir.path()));
        assert!(!provider.get_classifier().is_available());

        let status = provider.status();
        assert!(!status.vectorizer.loaded);
        assert!(!status.classifier.loaded);
    }

    #[test]
    fn test_loads_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = ArtifactsConfig::in_dir(dir.path());
        fs::write(config.vectorizer_path(), fixtures::VECTORIZER).unwrap();
        fs::write(config.classifier_path(), fixtures::NAIVE_BAYES).unwrap();

        let provider = ModelProvider::from_config(&config);
        assert!(provider.status().classifier.loaded_at.is_none());

        match provider.get_classifier() {
            ModelAvailability::Available(artifacts) => {
                assert!(matches!(artifacts.classifier, Classifier::Probabilistic(_)));
            }
            ModelAvailability::Unavailable => panic!("expected artifacts to load"),
        }

        let status = provider.status();
        assert!(status.vectorizer.loaded && status.classifier.loaded);
        assert!(status.classifier.loaded_at.is_some());
    }

    #[test]
    fn test_one_artifact_is_not_enough() {
        let dir = tempfile::tempdir().unwrap();
        let config = ArtifactsConfig::in_dir(dir.path());
        fs::write(config.classifier_path(), fixtures::NAIVE_BAYES).unwrap();

        let provider = ModelProvider::from_config(&config);
        assert!(!provider.get_classifier().is_available());

        // The classifier is cached even though the pair is unavailable.
        let status = provider.status();
        assert!(status.classifier.loaded);
        assert!(!status.vectorizer.loaded);
    }

    #[test]
    fn test_recovers_when_artifact_appears() {
        let dir = tempfile::tempdir().unwrap();
        let config = ArtifactsConfig::in_dir(dir.path());
        fs::write(config.classifier_path(), fixtures::NAIVE_BAYES).unwrap();
        fs::write(config.vectorizer_path(), "not json at all").unwrap();

        let provider = ModelProvider::from_config(&config);
        assert!(!provider.get_classifier().is_available());

        fs::write(config.vectorizer_path(), fixtures::VECTORIZER).unwrap();
        assert!(provider.get_classifier().is_available());
    }

    #[test]
    fn test_cache_survives_file_removal() {
        let dir = tempfile::tempdir().unwrap();
        let config = ArtifactsConfig::in_dir(dir.path());
        fs::write(config.vectorizer_path(), fixtures::VECTORIZER).unwrap();
        fs::write(config.classifier_path(), fixtures::LINEAR_SVC).unwrap();

        let provider = ModelProvider::from_config(&config);
        assert!(provider.get_classifier().is_available());

        fs::remove_file(config.vectorizer_path()).unwrap();
        fs::remove_file(config.classifier_path()).unwrap();
        assert!(provider.get_classifier().is_available());
    }

    #[test]
    fn test_disabled_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = ArtifactsConfig::in_dir(dir.path());
        fs::write(config.vectorizer_path(), fixtures::VECTORIZER).unwrap();
        fs::write(config.classifier_path(), fixtures::NAIVE_BAYES).unwrap();
        config.enabled = false;

        let provider = ModelProvider::from_config(&config);
        assert!(!provider.get_classifier().is_available());
        assert_eq!(provider.status().source, "disabled");
    }

    #[test]
    fn test_preloaded() {
        let artifacts = ClassifierArtifacts::new(
            parse_vectorizer(fixtures::VECTORIZER).unwrap(),
            parse_classifier(fixtures::LINEAR_SVC).unwrap(),
        );
        let provider = ModelProvider::preloaded(artifacts);
        assert!(provider.status().vectorizer.loaded);
        assert!(provider.get_classifier().is_available());
    }

    #[test]
    fn test_concurrent_first_access_loads_once() {
        let loader = Arc::new(CountingLoader::default());
        let provider = Arc::new(ModelProvider::new(Arc::clone(&loader)));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let provider = Arc::clone(&provider);
                thread::spawn(move || provider.get_classifier().is_available())
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }

        assert_eq!(loader.vectorizer_loads.load(Ordering::SeqCst), 1);
        assert_eq!(loader.classifier_loads.load(Ordering::SeqCst), 1);
    }
}
