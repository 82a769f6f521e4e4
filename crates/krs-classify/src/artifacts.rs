//! Artifact locations, JSON loading and the process-wide classifier.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::de::DeserializeOwned;

use crate::classifier::RiskClassifier;
use crate::error::{ClassifyError, Result};

/// Default file name of the exported model.
pub const DEFAULT_MODEL_PATH: &str = "model_lstm_2layer_risiko_stunting.json";

/// Default file name of the exported scaler.
pub const DEFAULT_SCALER_PATH: &str = "preprocess_lstm_2layer_risiko_stunting.json";

/// Where the model and scaler artifacts live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub model: PathBuf,
    pub scaler: PathBuf,
}

impl Default for ArtifactPaths {
    fn default() -> Self {
        Self {
            model: PathBuf::from(DEFAULT_MODEL_PATH),
            scaler: PathBuf::from(DEFAULT_SCALER_PATH),
        }
    }
}

/// Reads and deserializes a JSON artifact, mapping every failure to
/// [`ClassifyError::Artifact`].
pub(crate) fn read_json_artifact<T: DeserializeOwned>(kind: &'static str, path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ClassifyError::artifact(kind, path, e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| ClassifyError::artifact(kind, path, e.to_string()))
}

static SHARED_CLASSIFIER: OnceLock<(ArtifactPaths, RiskClassifier)> = OnceLock::new();

/// Returns the process-wide classifier, loading it on first use.
///
/// Artifacts are loaded once and shared read-only for the rest of the
/// process. `paths` is honoured only by the call that loads them: once a
/// classifier is loaded, later calls return it whatever paths they pass
/// (see [`shared_artifact_paths`]). A failed load leaves the slot empty so a
/// later call can retry.
pub fn shared_classifier(paths: &ArtifactPaths) -> Result<&'static RiskClassifier> {
    if let Some((loaded_paths, classifier)) = SHARED_CLASSIFIER.get() {
        if loaded_paths != paths {
            tracing::debug!(
                requested_model = %paths.model.display(),
                loaded_model = %loaded_paths.model.display(),
                requested_scaler = %paths.scaler.display(),
                loaded_scaler = %loaded_paths.scaler.display(),
                "classifier already loaded from other artifacts, reusing it"
            );
        }
        return Ok(classifier);
    }
    let loaded = RiskClassifier::load(paths)?;
    let (_, classifier) = SHARED_CLASSIFIER.get_or_init(|| (paths.clone(), loaded));
    Ok(classifier)
}

/// Artifact paths of the process-wide classifier, once it is loaded.
pub fn shared_artifact_paths() -> Option<&'static ArtifactPaths> {
    SHARED_CLASSIFIER.get().map(|(paths, _)| paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_artifact_names_path() {
        let err = read_json_artifact::<serde_json::Value>("model", Path::new("missing.json"))
            .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("failed to load model artifact missing.json"));
    }

    #[test]
    fn test_default_paths() {
        let paths = ArtifactPaths::default();
        assert_eq!(paths.model, PathBuf::from(DEFAULT_MODEL_PATH));
        assert_eq!(paths.scaler, PathBuf::from(DEFAULT_SCALER_PATH));
    }
}
