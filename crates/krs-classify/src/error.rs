//! Classification error types.

use std::fmt;
use std::path::PathBuf;

use krs_model::ParseCategoryError;
use thiserror::Error;

/// Pipeline step that failed during inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InferenceStage {
    Scale,
    Reshape,
    Predict,
    Output,
}

impl fmt::Display for InferenceStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Scale => "scaling",
            Self::Reshape => "reshape",
            Self::Predict => "prediction",
            Self::Output => "output",
        };
        f.write_str(name)
    }
}

/// Errors raised while loading artifacts or classifying a profile.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// Model or scaler artifact could not be read or is malformed.
    #[error("failed to load {kind} artifact {}: {message}", .path.display())]
    Artifact {
        kind: &'static str,
        path: PathBuf,
        message: String,
    },

    /// Scaling or forward inference failed. No default score is produced.
    #[error("{stage} failed: {message}")]
    Inference {
        stage: InferenceStage,
        message: String,
    },

    /// A questionnaire answer is not one of the fixed options.
    #[error(transparent)]
    UnknownCategory(#[from] ParseCategoryError),

    /// A questionnaire field name is not one of the twelve features.
    #[error("unknown profile field '{0}'")]
    UnknownField(String),
}

impl ClassifyError {
    pub(crate) fn inference(stage: InferenceStage, message: impl Into<String>) -> Self {
        Self::Inference {
            stage,
            message: message.into(),
        }
    }

    pub(crate) fn artifact(
        kind: &'static str,
        path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self::Artifact {
            kind,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns true for failures inside the scale/predict pipeline.
    pub fn is_inference(&self) -> bool {
        matches!(self, Self::Inference { .. })
    }
}

/// Result type for classification operations.
pub type Result<T> = std::result::Result<T, ClassifyError>;
