//! Stunting risk classification for a single family profile.
//!
//! The pipeline is fixed:
//!
//! 1. [`build_feature_vector`] maps a [`FamilyProfile`](krs_model::FamilyProfile)
//!    to twelve numbers in [`FEATURE_NAMES`] order
//! 2. a [`FeatureScaler`] applies the pre-fitted scaling
//! 3. the scaled vector is reshaped to a `(1, 1, 12)` [`Tensor3`]
//! 4. a [`SequenceClassifier`] returns a score in `[0, 1]`
//! 5. scores `>= 0.5` are `Berisiko`, the rest `Tidak Berisiko`
//!
//! Scaler and model are loaded from JSON exports of the fitted artifacts and
//! treated as black boxes. [`shared_classifier`] keeps one loaded pair for the
//! whole process.
//!
//! # Example
//!
//! ```ignore
//! use krs_classify::{ArtifactPaths, shared_classifier};
//! use krs_model::FamilyProfile;
//!
//! let classifier = shared_classifier(&ArtifactPaths::default())?;
//! let assessment = classifier.assess(&FamilyProfile::default())?;
//! println!("{} ({:.3})", assessment.label, assessment.score);
//! ```

mod artifacts;
mod classifier;
mod error;
mod features;
mod network;
mod scaler;
mod tensor;

pub use artifacts::{
    ArtifactPaths, DEFAULT_MODEL_PATH, DEFAULT_SCALER_PATH, shared_artifact_paths,
    shared_classifier,
};
pub use classifier::{RiskAssessment, RiskClassifier};
pub use error::{ClassifyError, InferenceStage, Result};
pub use features::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector, apply_field, build_feature_vector};
pub use network::{
    Activation, DenseLayer, Layer, LstmLayer, LstmNetwork, MODEL_FORMAT, SequenceClassifier,
};
pub use scaler::{FeatureScaler, MinMaxScaler, StandardScaler, load_scaler};
pub use tensor::Tensor3;
