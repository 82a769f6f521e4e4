//! Scale, reshape, predict and label one family profile.

use krs_model::{FamilyProfile, RiskLabel};
use serde::Serialize;

use crate::artifacts::ArtifactPaths;
use crate::error::{ClassifyError, InferenceStage, Result};
use crate::features::{FeatureVector, build_feature_vector};
use crate::network::{LstmNetwork, SequenceClassifier};
use crate::scaler::{FeatureScaler, load_scaler};
use crate::tensor::Tensor3;

/// Outcome of classifying one profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    /// Unscaled feature vector.
    pub features: FeatureVector,
    pub score: f64,
    pub label: RiskLabel,
}

/// A fitted scaler paired with a trained sequence classifier.
pub struct RiskClassifier {
    scaler: Box<dyn FeatureScaler>,
    model: Box<dyn SequenceClassifier>,
}

impl std::fmt::Debug for RiskClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskClassifier")
            .field("scaler", &self.scaler.kind())
            .field("input_features", &self.model.input_features())
            .finish()
    }
}

impl RiskClassifier {
    pub fn new(scaler: Box<dyn FeatureScaler>, model: Box<dyn SequenceClassifier>) -> Self {
        Self { scaler, model }
    }

    /// Loads both artifacts from disk.
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let _span = tracing::info_span!(
            "load_artifacts",
            model = %paths.model.display(),
            scaler = %paths.scaler.display()
        )
        .entered();
        let model = LstmNetwork::load(&paths.model)?;
        let scaler = load_scaler(&paths.scaler)?;
        tracing::info!("model and scaler loaded");
        Ok(Self::new(scaler, Box::new(model)))
    }

    /// Returns the model's risk score for one unscaled feature vector.
    ///
    /// The vector is scaled, reshaped to `(1, 1, 12)` and passed through the
    /// model. Any failure, and any output that is not exactly one finite value
    /// in `[0, 1]`, is an [`ClassifyError::Inference`] error.
    pub fn predict_risk(&self, vector: &FeatureVector) -> Result<f64> {
        let scaled = self.scaler.transform(vector)?;
        let input = Tensor3::from_features(&scaled);
        let output = self.model.predict(&input)?;

        let score = match output.as_slice() {
            [row] => match row.as_slice() {
                [score] => *score,
                other => {
                    return Err(ClassifyError::inference(
                        InferenceStage::Output,
                        format!("expected a single score, got {} values", other.len()),
                    ));
                }
            },
            rows => {
                return Err(ClassifyError::inference(
                    InferenceStage::Output,
                    format!("expected one output row, got {}", rows.len()),
                ));
            }
        };
        if !score.is_finite() || !(0.0..=1.0).contains(&score) {
            return Err(ClassifyError::inference(
                InferenceStage::Output,
                format!("score {score} is outside [0, 1]"),
            ));
        }
        Ok(score)
    }

    /// Maps a profile to features, predicts and applies the decision rule.
    pub fn assess(&self, profile: &FamilyProfile) -> Result<RiskAssessment> {
        let features = build_feature_vector(profile);
        let score = self.predict_risk(&features).inspect_err(|e| {
            tracing::warn!(error = %e, "risk classification failed");
        })?;
        let label = RiskLabel::from_score(score);
        tracing::info!(score, label = %label, "profile classified");
        Ok(RiskAssessment {
            features,
            score,
            label,
        })
    }
}
