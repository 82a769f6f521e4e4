//! Pre-fitted feature scalers.
//!
//! Scalers are exported to JSON with their fitted coefficients and applied
//! as-is; nothing here refits or adjusts them.

use std::path::Path;

use serde::Deserialize;

use crate::artifacts::read_json_artifact;
use crate::error::{ClassifyError, InferenceStage, Result};
use crate::features::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};

const ARTIFACT_KIND: &str = "scaler";

/// A fitted 12-to-12 feature transform.
pub trait FeatureScaler: Send + Sync {
    /// Short name of the scaling method, for logs.
    fn kind(&self) -> &'static str;

    /// Applies the fitted transform to one feature vector.
    fn transform(&self, features: &FeatureVector) -> Result<FeatureVector>;
}

/// Standardization: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: FeatureVector,
    scale: FeatureVector,
}

impl StandardScaler {
    pub fn new(mean: FeatureVector, scale: FeatureVector) -> Self {
        Self { mean, scale }
    }
}

impl FeatureScaler for StandardScaler {
    fn kind(&self) -> &'static str {
        "standard"
    }

    fn transform(&self, features: &FeatureVector) -> Result<FeatureVector> {
        let mut out = [0.0; FEATURE_COUNT];
        for (idx, value) in features.iter().enumerate() {
            out[idx] = (value - self.mean[idx]) / self.scale[idx];
        }
        check_finite(&out)?;
        Ok(out)
    }
}

/// Min-max scaling: `x * scale + min`.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxScaler {
    min: FeatureVector,
    scale: FeatureVector,
}

impl MinMaxScaler {
    pub fn new(min: FeatureVector, scale: FeatureVector) -> Self {
        Self { min, scale }
    }
}

impl FeatureScaler for MinMaxScaler {
    fn kind(&self) -> &'static str {
        "min_max"
    }

    fn transform(&self, features: &FeatureVector) -> Result<FeatureVector> {
        let mut out = [0.0; FEATURE_COUNT];
        for (idx, value) in features.iter().enumerate() {
            out[idx] = value * self.scale[idx] + self.min[idx];
        }
        check_finite(&out)?;
        Ok(out)
    }
}

fn check_finite(values: &FeatureVector) -> Result<()> {
    match values.iter().position(|value| !value.is_finite()) {
        Some(idx) => Err(ClassifyError::inference(
            InferenceStage::Scale,
            format!("scaled value for '{}' is not finite", FEATURE_NAMES[idx]),
        )),
        None => Ok(()),
    }
}

/// Serialized scaler, tagged by `kind`.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ScalerArtifact {
    Standard {
        mean: Vec<f64>,
        scale: Vec<f64>,
        #[serde(default)]
        feature_names: Option<Vec<String>>,
    },
    MinMax {
        min: Vec<f64>,
        scale: Vec<f64>,
        #[serde(default)]
        feature_names: Option<Vec<String>>,
    },
}

/// Loads a scaler artifact from a JSON file.
///
/// Coefficients must number exactly twelve and be finite, and `scale` must be
/// non-zero. When the artifact lists `feature_names` they must equal
/// [`FEATURE_NAMES`].
pub fn load_scaler(path: &Path) -> Result<Box<dyn FeatureScaler>> {
    let artifact: ScalerArtifact = read_json_artifact(ARTIFACT_KIND, path)?;
    let invalid = |message: String| ClassifyError::artifact(ARTIFACT_KIND, path, message);

    let scaler: Box<dyn FeatureScaler> = match artifact {
        ScalerArtifact::Standard {
            mean,
            scale,
            feature_names,
        } => {
            check_feature_names(feature_names.as_deref()).map_err(invalid)?;
            let mean = coefficients("mean", &mean).map_err(invalid)?;
            let scale = coefficients("scale", &scale).map_err(invalid)?;
            check_non_zero(&scale).map_err(invalid)?;
            Box::new(StandardScaler::new(mean, scale))
        }
        ScalerArtifact::MinMax {
            min,
            scale,
            feature_names,
        } => {
            check_feature_names(feature_names.as_deref()).map_err(invalid)?;
            let min = coefficients("min", &min).map_err(invalid)?;
            let scale = coefficients("scale", &scale).map_err(invalid)?;
            check_non_zero(&scale).map_err(invalid)?;
            Box::new(MinMaxScaler::new(min, scale))
        }
    };

    tracing::debug!(path = %path.display(), kind = scaler.kind(), "scaler loaded");
    Ok(scaler)
}

fn coefficients(name: &str, values: &[f64]) -> std::result::Result<FeatureVector, String> {
    let vector: FeatureVector = values.try_into().map_err(|_| {
        format!(
            "'{name}' has {} values, expected {FEATURE_COUNT}",
            values.len()
        )
    })?;
    if let Some(idx) = vector.iter().position(|value| !value.is_finite()) {
        return Err(format!("'{name}' value for '{}' is not finite", FEATURE_NAMES[idx]));
    }
    Ok(vector)
}

fn check_non_zero(scale: &FeatureVector) -> std::result::Result<(), String> {
    match scale.iter().position(|value| *value == 0.0) {
        Some(idx) => Err(format!("scale for '{}' is zero", FEATURE_NAMES[idx])),
        None => Ok(()),
    }
}

fn check_feature_names(names: Option<&[String]>) -> std::result::Result<(), String> {
    match names {
        Some(names) if !names.iter().map(String::as_str).eq(FEATURE_NAMES) => Err(format!(
            "feature names {names:?} do not match the expected order {FEATURE_NAMES:?}"
        )),
        _ => Ok(()),
    }
}
