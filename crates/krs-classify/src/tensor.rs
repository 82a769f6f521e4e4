//! Rank-3 input tensor for sequence models.

use crate::error::{ClassifyError, InferenceStage, Result};
use crate::features::{FEATURE_COUNT, FeatureVector};

/// Dense `(batch, timesteps, features)` tensor in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor3 {
    shape: [usize; 3],
    data: Vec<f64>,
}

impl Tensor3 {
    /// Creates a tensor, checking that `data` fills `shape` exactly.
    pub fn new(shape: [usize; 3], data: Vec<f64>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(ClassifyError::inference(
                InferenceStage::Reshape,
                format!(
                    "data length {} does not match shape {shape:?} (expected {expected})",
                    data.len()
                ),
            ));
        }
        Ok(Self { shape, data })
    }

    /// Reshapes one scaled feature vector into a `(1, 1, 12)` tensor.
    pub fn from_features(features: &FeatureVector) -> Self {
        Self {
            shape: [1, 1, FEATURE_COUNT],
            data: features.to_vec(),
        }
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn batch_size(&self) -> usize {
        self.shape[0]
    }

    pub fn timesteps(&self) -> usize {
        self.shape[1]
    }

    pub fn features(&self) -> usize {
        self.shape[2]
    }

    /// Feature values of one timestep of one sample, `None` when either index
    /// is out of range.
    pub fn step(&self, sample: usize, timestep: usize) -> Option<&[f64]> {
        if sample >= self.batch_size() || timestep >= self.timesteps() {
            return None;
        }
        let width = self.shape[2];
        let start = (sample * self.shape[1] + timestep) * width;
        self.data.get(start..start + width)
    }

    /// All timesteps of one sample, in order.
    pub fn sequence(&self, sample: usize) -> Result<Vec<Vec<f64>>> {
        (0..self.timesteps())
            .map(|timestep| {
                self.step(sample, timestep)
                    .map(<[f64]>::to_vec)
                    .ok_or_else(|| {
                        ClassifyError::inference(
                            InferenceStage::Reshape,
                            format!(
                                "sample {sample} out of range for batch of {}",
                                self.batch_size()
                            ),
                        )
                    })
            })
            .collect()
    }
}
