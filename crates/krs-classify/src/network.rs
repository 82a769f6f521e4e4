//! Stacked LSTM sequence classifier evaluated from exported weights.
//!
//! The artifact is a JSON export of a Keras-style `Sequential` model:
//!
//! ```json
//! {
//!   "format": "krs-sequence-classifier",
//!   "input_features": 12,
//!   "layers": [
//!     { "type": "lstm", "units": 64, "return_sequences": true,
//!       "kernel": [[...]], "recurrent_kernel": [[...]], "bias": [...] },
//!     { "type": "dropout", "rate": 0.2 },
//!     { "type": "lstm", "units": 32, "return_sequences": false, ... },
//!     { "type": "dense", "activation": "sigmoid", "kernel": [[...]], "bias": [...] }
//!   ]
//! }
//! ```
//!
//! LSTM weights use the Keras layout: `kernel` is `[input][4 * units]`,
//! `recurrent_kernel` is `[units][4 * units]` and `bias` is `[4 * units]`, with
//! gates ordered input, forget, cell, output. Dropout is a no-op at inference.

use std::path::Path;

use serde::Deserialize;

use crate::artifacts::read_json_artifact;
use crate::error::{ClassifyError, InferenceStage, Result};
use crate::tensor::Tensor3;

const ARTIFACT_KIND: &str = "model";

/// Value of the `format` field every model artifact must carry.
pub const MODEL_FORMAT: &str = "krs-sequence-classifier";

/// A pre-trained classifier over `(batch, timesteps, features)` input.
pub trait SequenceClassifier: Send + Sync {
    /// Number of features expected per timestep.
    fn input_features(&self) -> usize;

    /// Runs a forward pass, returning one output row per sample.
    fn predict(&self, input: &Tensor3) -> Result<Vec<Vec<f64>>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Sigmoid,
    Tanh,
    Relu,
    Linear,
}

impl Activation {
    fn apply(self, x: f64) -> f64 {
        match self {
            Self::Sigmoid => sigmoid(x),
            Self::Tanh => x.tanh(),
            Self::Relu => x.max(0.0),
            Self::Linear => x,
        }
    }
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[derive(Debug, Clone, Deserialize)]
pub struct LstmLayer {
    pub units: usize,
    #[serde(default)]
    pub return_sequences: bool,
    pub kernel: Vec<Vec<f64>>,
    pub recurrent_kernel: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DenseLayer {
    pub activation: Activation,
    pub kernel: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Layer {
    Lstm(LstmLayer),
    Dropout {
        #[serde(default)]
        rate: f64,
    },
    Dense(DenseLayer),
}

#[derive(Debug, Deserialize)]
struct ModelArtifact {
    format: String,
    input_features: usize,
    layers: Vec<Layer>,
}

/// Activations flowing between layers for one sample.
enum Activations {
    Sequence(Vec<Vec<f64>>),
    Vector(Vec<f64>),
}

/// Shape of the activations, tracked while validating the layer stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Sequence(usize),
    Vector(usize),
}

/// Stacked LSTM/dense network with validated weight shapes.
#[derive(Debug, Clone)]
pub struct LstmNetwork {
    input_features: usize,
    layers: Vec<Layer>,
}

impl LstmNetwork {
    /// Builds a network, checking every weight matrix against the shape of
    /// the activations it receives. The stack must end in a single scalar
    /// per sample.
    pub fn new(input_features: usize, layers: Vec<Layer>) -> std::result::Result<Self, String> {
        let mut shape = Shape::Sequence(input_features);
        for (idx, layer) in layers.iter().enumerate() {
            shape = layer
                .output_shape(shape)
                .map_err(|message| format!("layer {idx}: {message}"))?;
        }
        if shape != Shape::Vector(1) {
            return Err(format!(
                "model must end in a single scalar per sample, got {shape:?}"
            ));
        }
        Ok(Self {
            input_features,
            layers,
        })
    }

    /// Loads and validates a model artifact from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let artifact: ModelArtifact = read_json_artifact(ARTIFACT_KIND, path)?;
        if artifact.format != MODEL_FORMAT {
            return Err(ClassifyError::artifact(
                ARTIFACT_KIND,
                path,
                format!(
                    "unsupported format '{}', expected '{MODEL_FORMAT}'",
                    artifact.format
                ),
            ));
        }
        let network = Self::new(artifact.input_features, artifact.layers)
            .map_err(|message| ClassifyError::artifact(ARTIFACT_KIND, path, message))?;
        tracing::debug!(
            path = %path.display(),
            layers = network.layers.len(),
            input_features = network.input_features,
            "model loaded"
        );
        Ok(network)
    }

    fn forward(&self, sequence: Vec<Vec<f64>>) -> Result<Vec<f64>> {
        let mut activations = Activations::Sequence(sequence);
        for layer in &self.layers {
            activations = layer.forward(activations)?;
        }
        match activations {
            Activations::Vector(values) => Ok(values),
            Activations::Sequence(_) => Err(ClassifyError::inference(
                InferenceStage::Predict,
                "network produced a sequence instead of a vector",
            )),
        }
    }
}

impl SequenceClassifier for LstmNetwork {
    fn input_features(&self) -> usize {
        self.input_features
    }

    fn predict(&self, input: &Tensor3) -> Result<Vec<Vec<f64>>> {
        if input.features() != self.input_features {
            return Err(ClassifyError::inference(
                InferenceStage::Predict,
                format!(
                    "input has {} features per step, model expects {}",
                    input.features(),
                    self.input_features
                ),
            ));
        }
        if input.timesteps() == 0 {
            return Err(ClassifyError::inference(
                InferenceStage::Predict,
                "input has no timesteps",
            ));
        }
        (0..input.batch_size())
            .map(|sample| self.forward(input.sequence(sample)?))
            .collect()
    }
}

impl Layer {
    fn output_shape(&self, input: Shape) -> std::result::Result<Shape, String> {
        match self {
            Self::Lstm(lstm) => {
                let Shape::Sequence(width) = input else {
                    return Err("lstm layer needs sequence input".to_string());
                };
                lstm.validate(width)?;
                Ok(if lstm.return_sequences {
                    Shape::Sequence(lstm.units)
                } else {
                    Shape::Vector(lstm.units)
                })
            }
            Self::Dropout { .. } => Ok(input),
            Self::Dense(dense) => {
                let (width, sequence) = match input {
                    Shape::Sequence(width) => (width, true),
                    Shape::Vector(width) => (width, false),
                };
                let units = dense.validate(width)?;
                Ok(if sequence {
                    Shape::Sequence(units)
                } else {
                    Shape::Vector(units)
                })
            }
        }
    }

    fn forward(&self, input: Activations) -> Result<Activations> {
        match (self, input) {
            (Self::Lstm(lstm), Activations::Sequence(steps)) => Ok(lstm.forward(&steps)),
            (Self::Lstm(_), Activations::Vector(_)) => Err(ClassifyError::inference(
                InferenceStage::Predict,
                "lstm layer received a vector",
            )),
            (Self::Dropout { .. }, activations) => Ok(activations),
            (Self::Dense(dense), Activations::Sequence(steps)) => Ok(Activations::Sequence(
                steps.iter().map(|step| dense.forward(step)).collect(),
            )),
            (Self::Dense(dense), Activations::Vector(values)) => {
                Ok(Activations::Vector(dense.forward(&values)))
            }
        }
    }
}

impl LstmLayer {
    fn validate(&self, input_width: usize) -> std::result::Result<(), String> {
        let gates = 4 * self.units;
        if self.units == 0 {
            return Err("lstm layer has zero units".to_string());
        }
        check_matrix("kernel", &self.kernel, input_width, gates)?;
        check_matrix("recurrent_kernel", &self.recurrent_kernel, self.units, gates)?;
        check_vector("bias", &self.bias, gates)
    }

    fn forward(&self, steps: &[Vec<f64>]) -> Activations {
        let units = self.units;
        let mut hidden = vec![0.0; units];
        let mut cell = vec![0.0; units];
        let mut outputs = Vec::with_capacity(steps.len());

        for x in steps {
            let mut z = self.bias.clone();
            accumulate(&mut z, x, &self.kernel);
            accumulate(&mut z, &hidden, &self.recurrent_kernel);

            for unit in 0..units {
                let input_gate = sigmoid(z[unit]);
                let forget_gate = sigmoid(z[units + unit]);
                let candidate = z[2 * units + unit].tanh();
                let output_gate = sigmoid(z[3 * units + unit]);
                cell[unit] = forget_gate * cell[unit] + input_gate * candidate;
                hidden[unit] = output_gate * cell[unit].tanh();
            }
            if self.return_sequences {
                outputs.push(hidden.clone());
            }
        }

        if self.return_sequences {
            Activations::Sequence(outputs)
        } else {
            Activations::Vector(hidden)
        }
    }
}

impl DenseLayer {
    /// Returns the number of output units.
    fn validate(&self, input_width: usize) -> std::result::Result<usize, String> {
        let units = self.bias.len();
        if units == 0 {
            return Err("dense layer has no units".to_string());
        }
        check_matrix("kernel", &self.kernel, input_width, units)?;
        check_vector("bias", &self.bias, units)?;
        Ok(units)
    }

    fn forward(&self, x: &[f64]) -> Vec<f64> {
        let mut z = self.bias.clone();
        accumulate(&mut z, x, &self.kernel);
        z.into_iter().map(|v| self.activation.apply(v)).collect()
    }
}

/// `z += x . matrix` for a `[x.len()][z.len()]` matrix.
fn accumulate(z: &mut [f64], x: &[f64], matrix: &[Vec<f64>]) {
    for (xi, row) in x.iter().zip(matrix) {
        for (zj, wij) in z.iter_mut().zip(row) {
            *zj += xi * wij;
        }
    }
}

fn check_matrix(
    name: &str,
    matrix: &[Vec<f64>],
    rows: usize,
    cols: usize,
) -> std::result::Result<(), String> {
    if matrix.len() != rows {
        return Err(format!("{name} has {} rows, expected {rows}", matrix.len()));
    }
    for (idx, row) in matrix.iter().enumerate() {
        check_vector(&format!("{name} row {idx}"), row, cols)?;
    }
    Ok(())
}

fn check_vector(name: &str, values: &[f64], len: usize) -> std::result::Result<(), String> {
    if values.len() != len {
        return Err(format!("{name} has {} values, expected {len}", values.len()));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(format!("{name} contains non-finite values"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lstm(input: usize, units: usize, return_sequences: bool) -> Layer {
        Layer::Lstm(LstmLayer {
            units,
            return_sequences,
            kernel: vec![vec![0.0; 4 * units]; input],
            recurrent_kernel: vec![vec![0.0; 4 * units]; units],
            bias: vec![0.0; 4 * units],
        })
    }

    fn dense(input: usize, units: usize, activation: Activation) -> Layer {
        Layer::Dense(DenseLayer {
            activation,
            kernel: vec![vec![0.0; units]; input],
            bias: vec![0.0; units],
        })
    }

    #[test]
    fn test_stacked_shapes_validate() {
        let network = LstmNetwork::new(
            12,
            vec![
                lstm(12, 4, true),
                Layer::Dropout { rate: 0.2 },
                lstm(4, 2, false),
                dense(2, 1, Activation::Sigmoid),
            ],
        );
        assert!(network.is_ok());
    }

    #[test]
    fn test_kernel_shape_mismatch_is_rejected() {
        let err = LstmNetwork::new(12, vec![lstm(11, 4, false), dense(4, 1, Activation::Sigmoid)])
            .unwrap_err();
        assert_eq!(err, "layer 0: kernel has 11 rows, expected 12");
    }

    #[test]
    fn test_sequence_output_is_rejected() {
        let err = LstmNetwork::new(12, vec![lstm(12, 1, true)]).unwrap_err();
        assert!(err.contains("single scalar"));
    }

    #[test]
    fn test_lstm_after_vector_is_rejected() {
        let err = LstmNetwork::new(
            12,
            vec![lstm(12, 2, false), lstm(2, 1, false)],
        )
        .unwrap_err();
        assert_eq!(err, "layer 1: lstm layer needs sequence input");
    }

    #[test]
    fn test_zero_weights_give_half() {
        let network =
            LstmNetwork::new(12, vec![lstm(12, 3, false), dense(3, 1, Activation::Sigmoid)])
                .unwrap();
        let input = Tensor3::from_features(&[1.0; 12]);
        let output = network.predict(&input).unwrap();
        assert_eq!(output, vec![vec![0.5]]);
    }

    #[test]
    fn test_single_unit_lstm_step() {
        let mut kernel = vec![vec![0.0; 4]; 12];
        kernel[4][2] = 1.0;
        let network = LstmNetwork::new(
            12,
            vec![
                Layer::Lstm(LstmLayer {
                    units: 1,
                    return_sequences: false,
                    kernel,
                    recurrent_kernel: vec![vec![0.0; 4]],
                    bias: vec![0.0; 4],
                }),
                Layer::Dense(DenseLayer {
                    activation: Activation::Linear,
                    kernel: vec![vec![1.0]],
                    bias: vec![0.0],
                }),
            ],
        )
        .unwrap();
        let mut features = [0.0; 12];
        features[4] = 1.0;
        let output = network.predict(&Tensor3::from_features(&features)).unwrap();
        let cell = 0.5 * 1.0_f64.tanh();
        let expected = 0.5 * cell.tanh();
        assert!((output[0][0] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_wrong_feature_count_is_inference_error() {
        let network =
            LstmNetwork::new(12, vec![lstm(12, 1, false), dense(1, 1, Activation::Sigmoid)])
                .unwrap();
        let input = Tensor3::new([1, 1, 3], vec![0.0; 3]).unwrap();
        assert!(network.predict(&input).unwrap_err().is_inference());
    }

    #[test]
    fn test_activation_functions() {
        assert_eq!(Activation::Relu.apply(-2.0), 0.0);
        assert_eq!(Activation::Linear.apply(-2.0), -2.0);
        assert_eq!(Activation::Sigmoid.apply(0.0), 0.5);
        assert_eq!(Activation::Tanh.apply(0.0), 0.0);
    }
}
