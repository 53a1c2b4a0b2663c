//! Dense feed-forward network with a shared trunk and two softmax heads.
//!
//! ```text
//!                      ┌──────────────┐
//!                 ┌───▶│ activity head│──▶ P(activity)
//! x ──▶ trunk ────┤    └──────────────┘
//!                 │    ┌──────────────┐
//!                 └───▶│ anomaly head │──▶ P(anomaly)
//!                      └──────────────┘
//! ```
//!
//! Weights are stored row-major as `[out][in]`, the same orientation the
//! layer multiplies with: `y = act(W · x + b)`.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{NnError, NnResult};

/// Layer activation function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    /// Identity
    #[default]
    Linear,
    /// max(0, x)
    Relu,
    /// Hyperbolic tangent
    Tanh,
    /// Logistic sigmoid
    Sigmoid,
    /// Normalized exponential over the whole layer
    Softmax,
}

impl Activation {
    fn apply(self, z: &mut Array1<f32>) {
        match self {
            Activation::Linear => {}
            Activation::Relu => z.mapv_inplace(|v| v.max(0.0)),
            Activation::Tanh => z.mapv_inplace(f32::tanh),
            Activation::Sigmoid => z.mapv_inplace(|v| 1.0 / (1.0 + (-v).exp())),
            Activation::Softmax => softmax_inplace(z),
        }
    }
}

/// Numerically stable in-place softmax
pub fn softmax_inplace(z: &mut Array1<f32>) {
    let max = z.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    z.mapv_inplace(|v| (v - max).exp());
    let sum = z.sum();
    if sum > 0.0 {
        z.mapv_inplace(|v| v / sum);
    }
}

/// Index of the largest value; ties resolve to the lowest index.
///
/// Returns `None` for an empty slice.
pub fn argmax(values: &[f32]) -> Option<usize> {
    let mut iter = values.iter().enumerate();
    let (mut best_idx, mut best) = iter.next().map(|(i, &v)| (i, v))?;
    for (i, &v) in iter {
        if v > best {
            best = v;
            best_idx = i;
        }
    }
    Some(best_idx)
}

/// Serialized form of a dense layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerSpec {
    /// `[out][in]` weight matrix
    pub weights: Vec<Vec<f32>>,
    /// Bias vector of length `out`
    pub bias: Vec<f32>,
    /// Activation applied after the affine transform
    #[serde(default)]
    pub activation: Activation,
}

/// Fully connected layer
#[derive(Debug, Clone)]
pub struct DenseLayer {
    weights: Array2<f32>,
    bias: Array1<f32>,
    activation: Activation,
}

impl DenseLayer {
    /// Build a layer from its serialized form, validating shapes
    pub fn from_spec(spec: LayerSpec, name: &str) -> NnResult<Self> {
        let out_dim = spec.weights.len();
        if out_dim == 0 {
            return Err(NnError::config(format!("layer '{name}' has no outputs")));
        }
        let in_dim = spec.weights[0].len();
        if let Some(row) = spec.weights.iter().find(|row| row.len() != in_dim) {
            return Err(NnError::shape_mismatch(
                format!("layer '{name}' weights"),
                vec![in_dim],
                vec![row.len()],
            ));
        }
        if spec.bias.len() != out_dim {
            return Err(NnError::shape_mismatch(
                format!("layer '{name}' bias"),
                vec![out_dim],
                vec![spec.bias.len()],
            ));
        }

        let flat: Vec<f32> = spec.weights.into_iter().flatten().collect();
        let weights = Array2::from_shape_vec((out_dim, in_dim), flat)
            .map_err(|e| NnError::config(format!("layer '{name}': {e}")))?;

        Ok(Self {
            weights,
            bias: Array1::from(spec.bias),
            activation: spec.activation,
        })
    }

    /// Input width
    pub fn in_dim(&self) -> usize {
        self.weights.ncols()
    }

    /// Output width
    pub fn out_dim(&self) -> usize {
        self.weights.nrows()
    }

    /// Forward pass for a single sample
    pub fn forward(&self, x: &Array1<f32>) -> NnResult<Array1<f32>> {
        if x.len() != self.in_dim() {
            return Err(NnError::shape_mismatch(
                "layer input",
                vec![self.in_dim()],
                vec![x.len()],
            ));
        }
        let mut z = self.weights.dot(x) + &self.bias;
        self.activation.apply(&mut z);
        Ok(z)
    }
}

/// Serialized form of the whole network (`model.json`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Expected feature count
    pub input_dim: usize,
    /// Shared hidden layers, applied in order
    #[serde(default)]
    pub trunk: Vec<LayerSpec>,
    /// Activity classification head
    pub activity_head: LayerSpec,
    /// Anomaly classification head
    pub anomaly_head: LayerSpec,
}

/// Probability distributions produced by one forward pass
#[derive(Debug, Clone)]
pub struct HeadOutputs {
    /// Distribution over activity classes
    pub activity: Array1<f32>,
    /// Distribution over anomaly classes
    pub anomaly: Array1<f32>,
}

/// Two-headed classifier
#[derive(Debug, Clone)]
pub struct TwoHeadNetwork {
    input_dim: usize,
    trunk: Vec<DenseLayer>,
    activity_head: DenseLayer,
    anomaly_head: DenseLayer,
}

impl TwoHeadNetwork {
    /// Build and validate a network from its serialized form
    pub fn from_spec(spec: NetworkSpec) -> NnResult<Self> {
        if spec.input_dim == 0 {
            return Err(NnError::config("input_dim must be positive"));
        }

        let mut width = spec.input_dim;
        let mut trunk = Vec::with_capacity(spec.trunk.len());
        for (i, layer) in spec.trunk.into_iter().enumerate() {
            let name = format!("trunk.{i}");
            let layer = DenseLayer::from_spec(layer, &name)?;
            if layer.in_dim() != width {
                return Err(NnError::shape_mismatch(name, vec![width], vec![layer.in_dim()]));
            }
            width = layer.out_dim();
            trunk.push(layer);
        }

        let activity_head = DenseLayer::from_spec(spec.activity_head, "activity_head")?;
        let anomaly_head = DenseLayer::from_spec(spec.anomaly_head, "anomaly_head")?;
        for (name, head) in [("activity_head", &activity_head), ("anomaly_head", &anomaly_head)] {
            if head.in_dim() != width {
                return Err(NnError::shape_mismatch(name, vec![width], vec![head.in_dim()]));
            }
        }

        Ok(Self {
            input_dim: spec.input_dim,
            trunk,
            activity_head,
            anomaly_head,
        })
    }

    /// Expected feature count
    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    /// Number of activity classes
    pub fn activity_classes(&self) -> usize {
        self.activity_head.out_dim()
    }

    /// Number of anomaly classes
    pub fn anomaly_classes(&self) -> usize {
        self.anomaly_head.out_dim()
    }

    /// Number of hidden layers in the shared trunk
    pub fn depth(&self) -> usize {
        self.trunk.len()
    }

    /// Run both heads on one standardized sample
    pub fn forward(&self, x: &Array1<f32>) -> NnResult<HeadOutputs> {
        let mut hidden = x.clone();
        for layer in &self.trunk {
            hidden = layer.forward(&hidden)?;
        }

        Ok(HeadOutputs {
            activity: self.activity_head.forward(&hidden)?,
            anomaly: self.anomaly_head.forward(&hidden)?,
        })
    }
}
