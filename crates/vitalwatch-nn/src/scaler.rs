//! Standardization of raw feature vectors.
//!
//! Mirrors the behaviour of a fitted sklearn `StandardScaler`:
//! `z = (x - mean) / scale`, where a zero scale leaves the centered
//! value untouched.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{NnError, NnResult};

/// Per-feature mean/scale normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Create a scaler from fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns [`NnError::ShapeMismatch`] if `mean` and `scale` differ in
    /// length, and [`NnError::Config`] if any parameter is not finite.
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> NnResult<Self> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    /// Identity scaler for `dim` features
    pub fn identity(dim: usize) -> Self {
        Self {
            mean: vec![0.0; dim],
            scale: vec![1.0; dim],
        }
    }

    /// Check parameter consistency after deserialization
    pub fn validate(&self) -> NnResult<()> {
        if self.mean.len() != self.scale.len() {
            return Err(NnError::shape_mismatch(
                "scaler",
                vec![self.mean.len()],
                vec![self.scale.len()],
            ));
        }
        if self.mean.iter().chain(self.scale.iter()).any(|v| !v.is_finite()) {
            return Err(NnError::config("scaler parameters must be finite"));
        }
        Ok(())
    }

    /// Number of features this scaler was fitted on
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    /// Standardize one feature vector
    pub fn transform(&self, features: &[f64]) -> NnResult<Array1<f32>> {
        if features.len() != self.dim() {
            return Err(NnError::shape_mismatch(
                "scaler input",
                vec![self.dim()],
                vec![features.len()],
            ));
        }

        Ok(features
            .iter()
            .zip(self.mean.iter().zip(self.scale.iter()))
            .map(|(&x, (&mean, &scale))| {
                let scale = if scale == 0.0 { 1.0 } else { scale };
                ((x - mean) / scale) as f32
            })
            .collect())
    }
}
