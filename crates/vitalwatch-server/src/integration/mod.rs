//! Integration layer (Anti-Corruption Layer) for the inference crate.
//!
//! The pipeline only sees [`InferenceAdapter`]: a feature vector goes in,
//! an activity index and an anomaly label come out. The model bundle from
//! `vitalwatch-nn` is one implementation; tests substitute their own.

mod bundle_adapter;

pub use bundle_adapter::BundleAdapter;

use vitalwatch_nn::NnError;

use crate::domain::FeatureVector;

/// Classifier verdict for one feature vector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inference {
    /// Winning activity class index
    pub activity_index: usize,
    /// Decoded anomaly label
    pub anomaly: String,
}

impl Inference {
    /// Convenience constructor
    pub fn new(activity_index: usize, anomaly: impl Into<String>) -> Self {
        Self {
            activity_index,
            anomaly: anomaly.into(),
        }
    }
}

/// Scaler + classifier + anomaly decoder behind one blocking call
pub trait InferenceAdapter: Send + Sync {
    /// Backend name, for logs and health output
    fn name(&self) -> &str;

    /// Classify one reading
    fn infer(&self, features: &FeatureVector) -> Result<Inference, NnError>;
}
