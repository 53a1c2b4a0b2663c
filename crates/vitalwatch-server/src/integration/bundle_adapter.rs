//! Adapter for vitalwatch-nn model bundles.

use std::path::Path;

use tracing::debug;
use vitalwatch_nn::{BundleInfo, ModelBundle, NnError};

use super::{Inference, InferenceAdapter};
use crate::domain::{FeatureVector, FEATURE_COUNT};

/// Inference backed by a [`ModelBundle`] loaded at startup
#[derive(Debug, Clone)]
pub struct BundleAdapter {
    bundle: ModelBundle,
}

impl BundleAdapter {
    /// Wrap an already loaded bundle, checking its input width
    pub fn new(bundle: ModelBundle) -> Result<Self, NnError> {
        if bundle.input_dim() != FEATURE_COUNT {
            return Err(NnError::shape_mismatch(
                "bundle input",
                vec![FEATURE_COUNT],
                vec![bundle.input_dim()],
            ));
        }
        Ok(Self { bundle })
    }

    /// Load a bundle directory
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, NnError> {
        Self::new(ModelBundle::load(dir)?)
    }

    /// Summary of the wrapped bundle
    pub fn info(&self) -> BundleInfo {
        self.bundle.info()
    }
}

impl InferenceAdapter for BundleAdapter {
    fn name(&self) -> &str {
        "dense-bundle"
    }

    fn infer(&self, features: &FeatureVector) -> Result<Inference, NnError> {
        let prediction = self.bundle.predict(features.as_slice())?;

        debug!(
            activity_index = prediction.activity_index,
            activity_confidence = prediction.activity_confidence,
            anomaly = %prediction.anomaly_label,
            anomaly_confidence = prediction.anomaly_confidence,
            "Classified reading"
        );

        Ok(Inference {
            activity_index: prediction.activity_index,
            anomaly: prediction.anomaly_label,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitalwatch_nn::{
        Activation, LabelEncoder, LayerSpec, NetworkSpec, StandardScaler, TwoHeadNetwork,
    };

    fn bundle(input_dim: usize) -> ModelBundle {
        // Activity follows the sign of the first feature, anomaly the sign of BPM.
        let mut activity_row = vec![0.0; input_dim];
        activity_row[0] = 1.0;
        let mut anomaly_row = vec![0.0; input_dim];
        anomaly_row[input_dim - 2] = 1.0;

        let network = TwoHeadNetwork::from_spec(NetworkSpec {
            input_dim,
            trunk: vec![],
            activity_head: LayerSpec {
                weights: vec![vec![0.0; input_dim], activity_row],
                bias: vec![0.0, 0.0],
                activation: Activation::Softmax,
            },
            anomaly_head: LayerSpec {
                weights: vec![vec![0.0; input_dim], anomaly_row],
                bias: vec![0.0, 0.0],
                activation: Activation::Softmax,
            },
        })
        .unwrap();

        ModelBundle::from_parts(
            network,
            StandardScaler::identity(input_dim),
            LabelEncoder::new(["Normal", "Tachycardia"]).unwrap(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_infer_decodes_anomaly() {
        let adapter = BundleAdapter::new(bundle(FEATURE_COUNT)).unwrap();

        let high = FeatureVector([1.0, 0.0, 9.8, 0.0, 0.0, 9.8, 3.0, 0.0]);
        assert_eq!(adapter.infer(&high).unwrap(), Inference::new(1, "Tachycardia"));

        let calm = FeatureVector([-1.0, 0.0, 9.8, 0.0, 0.0, 9.8, -3.0, 0.0]);
        assert_eq!(adapter.infer(&calm).unwrap(), Inference::new(0, "Normal"));
    }

    #[test]
    fn test_rejects_bundle_with_wrong_width() {
        assert!(matches!(
            BundleAdapter::new(bundle(4)),
            Err(NnError::ShapeMismatch { .. })
        ));
    }
}
