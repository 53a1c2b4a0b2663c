//! Model bundle: the network plus its preprocessing and decoding artifacts.
//!
//! A bundle is a directory with the following files:
//!
//! | File                    | Contents                          | Required |
//! |-------------------------|-----------------------------------|----------|
//! | `model.json`            | [`NetworkSpec`]                   | yes      |
//! | `scaler.json`           | [`StandardScaler`]                | yes      |
//! | `anomaly_encoder.json`  | [`LabelEncoder`] for anomaly head | yes      |
//! | `activity_encoder.json` | [`LabelEncoder`] for activity head| no       |
//!
//! Everything is loaded and cross-validated once; the bundle is immutable
//! afterwards and safe to share between request handlers.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::encoder::LabelEncoder;
use crate::error::{NnError, NnResult};
use crate::network::{argmax, NetworkSpec, TwoHeadNetwork};
use crate::scaler::StandardScaler;

/// File name of the network artifact
pub const MODEL_FILE: &str = "model.json";
/// File name of the scaler artifact
pub const SCALER_FILE: &str = "scaler.json";
/// File name of the anomaly encoder artifact
pub const ANOMALY_ENCODER_FILE: &str = "anomaly_encoder.json";
/// File name of the optional activity encoder artifact
pub const ACTIVITY_ENCODER_FILE: &str = "activity_encoder.json";

/// Result of classifying one feature vector
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Winning activity class index
    pub activity_index: usize,
    /// Winning anomaly class index
    pub anomaly_index: usize,
    /// Decoded anomaly label
    pub anomaly_label: String,
    /// Probability of the winning activity class
    pub activity_confidence: f32,
    /// Probability of the winning anomaly class
    pub anomaly_confidence: f32,
}

/// Summary of a loaded bundle, suitable for health/status endpoints
#[derive(Debug, Clone, Serialize)]
pub struct BundleInfo {
    /// Directory the bundle was loaded from
    pub path: PathBuf,
    /// Expected feature count
    pub input_dim: usize,
    /// Hidden layers in the shared trunk
    pub hidden_layers: usize,
    /// Activity head width
    pub activity_classes: usize,
    /// Anomaly labels in class order
    pub anomaly_classes: Vec<String>,
}

/// Loaded, validated model bundle
#[derive(Debug, Clone)]
pub struct ModelBundle {
    path: PathBuf,
    network: TwoHeadNetwork,
    scaler: StandardScaler,
    anomaly_encoder: LabelEncoder,
    activity_encoder: Option<LabelEncoder>,
}

impl ModelBundle {
    /// Load a bundle from a directory.
    ///
    /// # Errors
    ///
    /// Returns [`NnError::ArtifactRead`] / [`NnError::ArtifactParse`] for
    /// unreadable or malformed files, and [`NnError::ShapeMismatch`] when
    /// the artifacts disagree about dimensions.
    #[instrument(skip_all, fields(dir = %dir.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(dir: P) -> NnResult<Self> {
        let dir = dir.as_ref();

        let network = TwoHeadNetwork::from_spec(read_json::<NetworkSpec>(&dir.join(MODEL_FILE))?)?;
        let scaler: StandardScaler = read_json(&dir.join(SCALER_FILE))?;
        scaler.validate()?;
        let anomaly_encoder: LabelEncoder = read_json(&dir.join(ANOMALY_ENCODER_FILE))?;
        anomaly_encoder.validate()?;

        let activity_path = dir.join(ACTIVITY_ENCODER_FILE);
        let activity_encoder = if activity_path.exists() {
            let encoder: LabelEncoder = read_json(&activity_path)?;
            encoder.validate()?;
            Some(encoder)
        } else {
            debug!("no activity encoder in bundle");
            None
        };

        let bundle = Self::from_parts(network, scaler, anomaly_encoder, activity_encoder)?
            .with_path(dir.to_path_buf());

        info!(
            input_dim = bundle.network.input_dim(),
            hidden_layers = bundle.network.depth(),
            activity_classes = bundle.network.activity_classes(),
            anomaly_classes = bundle.network.anomaly_classes(),
            "Model bundle loaded"
        );

        Ok(bundle)
    }

    /// Assemble a bundle from in-memory parts, validating dimensions
    pub fn from_parts(
        network: TwoHeadNetwork,
        scaler: StandardScaler,
        anomaly_encoder: LabelEncoder,
        activity_encoder: Option<LabelEncoder>,
    ) -> NnResult<Self> {
        if scaler.dim() != network.input_dim() {
            return Err(NnError::shape_mismatch(
                "scaler vs network input",
                vec![network.input_dim()],
                vec![scaler.dim()],
            ));
        }
        if anomaly_encoder.len() != network.anomaly_classes() {
            return Err(NnError::shape_mismatch(
                "anomaly encoder vs anomaly head",
                vec![network.anomaly_classes()],
                vec![anomaly_encoder.len()],
            ));
        }
        if let Some(encoder) = &activity_encoder {
            if encoder.len() != network.activity_classes() {
                return Err(NnError::shape_mismatch(
                    "activity encoder vs activity head",
                    vec![network.activity_classes()],
                    vec![encoder.len()],
                ));
            }
        }

        Ok(Self {
            path: PathBuf::new(),
            network,
            scaler,
            anomaly_encoder,
            activity_encoder,
        })
    }

    fn with_path(mut self, path: PathBuf) -> Self {
        self.path = path;
        self
    }

    /// Expected feature count
    pub fn input_dim(&self) -> usize {
        self.network.input_dim()
    }

    /// Anomaly encoder
    pub fn anomaly_encoder(&self) -> &LabelEncoder {
        &self.anomaly_encoder
    }

    /// Activity encoder, if the bundle shipped one
    pub fn activity_encoder(&self) -> Option<&LabelEncoder> {
        self.activity_encoder.as_ref()
    }

    /// Bundle summary
    pub fn info(&self) -> BundleInfo {
        BundleInfo {
            path: self.path.clone(),
            input_dim: self.network.input_dim(),
            hidden_layers: self.network.depth(),
            activity_classes: self.network.activity_classes(),
            anomaly_classes: self.anomaly_encoder.classes().to_vec(),
        }
    }

    /// Scale, classify and decode one raw feature vector
    pub fn predict(&self, features: &[f64]) -> NnResult<Prediction> {
        if features.iter().any(|v| !v.is_finite()) {
            return Err(NnError::invalid_input("feature vector contains non-finite values"));
        }

        let scaled = self.scaler.transform(features)?;
        let outputs = self.network.forward(&scaled)?;

        let activity = outputs
            .activity
            .as_slice()
            .ok_or_else(|| NnError::inference("activity output is not contiguous"))?;
        let anomaly = outputs
            .anomaly
            .as_slice()
            .ok_or_else(|| NnError::inference("anomaly output is not contiguous"))?;

        if activity.iter().chain(anomaly.iter()).any(|p| !p.is_finite()) {
            return Err(NnError::inference("network produced non-finite output"));
        }

        let activity_index =
            argmax(activity).ok_or_else(|| NnError::inference("empty activity distribution"))?;
        let anomaly_index =
            argmax(anomaly).ok_or_else(|| NnError::inference("empty anomaly distribution"))?;
        let anomaly_label = self.anomaly_encoder.inverse_transform(anomaly_index)?.to_string();

        Ok(Prediction {
            activity_index,
            anomaly_index,
            anomaly_label,
            activity_confidence: activity[activity_index],
            anomaly_confidence: anomaly[anomaly_index],
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> NnResult<T> {
    let contents = std::fs::read_to_string(path).map_err(|source| NnError::ArtifactRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| NnError::ArtifactParse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const MODEL: &str = r#"{
        "input_dim": 2,
        "trunk": [],
        "activity_head": {
            "weights": [[1.0, 0.0], [0.0, 1.0], [0.0, 0.0]],
            "bias": [0.0, 0.0, 0.0],
            "activation": "softmax"
        },
        "anomaly_head": {
            "weights": [[-1.0, 0.0], [1.0, 0.0]],
            "bias": [0.0, 0.0],
            "activation": "softmax"
        }
    }"#;

    fn write_bundle(dir: &Path) {
        std::fs::write(dir.join(MODEL_FILE), MODEL).unwrap();
        std::fs::write(dir.join(SCALER_FILE), r#"{"mean": [10.0, 0.0], "scale": [5.0, 1.0]}"#).unwrap();
        std::fs::write(
            dir.join(ANOMALY_ENCODER_FILE),
            r#"{"classes": ["Normal", "Tachycardia"]}"#,
        )
        .unwrap();
    }

    #[test]
    fn test_load_and_predict() {
        let tmp = tempdir().unwrap();
        write_bundle(tmp.path());

        let bundle = ModelBundle::load(tmp.path()).unwrap();
        assert_eq!(bundle.input_dim(), 2);
        assert!(bundle.activity_encoder().is_none());

        // scaled = [2.0, 0.0] -> activity 0, anomaly 1
        let high = bundle.predict(&[20.0, 0.0]).unwrap();
        assert_eq!(high.activity_index, 0);
        assert_eq!(high.anomaly_label, "Tachycardia");
        assert!(high.anomaly_confidence > 0.5);

        // scaled = [-2.0, 3.0] -> activity 1, anomaly 0
        let low = bundle.predict(&[0.0, 3.0]).unwrap();
        assert_eq!(low.activity_index, 1);
        assert_eq!(low.anomaly_label, "Normal");
    }

    #[test]
    fn test_missing_model_file() {
        let tmp = tempdir().unwrap();
        let err = ModelBundle::load(tmp.path()).unwrap_err();
        assert!(matches!(err, NnError::ArtifactRead { .. }));
    }

    #[test]
    fn test_malformed_scaler() {
        let tmp = tempdir().unwrap();
        write_bundle(tmp.path());
        std::fs::write(tmp.path().join(SCALER_FILE), "{not json").unwrap();

        let err = ModelBundle::load(tmp.path()).unwrap_err();
        assert!(matches!(err, NnError::ArtifactParse { .. }));
    }

    #[test]
    fn test_encoder_width_must_match_head() {
        let tmp = tempdir().unwrap();
        write_bundle(tmp.path());
        std::fs::write(
            tmp.path().join(ANOMALY_ENCODER_FILE),
            r#"{"classes": ["Normal", "Tachycardia", "Bradycardia"]}"#,
        )
        .unwrap();

        let err = ModelBundle::load(tmp.path()).unwrap_err();
        assert!(matches!(err, NnError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_optional_activity_encoder_is_checked() {
        let tmp = tempdir().unwrap();
        write_bundle(tmp.path());
        std::fs::write(
            tmp.path().join(ACTIVITY_ENCODER_FILE),
            r#"{"classes": ["Sitting", "Standing"]}"#,
        )
        .unwrap();
        assert!(ModelBundle::load(tmp.path()).is_err());

        std::fs::write(
            tmp.path().join(ACTIVITY_ENCODER_FILE),
            r#"{"classes": ["Sitting", "Standing", "Walking"]}"#,
        )
        .unwrap();
        let bundle = ModelBundle::load(tmp.path()).unwrap();
        assert_eq!(bundle.activity_encoder().map(LabelEncoder::len), Some(3));
        assert_eq!(bundle.info().anomaly_classes, vec!["Normal", "Tachycardia"]);
    }

    #[test]
    fn test_rejects_wrong_width_and_non_finite_input() {
        let tmp = tempdir().unwrap();
        write_bundle(tmp.path());
        let bundle = ModelBundle::load(tmp.path()).unwrap();

        assert!(matches!(
            bundle.predict(&[1.0, 2.0, 3.0]),
            Err(NnError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            bundle.predict(&[f64::INFINITY, 0.0]),
            Err(NnError::InvalidInput(_))
        ));
    }
}
