//! Sensor readings and the feature vector derived from them.

use serde::{Deserialize, Serialize};

/// Number of features fed to the classifier
pub const FEATURE_COUNT: usize = 8;

/// Wire names of the required fields, in feature order
pub const FIELD_NAMES: [&str; FEATURE_COUNT] =
    ["Ax1", "Ay1", "Az1", "Ax2", "Ay2", "Az2", "BPM", "SPO2"];

/// Request payload as sent by the device.
///
/// Every field is optional at this level so that absence is reported as a
/// missing-field condition rather than a decoding failure. A JSON `null`
/// counts as absent.
///
/// ## Example
///
/// ```json
/// {
///   "Ax1": 0.1, "Ay1": 0.2, "Az1": 9.8,
///   "Ax2": 0.0, "Ay2": 0.1, "Az2": 9.7,
///   "BPM": 72, "SPO2": 98
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorReadingPayload {
    /// First accelerometer, x axis
    #[serde(rename = "Ax1", default)]
    pub ax1: Option<f64>,
    /// First accelerometer, y axis
    #[serde(rename = "Ay1", default)]
    pub ay1: Option<f64>,
    /// First accelerometer, z axis
    #[serde(rename = "Az1", default)]
    pub az1: Option<f64>,
    /// Second accelerometer, x axis
    #[serde(rename = "Ax2", default)]
    pub ax2: Option<f64>,
    /// Second accelerometer, y axis
    #[serde(rename = "Ay2", default)]
    pub ay2: Option<f64>,
    /// Second accelerometer, z axis
    #[serde(rename = "Az2", default)]
    pub az2: Option<f64>,
    /// Heart rate in beats per minute
    #[serde(rename = "BPM", default)]
    pub bpm: Option<f64>,
    /// Blood-oxygen saturation in percent
    #[serde(rename = "SPO2", default)]
    pub spo2: Option<f64>,
}

impl SensorReadingPayload {
    fn fields(&self) -> [Option<f64>; FEATURE_COUNT] {
        [
            self.ax1, self.ay1, self.az1, self.ax2, self.ay2, self.az2, self.bpm, self.spo2,
        ]
    }

    /// Wire names of every absent field, in feature order
    pub fn missing_fields(&self) -> Vec<&'static str> {
        self.fields()
            .iter()
            .zip(FIELD_NAMES)
            .filter(|(value, _)| value.is_none())
            .map(|(_, name)| name)
            .collect()
    }

    /// All-or-nothing conversion into a complete reading
    pub fn into_reading(self) -> Result<SensorReading, Vec<&'static str>> {
        match self.fields() {
            [Some(ax1), Some(ay1), Some(az1), Some(ax2), Some(ay2), Some(az2), Some(bpm), Some(spo2)] => {
                Ok(SensorReading {
                    ax1,
                    ay1,
                    az1,
                    ax2,
                    ay2,
                    az2,
                    bpm,
                    spo2,
                })
            }
            _ => Err(self.missing_fields()),
        }
    }
}

/// A complete reading from the wearable: two accelerometers plus vitals
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// First accelerometer, x axis
    pub ax1: f64,
    /// First accelerometer, y axis
    pub ay1: f64,
    /// First accelerometer, z axis
    pub az1: f64,
    /// Second accelerometer, x axis
    pub ax2: f64,
    /// Second accelerometer, y axis
    pub ay2: f64,
    /// Second accelerometer, z axis
    pub az2: f64,
    /// Heart rate in beats per minute
    pub bpm: f64,
    /// Blood-oxygen saturation in percent
    pub spo2: f64,
}

impl SensorReading {
    /// Feature vector in the order the classifier was trained on
    pub fn features(&self) -> FeatureVector {
        FeatureVector([
            self.ax1, self.ay1, self.az1, self.ax2, self.ay2, self.az2, self.bpm, self.spo2,
        ])
    }
}

/// Fixed-order classifier input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector(pub [f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Borrow as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}
