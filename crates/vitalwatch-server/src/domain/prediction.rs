//! Prediction results and the latest-reading view.

use serde::{Serialize, Serializer};

use super::labels::AnomalyKind;
use super::reading::SensorReading;

/// Placeholder shown for every field before the first prediction
pub const PLACEHOLDER: &str = "--";

/// Outcome of classifying one reading. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictionResult {
    /// Heart rate, truncated toward zero
    pub heart_rate: i64,
    /// Blood-oxygen saturation, truncated toward zero
    pub spo2: i64,
    /// Activity display name
    pub activity: String,
    /// Anomaly label
    pub anomaly: String,
    /// Advisory text for the anomaly
    pub suggestion: String,
}

impl PredictionResult {
    /// Build a result from the reading and the resolved labels
    pub fn new(reading: &SensorReading, activity: &str, anomaly: &AnomalyKind) -> Self {
        Self {
            heart_rate: truncate(reading.bpm),
            spo2: truncate(reading.spo2),
            activity: activity.to_string(),
            anomaly: anomaly.label().to_string(),
            suggestion: anomaly.suggestion().to_string(),
        }
    }
}

// Float -> int toward zero, saturating at the i64 range.
fn truncate(value: f64) -> i64 {
    value.trunc() as i64
}

/// Contents of the single-slot cache
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LatestReading {
    /// No successful prediction yet
    #[default]
    Pending,
    /// Most recent successful prediction
    Ready(PredictionResult),
}

impl LatestReading {
    /// The prediction, if one has been made
    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            LatestReading::Pending => None,
            LatestReading::Ready(result) => Some(result),
        }
    }
}

#[derive(Serialize)]
struct Placeholder {
    heart_rate: &'static str,
    spo2: &'static str,
    activity: &'static str,
    anomaly: &'static str,
    suggestion: &'static str,
}

impl Serialize for LatestReading {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LatestReading::Pending => Placeholder {
                heart_rate: PLACEHOLDER,
                spo2: PLACEHOLDER,
                activity: PLACEHOLDER,
                anomaly: PLACEHOLDER,
                suggestion: PLACEHOLDER,
            }
            .serialize(serializer),
            LatestReading::Ready(result) => result.serialize(serializer),
        }
    }
}
