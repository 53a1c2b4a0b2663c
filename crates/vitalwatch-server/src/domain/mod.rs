//! Domain model for the telemetry service.

pub mod labels;
pub mod prediction;
pub mod reading;

pub use labels::{activity_label, Activity, AnomalyKind, NO_SUGGESTION, UNKNOWN_ACTIVITY};
pub use prediction::{LatestReading, PredictionResult, PLACEHOLDER};
pub use reading::{FeatureVector, SensorReading, SensorReadingPayload, FEATURE_COUNT, FIELD_NAMES};
