//! Response bodies that are not domain types.

use serde::Serialize;
use vitalwatch_nn::BundleInfo;

use crate::alerting::AlertStats;

/// JSON error body: `{"error": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResponse {
    /// Human-readable reason
    pub error: String,
}

impl ErrorResponse {
    /// Wrap a message
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

/// Liveness check body
#[derive(Debug, Clone, Serialize)]
pub struct LivenessResponse {
    /// Always `"alive"`
    pub status: &'static str,
    /// Seconds since the server started
    pub uptime_secs: u64,
}

/// Readiness check body
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    /// Always `"ready"` once the router is serving
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
    /// Loaded classifier
    pub model: ModelStatus,
    /// Alert dispatch totals
    pub alerts: AlertStats,
    /// Whether a prediction has been cached yet
    pub has_reading: bool,
}

/// Classifier details for the readiness check
#[derive(Debug, Clone, Serialize)]
pub struct ModelStatus {
    /// Adapter name
    pub backend: String,
    /// Bundle summary, when the backend is a model bundle
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle: Option<BundleInfo>,
}
