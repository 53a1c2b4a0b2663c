//! Alerting module for abnormal-vitals notifications.

mod gateway;
mod twilio;

pub use gateway::{AlertGateway, AlertStats, DispatchReport, LogAlertHandler};
pub use twilio::{TwilioConfig, TwilioSmsHandler, DEFAULT_API_BASE};

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by alert handlers. Never surfaced to API clients.
#[derive(Debug, Error)]
pub enum AlertError {
    /// The provider answered but refused the message
    #[error("Alert delivery rejected (status {status}): {body}")]
    Delivery {
        /// HTTP status returned by the provider
        status: u16,
        /// Provider response body
        body: String,
    },

    /// The request never got a response
    #[error("Alert transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Handler did not finish within the configured timeout
    #[error("Alert handler '{handler}' timed out after {timeout_ms} ms")]
    Timeout {
        /// Handler name
        handler: String,
        /// Configured timeout
        timeout_ms: u64,
    },
}

/// An outgoing alert
#[derive(Debug, Clone)]
pub struct Alert {
    id: Uuid,
    message: String,
    created_at: DateTime<Utc>,
}

impl Alert {
    /// Create an alert with a fresh id
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    /// Alert id (for log correlation)
    pub fn id(&self) -> &Uuid {
        &self.id
    }

    /// Message body
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Creation time
    pub fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }
}

/// Handler for delivering alerts
#[async_trait::async_trait]
pub trait AlertHandler: Send + Sync {
    /// Handler name
    fn name(&self) -> &str;

    /// Deliver an alert
    async fn handle(&self, alert: &Alert) -> Result<(), AlertError>;
}

/// Compose the SMS body for an abnormal reading.
///
/// Vitals are printed as received, not truncated.
pub fn format_alert(anomaly: &str, activity: &str, bpm: f64, spo2: f64) -> String {
    format!(
        "🚨 Anomaly Detected: {anomaly}\nActivity: {activity}\nHeart Rate: {bpm}, SpO2: {spo2}%"
    )
}
