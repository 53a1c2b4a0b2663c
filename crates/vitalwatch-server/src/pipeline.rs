//! Prediction pipeline: validate -> infer -> cache -> (alert) -> respond.
//!
//! ```text
//! Received ──▶ Validated ──▶ Inferred ──▶ Cached ──▶ (Alerted) ──▶ Responded
//!     │             │
//!     ▼             ▼
//!  Rejected       Failed
//! ```
//!
//! `Rejected` (missing fields) and `Failed` (classifier error) both leave the
//! latest-reading cache untouched. The alert is handed to the gateway before
//! the response is built and delivered on a background task, so a client
//! that disconnects early cannot cancel it. Delivery problems never turn a
//! successful prediction into an error.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, instrument, warn};
use vitalwatch_nn::NnError;

use crate::alerting::{format_alert, AlertGateway};
use crate::cache::LatestReadingCache;
use crate::domain::{activity_label, AnomalyKind, LatestReading, PredictionResult, SensorReadingPayload};
use crate::integration::InferenceAdapter;

/// Pipeline failures
#[derive(Debug, Error)]
pub enum PipelineError {
    /// One or more of the eight required fields is absent
    #[error("Missing input fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The classifier could not produce a verdict
    #[error("Inference failed: {0}")]
    Inference(#[from] NnError),
}

/// Orchestrates one prediction per request
pub struct PredictionPipeline {
    adapter: Arc<dyn InferenceAdapter>,
    cache: LatestReadingCache,
    gateway: Arc<AlertGateway>,
}

impl PredictionPipeline {
    /// Create a pipeline with an empty cache
    pub fn new(adapter: Arc<dyn InferenceAdapter>, gateway: AlertGateway) -> Self {
        Self {
            adapter,
            cache: LatestReadingCache::new(),
            gateway: Arc::new(gateway),
        }
    }

    /// Run one reading through the pipeline
    #[instrument(skip_all)]
    pub async fn predict(&self, payload: SensorReadingPayload) -> Result<PredictionResult, PipelineError> {
        let reading = payload.into_reading().map_err(|missing| {
            debug!(?missing, "Rejected reading");
            PipelineError::MissingFields(missing)
        })?;

        let inference = self.adapter.infer(&reading.features()).map_err(|e| {
            warn!(adapter = self.adapter.name(), error = %e, "Inference failed");
            PipelineError::Inference(e)
        })?;

        let activity = activity_label(inference.activity_index);
        let anomaly = AnomalyKind::from_label(&inference.anomaly);
        if !anomaly.is_recognized() {
            warn!(label = %anomaly, "Classifier returned a label outside the catalog");
        }
        let result = PredictionResult::new(&reading, activity, &anomaly);

        self.cache.update(result.clone());

        if anomaly.requires_alert() {
            let message = format_alert(anomaly.label(), activity, reading.bpm, reading.spo2);
            self.gateway.dispatch(message);
        }

        debug!(
            activity = %result.activity,
            anomaly = %result.anomaly,
            heart_rate = result.heart_rate,
            spo2 = result.spo2,
            "Prediction complete"
        );

        Ok(result)
    }

    /// Most recent successful prediction, or the placeholder
    pub fn latest(&self) -> Arc<LatestReading> {
        self.cache.read()
    }

    /// Inference backend
    pub fn adapter(&self) -> &dyn InferenceAdapter {
        self.adapter.as_ref()
    }

    /// Alerting gateway
    pub fn gateway(&self) -> &AlertGateway {
        &self.gateway
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alerting::{Alert, AlertError, AlertHandler};
    use crate::domain::FeatureVector;
    use crate::integration::Inference;
    use parking_lot::Mutex;
    use std::time::Duration;

    /// Adapter returning a fixed verdict and recording what it saw
    struct FixedAdapter {
        verdict: Result<Inference, String>,
        seen: Mutex<Vec<FeatureVector>>,
    }

    impl FixedAdapter {
        fn ok(activity_index: usize, anomaly: &str) -> Arc<Self> {
            Arc::new(Self {
                verdict: Ok(Inference::new(activity_index, anomaly)),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                verdict: Err("model unavailable".into()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    impl InferenceAdapter for FixedAdapter {
        fn name(&self) -> &str {
            "fixed"
        }

        fn infer(&self, features: &FeatureVector) -> Result<Inference, NnError> {
            self.seen.lock().push(*features);
            self.verdict.clone().map_err(NnError::inference)
        }
    }

    #[derive(Clone, Default)]
    struct Outbox(Arc<Mutex<Vec<String>>>);

    #[async_trait::async_trait]
    impl AlertHandler for Outbox {
        fn name(&self) -> &str {
            "outbox"
        }

        async fn handle(&self, alert: &Alert) -> Result<(), AlertError> {
            self.0.lock().push(alert.message().to_string());
            Ok(())
        }
    }

    struct Broken;

    #[async_trait::async_trait]
    impl AlertHandler for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        async fn handle(&self, _alert: &Alert) -> Result<(), AlertError> {
            Err(AlertError::Delivery {
                status: 500,
                body: "upstream down".into(),
            })
        }
    }

    fn pipeline(adapter: Arc<dyn InferenceAdapter>) -> (PredictionPipeline, Outbox) {
        let outbox = Outbox::default();
        let gateway = AlertGateway::default().with_handler(Box::new(outbox.clone()));
        (PredictionPipeline::new(adapter, gateway), outbox)
    }

    fn payload(bpm: f64, spo2: f64) -> SensorReadingPayload {
        SensorReadingPayload {
            ax1: Some(0.1),
            ay1: Some(0.2),
            az1: Some(9.8),
            ax2: Some(0.0),
            ay2: Some(0.1),
            az2: Some(9.7),
            bpm: Some(bpm),
            spo2: Some(spo2),
        }
    }

    #[tokio::test]
    async fn test_normal_reading_is_cached_without_alert() {
        let adapter = FixedAdapter::ok(2, "Normal");
        let (pipeline, outbox) = pipeline(adapter.clone());

        let result = pipeline.predict(payload(72.0, 98.0)).await.unwrap();
        pipeline.gateway().wait_idle().await;
        assert_eq!(
            result,
            PredictionResult {
                heart_rate: 72,
                spo2: 98,
                activity: "Walking".into(),
                anomaly: "Normal".into(),
                suggestion: "Vitals are within a healthy range. Keep monitoring.".into(),
            }
        );
        assert_eq!(pipeline.latest().result(), Some(&result));
        assert!(outbox.0.lock().is_empty());
        assert_eq!(
            adapter.seen.lock()[0].as_slice(),
            &[0.1, 0.2, 9.8, 0.0, 0.1, 9.7, 72.0, 98.0]
        );
    }

    #[tokio::test]
    async fn test_abnormal_reading_alerts_once() {
        let (pipeline, outbox) = pipeline(FixedAdapter::ok(3, "Tachycardia"));

        let result = pipeline.predict(payload(142.0, 96.0)).await.unwrap();
        pipeline.gateway().wait_idle().await;
        assert_eq!(result.activity, "Running");
        assert_eq!(result.suggestion, "High heart rate detected. Please relax or rest.");

        let sent = outbox.0.lock();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("Tachycardia"));
        assert!(sent[0].contains("Running"));
        assert!(sent[0].contains("142"));
        assert!(sent[0].contains("96"));
    }

    #[tokio::test]
    async fn test_unknown_labels_fall_back() {
        let (pipeline, outbox) = pipeline(FixedAdapter::ok(9, "Arrhythmia"));

        let result = pipeline.predict(payload(60.0, 97.0)).await.unwrap();
        pipeline.gateway().wait_idle().await;
        assert_eq!(result.activity, "Unknown");
        assert_eq!(result.anomaly, "Arrhythmia");
        assert_eq!(result.suggestion, "No suggestion available.");
        assert_eq!(outbox.0.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_fields_leave_cache_untouched() {
        let adapter = FixedAdapter::ok(1, "Normal");
        let (pipeline, outbox) = pipeline(adapter.clone());

        pipeline.predict(payload(70.0, 99.0)).await.unwrap();
        let before = pipeline.latest();

        let mut partial = payload(150.0, 80.0);
        partial.spo2 = None;
        let err = pipeline.predict(partial).await.unwrap_err();
        pipeline.gateway().wait_idle().await;

        assert!(matches!(err, PipelineError::MissingFields(ref f) if f == &["SPO2"]));
        assert_eq!(pipeline.latest(), before);
        assert_eq!(adapter.seen.lock().len(), 1);
        assert!(outbox.0.lock().is_empty());
    }

    #[tokio::test]
    async fn test_inference_failure_leaves_cache_pending() {
        let (pipeline, outbox) = pipeline(FixedAdapter::failing());

        let err = pipeline.predict(payload(72.0, 98.0)).await.unwrap_err();
        pipeline.gateway().wait_idle().await;
        assert!(matches!(err, PipelineError::Inference(_)));
        assert_eq!(*pipeline.latest(), LatestReading::Pending);
        assert!(outbox.0.lock().is_empty());
    }

    #[tokio::test]
    async fn test_alert_failure_does_not_mask_prediction() {
        let gateway = AlertGateway::default().with_handler(Box::new(Broken));
        let pipeline = PredictionPipeline::new(FixedAdapter::ok(0, "Bradycardia"), gateway);

        let result = pipeline.predict(payload(38.0, 97.0)).await.unwrap();
        assert_eq!(result.anomaly, "Bradycardia");
        assert_eq!(pipeline.latest().result(), Some(&result));

        pipeline.gateway().wait_idle().await;
        assert_eq!(pipeline.gateway().stats().failed, 1);
    }

    /// Delivers after a provider round trip much longer than the client waits
    struct SlowSms(Outbox);

    #[async_trait::async_trait]
    impl AlertHandler for SlowSms {
        fn name(&self) -> &str {
            "slow-sms"
        }

        async fn handle(&self, alert: &Alert) -> Result<(), AlertError> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            self.0.handle(alert).await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_alert_outlives_abandoned_request() {
        let outbox = Outbox::default();
        let gateway = AlertGateway::default().with_handler(Box::new(SlowSms(outbox.clone())));
        let pipeline = PredictionPipeline::new(FixedAdapter::ok(1, "Critical Hypoxia"), gateway);

        // The client gives up after 50 ms; the request future is dropped.
        let outcome =
            tokio::time::timeout(Duration::from_millis(50), pipeline.predict(payload(80.0, 85.0))).await;
        assert!(outcome.is_ok(), "response must not wait on alert delivery");
        assert!(outbox.0.lock().is_empty());
        assert_eq!(
            pipeline.latest().result().map(|r| r.anomaly.as_str()),
            Some("Critical Hypoxia")
        );

        tokio::time::sleep(Duration::from_secs(1)).await;
        pipeline.gateway().wait_idle().await;

        let sent = outbox.0.lock();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("Critical Hypoxia"));
        let stats = pipeline.gateway().stats();
        assert_eq!((stats.sent, stats.failed, stats.pending), (1, 0, 0));
    }
}
