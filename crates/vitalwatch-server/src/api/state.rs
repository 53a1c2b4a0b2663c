//! Shared application state for the API.

use std::sync::Arc;
use std::time::{Duration, Instant};

use vitalwatch_nn::BundleInfo;

use crate::pipeline::PredictionPipeline;

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pipeline: PredictionPipeline,
    model_info: Option<BundleInfo>,
    started_at: Instant,
}

impl AppState {
    /// Create state around a pipeline
    pub fn new(pipeline: PredictionPipeline) -> Self {
        Self::with_model_info(pipeline, None)
    }

    /// Create state and record the loaded bundle for the readiness check
    pub fn with_model_info(pipeline: PredictionPipeline, model_info: Option<BundleInfo>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                pipeline,
                model_info,
                started_at: Instant::now(),
            }),
        }
    }

    /// The prediction pipeline
    pub fn pipeline(&self) -> &PredictionPipeline {
        &self.inner.pipeline
    }

    /// Loaded bundle summary, if any
    pub fn model_info(&self) -> Option<&BundleInfo> {
        self.inner.model_info.as_ref()
    }

    /// Time since the state was created
    pub fn uptime(&self) -> Duration {
        self.inner.started_at.elapsed()
    }
}
