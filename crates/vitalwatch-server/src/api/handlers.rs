//! Axum request handlers.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Html,
    Json,
};

use super::dto::{LivenessResponse, ModelStatus, ReadinessResponse};
use super::error::ApiResult;
use super::state::AppState;
use crate::domain::{LatestReading, PredictionResult, SensorReadingPayload};

/// Dashboard page, polls `/latest`
static INDEX_HTML: &str = include_str!("../../assets/index.html");

/// Serve the dashboard.
#[tracing::instrument]
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Classify one sensor reading.
///
/// # OpenAPI
///
/// ```yaml
/// /predict:
///   post:
///     summary: Classify a sensor reading
///     requestBody:
///       required: true
///       content:
///         application/json:
///           schema:
///             type: object
///             required: [Ax1, Ay1, Az1, Ax2, Ay2, Az2, BPM, SPO2]
///     responses:
///       200:
///         description: Prediction, also stored as the latest reading
///       400:
///         description: Missing fields or undecodable body
///       415:
///         description: Body not sent as application/json
///       500:
///         description: Classifier failure
/// ```
#[tracing::instrument(skip_all)]
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<SensorReadingPayload>, JsonRejection>,
) -> ApiResult<Json<PredictionResult>> {
    let Json(payload) = payload?;

    let result = state.pipeline().predict(payload).await?;
    Ok(Json(result))
}

/// Most recent prediction, or placeholders before the first one.
#[tracing::instrument(skip(state))]
pub async fn latest(State(state): State<AppState>) -> Json<LatestReading> {
    let reading = state.pipeline().latest();
    Json(LatestReading::clone(&reading))
}

/// Liveness check.
pub async fn health_live(State(state): State<AppState>) -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "alive",
        uptime_secs: state.uptime().as_secs(),
    })
}

/// Readiness check with model and alerting details.
pub async fn health_ready(State(state): State<AppState>) -> Json<ReadinessResponse> {
    let pipeline = state.pipeline();
    Json(ReadinessResponse {
        status: "ready",
        version: crate::VERSION,
        model: ModelStatus {
            backend: pipeline.adapter().name().to_string(),
            bundle: state.model_info().cloned(),
        },
        alerts: pipeline.gateway().stats(),
        has_reading: pipeline.latest().result().is_some(),
    })
}
