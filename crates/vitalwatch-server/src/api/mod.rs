//! HTTP API for the telemetry service.
//!
//! ## Endpoints
//!
//! - `GET /` - Dashboard page
//! - `POST /predict` - Classify a reading and cache the result (requires
//!   `Content-Type: application/json`)
//! - `GET /latest` - Most recent prediction (placeholders before the first)
//! - `GET /health/live` - Liveness check
//! - `GET /health/ready` - Readiness check with model and alert details

pub mod dto;
pub mod error;
pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use dto::*;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Create the router with all endpoints.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use vitalwatch_server::alerting::AlertGateway;
/// use vitalwatch_server::api::{create_router, AppState};
/// use vitalwatch_server::integration::BundleAdapter;
/// use vitalwatch_server::pipeline::PredictionPipeline;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let adapter = Arc::new(BundleAdapter::load("models/demo")?);
///     let pipeline = PredictionPipeline::new(adapter, AlertGateway::default());
///     let app = create_router(AppState::new(pipeline));
///     let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
///     axum::serve(listener, app).await?;
///     Ok(())
/// }
/// ```
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/predict", post(handlers::predict))
        .route("/latest", get(handlers::latest))
        .route("/health/live", get(handlers::health_live))
        .route("/health/ready", get(handlers::health_ready))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
