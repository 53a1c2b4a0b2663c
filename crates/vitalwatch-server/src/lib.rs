//! # VitalWatch Server
//!
//! Health-telemetry ingestion service. A wearable posts one reading at a
//! time (two 3-axis accelerometers, heart rate, SpO2); the server classifies
//! the wearer's activity and flags anomalies, keeps the latest result for a
//! polling dashboard, and sends an SMS alert for anything other than a
//! normal reading.
//!
//! ## Architecture
//!
//! ```text
//! POST /predict ─▶ PredictionPipeline ─┬─▶ InferenceAdapter (vitalwatch-nn bundle)
//!                                      ├─▶ LatestReadingCache ◀── GET /latest
//!                                      └─▶ AlertGateway ─▶ Twilio SMS | log
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use clap::Parser;
//! use vitalwatch_server::{build_app, config::Args};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), vitalwatch_server::VitalWatchError> {
//!     let args = Args::parse();
//!     let app = build_app(&args)?;
//!     let listener = tokio::net::TcpListener::bind(args.listen_addr()?).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod alerting;
pub mod api;
pub mod cache;
pub mod config;
pub mod domain;
pub mod integration;
pub mod pipeline;

use std::sync::Arc;

use axum::Router;
use thiserror::Error;
use tracing::info;
use vitalwatch_nn::NnError;

pub use alerting::{AlertGateway, AlertHandler, LogAlertHandler, TwilioSmsHandler};
pub use api::{create_router, AppState};
pub use cache::LatestReadingCache;
pub use config::{Args, ConfigError};
pub use integration::{BundleAdapter, InferenceAdapter};
pub use pipeline::{PipelineError, PredictionPipeline};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Startup errors
#[derive(Debug, Error)]
pub enum VitalWatchError {
    /// Model bundle could not be loaded
    #[error("Model error: {0}")]
    Model(#[from] NnError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Socket or filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for startup operations
pub type Result<T> = std::result::Result<T, VitalWatchError>;

/// Build the alert gateway: SMS when configured, the log otherwise.
pub fn build_gateway(args: &Args) -> Result<AlertGateway> {
    let handler: Box<dyn AlertHandler> = match args.twilio_config()? {
        Some(twilio) => {
            info!(to = %twilio.to, "SMS alerts enabled");
            Box::new(TwilioSmsHandler::new(twilio))
        }
        None => {
            info!("SMS alerts not configured, alerts go to the log");
            Box::new(LogAlertHandler)
        }
    };

    Ok(AlertGateway::new(args.alert_timeout()).with_handler(handler))
}

/// Load the model bundle and assemble the shared application state.
pub fn build_state(args: &Args) -> Result<AppState> {
    let adapter = BundleAdapter::load(&args.model_dir)?;
    let info = adapter.info();
    info!(
        path = %info.path.display(),
        hidden_layers = info.hidden_layers,
        anomaly_classes = info.anomaly_classes.len(),
        "Inference adapter ready"
    );

    let pipeline = PredictionPipeline::new(Arc::new(adapter), build_gateway(args)?);
    Ok(AppState::with_model_info(pipeline, Some(info)))
}

/// Load the model bundle and assemble the router.
pub fn build_app(args: &Args) -> Result<Router> {
    Ok(create_router(build_state(args)?))
}
