//! VitalWatch server binary.

use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vitalwatch_server::{build_state, create_router, Args, VERSION};

#[tokio::main]
async fn main() -> vitalwatch_server::Result<()> {
    // Missing .env is fine.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vitalwatch_server=info,tower_http=info".into()),
        )
        .init();

    let args = Args::parse();
    info!(version = VERSION, model_dir = %args.model_dir.display(), "Starting VitalWatch server");

    let state = build_state(&args)?;
    let app = create_router(state.clone());
    let addr = args.listen_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("HTTP server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Drain in-flight alerts.
    let gateway = state.pipeline().gateway();
    let grace = args.alert_timeout() + Duration::from_secs(1);
    if tokio::time::timeout(grace, gateway.wait_idle()).await.is_err() {
        warn!(pending = gateway.stats().pending, "Alerts still pending at shutdown");
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
