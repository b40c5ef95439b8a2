//! Fraud Scoring Dashboard - Main Entry Point
//!
//! Loads the trained model once, then serves the dashboard and JSON API
//! until interrupted.

use anyhow::{Context, Result};
use fraud_scoring_dashboard::{
    config::AppConfig,
    invoker::PredictionInvoker,
    logging::init_tracing,
    metrics::ScoringMetrics,
    models::ModelHandle,
    web::{build_router, AppState},
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    init_tracing(&config.logging);

    info!("Starting Fraud Scoring Dashboard");
    info!(
        bind = %config.server.bind_addr(),
        model = %config.model.path,
        max_upload_bytes = config.server.max_upload_bytes,
        "Configuration loaded"
    );

    // The dashboard cannot score anything without the model; fail fast
    let model = ModelHandle::load(&config.model)
        .with_context(|| format!("Unable to start: failed to load model {}", config.model.path))?;
    info!(
        backend = model.backend(),
        source = %model.source().display(),
        "Model loaded"
    );

    let metrics = Arc::new(ScoringMetrics::new());
    let invoker = PredictionInvoker::new(Arc::new(model), metrics.clone());

    if let Some(image) = config.content.eda_image.as_deref() {
        if !std::path::Path::new(image).exists() {
            warn!(path = %image, "EDA image not found; the EDA tab will show a placeholder");
        }
    }

    let state = AppState::new(invoker, config.content.clone());
    let app = build_router(state, config.server.max_upload_bytes);

    let listener = TcpListener::bind(config.server.bind_addr())
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr()))?;
    info!("Dashboard listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Dashboard shutting down...");
    metrics.print_summary();

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
}
