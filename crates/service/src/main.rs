//! Prediction service - symptom-based disease prediction over HTTP
//!
//! Serves predictions from pre-trained classifiers given a set of
//! reported symptoms, with a symptom vocabulary derived from the
//! training dataset.

use anyhow::Result;
use service_lib::{ModelStore, ServiceMetrics, StructuredLogger, VocabularyStore};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting prediction-service");

    // Load configuration
    let config = config::ServiceConfig::load()?;
    info!(port = config.port, "Service configured");

    // Initialize caches; both populate lazily on first use
    let vocabulary = VocabularyStore::new(config.dataset_paths.clone());
    let models = ModelStore::new(config.model_dirs.clone(), config.model_base_url.clone())?;

    // Warm the vocabulary at startup; failure is soft and retried later
    let symptoms = vocabulary.ensure_loaded().await;
    info!(symptoms = symptoms.len(), "Vocabulary warmed");

    // Initialize metrics and structured logger
    let metrics = ServiceMetrics::new();
    metrics.set_vocabulary_size(symptoms.len() as i64);

    let logger = StructuredLogger::new("prediction-service");
    logger.log_startup(SERVICE_VERSION, config.port);

    // Create shared application state
    let app_state = Arc::new(api::AppState {
        vocabulary,
        models,
        metrics,
        logger: logger.clone(),
        frontend_path: config.frontend_path.clone(),
    });

    // Start the API server
    let api_handle = tokio::spawn(api::serve(config.port, app_state));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    logger.log_shutdown("SIGINT received");
    info!("Shutting down");
    api_handle.abort();

    Ok(())
}
