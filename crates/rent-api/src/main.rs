//! Rent API - rent prediction and evaluation service
//!
//! Loads the model registry once at startup, then serves predictions over HTTP.

use anyhow::{Context, Result};
use rent_api::{api, config::ServiceConfig};
use rent_lib::{
    health::{components, HealthRegistry},
    ModelRegistry, PredictionService, ServiceMetrics, StructuredLogger,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting rent-api");

    let config = ServiceConfig::load().context("Failed to load configuration")?;
    info!(
        port = config.port,
        model_config_path = %config.model_config_path.display(),
        "Service configured"
    );

    let health_registry = HealthRegistry::new();
    health_registry.register(components::REGISTRY).await;
    health_registry.register(components::PREDICTOR).await;

    let metrics = ServiceMetrics::new();
    metrics.set_build_info(SERVICE_VERSION);

    let logger = StructuredLogger::new("rent-api");

    // Every artifact is loaded here, before the listener binds
    let registry = ModelRegistry::load(&config.model_config_path).with_context(|| {
        format!(
            "Failed to load model registry from {}",
            config.model_config_path.display()
        )
    })?;
    logger.log_registry_loaded(
        &config.model_config_path.display().to_string(),
        registry.region_ids().len(),
        registry.variant_count(),
    );

    let service = Arc::new(PredictionService::with_evaluation(
        Arc::new(registry),
        config.evaluation(),
    ));
    let app_state = Arc::new(api::AppState::new(service, health_registry.clone()));

    health_registry.set_ready(true).await;
    logger.log_startup(SERVICE_VERSION, config.port);

    let shutdown_logger = logger.clone();
    api::serve(config.port, app_state, async move {
        let reason = shutdown_signal().await;
        shutdown_logger.log_shutdown(reason);
    })
    .await?;

    info!("Shut down");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM with the name of the signal
async fn shutdown_signal() -> &'static str {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "SIGINT received",
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGINT");
                std::future::pending().await
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                "SIGTERM received"
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<&'static str>();

    tokio::select! {
        reason = ctrl_c => reason,
        reason = terminate => reason,
    }
}
