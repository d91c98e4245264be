//! HTTP API: prediction, model listing, health and Prometheus metrics

use crate::error::{AppError, AppResult};
use crate::payload::PredictPayload;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use prometheus::{Encoder, TextEncoder};
use rent_lib::{
    health::{components, ComponentStatus, HealthRegistry},
    FeatureInfo, ModelCatalog, PredictionResponse, PredictionService, RegionModels,
};
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    pub health_registry: HealthRegistry,
}

impl AppState {
    pub fn new(service: Arc<PredictionService>, health_registry: HealthRegistry) -> Self {
        Self {
            service,
            health_registry,
        }
    }
}

/// Liveness - 200 unless a component is unhealthy
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.health().await;

    let status_code = match health.status {
        ComponentStatus::Healthy | ComponentStatus::Degraded => StatusCode::OK,
        ComponentStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(health))
}

/// Readiness - 200 once the model registry is loaded
async fn readyz(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let readiness = state.health_registry.readiness().await;

    let status_code = if readiness.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(readiness))
}

async fn metrics() -> AppResult<impl IntoResponse> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| AppError::InternalError(format!("Failed to encode metrics: {}", e)))?;

    Ok((
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    ))
}

async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictPayload>, JsonRejection>,
) -> AppResult<Json<PredictionResponse>> {
    let Json(payload) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let request = payload.into_request(state.service.registry())?;

    match state.service.predict(&request) {
        Ok(response) => {
            state.health_registry.recover(components::PREDICTOR).await;
            Ok(Json(response))
        }
        Err(err) => {
            if !err.is_client_error() {
                state
                    .health_registry
                    .set_degraded(components::PREDICTOR, err.to_string())
                    .await;
            }
            Err(err.into())
        }
    }
}

async fn list_models(State(state): State<Arc<AppState>>) -> Json<ModelCatalog> {
    Json(state.service.models())
}

async fn region_models(
    State(state): State<Arc<AppState>>,
    Path(region): Path<String>,
) -> AppResult<Json<RegionModels>> {
    Ok(Json(state.service.region_models(&region)?))
}

#[derive(Serialize)]
struct FeatureList {
    features: Vec<FeatureInfo>,
}

async fn features(State(state): State<Arc<AppState>>) -> Json<FeatureList> {
    Json(FeatureList {
        features: state.service.feature_descriptions(),
    })
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/api/v1/predict", post(predict))
        .route("/api/v1/models", get(list_models))
        .route("/api/v1/models/:region", get(region_models))
        .route("/api/v1/features", get(features))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Start the API server and run until `shutdown` resolves
pub async fn serve(
    port: u16,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
