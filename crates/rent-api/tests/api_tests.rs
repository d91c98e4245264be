//! Integration tests for the rent API endpoints

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use rent_api::api::{create_router, AppState};
use rent_lib::{
    health::{components, HealthRegistry},
    predictor::{IdentityScaler, RentModel},
    Feature, InferenceError, ModelRegistry, ModelVariant, PredictionService, Region,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower::ServiceExt;

const MODEL_CONFIG: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../models/config.json");

async fn setup_test_app() -> (Router, Arc<AppState>) {
    let registry = ModelRegistry::load(MODEL_CONFIG).expect("shipped catalogue should load");
    let service = Arc::new(PredictionService::new(Arc::new(registry)));

    let health_registry = HealthRegistry::new();
    health_registry.register(components::REGISTRY).await;
    health_registry.register(components::PREDICTOR).await;

    let state = Arc::new(AppState::new(service, health_registry));
    let router = create_router(state.clone());

    (router, state)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

async fn post_predict(app: Router, body: String) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/predict")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
}

fn scenario() -> Value {
    json!({
        "region": "suginami",
        "area": 30.0,
        "age": 5,
        "layout": 3,
        "station_person": 100,
        "rent": 8.0
    })
}

fn assert_well_formed(body: &Value) {
    let predicted = body["predicted_rent"].as_f64().unwrap();
    let min = body["reasonable_range"]["min"].as_f64().unwrap();
    let max = body["reasonable_range"]["max"].as_f64().unwrap();
    assert!(min <= predicted && predicted <= max, "{} <= {} <= {}", min, predicted, max);

    let code = body["price_evaluation"].as_u64().unwrap();
    assert!((1..=5).contains(&code));
    assert_eq!(body["is_reasonable"].as_bool().unwrap(), code == 3);
    assert!(body["evaluation_message"].as_str().is_some());
}

#[tokio::test]
async fn test_predict_base_scenario() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = post_predict(app, scenario().to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_info"]["model_type"], "base");
    assert_eq!(body["model_info"]["region"], "suginami");
    assert_eq!(
        body["model_info"]["features"],
        json!(["area", "age", "layout", "station_person"])
    );
    assert_eq!(body["input_conditions"]["area"], 30.0);
    assert_well_formed(&body);
}

#[tokio::test]
async fn test_predict_with_management_fee_uses_kanrihi() {
    let (app, _state) = setup_test_app().await;
    let mut request = scenario();
    request["management_fee"] = json!(1.5);

    let (status, body) = post_predict(app, request.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_info"]["model_type"], "kanrihi");
    let features = body["model_info"]["features"].as_array().unwrap();
    assert!(features.contains(&json!("management_fee")));
    assert_eq!(body["input_conditions"]["management_fee"], 1.5);
    assert_well_formed(&body);
}

#[tokio::test]
async fn test_predict_with_total_units_uses_soukosuu() {
    let (app, _state) = setup_test_app().await;
    let mut request = scenario();
    request["total_units"] = json!(40);

    let (status, body) = post_predict(app, request.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_info"]["model_type"], "soukosuu");
}

#[tokio::test]
async fn test_predict_with_both_optionals_uses_full() {
    let (app, _state) = setup_test_app().await;
    let mut request = scenario();
    request["management_fee"] = json!(1.2);
    request["total_units"] = json!(40);

    let (status, body) = post_predict(app, request.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_info"]["model_type"], "full");
    assert_well_formed(&body);
}

#[tokio::test]
async fn test_region_without_full_variant_falls_back_to_kanrihi() {
    let (app, _state) = setup_test_app().await;
    let mut request = scenario();
    request["region"] = json!("setagaya");
    request["management_fee"] = json!(1.2);
    request["total_units"] = json!(40);

    let (status, body) = post_predict(app, request.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_info"]["model_type"], "kanrihi");
    assert_eq!(body["model_info"]["region"], "setagaya");
}

#[tokio::test]
async fn test_onnx_backed_variant_predicts() {
    let (app, _state) = setup_test_app().await;
    let mut request = scenario();
    request["region"] = json!("setagaya");

    let (status, body) = post_predict(app, request.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_info"]["model_type"], "base");
    // scaled inputs (-0.133, -1.25, -0.179, 0.889) through the linear graph
    let predicted = body["predicted_rent"].as_f64().unwrap();
    assert!((predicted - 10.790).abs() < 1e-3, "got {}", predicted);
    assert_well_formed(&body);
}

#[tokio::test]
async fn test_predict_is_deterministic() {
    let (app, _state) = setup_test_app().await;

    let (_, first) = post_predict(app.clone(), scenario().to_string()).await;
    let (_, second) = post_predict(app, scenario().to_string()).await;

    assert_eq!(first["predicted_rent"], second["predicted_rent"]);
    assert_eq!(first["price_evaluation"], second["price_evaluation"]);
}

#[tokio::test]
async fn test_predict_accepts_distance_alias() {
    let (app, _state) = setup_test_app().await;
    let request = json!({
        "region": "suginami",
        "area": 25.0,
        "age": 12,
        "layout": 2,
        "distance": 8,
        "rent": 7.5
    });

    let (status, body) = post_predict(app, request.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["input_conditions"]["station_person"], 8.0);
}

#[tokio::test]
async fn test_unknown_region_is_client_error() {
    let (app, state) = setup_test_app().await;
    let mut request = scenario();
    request["region"] = json!("invalid_region");

    let (status, body) = post_predict(app, request.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["fields"]["region"][0].as_str().unwrap();
    assert!(message.contains("invalid_region"));
    assert_eq!(state.service.inference_stats().total_inferences, 0);
}

#[tokio::test]
async fn test_layout_out_of_range_rejected_before_core() {
    let (app, state) = setup_test_app().await;
    let mut request = scenario();
    request["layout"] = json!(13);

    let (status, body) = post_predict(app, request.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["layout"].is_array());
    assert_eq!(body["status"], 400);
    assert_eq!(state.service.inference_stats().total_inferences, 0);
}

#[tokio::test]
async fn test_multiple_invalid_fields_reported() {
    let (app, _state) = setup_test_app().await;
    let mut request = scenario();
    request["area"] = json!(0);
    request["age"] = json!(-3);
    request["rent"] = json!(-8.0);

    let (status, body) = post_predict(app, request.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    for field in ["area", "age", "rent"] {
        assert!(body["fields"][field].is_array(), "missing {}", field);
    }
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (app, _state) = setup_test_app().await;

    let body = r#"{"region": "suginami", "area": "big"}"#.to_string();
    let (status, body) = post_predict(app, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn test_list_models() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = get(app, "/api/v1/models").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 6);
    let regions = body["regions"].as_array().unwrap();
    assert_eq!(regions.len(), 2);
    assert!(regions.iter().any(|r| r["region"] == "suginami"));
}

#[tokio::test]
async fn test_region_models() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = get(app.clone(), "/api/v1/models/setagaya").await;
    assert_eq!(status, StatusCode::OK);
    let models = body["models"].as_array().unwrap();
    assert_eq!(models.len(), 2);
    let kanrihi = models.iter().find(|m| m["model_type"] == "kanrihi").unwrap();
    assert!(kanrihi["required_features"]
        .as_array()
        .unwrap()
        .contains(&json!("management_fee")));

    let (status, body) = get(app, "/api/v1/models/atlantis").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("atlantis"));
}

#[tokio::test]
async fn test_feature_descriptions() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = get(app, "/api/v1/features").await;

    assert_eq!(status, StatusCode::OK);
    let features = body["features"].as_array().unwrap();
    assert_eq!(features.len(), 6);
    let area = features.iter().find(|f| f["feature"] == "area").unwrap();
    assert_eq!(area["unit"], "m2");
}

#[tokio::test]
async fn test_health_returns_ok_when_healthy() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["components"]["registry"].is_object());
    assert!(body["components"]["predictor"].is_object());
}

#[tokio::test]
async fn test_health_returns_503_when_unhealthy() {
    let (app, state) = setup_test_app().await;
    state
        .health_registry
        .set_unhealthy(components::REGISTRY, "Catalogue unreadable")
        .await;

    let (status, body) = get(app, "/health").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
}

#[tokio::test]
async fn test_readyz_follows_readiness_flag() {
    let (app, state) = setup_test_app().await;

    let (status, body) = get(app.clone(), "/readyz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["ready"], false);

    state.health_registry.set_ready(true).await;
    let (status, body) = get(app, "/readyz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ready"], true);
}

#[tokio::test]
async fn test_metrics_endpoint_reports_predictions() {
    let (app, _state) = setup_test_app().await;
    let (status, _) = post_predict(app.clone(), scenario().to_string()).await;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers().get("content-type").unwrap();
    assert!(content_type.to_str().unwrap().contains("text/plain"));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let metrics_text = String::from_utf8(body.to_vec()).unwrap();

    assert!(metrics_text.contains("rent_api_predictions_total"));
    assert!(metrics_text.contains("rent_api_prediction_latency_seconds_bucket"));
    assert!(metrics_text.contains("rent_api_registry_variants"));
}

/// Produces a non-finite value on its first call only
struct FlakyModel {
    failed_once: AtomicBool,
}

impl RentModel for FlakyModel {
    fn predict(&self, _features: &[f64]) -> Result<f64, InferenceError> {
        if self.failed_once.swap(true, Ordering::SeqCst) {
            Ok(9.0)
        } else {
            Ok(f64::NAN)
        }
    }

    fn input_dimension(&self) -> Option<usize> {
        None
    }

    fn backend(&self) -> &'static str {
        "flaky"
    }
}

#[tokio::test]
async fn test_predictor_recovers_after_transient_failure() {
    let features = vec![
        Feature::Area,
        Feature::Age,
        Feature::Layout,
        Feature::StationPerson,
    ];
    let base = ModelVariant::new(
        "suginami",
        "base",
        features.clone(),
        features,
        Arc::new(FlakyModel {
            failed_once: AtomicBool::new(false),
        }),
        Arc::new(IdentityScaler),
    )
    .unwrap();
    let region = Region::new("suginami", "Suginami", "", vec![base]).unwrap();
    let registry = ModelRegistry::from_regions(vec![region]).unwrap();
    let service = Arc::new(PredictionService::new(Arc::new(registry)));

    let health_registry = HealthRegistry::new();
    health_registry.register(components::REGISTRY).await;
    health_registry.register(components::PREDICTOR).await;
    let app = create_router(Arc::new(AppState::new(service, health_registry)));

    let (status, _) = post_predict(app.clone(), scenario().to_string()).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let (_, body) = get(app.clone(), "/health").await;
    assert_eq!(body["status"], "degraded");

    let (status, body) = post_predict(app.clone(), scenario().to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["predicted_rent"], 9.0);

    let (status, body) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["components"]["predictor"]["status"], "healthy");
}
