//! Observability infrastructure for the rent evaluation service
//!
//! Provides:
//! - Prometheus metrics (prediction latency, predictions per variant, errors, loaded variants)
//! - Structured JSON logging with tracing

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter_vec, register_int_gauge,
    GaugeVec, Histogram, IntCounterVec, IntGauge,
};
use std::sync::OnceLock;
use tracing::{error, info, warn};

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<ServiceMetricsInner> = OnceLock::new();

struct ServiceMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_total: IntCounterVec,
    prediction_errors_total: IntCounterVec,
    price_evaluations_total: IntCounterVec,
    registry_variants: IntGauge,
    build_info: GaugeVec,
}

impl ServiceMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "rent_api_prediction_latency_seconds",
                "Time spent selecting a variant, running inference and evaluating",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_counter_vec!(
                "rent_api_predictions_total",
                "Predictions served, by region and model variant",
                &["region", "variant"]
            )
            .expect("Failed to register predictions_total"),

            prediction_errors_total: register_int_counter_vec!(
                "rent_api_prediction_errors_total",
                "Failed predictions, by error kind",
                &["kind"]
            )
            .expect("Failed to register prediction_errors_total"),

            price_evaluations_total: register_int_counter_vec!(
                "rent_api_price_evaluations_total",
                "Price evaluation codes returned",
                &["code"]
            )
            .expect("Failed to register price_evaluations_total"),

            registry_variants: register_int_gauge!(
                "rent_api_registry_variants",
                "Number of model variants loaded into the registry"
            )
            .expect("Failed to register registry_variants"),

            build_info: register_gauge_vec!(
                "rent_api_build_info",
                "Information about the running service",
                &["version"]
            )
            .expect("Failed to register build_info"),
        }
    }
}

/// Service metrics for Prometheus exposition
///
/// This is a lightweight handle to the global metrics instance.
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct ServiceMetrics {
    _private: (),
}

impl Default for ServiceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceMetrics {
    /// Create a new metrics handle (initializes global metrics if needed)
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(ServiceMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &ServiceMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner().prediction_latency_seconds.observe(duration_secs);
    }

    pub fn inc_predictions(&self, region: &str, variant: &str) {
        self.inner()
            .predictions_total
            .with_label_values(&[region, variant])
            .inc();
    }

    pub fn inc_prediction_errors(&self, kind: &str) {
        self.inner()
            .prediction_errors_total
            .with_label_values(&[kind])
            .inc();
    }

    pub fn inc_price_evaluation(&self, code: u8) {
        self.inner()
            .price_evaluations_total
            .with_label_values(&[&code.to_string()])
            .inc();
    }

    pub fn set_registry_variants(&self, count: usize) {
        self.inner().registry_variants.set(count as i64);
    }

    pub fn set_build_info(&self, version: &str) {
        self.inner().build_info.reset();
        self.inner()
            .build_info
            .with_label_values(&[version])
            .set(1.0);
    }
}

/// Structured logger for service events
#[derive(Clone)]
pub struct StructuredLogger {
    service: String,
}

impl StructuredLogger {
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    pub fn log_startup(&self, version: &str, port: u16) {
        info!(
            event = "service_started",
            service = %self.service,
            version = %version,
            port = port,
            "Rent evaluation service started"
        );
    }

    pub fn log_registry_loaded(&self, path: &str, regions: usize, variants: usize) {
        info!(
            event = "registry_loaded",
            service = %self.service,
            path = %path,
            regions = regions,
            variants = variants,
            "Model registry ready"
        );
    }

    pub fn log_prediction(
        &self,
        region: &str,
        variant: &str,
        predicted_rent: f64,
        rent: f64,
        price_evaluation: u8,
        latency_us: u128,
    ) {
        info!(
            event = "prediction_generated",
            service = %self.service,
            region = %region,
            variant = %variant,
            predicted_rent = predicted_rent,
            rent = rent,
            price_evaluation = price_evaluation,
            latency_us = latency_us,
            "Generated rent prediction"
        );
    }

    pub fn log_prediction_failure(
        &self,
        region: &str,
        kind: &str,
        details: &str,
        client_error: bool,
    ) {
        if client_error {
            warn!(
                event = "prediction_failed",
                service = %self.service,
                region = %region,
                kind = %kind,
                details = %details,
                "Prediction rejected"
            );
        } else {
            error!(
                event = "prediction_failed",
                service = %self.service,
                region = %region,
                kind = %kind,
                details = %details,
                "Prediction failed"
            );
        }
    }

    pub fn log_shutdown(&self, reason: &str) {
        info!(
            event = "service_shutdown",
            service = %self.service,
            reason = %reason,
            "Rent evaluation service shutting down"
        );
    }
}
