//! Core library for rent prediction and evaluation
//!
//! This crate provides:
//! - The model registry loaded once at startup
//! - Variant selection, feature mapping and inference
//! - Evaluation of a stated rent against the prediction
//! - Health checks and observability

pub mod error;
pub mod health;
pub mod models;
pub mod observability;
pub mod predictor;
pub mod registry;
pub mod service;

pub use error::{InferenceError, PredictError, RegistryError};
pub use health::{
    ComponentHealth, ComponentStatus, HealthRegistry, HealthResponse, ReadinessResponse,
};
pub use models::*;
pub use observability::{ServiceMetrics, StructuredLogger};
pub use registry::{ModelRegistry, ModelVariant, Region};
pub use service::{FeatureInfo, PredictionService};
