//! Scaler and regression backends, and the inference engine that chains them
//!
//! Trained models are exported either as ONNX graphs (run with tract) or as
//! plain linear coefficients in JSON. Scalers are standardisation parameters
//! stored as JSON.

use super::{RentModel, Scaler};
use crate::error::InferenceError;
use crate::models::FeatureVector;
use crate::registry::ModelVariant;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tract_onnx::prelude::*;
use tracing::{debug, warn};

/// Maximum inference latency before warning (5ms target)
pub const MAX_INFERENCE_MS: u128 = 5;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

/// SHA256 digest of an artifact, hex encoded
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn invalid_artifact<E: std::fmt::Display>(stage: &'static str) -> impl Fn(E) -> InferenceError {
    move |e| InferenceError::InvalidArtifact(format!("{}: {}", stage, e))
}

/// ONNX regression model run through tract
pub struct OnnxModel {
    plan: TractModel,
    num_features: usize,
}

impl OnnxModel {
    /// Parse and optimize an ONNX model taking `f32[1, num_features]`
    pub fn from_bytes(model_bytes: &[u8], num_features: usize) -> Result<Self, InferenceError> {
        let plan = tract_onnx::onnx()
            .model_for_read(&mut std::io::Cursor::new(model_bytes))
            .map_err(invalid_artifact("failed to parse ONNX model"))?
            .with_input_fact(0, f32::fact([1, num_features]).into())
            .map_err(invalid_artifact("failed to set input shape"))?
            .into_optimized()
            .map_err(invalid_artifact("failed to optimize model"))?
            .into_runnable()
            .map_err(invalid_artifact("failed to create runnable model"))?;
        Ok(Self { plan, num_features })
    }

    fn features_to_tensor(&self, features: &[f64]) -> Result<Tensor, InferenceError> {
        let data: Vec<f32> = features.iter().map(|v| *v as f32).collect();
        let array = tract_ndarray::Array2::from_shape_vec((1, self.num_features), data)
            .map_err(|e| InferenceError::Backend(e.to_string()))?;
        Ok(array.into())
    }
}

impl RentModel for OnnxModel {
    fn predict(&self, features: &[f64]) -> Result<f64, InferenceError> {
        if features.len() != self.num_features {
            return Err(InferenceError::DimensionMismatch {
                expected: self.num_features,
                actual: features.len(),
            });
        }
        let input = self.features_to_tensor(features)?;
        let result = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::Backend(e.to_string()))?;
        let output = result.first().ok_or(InferenceError::EmptyOutput)?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::Backend(e.to_string()))?;
        let mut values = view.iter().copied();
        let value = values.next().ok_or(InferenceError::EmptyOutput)?;
        if values.next().is_some() {
            return Err(InferenceError::Backend(format!(
                "expected a single output value, got {}",
                view.len()
            )));
        }
        Ok(f64::from(value))
    }

    fn input_dimension(&self) -> Option<usize> {
        Some(self.num_features)
    }

    fn backend(&self) -> &'static str {
        "onnx"
    }
}

/// Linear regressor exported as coefficients plus intercept
#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    #[serde(alias = "coef_")]
    coefficients: Vec<f64>,
    #[serde(alias = "intercept_")]
    intercept: f64,
}

impl LinearModel {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Result<Self, InferenceError> {
        let model = Self {
            coefficients,
            intercept,
        };
        model.validate()?;
        Ok(model)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, InferenceError> {
        let model: Self = serde_json::from_slice(bytes)
            .map_err(|e| InferenceError::InvalidArtifact(format!("invalid linear model: {}", e)))?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), InferenceError> {
        if self.coefficients.is_empty() {
            return Err(InferenceError::InvalidArtifact(
                "linear model has no coefficients".to_string(),
            ));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(InferenceError::InvalidArtifact(
                "linear model has non-finite parameters".to_string(),
            ));
        }
        Ok(())
    }
}

impl RentModel for LinearModel {
    fn predict(&self, features: &[f64]) -> Result<f64, InferenceError> {
        if features.len() != self.coefficients.len() {
            return Err(InferenceError::DimensionMismatch {
                expected: self.coefficients.len(),
                actual: features.len(),
            });
        }
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(features)
            .map(|(c, x)| c * x)
            .sum();
        Ok(dot + self.intercept)
    }

    fn input_dimension(&self) -> Option<usize> {
        Some(self.coefficients.len())
    }

    fn backend(&self) -> &'static str {
        "linear"
    }
}

/// Standardisation: `(x - mean) / scale` per feature
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    #[serde(alias = "mean_")]
    mean: Vec<f64>,
    #[serde(alias = "scale_")]
    scale: Vec<f64>,
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, InferenceError> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self, InferenceError> {
        let scaler: Self = serde_json::from_slice(bytes)
            .map_err(|e| InferenceError::InvalidArtifact(format!("invalid scaler: {}", e)))?;
        scaler.validate()?;
        Ok(scaler)
    }

    fn validate(&self) -> Result<(), InferenceError> {
        if self.mean.len() != self.scale.len() {
            return Err(InferenceError::InvalidArtifact(format!(
                "scaler has {} means but {} scales",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self.mean.is_empty() {
            return Err(InferenceError::InvalidArtifact("scaler is empty".to_string()));
        }
        if self.mean.iter().chain(&self.scale).any(|v| !v.is_finite()) {
            return Err(InferenceError::InvalidArtifact(
                "scaler has non-finite parameters".to_string(),
            ));
        }
        Ok(())
    }
}

impl Scaler for StandardScaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if features.len() != self.mean.len() {
            return Err(InferenceError::DimensionMismatch {
                expected: self.mean.len(),
                actual: features.len(),
            });
        }
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                // constant training columns are stored with zero scale
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }

    fn dimension(&self) -> Option<usize> {
        Some(self.mean.len())
    }
}

/// Pass-through scaler for models trained on raw features
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityScaler;

impl Scaler for IdentityScaler {
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        Ok(features.to_vec())
    }

    fn dimension(&self) -> Option<usize> {
        None
    }
}

/// Inference statistics
#[derive(Debug, Clone)]
pub struct InferenceStats {
    pub total_inferences: u64,
    pub slow_inferences: u64,
}

/// Runs a variant's scaler and model over a feature vector
#[derive(Debug, Default)]
pub struct InferenceEngine {
    inference_count: AtomicU64,
    slow_inference_count: AtomicU64,
}

impl InferenceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Predict a rent for `features`, which must follow the variant's feature order
    pub fn predict(
        &self,
        variant: &ModelVariant,
        features: &FeatureVector,
    ) -> Result<f64, InferenceError> {
        let start = Instant::now();

        if features.len() != variant.features().len() {
            return Err(InferenceError::DimensionMismatch {
                expected: variant.features().len(),
                actual: features.len(),
            });
        }

        let scaled = variant.scaler().transform(features.as_slice())?;
        let value = variant.model().predict(&scaled)?;
        if !value.is_finite() {
            return Err(InferenceError::NonFinite(value));
        }

        let elapsed = start.elapsed();
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        if elapsed.as_millis() > MAX_INFERENCE_MS {
            self.slow_inference_count.fetch_add(1, Ordering::Relaxed);
            warn!(
                region = %variant.region(),
                variant = %variant.name(),
                elapsed_ms = elapsed.as_millis(),
                "Inference exceeded {}ms target",
                MAX_INFERENCE_MS
            );
        } else {
            debug!(
                region = %variant.region(),
                variant = %variant.name(),
                backend = variant.model().backend(),
                elapsed_us = elapsed.as_micros(),
                "Inference completed"
            );
        }

        Ok(value)
    }

    pub fn stats(&self) -> InferenceStats {
        InferenceStats {
            total_inferences: self.inference_count.load(Ordering::Relaxed),
            slow_inferences: self.slow_inference_count.load(Ordering::Relaxed),
        }
    }
}
