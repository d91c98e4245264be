//! Prediction service: selector → mapper → inference → evaluation

use crate::error::PredictError;
use crate::models::{
    FeatureDescription, ModelCatalog, PredictionRequest, PredictionResponse, RegionModels,
};
use crate::observability::{ServiceMetrics, StructuredLogger};
use crate::predictor::{
    EvaluationConfig, Evaluator, FeatureMapper, InferenceEngine, InferenceStats, ModelSelector,
};
use crate::registry::ModelRegistry;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

/// A feature description keyed by its canonical feature name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureInfo {
    pub feature: String,
    #[serde(flatten)]
    pub description: FeatureDescription,
}

/// Serves predictions from an immutable registry
pub struct PredictionService {
    registry: Arc<ModelRegistry>,
    engine: InferenceEngine,
    evaluator: Evaluator,
    metrics: ServiceMetrics,
    logger: StructuredLogger,
}

impl PredictionService {
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self::with_evaluation(registry, EvaluationConfig::default())
    }

    pub fn with_evaluation(registry: Arc<ModelRegistry>, config: EvaluationConfig) -> Self {
        let metrics = ServiceMetrics::new();
        metrics.set_registry_variants(registry.variant_count());
        Self {
            registry,
            engine: InferenceEngine::new(),
            evaluator: Evaluator::with_config(config),
            metrics,
            logger: StructuredLogger::new(env!("CARGO_PKG_NAME")),
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn inference_stats(&self) -> InferenceStats {
        self.engine.stats()
    }

    /// Predict the market rent for `request` and evaluate the stated rent
    ///
    /// Either a complete response or an error; nothing partial.
    pub fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse, PredictError> {
        let start = Instant::now();
        match self.run(request) {
            Ok(response) => {
                let elapsed = start.elapsed();
                let code = response.price_evaluation.code();
                self.metrics.observe_prediction_latency(elapsed.as_secs_f64());
                self.metrics
                    .inc_predictions(&response.model_info.region, &response.model_info.model_type);
                self.metrics.inc_price_evaluation(code);
                self.logger.log_prediction(
                    &request.region,
                    &response.model_info.model_type,
                    response.predicted_rent,
                    request.rent,
                    code,
                    elapsed.as_micros(),
                );
                Ok(response)
            }
            Err(err) => {
                self.metrics.inc_prediction_errors(err.kind());
                self.logger.log_prediction_failure(
                    &request.region,
                    err.kind(),
                    &err.to_string(),
                    err.is_client_error(),
                );
                Err(err)
            }
        }
    }

    fn run(&self, request: &PredictionRequest) -> Result<PredictionResponse, PredictError> {
        let variants = self.registry.get_variants(&request.region)?;
        let variant = ModelSelector::select(&request.region, variants, request)?;
        let features = FeatureMapper::extract(request, variant)?;

        let predicted_rent =
            self.engine
                .predict(variant, &features)
                .map_err(|source| PredictError::Inference {
                    region: variant.region().to_string(),
                    variant: variant.name().to_string(),
                    source,
                })?;

        let evaluation = self.evaluator.evaluate(predicted_rent, request.rent);
        let price_evaluation = evaluation.price_evaluation;

        Ok(PredictionResponse {
            input_conditions: request.clone(),
            model_info: variant.info(),
            predicted_rent,
            reasonable_range: evaluation.reasonable_range,
            price_evaluation,
            evaluation_message: price_evaluation.message().to_string(),
            is_reasonable: price_evaluation.is_reasonable(),
        })
    }

    /// Every region with its variants and feature requirements
    pub fn models(&self) -> ModelCatalog {
        let regions: Vec<RegionModels> = self.registry.regions().map(|r| r.models()).collect();
        let total = regions.iter().map(|r| r.models.len()).sum();
        ModelCatalog { regions, total }
    }

    pub fn region_models(&self, region: &str) -> Result<RegionModels, PredictError> {
        self.registry
            .region(region)
            .map(|r| r.models())
            .ok_or_else(|| PredictError::RegionNotFound(region.to_string()))
    }

    pub fn feature_descriptions(&self) -> Vec<FeatureInfo> {
        self.registry
            .feature_descriptions()
            .iter()
            .map(|(feature, description)| FeatureInfo {
                feature: feature.to_string(),
                description: description.clone(),
            })
            .collect()
    }
}
