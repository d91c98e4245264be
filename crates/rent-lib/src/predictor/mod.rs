//! Model selection, feature mapping, inference and evaluation

mod evaluation;
mod features;
mod inference;
mod selector;

pub use evaluation::{
    Evaluation, EvaluationConfig, Evaluator, DEFAULT_BAND_RATIO, DEFAULT_NEAR_BAND_RATIO,
};
pub use features::FeatureMapper;
pub use inference::{
    compute_checksum, IdentityScaler, InferenceEngine, InferenceStats, LinearModel, OnnxModel,
    StandardScaler, MAX_INFERENCE_MS,
};
pub use selector::{variant_priority, ModelSelector};

use crate::error::InferenceError;

/// Feature scaler fitted at training time
pub trait Scaler: Send + Sync {
    /// Scale a raw feature vector into model space
    fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError>;

    /// Number of features the scaler was fitted on, if fixed
    fn dimension(&self) -> Option<usize>;
}

/// Trained regression model producing a single rent value
pub trait RentModel: Send + Sync {
    fn predict(&self, features: &[f64]) -> Result<f64, InferenceError>;

    /// Number of inputs the model expects, if known
    fn input_dimension(&self) -> Option<usize>;

    /// Name of the numeric backend, for logs
    fn backend(&self) -> &'static str;
}
