//! Error types for registry loading and prediction

use crate::models::Feature;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while building the model registry at startup
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("checksum mismatch for {path:?}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("unknown feature `{0}` in feature descriptions")]
    UnknownFeature(String),

    #[error("{region}/{variant}: feature list is empty")]
    EmptyFeatures { region: String, variant: String },

    #[error("{region}/{variant}: feature `{feature}` is listed more than once")]
    DuplicateFeature {
        region: String,
        variant: String,
        feature: Feature,
    },

    #[error("{region}/{variant}: required feature `{feature}` is not in the feature list")]
    RequiredNotInFeatures {
        region: String,
        variant: String,
        feature: Feature,
    },

    #[error("{region}/{variant}: declared optional features do not match features minus required")]
    OptionalMismatch { region: String, variant: String },

    #[error("{region}/{variant}: {kind} expects {expected} features, variant declares {actual}")]
    DimensionMismatch {
        region: String,
        variant: String,
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{region}/{variant}: standard scaler needs a `path`")]
    MissingScalerPath { region: String, variant: String },

    #[error("{region}/{variant}: failed to load artifact: {source}")]
    Artifact {
        region: String,
        variant: String,
        #[source]
        source: InferenceError,
    },

    #[error("region `{0}` has no `base` variant")]
    MissingBaseVariant(String),

    #[error("region `{region}`: base variant must not require `{feature}`")]
    BaseRequiresOptional { region: String, feature: Feature },

    #[error("region `{region}` declares variant `{variant}` twice")]
    DuplicateVariant { region: String, variant: String },

    #[error("no regions configured")]
    NoRegions,
}

/// Failures inside a scaler or regression model
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("expected {expected} features, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("model produced a non-finite value: {0}")]
    NonFinite(f64),

    #[error("model produced no output")]
    EmptyOutput,

    #[error("invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("inference backend error: {0}")]
    Backend(String),
}

/// Failures of a single prediction request
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("unknown region: {0}")]
    RegionNotFound(String),

    #[error("no eligible model variant for region `{0}`")]
    NoEligibleVariant(String),

    #[error("{region}/{variant} needs `{feature}` but the request does not supply it")]
    MissingFeature {
        region: String,
        variant: String,
        feature: Feature,
    },

    #[error("inference failed for {region}/{variant}: {source}")]
    Inference {
        region: String,
        variant: String,
        #[source]
        source: InferenceError,
    },
}

impl PredictError {
    /// True when the caller sent something we cannot serve; everything else is our fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, PredictError::RegionNotFound(_))
    }

    /// Short label used for metrics and log events
    pub fn kind(&self) -> &'static str {
        match self {
            PredictError::RegionNotFound(_) => "region_not_found",
            PredictError::NoEligibleVariant(_) => "no_eligible_variant",
            PredictError::MissingFeature { .. } => "missing_feature",
            PredictError::Inference { .. } => "inference",
        }
    }
}
