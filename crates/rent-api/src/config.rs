//! Service configuration

use anyhow::Result;
use rent_lib::predictor::{EvaluationConfig, DEFAULT_BAND_RATIO, DEFAULT_NEAR_BAND_RATIO};
use serde::Deserialize;
use std::path::PathBuf;

/// Service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    /// HTTP listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Model catalogue (JSON) describing every region and variant
    #[serde(default = "default_model_config_path")]
    pub model_config_path: PathBuf,

    /// Half-width of the reasonable range, relative to the prediction
    #[serde(default = "default_band_ratio")]
    pub band_ratio: f64,

    /// Half-width of the "near" band, relative to the prediction
    #[serde(default = "default_near_band_ratio")]
    pub near_band_ratio: f64,
}

fn default_port() -> u16 {
    8080
}

fn default_model_config_path() -> PathBuf {
    PathBuf::from("models/config.json")
}

fn default_band_ratio() -> f64 {
    DEFAULT_BAND_RATIO
}

fn default_near_band_ratio() -> f64 {
    DEFAULT_NEAR_BAND_RATIO
}

impl ServiceConfig {
    /// Load configuration from an optional `rent-api.{toml,json,yaml}` file
    /// and `RENT_API_*` environment variables (environment wins)
    pub fn load() -> Result<Self> {
        let source = config::Config::builder()
            .add_source(config::File::with_name("rent-api").required(false))
            .add_source(config::Environment::with_prefix("RENT_API"))
            .build()?;
        Self::from_source(source)
    }

    pub fn from_source(source: config::Config) -> Result<Self> {
        Ok(source.try_deserialize()?)
    }

    pub fn evaluation(&self) -> EvaluationConfig {
        EvaluationConfig {
            band_ratio: self.band_ratio,
            near_band_ratio: self.near_band_ratio,
        }
        .normalized()
    }
}
