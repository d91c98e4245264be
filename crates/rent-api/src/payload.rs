//! Request payload validation
//!
//! Integers arrive as `i64` so that out-of-range values (negative ages,
//! `layout = 13`) produce field-level errors instead of decode failures.

use crate::error::{AppError, AppResult};
use rent_lib::{ModelRegistry, PredictionRequest};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PredictPayload {
    #[validate(range(exclusive_min = 0.0, message = "area must be greater than 0"))]
    pub area: f64,

    #[validate(range(min = 0, max = 200, message = "age must be between 0 and 200"))]
    pub age: i64,

    #[validate(range(min = 1, max = 12, message = "layout must be between 1 and 12"))]
    pub layout: i64,

    #[serde(alias = "distance")]
    #[validate(range(min = 0.0, message = "station_person must not be negative"))]
    pub station_person: f64,

    #[validate(range(exclusive_min = 0.0, message = "rent must be greater than 0"))]
    pub rent: f64,

    #[validate(length(min = 1, message = "region must not be empty"))]
    pub region: String,

    #[serde(default)]
    #[validate(range(min = 0.0, message = "management_fee must not be negative"))]
    pub management_fee: Option<f64>,

    #[serde(default)]
    #[validate(range(
        min = 1,
        max = 100000,
        message = "total_units must be between 1 and 100000"
    ))]
    pub total_units: Option<i64>,
}

impl PredictPayload {
    /// Validate every field and the region, then hand back the core request
    pub fn into_request(self, registry: &ModelRegistry) -> AppResult<PredictionRequest> {
        self.validate()?;

        if !registry.contains_region(&self.region) {
            return Err(AppError::field(
                "region",
                format!(
                    "unknown region `{}`; available: {}",
                    self.region,
                    registry.region_ids().join(", ")
                ),
            ));
        }

        // ranges were checked above, so the narrowing casts are lossless
        Ok(PredictionRequest {
            area: self.area,
            age: self.age as u32,
            layout: self.layout as u8,
            station_person: self.station_person,
            rent: self.rent,
            region: self.region,
            management_fee: self.management_fee,
            total_units: self.total_units.map(|n| n as u32),
        })
    }
}
