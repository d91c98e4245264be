//! Feature mapping from a validated request to a variant's input vector
//!
//! The vector follows the variant's declared feature order. Optional features
//! a variant consumes but does not require are filled with their defaults.

use crate::error::PredictError;
use crate::models::{Feature, FeatureVector, PredictionRequest};
use crate::registry::ModelVariant;
use tracing::trace;

pub struct FeatureMapper;

impl FeatureMapper {
    /// Build the input vector for `variant`
    ///
    /// A required feature missing from the request means the selector and
    /// mapper disagree; it is reported as an internal error.
    pub fn extract(
        request: &PredictionRequest,
        variant: &ModelVariant,
    ) -> Result<FeatureVector, PredictError> {
        let values = variant
            .features()
            .iter()
            .map(|feature| {
                let value = Self::value_for(request, *feature, variant.requires(*feature))
                    .ok_or_else(|| PredictError::MissingFeature {
                        region: variant.region().to_string(),
                        variant: variant.name().to_string(),
                        feature: *feature,
                    })?;
                trace!(feature = %feature, value = value, "Extracted feature");
                Ok(value)
            })
            .collect::<Result<Vec<_>, PredictError>>()?;

        Ok(FeatureVector { values })
    }

    fn value_for(request: &PredictionRequest, feature: Feature, required: bool) -> Option<f64> {
        match request.value_of(feature) {
            Some(value) => Some(value),
            None if !required => feature.default_value(),
            None => None,
        }
    }
}
