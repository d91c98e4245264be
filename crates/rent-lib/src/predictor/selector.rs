//! Chooses the most feature-complete variant a request can feed
//!
//! A variant is eligible when the request supplies every feature it requires.
//! Among eligible variants the winner is the one with the most features the
//! request actually supplies, then the one needing the fewest defaults, then
//! the fixed name priority `full` > `kanrihi` > `soukosuu` > `base`.

use crate::error::PredictError;
use crate::models::PredictionRequest;
use crate::registry::ModelVariant;
use std::cmp::{Ordering, Reverse};
use tracing::debug;

/// Tie-break priority for well-known variant names; higher wins
pub fn variant_priority(name: &str) -> u8 {
    match name {
        "full" => 4,
        "kanrihi" => 3,
        "soukosuu" => 2,
        "base" => 1,
        _ => 0,
    }
}

pub struct ModelSelector;

impl ModelSelector {
    pub fn is_eligible(variant: &ModelVariant, request: &PredictionRequest) -> bool {
        variant
            .required_features()
            .iter()
            .all(|f| request.supplies(*f))
    }

    /// Number of the variant's features the request supplies
    pub fn supplied_count(variant: &ModelVariant, request: &PredictionRequest) -> usize {
        variant
            .features()
            .iter()
            .filter(|f| request.supplies(**f))
            .count()
    }

    fn compare(a: &ModelVariant, b: &ModelVariant, request: &PredictionRequest) -> Ordering {
        let key = |v: &ModelVariant| {
            let supplied = Self::supplied_count(v, request);
            let defaulted = v.features().len() - supplied;
            (supplied, Reverse(defaulted), v.priority())
        };
        key(a)
            .cmp(&key(b))
            // unknown names: lexically first wins
            .then_with(|| b.name().cmp(a.name()))
    }

    /// Pick the best variant of `region` for `request`
    pub fn select<'a>(
        region: &str,
        variants: &'a [ModelVariant],
        request: &PredictionRequest,
    ) -> Result<&'a ModelVariant, PredictError> {
        let selected = variants
            .iter()
            .filter(|v| Self::is_eligible(v, request))
            .max_by(|a, b| Self::compare(a, b, request))
            .ok_or_else(|| PredictError::NoEligibleVariant(region.to_string()))?;

        debug!(
            region = %region,
            variant = %selected.name(),
            features = selected.features().len(),
            "Selected model variant"
        );
        Ok(selected)
    }
}
