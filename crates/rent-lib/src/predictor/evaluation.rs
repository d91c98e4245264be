//! Rent evaluation against the predicted market rent
//!
//! Two symmetric bands are drawn around the prediction `p`:
//!
//! ```text
//!   far_min      min         p         max      far_max
//!  ----|----------|----------|----------|----------|----
//!   1  |    2     |          3          |    4     |  5
//! ```
//!
//! `min`/`max` are `p ∓ |p|·band_ratio` (the reasonable range) and
//! `far_min`/`far_max` are `p ∓ |p|·near_band_ratio`. Edges belong to the
//! inner side, so a rent exactly on `min` or `max` is code 3.

use crate::models::{PriceEvaluation, ReasonableRange};

/// Half-width of the reasonable range relative to the prediction (±10%)
pub const DEFAULT_BAND_RATIO: f64 = 0.10;

/// Half-width of the "near" band relative to the prediction (±20%)
pub const DEFAULT_NEAR_BAND_RATIO: f64 = 0.20;

/// Band widths used for every evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationConfig {
    pub band_ratio: f64,
    pub near_band_ratio: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            band_ratio: DEFAULT_BAND_RATIO,
            near_band_ratio: DEFAULT_NEAR_BAND_RATIO,
        }
    }
}

impl EvaluationConfig {
    /// Non-negative widths with the near band never narrower than the reasonable range
    pub fn normalized(self) -> Self {
        let band_ratio = if self.band_ratio.is_finite() {
            self.band_ratio.max(0.0)
        } else {
            DEFAULT_BAND_RATIO
        };
        let near_band_ratio = if self.near_band_ratio.is_finite() {
            self.near_band_ratio.max(band_ratio)
        } else {
            DEFAULT_NEAR_BAND_RATIO.max(band_ratio)
        };
        Self {
            band_ratio,
            near_band_ratio,
        }
    }
}

/// Outcome of comparing a stated rent with a prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub reasonable_range: ReasonableRange,
    pub price_evaluation: PriceEvaluation,
}

/// Maps (predicted rent, stated rent) onto the five-level scale
#[derive(Debug, Clone)]
pub struct Evaluator {
    config: EvaluationConfig,
}

impl Evaluator {
    pub fn new() -> Self {
        Self {
            config: EvaluationConfig::default(),
        }
    }

    pub fn with_config(config: EvaluationConfig) -> Self {
        Self {
            config: config.normalized(),
        }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    fn band(predicted: f64, ratio: f64) -> ReasonableRange {
        let half_width = predicted.abs() * ratio;
        ReasonableRange {
            min: predicted - half_width,
            max: predicted + half_width,
        }
    }

    /// Reasonable range around `predicted`; always `min <= predicted <= max`
    pub fn reasonable_range(&self, predicted: f64) -> ReasonableRange {
        Self::band(predicted, self.config.band_ratio)
    }

    pub fn evaluate(&self, predicted: f64, rent: f64) -> Evaluation {
        let range = self.reasonable_range(predicted);
        let near = Self::band(predicted, self.config.near_band_ratio);

        let price_evaluation = if range.contains(rent) {
            PriceEvaluation::AtMarket
        } else if rent < near.min {
            PriceEvaluation::FarBelow
        } else if rent < range.min {
            PriceEvaluation::Below
        } else if rent <= near.max {
            PriceEvaluation::Above
        } else {
            PriceEvaluation::FarAbove
        };

        Evaluation {
            reasonable_range: range,
            price_evaluation,
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}
