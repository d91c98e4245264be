//! Core data models for rent prediction

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A model input feature, named as in the model catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Area,
    Age,
    Layout,
    StationPerson,
    ManagementFee,
    TotalUnits,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::Area,
        Feature::Age,
        Feature::Layout,
        Feature::StationPerson,
        Feature::ManagementFee,
        Feature::TotalUnits,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::Area => "area",
            Feature::Age => "age",
            Feature::Layout => "layout",
            Feature::StationPerson => "station_person",
            Feature::ManagementFee => "management_fee",
            Feature::TotalUnits => "total_units",
        }
    }

    /// Optional features may be absent from a validated request
    pub fn is_optional(&self) -> bool {
        matches!(self, Feature::ManagementFee | Feature::TotalUnits)
    }

    /// Value used when a variant consumes an optional feature the request left out
    pub fn default_value(&self) -> Option<f64> {
        match self {
            Feature::ManagementFee => Some(0.0),
            Feature::TotalUnits => Some(0.0),
            _ => None,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("unknown feature `{}`", s))
    }
}

/// Validated property attributes submitted for evaluation
///
/// Field-level validation happens at the HTTP boundary; the core assumes
/// `area > 0`, `layout` in 1..=12, `rent > 0` and a non-negative station metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Floor area in square metres
    pub area: f64,
    /// Building age in years
    pub age: u32,
    /// Layout code (1 = 1R ... 12 = 4LDK and larger)
    pub layout: u8,
    /// Daily passenger count of the nearest station
    #[serde(alias = "distance")]
    pub station_person: f64,
    /// Rent the user is currently paying or being offered
    pub rent: f64,
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub management_fee: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_units: Option<u32>,
}

impl PredictionRequest {
    /// The value the request carries for `feature`, if any
    pub fn value_of(&self, feature: Feature) -> Option<f64> {
        match feature {
            Feature::Area => Some(self.area),
            Feature::Age => Some(f64::from(self.age)),
            Feature::Layout => Some(f64::from(self.layout)),
            Feature::StationPerson => Some(self.station_person),
            Feature::ManagementFee => self.management_fee,
            Feature::TotalUnits => self.total_units.map(f64::from),
        }
    }

    pub fn supplies(&self, feature: Feature) -> bool {
        self.value_of(feature).is_some()
    }
}

/// Model input in the exact order declared by a variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub values: Vec<f64>,
}

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Tolerance band around the predicted rent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReasonableRange {
    pub min: f64,
    pub max: f64,
}

impl ReasonableRange {
    pub fn contains(&self, rent: f64) -> bool {
        rent >= self.min && rent <= self.max
    }
}

/// Five-level classification of a stated rent against the market
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PriceEvaluation {
    /// Clearly underpriced
    FarBelow,
    /// Below the range but close to it
    Below,
    /// Within the reasonable range
    AtMarket,
    /// Above the range but close to it
    Above,
    /// Clearly overpriced
    FarAbove,
}

impl PriceEvaluation {
    pub fn code(&self) -> u8 {
        match self {
            PriceEvaluation::FarBelow => 1,
            PriceEvaluation::Below => 2,
            PriceEvaluation::AtMarket => 3,
            PriceEvaluation::Above => 4,
            PriceEvaluation::FarAbove => 5,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PriceEvaluation::FarBelow),
            2 => Some(PriceEvaluation::Below),
            3 => Some(PriceEvaluation::AtMarket),
            4 => Some(PriceEvaluation::Above),
            5 => Some(PriceEvaluation::FarAbove),
            _ => None,
        }
    }

    pub fn is_reasonable(&self) -> bool {
        *self == PriceEvaluation::AtMarket
    }

    pub fn message(&self) -> &'static str {
        match self {
            PriceEvaluation::FarBelow => {
                "The rent is well below the market rate for comparable properties."
            }
            PriceEvaluation::Below => {
                "The rent is a little below the reasonable range; it is a good deal."
            }
            PriceEvaluation::AtMarket => "The rent is within the reasonable market range.",
            PriceEvaluation::Above => {
                "The rent is a little above the reasonable range; there may be room to negotiate."
            }
            PriceEvaluation::FarAbove => {
                "The rent is well above the market rate for comparable properties."
            }
        }
    }
}

impl Serialize for PriceEvaluation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for PriceEvaluation {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = u8::deserialize(deserializer)?;
        PriceEvaluation::from_code(code).ok_or_else(|| {
            serde::de::Error::custom(format!("price evaluation must be 1-5, got {}", code))
        })
    }
}

/// Identity and feature requirements of a model variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub region: String,
    pub model_type: String,
    pub description: String,
    pub features: Vec<Feature>,
    pub required_features: Vec<Feature>,
    pub optional_features: Vec<Feature>,
}

/// Response payload for a prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub input_conditions: PredictionRequest,
    pub model_info: ModelInfo,
    pub predicted_rent: f64,
    pub reasonable_range: ReasonableRange,
    pub price_evaluation: PriceEvaluation,
    pub evaluation_message: String,
    pub is_reasonable: bool,
}

/// Variants available for one region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionModels {
    pub region: String,
    pub name: String,
    pub description: String,
    pub models: Vec<ModelInfo>,
}

/// Every region and its variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCatalog {
    pub regions: Vec<RegionModels>,
    pub total: usize,
}

/// Human-readable description of a feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDescription {
    pub name: String,
    pub unit: String,
    pub description: String,
}
