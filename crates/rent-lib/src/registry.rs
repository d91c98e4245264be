//! Model registry: every region's variants with their loaded artifacts
//!
//! The registry is built once from a JSON catalogue before the service starts
//! accepting requests and is read-only afterwards. Artifact paths are resolved
//! relative to the catalogue's directory.
//!
//! ```json
//! {
//!   "regions": {
//!     "suginami": {
//!       "name": "Suginami",
//!       "description": "Suginami ward, Tokyo",
//!       "models": {
//!         "base": {
//!           "description": "Base features only",
//!           "features": ["area", "age", "layout", "station_person"],
//!           "required_features": ["area", "age", "layout", "station_person"],
//!           "model": { "path": "suginami/base.onnx", "format": "onnx" },
//!           "scaler": { "path": "suginami/base_scaler.json", "sha256": "..." }
//!         }
//!       }
//!     }
//!   },
//!   "feature_descriptions": {
//!     "area": { "name": "Floor area", "unit": "m2", "description": "..." }
//!   }
//! }
//! ```

use crate::error::{PredictError, RegistryError};
use crate::models::{Feature, FeatureDescription, ModelInfo, RegionModels};
use crate::predictor::{
    compute_checksum, variant_priority, IdentityScaler, LinearModel, OnnxModel, RentModel, Scaler,
    StandardScaler,
};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Name of the variant every region must provide
pub const BASE_VARIANT: &str = "base";

#[derive(Debug, Deserialize)]
struct RegistryConfig {
    regions: BTreeMap<String, RegionConfig>,
    #[serde(default)]
    feature_descriptions: BTreeMap<String, FeatureDescription>,
}

#[derive(Debug, Deserialize)]
struct RegionConfig {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: String,
    models: BTreeMap<String, VariantConfig>,
}

#[derive(Debug, Deserialize)]
struct VariantConfig {
    #[serde(default)]
    description: String,
    features: Vec<Feature>,
    required_features: Vec<Feature>,
    #[serde(default)]
    optional_features: Option<Vec<Feature>>,
    model: ModelArtifact,
    scaler: ScalerArtifact,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ModelFormat {
    #[default]
    Onnx,
    Linear,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ScalerFormat {
    #[default]
    Standard,
    Identity,
}

#[derive(Debug, Deserialize)]
struct ModelArtifact {
    path: PathBuf,
    #[serde(default)]
    format: ModelFormat,
    #[serde(default)]
    sha256: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScalerArtifact {
    #[serde(default)]
    path: Option<PathBuf>,
    #[serde(default)]
    format: ScalerFormat,
    #[serde(default)]
    sha256: Option<String>,
}

/// One trained model + scaler pair for a region
pub struct ModelVariant {
    region: String,
    name: String,
    description: String,
    features: Vec<Feature>,
    required_features: Vec<Feature>,
    optional_features: Vec<Feature>,
    priority: u8,
    model: Arc<dyn RentModel>,
    scaler: Arc<dyn Scaler>,
}

impl ModelVariant {
    /// Build a variant, checking the feature lists against each other and
    /// against the artifacts' dimensions
    pub fn new(
        region: impl Into<String>,
        name: impl Into<String>,
        features: Vec<Feature>,
        required_features: Vec<Feature>,
        model: Arc<dyn RentModel>,
        scaler: Arc<dyn Scaler>,
    ) -> Result<Self, RegistryError> {
        let region = region.into();
        let name = name.into();

        if features.is_empty() {
            return Err(RegistryError::EmptyFeatures {
                region,
                variant: name,
            });
        }

        let mut seen = HashSet::new();
        for feature in &features {
            if !seen.insert(*feature) {
                return Err(RegistryError::DuplicateFeature {
                    region,
                    variant: name,
                    feature: *feature,
                });
            }
        }

        if let Some(feature) = required_features.iter().find(|f| !seen.contains(*f)) {
            return Err(RegistryError::RequiredNotInFeatures {
                region,
                variant: name,
                feature: *feature,
            });
        }

        let dimensions = [
            ("model", model.input_dimension()),
            ("scaler", scaler.dimension()),
        ];
        for (kind, expected) in dimensions {
            if let Some(expected) = expected.filter(|d| *d != features.len()) {
                return Err(RegistryError::DimensionMismatch {
                    region,
                    variant: name,
                    kind,
                    expected,
                    actual: features.len(),
                });
            }
        }

        let mut required_unique = Vec::with_capacity(required_features.len());
        for feature in required_features {
            if !required_unique.contains(&feature) {
                required_unique.push(feature);
            }
        }

        let optional_features = features
            .iter()
            .copied()
            .filter(|f| !required_unique.contains(f))
            .collect();
        let priority = variant_priority(&name);

        Ok(Self {
            region,
            name,
            description: String::new(),
            features,
            required_features: required_unique,
            optional_features,
            priority,
            model,
            scaler,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// All model inputs, in model order
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn required_features(&self) -> &[Feature] {
        &self.required_features
    }

    /// Inputs filled with defaults when the request omits them
    pub fn optional_features(&self) -> &[Feature] {
        &self.optional_features
    }

    pub fn requires(&self, feature: Feature) -> bool {
        self.required_features.contains(&feature)
    }

    pub fn priority(&self) -> u8 {
        self.priority
    }

    pub fn model(&self) -> &dyn RentModel {
        self.model.as_ref()
    }

    pub fn scaler(&self) -> &dyn Scaler {
        self.scaler.as_ref()
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            region: self.region.clone(),
            model_type: self.name.clone(),
            description: self.description.clone(),
            features: self.features.clone(),
            required_features: self.required_features.clone(),
            optional_features: self.optional_features.clone(),
        }
    }
}

impl fmt::Debug for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelVariant")
            .field("region", &self.region)
            .field("name", &self.name)
            .field("features", &self.features)
            .field("required_features", &self.required_features)
            .field("backend", &self.model.backend())
            .finish_non_exhaustive()
    }
}

/// A region and its family of variants
#[derive(Debug)]
pub struct Region {
    id: String,
    name: String,
    description: String,
    variants: Vec<ModelVariant>,
}

impl Region {
    /// Build a region; it must carry a `base` variant that requires only
    /// fields every validated request provides
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        variants: Vec<ModelVariant>,
    ) -> Result<Self, RegistryError> {
        let id = id.into();

        let mut names = HashSet::new();
        for variant in &variants {
            if !names.insert(variant.name()) {
                return Err(RegistryError::DuplicateVariant {
                    region: id,
                    variant: variant.name().to_string(),
                });
            }
        }

        let base = variants
            .iter()
            .find(|v| v.name() == BASE_VARIANT)
            .ok_or_else(|| RegistryError::MissingBaseVariant(id.clone()))?;
        if let Some(feature) = base.required_features().iter().find(|f| f.is_optional()) {
            return Err(RegistryError::BaseRequiresOptional {
                region: id,
                feature: *feature,
            });
        }

        Ok(Self {
            id,
            name: name.into(),
            description: description.into(),
            variants,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn variants(&self) -> &[ModelVariant] {
        &self.variants
    }

    pub fn models(&self) -> RegionModels {
        RegionModels {
            region: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            models: self.variants.iter().map(ModelVariant::info).collect(),
        }
    }
}

/// Read-only catalogue of all regions, shared across requests
#[derive(Debug)]
pub struct ModelRegistry {
    regions: BTreeMap<String, Region>,
    feature_descriptions: BTreeMap<Feature, FeatureDescription>,
}

impl ModelRegistry {
    /// Load the catalogue at `path` and every artifact it references
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let bytes = read_artifact(path, None)?;
        let config: RegistryConfig =
            serde_json::from_slice(&bytes).map_err(|source| RegistryError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

        let mut regions = Vec::with_capacity(config.regions.len());
        for (region_id, region_config) in config.regions {
            let mut variants = Vec::with_capacity(region_config.models.len());
            for (variant_name, variant_config) in region_config.models {
                variants.push(load_variant(base_dir, &region_id, &variant_name, variant_config)?);
            }
            let name = region_config.name.unwrap_or_else(|| region_id.clone());
            regions.push(Region::new(
                region_id,
                name,
                region_config.description,
                variants,
            )?);
        }

        let mut feature_descriptions = BTreeMap::new();
        for (key, description) in config.feature_descriptions {
            let feature = key
                .parse::<Feature>()
                .map_err(|_| RegistryError::UnknownFeature(key.clone()))?;
            feature_descriptions.insert(feature, description);
        }

        let registry = Self::from_regions(regions)?.with_feature_descriptions(feature_descriptions);
        info!(
            path = %path.display(),
            regions = registry.regions.len(),
            variants = registry.variant_count(),
            "Model registry loaded"
        );
        Ok(registry)
    }

    /// Build a registry from already constructed regions
    pub fn from_regions(regions: Vec<Region>) -> Result<Self, RegistryError> {
        if regions.is_empty() {
            return Err(RegistryError::NoRegions);
        }
        let regions = regions
            .into_iter()
            .map(|r| (r.id().to_string(), r))
            .collect();
        Ok(Self {
            regions,
            feature_descriptions: BTreeMap::new(),
        })
    }

    pub fn with_feature_descriptions(
        mut self,
        descriptions: BTreeMap<Feature, FeatureDescription>,
    ) -> Self {
        self.feature_descriptions = descriptions;
        self
    }

    /// All variants of `region`
    pub fn get_variants(&self, region: &str) -> Result<&[ModelVariant], PredictError> {
        self.region(region)
            .map(Region::variants)
            .ok_or_else(|| PredictError::RegionNotFound(region.to_string()))
    }

    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.get(id)
    }

    pub fn contains_region(&self, id: &str) -> bool {
        self.regions.contains_key(id)
    }

    /// Regions in id order
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    pub fn region_ids(&self) -> Vec<&str> {
        self.regions.keys().map(String::as_str).collect()
    }

    pub fn feature_descriptions(&self) -> &BTreeMap<Feature, FeatureDescription> {
        &self.feature_descriptions
    }

    pub fn variant_count(&self) -> usize {
        self.regions.values().map(|r| r.variants.len()).sum()
    }
}

fn load_variant(
    base_dir: &Path,
    region: &str,
    name: &str,
    config: VariantConfig,
) -> Result<ModelVariant, RegistryError> {
    let artifact_error = |source| RegistryError::Artifact {
        region: region.to_string(),
        variant: name.to_string(),
        source,
    };
    let num_features = config.features.len();

    let model_path = base_dir.join(&config.model.path);
    let model_bytes = read_artifact(&model_path, config.model.sha256.as_deref())?;
    let model: Arc<dyn RentModel> = match config.model.format {
        ModelFormat::Onnx => {
            Arc::new(OnnxModel::from_bytes(&model_bytes, num_features).map_err(artifact_error)?)
        }
        ModelFormat::Linear => {
            Arc::new(LinearModel::from_json(&model_bytes).map_err(artifact_error)?)
        }
    };

    let scaler: Arc<dyn Scaler> = match config.scaler.format {
        ScalerFormat::Identity => Arc::new(IdentityScaler),
        ScalerFormat::Standard => {
            let relative = config.scaler.path.ok_or_else(|| RegistryError::MissingScalerPath {
                region: region.to_string(),
                variant: name.to_string(),
            })?;
            let scaler_path = base_dir.join(relative);
            let scaler_bytes = read_artifact(&scaler_path, config.scaler.sha256.as_deref())?;
            Arc::new(StandardScaler::from_json(&scaler_bytes).map_err(artifact_error)?)
        }
    };

    let variant = ModelVariant::new(
        region,
        name,
        config.features,
        config.required_features,
        model,
        scaler,
    )?
    .with_description(config.description);

    if let Some(declared) = config.optional_features {
        let mut declared = declared;
        let mut derived = variant.optional_features().to_vec();
        declared.sort();
        derived.sort();
        if declared != derived {
            return Err(RegistryError::OptionalMismatch {
                region: region.to_string(),
                variant: name.to_string(),
            });
        }
    }

    debug!(
        region = %region,
        variant = %name,
        backend = variant.model().backend(),
        features = ?variant.features(),
        "Loaded model variant"
    );
    Ok(variant)
}

/// Read an artifact, verifying its SHA256 digest when one is declared
fn read_artifact(path: &Path, sha256: Option<&str>) -> Result<Vec<u8>, RegistryError> {
    let bytes = fs::read(path).map_err(|source| RegistryError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(expected) = sha256 {
        let actual = compute_checksum(&bytes);
        if !actual.eq_ignore_ascii_case(expected) {
            return Err(RegistryError::ChecksumMismatch {
                path: path.to_path_buf(),
                expected: expected.to_string(),
                actual,
            });
        }
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    const BASE: [&str; 4] = ["area", "age", "layout", "station_person"];

    fn write(dir: &Path, name: &str, value: &serde_json::Value) {
        fs::write(dir.join(name), serde_json::to_vec(value).unwrap()).unwrap();
    }

    fn variant_json(features: &[&str], model: &str, scaler: &str) -> serde_json::Value {
        json!({
            "description": "test variant",
            "features": features,
            "required_features": features,
            "model": { "path": model, "format": "linear" },
            "scaler": { "path": scaler }
        })
    }

    /// Writes base (4 features) and kanrihi (5 features) artifacts
    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "base.json",
            &json!({"coefficients": [1.0, -0.5, 0.3, 0.2], "intercept": 8.0}),
        );
        write(
            dir.path(),
            "base_scaler.json",
            &json!({"mean": [25.0, 15.0, 3.0, 50.0], "scale": [10.0, 10.0, 2.0, 40.0]}),
        );
        write(
            dir.path(),
            "kanrihi.json",
            &json!({"coefficients": [1.0, -0.5, 0.3, 0.2, 0.4], "intercept": 8.2}),
        );
        write(
            dir.path(),
            "kanrihi_scaler.json",
            &json!({"mean": [25.0, 15.0, 3.0, 50.0, 0.8], "scale": [10.0, 10.0, 2.0, 40.0, 0.5]}),
        );
        dir
    }

    fn kanrihi_features() -> Vec<&'static str> {
        let mut features = BASE.to_vec();
        features.push("management_fee");
        features
    }

    fn write_config(dir: &TempDir, models: serde_json::Value) -> PathBuf {
        let config = json!({
            "regions": {
                "suginami": { "name": "Suginami", "description": "Suginami ward", "models": models }
            },
            "feature_descriptions": {
                "area": {
                    "name": "Floor area",
                    "unit": "m2",
                    "description": "Exclusive floor area"
                }
            }
        });
        let path = dir.path().join("config.json");
        write(dir.path(), "config.json", &config);
        path
    }

    #[test]
    fn test_load_registry() {
        let dir = fixture();
        let path = write_config(
            &dir,
            json!({
                "base": variant_json(&BASE, "base.json", "base_scaler.json"),
                "kanrihi": variant_json(&kanrihi_features(), "kanrihi.json", "kanrihi_scaler.json"),
            }),
        );

        let registry = ModelRegistry::load(&path).unwrap();
        assert_eq!(registry.variant_count(), 2);
        assert_eq!(registry.region_ids(), vec!["suginami"]);

        let variants = registry.get_variants("suginami").unwrap();
        let kanrihi = variants.iter().find(|v| v.name() == "kanrihi").unwrap();
        assert_eq!(kanrihi.features().last(), Some(&Feature::ManagementFee));
        assert_eq!(kanrihi.description(), "test variant");
        assert_eq!(kanrihi.priority(), 3);

        let region = registry.region("suginami").unwrap();
        assert_eq!(region.name(), "Suginami");
        assert!(registry.feature_descriptions().contains_key(&Feature::Area));
    }

    #[test]
    fn test_unknown_region_is_region_not_found() {
        let dir = fixture();
        let path = write_config(
            &dir,
            json!({ "base": variant_json(&BASE, "base.json", "base_scaler.json") }),
        );
        let registry = ModelRegistry::load(&path).unwrap();
        let err = registry.get_variants("invalid_region").unwrap_err();
        assert!(matches!(err, PredictError::RegionNotFound(r) if r == "invalid_region"));
    }

    #[test]
    fn test_missing_artifact_fails_startup() {
        let dir = fixture();
        let path = write_config(
            &dir,
            json!({ "base": variant_json(&BASE, "missing.json", "base_scaler.json") }),
        );
        let err = ModelRegistry::load(&path).unwrap_err();
        assert!(matches!(err, RegistryError::Io { .. }));
    }

    #[test]
    fn test_required_feature_outside_feature_list_fails() {
        let dir = fixture();
        let mut base = variant_json(&BASE, "base.json", "base_scaler.json");
        base["required_features"] =
            json!(["area", "age", "layout", "station_person", "total_units"]);
        let path = write_config(&dir, json!({ "base": base }));

        let err = ModelRegistry::load(&path).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::RequiredNotInFeatures {
                feature: Feature::TotalUnits,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_feature_name_fails() {
        let dir = fixture();
        let base = variant_json(
            &["area", "age", "layout", "floor"],
            "base.json",
            "base_scaler.json",
        );
        let path = write_config(&dir, json!({ "base": base }));
        assert!(matches!(
            ModelRegistry::load(&path).unwrap_err(),
            RegistryError::Parse { .. }
        ));
    }

    #[test]
    fn test_missing_base_variant_fails() {
        let dir = fixture();
        let path = write_config(
            &dir,
            json!({
                "kanrihi": variant_json(&kanrihi_features(), "kanrihi.json", "kanrihi_scaler.json")
            }),
        );
        let err = ModelRegistry::load(&path).unwrap_err();
        assert!(matches!(err, RegistryError::MissingBaseVariant(r) if r == "suginami"));
    }

    #[test]
    fn test_base_requiring_optional_feature_fails() {
        let dir = fixture();
        let path = write_config(
            &dir,
            json!({
                "base": variant_json(&kanrihi_features(), "kanrihi.json", "kanrihi_scaler.json")
            }),
        );
        assert!(matches!(
            ModelRegistry::load(&path).unwrap_err(),
            RegistryError::BaseRequiresOptional { .. }
        ));
    }

    #[test]
    fn test_scaler_dimension_mismatch_fails() {
        let dir = fixture();
        let path = write_config(
            &dir,
            json!({ "base": variant_json(&BASE, "base.json", "kanrihi_scaler.json") }),
        );
        assert!(matches!(
            ModelRegistry::load(&path).unwrap_err(),
            RegistryError::DimensionMismatch { kind: "scaler", expected: 5, actual: 4, .. }
        ));
    }

    #[test]
    fn test_checksum_verified() {
        let dir = fixture();
        let digest = compute_checksum(&fs::read(dir.path().join("base.json")).unwrap());

        let mut base = variant_json(&BASE, "base.json", "base_scaler.json");
        base["model"]["sha256"] = json!(digest.to_uppercase());
        let path = write_config(&dir, json!({ "base": base }));
        assert!(ModelRegistry::load(&path).is_ok());

        let mut base = variant_json(&BASE, "base.json", "base_scaler.json");
        base["scaler"]["sha256"] = json!(digest);
        let path = write_config(&dir, json!({ "base": base }));
        assert!(matches!(
            ModelRegistry::load(&path).unwrap_err(),
            RegistryError::ChecksumMismatch { .. }
        ));
    }

    #[test]
    fn test_corrupt_onnx_model_fails_startup() {
        let dir = fixture();
        fs::write(dir.path().join("base.onnx"), b"\x00\x01garbage").unwrap();
        let mut base = variant_json(&BASE, "base.onnx", "base_scaler.json");
        base["model"]["format"] = json!("onnx");
        let path = write_config(&dir, json!({ "base": base }));
        assert!(matches!(
            ModelRegistry::load(&path).unwrap_err(),
            RegistryError::Artifact { .. }
        ));
    }

    #[test]
    fn test_load_onnx_variant() {
        let dir = TempDir::new().unwrap();
        let onnx = fs::read(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/tests/fixtures/linear_4.onnx"
        ))
        .unwrap();
        fs::write(dir.path().join("base.onnx"), &onnx).unwrap();
        let path = write_config(
            &dir,
            json!({
                "base": {
                    "features": BASE,
                    "required_features": BASE,
                    "model": { "path": "base.onnx", "sha256": compute_checksum(&onnx) },
                    "scaler": { "format": "identity" }
                }
            }),
        );

        let registry = ModelRegistry::load(&path).unwrap();
        let base = &registry.get_variants("suginami").unwrap()[0];
        assert_eq!(base.model().backend(), "onnx");

        let value = base.model().predict(&[1.0, 2.0, 4.0, -2.0]).unwrap();
        assert!((value - 10.0).abs() < 1e-5, "got {}", value);
    }

    #[test]
    fn test_identity_scaler_needs_no_path() {
        let dir = fixture();
        let mut base = variant_json(&BASE, "base.json", "unused");
        base["scaler"] = json!({ "format": "identity" });
        let path = write_config(&dir, json!({ "base": base }));
        assert!(ModelRegistry::load(&path).is_ok());

        let mut base = variant_json(&BASE, "base.json", "unused");
        base["scaler"] = json!({ "format": "standard" });
        let path = write_config(&dir, json!({ "base": base }));
        assert!(matches!(
            ModelRegistry::load(&path).unwrap_err(),
            RegistryError::MissingScalerPath { .. }
        ));
    }

    #[test]
    fn test_declared_optional_features_must_match() {
        let dir = fixture();
        let mut kanrihi = variant_json(&kanrihi_features(), "kanrihi.json", "kanrihi_scaler.json");
        kanrihi["required_features"] = json!(BASE);
        kanrihi["optional_features"] = json!(["management_fee"]);
        let path = write_config(
            &dir,
            json!({
                "base": variant_json(&BASE, "base.json", "base_scaler.json"),
                "kanrihi": kanrihi.clone(),
            }),
        );
        let registry = ModelRegistry::load(&path).unwrap();
        let variant = registry
            .get_variants("suginami")
            .unwrap()
            .iter()
            .find(|v| v.name() == "kanrihi")
            .unwrap();
        assert_eq!(variant.optional_features(), &[Feature::ManagementFee]);

        kanrihi["optional_features"] = json!(["total_units"]);
        let path = write_config(
            &dir,
            json!({
                "base": variant_json(&BASE, "base.json", "base_scaler.json"),
                "kanrihi": kanrihi,
            }),
        );
        assert!(matches!(
            ModelRegistry::load(&path).unwrap_err(),
            RegistryError::OptionalMismatch { .. }
        ));
    }

    #[test]
    fn test_empty_catalogue_fails() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "config.json", &json!({ "regions": {} }));
        assert!(matches!(
            ModelRegistry::load(dir.path().join("config.json")).unwrap_err(),
            RegistryError::NoRegions
        ));
    }

    #[test]
    fn test_duplicate_feature_rejected() {
        let model = LinearModel::new(vec![1.0, 1.0], 0.0).unwrap();
        let err = ModelVariant::new(
            "suginami",
            "base",
            vec![Feature::Area, Feature::Area],
            vec![Feature::Area],
            Arc::new(model),
            Arc::new(IdentityScaler),
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateFeature { .. }));
    }
}
