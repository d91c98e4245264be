//! Model catalogue and feature listing commands

use anyhow::Result;
use colored::Colorize;
use tabled::Tabled;

use crate::client::{ApiClient, FeatureList, ModelCatalog, ModelInfo, RegionModels};
use crate::output::{print_json, print_table, OutputFormat};

#[derive(Tabled)]
struct ModelRow {
    #[tabled(rename = "Region")]
    region: String,
    #[tabled(rename = "Variant")]
    variant: String,
    #[tabled(rename = "Required")]
    required: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&ModelInfo> for ModelRow {
    fn from(model: &ModelInfo) -> Self {
        Self {
            region: model.region.clone(),
            variant: model.model_type.clone(),
            required: model.required_features.join(", "),
            description: model.description.clone(),
        }
    }
}

#[derive(Tabled)]
struct FeatureRow {
    #[tabled(rename = "Feature")]
    feature: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Description")]
    description: String,
}

/// List every region's variants, or one region's when given
pub async fn list_models(
    client: &ApiClient,
    region: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let regions = match region {
        Some(region) => {
            let models: RegionModels = client
                .get_segments(&["api", "v1", "models", region.as_str()])
                .await?;
            vec![models]
        }
        None => {
            let catalog: ModelCatalog = client.get("api/v1/models").await?;
            if format == OutputFormat::Json {
                return print_json(&catalog);
            }
            catalog.regions
        }
    };

    match format {
        OutputFormat::Json => print_json(&regions[0])?,
        OutputFormat::Table => {
            for region in &regions {
                println!("{} {}", region.name.bold(), format!("({})", region.region).dimmed());
                if !region.description.is_empty() {
                    println!("{}", region.description);
                }
                let rows: Vec<ModelRow> = region.models.iter().map(ModelRow::from).collect();
                print_table(&rows);
                println!();
            }
        }
    }

    Ok(())
}

/// List the features the API accepts
pub async fn list_features(client: &ApiClient, format: OutputFormat) -> Result<()> {
    let list: FeatureList = client.get("api/v1/features").await?;

    match format {
        OutputFormat::Json => print_json(&list)?,
        OutputFormat::Table => {
            let rows: Vec<FeatureRow> = list
                .features
                .into_iter()
                .map(|f| FeatureRow {
                    feature: f.feature,
                    name: f.name,
                    unit: f.unit,
                    description: f.description,
                })
                .collect();
            print_table(&rows);
        }
    }

    Ok(())
}
