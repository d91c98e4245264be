//! Rent prediction command

use anyhow::Result;
use colored::Colorize;

use crate::client::{ApiClient, PredictRequest, PredictionResponse};
use crate::output::{color_evaluation, format_rent, print_info, print_json, OutputFormat};

/// Request a prediction and evaluation for one property
pub async fn predict(
    client: &ApiClient,
    request: PredictRequest,
    format: OutputFormat,
) -> Result<()> {
    let result: PredictionResponse = client.post("api/v1/predict", &request).await?;

    match format {
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Table => print_prediction(&result),
    }

    Ok(())
}

fn print_prediction(result: &PredictionResponse) {
    let input = &result.input_conditions;

    println!("{}", "Rent Evaluation".bold());
    println!("{}", "=".repeat(50));
    println!("Region:                 {}", input.region.cyan());
    println!("Area:                   {} m2", input.area);
    println!("Age:                    {} years", input.age);
    println!("Layout:                 {}", input.layout);
    println!("Station passengers:     {}", input.station_person);
    if let Some(fee) = input.management_fee {
        println!("Management fee:         {}", format_rent(fee));
    }
    if let Some(units) = input.total_units {
        println!("Total units:            {}", units);
    }
    println!();

    println!("{}", "Prediction".bold());
    println!("{}", "-".repeat(50));
    println!("Stated rent:            {}", format_rent(input.rent));
    println!(
        "Predicted rent:         {}",
        format_rent(result.predicted_rent).bold()
    );
    println!(
        "Reasonable range:       {} - {}",
        format_rent(result.reasonable_range.min),
        format_rent(result.reasonable_range.max)
    );
    println!(
        "Evaluation:             {}",
        color_evaluation(result.price_evaluation)
    );
    println!();
    println!("{}", result.evaluation_message);
    println!();

    print_info(&format!(
        "Model: {} / {} ({})",
        result.model_info.region,
        result.model_info.model_type,
        result.model_info.features.join(", ")
    ));
}
