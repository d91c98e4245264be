//! Rent Evaluation CLI
//!
//! A command-line tool for requesting rent predictions and browsing the
//! model catalogue served by the rent API.

mod client;
mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{models, predict};
use output::OutputFormat;

/// Rent Evaluation CLI
#[derive(Parser)]
#[command(name = "rentc")]
#[command(author, version, about = "CLI for the Rent Evaluation API", long_about = None)]
pub struct Cli {
    /// API endpoint URL (can also be set via RENTC_API_URL env var)
    #[arg(long, env = "RENTC_API_URL")]
    pub api_url: Option<String>,

    /// Output format
    #[arg(long, short)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Predict the market rent for a property and evaluate the stated rent
    Predict {
        /// Region id (falls back to default_region in the config file)
        #[arg(long, short)]
        region: Option<String>,

        /// Floor area in square metres
        #[arg(long)]
        area: f64,

        /// Building age in years
        #[arg(long)]
        age: u32,

        /// Layout code (1-12)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=12))]
        layout: u8,

        /// Daily passengers at the nearest station (thousands)
        #[arg(long, alias = "distance")]
        station_person: f64,

        /// Stated monthly rent (10k JPY)
        #[arg(long)]
        rent: f64,

        /// Monthly management fee (10k JPY)
        #[arg(long)]
        management_fee: Option<f64>,

        /// Number of units in the building
        #[arg(long)]
        total_units: Option<u32>,
    },

    /// List model variants, for all regions or a single one
    Models {
        /// Region id
        region: Option<String>,
    },

    /// List the features the API accepts
    Features,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = config::Config::load()?;

    let format = cli
        .format
        .or_else(|| config.default_format.as_deref().and_then(OutputFormat::parse))
        .unwrap_or_default();

    let client = client::ApiClient::new(&config.resolve_api_url(cli.api_url))?;

    let result = match cli.command {
        Commands::Predict {
            region,
            area,
            age,
            layout,
            station_person,
            rent,
            management_fee,
            total_units,
        } => {
            let request = client::PredictRequest {
                region: config.resolve_region(region)?,
                area,
                age,
                layout,
                station_person,
                rent,
                management_fee,
                total_units,
            };
            predict::predict(&client, request, format).await
        }
        Commands::Models { region } => models::list_models(&client, region, format).await,
        Commands::Features => models::list_features(&client, format).await,
    };

    if let Err(err) = result {
        output::print_error(&format!("{:#}", err));
        std::process::exit(1);
    }
    Ok(())
}
