//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// Parse a format name from the config file, ignoring case
    pub fn parse(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

/// Print a table from a list of items
pub fn print_table<T: Tabled>(items: &[T]) {
    if items.is_empty() {
        println!("{}", "No items found".yellow());
        return;
    }
    let table = Table::new(items).with(Style::rounded()).to_string();
    println!("{}", table);
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Rent in units of 10,000 JPY per month
pub fn format_rent(rent: f64) -> String {
    format!("{:.2} (10k JPY)", rent)
}

pub fn evaluation_label(code: u8) -> &'static str {
    match code {
        1 => "far below market",
        2 => "below market",
        3 => "at market",
        4 => "above market",
        5 => "far above market",
        _ => "unknown",
    }
}

/// Color an evaluation code: green at market, yellow near, red far off
pub fn color_evaluation(code: u8) -> String {
    let label = format!("{} ({})", evaluation_label(code), code);
    match code {
        3 => label.green().bold().to_string(),
        2 | 4 => label.yellow().to_string(),
        1 | 5 => label.red().to_string(),
        _ => label,
    }
}
