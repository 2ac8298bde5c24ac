//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::calculator::CalculationInput;
use crate::record::MAX_AGE;

/// Calculate command arguments.
///
/// Defaults match the questionnaire's initial form values.
#[derive(Debug, Args)]
pub struct CalculateCommand {
    /// Your name
    #[arg(short, long, default_value = "")]
    pub name: String,

    /// Your age in years (0-120)
    #[arg(short, long, default_value_t = 25, value_parser = clap::value_parser!(u8).range(0..=i64::from(MAX_AGE)))]
    pub age: u8,

    /// Your gender
    #[arg(short, long, default_value = "Male")]
    pub gender: String,

    /// Country whose emission factors apply (see `footprint countries`)
    #[arg(short = 'C', long)]
    pub country: Option<String>,

    /// Daily commute distance in km
    #[arg(long, default_value_t = 10.0)]
    pub distance: f64,

    /// Monthly electricity use in kWh
    #[arg(long, default_value_t = 200.0)]
    pub electricity: f64,

    /// Weekly waste in kg
    #[arg(long, default_value_t = 5.0)]
    pub waste: f64,

    /// Meals per day
    #[arg(long, default_value_t = 3)]
    pub meals: u32,

    /// Daily water use in liters
    #[arg(long, default_value_t = 100.0)]
    pub water: f64,

    /// Do not append the result to the log
    #[arg(long)]
    pub no_save: bool,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

impl CalculateCommand {
    /// Build the calculation input for the resolved country.
    #[must_use]
    pub fn input(&self, country: &str) -> CalculationInput {
        CalculationInput::new(
            country,
            self.distance,
            self.electricity,
            self.waste,
            self.meals,
            self.water,
        )
    }
}

/// Countries command arguments.
#[derive(Debug, Args)]
pub struct CountriesCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// History command arguments.
#[derive(Debug, Args)]
pub struct HistoryCommand {
    /// Maximum number of records, newest first
    #[arg(short, long, default_value = "10")]
    pub limit: usize,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Show command arguments.
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Record id
    pub id: i64,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
