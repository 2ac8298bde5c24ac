//! Command-line interface for footprint.
//!
//! This module provides the CLI structure and text rendering for the
//! `footprint` binary.

mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CalculateCommand, ConfigCommand, CountriesCommand, HistoryCommand, ShowCommand, StatusCommand,
};

/// footprint - Estimate your annual carbon footprint
///
/// Answers a short questionnaire about travel, electricity, diet, waste and
/// water use, computes yearly emissions with per-country factors, and keeps
/// an append-only log of every result.
#[derive(Debug, Parser)]
#[command(name = "footprint")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute a footprint and log the result
    Calculate(CalculateCommand),

    /// List supported countries and their emission factors
    Countries(CountriesCommand),

    /// Show recently logged results
    History(HistoryCommand),

    /// Show one logged result
    Show(ShowCommand),

    /// Create the result log if it does not exist
    Init,

    /// Show result log status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli_with(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Status(StatusCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "footprint");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity() {
        use crate::logging::Verbosity;

        assert_eq!(cli_with(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(cli_with(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(cli_with(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(cli_with(2, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_calculate_defaults() {
        let cli = Cli::try_parse_from(["footprint", "calculate"]).unwrap();
        let Command::Calculate(cmd) = cli.command else {
            panic!("expected calculate command");
        };
        assert_eq!(cmd.age, 25);
        assert_eq!(cmd.distance, 10.0);
        assert_eq!(cmd.electricity, 200.0);
        assert_eq!(cmd.waste, 5.0);
        assert_eq!(cmd.meals, 3);
        assert_eq!(cmd.water, 100.0);
        assert!(cmd.country.is_none());
        assert!(!cmd.no_save);
    }

    #[test]
    fn test_parse_calculate_with_values() {
        let cli = Cli::try_parse_from([
            "footprint",
            "calculate",
            "--name",
            "Priya",
            "--age",
            "34",
            "-C",
            "United Kingdom",
            "--distance",
            "22.5",
            "--meals",
            "4",
            "--no-save",
            "--json",
        ])
        .unwrap();
        let Command::Calculate(cmd) = cli.command else {
            panic!("expected calculate command");
        };
        assert_eq!(cmd.name, "Priya");
        assert_eq!(cmd.age, 34);
        assert_eq!(cmd.country.as_deref(), Some("United Kingdom"));
        assert_eq!(cmd.distance, 22.5);
        assert_eq!(cmd.meals, 4);
        assert!(cmd.no_save);
        assert!(cmd.json);
    }

    #[test]
    fn test_parse_calculate_rejects_age_over_limit() {
        let result = Cli::try_parse_from(["footprint", "calculate", "--age", "121"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_history() {
        let cli = Cli::try_parse_from(["footprint", "history", "-l", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::History(HistoryCommand { limit: 3, .. })
        ));
    }

    #[test]
    fn test_parse_show() {
        let cli = Cli::try_parse_from(["footprint", "show", "7", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Show(ShowCommand { id: 7, json: true })
        ));
    }

    #[test]
    fn test_parse_init_and_countries() {
        let cli = Cli::try_parse_from(["footprint", "init"]).unwrap();
        assert!(matches!(cli.command, Command::Init));

        let cli = Cli::try_parse_from(["footprint", "countries"]).unwrap();
        assert!(matches!(cli.command, Command::Countries(_)));
    }

    #[test]
    fn test_parse_with_config() {
        let cli =
            Cli::try_parse_from(["footprint", "-c", "/custom/config.toml", "status"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_verbose_and_quiet() {
        let cli = Cli::try_parse_from(["footprint", "-vv", "status"]).unwrap();
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(["footprint", "-q", "status"]).unwrap();
        assert!(cli.quiet);
    }
}
