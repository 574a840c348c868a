//! CLI Command Definitions
//!
//! Argument structs for the alphafolio binary, using clap derive macros.
//! Command handlers live in main.rs.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Alphafolio - Momentum-screened, AI-score-tilted portfolio engine
#[derive(Parser, Debug)]
#[command(
    name = "alphafolio",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "Momentum-screened, AI-score-tilted equity portfolio engine",
    long_about = "Alphafolio screens a price universe by trailing momentum, scores the \
                  survivors through a pluggable scoring oracle, and allocates weights \
                  with a power-law tilt on the scores."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a full selection pass and export the portfolio
    Generate(GenerateCmd),

    /// Show the momentum ranking of the universe without scoring
    Universe(UniverseCmd),

    /// Load and validate a configuration file
    Validate(ValidateCmd),
}

/// Generate a portfolio
#[derive(Parser, Debug)]
pub struct GenerateCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Use the seeded offline simulator instead of real providers
    #[arg(short, long)]
    pub paper: bool,

    /// Seed for paper mode
    #[arg(long, value_name = "SEED", default_value = "42")]
    pub seed: u64,

    /// Override output CSV path
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Override portfolio size
    #[arg(long, value_name = "N")]
    pub portfolio_size: Option<usize>,

    /// Override tilt exponent (0 = equal weight)
    #[arg(long, value_name = "P")]
    pub tilt_exponent: Option<f64>,

    /// Override momentum retention percentile, in (0, 1]
    #[arg(long, value_name = "PCT")]
    pub top_percentile: Option<f64>,
}

/// Show the momentum ranking
#[derive(Parser, Debug)]
pub struct UniverseCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Use the seeded offline simulator instead of real providers
    #[arg(short, long)]
    pub paper: bool,

    /// Seed for paper mode
    #[arg(long, value_name = "SEED", default_value = "42")]
    pub seed: u64,

    /// Show only the top N rows
    #[arg(short = 'n', long, value_name = "N")]
    pub limit: Option<usize>,
}

/// Validate configuration
#[derive(Parser, Debug)]
pub struct ValidateCmd {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    pub config: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_defaults() {
        let app = CliApp::try_parse_from(["alphafolio", "generate"]).unwrap();
        match app.command {
            Command::Generate(cmd) => {
                assert_eq!(cmd.config, PathBuf::from("config/default.toml"));
                assert!(!cmd.paper);
                assert_eq!(cmd.seed, 42);
                assert!(cmd.portfolio_size.is_none());
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_generate_overrides() {
        let app = CliApp::try_parse_from([
            "alphafolio",
            "generate",
            "--paper",
            "--portfolio-size",
            "10",
            "--tilt-exponent",
            "0",
        ])
        .unwrap();
        match app.command {
            Command::Generate(cmd) => {
                assert!(cmd.paper);
                assert_eq!(cmd.portfolio_size, Some(10));
                assert_eq!(cmd.tilt_exponent, Some(0.0));
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_global_verbose_flag() {
        let app = CliApp::try_parse_from(["alphafolio", "universe", "--verbose"]).unwrap();
        assert!(app.verbose);
    }
}
