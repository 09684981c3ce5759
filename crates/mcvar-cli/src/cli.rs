//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{PathsArgs, SimulateArgs, StatsArgs};

/// mcvar - Monte Carlo Value at Risk for multi-asset portfolios
#[derive(Parser)]
#[command(name = "mcvar")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run a Monte Carlo simulation and report VaR
    Simulate(SimulateArgs),

    /// Show mean returns and covariance estimated from prices
    Stats(StatsArgs),

    /// Write simulated portfolio paths as CSV
    Paths(PathsArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (just the value)
    Minimal,
}
