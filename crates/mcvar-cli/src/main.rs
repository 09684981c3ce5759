//! mcvar CLI - Monte Carlo Value at Risk from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Simulate one year with the default 1000 trials
//! mcvar simulate --prices prices.csv --weights 0.2,0.2,0.2,0.2,0.2
//!
//! # Reproducible run from a TOML config, 99% confidence
//! mcvar simulate --config run.toml --confidence 0.99 --seed 42
//!
//! # Inspect the estimated return statistics
//! mcvar stats --prices prices.csv --start 2015-01-01
//!
//! # Dump every simulated path as CSV
//! mcvar paths --prices prices.csv --days 20 --simulations 100 --output paths.csv
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod config;
mod error;
mod output;
mod prices;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stderr keeps stdout clean for json/csv output
    let filter = if cli.verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("mcvar=debug,mcvar_risk=debug"))
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("mcvar=info,mcvar_risk=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let format = cli.format;

    match cli.command {
        Commands::Simulate(args) => commands::simulate::execute(args, format)?,
        Commands::Stats(args) => commands::stats::execute(args, format)?,
        Commands::Paths(args) => commands::paths::execute(args)?,
    }

    Ok(())
}
