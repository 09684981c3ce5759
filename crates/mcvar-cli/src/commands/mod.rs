//! CLI command implementations.

pub mod paths;
pub mod simulate;
pub mod stats;

// Re-export submodules for convenience
pub use paths::PathsArgs;
pub use simulate::SimulateArgs;
pub use stats::StatsArgs;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use mcvar_risk::{
    PortfolioInputs, ReturnStatistics, ReturnStatisticsProvider, SimulationConfig, WeightPolicy,
};
use tracing::info;

use crate::config::RunConfig;
use crate::error::{CliError, CliResult};
use crate::prices::load_prices;

/// Data and allocation arguments shared by every command.
#[derive(Args, Debug, Default)]
pub struct PortfolioArgs {
    /// TOML run configuration; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// CSV of daily prices: date column, then one column per asset
    #[arg(short, long)]
    pub prices: Option<PathBuf>,

    /// Comma-separated assets to use (default: every column)
    #[arg(short, long, value_delimiter = ',')]
    pub assets: Option<Vec<String>>,

    /// Comma-separated weights aligned with the assets (default: equal)
    #[arg(short, long, value_delimiter = ',', allow_negative_numbers = true)]
    pub weights: Option<Vec<f64>>,

    /// First date of the estimation window (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// Last date of the estimation window (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,
}

/// Simulation parameter overrides.
#[derive(Args, Debug, Default)]
pub struct SimulationArgs {
    /// Initial portfolio value
    #[arg(short, long)]
    pub initial_value: Option<f64>,

    /// Trading days to simulate (252 = one year)
    #[arg(short, long)]
    pub days: Option<usize>,

    /// Number of simulation trials
    #[arg(short = 'n', long)]
    pub simulations: Option<usize>,

    /// VaR confidence level, e.g. 0.95
    #[arg(long)]
    pub confidence: Option<f64>,

    /// Random seed for reproducible runs
    #[arg(long, env = "MCVAR_SEED")]
    pub seed: Option<u64>,

    /// What to do when weights do not sum to one: ignore, warn, enforce
    #[arg(long)]
    pub weight_policy: Option<String>,
}

/// Parses a date string in YYYY-MM-DD format.
pub fn parse_date(s: &str) -> CliResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| CliError::InvalidDate(s.to_string()))
}

/// Parses a weight policy name.
pub fn parse_weight_policy(s: &str) -> CliResult<WeightPolicy> {
    match s.to_ascii_lowercase().as_str() {
        "ignore" => Ok(WeightPolicy::Ignore),
        "warn" => Ok(WeightPolicy::Warn),
        "enforce" => Ok(WeightPolicy::Enforce),
        other => Err(CliError::Config(format!(
            "unknown weight policy '{}'. Use ignore, warn or enforce.",
            other
        ))),
    }
}

/// A run configuration resolved from file and flags, plus its estimated statistics.
pub struct ResolvedRun {
    /// Estimated statistics for the selected assets.
    pub statistics: ReturnStatistics,
    /// Portfolio weights aligned with `statistics.assets`.
    pub weights: Vec<f64>,
    /// Estimation window actually used.
    pub window: (NaiveDate, NaiveDate),
    /// Engine parameters.
    pub simulation: SimulationConfig,
}

impl ResolvedRun {
    /// Portfolio inputs for the engine.
    pub fn portfolio(&self) -> PortfolioInputs {
        PortfolioInputs::from_statistics(self.weights.clone(), &self.statistics)
    }
}

/// Merges the config file with command-line flags and estimates statistics.
pub fn resolve(portfolio: &PortfolioArgs, sim: &SimulationArgs) -> CliResult<ResolvedRun> {
    let mut config = match &portfolio.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::default(),
    };

    apply_portfolio_overrides(&mut config, portfolio)?;
    apply_simulation_overrides(&mut config.simulation, sim)?;

    let prices_path = config
        .portfolio
        .prices
        .clone()
        .ok_or_else(|| CliError::MissingArgument("--prices (or portfolio.prices in config)".to_string()))?;
    let history = load_prices(&prices_path)?;

    let assets = config
        .portfolio
        .assets
        .clone()
        .unwrap_or_else(|| history.assets().to_vec());

    let (first, last) = history.date_range().ok_or_else(|| CliError::InvalidPrices {
        path: prices_path.display().to_string(),
        reason: "no price rows".to_string(),
    })?;
    let window = (
        config.portfolio.start.unwrap_or(first),
        config.portfolio.end.unwrap_or(last),
    );

    let statistics = history
        .statistics(&assets, window.0, window.1)
        .map_err(|e| CliError::InvalidPrices {
            path: prices_path.display().to_string(),
            reason: e.to_string(),
        })?;

    let weights = config
        .portfolio
        .weights
        .clone()
        .unwrap_or_else(|| PortfolioInputs::equal_weights(assets.len()));

    info!(
        assets = assets.len(),
        observations = statistics.n_observations(),
        start = %window.0,
        end = %window.1,
        "estimated return statistics"
    );

    Ok(ResolvedRun {
        statistics,
        weights,
        window,
        simulation: config.simulation,
    })
}

fn apply_portfolio_overrides(config: &mut RunConfig, args: &PortfolioArgs) -> CliResult<()> {
    let section = &mut config.portfolio;
    if let Some(prices) = &args.prices {
        section.prices = Some(prices.clone());
    }
    if let Some(assets) = &args.assets {
        section.assets = Some(assets.clone());
    }
    if let Some(weights) = &args.weights {
        section.weights = Some(weights.clone());
    }
    if let Some(start) = &args.start {
        section.start = Some(parse_date(start)?);
    }
    if let Some(end) = &args.end {
        section.end = Some(parse_date(end)?);
    }
    Ok(())
}

fn apply_simulation_overrides(config: &mut SimulationConfig, args: &SimulationArgs) -> CliResult<()> {
    if let Some(v) = args.initial_value {
        config.initial_value = v;
    }
    if let Some(d) = args.days {
        config.days = d;
    }
    if let Some(n) = args.simulations {
        config.simulations = n;
    }
    if let Some(c) = args.confidence {
        config.confidence_level = c;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(policy) = &args.weight_policy {
        config.weight_policy = parse_weight_policy(policy)?;
    }
    Ok(())
}
