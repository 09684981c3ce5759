//! Run configuration file.
//!
//! A TOML file with a `[portfolio]` table describing the data and weights and
//! a `[simulation]` table deserialized straight into [`SimulationConfig`].
//!
//! ```toml
//! [portfolio]
//! prices = "prices.csv"
//! assets = ["SPY", "QQQ", "SMH", "GLD", "TLT"]
//! weights = [0.2, 0.2, 0.2, 0.2, 0.2]
//! start = "2015-01-01"
//!
//! [simulation]
//! initial_value = 10000.0
//! days = 252
//! simulations = 1000
//! confidence_level = 0.95
//! seed = 42
//! weight_policy = "warn"
//! ```

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use mcvar_risk::SimulationConfig;
use serde::{Deserialize, Serialize};

use crate::error::{CliError, CliResult};

/// Portfolio section of the run configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioSection {
    /// CSV file of daily prices (`date` column followed by one column per asset).
    pub prices: Option<PathBuf>,
    /// Assets to use, in order. Defaults to every column of the price file.
    pub assets: Option<Vec<String>>,
    /// Weights aligned with `assets`. Defaults to equal weights.
    pub weights: Option<Vec<f64>>,
    /// First date of the estimation window.
    pub start: Option<NaiveDate>,
    /// Last date of the estimation window.
    pub end: Option<NaiveDate>,
}

/// Complete run configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Data and allocation.
    pub portfolio: PortfolioSection,
    /// Engine parameters.
    pub simulation: SimulationConfig,
}

impl RunConfig {
    /// Loads a configuration from a TOML file.
    ///
    /// A relative `prices` path is resolved against the config file's directory.
    pub fn load(path: &Path) -> CliResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&text)?;

        if let (Some(prices), Some(dir)) = (&config.portfolio.prices, path.parent()) {
            if prices.is_relative() {
                config.portfolio.prices = Some(dir.join(prices));
            }
        }

        Ok(config)
    }

    /// Parses a configuration from TOML text.
    pub fn parse(text: &str) -> CliResult<Self> {
        toml::from_str(text).map_err(|e| CliError::Config(e.to_string()))
    }
}
