//! Simulation configuration.
//!
//! Every parameter the engine needs is passed explicitly through
//! [`SimulationConfig`]; nothing is read from process-wide state.

use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};

/// Absolute tolerance used when checking that weights sum to one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Trading days in a year.
pub const TRADING_DAYS_PER_YEAR: usize = 252;

/// What to do when portfolio weights do not sum to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightPolicy {
    /// Accept any weights silently.
    Ignore,
    /// Log a warning and continue.
    #[default]
    Warn,
    /// Reject the simulation with [`RiskError::WeightsDoNotSumToOne`].
    Enforce,
}

/// Parameters for a Monte Carlo VaR run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Portfolio value at day zero, in currency units.
    pub initial_value: f64,
    /// Simulation horizon in trading days.
    pub days: usize,
    /// Number of independent trials.
    pub simulations: usize,
    /// VaR confidence level, strictly between 0 and 1.
    pub confidence_level: f64,
    /// Seed for reproducible runs; `None` draws entropy from the OS.
    pub seed: Option<u64>,
    /// Handling of weights that do not sum to one.
    pub weight_policy: WeightPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            initial_value: 10_000.0,
            days: TRADING_DAYS_PER_YEAR,
            simulations: 1_000,
            confidence_level: 0.95,
            seed: None,
            weight_policy: WeightPolicy::Warn,
        }
    }
}

impl SimulationConfig {
    /// Creates a configuration with the given horizon and default everything else.
    pub fn new(days: usize, simulations: usize) -> Self {
        Self {
            days,
            simulations,
            ..Self::default()
        }
    }

    /// Sets the initial portfolio value.
    #[must_use]
    pub fn with_initial_value(mut self, initial_value: f64) -> Self {
        self.initial_value = initial_value;
        self
    }

    /// Sets the horizon in days.
    #[must_use]
    pub fn with_days(mut self, days: usize) -> Self {
        self.days = days;
        self
    }

    /// Sets the number of trials.
    #[must_use]
    pub fn with_simulations(mut self, simulations: usize) -> Self {
        self.simulations = simulations;
        self
    }

    /// Sets the VaR confidence level.
    #[must_use]
    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    /// Fixes the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the weight-sum policy.
    #[must_use]
    pub fn with_weight_policy(mut self, policy: WeightPolicy) -> Self {
        self.weight_policy = policy;
        self
    }

    /// Risk level, `1 - confidence_level`.
    pub fn risk_level(&self) -> f64 {
        1.0 - self.confidence_level
    }

    /// Validates the parameters used by path generation.
    ///
    /// The confidence level is checked separately by the VaR extractor.
    pub fn validate(&self) -> RiskResult<()> {
        if self.days == 0 {
            return Err(RiskError::InvalidHorizon(
                "days must be at least 1".to_string(),
            ));
        }
        if self.simulations == 0 {
            return Err(RiskError::InvalidHorizon(
                "simulations must be at least 1".to_string(),
            ));
        }
        validate_initial_value(self.initial_value)
    }

    /// Validates the confidence level used for VaR extraction.
    pub fn validate_confidence(&self) -> RiskResult<()> {
        validate_confidence(self.confidence_level)
    }
}

pub(crate) fn validate_initial_value(initial_value: f64) -> RiskResult<()> {
    if !initial_value.is_finite() || initial_value <= 0.0 {
        return Err(RiskError::InvalidInput(format!(
            "initial value must be positive and finite, got {}",
            initial_value
        )));
    }
    Ok(())
}

pub(crate) fn validate_confidence(confidence_level: f64) -> RiskResult<()> {
    // NaN fails both comparisons
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        return Err(RiskError::InvalidConfidence(confidence_level));
    }
    Ok(())
}
