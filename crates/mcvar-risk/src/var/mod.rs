//! Value at Risk (VaR) calculations.
//!
//! VaR estimates the potential loss over a specified time horizon
//! at a given confidence level.

mod monte_carlo;

pub use monte_carlo::*;

use serde::{Deserialize, Serialize};

/// Value at Risk result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaRResult {
    /// The VaR value: initial value minus the tail ending value.
    /// Negative when even the tail outcome is a gain.
    pub var: f64,
    /// Ending portfolio value at the `(1 - confidence) * 100` percentile
    pub tail_value: f64,
    /// Initial portfolio value
    pub initial_value: f64,
    /// Confidence level (e.g., 0.95 for 95%)
    pub confidence_level: f64,
    /// Time horizon in days
    pub horizon_days: usize,
    /// Number of simulated trials behind the estimate
    pub simulations: usize,
}

impl VaRResult {
    /// Risk level, `1 - confidence_level`.
    pub fn risk_level(&self) -> f64 {
        1.0 - self.confidence_level
    }

    /// VaR as a fraction of the initial value.
    pub fn var_fraction(&self) -> f64 {
        self.var / self.initial_value
    }
}

impl std::fmt::Display for VaRResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "VaR({:.0}%, {}d): ${:.2}",
            self.confidence_level * 100.0,
            self.horizon_days,
            self.var
        )
    }
}
