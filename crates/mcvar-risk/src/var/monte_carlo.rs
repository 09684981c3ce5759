//! Monte Carlo VaR extraction from simulated trajectories.

use mcvar_math::statistics::percentile;

use super::VaRResult;
use crate::config::{validate_confidence, validate_initial_value};
use crate::simulation::TrajectoryMatrix;
use crate::RiskError;

/// Calculate VaR from simulated portfolio trajectories.
///
/// Takes the final day of every trial, finds the `(1 - confidence_level) * 100`
/// percentile of those ending values (linear interpolation between order
/// statistics) and returns `initial_value - percentile`. The result is not
/// clamped: a negative VaR means the tail outcome still ends above the
/// initial value.
///
/// # Arguments
///
/// * `trajectories` - Days × simulations matrix of portfolio values
/// * `confidence_level` - Confidence level, strictly between 0 and 1 (e.g., 0.95)
/// * `initial_value` - Portfolio value at day zero
pub fn calculate_var(
    trajectories: &TrajectoryMatrix,
    confidence_level: f64,
    initial_value: f64,
) -> Result<f64, RiskError> {
    Ok(tail_value(trajectories, confidence_level, initial_value)?.0)
}

/// Calculate VaR and return it with the context it was computed in.
pub fn value_at_risk(
    trajectories: &TrajectoryMatrix,
    confidence_level: f64,
    initial_value: f64,
) -> Result<VaRResult, RiskError> {
    let (var, tail_value) = tail_value(trajectories, confidence_level, initial_value)?;

    Ok(VaRResult {
        var,
        tail_value,
        initial_value,
        confidence_level,
        horizon_days: trajectories.days(),
        simulations: trajectories.simulations(),
    })
}

/// Returns (VaR, tail ending value).
fn tail_value(
    trajectories: &TrajectoryMatrix,
    confidence_level: f64,
    initial_value: f64,
) -> Result<(f64, f64), RiskError> {
    validate_confidence(confidence_level)?;
    validate_initial_value(initial_value)?;

    if trajectories.is_empty() {
        return Err(RiskError::EmptySimulation);
    }

    let final_values = trajectories.final_values();
    let tail = percentile(&final_values, (1.0 - confidence_level) * 100.0)?;

    Ok((initial_value - tail, tail))
}
