//! Portfolio inputs to the simulation.

use nalgebra::DMatrix;
use tracing::warn;

use crate::config::{WeightPolicy, WEIGHT_SUM_TOLERANCE};
use crate::error::{RiskError, RiskResult};
use crate::returns::ReturnStatistics;

/// Weights and return statistics for N assets, all indexed in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioInputs {
    /// Fractional allocation per asset. Negative values are short positions.
    pub weights: Vec<f64>,
    /// Mean daily return per asset.
    pub mean_returns: Vec<f64>,
    /// N×N covariance matrix of daily returns.
    pub covariance: DMatrix<f64>,
}

impl PortfolioInputs {
    /// Creates portfolio inputs. No validation happens until simulation.
    pub fn new(weights: Vec<f64>, mean_returns: Vec<f64>, covariance: DMatrix<f64>) -> Self {
        Self {
            weights,
            mean_returns,
            covariance,
        }
    }

    /// Pairs weights with statistics estimated from history.
    pub fn from_statistics(weights: Vec<f64>, statistics: &ReturnStatistics) -> Self {
        Self::new(
            weights,
            statistics.mean_returns.clone(),
            statistics.covariance.clone(),
        )
    }

    /// Equal weight across `n` assets.
    pub fn equal_weights(n: usize) -> Vec<f64> {
        vec![1.0 / n as f64; n]
    }

    /// Number of assets.
    pub fn n_assets(&self) -> usize {
        self.weights.len()
    }

    /// Sum of the weights.
    pub fn weight_sum(&self) -> f64 {
        self.weights.iter().sum()
    }

    /// Checks dimensions, finiteness and the weight-sum policy.
    pub fn validate(&self, policy: WeightPolicy) -> RiskResult<()> {
        let n = self.weights.len();
        if n == 0 {
            return Err(RiskError::InvalidInput(
                "portfolio must contain at least one asset".to_string(),
            ));
        }

        if self.mean_returns.len() != n {
            return Err(RiskError::DimensionMismatch {
                what: "mean returns",
                expected: n,
                actual: self.mean_returns.len(),
            });
        }
        if self.covariance.nrows() != n {
            return Err(RiskError::DimensionMismatch {
                what: "covariance rows",
                expected: n,
                actual: self.covariance.nrows(),
            });
        }
        if self.covariance.ncols() != n {
            return Err(RiskError::DimensionMismatch {
                what: "covariance columns",
                expected: n,
                actual: self.covariance.ncols(),
            });
        }

        if self.weights.iter().any(|w| !w.is_finite()) {
            return Err(RiskError::InvalidInput(
                "weights must be finite".to_string(),
            ));
        }
        if self.mean_returns.iter().any(|m| !m.is_finite()) {
            return Err(RiskError::InvalidInput(
                "mean returns must be finite".to_string(),
            ));
        }

        let sum = self.weight_sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            match policy {
                WeightPolicy::Ignore => {}
                WeightPolicy::Warn => {
                    warn!(sum, "portfolio weights do not sum to 1");
                }
                WeightPolicy::Enforce => {
                    return Err(RiskError::WeightsDoNotSumToOne {
                        sum,
                        tolerance: WEIGHT_SUM_TOLERANCE,
                    });
                }
            }
        }

        Ok(())
    }
}
