//! Error types for risk calculations.

use mcvar_math::MathError;
use thiserror::Error;

/// A specialized Result type for risk calculations.
pub type RiskResult<T> = Result<T, RiskError>;

/// Errors that can occur during simulation and VaR extraction.
///
/// Variants fall into two categories: input validation failures, raised
/// before any random sampling happens, and numerical failures raised while
/// computing. See [`RiskError::is_validation`] and [`RiskError::is_numerical`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RiskError {
    /// Weights, means and covariance disagree on the number of assets.
    #[error("dimension mismatch: {what} has length {actual}, expected {expected}")]
    DimensionMismatch {
        /// Which input is inconsistent.
        what: &'static str,
        /// Number of assets implied by the weights.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// Days or simulation count is zero.
    #[error("invalid horizon: {0}")]
    InvalidHorizon(String),

    /// Confidence level outside the open interval (0, 1).
    #[error("confidence level must be strictly between 0 and 1, got {0}")]
    InvalidConfidence(f64),

    /// Invalid input parameters
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Portfolio weights rejected by [`crate::WeightPolicy::Enforce`].
    #[error("portfolio weights sum to {sum}, expected 1 (tolerance {tolerance:e})")]
    WeightsDoNotSumToOne {
        /// Actual sum of the weights.
        sum: f64,
        /// Accepted absolute deviation from one.
        tolerance: f64,
    },

    /// Covariance matrix could not be factorized.
    #[error("covariance matrix is not positive definite (pivot {pivot}, value {value:.3e})")]
    NotPositiveDefinite {
        /// Zero-based index of the failing pivot.
        pivot: usize,
        /// Residual diagonal value at that pivot.
        value: f64,
    },

    /// A simulated portfolio value overflowed or became NaN.
    #[error("simulation produced a non-finite value at day {day}, simulation {simulation}")]
    NonFiniteTrajectory {
        /// Zero-based day index.
        day: usize,
        /// Zero-based simulation index.
        simulation: usize,
    },

    /// Trajectory matrix has no rows or no columns.
    #[error("simulation matrix is empty")]
    EmptySimulation,

    /// Insufficient data for calculation
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// Requested asset is not present in the price history.
    #[error("unknown asset: {0}")]
    UnknownAsset(String),

    /// Other numerical failure from the math crate.
    #[error("math error: {0}")]
    Math(MathError),
}

impl RiskError {
    /// Returns true for failures caused by malformed caller input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::DimensionMismatch { .. }
                | Self::InvalidHorizon(_)
                | Self::InvalidConfidence(_)
                | Self::InvalidInput(_)
                | Self::WeightsDoNotSumToOne { .. }
                | Self::EmptySimulation
                | Self::InsufficientData(_)
                | Self::UnknownAsset(_)
        )
    }

    /// Returns true for failures raised by the numerics themselves.
    pub fn is_numerical(&self) -> bool {
        matches!(
            self,
            Self::NotPositiveDefinite { .. } | Self::NonFiniteTrajectory { .. } | Self::Math(_)
        )
    }
}

impl From<MathError> for RiskError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::NotPositiveDefinite { pivot, value } => {
                Self::NotPositiveDefinite { pivot, value }
            }
            MathError::NotSymmetric { .. } => Self::InvalidInput(err.to_string()),
            MathError::InsufficientData { .. } => Self::InsufficientData(err.to_string()),
            MathError::InvalidInput { reason } => Self::InvalidInput(reason),
            other => Self::Math(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_positive_definite_maps_through() {
        let err: RiskError = MathError::NotPositiveDefinite {
            pivot: 1,
            value: -3.0,
        }
        .into();

        assert!(matches!(err, RiskError::NotPositiveDefinite { pivot: 1, .. }));
        assert!(err.is_numerical());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_invalid_input_is_validation() {
        let err: RiskError = MathError::invalid_input("Matrix contains non-finite entries").into();
        assert_eq!(
            err,
            RiskError::InvalidInput("Matrix contains non-finite entries".to_string())
        );
        assert!(err.is_validation());
        assert!(!err.is_numerical());
    }

    #[test]
    fn test_validation_category() {
        let err = RiskError::DimensionMismatch {
            what: "mean returns",
            expected: 3,
            actual: 4,
        };
        assert!(err.is_validation());
        assert_eq!(
            err.to_string(),
            "dimension mismatch: mean returns has length 4, expected 3"
        );
    }
}
