//! Correlated path generator.
//!
//! Each trial draws a days × assets matrix of independent standard normals,
//! correlates every day's draw through the Cholesky factor of the covariance
//! matrix, adds the mean daily returns, projects onto the portfolio weights
//! and compounds the resulting daily portfolio returns from the initial value.
//!
//! Trials are independent. The injected generator only supplies one seed per
//! trial; each trial then runs its own `StdRng`, so the output is identical
//! whether trials execute sequentially or on the rayon pool.

mod trajectory;

pub use trajectory::TrajectoryMatrix;

use mcvar_math::linear_algebra::{cholesky, lower_triangular_mul};
use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::SimulationConfig;
use crate::error::{RiskError, RiskResult};
use crate::portfolio::PortfolioInputs;

/// Runs the Monte Carlo simulation with an explicit random source.
///
/// All inputs are validated before the generator is touched. On success the
/// returned matrix has `config.days` rows and `config.simulations` columns.
///
/// # Errors
///
/// - Validation errors for zero days/simulations, a horizon whose buffer size
///   overflows, a non-positive initial value,
///   mismatched dimensions, non-finite inputs, or weights rejected by
///   [`crate::WeightPolicy::Enforce`].
/// - [`RiskError::NotPositiveDefinite`] if the covariance matrix cannot be factorized.
/// - [`RiskError::NonFiniteTrajectory`] if compounding overflows.
pub fn run_simulation<R: Rng + ?Sized>(
    portfolio: &PortfolioInputs,
    config: &SimulationConfig,
    rng: &mut R,
) -> RiskResult<TrajectoryMatrix> {
    config.validate()?;
    portfolio.validate(config.weight_policy)?;

    let lower = cholesky(&portfolio.covariance)?;

    let days = config.days;
    let simulations = config.simulations;
    let len = days.checked_mul(simulations).ok_or_else(|| {
        RiskError::InvalidHorizon(format!(
            "{} days x {} simulations overflows the trajectory buffer",
            days, simulations
        ))
    })?;

    debug!(
        assets = portfolio.n_assets(),
        days, simulations, "starting Monte Carlo simulation"
    );

    let seeds: Vec<u64> = (0..simulations).map(|_| rng.next_u64()).collect();

    let kernel = PathKernel {
        weights: &portfolio.weights,
        mean_returns: &portfolio.mean_returns,
        lower: &lower,
        initial_value: config.initial_value,
    };

    let mut values = vec![0.0; len];

    #[cfg(feature = "parallel")]
    values
        .par_chunks_mut(days)
        .zip(seeds.par_iter())
        .for_each(|(column, &seed)| kernel.fill(column, seed));

    #[cfg(not(feature = "parallel"))]
    values
        .chunks_mut(days)
        .zip(seeds.iter())
        .for_each(|(column, &seed)| kernel.fill(column, seed));

    if let Some(pos) = values.iter().position(|v| !v.is_finite()) {
        return Err(RiskError::NonFiniteTrajectory {
            day: pos % days,
            simulation: pos / days,
        });
    }

    debug!(days, simulations, "Monte Carlo simulation complete");

    Ok(TrajectoryMatrix::from_column_major(days, simulations, values))
}

/// Runs the simulation seeded from `config.seed`, or from OS entropy when unset.
pub fn run_seeded_simulation(
    portfolio: &PortfolioInputs,
    config: &SimulationConfig,
) -> RiskResult<TrajectoryMatrix> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    run_simulation(portfolio, config, &mut rng)
}

/// Read-only state shared by every trial.
struct PathKernel<'a> {
    weights: &'a [f64],
    mean_returns: &'a [f64],
    lower: &'a DMatrix<f64>,
    initial_value: f64,
}

impl PathKernel<'_> {
    /// Writes one trial's compounded portfolio values into `column`.
    fn fill(&self, column: &mut [f64], seed: u64) {
        let mut rng = StdRng::seed_from_u64(seed);
        let n = self.weights.len();
        let mut draws = vec![0.0; n];
        let mut shocks = vec![0.0; n];
        let mut value = self.initial_value;

        for slot in column.iter_mut() {
            for z in &mut draws {
                *z = rng.sample(StandardNormal);
            }
            lower_triangular_mul(self.lower, &draws, &mut shocks);

            let portfolio_return: f64 = self
                .weights
                .iter()
                .zip(self.mean_returns)
                .zip(&shocks)
                .map(|((w, mean), shock)| w * (mean + shock))
                .sum();

            value *= 1.0 + portfolio_return;
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_assets() -> PortfolioInputs {
        PortfolioInputs::new(
            vec![0.6, 0.4],
            vec![0.0005, 0.0003],
            DMatrix::from_row_slice(2, 2, &[0.0001, 0.00003, 0.00003, 0.00016]),
        )
    }

    #[test]
    fn test_shape() {
        let config = SimulationConfig::new(30, 50).with_seed(1);
        let paths = run_seeded_simulation(&two_assets(), &config).unwrap();

        assert_eq!(paths.days(), 30);
        assert_eq!(paths.simulations(), 50);
        assert!(paths.as_matrix().iter().all(|v| *v > 0.0));
    }

    #[test]
    fn test_seeded_runs_are_identical() {
        let config = SimulationConfig::new(20, 10).with_seed(42);
        let a = run_seeded_simulation(&two_assets(), &config).unwrap();
        let b = run_seeded_simulation(&two_assets(), &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = run_seeded_simulation(&two_assets(), &SimulationConfig::new(5, 5).with_seed(1))
            .unwrap();
        let b = run_seeded_simulation(&two_assets(), &SimulationConfig::new(5, 5).with_seed(2))
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_deterministic_growth_without_risk() {
        let portfolio = PortfolioInputs::new(vec![0.5, 0.5], vec![0.01, 0.03], DMatrix::zeros(2, 2));
        let config = SimulationConfig::new(3, 4)
            .with_initial_value(1_000.0)
            .with_seed(9);
        let paths = run_seeded_simulation(&portfolio, &config).unwrap();

        // Portfolio return is exactly 2% per day
        for s in 0..4 {
            assert_relative_eq!(paths.value(0, s), 1_020.0, epsilon = 1e-9);
            assert_relative_eq!(paths.value(1, s), 1_040.4, epsilon = 1e-9);
            assert_relative_eq!(paths.value(2, s), 1_061.208, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_oversized_horizon_is_rejected() {
        let config = SimulationConfig::default()
            .with_days(usize::MAX)
            .with_simulations(2)
            .with_seed(1);
        let err = run_seeded_simulation(&two_assets(), &config).unwrap_err();
        assert!(matches!(err, RiskError::InvalidHorizon(_)));
    }

    #[test]
    fn test_single_day_single_trial() {
        let config = SimulationConfig::new(1, 1).with_seed(3);
        let paths = run_seeded_simulation(&two_assets(), &config).unwrap();
        assert_eq!(paths.final_values().len(), 1);
    }

    #[test]
    fn test_indefinite_covariance_fails() {
        let portfolio = PortfolioInputs::new(
            vec![0.5, 0.5],
            vec![0.0, 0.0],
            DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]),
        );
        let err = run_seeded_simulation(&portfolio, &SimulationConfig::new(5, 5).with_seed(1))
            .unwrap_err();
        assert!(matches!(err, RiskError::NotPositiveDefinite { .. }));
    }

    #[test]
    fn test_overflow_is_reported() {
        let portfolio = PortfolioInputs::new(vec![1.0], vec![1e200], DMatrix::zeros(1, 1));
        let err = run_seeded_simulation(&portfolio, &SimulationConfig::new(3, 2).with_seed(1))
            .unwrap_err();
        assert!(matches!(
            err,
            RiskError::NonFiniteTrajectory {
                day: 1,
                simulation: 0
            }
        ));
    }
}
