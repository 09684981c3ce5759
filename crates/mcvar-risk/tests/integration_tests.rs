//! End-to-end tests for the Monte Carlo VaR engine.
//!
//! Prices -> return statistics -> simulated trajectories -> VaR.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use mcvar_risk::prelude::*;
use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// =============================================================================
// TEST DATA GENERATORS
// =============================================================================

fn five_asset_portfolio() -> PortfolioInputs {
    // Daily statistics in the range of broad equity, tech, semis, gold and long bonds
    let means = vec![0.0004, 0.0006, 0.0008, 0.0002, 0.0001];
    let vols = [0.012, 0.015, 0.02, 0.009, 0.01];
    let corr = [
        [1.0, 0.9, 0.8, 0.05, -0.3],
        [0.9, 1.0, 0.85, 0.0, -0.25],
        [0.8, 0.85, 1.0, 0.02, -0.2],
        [0.05, 0.0, 0.02, 1.0, 0.3],
        [-0.3, -0.25, -0.2, 0.3, 1.0],
    ];
    let cov = DMatrix::from_fn(5, 5, |i, j| corr[i][j] * vols[i] * vols[j]);
    PortfolioInputs::new(PortfolioInputs::equal_weights(5), means, cov)
}

fn synthetic_history() -> InMemoryPriceHistory {
    let assets: Vec<String> = ["SPY", "QQQ", "GLD"].iter().map(|s| s.to_string()).collect();
    let mut history = InMemoryPriceHistory::new(assets);
    let mut rng = StdRng::seed_from_u64(2024);
    let mut prices = [400.0, 350.0, 180.0];
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

    for day in 0..500 {
        let date = start + chrono::Days::new(day);
        let common: f64 = rng.random_range(-0.01..0.01);
        prices[0] *= 1.0 + common + rng.random_range(-0.005..0.005);
        prices[1] *= 1.0 + 1.2 * common + rng.random_range(-0.007..0.007);
        prices[2] *= 1.0 + rng.random_range(-0.006..0.006);
        history.push(date, prices.to_vec()).unwrap();
    }
    history
}

// =============================================================================
// PIPELINE
// =============================================================================

#[test]
fn test_prices_to_var_pipeline() {
    let history = synthetic_history();
    let (start, end) = history.date_range().unwrap();
    let stats = history
        .statistics(history.assets(), start, end)
        .unwrap();

    assert_eq!(stats.n_observations(), 499);

    let portfolio = PortfolioInputs::from_statistics(vec![0.4, 0.4, 0.2], &stats);
    let config = SimulationConfig::new(252, 400)
        .with_initial_value(10_000.0)
        .with_seed(11)
        .with_weight_policy(WeightPolicy::Enforce);

    let paths = run_seeded_simulation(&portfolio, &config).unwrap();
    let summary = SimulationSummary::new(&paths, 0.95, config.initial_value).unwrap();

    assert_eq!(paths.days(), 252);
    assert_eq!(paths.simulations(), 400);
    assert!(summary.min_final <= summary.var.tail_value);
    assert!(summary.var.tail_value <= summary.median_final);
    assert_relative_eq!(
        summary.var.var,
        config.initial_value - summary.var.tail_value,
        epsilon = 1e-9
    );
}

#[test]
fn test_positive_values_under_realistic_statistics() {
    let config = SimulationConfig::new(1260, 200).with_seed(5);
    let paths = run_seeded_simulation(&five_asset_portfolio(), &config).unwrap();

    assert_eq!(paths.days(), 1260);
    assert_eq!(paths.simulations(), 200);
    assert!(paths.as_matrix().iter().all(|v| *v > 0.0));
}

// =============================================================================
// DETERMINISM
// =============================================================================

#[test]
fn test_injected_generator_is_deterministic() {
    let portfolio = five_asset_portfolio();
    let config = SimulationConfig::new(50, 64);

    let mut rng_a = StdRng::seed_from_u64(12345);
    let mut rng_b = StdRng::seed_from_u64(12345);
    let a = run_simulation(&portfolio, &config, &mut rng_a).unwrap();
    let b = run_simulation(&portfolio, &config, &mut rng_b).unwrap();

    let bits_a: Vec<u64> = a.as_matrix().iter().map(|v| v.to_bits()).collect();
    let bits_b: Vec<u64> = b.as_matrix().iter().map(|v| v.to_bits()).collect();
    assert_eq!(bits_a, bits_b);
}

#[test]
fn test_trials_do_not_depend_on_trial_count() {
    // Trial s only depends on the s-th seed drawn from the injected generator
    let portfolio = five_asset_portfolio();
    let small = run_simulation(
        &portfolio,
        &SimulationConfig::new(20, 3),
        &mut StdRng::seed_from_u64(8),
    )
    .unwrap();
    let large = run_simulation(
        &portfolio,
        &SimulationConfig::new(20, 30),
        &mut StdRng::seed_from_u64(8),
    )
    .unwrap();

    for s in 0..3 {
        let a: Vec<f64> = small.path(s).iter().copied().collect();
        let b: Vec<f64> = large.path(s).iter().copied().collect();
        assert_eq!(a, b);
    }
}

// =============================================================================
// DEGENERATE INPUTS
// =============================================================================

#[test]
fn test_zero_covariance_zero_mean_is_constant() {
    let portfolio = PortfolioInputs::new(vec![0.25; 4], vec![0.0; 4], DMatrix::zeros(4, 4));
    let config = SimulationConfig::new(30, 10)
        .with_initial_value(10_000.0)
        .with_seed(1);

    let paths = run_seeded_simulation(&portfolio, &config).unwrap();

    assert!(paths.as_matrix().iter().all(|v| *v == 10_000.0));
    assert_relative_eq!(
        calculate_var(&paths, 0.99, 10_000.0).unwrap(),
        0.0,
        epsilon = 1e-12
    );
}

// =============================================================================
// FAILURES
// =============================================================================

#[test]
fn test_indefinite_covariance_is_rejected() {
    let portfolio = PortfolioInputs::new(
        vec![0.5, 0.5],
        vec![0.001, 0.001],
        DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]),
    );
    let err = run_seeded_simulation(&portfolio, &SimulationConfig::new(10, 10).with_seed(1))
        .unwrap_err();

    assert!(matches!(err, RiskError::NotPositiveDefinite { .. }));
    assert!(err.is_numerical());
}

#[test]
fn test_non_finite_covariance_is_a_validation_error() {
    let portfolio = PortfolioInputs::new(
        vec![0.5, 0.5],
        vec![0.001, 0.001],
        DMatrix::from_row_slice(2, 2, &[1e-4, f64::NAN, f64::NAN, 1e-4]),
    );
    let err = run_seeded_simulation(&portfolio, &SimulationConfig::new(10, 10).with_seed(1))
        .unwrap_err();

    assert!(matches!(err, RiskError::InvalidInput(_)));
    assert!(err.is_validation());
}

#[test]
fn test_mismatch_fails_before_sampling() {
    let portfolio = PortfolioInputs::new(
        vec![0.4, 0.3, 0.3],
        vec![0.0; 4],
        DMatrix::identity(4, 4) * 1e-4,
    );
    let mut rng = StdRng::seed_from_u64(77);
    let untouched = rng.clone();

    let err = run_simulation(&portfolio, &SimulationConfig::new(10, 10), &mut rng).unwrap_err();

    assert!(err.is_validation());
    assert!(matches!(err, RiskError::DimensionMismatch { .. }));
    // The generator was never advanced
    let mut untouched = untouched;
    assert_eq!(rng.random::<u64>(), untouched.random::<u64>());
}

#[test]
fn test_weights_against_larger_covariance() {
    let portfolio = PortfolioInputs::new(
        vec![0.4, 0.3, 0.3],
        vec![0.0; 3],
        DMatrix::identity(4, 4) * 1e-4,
    );
    let err = run_seeded_simulation(&portfolio, &SimulationConfig::new(10, 10).with_seed(1))
        .unwrap_err();
    assert_eq!(
        err,
        RiskError::DimensionMismatch {
            what: "covariance rows",
            expected: 3,
            actual: 4
        }
    );
}

#[test]
fn test_enforced_weight_sum() {
    let mut portfolio = five_asset_portfolio();
    portfolio.weights = vec![0.3; 5];
    let config = SimulationConfig::new(5, 5)
        .with_seed(1)
        .with_weight_policy(WeightPolicy::Enforce);

    assert!(matches!(
        run_seeded_simulation(&portfolio, &config),
        Err(RiskError::WeightsDoNotSumToOne { .. })
    ));

    // Default policy only warns
    let config = config.with_weight_policy(WeightPolicy::Warn);
    assert!(run_seeded_simulation(&portfolio, &config).is_ok());
}
