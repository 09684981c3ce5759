//! Sample statistics.
//!
//! Estimators used to turn historical return series into simulation inputs,
//! and to summarize simulated distributions.

use crate::error::{MathError, MathResult};
use nalgebra::DMatrix;

/// Arithmetic mean of a sample.
pub fn mean(values: &[f64]) -> MathResult<f64> {
    if values.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Per-column means of a set of observations.
///
/// `observations` is row-major: one row per observation, one column per variable.
pub fn column_means(observations: &[Vec<f64>]) -> MathResult<Vec<f64>> {
    let cols = observation_width(observations)?;
    let n = observations.len() as f64;

    let mut means = vec![0.0; cols];
    for row in observations {
        for (acc, v) in means.iter_mut().zip(row) {
            *acc += v;
        }
    }
    for m in &mut means {
        *m /= n;
    }
    Ok(means)
}

/// Unbiased sample covariance matrix (denominator n - 1).
///
/// `observations` is row-major: one row per observation, one column per variable.
/// At least two observations are required.
pub fn sample_covariance(observations: &[Vec<f64>]) -> MathResult<DMatrix<f64>> {
    let cols = observation_width(observations)?;
    let n = observations.len();
    if n < 2 {
        return Err(MathError::insufficient_data(2, n));
    }

    let means = column_means(observations)?;
    let mut cov = DMatrix::zeros(cols, cols);

    for row in observations {
        for i in 0..cols {
            let di = row[i] - means[i];
            for j in i..cols {
                cov[(i, j)] += di * (row[j] - means[j]);
            }
        }
    }

    let denom = (n - 1) as f64;
    for i in 0..cols {
        for j in i..cols {
            let value = cov[(i, j)] / denom;
            cov[(i, j)] = value;
            cov[(j, i)] = value;
        }
    }

    Ok(cov)
}

fn observation_width(observations: &[Vec<f64>]) -> MathResult<usize> {
    let first = observations
        .first()
        .ok_or_else(|| MathError::insufficient_data(1, 0))?;
    let cols = first.len();
    if cols == 0 {
        return Err(MathError::invalid_input("Observations have no columns"));
    }
    if let Some(row) = observations.iter().find(|r| r.len() != cols) {
        return Err(MathError::DimensionMismatch {
            rows1: 1,
            cols1: cols,
            rows2: 1,
            cols2: row.len(),
        });
    }
    Ok(cols)
}

/// Computes the `p`-th percentile (0..=100) of a sample.
///
/// Uses linear interpolation between the two nearest order statistics:
/// the rank is `p / 100 * (n - 1)`.
pub fn percentile(values: &[f64], p: f64) -> MathResult<f64> {
    if values.is_empty() {
        return Err(MathError::insufficient_data(1, 0));
    }
    if !(0.0..=100.0).contains(&p) {
        return Err(MathError::invalid_input(format!(
            "Percentile must be within [0, 100], got {}",
            p
        )));
    }
    if values.iter().any(|v| v.is_nan()) {
        return Err(MathError::invalid_input("Sample contains NaN"));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    Ok(percentile_of_sorted(&sorted, p))
}

/// Percentile of an already ascending-sorted, non-empty sample.
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        return sorted[lower];
    }

    let fraction = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Equal-width histogram of a sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Bin edges, `bins + 1` of them, ascending.
    pub edges: Vec<f64>,
    /// Number of observations per bin.
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bins `values` into `bins` equal-width buckets spanning [min, max].
    ///
    /// Every bin is half-open except the last, which includes the maximum.
    /// A sample with a single distinct value is centred in a unit-wide range.
    pub fn new(values: &[f64], bins: usize) -> MathResult<Self> {
        if values.is_empty() {
            return Err(MathError::insufficient_data(1, 0));
        }
        if bins == 0 {
            return Err(MathError::invalid_input("Histogram needs at least one bin"));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(MathError::invalid_input("Sample contains non-finite values"));
        }

        let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

        let mut counts = vec![0; bins];
        for v in values {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Ok(Self { edges, counts })
    }

    /// Number of bins.
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Total number of binned observations.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}
