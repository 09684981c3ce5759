//! Simulated portfolio value trajectories.

use nalgebra::{DMatrix, DVectorView};

/// A days × simulations matrix of portfolio values.
///
/// Entry (d, s) is the portfolio value at the end of day d + 1 of trial s.
/// Storage is column-major, so each trial's path is contiguous.
#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryMatrix {
    values: DMatrix<f64>,
}

impl TrajectoryMatrix {
    /// Wraps an existing matrix (rows are days, columns are trials).
    pub fn from_matrix(values: DMatrix<f64>) -> Self {
        Self { values }
    }

    /// Builds a matrix from a column-major buffer, one trial after another.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != days * simulations`.
    pub fn from_column_major(days: usize, simulations: usize, data: Vec<f64>) -> Self {
        Self {
            values: DMatrix::from_vec(days, simulations, data),
        }
    }

    /// Number of simulated days (rows).
    pub fn days(&self) -> usize {
        self.values.nrows()
    }

    /// Number of trials (columns).
    pub fn simulations(&self) -> usize {
        self.values.ncols()
    }

    /// True if the matrix has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Portfolio value at `day` in trial `simulation`.
    pub fn value(&self, day: usize, simulation: usize) -> f64 {
        self.values[(day, simulation)]
    }

    /// The full path of one trial.
    pub fn path(&self, simulation: usize) -> DVectorView<'_, f64> {
        self.values.column(simulation)
    }

    /// Ending values of every trial (the last row).
    pub fn final_values(&self) -> Vec<f64> {
        if self.is_empty() {
            return Vec::new();
        }
        self.values.row(self.days() - 1).iter().copied().collect()
    }

    /// Cross-trial mean value for each day.
    pub fn mean_path(&self) -> Vec<f64> {
        if self.is_empty() {
            return Vec::new();
        }
        self.values.column_mean().iter().copied().collect()
    }

    /// Borrow the underlying matrix.
    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.values
    }

    /// Consume into the underlying matrix.
    pub fn into_inner(self) -> DMatrix<f64> {
        self.values
    }
}
