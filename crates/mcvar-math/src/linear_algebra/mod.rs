//! Linear algebra utilities.
//!
//! This module provides the matrix decomposition needed to impose a
//! covariance structure on independent random draws.

use crate::error::{MathError, MathResult};
use nalgebra::DMatrix;

/// Relative tolerance applied to pivots, scaled by the largest diagonal entry.
pub const PIVOT_TOLERANCE: f64 = 1e-12;

/// Relative tolerance for the symmetry check, scaled by the largest absolute entry.
pub const SYMMETRY_TOLERANCE: f64 = 1e-10;

/// Performs a Cholesky factorization of a symmetric matrix.
///
/// Returns the lower-triangular matrix L such that A = L * Lᵀ.
///
/// Positive semi-definite input is accepted: a pivot that is zero (within
/// [`PIVOT_TOLERANCE`]) yields a zero column in L, provided the rest of that
/// column is zero as well. A small but strictly positive pivot with a
/// non-zero column is factorized normally. This covers riskless assets and the all-zero
/// covariance matrix. Any negative pivot is reported as
/// [`MathError::NotPositiveDefinite`]; the input is never regularized.
///
/// # Errors
///
/// - [`MathError::InvalidInput`] if the matrix is not square, is empty, or
///   contains non-finite entries.
/// - [`MathError::NotSymmetric`] if A differs from Aᵀ beyond tolerance.
/// - [`MathError::NotPositiveDefinite`] if the factorization fails.
pub fn cholesky(matrix: &DMatrix<f64>) -> MathResult<DMatrix<f64>> {
    let n = matrix.nrows();
    if n != matrix.ncols() {
        return Err(MathError::invalid_input(format!(
            "Matrix must be square for Cholesky decomposition, got {}x{}",
            n,
            matrix.ncols()
        )));
    }
    if n == 0 {
        return Err(MathError::invalid_input("Matrix is empty"));
    }
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input("Matrix contains non-finite entries"));
    }

    check_symmetric(matrix)?;

    let max_diag = (0..n).map(|i| matrix[(i, i)].abs()).fold(0.0, f64::max);
    let tol = PIVOT_TOLERANCE * max_diag;

    let mut l = DMatrix::zeros(n, n);

    for j in 0..n {
        let mut diag = matrix[(j, j)];
        for k in 0..j {
            diag -= l[(j, k)] * l[(j, k)];
        }

        if diag < -tol {
            return Err(MathError::NotPositiveDefinite {
                pivot: j,
                value: diag,
            });
        }

        let residuals: Vec<f64> = (j + 1..n)
            .map(|i| {
                let mut sum = matrix[(i, j)];
                for k in 0..j {
                    sum -= l[(i, k)] * l[(j, k)];
                }
                sum
            })
            .collect();

        if diag <= tol {
            let column_vanishes = residuals
                .iter()
                .all(|r| r.abs() <= tol.max(f64::MIN_POSITIVE));
            if column_vanishes {
                // Degenerate direction: leave the column of L at zero.
                continue;
            }
            if diag <= 0.0 {
                return Err(MathError::NotPositiveDefinite {
                    pivot: j,
                    value: diag,
                });
            }
        }

        let l_jj = diag.sqrt();
        l[(j, j)] = l_jj;
        for (i, residual) in (j + 1..n).zip(residuals) {
            l[(i, j)] = residual / l_jj;
        }
    }

    Ok(l)
}

fn check_symmetric(matrix: &DMatrix<f64>) -> MathResult<()> {
    let n = matrix.nrows();
    let scale = matrix.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let tol = SYMMETRY_TOLERANCE * scale;

    for i in 0..n {
        for j in i + 1..n {
            let difference = (matrix[(i, j)] - matrix[(j, i)]).abs();
            if difference > tol {
                return Err(MathError::NotSymmetric {
                    row: i,
                    col: j,
                    difference,
                });
            }
        }
    }

    Ok(())
}

/// Multiplies a lower-triangular matrix by a vector, writing into `out`.
///
/// Only the lower triangle of `lower` is read.
///
/// # Panics
///
/// Panics if the slice lengths do not match the matrix dimension.
pub fn lower_triangular_mul(lower: &DMatrix<f64>, x: &[f64], out: &mut [f64]) {
    let n = lower.nrows();
    assert_eq!(x.len(), n, "vector length must match matrix dimension");
    assert_eq!(out.len(), n, "output length must match matrix dimension");

    for (i, slot) in out.iter_mut().enumerate() {
        let mut sum = 0.0;
        for (k, xk) in x.iter().enumerate().take(i + 1) {
            sum += lower[(i, k)] * xk;
        }
        *slot = sum;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn reconstruct(l: &DMatrix<f64>) -> DMatrix<f64> {
        l * l.transpose()
    }

    #[test]
    fn test_cholesky_positive_definite() {
        let a = DMatrix::from_row_slice(3, 3, &[4.0, 12.0, -16.0, 12.0, 37.0, -43.0, -16.0, -43.0, 98.0]);

        let l = cholesky(&a).unwrap();

        // Textbook factor
        assert_relative_eq!(l[(0, 0)], 2.0, epsilon = 1e-12);
        assert_relative_eq!(l[(1, 0)], 6.0, epsilon = 1e-12);
        assert_relative_eq!(l[(1, 1)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(l[(2, 0)], -8.0, epsilon = 1e-12);
        assert_relative_eq!(l[(2, 1)], 5.0, epsilon = 1e-12);
        assert_relative_eq!(l[(2, 2)], 3.0, epsilon = 1e-12);

        let product = reconstruct(&l);
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(product[(i, j)], a[(i, j)], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_cholesky_is_lower_triangular() {
        let a = DMatrix::from_row_slice(2, 2, &[0.0004, 0.0001, 0.0001, 0.0009]);
        let l = cholesky(&a).unwrap();
        assert_eq!(l[(0, 1)], 0.0);
    }

    #[test]
    fn test_cholesky_indefinite_fails() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 1.0]);
        match cholesky(&a) {
            Err(MathError::NotPositiveDefinite { pivot, value }) => {
                assert_eq!(pivot, 1);
                assert_relative_eq!(value, -3.0, epsilon = 1e-12);
            }
            other => panic!("expected NotPositiveDefinite, got {:?}", other),
        }
    }

    #[test]
    fn test_cholesky_zero_matrix() {
        let a = DMatrix::zeros(3, 3);
        let l = cholesky(&a).unwrap();
        assert!(l.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_cholesky_semidefinite() {
        // Perfectly correlated pair: rank one
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        let l = cholesky(&a).unwrap();
        assert_relative_eq!(l[(1, 0)], 1.0, epsilon = 1e-12);
        assert_eq!(l[(1, 1)], 0.0);
    }

    #[test]
    fn test_cholesky_zero_pivot_with_residual_fails() {
        // Zero variance but non-zero covariance cannot be PSD
        let a = DMatrix::from_row_slice(2, 2, &[0.0, 0.5, 0.5, 1.0]);
        assert!(matches!(
            cholesky(&a),
            Err(MathError::NotPositiveDefinite { pivot: 0, .. })
        ));
    }

    #[test]
    fn test_cholesky_small_positive_pivot() {
        // Pivot 1 is below the relative tolerance but the matrix is still positive definite
        let a = DMatrix::from_row_slice(3, 3, &[1.0, 0.0, 0.0, 0.0, 1e-13, 1e-7, 0.0, 1e-7, 1.0]);
        let l = cholesky(&a).unwrap();

        assert!(l[(1, 1)] > 0.0);
        assert!(l[(2, 2)] > 0.0);
        let product = reconstruct(&l);
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(product[(i, j)], a[(i, j)], epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_cholesky_rejects_asymmetric() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 0.2, 0.3, 1.0]);
        assert!(matches!(cholesky(&a), Err(MathError::NotSymmetric { .. })));
    }

    #[test]
    fn test_cholesky_rejects_non_square_and_nan() {
        let a = DMatrix::from_row_slice(2, 3, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
        assert!(matches!(cholesky(&a), Err(MathError::InvalidInput { .. })));

        let b = DMatrix::from_row_slice(2, 2, &[1.0, f64::NAN, f64::NAN, 1.0]);
        assert!(matches!(cholesky(&b), Err(MathError::InvalidInput { .. })));
    }

    #[test]
    fn test_lower_triangular_mul() {
        let l = DMatrix::from_row_slice(2, 2, &[2.0, 99.0, 1.0, 3.0]);
        let mut out = [0.0; 2];
        lower_triangular_mul(&l, &[1.0, 2.0], &mut out);
        // Upper entry (99.0) is ignored
        assert_relative_eq!(out[0], 2.0);
        assert_relative_eq!(out[1], 7.0);
    }
}
