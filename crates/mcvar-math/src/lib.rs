//! # mcvar Math
//!
//! Numerical building blocks for the mcvar Monte Carlo VaR engine.
//!
//! This crate provides:
//!
//! - **Linear Algebra**: Cholesky factorization of covariance matrices
//! - **Statistics**: Means, sample covariance, interpolated percentiles, histograms
//!
//! ## Design Philosophy
//!
//! - **Fail Loudly**: Indefinite or malformed matrices are errors, never silently repaired
//! - **Numerical Stability**: Careful handling of degenerate (semi-definite) inputs

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::float_cmp)]

pub mod error;
pub mod linear_algebra;
pub mod statistics;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::linear_algebra::{cholesky, lower_triangular_mul};
    pub use crate::statistics::{
        column_means, mean, percentile, percentile_of_sorted, sample_covariance, Histogram,
    };
}

pub use error::{MathError, MathResult};
