//! # mcvar-risk
//!
//! Monte Carlo Value at Risk for multi-asset portfolios.
//!
//! This crate provides:
//!
//! - **Simulation**: Correlated daily return paths via Cholesky factorization,
//!   compounded into portfolio value trajectories
//! - **VaR**: Percentile-based VaR from the distribution of ending values
//! - **Returns**: Mean and covariance estimation from aligned price histories
//! - **Summary**: Mean path, ending-value distribution and interpretation text
//!
//! ## Example
//!
//! ```
//! use mcvar_risk::prelude::*;
//! use nalgebra::DMatrix;
//!
//! let portfolio = PortfolioInputs::new(
//!     vec![0.5, 0.5],
//!     vec![0.0004, 0.0002],
//!     DMatrix::from_row_slice(2, 2, &[1e-4, 2e-5, 2e-5, 4e-5]),
//! );
//! let config = SimulationConfig::new(252, 500).with_seed(42);
//!
//! let paths = run_seeded_simulation(&portfolio, &config)?;
//! let var = calculate_var(&paths, 0.95, config.initial_value)?;
//! assert_eq!(paths.days(), 252);
//! assert!(var.is_finite());
//! # Ok::<(), mcvar_risk::RiskError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::uninlined_format_args)]

pub mod config;
mod error;
pub mod portfolio;
pub mod returns;
pub mod simulation;
pub mod summary;
pub mod var;

pub use config::{SimulationConfig, WeightPolicy};
pub use error::{RiskError, RiskResult};
pub use portfolio::PortfolioInputs;
pub use returns::{InMemoryPriceHistory, ReturnStatistics, ReturnStatisticsProvider};
pub use simulation::{run_seeded_simulation, run_simulation, TrajectoryMatrix};
pub use summary::SimulationSummary;
pub use var::{calculate_var, value_at_risk, VaRResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::*;
    pub use crate::portfolio::*;
    pub use crate::returns::*;
    pub use crate::simulation::*;
    pub use crate::summary::*;
    pub use crate::var::*;
    pub use crate::{RiskError, RiskResult};
}
