//! Summary of a completed simulation for reporting.

use mcvar_math::statistics::{mean, percentile_of_sorted, Histogram};
use serde::{Deserialize, Serialize};

use crate::error::{RiskError, RiskResult};
use crate::simulation::TrajectoryMatrix;
use crate::var::{value_at_risk, VaRResult};

/// Default number of bins for the final-value distribution.
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

/// One bucket of the final-value distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Inclusive lower edge.
    pub lower: f64,
    /// Upper edge (exclusive except for the last bin).
    pub upper: f64,
    /// Number of trials ending in this bin.
    pub count: usize,
}

/// Everything a presentation layer needs to describe a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    /// VaR estimate and its context.
    pub var: VaRResult,
    /// Cross-trial mean portfolio value per day.
    pub mean_path: Vec<f64>,
    /// Mean ending value.
    pub mean_final: f64,
    /// Median ending value.
    pub median_final: f64,
    /// Worst ending value.
    pub min_final: f64,
    /// Best ending value.
    pub max_final: f64,
    /// Distribution of ending values.
    pub histogram: Vec<HistogramBin>,
}

impl SimulationSummary {
    /// Summarizes `trajectories` with a VaR at `confidence_level`.
    pub fn new(
        trajectories: &TrajectoryMatrix,
        confidence_level: f64,
        initial_value: f64,
    ) -> RiskResult<Self> {
        Self::with_bins(
            trajectories,
            confidence_level,
            initial_value,
            DEFAULT_HISTOGRAM_BINS,
        )
    }

    /// Same as [`SimulationSummary::new`] with a custom histogram bin count.
    pub fn with_bins(
        trajectories: &TrajectoryMatrix,
        confidence_level: f64,
        initial_value: f64,
        bins: usize,
    ) -> RiskResult<Self> {
        let var = value_at_risk(trajectories, confidence_level, initial_value)?;

        let mut finals = trajectories.final_values();
        if finals.iter().any(|v| !v.is_finite()) {
            return Err(RiskError::InvalidInput(
                "trajectories contain non-finite values".to_string(),
            ));
        }
        finals.sort_by(f64::total_cmp);

        let histogram = Histogram::new(&finals, bins)?;
        let histogram = histogram
            .counts
            .iter()
            .enumerate()
            .map(|(i, &count)| HistogramBin {
                lower: histogram.edges[i],
                upper: histogram.edges[i + 1],
                count,
            })
            .collect();

        Ok(Self {
            mean_path: trajectories.mean_path(),
            mean_final: mean(&finals)?,
            median_final: percentile_of_sorted(&finals, 50.0),
            min_final: finals[0],
            max_final: finals[finals.len() - 1],
            histogram,
            var,
        })
    }

    /// Plain-language reading of the VaR estimate.
    pub fn interpretation(&self) -> String {
        let v = &self.var;
        format!(
            "There is a {:.0}% chance that the portfolio value will fall below ${:.2} in {} days \
             ({:.0}% confidence level). With {:.0}% confidence, the loss over the next {} days \
             will not exceed ${:.2}.",
            v.risk_level() * 100.0,
            v.tail_value,
            v.horizon_days,
            v.confidence_level * 100.0,
            v.confidence_level * 100.0,
            v.horizon_days,
            v.var
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn matrix() -> TrajectoryMatrix {
        let finals = [9000.0, 9500.0, 10000.0, 10500.0, 11000.0];
        let mut data = Vec::new();
        for f in finals {
            data.push(10_000.0);
            data.push(f);
        }
        TrajectoryMatrix::from_column_major(2, 5, data)
    }

    #[test]
    fn test_summary() {
        let summary = SimulationSummary::with_bins(&matrix(), 0.8, 10_000.0, 4).unwrap();

        assert_relative_eq!(summary.var.var, 600.0, epsilon = 1e-6);
        assert_relative_eq!(summary.mean_final, 10_000.0);
        assert_relative_eq!(summary.median_final, 10_000.0);
        assert_eq!(summary.min_final, 9000.0);
        assert_eq!(summary.max_final, 11000.0);
        assert_eq!(summary.mean_path.len(), 2);
        assert_eq!(summary.histogram.len(), 4);
        assert_eq!(summary.histogram.iter().map(|b| b.count).sum::<usize>(), 5);
        assert_eq!(summary.histogram[3].count, 2);
    }

    #[test]
    fn test_interpretation() {
        let summary = SimulationSummary::new(&matrix(), 0.8, 10_000.0).unwrap();
        let text = summary.interpretation();
        assert!(text.contains("20% chance"));
        assert!(text.contains("$9400.00"));
        assert!(text.contains("$600.00"));
    }

    #[test]
    fn test_summary_propagates_var_errors() {
        assert!(matches!(
            SimulationSummary::new(&matrix(), 1.5, 10_000.0),
            Err(RiskError::InvalidConfidence(_))
        ));
    }
}
