//! Historical return statistics.
//!
//! The simulation consumes a mean daily return vector and a covariance matrix.
//! This module estimates both from aligned price histories. Fetching prices
//! from a market-data vendor is the job of a [`ReturnStatisticsProvider`]
//! implementation supplied by the caller.

use chrono::NaiveDate;
use mcvar_math::statistics::{column_means, sample_covariance};
use nalgebra::DMatrix;

use crate::error::{RiskError, RiskResult};

/// Daily return series and their summary statistics for an ordered asset set.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStatistics {
    /// Asset identifiers; every vector and matrix below is indexed in this order.
    pub assets: Vec<String>,
    /// Simple daily returns, one row per day, one column per asset.
    pub returns: Vec<Vec<f64>>,
    /// Mean daily return per asset.
    pub mean_returns: Vec<f64>,
    /// Sample covariance of daily returns.
    pub covariance: DMatrix<f64>,
}

impl ReturnStatistics {
    /// Estimates statistics from rows of prices (one row per trading day).
    ///
    /// Rows with a missing (non-finite) price for any asset are dropped first,
    /// then simple returns `p[t] / p[t-1] - 1` are taken between consecutive
    /// remaining rows. At least two returns are needed for a covariance.
    pub fn from_prices(assets: Vec<String>, prices: &[Vec<f64>]) -> RiskResult<Self> {
        let n = assets.len();
        if n == 0 {
            return Err(RiskError::InvalidInput("no assets given".to_string()));
        }

        let mut complete: Vec<&Vec<f64>> = Vec::with_capacity(prices.len());
        for row in prices {
            if row.len() != n {
                return Err(RiskError::DimensionMismatch {
                    what: "price row",
                    expected: n,
                    actual: row.len(),
                });
            }
            if row.iter().all(|p| p.is_finite()) {
                if row.iter().any(|p| *p <= 0.0) {
                    return Err(RiskError::InvalidInput(
                        "prices must be positive".to_string(),
                    ));
                }
                complete.push(row);
            }
        }

        let returns: Vec<Vec<f64>> = complete
            .windows(2)
            .map(|pair| {
                pair[1]
                    .iter()
                    .zip(pair[0].iter())
                    .map(|(today, yesterday)| today / yesterday - 1.0)
                    .collect()
            })
            .collect();

        Self::from_returns(assets, returns)
    }

    /// Builds statistics directly from a daily return series.
    pub fn from_returns(assets: Vec<String>, returns: Vec<Vec<f64>>) -> RiskResult<Self> {
        if returns.len() < 2 {
            return Err(RiskError::InsufficientData(format!(
                "need at least 2 daily returns, got {}",
                returns.len()
            )));
        }
        if let Some(row) = returns.iter().find(|r| r.len() != assets.len()) {
            return Err(RiskError::DimensionMismatch {
                what: "return row",
                expected: assets.len(),
                actual: row.len(),
            });
        }

        let mean_returns = column_means(&returns)?;
        let covariance = sample_covariance(&returns)?;

        Ok(Self {
            assets,
            returns,
            mean_returns,
            covariance,
        })
    }

    /// Number of assets.
    pub fn n_assets(&self) -> usize {
        self.assets.len()
    }

    /// Number of daily return observations.
    pub fn n_observations(&self) -> usize {
        self.returns.len()
    }

    /// Per-asset standard deviation of daily returns.
    pub fn volatilities(&self) -> Vec<f64> {
        (0..self.n_assets())
            .map(|i| self.covariance[(i, i)].sqrt())
            .collect()
    }
}

/// Source of return statistics for an asset set over a date window.
///
/// Implementations align all series to one trading calendar and drop
/// incomplete rows before estimating.
pub trait ReturnStatisticsProvider {
    /// Statistics for `assets` (in that order) over `[start, end]` inclusive.
    fn statistics(
        &self,
        assets: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> RiskResult<ReturnStatistics>;
}

/// Price history held in memory, e.g. loaded from a CSV export.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceHistory {
    assets: Vec<String>,
    dates: Vec<NaiveDate>,
    prices: Vec<Vec<f64>>,
}

impl InMemoryPriceHistory {
    /// Creates an empty history for the given assets.
    pub fn new(assets: Vec<String>) -> Self {
        Self {
            assets,
            dates: Vec::new(),
            prices: Vec::new(),
        }
    }

    /// Appends one day of prices. Use `f64::NAN` for a missing quote.
    pub fn push(&mut self, date: NaiveDate, prices: Vec<f64>) -> RiskResult<()> {
        if prices.len() != self.assets.len() {
            return Err(RiskError::DimensionMismatch {
                what: "price row",
                expected: self.assets.len(),
                actual: prices.len(),
            });
        }
        if let Some(last) = self.dates.last() {
            if date <= *last {
                return Err(RiskError::InvalidInput(format!(
                    "dates must be strictly increasing: {} follows {}",
                    date, last
                )));
            }
        }
        self.dates.push(date);
        self.prices.push(prices);
        Ok(())
    }

    /// Assets available in this history.
    pub fn assets(&self) -> &[String] {
        &self.assets
    }

    /// First and last date, if any rows exist.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((*self.dates.first()?, *self.dates.last()?))
    }

    /// Number of price rows.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True if no rows have been pushed.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

impl ReturnStatisticsProvider for InMemoryPriceHistory {
    fn statistics(
        &self,
        assets: &[String],
        start: NaiveDate,
        end: NaiveDate,
    ) -> RiskResult<ReturnStatistics> {
        if start > end {
            return Err(RiskError::InvalidInput(format!(
                "start date {} is after end date {}",
                start, end
            )));
        }

        let columns = assets
            .iter()
            .map(|asset| {
                self.assets
                    .iter()
                    .position(|a| a == asset)
                    .ok_or_else(|| RiskError::UnknownAsset(asset.clone()))
            })
            .collect::<RiskResult<Vec<usize>>>()?;

        let window: Vec<Vec<f64>> = self
            .dates
            .iter()
            .zip(&self.prices)
            .filter(|(date, _)| **date >= start && **date <= end)
            .map(|(_, row)| columns.iter().map(|&c| row[c]).collect())
            .collect();

        ReturnStatistics::from_prices(assets.to_vec(), &window)
    }
}
