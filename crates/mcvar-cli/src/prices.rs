//! Price history CSV loading.
//!
//! Expected layout: a header row `date,<asset>,<asset>,...` followed by one row
//! per trading day with ISO dates. Empty or `NaN` cells are treated as missing.

use std::path::Path;

use chrono::NaiveDate;
use mcvar_risk::InMemoryPriceHistory;
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Reads a price CSV into an in-memory history.
pub fn load_prices(path: &Path) -> CliResult<InMemoryPriceHistory> {
    let file = std::fs::File::open(path)?;
    read_prices(file, &path.display().to_string())
}

/// Reads price CSV data from any reader. `source` labels errors.
pub fn read_prices<R: std::io::Read>(reader: R, source: &str) -> CliResult<InMemoryPriceHistory> {
    let invalid = |reason: String| CliError::InvalidPrices {
        path: source.to_string(),
        reason,
    };

    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let headers = rdr.headers().map_err(|e| invalid(e.to_string()))?.clone();
    if headers.len() < 2 {
        return Err(invalid(
            "expected a date column followed by at least one asset column".to_string(),
        ));
    }
    let assets: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

    let mut history = InMemoryPriceHistory::new(assets);

    for (line, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| invalid(e.to_string()))?;
        let row = line + 2;

        let date_text = record.get(0).unwrap_or_default();
        let date = NaiveDate::parse_from_str(date_text, "%Y-%m-%d")
            .map_err(|_| invalid(format!("row {}: bad date '{}'", row, date_text)))?;

        let prices = record
            .iter()
            .skip(1)
            .map(|cell| parse_price(cell).ok_or_else(|| invalid(format!("row {}: bad price '{}'", row, cell))))
            .collect::<CliResult<Vec<f64>>>()?;

        history
            .push(date, prices)
            .map_err(|e| invalid(format!("row {}: {}", row, e)))?;
    }

    debug!(source, rows = history.len(), "loaded price history");
    Ok(history)
}

fn parse_price(cell: &str) -> Option<f64> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    cell.parse().ok()
}
