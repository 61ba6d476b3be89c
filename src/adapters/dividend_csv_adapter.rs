//! CSV file dividend history adapter.
//!
//! One `{SYMBOL}.csv` per instrument with a `date,dividends` header, as
//! saved from the upstream market-data provider. Dates may carry a time
//! component. Payments on the same day are added together. A row without a
//! usable date or a positive amount is skipped.

use crate::adapters::csv_adapter::parse_date;
use crate::domain::error::PlotosError;
use crate::domain::rate_series::{RateSeries, ValuePoint};
use crate::ports::dividend_port::DividendPort;
use chrono::NaiveDate;
use std::path::PathBuf;

pub struct DividendCsvAdapter {
    base_path: PathBuf,
}

impl DividendCsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn parse_amount(s: &str) -> Option<f64> {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

impl DividendPort for DividendCsvAdapter {
    fn fetch_dividends(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<RateSeries, PlotosError> {
        let path = self.csv_path(symbol);
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&path)
            .map_err(|e| PlotosError::Data {
                reason: format!("failed to read {}: {}", path.display(), e),
            })?;

        let mut points: Vec<ValuePoint> = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| PlotosError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;
            let field = |idx: usize| record.get(idx).unwrap_or_default();

            let (Some(date), Some(value)) = (parse_date(field(0)), parse_amount(field(1))) else {
                tracing::warn!(
                    symbol,
                    row = row + 1,
                    date = field(0),
                    amount = field(1),
                    "skipping dividend row"
                );
                continue;
            };
            if date < start_date || date > end_date {
                continue;
            }
            points.push(ValuePoint { date, value });
        }

        points.sort_by_key(|p| p.date);
        let mut merged: Vec<ValuePoint> = Vec::with_capacity(points.len());
        for point in points {
            match merged.last_mut() {
                Some(last) if last.date == point.date => last.value += point.value,
                _ => merged.push(point),
            }
        }

        tracing::debug!(symbol, payments = merged.len(), "loaded dividends from csv");
        RateSeries::new(symbol, merged)
    }
}
