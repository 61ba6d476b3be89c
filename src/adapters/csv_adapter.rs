//! CSV file price data adapter.
//!
//! One `{SYMBOL}.csv` per instrument, header `date,open,high,low,close,volume`,
//! as saved from the upstream market-data provider. A malformed cell leaves
//! that field missing; a row without a usable date is skipped.

use crate::domain::error::PlotosError;
use crate::domain::ohlcv::{finite, PricePoint};
use crate::domain::price_series::PriceSeries;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_points(&self, symbol: &str) -> Result<Vec<PricePoint>, PlotosError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| PlotosError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        // Short rows leave their trailing fields missing.
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content.as_bytes());
        let mut points = Vec::new();

        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| PlotosError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;
            let field = |idx: usize| record.get(idx).unwrap_or_default();

            // Without a date the row cannot be placed in the series.
            let Some(date) = parse_date(field(0)) else {
                tracing::warn!(
                    symbol,
                    row = row + 1,
                    date = field(0),
                    "skipping row with invalid date"
                );
                continue;
            };

            let volume = parse_volume(field(5));
            let point = PricePoint {
                date,
                open: parse_price(field(1)),
                high: parse_price(field(2)),
                low: parse_price(field(3)),
                close: parse_price(field(4)),
                volume,
            };
            if !point.is_complete() || volume.is_none() {
                tracing::debug!(symbol, %date, "row has missing values");
            }
            points.push(point);
        }

        Ok(points)
    }
}

/// Accepts `YYYY-MM-DD` with an optional trailing time component
/// (`2024-01-02 00:00:00-03:00`).
pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let day = s.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Empty, `null`, `nan`, `inf` and other non-numeric cells become NaN
/// (missing).
fn parse_price(s: &str) -> f64 {
    s.trim()
        .parse::<f64>()
        .ok()
        .and_then(finite)
        .unwrap_or(f64::NAN)
}

/// Integer volume; some exports write it with a `.0` suffix. Anything else
/// is missing.
fn parse_volume(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 {
        Some(f as i64)
    } else {
        None
    }
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, PlotosError> {
        let points: Vec<PricePoint> = self
            .read_points(symbol)?
            .into_iter()
            .filter(|p| p.date >= start_date && p.date <= end_date)
            .collect();

        if points.is_empty() {
            return Err(PlotosError::NoData {
                symbol: symbol.to_string(),
            });
        }

        tracing::debug!(symbol, rows = points.len(), "loaded prices from csv");
        PriceSeries::from_unsorted(symbol, points)
    }

    fn list_symbols(&self) -> Result<Vec<String>, PlotosError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| PlotosError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| PlotosError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, PlotosError> {
        if !self.csv_path(symbol).exists() {
            return Ok(None);
        }
        let points = self.read_points(symbol)?;
        if points.is_empty() {
            return Ok(None);
        }
        let series = PriceSeries::from_unsorted(symbol, points)?;
        Ok(Some(series.date_range()))
    }
}
