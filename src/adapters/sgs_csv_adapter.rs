//! Central bank time-series (SGS) export adapter.
//!
//! The statistics service exports each series as `;`-separated CSV with a
//! `data;valor` header, `DD/MM/YYYY` dates and a decimal comma:
//!
//! ```text
//! "data";"valor"
//! "02/01/2024";"11,75"
//! ```
//!
//! Files are stored as `{code}.csv` under the configured rates directory.

use crate::domain::error::PlotosError;
use crate::domain::rate_series::{RateSeries, ValuePoint};
use crate::ports::rate_port::RatePort;
use chrono::NaiveDate;
use std::path::PathBuf;

pub struct SgsCsvAdapter {
    base_path: PathBuf,
}

impl SgsCsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: u32) -> PathBuf {
        self.base_path.join(format!("{}.csv", code))
    }
}

fn parse_decimal_comma(s: &str) -> Option<f64> {
    let normalized = s.trim().replace('.', "").replace(',', ".");
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

impl RatePort for SgsCsvAdapter {
    fn fetch_rate_series(
        &self,
        code: u32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<RateSeries, PlotosError> {
        let path = self.csv_path(code);
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(b';')
            .from_path(&path)
            .map_err(|e| PlotosError::Data {
                reason: format!("failed to read {}: {}", path.display(), e),
            })?;

        let mut points = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| PlotosError::Data {
                reason: format!("CSV parse error in {}: {}", path.display(), e),
            })?;

            let date_str = record.get(0).unwrap_or_default().trim();
            let date = NaiveDate::parse_from_str(date_str, "%d/%m/%Y").map_err(|_| {
                PlotosError::Data {
                    reason: format!("series {} row {}: invalid date {:?}", code, row + 1, date_str),
                }
            })?;
            if date < start_date || date > end_date {
                continue;
            }

            // The service leaves the value blank on days it has no figure for.
            let Some(value) = record.get(1).and_then(parse_decimal_comma) else {
                tracing::debug!(code, %date, "skipping blank value");
                continue;
            };
            points.push(ValuePoint { date, value });
        }

        points.sort_by_key(|p| p.date);
        tracing::debug!(code, rows = points.len(), "loaded rate series");
        RateSeries::new(code.to_string(), points)
    }
}
