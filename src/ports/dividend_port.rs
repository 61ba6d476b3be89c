//! Dividend history port trait.

use crate::domain::error::PlotosError;
use crate::domain::rate_series::RateSeries;
use chrono::NaiveDate;

pub trait DividendPort {
    /// Cash dividends per share paid by `symbol` within
    /// `[start_date, end_date]`, one point per payment date. An instrument
    /// that paid nothing in the range gives an empty series.
    fn fetch_dividends(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<RateSeries, PlotosError>;
}
