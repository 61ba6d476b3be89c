//! Port for the central bank's statistics series (benchmark rate, equity
//! indices).

use crate::domain::error::PlotosError;
use crate::domain::rate_series::RateSeries;
use chrono::NaiveDate;

pub trait RatePort {
    /// Series identified by its numeric code at the statistics service
    /// (e.g. 432 for the SELIC target rate).
    fn fetch_rate_series(
        &self,
        code: u32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<RateSeries, PlotosError>;
}
