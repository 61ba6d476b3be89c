//! Market data access port trait.

use crate::domain::error::PlotosError;
use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily prices for `symbol` within `[start_date, end_date]`.
    /// An instrument with no rows in the range is `NoData`.
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, PlotosError>;

    fn list_symbols(&self) -> Result<Vec<String>, PlotosError>;

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, PlotosError>;
}
