//! Standard Deviation indicator.
//!
//! Population standard deviation over n closing prices.
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n-1) / n)
//! Warmup: first (n-1) points are missing.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{rolling_stddev, to_options};
use crate::domain::price_series::PriceSeries;

pub fn calculate_stddev(series: &PriceSeries, period: usize) -> IndicatorSeries {
    let closes = to_options(&series.closes());
    IndicatorSeries::from_simple(
        IndicatorType::Stddev(period),
        &series.dates(),
        rolling_stddev(&closes, period),
    )
}
