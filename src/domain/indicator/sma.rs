//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i])
//! Warmup: first (n-1) points are missing.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{rolling_mean, to_options};
use crate::domain::price_series::PriceSeries;

pub fn calculate_sma(series: &PriceSeries, period: usize) -> IndicatorSeries {
    let closes = to_options(&series.closes());
    IndicatorSeries::from_simple(
        IndicatorType::Sma(period),
        &series.dates(),
        rolling_mean(&closes, period),
    )
}
