//! Realized volatility indicator.
//!
//! r[i] = ln(C[i] / C[i-1])
//! VOL(n)[i] = population_stddev(r[i-n+1..=i]) * sqrt(252)
//!
//! Non-positive closes give a missing return. Warmup: first n points are
//! missing (need n returns).

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{rolling_stddev, to_options};
use crate::domain::price_series::PriceSeries;

pub const DEFAULT_WINDOW: usize = 21;
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

pub fn calculate_volatility(series: &PriceSeries, window: usize) -> IndicatorSeries {
    let closes = to_options(&series.closes());

    let returns: Vec<Option<f64>> = (0..closes.len())
        .map(|i| {
            if i == 0 {
                return None;
            }
            let prev = closes[i - 1]?;
            let curr = closes[i]?;
            if prev <= 0.0 || curr <= 0.0 {
                None
            } else {
                Some((curr / prev).ln())
            }
        })
        .collect();

    let annualizer = TRADING_DAYS_PER_YEAR.sqrt();
    let raw = rolling_stddev(&returns, window)
        .into_iter()
        .map(|sd| sd.map(|s| s * annualizer))
        .collect();

    IndicatorSeries::from_simple(IndicatorType::Volatility(window), &series.dates(), raw)
}
