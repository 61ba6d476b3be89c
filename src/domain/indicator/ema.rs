//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seed with the first close, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! No warmup gap: defined from the first point, biased toward the seed early on.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{ema_values, to_options};
use crate::domain::price_series::PriceSeries;

pub fn calculate_ema(series: &PriceSeries, span: usize) -> IndicatorSeries {
    let closes = to_options(&series.closes());
    IndicatorSeries::from_simple(
        IndicatorType::Ema(span),
        &series.dates(),
        ema_values(&closes, span),
    )
}
