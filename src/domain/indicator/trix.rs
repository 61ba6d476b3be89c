//! TRIX (triple-smoothed rate of change) indicator.
//!
//! T = EMA(EMA(EMA(C, n), n), n)
//! TRIX(n)[i] = ((T[i] - T[i-1]) / T[i-1]) * 100
//! If T[i-1] == 0: missing
//! Warmup: first point is missing (no previous value to compare against).

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{ema_values, to_options};
use crate::domain::price_series::PriceSeries;

pub const DEFAULT_SPAN: usize = 15;

pub fn calculate_trix(series: &PriceSeries, span: usize) -> IndicatorSeries {
    let closes = to_options(&series.closes());
    let triple = ema_values(&ema_values(&ema_values(&closes, span), span), span);

    let raw = (0..triple.len())
        .map(|i| {
            if i == 0 {
                return None;
            }
            let prev = triple[i - 1]?;
            let curr = triple[i]?;
            if prev == 0.0 {
                None
            } else {
                Some((curr - prev) / prev * 100.0)
            }
        })
        .collect();

    IndicatorSeries::from_simple(IndicatorType::Trix(span), &series.dates(), raw)
}
