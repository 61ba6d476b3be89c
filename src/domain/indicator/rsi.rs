//! RSI (Relative Strength Index) indicator implementation.
//!
//! Uses a trailing simple mean of gains and losses over the last n changes
//! (not Wilder's recursive smoothing), so each value depends only on the
//! n+1 closes ending at that point.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100 (this includes a flat window)
//!
//! Warmup: first n points are missing (need n price changes).

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{mean, to_options, trailing_window};
use crate::domain::price_series::PriceSeries;

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(series: &PriceSeries, period: usize) -> IndicatorSeries {
    let closes = to_options(&series.closes());

    // changes[i] is the move into point i; the first point has none.
    let changes: Vec<Option<f64>> = (0..closes.len())
        .map(|i| {
            if i == 0 {
                return None;
            }
            Some(closes[i]? - closes[i - 1]?)
        })
        .collect();

    let raw = (0..closes.len())
        .map(|i| trailing_window(&changes, i, period).map(|w| rsi_from_changes(&w)))
        .collect();

    IndicatorSeries::from_simple(IndicatorType::Rsi(period), &series.dates(), raw)
}

fn rsi_from_changes(changes: &[f64]) -> f64 {
    let gains: Vec<f64> = changes.iter().map(|&c| if c > 0.0 { c } else { 0.0 }).collect();
    let losses: Vec<f64> = changes.iter().map(|&c| if c < 0.0 { -c } else { 0.0 }).collect();

    let avg_gain = mean(&gains);
    let avg_loss = mean(&losses);

    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
