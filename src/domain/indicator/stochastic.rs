//! Stochastic Oscillator indicator.
//!
//! %K = 100 × (C[i] - LL(n)) / (HH(n) - LL(n))
//! %D = SMA(m) of %K
//!
//! where HH/LL are the highest high and lowest low over the last n points.
//! A zero range (HH == LL) leaves %K missing instead of dividing by zero, and
//! any missing %K inside the smoothing window leaves %D missing.
//!
//! Default parameters: k_period=14, d_period=3
//! Warmup: %K from index k_period-1, %D from index k_period+d_period-2.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::{rolling_mean, to_options, trailing_window};
use crate::domain::price_series::PriceSeries;

pub const DEFAULT_K_PERIOD: usize = 14;
pub const DEFAULT_D_PERIOD: usize = 3;

pub fn calculate_stochastic(
    series: &PriceSeries,
    k_period: usize,
    d_period: usize,
) -> IndicatorSeries {
    let highs = to_options(&series.highs());
    let lows = to_options(&series.lows());
    let closes = to_options(&series.closes());

    let k_line: Vec<Option<f64>> = (0..series.len())
        .map(|i| {
            let close = closes[i]?;
            let hh = trailing_window(&highs, i, k_period)?
                .into_iter()
                .fold(f64::NEG_INFINITY, f64::max);
            let ll = trailing_window(&lows, i, k_period)?
                .into_iter()
                .fold(f64::INFINITY, f64::min);
            let range = hh - ll;
            if range == 0.0 {
                return None;
            }
            Some(100.0 * (close - ll) / range)
        })
        .collect();

    let d_line = rolling_mean(&k_line, d_period);

    let values = series
        .points()
        .iter()
        .zip(k_line.iter().zip(d_line))
        .map(|(p, (k, d))| IndicatorPoint {
            date: p.date,
            value: k.map(|k| IndicatorValue::Stochastic { k, d }),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Stochastic { k_period, d_period },
        values,
    }
}
