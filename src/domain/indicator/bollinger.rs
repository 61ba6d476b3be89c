//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (width × StdDev)
//! - Lower: Middle - (width × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//!
//! Default parameters: period=20, width=2.0 (passed as width_x100=200 so the
//! type stays hashable).
//! Warmup: first (period-1) points are missing.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::{mean, population_stddev, to_options, trailing_window};
use crate::domain::price_series::PriceSeries;

pub const DEFAULT_PERIOD: usize = 20;
pub const DEFAULT_WIDTH_X100: u32 = 200;

pub fn calculate_bollinger(series: &PriceSeries, period: usize, width_x100: u32) -> IndicatorSeries {
    let closes = to_options(&series.closes());
    let width = width_x100 as f64 / 100.0;

    let values = series
        .points()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let value = trailing_window(&closes, i, period).map(|window| {
                let middle = mean(&window);
                let band = width * population_stddev(&window);
                IndicatorValue::Bollinger {
                    upper: middle + band,
                    middle,
                    lower: middle - band,
                }
            });
            IndicatorPoint {
                date: p.date,
                value,
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger { period, width_x100 },
        values,
    }
}
