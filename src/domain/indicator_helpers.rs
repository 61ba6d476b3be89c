//! Shared helper functions for indicator calculations.
//!
//! All helpers work on `Option<f64>` slices where `None` is a missing input.
//! A trailing window containing any missing value produces a missing output.

use crate::domain::ohlcv::finite;

/// Map raw prices to optional values, NaN and infinities becoming `None`.
pub fn to_options(values: &[f64]) -> Vec<Option<f64>> {
    values.iter().map(|&v| finite(v)).collect()
}

/// The `window` values ending at `end` (inclusive), or `None` if the window
/// is not fully populated.
pub fn trailing_window(values: &[Option<f64>], end: usize, window: usize) -> Option<Vec<f64>> {
    if window == 0 || end >= values.len() || end + 1 < window {
        return None;
    }
    values[end + 1 - window..=end].iter().copied().collect()
}

pub fn mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

/// Population standard deviation (divides by N, not N-1).
pub fn population_stddev(window: &[f64]) -> f64 {
    let m = mean(window);
    let variance = window
        .iter()
        .map(|v| {
            let diff = v - m;
            diff * diff
        })
        .sum::<f64>()
        / window.len() as f64;
    variance.sqrt()
}

pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| trailing_window(values, i, window).map(|w| mean(&w)))
        .collect()
}

pub fn rolling_stddev(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| trailing_window(values, i, window).map(|w| population_stddev(&w)))
        .collect()
}

/// Exponential moving average with α = 2/(span+1), seeded from the first
/// defined value.
///
/// A missing input yields a missing output; the recursion resumes from the
/// last defined average at the next defined input.
pub fn ema_values(values: &[Option<f64>], span: usize) -> Vec<Option<f64>> {
    if span == 0 {
        return vec![None; values.len()];
    }

    let k = 2.0 / (span as f64 + 1.0);
    let mut prev: Option<f64> = None;

    values
        .iter()
        .map(|v| {
            let x = (*v)?;
            let ema = match prev {
                None => x,
                Some(p) => x * k + p * (1.0 - k),
            };
            prev = Some(ema);
            Some(ema)
        })
        .collect()
}
