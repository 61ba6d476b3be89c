//! Trend classification from the latest close against a short and a long
//! simple moving average.

use crate::domain::indicator::calculate_sma;
use crate::domain::price_series::PriceSeries;
use std::fmt;

pub const DEFAULT_SHORT_WINDOW: usize = 50;
pub const DEFAULT_LONG_WINDOW: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrendLabel {
    Uptrend,
    Downtrend,
    EmergingUptrend,
    EmergingDowntrend,
    Consolidation,
    InsufficientData,
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TrendLabel::Uptrend => "uptrend",
            TrendLabel::Downtrend => "downtrend",
            TrendLabel::EmergingUptrend => "emerging-uptrend",
            TrendLabel::EmergingDowntrend => "emerging-downtrend",
            TrendLabel::Consolidation => "consolidation",
            TrendLabel::InsufficientData => "insufficient-data",
        };
        f.write_str(s)
    }
}

/// Classify a close against the two averages.
///
/// Both averages missing, or a missing close, is `InsufficientData`. A close
/// equal to an average, or a single available average, falls through to
/// `Consolidation`.
pub fn classify(close: Option<f64>, short_ma: Option<f64>, long_ma: Option<f64>) -> TrendLabel {
    let Some(close) = close else {
        return TrendLabel::InsufficientData;
    };
    match (short_ma, long_ma) {
        (None, None) => TrendLabel::InsufficientData,
        (Some(short), Some(long)) if close > short && close > long => TrendLabel::Uptrend,
        (Some(short), Some(long)) if close < short && close < long => TrendLabel::Downtrend,
        (Some(short), Some(long)) if close > short && close < long => TrendLabel::EmergingUptrend,
        (Some(short), Some(long)) if close < short && close > long => {
            TrendLabel::EmergingDowntrend
        }
        _ => TrendLabel::Consolidation,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendAssessment {
    pub label: TrendLabel,
    pub close: Option<f64>,
    pub short_window: usize,
    pub long_window: usize,
    pub short_ma: Option<f64>,
    pub long_ma: Option<f64>,
}

impl TrendAssessment {
    /// Human-readable sentence for the dashboard.
    pub fn explanation(&self) -> String {
        let short = format!("{}-day average", self.short_window);
        let long = format!("{}-day average", self.long_window);
        let fmt_ma = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v));
        let close = fmt_ma(self.close);
        let levels = format!(
            "(close {}, {} {}, {} {})",
            close,
            short,
            fmt_ma(self.short_ma),
            long,
            fmt_ma(self.long_ma)
        );

        match self.label {
            TrendLabel::Uptrend => {
                format!("Uptrend: price is above both the {} and the {} {}", short, long, levels)
            }
            TrendLabel::Downtrend => {
                format!("Downtrend: price is below both the {} and the {} {}", short, long, levels)
            }
            TrendLabel::EmergingUptrend => format!(
                "Emerging uptrend: price has crossed above the {} but is still below the {} {}",
                short, long, levels
            ),
            TrendLabel::EmergingDowntrend => format!(
                "Emerging downtrend: price has fallen below the {} but is still above the {} {}",
                short, long, levels
            ),
            TrendLabel::Consolidation => format!(
                "Consolidation: price shows no clear direction relative to its averages {}",
                levels
            ),
            TrendLabel::InsufficientData => format!(
                "Insufficient data: not enough history to compute the {} or the {} {}",
                short, long, levels
            ),
        }
    }
}

/// Assess the trend at the last point of `series`.
pub fn assess_trend(
    series: &PriceSeries,
    short_window: usize,
    long_window: usize,
) -> TrendAssessment {
    let close = series.last().close_value();
    let short_ma = calculate_sma(series, short_window).latest_simple();
    let long_ma = calculate_sma(series, long_window).latest_simple();

    TrendAssessment {
        label: classify(close, short_ma, long_ma),
        close,
        short_window,
        long_window,
        short_ma,
        long_ma,
    }
}
