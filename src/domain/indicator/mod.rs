//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorValue`: Enum for different indicator output shapes
//! - `IndicatorType`: Enum for indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: A time series of indicator values
//!
//! Every series has one point per input price point, with the same dates in
//! the same order. A point whose lookback window is not fully populated, or
//! whose inputs are missing, carries `value: None`.

pub mod bollinger;
pub mod ema;
pub mod rsi;
pub mod sma;
pub mod stddev;
pub mod stochastic;
pub mod trix;
pub mod volatility;

pub use bollinger::calculate_bollinger;
pub use ema::calculate_ema;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use stddev::calculate_stddev;
pub use stochastic::calculate_stochastic;
pub use trix::calculate_trix;
pub use volatility::calculate_volatility;

use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: Option<IndicatorValue>,
}

impl IndicatorPoint {
    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }

    pub fn simple(&self) -> Option<f64> {
        match self.value {
            Some(IndicatorValue::Simple(v)) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    /// `d` stays `None` until `d_period` consecutive %K values exist.
    Stochastic {
        k: f64,
        d: Option<f64>,
    },
    Bollinger {
        upper: f64,
        middle: f64,
        lower: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Stddev(usize),
    Trix(usize),
    Volatility(usize),
    Stochastic {
        k_period: usize,
        d_period: usize,
    },
    Bollinger {
        period: usize,
        width_x100: u32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Build a series from raw per-point values aligned with `dates`.
    pub(crate) fn from_simple(
        indicator_type: IndicatorType,
        dates: &[NaiveDate],
        raw: Vec<Option<f64>>,
    ) -> Self {
        let values = dates
            .iter()
            .zip(raw)
            .map(|(&date, v)| IndicatorPoint {
                date,
                value: v.map(IndicatorValue::Simple),
            })
            .collect();
        Self {
            indicator_type,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&IndicatorValue> {
        self.values
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .and_then(|i| self.values[i].value.as_ref())
    }

    /// Value at the final point, if defined there.
    pub fn latest(&self) -> Option<&IndicatorValue> {
        self.values.last().and_then(|p| p.value.as_ref())
    }

    pub fn latest_simple(&self) -> Option<f64> {
        self.values.last().and_then(IndicatorPoint::simple)
    }

    pub fn simple_values(&self) -> Vec<Option<f64>> {
        self.values.iter().map(IndicatorPoint::simple).collect()
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|p| p.is_valid()).count()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(span) => write!(f, "EMA({})", span),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Stddev(period) => write!(f, "STDDEV({})", period),
            IndicatorType::Trix(span) => write!(f, "TRIX({})", span),
            IndicatorType::Volatility(window) => write!(f, "VOLATILITY({})", window),
            IndicatorType::Stochastic { k_period, d_period } => {
                write!(f, "STOCHASTIC({},{})", k_period, d_period)
            }
            IndicatorType::Bollinger { period, width_x100 } => {
                let width = *width_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, width)
            }
        }
    }
}

/// Compute one series for `indicator_type`.
pub fn compute(series: &PriceSeries, indicator_type: IndicatorType) -> IndicatorSeries {
    match indicator_type {
        IndicatorType::Sma(n) => calculate_sma(series, n),
        IndicatorType::Ema(n) => calculate_ema(series, n),
        IndicatorType::Rsi(n) => calculate_rsi(series, n),
        IndicatorType::Stddev(n) => calculate_stddev(series, n),
        IndicatorType::Trix(n) => calculate_trix(series, n),
        IndicatorType::Volatility(n) => calculate_volatility(series, n),
        IndicatorType::Stochastic { k_period, d_period } => {
            calculate_stochastic(series, k_period, d_period)
        }
        IndicatorType::Bollinger { period, width_x100 } => {
            calculate_bollinger(series, period, width_x100)
        }
    }
}

/// Compute every requested indicator, keyed by its type. Repeated requests
/// are computed once.
pub fn compute_indicators(
    series: &PriceSeries,
    types: &[IndicatorType],
) -> HashMap<IndicatorType, IndicatorSeries> {
    let mut out = HashMap::with_capacity(types.len());
    for &t in types {
        out.entry(t).or_insert_with(|| compute(series, t));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::PricePoint;

    fn make_series(prices: &[f64]) -> PriceSeries {
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: Some(1000),
            })
            .collect();
        PriceSeries::new("TEST", points).unwrap()
    }

    #[test]
    fn indicator_type_display_sma() {
        assert_eq!(IndicatorType::Sma(20).to_string(), "SMA(20)");
    }

    #[test]
    fn indicator_type_display_stochastic() {
        let stoch = IndicatorType::Stochastic {
            k_period: 14,
            d_period: 3,
        };
        assert_eq!(stoch.to_string(), "STOCHASTIC(14,3)");
    }

    #[test]
    fn indicator_type_display_bollinger() {
        let boll = IndicatorType::Bollinger {
            period: 20,
            width_x100: 250,
        };
        assert_eq!(boll.to_string(), "BOLLINGER(20,2.5)");
    }

    #[test]
    fn compute_indicators_dedups_and_aligns() {
        let series = make_series(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let types = [
            IndicatorType::Sma(3),
            IndicatorType::Ema(3),
            IndicatorType::Sma(3),
        ];
        let map = compute_indicators(&series, &types);

        assert_eq!(map.len(), 2);
        for s in map.values() {
            assert_eq!(s.len(), series.len());
        }
        assert_eq!(map[&IndicatorType::Sma(3)].latest_simple(), Some(13.0));
    }

    #[test]
    fn get_by_date() {
        let series = make_series(&[10.0, 11.0, 12.0]);
        let sma = calculate_sma(&series, 2);

        let d1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let d3 = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let d9 = NaiveDate::from_ymd_opt(2024, 1, 9).unwrap();
        assert_eq!(sma.get(d1), None);
        assert_eq!(sma.get(d3), Some(&IndicatorValue::Simple(11.5)));
        assert_eq!(sma.get(d9), None);
        assert_eq!(sma.defined_count(), 2);
    }
}
