#![allow(dead_code)]

use chrono::{Datelike, NaiveDate, Weekday};
use plotos::domain::error::PlotosError;
use plotos::domain::ohlcv::PricePoint;
use plotos::domain::price_series::PriceSeries;
use plotos::domain::rate_series::{RateSeries, ValuePoint};
use plotos::ports::data_port::DataPort;
use plotos::ports::dividend_port::DividendPort;
use plotos::ports::rate_port::RatePort;
use std::cell::Cell;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PricePoint>>,
    pub errors: HashMap<String, String>,
    pub fetches: Cell<usize>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            fetches: Cell::new(0),
        }
    }

    pub fn with_points(mut self, symbol: &str, points: Vec<PricePoint>) -> Self {
        self.data.insert(symbol.to_string(), points);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, PlotosError> {
        self.fetches.set(self.fetches.get() + 1);
        if let Some(reason) = self.errors.get(symbol) {
            return Err(PlotosError::Data {
                reason: reason.clone(),
            });
        }
        let points: Vec<PricePoint> = self
            .data
            .get(symbol)
            .map(|pts| {
                pts.iter()
                    .filter(|p| p.date >= start_date && p.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if points.is_empty() {
            return Err(PlotosError::NoData {
                symbol: symbol.to_string(),
            });
        }
        PriceSeries::from_unsorted(symbol, points)
    }

    fn list_symbols(&self) -> Result<Vec<String>, PlotosError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, PlotosError> {
        match self.data.get(symbol) {
            Some(points) if !points.is_empty() => {
                let min = points.iter().map(|p| p.date).min().unwrap();
                let max = points.iter().map(|p| p.date).max().unwrap();
                Ok(Some((min, max, points.len())))
            }
            _ => Ok(None),
        }
    }
}

pub struct MockRatePort {
    pub series: HashMap<u32, Vec<ValuePoint>>,
}

impl MockRatePort {
    pub fn new() -> Self {
        Self {
            series: HashMap::new(),
        }
    }

    pub fn with_series(mut self, code: u32, points: Vec<(&str, f64)>) -> Self {
        let points = points
            .into_iter()
            .map(|(d, value)| ValuePoint {
                date: date(d),
                value,
            })
            .collect();
        self.series.insert(code, points);
        self
    }
}

impl RatePort for MockRatePort {
    fn fetch_rate_series(
        &self,
        code: u32,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<RateSeries, PlotosError> {
        let points = self.series.get(&code).ok_or_else(|| PlotosError::Data {
            reason: format!("unknown series {}", code),
        })?;
        let in_range = points
            .iter()
            .filter(|p| p.date >= start_date && p.date <= end_date)
            .copied()
            .collect();
        RateSeries::new(code.to_string(), in_range)
    }
}

pub struct MockDividendPort {
    pub payments: HashMap<String, Vec<ValuePoint>>,
}

impl MockDividendPort {
    pub fn new() -> Self {
        Self {
            payments: HashMap::new(),
        }
    }

    pub fn with_payments(mut self, symbol: &str, payments: Vec<(&str, f64)>) -> Self {
        let points = payments
            .into_iter()
            .map(|(d, value)| ValuePoint {
                date: date(d),
                value,
            })
            .collect();
        self.payments.insert(symbol.to_string(), points);
        self
    }
}

impl DividendPort for MockDividendPort {
    fn fetch_dividends(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<RateSeries, PlotosError> {
        let points = self.payments.get(symbol).ok_or_else(|| PlotosError::NoData {
            symbol: symbol.to_string(),
        })?;
        let in_range = points
            .iter()
            .filter(|p| p.date >= start_date && p.date <= end_date)
            .copied()
            .collect();
        RateSeries::new(symbol, in_range)
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn make_point(date_str: &str, close: f64) -> PricePoint {
    PricePoint {
        date: date(date_str),
        open: close - 0.5,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: Some(1000),
    }
}

/// Weekday bars over `[start, end]` with closes produced by `close_at(i)`.
pub fn weekday_points(start: &str, end: &str, close_at: impl Fn(usize) -> f64) -> Vec<PricePoint> {
    let end = date(end);
    let mut d = date(start);
    let mut points = Vec::new();
    while d <= end {
        if !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) {
            let close = close_at(points.len());
            points.push(PricePoint {
                date: d,
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: Some(1000),
            });
        }
        d = d.succ_opt().unwrap();
    }
    points
}
