//! Dated value series: benchmark rates, equity indices and dividend
//! payments.
//!
//! Rates come from the central bank's statistics service as plain
//! (date, value) pairs and are shown next to the price chart without any
//! indicator math.

use crate::domain::error::PlotosError;
use chrono::NaiveDate;

/// Display name of a central bank statistics series code.
pub fn series_label(code: u32) -> String {
    let known = match code {
        1 => "USD/BRL",
        7 => "Ibovespa",
        11 => "SELIC",
        12 => "CDI",
        189 => "IGP-M",
        432 => "SELIC target",
        433 => "IPCA",
        _ => return format!("SGS {}", code),
    };
    known.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuePoint {
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RateSeries {
    name: String,
    points: Vec<ValuePoint>,
}

impl RateSeries {
    /// Points must be strictly ascending by date. An empty series is allowed:
    /// the statistics service returns nothing for ranges before a series
    /// starts.
    pub fn new(name: impl Into<String>, points: Vec<ValuePoint>) -> Result<Self, PlotosError> {
        let name = name.into();
        for (i, pair) in points.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(PlotosError::NonChronological {
                    symbol: name,
                    index: i + 1,
                    previous: pair[0].date,
                    date: pair[1].date,
                });
            }
        }
        Ok(Self { name, points })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[ValuePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<ValuePoint> {
        self.points.last().copied()
    }

    /// Last published value at or before `date`. Rates are published on
    /// their own calendar, so a trading day may fall between two releases.
    pub fn value_on_or_before(&self, date: NaiveDate) -> Option<f64> {
        let idx = self.points.partition_point(|p| p.date <= date);
        if idx == 0 {
            None
        } else {
            Some(self.points[idx - 1].value)
        }
    }

    /// One value per entry in `dates`, for charting against a price index.
    pub fn align_to(&self, dates: &[NaiveDate]) -> Vec<Option<f64>> {
        dates.iter().map(|&d| self.value_on_or_before(d)).collect()
    }
}
