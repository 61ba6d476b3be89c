//! Validated, chronologically ordered price series.

use crate::domain::error::PlotosError;
use crate::domain::ohlcv::PricePoint;
use chrono::NaiveDate;

/// Daily price history for one instrument.
///
/// Guaranteed non-empty and strictly ascending by date. There is no way to
/// mutate the points after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Wrap points that are expected to be in order already.
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, PlotosError> {
        let symbol = symbol.into();
        if points.is_empty() {
            return Err(PlotosError::EmptySeries { symbol });
        }

        for (i, pair) in points.windows(2).enumerate() {
            if pair[1].date <= pair[0].date {
                return Err(PlotosError::NonChronological {
                    symbol,
                    index: i + 1,
                    previous: pair[0].date,
                    date: pair[1].date,
                });
            }
        }

        Ok(Self { symbol, points })
    }

    /// Sort the points by date first. Duplicate dates cannot be ordered and
    /// are rejected.
    pub fn from_unsorted(
        symbol: impl Into<String>,
        mut points: Vec<PricePoint>,
    ) -> Result<Self, PlotosError> {
        let symbol = symbol.into();
        points.sort_by_key(|p| p.date);
        if let Some(pair) = points.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(PlotosError::DuplicateDate {
                symbol,
                date: pair[0].date,
            });
        }
        Self::new(symbol, points)
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for the `len`/`is_empty` pairing.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> &PricePoint {
        &self.points[0]
    }

    pub fn last(&self) -> &PricePoint {
        &self.points[self.points.len() - 1]
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.low).collect()
    }

    /// (first date, last date, number of points)
    pub fn date_range(&self) -> (NaiveDate, NaiveDate, usize) {
        (self.first().date, self.last().date, self.len())
    }

    /// Sub-series restricted to `[start, end]`, or `None` if nothing falls in
    /// the range.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Option<PriceSeries> {
        let points: Vec<PricePoint> = self
            .points
            .iter()
            .filter(|p| p.date >= start && p.date <= end)
            .cloned()
            .collect();
        if points.is_empty() {
            None
        } else {
            Some(Self {
                symbol: self.symbol.clone(),
                points,
            })
        }
    }
}
