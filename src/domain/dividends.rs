//! Dividend history summaries.
//!
//! Payments are kept as a [`RateSeries`] of cash per share keyed by payment
//! date; this module only rolls them up for the yearly bar chart.

use crate::domain::rate_series::RateSeries;
use chrono::Datelike;

#[derive(Debug, Clone, PartialEq)]
pub struct YearTotal {
    pub year: i32,
    pub total: f64,
    pub payments: usize,
}

/// Sum of payments per calendar year, oldest first. Years without a payment
/// are not listed.
pub fn yearly_totals(dividends: &RateSeries) -> Vec<YearTotal> {
    let mut totals: Vec<YearTotal> = Vec::new();
    for point in dividends.points() {
        let year = point.date.year();
        match totals.last_mut() {
            Some(last) if last.year == year => {
                last.total += point.value;
                last.payments += 1;
            }
            _ => totals.push(YearTotal {
                year,
                total: point.value,
                payments: 1,
            }),
        }
    }
    totals
}
