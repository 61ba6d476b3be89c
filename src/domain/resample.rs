//! Daily to monthly OHLCV aggregation.
//!
//! A monthly bar takes the first open, the highest high, the lowest low, the
//! last close and the summed volume of its trading days, and is dated with
//! the last trading day of the month. A day with missing volume leaves the
//! month's volume missing. Only months with data produce bars.
//!
//! The first and last months of the input are dropped when the input does
//! not reach their edges: a series starting after day `EDGE_TOLERANCE_DAYS`
//! of its first month, or ending more than `EDGE_TOLERANCE_DAYS` before the
//! end of its last month, covers only part of that month.

use crate::domain::error::PlotosError;
use crate::domain::ohlcv::PricePoint;
use crate::domain::price_series::PriceSeries;
use chrono::{Datelike, NaiveDate};

/// Calendar-day slack at a month edge for weekends and holidays.
pub const EDGE_TOLERANCE_DAYS: u32 = 7;

pub fn resample_monthly(series: &PriceSeries) -> Result<PriceSeries, PlotosError> {
    let mut groups: Vec<&[PricePoint]> = Vec::new();
    let points = series.points();
    let mut start = 0;
    for i in 1..=points.len() {
        if i == points.len() || month_key(points[i].date) != month_key(points[start].date) {
            groups.push(&points[start..i]);
            start = i;
        }
    }

    let last_group = groups.len() - 1;
    let bars: Vec<PricePoint> = groups
        .iter()
        .enumerate()
        .filter(|&(i, group)| {
            let leading_ok = i != 0 || starts_month(group[0].date);
            let trailing_ok = i != last_group || ends_month(group[group.len() - 1].date);
            leading_ok && trailing_ok
        })
        .map(|(_, group)| aggregate(group))
        .collect();

    tracing::debug!(
        symbol = series.symbol(),
        daily = series.len(),
        monthly = bars.len(),
        "resampled to monthly bars"
    );

    PriceSeries::new(series.symbol(), bars)
}

fn month_key(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}

fn starts_month(date: NaiveDate) -> bool {
    date.day() <= EDGE_TOLERANCE_DAYS
}

fn ends_month(date: NaiveDate) -> bool {
    days_in_month(date.year(), date.month()) - date.day() < EDGE_TOLERANCE_DAYS
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map_or(31, |d| d.day())
}

/// `group` is non-empty and in date order.
fn aggregate(group: &[PricePoint]) -> PricePoint {
    let first = &group[0];
    let last = &group[group.len() - 1];
    PricePoint {
        date: last.date,
        open: first.open,
        high: extreme(group.iter().map(|p| p.high), f64::max),
        low: extreme(group.iter().map(|p| p.low), f64::min),
        close: last.close,
        volume: group.iter().map(|p| p.volume).sum::<Option<i64>>(),
    }
}

/// Fold with `pick`, but any missing or non-finite input makes the result
/// missing (`f64::max`/`f64::min` would otherwise skip NaN).
fn extreme(values: impl Iterator<Item = f64>, pick: fn(f64, f64) -> f64) -> f64 {
    let mut acc: Option<f64> = None;
    for v in values {
        if !v.is_finite() {
            return f64::NAN;
        }
        acc = Some(acc.map_or(v, |a| pick(a, v)));
    }
    acc.unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Weekday bars from `start` to `end` inclusive with a rising close.
    fn weekday_series(start: NaiveDate, end: NaiveDate) -> PriceSeries {
        let mut points = Vec::new();
        let mut d = start;
        let mut i = 0.0;
        while d <= end {
            if !matches!(d.weekday(), Weekday::Sat | Weekday::Sun) {
                points.push(PricePoint {
                    date: d,
                    open: 100.0 + i,
                    high: 101.0 + i,
                    low: 99.0 + i,
                    close: 100.5 + i,
                    volume: Some(10),
                });
                i += 1.0;
            }
            d = d.succ_opt().unwrap();
        }
        PriceSeries::new("TEST", points).unwrap()
    }

    #[test]
    fn three_full_months_give_three_bars() {
        let daily = weekday_series(date(2024, 1, 1), date(2024, 3, 31));
        let monthly = resample_monthly(&daily).unwrap();
        assert_eq!(monthly.len(), 3);

        for bar in monthly.points() {
            let in_month: Vec<&PricePoint> = daily
                .points()
                .iter()
                .filter(|p| p.date.month() == bar.date.month())
                .collect();
            let first = in_month[0];
            let last = in_month[in_month.len() - 1];
            assert_eq!(bar.open, first.open);
            assert_eq!(bar.close, last.close);
            assert_eq!(bar.date, last.date);
            assert_eq!(bar.high, last.high);
            assert_eq!(bar.low, first.low);
            assert_eq!(bar.volume, Some(10 * in_month.len() as i64));
        }
    }

    #[test]
    fn chronological_order() {
        let daily = weekday_series(date(2023, 11, 1), date(2024, 2, 29));
        let monthly = resample_monthly(&daily).unwrap();
        let months: Vec<(i32, u32)> = monthly.dates().iter().map(|d| month_key(*d)).collect();
        assert_eq!(months, vec![(2023, 11), (2023, 12), (2024, 1), (2024, 2)]);
    }

    #[test]
    fn partial_edge_months_dropped() {
        let daily = weekday_series(date(2024, 1, 15), date(2024, 4, 10));
        let monthly = resample_monthly(&daily).unwrap();
        let months: Vec<u32> = monthly.dates().iter().map(|d| d.month()).collect();
        assert_eq!(months, vec![2, 3]);
    }

    #[test]
    fn gap_month_produces_no_bar() {
        let mut points = weekday_series(date(2024, 1, 1), date(2024, 1, 31))
            .points()
            .to_vec();
        points.extend(weekday_series(date(2024, 3, 1), date(2024, 3, 31)).points().to_vec());
        let daily = PriceSeries::from_unsorted("TEST", points).unwrap();
        let monthly = resample_monthly(&daily).unwrap();
        let months: Vec<u32> = monthly.dates().iter().map(|d| d.month()).collect();
        assert_eq!(months, vec![1, 3]);
    }

    #[test]
    fn only_partial_month_is_error() {
        let daily = weekday_series(date(2024, 1, 10), date(2024, 1, 19));
        let err = resample_monthly(&daily).unwrap_err();
        assert!(matches!(err, PlotosError::EmptySeries { .. }));
    }

    #[test]
    fn missing_high_propagates() {
        let mut points = weekday_series(date(2024, 1, 1), date(2024, 1, 31))
            .points()
            .to_vec();
        points[3].high = f64::NAN;
        let daily = PriceSeries::new("TEST", points).unwrap();
        let monthly = resample_monthly(&daily).unwrap();
        assert!(monthly.first().high.is_nan());
        assert!(monthly.first().low.is_finite());
    }

    #[test]
    fn infinite_high_is_not_the_monthly_high() {
        let mut points = weekday_series(date(2024, 1, 1), date(2024, 1, 31))
            .points()
            .to_vec();
        points[2].high = f64::INFINITY;
        let daily = PriceSeries::new("TEST", points).unwrap();
        let monthly = resample_monthly(&daily).unwrap();
        assert!(monthly.first().high.is_nan());
    }

    #[test]
    fn missing_volume_leaves_month_volume_missing() {
        let mut points = weekday_series(date(2024, 1, 1), date(2024, 2, 29))
            .points()
            .to_vec();
        points[5].volume = None;
        let daily = PriceSeries::new("TEST", points).unwrap();
        let monthly = resample_monthly(&daily).unwrap();
        assert_eq!(monthly.points()[0].volume, None);
        assert_eq!(monthly.points()[0].close, daily.points()[22].close);
        assert!(monthly.points()[1].volume.is_some());
    }

    #[test]
    fn days_in_month_handles_leap_and_december() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2023, 12), 31);
        assert_eq!(days_in_month(2024, 4), 30);
    }
}
