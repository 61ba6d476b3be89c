//! Daily OHLCV price point.

use chrono::NaiveDate;

/// One trading day for one instrument. A NaN price field, or a `None`
/// volume, means the upstream provider had no value for it.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<i64>,
}

impl PricePoint {
    /// Close as an optional value: `None` when the close is missing.
    pub fn close_value(&self) -> Option<f64> {
        finite(self.close)
    }

    /// True when all four price fields carry a value.
    pub fn is_complete(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|v| v.is_finite())
    }
}

/// `Some(v)` for finite values, `None` for NaN and infinities.
pub fn finite(v: f64) -> Option<f64> {
    if v.is_finite() { Some(v) } else { None }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_point() -> PricePoint {
        PricePoint {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            open: 36.1,
            high: 37.0,
            low: 35.8,
            close: 36.5,
            volume: Some(41_000_000),
        }
    }

    #[test]
    fn complete_point() {
        let p = sample_point();
        assert!(p.is_complete());
        assert_eq!(p.close_value(), Some(36.5));
    }

    #[test]
    fn missing_close_is_none_not_zero() {
        let p = PricePoint {
            close: f64::NAN,
            ..sample_point()
        };
        assert!(!p.is_complete());
        assert_eq!(p.close_value(), None);
    }

    #[test]
    fn missing_volume_does_not_affect_prices() {
        let p = PricePoint {
            volume: None,
            ..sample_point()
        };
        assert!(p.is_complete());
    }

    #[test]
    fn finite_rejects_infinity() {
        assert_eq!(finite(f64::INFINITY), None);
        assert_eq!(finite(0.0), Some(0.0));
    }
}
