//! Configuration validation.
//!
//! Runs before any data is loaded so a bad INI file fails fast with the
//! offending section and key.

use crate::domain::analysis::SECTION as INDICATORS;
use crate::domain::error::PlotosError;
use crate::domain::trend::{DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DATA: &str = "data";
pub const DASHBOARD: &str = "dashboard";

/// Default history start used by the dashboard.
pub const DEFAULT_START_DATE: (i32, u32, u32) = (2010, 1, 1);

const INDICATOR_WINDOWS: [&str; 9] = [
    "sma_short",
    "sma_long",
    "ema_span",
    "rsi_period",
    "stochastic_period",
    "stochastic_smoothing",
    "bollinger_window",
    "trix_span",
    "volatility_window",
];

/// Validate every section. `today` is the default end date.
pub fn validate_config(config: &dyn ConfigPort, today: NaiveDate) -> Result<(), PlotosError> {
    validate_data_config(config)?;
    validate_dashboard_config(config, today)?;
    validate_indicator_config(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), PlotosError> {
    match config.get_string(DATA, "prices_dir") {
        Some(s) if !s.trim().is_empty() => {}
        _ => {
            return Err(PlotosError::ConfigMissing {
                section: DATA.to_string(),
                key: "prices_dir".to_string(),
            })
        }
    }
    integer(config, DATA, "cache_ttl_secs", 0)?;
    integer(config, DATA, "cache_capacity", 1)?;
    Ok(())
}

pub fn validate_dashboard_config(
    config: &dyn ConfigPort,
    today: NaiveDate,
) -> Result<(), PlotosError> {
    let (start, end) = date_range(config, today)?;
    if start >= end {
        return Err(invalid(
            DASHBOARD,
            "start_date",
            "start_date must be before end_date",
        ));
    }

    if let Some(suffix) = config.get_string(DASHBOARD, "symbol_suffix") {
        if suffix.chars().any(char::is_whitespace) {
            return Err(invalid(
                DASHBOARD,
                "symbol_suffix",
                "symbol_suffix must not contain whitespace",
            ));
        }
    }

    integer(config, DASHBOARD, "benchmark_series", 1)?;
    series_codes(config)?;
    Ok(())
}

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<(), PlotosError> {
    for key in INDICATOR_WINDOWS {
        integer(config, INDICATORS, key, 1)?;
    }

    let short = config.get_int(INDICATORS, "sma_short", DEFAULT_SHORT_WINDOW as i64);
    let long = config.get_int(INDICATORS, "sma_long", DEFAULT_LONG_WINDOW as i64);
    if short >= long {
        return Err(invalid(
            INDICATORS,
            "sma_short",
            "sma_short must be shorter than sma_long",
        ));
    }

    if let Some(raw) = config.get_string(INDICATORS, "bollinger_width") {
        match raw.trim().parse::<f64>() {
            Ok(w) if w.is_finite() && w > 0.0 => {}
            _ => {
                return Err(invalid(
                    INDICATORS,
                    "bollinger_width",
                    "bollinger_width must be a positive number",
                ))
            }
        }
    }
    Ok(())
}

/// `[dashboard]` history range: `start_date` defaults to 2010-01-01 and
/// `end_date` to `today`.
pub fn date_range(
    config: &dyn ConfigPort,
    today: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), PlotosError> {
    let (y, m, d) = DEFAULT_START_DATE;
    let default_start = NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN);
    let start = parse_date(config, "start_date")?.unwrap_or(default_start);
    let end = parse_date(config, "end_date")?.unwrap_or(today);
    Ok((start, end))
}

/// Comma-separated `[dashboard] index_series`; absent means none.
pub fn series_codes(config: &dyn ConfigPort) -> Result<Vec<u32>, PlotosError> {
    let Some(raw) = config.get_string(DASHBOARD, "index_series") else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u32>()
                .ok()
                .filter(|&c| c > 0)
                .ok_or_else(|| {
                    invalid(
                        DASHBOARD,
                        "index_series",
                        &format!("{:?} is not a series code", s),
                    )
                })
        })
        .collect()
}

fn parse_date(config: &dyn ConfigPort, key: &str) -> Result<Option<NaiveDate>, PlotosError> {
    match config.get_string(DASHBOARD, key) {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                invalid(
                    DASHBOARD,
                    key,
                    &format!("invalid {} format, expected YYYY-MM-DD", key),
                )
            }),
    }
}

/// An optional integer key; when present it must parse and be `>= minimum`.
fn integer(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    minimum: i64,
) -> Result<(), PlotosError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(());
    };
    match raw.trim().parse::<i64>() {
        Ok(v) if v >= minimum => Ok(()),
        Ok(_) => Err(invalid(
            section,
            key,
            &format!("{} must be at least {}", key, minimum),
        )),
        Err(_) => Err(invalid(section, key, &format!("{} must be an integer", key))),
    }
}

fn invalid(section: &str, key: &str, reason: &str) -> PlotosError {
    PlotosError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
    }

    fn config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn assert_invalid(result: Result<(), PlotosError>, expected_key: &str) {
        match result {
            Err(PlotosError::ConfigInvalid { key, .. }) => assert_eq!(key, expected_key),
            other => panic!("expected ConfigInvalid for {expected_key}, got {other:?}"),
        }
    }

    const VALID: &str = r#"
[data]
prices_dir = data/prices
rates_dir = data/sgs
cache_ttl_secs = 3600
cache_capacity = 64

[dashboard]
start_date = 2010-01-01
end_date = 2024-06-28
symbol_suffix = .SA
benchmark_series = 432
index_series = 433, 189

[indicators]
sma_short = 50
sma_long = 200
bollinger_width = 2.0
"#;

    #[test]
    fn valid_config_passes() {
        assert!(validate_config(&config(VALID), today()).is_ok());
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let c = config("[data]\nprices_dir = prices\n");
        assert!(validate_config(&c, today()).is_ok());
        let (start, end) = date_range(&c, today()).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2010, 1, 1).unwrap());
        assert_eq!(end, today());
        assert!(series_codes(&c).unwrap().is_empty());
    }

    #[test]
    fn missing_prices_dir() {
        let err = validate_data_config(&config("[data]\nrates_dir = x\n")).unwrap_err();
        assert!(matches!(err, PlotosError::ConfigMissing { ref key, .. } if key == "prices_dir"));
    }

    #[test]
    fn zero_cache_capacity() {
        let c = config("[data]\nprices_dir = p\ncache_capacity = 0\n");
        assert_invalid(validate_data_config(&c), "cache_capacity");
    }

    #[test]
    fn start_after_end() {
        let c = config("[dashboard]\nstart_date = 2024-01-01\nend_date = 2023-01-01\n");
        assert_invalid(validate_dashboard_config(&c, today()), "start_date");
    }

    #[test]
    fn start_in_future_with_default_end() {
        let c = config("[dashboard]\nstart_date = 2030-01-01\n");
        assert_invalid(validate_dashboard_config(&c, today()), "start_date");
    }

    #[test]
    fn malformed_date() {
        let c = config("[dashboard]\nend_date = 28/06/2024\n");
        assert_invalid(validate_dashboard_config(&c, today()), "end_date");
    }

    #[test]
    fn bad_series_code() {
        let c = config("[dashboard]\nindex_series = 433, ibov\n");
        assert_invalid(validate_dashboard_config(&c, today()), "index_series");
        let c = config("[dashboard]\nindex_series = 433, 189\n");
        assert_eq!(series_codes(&c).unwrap(), vec![433, 189]);
    }

    #[test]
    fn suffix_with_space() {
        let c = config("[dashboard]\nsymbol_suffix = .S A\n");
        assert_invalid(validate_dashboard_config(&c, today()), "symbol_suffix");
    }

    #[test]
    fn zero_window() {
        let c = config("[indicators]\nrsi_period = 0\n");
        assert_invalid(validate_indicator_config(&c), "rsi_period");
    }

    #[test]
    fn non_numeric_window() {
        let c = config("[indicators]\ntrix_span = fifteen\n");
        assert_invalid(validate_indicator_config(&c), "trix_span");
    }

    #[test]
    fn short_average_must_be_shorter() {
        let c = config("[indicators]\nsma_short = 200\nsma_long = 50\n");
        assert_invalid(validate_indicator_config(&c), "sma_short");
        let c = config("[indicators]\nsma_short = 250\n");
        assert_invalid(validate_indicator_config(&c), "sma_short");
    }

    #[test]
    fn non_positive_width() {
        let c = config("[indicators]\nbollinger_width = -1\n");
        assert_invalid(validate_indicator_config(&c), "bollinger_width");
    }
}
