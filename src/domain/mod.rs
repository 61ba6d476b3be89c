//! Core domain types and logic.

pub mod ohlcv;
pub mod price_series;
pub mod indicator;
pub mod indicator_helpers;
pub mod trend;
pub mod resample;
pub mod rate_series;
pub mod dividends;
pub mod analysis;
pub mod config_validation;
pub mod error;
