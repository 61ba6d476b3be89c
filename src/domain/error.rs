//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for plotos.
///
/// Only whole-series problems and collaborator failures end up here. Bad
/// individual points inside an otherwise valid series become missing
/// indicator values instead.
#[derive(Debug, thiserror::Error)]
pub enum PlotosError {
    #[error("empty price series for {symbol}")]
    EmptySeries { symbol: String },

    #[error("dates out of order for {symbol} at index {index}: {date} follows {previous}")]
    NonChronological {
        symbol: String,
        index: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },

    #[error("duplicate date {date} in series for {symbol}")]
    DuplicateDate { symbol: String, date: NaiveDate },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&PlotosError> for std::process::ExitCode {
    fn from(err: &PlotosError) -> Self {
        let code: u8 = match err {
            PlotosError::Io(_) => 1,
            PlotosError::ConfigParse { .. }
            | PlotosError::ConfigMissing { .. }
            | PlotosError::ConfigInvalid { .. } => 2,
            PlotosError::Data { .. } | PlotosError::NoData { .. } => 3,
            PlotosError::EmptySeries { .. }
            | PlotosError::NonChronological { .. }
            | PlotosError::DuplicateDate { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
