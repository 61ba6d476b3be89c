//! The dashboard's default indicator bundle for one instrument.
//!
//! Settings come from the `[indicators]` config section; every key has the
//! conventional default so an empty section works.

use crate::domain::error::PlotosError;
use crate::domain::indicator::{
    bollinger, compute, compute_indicators, rsi, stochastic, trix, volatility, IndicatorSeries,
    IndicatorType,
};
use crate::domain::price_series::PriceSeries;
use crate::domain::resample::resample_monthly;
use crate::domain::trend::{
    assess_trend, TrendAssessment, DEFAULT_LONG_WINDOW, DEFAULT_SHORT_WINDOW,
};
use crate::ports::config_port::ConfigPort;
use std::collections::{HashMap, HashSet};

pub const SECTION: &str = "indicators";

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub sma_short: usize,
    pub sma_long: usize,
    pub ema_span: usize,
    pub rsi_period: usize,
    pub stochastic_period: usize,
    pub stochastic_smoothing: usize,
    pub bollinger_window: usize,
    pub bollinger_width: f64,
    pub trix_span: usize,
    pub volatility_window: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sma_short: DEFAULT_SHORT_WINDOW,
            sma_long: DEFAULT_LONG_WINDOW,
            ema_span: 20,
            rsi_period: rsi::DEFAULT_PERIOD,
            stochastic_period: stochastic::DEFAULT_K_PERIOD,
            stochastic_smoothing: stochastic::DEFAULT_D_PERIOD,
            bollinger_window: bollinger::DEFAULT_PERIOD,
            bollinger_width: bollinger::DEFAULT_WIDTH_X100 as f64 / 100.0,
            trix_span: trix::DEFAULT_SPAN,
            volatility_window: volatility::DEFAULT_WINDOW,
        }
    }
}

impl AnalysisConfig {
    /// Read `[indicators]`, falling back to the defaults for absent keys.
    /// Values are range-checked by `config_validation` beforehand.
    pub fn from_config(config: &dyn ConfigPort) -> Self {
        let d = Self::default();
        let get = |key: &str, default: usize| {
            config.get_int(SECTION, key, default as i64).max(0) as usize
        };
        Self {
            sma_short: get("sma_short", d.sma_short),
            sma_long: get("sma_long", d.sma_long),
            ema_span: get("ema_span", d.ema_span),
            rsi_period: get("rsi_period", d.rsi_period),
            stochastic_period: get("stochastic_period", d.stochastic_period),
            stochastic_smoothing: get("stochastic_smoothing", d.stochastic_smoothing),
            bollinger_window: get("bollinger_window", d.bollinger_window),
            bollinger_width: config.get_double(SECTION, "bollinger_width", d.bollinger_width),
            trix_span: get("trix_span", d.trix_span),
            volatility_window: get("volatility_window", d.volatility_window),
        }
    }

    pub fn stochastic_type(&self) -> IndicatorType {
        IndicatorType::Stochastic {
            k_period: self.stochastic_period,
            d_period: self.stochastic_smoothing,
        }
    }

    /// Daily indicators in table column order.
    pub fn daily_types(&self) -> Vec<IndicatorType> {
        vec![
            IndicatorType::Sma(self.sma_short),
            IndicatorType::Sma(self.sma_long),
            IndicatorType::Ema(self.ema_span),
            IndicatorType::Rsi(self.rsi_period),
            self.stochastic_type(),
            IndicatorType::Bollinger {
                period: self.bollinger_window,
                width_x100: (self.bollinger_width * 100.0).round() as u32,
            },
            IndicatorType::Trix(self.trix_span),
            IndicatorType::Volatility(self.volatility_window),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct Analysis {
    pub series: PriceSeries,
    pub order: Vec<IndicatorType>,
    pub indicators: HashMap<IndicatorType, IndicatorSeries>,
    /// Stochastic on monthly bars; `None` when the history holds no full month.
    pub monthly_stochastic: Option<IndicatorSeries>,
    pub trend: TrendAssessment,
}

impl Analysis {
    /// Daily series in column order.
    pub fn ordered(&self) -> Vec<&IndicatorSeries> {
        self.order
            .iter()
            .filter_map(|t| self.indicators.get(t))
            .collect()
    }
}

pub fn analyze(series: PriceSeries, config: &AnalysisConfig) -> Result<Analysis, PlotosError> {
    let mut order = config.daily_types();
    let mut seen = HashSet::new();
    order.retain(|t| seen.insert(*t));
    let indicators = compute_indicators(&series, &order);

    let monthly_stochastic = match resample_monthly(&series) {
        Ok(monthly) => Some(compute(&monthly, config.stochastic_type())),
        Err(PlotosError::EmptySeries { .. }) => None,
        Err(e) => return Err(e),
    };

    let trend = assess_trend(&series, config.sma_short, config.sma_long);

    tracing::info!(
        symbol = series.symbol(),
        points = series.len(),
        indicators = indicators.len(),
        trend = %trend.label,
        "analysis complete"
    );

    Ok(Analysis {
        series,
        order,
        indicators,
        monthly_stochastic,
        trend,
    })
}
