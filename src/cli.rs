//! CLI definition and dispatch.

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use crate::adapters::cached_data_port::{CachedDataPort, DEFAULT_CAPACITY, DEFAULT_TTL};
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::dividend_csv_adapter::DividendCsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::indicator_table::{write_indicator_table, ValueColumn};
use crate::adapters::sgs_csv_adapter::SgsCsvAdapter;
use crate::adapters::symbol_directory::{SymbolDirectory, DEFAULT_SUFFIX};
use crate::domain::analysis::{analyze, Analysis, AnalysisConfig};
use crate::domain::config_validation::{self, validate_config, DASHBOARD, DATA};
use crate::domain::dividends::yearly_totals;
use crate::domain::error::PlotosError;
use crate::domain::indicator::compute;
use crate::domain::price_series::PriceSeries;
use crate::domain::rate_series::series_label;
use crate::domain::resample::resample_monthly;
use crate::domain::trend::{assess_trend, TrendAssessment};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::dividend_port::DividendPort;
use crate::ports::rate_port::RatePort;

/// SELIC target rate at the central bank's statistics service.
pub const DEFAULT_BENCHMARK_SERIES: u32 = 432;

#[derive(Parser, Debug)]
#[command(name = "plotos", about = "Technical indicators for B3-listed stocks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write the daily indicator table for one instrument
    Indicators {
        #[arg(short, long)]
        config: PathBuf,
        /// Ticker (PETR4, PETR4.SA) or company name from the symbol list
        symbol: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Classify the current trend of one or more instruments
    Trend {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(required = true)]
        symbols: Vec<String>,
    },
    /// Write the stochastic oscillator on monthly bars
    Monthly {
        #[arg(short, long)]
        config: PathBuf,
        symbol: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the instruments offered by the dashboard
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the stored data range for instrument(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
    /// List dividend payments and yearly totals for one instrument
    Dividends {
        #[arg(short, long)]
        config: PathBuf,
        symbol: String,
    },
    /// Show the latest benchmark rate and index values
    Rates {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let today = Local::now().date_naive();
    let result = match cli.command {
        Command::Indicators {
            config,
            symbol,
            output,
        } => run_indicators(&config, &symbol, output.as_deref(), today),
        Command::Trend { config, symbols } => run_trend(&config, &symbols, today),
        Command::Monthly {
            config,
            symbol,
            output,
        } => run_monthly(&config, &symbol, output.as_deref(), today),
        Command::ListSymbols { config } => run_list_symbols(&config, today),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref(), today),
        Command::Dividends { config, symbol } => run_dividends(&config, &symbol, today),
        Command::Rates { config } => run_rates(&config, today),
        Command::Validate { config } => run_validate(&config, today),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            (&e).into()
        }
    }
}

/// Everything the commands need from `[data]` and `[dashboard]`, resolved
/// with defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSettings {
    pub prices_dir: PathBuf,
    pub rates_dir: Option<PathBuf>,
    pub dividends_dir: Option<PathBuf>,
    pub symbols_file: Option<PathBuf>,
    pub cache_ttl: Duration,
    pub cache_capacity: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub symbol_suffix: String,
    pub benchmark_series: u32,
    pub index_series: Vec<u32>,
}

pub fn build_settings(
    config: &dyn ConfigPort,
    today: NaiveDate,
) -> Result<DashboardSettings, PlotosError> {
    let prices_dir = config
        .get_string(DATA, "prices_dir")
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| PlotosError::ConfigMissing {
            section: DATA.into(),
            key: "prices_dir".into(),
        })?;
    let path = |key: &str| {
        config
            .get_string(DATA, key)
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
    };
    let (start_date, end_date) = config_validation::date_range(config, today)?;

    Ok(DashboardSettings {
        prices_dir: PathBuf::from(prices_dir),
        rates_dir: path("rates_dir"),
        dividends_dir: path("dividends_dir"),
        symbols_file: path("symbols_file"),
        cache_ttl: Duration::from_secs(
            config
                .get_int(DATA, "cache_ttl_secs", DEFAULT_TTL.as_secs() as i64)
                .max(0) as u64,
        ),
        cache_capacity: config
            .get_int(DATA, "cache_capacity", DEFAULT_CAPACITY as i64)
            .max(1) as usize,
        start_date,
        end_date,
        symbol_suffix: config
            .get_string(DASHBOARD, "symbol_suffix")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| DEFAULT_SUFFIX.to_string()),
        benchmark_series: config
            .get_int(DASHBOARD, "benchmark_series", DEFAULT_BENCHMARK_SERIES as i64)
            .clamp(1, u32::MAX as i64) as u32,
        index_series: config_validation::series_codes(config)?,
    })
}

/// Load and validate the config file, then resolve its settings.
pub fn load_config(
    path: &Path,
    today: NaiveDate,
) -> Result<(FileConfigAdapter, DashboardSettings), PlotosError> {
    tracing::info!(path = %path.display(), "loading config");
    let adapter = FileConfigAdapter::from_file(path)?;
    validate_config(&adapter, today)?;
    let settings = build_settings(&adapter, today)?;
    Ok((adapter, settings))
}

pub fn open_data_port(settings: &DashboardSettings) -> CachedDataPort<CsvAdapter> {
    CachedDataPort::new(
        CsvAdapter::new(settings.prices_dir.clone()),
        settings.cache_ttl,
        settings.cache_capacity,
    )
}

fn open_directory(settings: &DashboardSettings) -> Result<Option<SymbolDirectory>, PlotosError> {
    match &settings.symbols_file {
        Some(path) => {
            let directory = SymbolDirectory::from_path(path)?;
            tracing::debug!(listings = directory.len(), "loaded symbol list");
            Ok(Some(directory))
        }
        None => Ok(None),
    }
}

/// Turn user input into the symbol the data source stores.
///
/// A company name or ticker found in the directory uses the directory's
/// ticker. Anything else is uppercased, and gets `suffix` unless it already
/// names an exchange.
pub fn resolve_symbol(input: &str, directory: Option<&SymbolDirectory>, suffix: &str) -> String {
    if let Some(dir) = directory {
        if let Some(listing) = dir
            .find_by_name(input)
            .or_else(|| dir.find_by_ticker(input))
        {
            return listing.market_symbol(suffix);
        }
    }
    let ticker = input.trim().to_uppercase();
    if ticker.contains('.') || suffix.is_empty() {
        ticker
    } else {
        format!("{}{}", ticker, suffix)
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>, PlotosError> {
    match path {
        Some(p) => {
            tracing::info!(path = %p.display(), "writing table");
            Ok(Box::new(BufWriter::new(File::create(p)?)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// The benchmark series as of each price date. A benchmark that cannot be
/// read only costs the column.
fn benchmark_column(
    rate_port: &dyn RatePort,
    series: &PriceSeries,
    settings: &DashboardSettings,
) -> Option<ValueColumn> {
    let code = settings.benchmark_series;
    match rate_port.fetch_rate_series(code, settings.start_date, settings.end_date) {
        Ok(rates) => {
            let dates: Vec<NaiveDate> = series.points().iter().map(|p| p.date).collect();
            Some(ValueColumn {
                name: series_label(code),
                values: rates.align_to(&dates),
            })
        }
        Err(e) => {
            tracing::warn!(code, "benchmark column left out: {e}");
            None
        }
    }
}

/// Fetch, analyze and write the daily table for one symbol. With a rate
/// port, the benchmark series is added as a last column.
pub fn run_indicators_pipeline(
    data_port: &dyn DataPort,
    rate_port: Option<&dyn RatePort>,
    symbol: &str,
    settings: &DashboardSettings,
    config: &AnalysisConfig,
    out: &mut dyn Write,
) -> Result<Analysis, PlotosError> {
    let series = data_port.fetch_prices(symbol, settings.start_date, settings.end_date)?;
    tracing::info!(symbol, points = series.len(), "fetched prices");

    let analysis = analyze(series, config)?;
    let columns: Vec<ValueColumn> = rate_port
        .and_then(|port| benchmark_column(port, &analysis.series, settings))
        .into_iter()
        .collect();
    write_indicator_table(&mut *out, &analysis.series, &analysis.ordered(), &columns)?;

    for s in analysis.ordered() {
        match s.latest() {
            Some(v) => tracing::debug!(indicator = %s.indicator_type, value = ?v, "latest"),
            None => tracing::warn!(
                indicator = %s.indicator_type,
                "not enough history for a current value"
            ),
        }
    }
    Ok(analysis)
}

/// Fetch, resample to months and write the monthly stochastic table.
pub fn run_monthly_pipeline(
    data_port: &dyn DataPort,
    symbol: &str,
    settings: &DashboardSettings,
    config: &AnalysisConfig,
    out: &mut dyn Write,
) -> Result<(), PlotosError> {
    let daily = data_port.fetch_prices(symbol, settings.start_date, settings.end_date)?;
    let monthly = resample_monthly(&daily)?;
    let stochastic = compute(&monthly, config.stochastic_type());
    tracing::info!(symbol, months = monthly.len(), "resampled to monthly bars");
    write_indicator_table(out, &monthly, &[&stochastic], &[])
}

pub fn run_trend_pipeline(
    data_port: &dyn DataPort,
    symbol: &str,
    settings: &DashboardSettings,
    config: &AnalysisConfig,
) -> Result<TrendAssessment, PlotosError> {
    let series = data_port.fetch_prices(symbol, settings.start_date, settings.end_date)?;
    Ok(assess_trend(&series, config.sma_short, config.sma_long))
}

fn run_indicators(
    config_path: &Path,
    input: &str,
    output: Option<&Path>,
    today: NaiveDate,
) -> Result<(), PlotosError> {
    let (adapter, settings) = load_config(config_path, today)?;
    let analysis_config = AnalysisConfig::from_config(&adapter);
    let directory = open_directory(&settings)?;
    let symbol = resolve_symbol(input, directory.as_ref(), &settings.symbol_suffix);
    let data_port = open_data_port(&settings);
    let rate_port = settings.rates_dir.clone().map(SgsCsvAdapter::new);

    let mut out = open_output(output)?;
    let analysis = run_indicators_pipeline(
        &data_port,
        rate_port.as_ref().map(|p| p as &dyn RatePort),
        &symbol,
        &settings,
        &analysis_config,
        &mut out,
    )?;
    out.flush()?;

    tracing::info!(symbol = %symbol, trend = %analysis.trend.label, "{}", analysis.trend.explanation());
    Ok(())
}

fn run_trend(config_path: &Path, inputs: &[String], today: NaiveDate) -> Result<(), PlotosError> {
    let (adapter, settings) = load_config(config_path, today)?;
    let analysis_config = AnalysisConfig::from_config(&adapter);
    let directory = open_directory(&settings)?;
    let data_port = open_data_port(&settings);

    let mut failures = Vec::new();
    for input in inputs {
        let symbol = resolve_symbol(input, directory.as_ref(), &settings.symbol_suffix);
        match run_trend_pipeline(&data_port, &symbol, &settings, &analysis_config) {
            Ok(trend) => println!("{}\t{}\t{}", symbol, trend.label, trend.explanation()),
            Err(e) => {
                tracing::warn!(symbol = %symbol, "{e}");
                failures.push(e);
            }
        }
    }

    // Only fail the run when nothing could be assessed.
    if failures.len() == inputs.len() {
        if let Some(e) = failures.into_iter().next() {
            return Err(e);
        }
    }
    Ok(())
}

fn run_monthly(
    config_path: &Path,
    input: &str,
    output: Option<&Path>,
    today: NaiveDate,
) -> Result<(), PlotosError> {
    let (adapter, settings) = load_config(config_path, today)?;
    let analysis_config = AnalysisConfig::from_config(&adapter);
    let directory = open_directory(&settings)?;
    let symbol = resolve_symbol(input, directory.as_ref(), &settings.symbol_suffix);
    let data_port = open_data_port(&settings);

    let mut out = open_output(output)?;
    run_monthly_pipeline(&data_port, &symbol, &settings, &analysis_config, &mut out)?;
    out.flush()?;
    Ok(())
}

fn run_list_symbols(config_path: &Path, today: NaiveDate) -> Result<(), PlotosError> {
    let (_, settings) = load_config(config_path, today)?;

    if let Some(directory) = open_directory(&settings)? {
        for listing in directory.listings() {
            println!(
                "{}\t{}",
                listing.market_symbol(&settings.symbol_suffix),
                listing.name
            );
        }
        tracing::info!("{} symbols listed", directory.len());
        return Ok(());
    }

    let symbols = open_data_port(&settings).list_symbols()?;
    if symbols.is_empty() {
        tracing::warn!(dir = %settings.prices_dir.display(), "no symbols found");
    }
    for symbol in &symbols {
        println!("{}", symbol);
    }
    tracing::info!("{} symbols found", symbols.len());
    Ok(())
}

fn run_info(config_path: &Path, input: Option<&str>, today: NaiveDate) -> Result<(), PlotosError> {
    let (_, settings) = load_config(config_path, today)?;
    let directory = open_directory(&settings)?;
    let data_port = open_data_port(&settings);

    let symbols = match input {
        Some(s) => vec![resolve_symbol(s, directory.as_ref(), &settings.symbol_suffix)],
        None => match &directory {
            Some(dir) => dir
                .listings()
                .iter()
                .map(|l| l.market_symbol(&settings.symbol_suffix))
                .collect(),
            None => data_port.list_symbols()?,
        },
    };

    for symbol in &symbols {
        match data_port.get_data_range(symbol) {
            Ok(Some((first, last, count))) => {
                println!("{}: {} bars, {} to {}", symbol, count, first, last)
            }
            Ok(None) => tracing::warn!(symbol = %symbol, "no data found"),
            Err(e) => tracing::warn!(symbol = %symbol, "error reading data: {e}"),
        }
    }
    Ok(())
}

/// Latest value of the benchmark and each index series, as printable lines.
pub fn latest_rates(
    rate_port: &dyn RatePort,
    settings: &DashboardSettings,
) -> Result<Vec<String>, PlotosError> {
    let mut codes = vec![settings.benchmark_series];
    codes.extend(
        settings
            .index_series
            .iter()
            .copied()
            .filter(|c| *c != settings.benchmark_series),
    );

    let mut lines = Vec::with_capacity(codes.len());
    for code in codes {
        let series = rate_port.fetch_rate_series(code, settings.start_date, settings.end_date)?;
        match series.latest() {
            Some(point) => lines.push(format!(
                "{}\t{}\t{}",
                series_label(code),
                point.date,
                point.value
            )),
            None => tracing::warn!(code, "series has no values in range"),
        }
    }
    Ok(lines)
}

/// Dividend history as printable lines: one `date<TAB>amount` line per
/// payment, then one `year<TAB>total<TAB>payments` line per year.
pub fn dividend_lines(
    dividend_port: &dyn DividendPort,
    symbol: &str,
    settings: &DashboardSettings,
) -> Result<Vec<String>, PlotosError> {
    let dividends = dividend_port.fetch_dividends(symbol, settings.start_date, settings.end_date)?;
    if dividends.is_empty() {
        tracing::warn!(symbol, "no dividends found");
        return Ok(Vec::new());
    }

    let totals = yearly_totals(&dividends);
    let mut lines: Vec<String> = dividends
        .points()
        .iter()
        .map(|p| format!("{}\t{}", p.date, p.value))
        .collect();
    lines.extend(
        totals
            .iter()
            .map(|t| format!("{}\t{:.4}\t{}", t.year, t.total, t.payments)),
    );
    tracing::info!(symbol, payments = dividends.len(), years = totals.len(), "dividend history");
    Ok(lines)
}

fn run_dividends(config_path: &Path, input: &str, today: NaiveDate) -> Result<(), PlotosError> {
    let (_, settings) = load_config(config_path, today)?;
    let dividends_dir = settings
        .dividends_dir
        .clone()
        .ok_or_else(|| PlotosError::ConfigMissing {
            section: DATA.into(),
            key: "dividends_dir".into(),
        })?;
    let directory = open_directory(&settings)?;
    let symbol = resolve_symbol(input, directory.as_ref(), &settings.symbol_suffix);

    let port = DividendCsvAdapter::new(dividends_dir);
    for line in dividend_lines(&port, &symbol, &settings)? {
        println!("{}", line);
    }
    Ok(())
}

fn run_rates(config_path: &Path, today: NaiveDate) -> Result<(), PlotosError> {
    let (_, settings) = load_config(config_path, today)?;
    let rates_dir = settings
        .rates_dir
        .clone()
        .ok_or_else(|| PlotosError::ConfigMissing {
            section: DATA.into(),
            key: "rates_dir".into(),
        })?;

    let port = SgsCsvAdapter::new(rates_dir);
    for line in latest_rates(&port, &settings)? {
        println!("{}", line);
    }
    Ok(())
}

fn run_validate(config_path: &Path, today: NaiveDate) -> Result<(), PlotosError> {
    let (adapter, settings) = load_config(config_path, today)?;
    let analysis_config = AnalysisConfig::from_config(&adapter);

    println!("history: {} to {}", settings.start_date, settings.end_date);
    println!("prices: {}", settings.prices_dir.display());
    if let Some(directory) = open_directory(&settings)? {
        println!("symbol list: {} instruments", directory.len());
    }
    let types: Vec<String> = analysis_config
        .daily_types()
        .iter()
        .map(ToString::to_string)
        .collect();
    println!("indicators: {}", types.join(", "));

    tracing::info!("configuration is valid");
    Ok(())
}
