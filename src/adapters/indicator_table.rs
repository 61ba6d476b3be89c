//! CSV export of a price series with its indicators side by side.
//!
//! One row per price point: `date`, `close`, then one column per scalar
//! indicator. Bollinger bands expand to `upper`/`middle`/`lower` columns and
//! stochastics to `%K`/`%D`. Plain value columns, such as a benchmark rate
//! aligned to the price dates, follow the indicators. Missing values are
//! written as empty cells.

use crate::domain::error::PlotosError;
use crate::domain::indicator::{IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::finite;
use crate::domain::price_series::PriceSeries;
use std::io::Write;

/// A named column of values already aligned to the price dates.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Header names contributed by one indicator.
pub fn column_names(indicator_type: IndicatorType) -> Vec<String> {
    match indicator_type {
        IndicatorType::Bollinger { .. } => ["upper", "middle", "lower"]
            .iter()
            .map(|part| format!("{} {}", indicator_type, part))
            .collect(),
        IndicatorType::Stochastic { .. } => ["%K", "%D"]
            .iter()
            .map(|part| format!("{} {}", indicator_type, part))
            .collect(),
        _ => vec![indicator_type.to_string()],
    }
}

fn cells(indicator_type: IndicatorType, value: Option<&IndicatorValue>) -> Vec<String> {
    let fmt = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_default();
    match (indicator_type, value) {
        (_, Some(IndicatorValue::Simple(v))) => vec![fmt(Some(*v))],
        (_, Some(IndicatorValue::Stochastic { k, d })) => vec![fmt(Some(*k)), fmt(*d)],
        (
            _,
            Some(IndicatorValue::Bollinger {
                upper,
                middle,
                lower,
            }),
        ) => vec![fmt(Some(*upper)), fmt(Some(*middle)), fmt(Some(*lower))],
        (t, None) => vec![String::new(); column_names(t).len()],
    }
}

pub fn write_indicator_table<W: Write>(
    writer: W,
    series: &PriceSeries,
    indicators: &[&IndicatorSeries],
    columns: &[ValueColumn],
) -> Result<(), PlotosError> {
    let lengths = indicators
        .iter()
        .map(|ind| (ind.indicator_type.to_string(), ind.len()))
        .chain(columns.iter().map(|c| (c.name.clone(), c.values.len())));
    for (name, len) in lengths {
        if len != series.len() {
            return Err(PlotosError::Data {
                reason: format!(
                    "{} has {} points but {} has {}",
                    name,
                    len,
                    series.symbol(),
                    series.len()
                ),
            });
        }
    }

    let mut wtr = csv::Writer::from_writer(writer);
    let csv_err = |e: csv::Error| PlotosError::Data {
        reason: format!("failed to write indicator table: {}", e),
    };

    let mut header = vec!["date".to_string(), "close".to_string()];
    for ind in indicators {
        header.extend(column_names(ind.indicator_type));
    }
    header.extend(columns.iter().map(|c| c.name.clone()));
    wtr.write_record(&header).map_err(csv_err)?;

    for (i, point) in series.points().iter().enumerate() {
        let mut row = vec![
            point.date.format("%Y-%m-%d").to_string(),
            finite(point.close).map(|c| c.to_string()).unwrap_or_default(),
        ];
        for ind in indicators {
            row.extend(cells(ind.indicator_type, ind.values[i].value.as_ref()));
        }
        row.extend(
            columns
                .iter()
                .map(|c| c.values[i].map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&row).map_err(csv_err)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::{calculate_bollinger, calculate_sma, calculate_stochastic};
    use crate::domain::ohlcv::PricePoint;
    use chrono::NaiveDate;

    fn make_series(prices: &[f64]) -> PriceSeries {
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: NaiveDate::from_ymd_opt(2024, 3, (i + 1) as u32).unwrap(),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: Some(100),
            })
            .collect();
        PriceSeries::new("BBAS3.SA", points).unwrap()
    }

    fn render(series: &PriceSeries, indicators: &[&IndicatorSeries]) -> String {
        let mut buf = Vec::new();
        write_indicator_table(&mut buf, series, indicators, &[]).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn header_expands_compound_indicators() {
        let series = make_series(&[10.0, 11.0, 12.0]);
        let sma = calculate_sma(&series, 2);
        let boll = calculate_bollinger(&series, 2, 200);
        let stoch = calculate_stochastic(&series, 2, 2);
        let out = render(&series, &[&sma, &boll, &stoch]);

        let header = out.lines().next().unwrap();
        assert_eq!(
            header,
            "date,close,SMA(2),\"BOLLINGER(2,2) upper\",\"BOLLINGER(2,2) middle\",\
             \"BOLLINGER(2,2) lower\",\"STOCHASTIC(2,2) %K\",\"STOCHASTIC(2,2) %D\""
        );
    }

    #[test]
    fn warmup_rows_have_empty_cells() {
        let series = make_series(&[10.0, 11.0, 12.0]);
        let sma = calculate_sma(&series, 2);
        let out = render(&series, &[&sma]);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1], "2024-03-01,10,");
        assert_eq!(lines[2], "2024-03-02,11,10.5");
        assert_eq!(lines[3], "2024-03-03,12,11.5");
    }

    #[test]
    fn missing_close_is_empty() {
        let mut series = make_series(&[10.0, 11.0]).points().to_vec();
        series[1].close = f64::NAN;
        let series = PriceSeries::new("BBAS3.SA", series).unwrap();
        let out = render(&series, &[]);
        assert_eq!(out.lines().nth(2), Some("2024-03-02,"));
    }

    #[test]
    fn misaligned_indicator_is_rejected() {
        let series = make_series(&[10.0, 11.0, 12.0]);
        let shorter = make_series(&[10.0, 11.0]);
        let sma = calculate_sma(&shorter, 2);
        let mut buf = Vec::new();
        let err = write_indicator_table(&mut buf, &series, &[&sma], &[]).unwrap_err();
        assert!(matches!(err, PlotosError::Data { .. }));
    }

    #[test]
    fn value_columns_follow_indicators() {
        let series = make_series(&[10.0, 11.0, 12.0]);
        let sma = calculate_sma(&series, 2);
        let selic = ValueColumn {
            name: "SELIC target".into(),
            values: vec![None, Some(10.75), Some(10.5)],
        };
        let mut buf = Vec::new();
        write_indicator_table(&mut buf, &series, &[&sma], &[selic]).unwrap();
        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines[0], "date,close,SMA(2),SELIC target");
        assert_eq!(lines[1], "2024-03-01,10,,");
        assert_eq!(lines[3], "2024-03-03,12,11.5,10.5");
    }

    #[test]
    fn short_value_column_is_rejected() {
        let series = make_series(&[10.0, 11.0, 12.0]);
        let short = ValueColumn {
            name: "IPCA".into(),
            values: vec![Some(0.4)],
        };
        let mut buf = Vec::new();
        let err = write_indicator_table(&mut buf, &series, &[], &[short]).unwrap_err();
        assert!(matches!(err, PlotosError::Data { ref reason } if reason.starts_with("IPCA has 1")));
    }
}
