//! CSV price ingestion with polars.
//!
//! Expects `Date, Open, High, Low, Close, Volume` columns. Header names are
//! matched case-insensitively and extra columns are ignored. Dates may be
//! ISO strings (a trailing time part is ignored) or a native date/datetime
//! column. Numeric columns are cast to Float64; nulls become NaN so the
//! quality gate sees them as missing.

use super::provider::{normalize_rows, DataError, PriceRequest, PriceSource};
use crate::domain::{columns, PriceRow};
use chrono::NaiveDate;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    path: PathBuf,
}

impl CsvPriceSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PriceSource for CsvPriceSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, request: &PriceRequest) -> Result<Vec<PriceRow>, DataError> {
        let rows = read_price_csv(&self.path)?;
        let raw = rows.len();
        let rows = normalize_rows(rows, request.lookback_years);
        info!(
            ticker = %request.ticker,
            path = %self.path.display(),
            raw,
            kept = rows.len(),
            "loaded prices"
        );
        Ok(rows)
    }
}

/// Read every row of a price CSV, in file order, with ceiling rounding applied.
pub fn read_price_csv(path: &Path) -> Result<Vec<PriceRow>, DataError> {
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_try_parse_dates(true)
        .finish()
        .and_then(|lf| lf.collect())
        .map_err(|e| DataError::IngestFailed(format!("{}: {e}", path.display())))?;
    debug!(height = df.height(), width = df.width(), "csv parsed");
    dataframe_to_rows(&df)
}

fn find_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, DataError> {
    df.get_columns()
        .iter()
        .find(|c| c.name().as_str().eq_ignore_ascii_case(name))
        .ok_or_else(|| DataError::MissingColumn(name.to_string()))
}

fn float_values(df: &DataFrame, name: &str) -> Result<Vec<f64>, DataError> {
    let column = find_column(df, name)?
        .cast(&DataType::Float64)
        .map_err(|e| DataError::ValidationError(format!("{name} is not numeric: {e}")))?;
    let ca = column
        .f64()
        .map_err(|e| DataError::ValidationError(format!("{name} column type: {e}")))?;
    Ok(ca.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

fn date_values(df: &DataFrame) -> Result<Vec<NaiveDate>, DataError> {
    let column = find_column(df, columns::DATE)?;
    if let DataType::String = column.dtype() {
        let ca = column
            .str()
            .map_err(|e| DataError::ValidationError(format!("Date column type: {e}")))?;
        return ca
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                let text = v.ok_or_else(|| DataError::ValidationError(format!("null date at row {i}")))?;
                parse_date(text)
                    .ok_or_else(|| DataError::ValidationError(format!("bad date '{text}' at row {i}")))
            })
            .collect();
    }

    let dates = column
        .cast(&DataType::Date)
        .map_err(|e| DataError::ValidationError(format!("Date column type: {e}")))?;
    let ca = dates
        .date()
        .map_err(|e| DataError::ValidationError(format!("Date column type: {e}")))?;
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
        .ok_or_else(|| DataError::ValidationError("epoch".into()))?;
    (0..ca.len())
        .map(|i| {
            ca.get(i)
                .map(|days| epoch + chrono::Duration::days(days as i64))
                .ok_or_else(|| DataError::ValidationError(format!("null date at row {i}")))
        })
        .collect()
}

/// Parse `YYYY-MM-DD`, ignoring any time component after it.
fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let day = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn dataframe_to_rows(df: &DataFrame) -> Result<Vec<PriceRow>, DataError> {
    let dates = date_values(df)?;
    let open = float_values(df, columns::OPEN)?;
    let high = float_values(df, columns::HIGH)?;
    let low = float_values(df, columns::LOW)?;
    let close = float_values(df, columns::CLOSE)?;
    let volume = float_values(df, columns::VOLUME)?;

    Ok(dates
        .into_iter()
        .enumerate()
        .map(|(i, date)| PriceRow::from_raw(date, open[i], high[i], low[i], close[i], volume[i]))
        .collect())
}
