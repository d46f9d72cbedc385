//! Price source trait and structured error types.
//!
//! The pipeline never fetches data itself. A `PriceSource` hands it an
//! ascending, de-duplicated run of daily rows; CSV files, synthetic walks and
//! test fixtures all sit behind the same trait.

use crate::domain::PriceRow;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Trading days kept per requested year of history.
pub const TRADING_DAYS_PER_LOOKBACK_YEAR: usize = 252;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("ingest failed: {0}")]
    IngestFailed(String),

    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("parquet I/O error: {0}")]
    ParquetError(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// What to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRequest {
    pub ticker: String,
    /// Bar interval. Only daily ("1d") data is meaningful to the pipeline.
    pub interval: String,
    /// Keep only the most recent `years × 252` rows; `None` keeps everything.
    pub lookback_years: Option<usize>,
}

impl PriceRequest {
    pub fn daily(ticker: impl Into<String>, lookback_years: Option<usize>) -> Self {
        Self {
            ticker: ticker.into(),
            interval: "1d".to_string(),
            lookback_years,
        }
    }
}

pub trait PriceSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch ascending, de-duplicated daily rows.
    fn fetch(&self, request: &PriceRequest) -> Result<Vec<PriceRow>, DataError>;
}

/// Sort by date, drop repeated dates (first occurrence wins) and keep the
/// requested tail.
pub fn normalize_rows(mut rows: Vec<PriceRow>, lookback_years: Option<usize>) -> Vec<PriceRow> {
    rows.sort_by_key(|r| r.date);
    rows.dedup_by_key(|r| r.date);
    if let Some(years) = lookback_years {
        let keep = years.saturating_mul(TRADING_DAYS_PER_LOOKBACK_YEAR);
        if rows.len() > keep {
            rows.drain(..rows.len() - keep);
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(day: u32, close: f64) -> PriceRow {
        let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        PriceRow {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 1.0,
        }
    }

    #[test]
    fn normalize_sorts_and_keeps_first_duplicate() {
        let rows = vec![row(3, 3.0), row(1, 1.0), row(3, 30.0), row(2, 2.0)];
        let out = normalize_rows(rows, None);
        let closes: Vec<f64> = out.iter().map(|r| r.close).collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn normalize_keeps_most_recent_tail() {
        let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let rows: Vec<PriceRow> = (0..300)
            .map(|i| PriceRow {
                date: base + chrono::Duration::days(i),
                ..row(1, i as f64)
            })
            .collect();
        let kept = normalize_rows(rows.clone(), Some(1));
        assert_eq!(kept.len(), 252);
        assert_eq!(kept[0].close, 48.0);
        assert_eq!(kept.last(), rows.last());
        assert_eq!(normalize_rows(rows.clone(), Some(2)).len(), 300);
        assert_eq!(normalize_rows(rows.clone(), Some(usize::MAX)).len(), 300);
        assert!(normalize_rows(rows, Some(0)).is_empty());
    }

    #[test]
    fn daily_request() {
        let req = PriceRequest::daily("SPY", Some(5));
        assert_eq!(req.interval, "1d");
        assert_eq!(req.lookback_years, Some(5));
    }
}
