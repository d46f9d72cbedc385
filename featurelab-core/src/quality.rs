//! Data-quality gate run before any feature is computed.
//!
//! Four conditions reject a price history: too few rows, missing values,
//! literal zeros in any OHLCV field, and emptiness. With `impute_zero` set,
//! interior zeros are first replaced by the mean of their two neighbours in
//! the original column. Zeros on the first or last row have only one
//! neighbour, stay in place and still reject.

use crate::domain::PriceRow;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{info, warn};

/// Rows required per year of requested history.
pub const MIN_ROWS_PER_YEAR: usize = 251;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum QualityFailure {
    #[error("The dataset is too small.")]
    TooSmall { rows: usize, required: usize },

    #[error("NaN/Null values are present")]
    MissingValues { cells: usize },

    #[error("Zeroes are present")]
    ZeroValues { cells: usize },

    #[error("The dataset is empty")]
    Empty,
}

/// Outcome of the gate: every failing condition plus imputation accounting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityReport {
    pub rows: usize,
    pub imputed_cells: usize,
    pub failures: Vec<QualityFailure>,
}

impl QualityReport {
    pub fn is_accepted(&self) -> bool {
        self.failures.is_empty()
    }

    /// Human-readable reasons, one per failing condition.
    pub fn reasons(&self) -> Vec<String> {
        self.failures.iter().map(|f| f.to_string()).collect()
    }
}

impl fmt::Display for QualityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_accepted() {
            write!(f, "accepted {} rows", self.rows)
        } else {
            write!(f, "rejected: {}", self.reasons().join("; "))
        }
    }
}

impl std::error::Error for QualityReport {}

/// Accepted rows (possibly imputed) and the report that accepted them.
#[derive(Debug, Clone)]
pub struct QualityVerdict {
    pub rows: Vec<PriceRow>,
    pub report: QualityReport,
}

#[derive(Debug, Clone, Copy)]
pub struct DataQualityGate {
    min_rows: usize,
    impute_zero: bool,
}

impl DataQualityGate {
    pub fn new(min_rows: usize, impute_zero: bool) -> Self {
        Self {
            min_rows,
            impute_zero,
        }
    }

    /// Gate requiring `period_years` years of daily rows.
    pub fn for_period(period_years: usize, impute_zero: bool) -> Self {
        Self::new(period_years.saturating_mul(MIN_ROWS_PER_YEAR), impute_zero)
    }

    pub fn min_rows(&self) -> usize {
        self.min_rows
    }

    pub fn check(&self, rows: &[PriceRow]) -> Result<QualityVerdict, QualityReport> {
        let (rows, imputed_cells) = if self.impute_zero {
            impute_zeros(rows)
        } else {
            (rows.to_vec(), 0)
        };

        let mut failures = Vec::new();
        if rows.len() < self.min_rows {
            failures.push(QualityFailure::TooSmall {
                rows: rows.len(),
                required: self.min_rows,
            });
        }
        let missing = count_cells(&rows, |v| !v.is_finite());
        if missing > 0 {
            failures.push(QualityFailure::MissingValues { cells: missing });
        }
        let zeros = count_cells(&rows, |v| v == 0.0);
        if zeros > 0 {
            failures.push(QualityFailure::ZeroValues { cells: zeros });
        }
        if rows.is_empty() {
            failures.push(QualityFailure::Empty);
        }

        let report = QualityReport {
            rows: rows.len(),
            imputed_cells,
            failures,
        };
        if !report.is_accepted() {
            for failure in &report.failures {
                warn!(reason = %failure, "data quality check failed");
            }
            return Err(report);
        }
        info!(rows = report.rows, imputed_cells, "data quality check passed");
        Ok(QualityVerdict { rows, report })
    }
}

fn ohlcv(row: &PriceRow) -> [f64; 5] {
    [row.open, row.high, row.low, row.close, row.volume]
}

fn count_cells(rows: &[PriceRow], pred: impl Fn(f64) -> bool) -> usize {
    rows.iter()
        .map(|r| ohlcv(r).into_iter().filter(|&v| pred(v)).count())
        .sum()
}

/// Replace interior zeros with the mean of their neighbours.
///
/// Neighbours are read from the original rows, so a run of zeros does not
/// feed imputed values forward. Returns the new rows and the number of cells
/// replaced.
pub fn impute_zeros(rows: &[PriceRow]) -> (Vec<PriceRow>, usize) {
    let mut out = rows.to_vec();
    let mut imputed = 0;
    for i in 1..rows.len().saturating_sub(1) {
        let prev = ohlcv(&rows[i - 1]);
        let next = ohlcv(&rows[i + 1]);
        let mut fields = ohlcv(&rows[i]);
        for k in 0..fields.len() {
            if fields[k] == 0.0 {
                fields[k] = (prev[k] + next[k]) / 2.0;
                imputed += 1;
            }
        }
        let row = &mut out[i];
        [row.open, row.high, row.low, row.close, row.volume] = fields;
    }
    (out, imputed)
}
