//! Cross-source consistency check.
//!
//! Two sources for the same instrument should agree row for row. A cell
//! agrees when `|a - b| <= tolerance * max|a|`, where the maximum runs over
//! every OHLCV cell of the primary table: one global threshold, not a
//! per-cell relative error.

use crate::domain::PriceRow;
use serde::Serialize;
use tracing::warn;

pub const DEFAULT_TOLERANCE: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsistencyReport {
    pub consistent: bool,
    /// Row counts (primary, secondary) when they differ.
    pub shape_mismatch: Option<(usize, usize)>,
    /// Indices of rows with a date mismatch or an out-of-tolerance cell.
    pub mismatched_rows: Vec<usize>,
    /// Absolute threshold derived from the primary table.
    pub threshold: f64,
}

fn cells(row: &PriceRow) -> [f64; 5] {
    [row.open, row.high, row.low, row.close, row.volume]
}

pub fn check_consistency(
    primary: &[PriceRow],
    secondary: &[PriceRow],
    tolerance: f64,
) -> ConsistencyReport {
    if primary.len() != secondary.len() {
        warn!(
            primary = primary.len(),
            secondary = secondary.len(),
            "price sources differ in length"
        );
        return ConsistencyReport {
            consistent: false,
            shape_mismatch: Some((primary.len(), secondary.len())),
            mismatched_rows: Vec::new(),
            threshold: f64::NAN,
        };
    }

    let scale = primary
        .iter()
        .flat_map(cells)
        .map(f64::abs)
        .fold(0.0, f64::max);
    let threshold = scale * tolerance;

    let mismatched_rows: Vec<usize> = primary
        .iter()
        .zip(secondary)
        .enumerate()
        .filter(|(_, (a, b))| {
            a.date != b.date
                || cells(a)
                    .iter()
                    .zip(cells(b))
                    .any(|(x, y)| !((x - y).abs() <= threshold))
        })
        .map(|(i, _)| i)
        .collect();

    if !mismatched_rows.is_empty() {
        warn!(
            rows = mismatched_rows.len(),
            threshold, "price sources disagree beyond tolerance"
        );
    }

    ConsistencyReport {
        consistent: mismatched_rows.is_empty(),
        shape_mismatch: None,
        mismatched_rows,
        threshold,
    }
}
