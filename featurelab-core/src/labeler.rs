//! Ternary target labeling from ATR divergence and the forward move.
//!
//! Up where `ATR_Diff > ATR_AvgDiff` and `15Diff > 0`, Down where
//! `ATR_Diff > ATR_AvgDiff` and `15Diff < 0`, Neutral otherwise. Comparisons
//! against NaN are false, so rows without a full history label Neutral.

use crate::domain::{columns, FeatureTable, Target, TableError};

/// Label a single row.
pub fn label(atr_diff: f64, atr_avg_diff: f64, forward_diff: f64) -> Target {
    if atr_diff > atr_avg_diff {
        if forward_diff > 0.0 {
            return Target::Up;
        }
        if forward_diff < 0.0 {
            return Target::Down;
        }
    }
    Target::Neutral
}

/// Label every row. All three series must have the same length.
pub fn label_series(atr_diff: &[f64], atr_avg_diff: &[f64], forward_diff: &[f64]) -> Vec<Target> {
    debug_assert_eq!(atr_diff.len(), atr_avg_diff.len());
    debug_assert_eq!(atr_diff.len(), forward_diff.len());
    atr_diff
        .iter()
        .zip(atr_avg_diff)
        .zip(forward_diff)
        .map(|((&d, &avg), &fwd)| label(d, avg, fwd))
        .collect()
}

/// Label every row of a signal table and append the `Target` column.
pub fn append_target(table: &mut FeatureTable) -> Result<(), TableError> {
    let get = |name: &str| {
        table
            .column(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    };
    let labels = label_series(
        get(columns::ATR_DIFF)?,
        get(columns::ATR_AVG_DIFF)?,
        get(columns::FORWARD_DIFF)?,
    );
    let values = labels.into_iter().map(Target::as_f64).collect();
    table.push_column(columns::TARGET, values)
}
