//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|); the first
//! row has no previous close and uses high-low.
//! ATR is the rolling mean of the true range by default; Wilder smoothing
//! (EMA with alpha = 1/period) is available as an alternative.
//! Lookback: period - 1.

use super::rolling::rolling_mean;
use super::Indicator;
use crate::domain::{columns, PriceRow};
use serde::{Deserialize, Serialize};

/// How the true range is averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtrSmoothing {
    /// Rolling arithmetic mean over `period` rows.
    #[default]
    Simple,
    /// Wilder's recursive smoothing seeded with the mean of the first `period` values.
    Wilder,
}

#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    smoothing: AtrSmoothing,
}

impl Atr {
    pub fn new(period: usize, smoothing: AtrSmoothing) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self { period, smoothing }
    }
}

/// True range per row. A NaN high, low or previous close gives NaN.
pub fn true_range(rows: &[PriceRow]) -> Vec<f64> {
    let mut prev_close: Option<f64> = None;
    rows.iter()
        .map(|row| {
            let span = row.high - row.low;
            let tr = match prev_close {
                None => span,
                Some(pc) if pc.is_nan() || span.is_nan() => f64::NAN,
                Some(pc) => span.max((row.high - pc).abs()).max((row.low - pc).abs()),
            };
            prev_close = Some(row.close);
            tr
        })
        .collect()
}

/// Apply Wilder smoothing to a series. Alpha = 1/period.
/// Seed: mean of the first run of `period` non-NaN values.
pub fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n < period || period == 0 {
        return result;
    }

    let seed_start = (0..=n - period).find(|&i| values[i..i + period].iter().all(|v| !v.is_nan()));

    let seed_start = match seed_start {
        Some(s) => s,
        None => return result,
    };

    let seed_end = seed_start + period;
    let seed: f64 = values[seed_start..seed_end].iter().sum::<f64>() / period as f64;
    result[seed_end - 1] = seed;

    let alpha = 1.0 / period as f64;
    let mut prev = seed;

    for i in seed_end..n {
        if values[i].is_nan() {
            // A gap breaks the recursion for the rest of the series.
            return result;
        }
        let smoothed = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = smoothed;
        prev = smoothed;
    }

    result
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        columns::ATR
    }

    fn lookback(&self) -> usize {
        self.period - 1
    }

    fn compute(&self, rows: &[PriceRow]) -> Vec<f64> {
        let tr = true_range(rows);
        match self.smoothing {
            AtrSmoothing::Simple => rolling_mean(&tr, self.period),
            AtrSmoothing::Wilder => wilder_smooth(&tr, self.period),
        }
    }
}
