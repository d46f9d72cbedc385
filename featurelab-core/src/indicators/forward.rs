//! Forward-looking realized quantities over a fixed horizon.
//!
//! - `ATR_15`: |close[t] - close[t+h]|, the realized range
//! - `15Diff`: close[t+h] - close[t], the realized signed move
//!
//! The last `h` rows have no future close and are NaN. These columns feed the
//! target label only and must never reach the model.

use super::ForwardIndicator;
use crate::domain::{columns, PriceRow};

fn forward_delta(rows: &[PriceRow], horizon: usize) -> Vec<f64> {
    let n = rows.len();
    let mut out = vec![f64::NAN; n];
    for t in 0..n.saturating_sub(horizon) {
        out[t] = rows[t + horizon].close - rows[t].close;
    }
    out
}

#[derive(Debug, Clone)]
pub struct ForwardRange {
    horizon: usize,
}

impl ForwardRange {
    pub fn new(horizon: usize) -> Self {
        assert!(horizon >= 1, "forward horizon must be >= 1");
        Self { horizon }
    }
}

impl ForwardIndicator for ForwardRange {
    fn name(&self) -> &str {
        columns::ATR_FORWARD
    }

    fn horizon(&self) -> usize {
        self.horizon
    }

    fn compute(&self, rows: &[PriceRow]) -> Vec<f64> {
        forward_delta(rows, self.horizon)
            .into_iter()
            .map(f64::abs)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ForwardMove {
    horizon: usize,
}

impl ForwardMove {
    pub fn new(horizon: usize) -> Self {
        assert!(horizon >= 1, "forward horizon must be >= 1");
        Self { horizon }
    }
}

impl ForwardIndicator for ForwardMove {
    fn name(&self) -> &str {
        columns::FORWARD_DIFF
    }

    fn horizon(&self) -> usize {
        self.horizon
    }

    fn compute(&self, rows: &[PriceRow]) -> Vec<f64> {
        forward_delta(rows, self.horizon)
    }
}
