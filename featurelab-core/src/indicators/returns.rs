//! Close-over-close returns and session gains.
//!
//! - `Return`: close[t] / close[t-1] - 1 (lookback 1)
//! - `LogReturn`: log10(close[t] / close[t-1]) (lookback 1)
//! - `NightGain`: open[t] / close[t-1] - 1 (lookback 1)
//! - `IntradayGain`: close[t] / open[t] - 1 (lookback 0)

use super::Indicator;
use crate::domain::{columns, PriceRow};

/// Apply `f(prev, cur)` to consecutive rows; the first row is NaN.
fn over_pairs(rows: &[PriceRow], f: impl Fn(&PriceRow, &PriceRow) -> f64) -> Vec<f64> {
    let mut out = vec![f64::NAN; rows.len()];
    for i in 1..rows.len() {
        out[i] = f(&rows[i - 1], &rows[i]);
    }
    out
}

#[derive(Debug, Clone, Default)]
pub struct SimpleReturn;

impl Indicator for SimpleReturn {
    fn name(&self) -> &str {
        columns::RETURN
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, rows: &[PriceRow]) -> Vec<f64> {
        over_pairs(rows, |prev, cur| cur.close / prev.close - 1.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LogReturn;

impl Indicator for LogReturn {
    fn name(&self) -> &str {
        columns::LOG_RETURN
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, rows: &[PriceRow]) -> Vec<f64> {
        over_pairs(rows, |prev, cur| (cur.close / prev.close).log10())
    }
}

#[derive(Debug, Clone, Default)]
pub struct NightGain;

impl Indicator for NightGain {
    fn name(&self) -> &str {
        columns::NIGHT_GAIN
    }

    fn lookback(&self) -> usize {
        1
    }

    fn compute(&self, rows: &[PriceRow]) -> Vec<f64> {
        over_pairs(rows, |prev, cur| cur.open / prev.close - 1.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct IntradayGain;

impl Indicator for IntradayGain {
    fn name(&self) -> &str {
        columns::INTRADAY_GAIN
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, rows: &[PriceRow]) -> Vec<f64> {
        rows.iter().map(|r| r.close / r.open - 1.0).collect()
    }
}
