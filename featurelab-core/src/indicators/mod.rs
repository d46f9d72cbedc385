//! Indicator traits and concrete signal implementations.
//!
//! Indicators are pure functions: price history in, numeric series out, one
//! value per row. They come in two categories that must never be confused:
//!
//! - [`Indicator`]: backward-looking. The value at row t depends only on rows
//!   `..=t`; the first `lookback()` values are NaN.
//! - [`ForwardIndicator`]: forward-looking by `horizon()` rows. The last
//!   `horizon()` values are NaN and the owning table must be trimmed by that
//!   many rows before it is handed to anyone.

use crate::domain::PriceRow;

pub mod atr;
pub mod forward;
pub mod returns;
pub mod rolling;
pub mod volatility;

pub use atr::{true_range, Atr, AtrSmoothing};
pub use forward::{ForwardMove, ForwardRange};
pub use returns::{IntradayGain, LogReturn, NightGain, SimpleReturn};
pub use volatility::{Volatility, VolatilityPct, TRADING_DAYS_PER_YEAR};

/// Backward-looking indicator.
///
/// # Look-ahead contamination guard
/// No value at row t may depend on price data from row t+1 or later.
/// Every implementation must pass the truncated-vs-full series test.
pub trait Indicator: Send + Sync {
    /// Name of the column this indicator produces.
    fn name(&self) -> &str;

    /// Number of leading rows that are NaN (warmup).
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire series. Output length equals input length.
    fn compute(&self, rows: &[PriceRow]) -> Vec<f64>;
}

/// Forward-looking quantity, used only to build the target label.
pub trait ForwardIndicator: Send + Sync {
    fn name(&self) -> &str;

    /// Number of future rows each value needs; also the number of trailing NaNs.
    fn horizon(&self) -> usize;

    fn compute(&self, rows: &[PriceRow]) -> Vec<f64>;
}

/// Create synthetic rows from close prices for testing.
///
/// open = prev_close (or close for the first row), high = max(open,close) + 1,
/// low = min(open,close) - 1, volume = 1000.
#[cfg(test)]
pub fn make_rows(closes: &[f64]) -> Vec<PriceRow> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            PriceRow {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
