//! Annualized close-to-close volatility and its short-window percentile.
//!
//! Volatility[t] = std(Return over `long_window`) * sqrt(252) * 100 / close[t]
//! Volatility_Pct[t] = (Volatility - min) / (max - min) over `window` rows.
//!
//! A flat `window` (max == min) is 0/0 and stays NaN so the row is dropped
//! later; it is never replaced by zero.

use super::returns::SimpleReturn;
use super::rolling::{rolling_max, rolling_min, rolling_std};
use super::Indicator;
use crate::domain::{columns, PriceRow};

/// Trading days per year, used both as the long window and the annualization factor.
pub const TRADING_DAYS_PER_YEAR: usize = 252;

#[derive(Debug, Clone)]
pub struct Volatility {
    long_window: usize,
}

impl Volatility {
    pub fn new(long_window: usize) -> Self {
        assert!(long_window >= 2, "volatility window must be >= 2");
        Self { long_window }
    }
}

impl Default for Volatility {
    fn default() -> Self {
        Self::new(TRADING_DAYS_PER_YEAR)
    }
}

impl Indicator for Volatility {
    fn name(&self) -> &str {
        columns::VOLATILITY
    }

    /// The return series starts one row late.
    fn lookback(&self) -> usize {
        self.long_window
    }

    fn compute(&self, rows: &[PriceRow]) -> Vec<f64> {
        let returns = SimpleReturn.compute(rows);
        let annualization = (TRADING_DAYS_PER_YEAR as f64).sqrt() * 100.0;
        rolling_std(&returns, self.long_window)
            .iter()
            .zip(rows)
            .map(|(std, row)| std * annualization / row.close)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct VolatilityPct {
    window: usize,
    volatility: Volatility,
}

impl VolatilityPct {
    pub fn new(window: usize, long_window: usize) -> Self {
        assert!(window >= 1, "volatility percentile window must be >= 1");
        Self {
            window,
            volatility: Volatility::new(long_window),
        }
    }

    /// Normalize an already computed volatility series.
    pub fn from_volatility(&self, volatility: &[f64]) -> Vec<f64> {
        let lo = rolling_min(volatility, self.window);
        let hi = rolling_max(volatility, self.window);
        volatility
            .iter()
            .zip(lo.iter().zip(&hi))
            .map(|(v, (lo, hi))| {
                let range = hi - lo;
                if range == 0.0 {
                    f64::NAN
                } else {
                    (v - lo) / range
                }
            })
            .collect()
    }
}

impl Indicator for VolatilityPct {
    fn name(&self) -> &str {
        columns::VOLATILITY_PCT
    }

    fn lookback(&self) -> usize {
        self.volatility.lookback() + self.window - 1
    }

    fn compute(&self, rows: &[PriceRow]) -> Vec<f64> {
        self.from_volatility(&self.volatility.compute(rows))
    }
}
