//! Signal derivation: volatility, ATR, forward moves and return statistics.
//!
//! Every column is an independent pure function of the immutable price rows
//! (or of another finished column), so the order columns are appended in
//! cannot change any value. The returned table is full length: forward
//! columns are NaN in the last `window` rows and backward columns are NaN
//! during their warmup. Trimming and row dropping belong to the pipeline.

use crate::domain::{columns, FeatureTable, PriceRow, TableError};
use crate::indicators::rolling::{abs_diff, rolling_mean, rolling_std, rolling_var};
use crate::indicators::{
    Atr, AtrSmoothing, ForwardIndicator, ForwardMove, ForwardRange, Indicator, IntradayGain,
    LogReturn, NightGain, SimpleReturn, Volatility, VolatilityPct, TRADING_DAYS_PER_YEAR,
};

#[derive(Debug, Clone)]
pub struct SignalDeriver {
    window: usize,
    long_window: usize,
    atr_smoothing: AtrSmoothing,
}

impl SignalDeriver {
    pub fn new(window: usize, atr_smoothing: AtrSmoothing) -> Self {
        assert!(window >= 2, "signal window must be >= 2");
        Self {
            window,
            long_window: TRADING_DAYS_PER_YEAR,
            atr_smoothing,
        }
    }

    /// Override the volatility window (defaults to one trading year).
    pub fn with_long_window(mut self, long_window: usize) -> Self {
        self.long_window = long_window;
        self
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Rows at the end of the table that have no forward value.
    pub fn forward_horizon(&self) -> usize {
        self.window
    }

    /// Leading rows without a complete backward history.
    pub fn warmup(&self) -> usize {
        let volatility_pct = VolatilityPct::new(self.window, self.long_window).lookback();
        let atr_avg_diff = 2 * (self.window - 1);
        let rolling_returns = self.window;
        volatility_pct.max(atr_avg_diff).max(rolling_returns)
    }

    /// Compute every signal column on top of the raw price columns.
    pub fn derive(&self, rows: &[PriceRow]) -> Result<FeatureTable, TableError> {
        let w = self.window;
        let mut table = FeatureTable::from_rows(rows);

        let volatility = Volatility::new(self.long_window).compute(rows);
        let volatility_pct = VolatilityPct::new(w, self.long_window).from_volatility(&volatility);
        let atr = Atr::new(w, self.atr_smoothing).compute(rows);

        let forward_range = ForwardRange::new(w);
        let forward_move = ForwardMove::new(w);
        debug_assert_eq!(forward_range.horizon(), self.forward_horizon());
        let atr_forward = forward_range.compute(rows);
        let forward_diff = forward_move.compute(rows);
        let atr_diff = abs_diff(&atr_forward, &atr);
        let atr_avg_diff = rolling_mean(&atr_diff, w);

        let log_return = LogReturn.compute(rows);
        let simple_return = SimpleReturn.compute(rows);

        table.push_column(columns::VOLATILITY, volatility)?;
        table.push_column(columns::VOLATILITY_PCT, volatility_pct)?;
        table.push_column(columns::ATR, atr)?;
        table.push_column(columns::ATR_FORWARD, atr_forward)?;
        table.push_column(columns::FORWARD_DIFF, forward_diff)?;
        table.push_column(columns::ATR_DIFF, atr_diff)?;
        table.push_column(columns::ATR_AVG_DIFF, atr_avg_diff)?;
        table.push_column(columns::VAR_LOG_RETURN, rolling_var(&log_return, w))?;
        table.push_column(columns::STD_LOG_RETURN, rolling_std(&log_return, w))?;
        table.push_column(columns::LOG_RETURN, log_return)?;
        table.push_column(columns::VAR_RETURN, rolling_var(&simple_return, w))?;
        table.push_column(columns::STD_RETURN, rolling_std(&simple_return, w))?;
        table.push_column(columns::RETURN, simple_return)?;
        table.push_column(columns::NIGHT_GAIN, NightGain.compute(rows))?;
        table.push_column(columns::INTRADAY_GAIN, IntradayGain.compute(rows))?;

        Ok(table)
    }
}
