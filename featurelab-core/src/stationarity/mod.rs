//! Minimal-order fractional differencing per source column.
//!
//! For each configured source the transformer walks the differencing grid
//! from `d_min` upward and stops at the first order whose fixed-width
//! fractional difference passes the ADF test. Sources that never pass are
//! emitted at the last tested order and flagged.

pub mod adf;
pub mod fracdiff;

pub use adf::{adf_test, mackinnon_p_value, AdfResult, CriticalValues};
pub use fracdiff::{frac_diff, ffd_weights};

use crate::config::MAX_TESTED_ORDERS;
use crate::domain::columns::{self, ffd_column};
use crate::domain::{FeatureTable, TableError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StationarityConfig {
    /// Columns to transform, in output order.
    pub sources: Vec<String>,
    pub significance: f64,
    pub d_min: f64,
    pub d_step: f64,
    pub d_max: f64,
    /// FFD weights smaller than this in magnitude end the window.
    pub weight_threshold: f64,
    pub adf_lags: usize,
}

impl Default for StationarityConfig {
    fn default() -> Self {
        Self {
            sources: [
                columns::OPEN,
                columns::HIGH,
                columns::LOW,
                columns::CLOSE,
                columns::VOLUME,
                columns::RETURN,
                columns::LOG_RETURN,
                columns::NIGHT_GAIN,
                columns::INTRADAY_GAIN,
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            significance: 0.05,
            d_min: 0.0,
            d_step: 0.1,
            d_max: 1.0,
            weight_threshold: 0.01,
            adf_lags: 1,
        }
    }
}

impl StationarityConfig {
    /// Number of orders [`d_grid`](Self::d_grid) would test without the cap,
    /// computed in floating point so absurd steps cannot overflow.
    pub fn order_count(&self) -> f64 {
        if !(self.d_step > 0.0) || self.d_max < self.d_min {
            return 1.0;
        }
        let steps = ((self.d_max - self.d_min) / self.d_step + 1e-9).floor();
        if !steps.is_finite() {
            return f64::INFINITY;
        }
        let last = self.d_min + steps * self.d_step;
        let tail = if self.d_max - last > 1e-9 { 1.0 } else { 0.0 };
        steps + 1.0 + tail
    }

    /// Differencing orders to test, ascending. Ends at `d_max` unless the
    /// grid is longer than `MAX_TESTED_ORDERS`, in which case it is cut there.
    pub fn d_grid(&self) -> Vec<f64> {
        if !(self.d_step > 0.0) || self.d_max < self.d_min {
            return vec![self.d_min];
        }
        let steps = ((self.d_max - self.d_min) / self.d_step + 1e-9).floor();
        if !(steps < MAX_TESTED_ORDERS as f64) {
            return (0..MAX_TESTED_ORDERS)
                .map(|i| round_order(self.d_min + i as f64 * self.d_step))
                .collect();
        }
        let steps = steps as usize;
        let mut grid: Vec<f64> = (0..=steps)
            .map(|i| round_order(self.d_min + i as f64 * self.d_step))
            .collect();
        if grid.last().is_some_and(|&last| self.d_max - last > 1e-9) {
            grid.push(self.d_max);
        }
        grid
    }
}

fn round_order(d: f64) -> f64 {
    (d * 1e9).round() / 1e9
}

/// A transformed series and the test outcome that selected it.
#[derive(Debug, Clone, PartialEq)]
pub struct StationarySeries {
    pub source: String,
    pub d: f64,
    pub values: Vec<f64>,
    pub adf: AdfResult,
    pub stationary: bool,
}

impl StationarySeries {
    pub fn column_name(&self) -> String {
        ffd_column(&self.source)
    }

    pub fn report(&self) -> StationarityReport {
        StationarityReport {
            source: self.source.clone(),
            column: self.column_name(),
            d: self.d,
            adf_statistic: self.adf.statistic,
            p_value: self.adf.p_value,
            stationary: self.stationary,
        }
    }
}

/// Summary of one source's search, without the values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationarityReport {
    pub source: String,
    pub column: String,
    pub d: f64,
    pub adf_statistic: f64,
    pub p_value: f64,
    pub stationary: bool,
}

#[derive(Debug, Clone)]
pub struct StationarityTransformer {
    config: StationarityConfig,
}

impl StationarityTransformer {
    pub fn new(config: StationarityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StationarityConfig {
        &self.config
    }

    /// Find the smallest order on the grid at which `values` becomes stationary.
    pub fn search(&self, source: &str, values: &[f64]) -> StationarySeries {
        let cfg = &self.config;
        let mut last = None;
        for d in cfg.d_grid() {
            let transformed = frac_diff(values, d, cfg.weight_threshold);
            let adf = adf_test(&transformed, cfg.adf_lags);
            debug!(
                source,
                d,
                statistic = adf.statistic,
                p_value = adf.p_value,
                "adf"
            );
            if adf.rejects_unit_root(cfg.significance) {
                return StationarySeries {
                    source: source.to_string(),
                    d,
                    values: transformed,
                    adf,
                    stationary: true,
                };
            }
            last = Some((d, transformed, adf));
        }

        let (d, values, adf) = match last {
            Some(found) => found,
            None => {
                let transformed = frac_diff(values, cfg.d_max, cfg.weight_threshold);
                let adf = adf_test(&transformed, cfg.adf_lags);
                (cfg.d_max, transformed, adf)
            }
        };
        warn!(
            source,
            d,
            p_value = adf.p_value,
            "stationarity not achieved on the differencing grid, emitting last order"
        );
        StationarySeries {
            source: source.to_string(),
            d,
            values,
            adf,
            stationary: false,
        }
    }

    /// Run the search for every configured source in parallel.
    /// Results come back in configuration order.
    pub fn transform(&self, table: &FeatureTable) -> Result<Vec<StationarySeries>, TableError> {
        self.config
            .sources
            .par_iter()
            .map(|source| {
                let values = table
                    .column(source)
                    .ok_or_else(|| TableError::MissingColumn(source.clone()))?;
                Ok(self.search(source, values))
            })
            .collect()
    }
}
