//! Classical additive decomposition: value = trend + seasonal + residual.
//!
//! Only the residual is kept as a feature. The trend is a moving average of
//! one period, trailing by default so that trend[t] uses rows `..=t`.

use crate::domain::columns::{self, residual_column};
use crate::domain::{FeatureTable, TableError};
use crate::indicators::rolling::rolling_mean;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One trading week.
pub const DEFAULT_PERIOD: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecompositionConfig {
    pub sources: Vec<String>,
    pub period: usize,
    /// Use a centered moving average for the trend instead of a trailing one.
    pub two_sided: bool,
}

impl Default for DecompositionConfig {
    fn default() -> Self {
        Self {
            sources: columns::PRICE_COLUMNS.iter().map(|s| s.to_string()).collect(),
            period: DEFAULT_PERIOD,
            two_sided: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    pub trend: Vec<f64>,
    pub seasonal: Vec<f64>,
    pub residual: Vec<f64>,
}

/// Decompose `values` with a fixed `period`.
///
/// Fewer than two full periods yields all-NaN components.
pub fn decompose_additive(values: &[f64], period: usize, two_sided: bool) -> Decomposition {
    let n = values.len();
    if period < 2 || n < 2 * period {
        return Decomposition {
            trend: vec![f64::NAN; n],
            seasonal: vec![f64::NAN; n],
            residual: vec![f64::NAN; n],
        };
    }

    let trend = if two_sided {
        centered_mean(values, period)
    } else {
        rolling_mean(values, period)
    };

    let mut sums = vec![0.0; period];
    let mut counts = vec![0usize; period];
    for (i, (v, t)) in values.iter().zip(&trend).enumerate() {
        let detrended = v - t;
        if detrended.is_finite() {
            sums[i % period] += detrended;
            counts[i % period] += 1;
        }
    }
    let mut indices: Vec<f64> = sums
        .iter()
        .zip(&counts)
        .map(|(s, &c)| if c > 0 { s / c as f64 } else { f64::NAN })
        .collect();
    let center = indices.iter().sum::<f64>() / period as f64;
    for idx in &mut indices {
        *idx -= center;
    }

    let seasonal: Vec<f64> = (0..n).map(|i| indices[i % period]).collect();
    let residual = values
        .iter()
        .zip(&trend)
        .zip(&seasonal)
        .map(|((v, t), s)| v - t - s)
        .collect();

    Decomposition {
        trend,
        seasonal,
        residual,
    }
}

/// Centered moving average; even periods use a 2×period filter with half
/// weights at both ends.
fn centered_mean(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let half = period / 2;
    let weights: Vec<f64> = if period % 2 == 1 {
        vec![1.0 / period as f64; period]
    } else {
        let mut w = vec![1.0 / period as f64; period + 1];
        w[0] *= 0.5;
        w[period] *= 0.5;
        w
    };

    let mut out = vec![f64::NAN; n];
    for t in half..n.saturating_sub(half) {
        let window = &values[t - half..t - half + weights.len()];
        out[t] = window.iter().zip(&weights).map(|(v, w)| v * w).sum();
    }
    out
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecompositionResidual {
    pub source: String,
    pub period: usize,
    pub values: Vec<f64>,
}

impl DecompositionResidual {
    pub fn column_name(&self) -> String {
        residual_column(&self.source)
    }
}

#[derive(Debug, Clone)]
pub struct SeriesDecomposer {
    config: DecompositionConfig,
}

impl SeriesDecomposer {
    pub fn new(config: DecompositionConfig) -> Self {
        Self { config }
    }

    pub fn residual(&self, source: &str, values: &[f64]) -> DecompositionResidual {
        let parts = decompose_additive(values, self.config.period, self.config.two_sided);
        DecompositionResidual {
            source: source.to_string(),
            period: self.config.period,
            values: parts.residual,
        }
    }

    /// Residuals for every configured source, in configuration order.
    pub fn transform(&self, table: &FeatureTable) -> Result<Vec<DecompositionResidual>, TableError> {
        self.config
            .sources
            .par_iter()
            .map(|source| {
                let values = table
                    .column(source)
                    .ok_or_else(|| TableError::MissingColumn(source.clone()))?;
                Ok(self.residual(source, values))
            })
            .collect()
    }
}
