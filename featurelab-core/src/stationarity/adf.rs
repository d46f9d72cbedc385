//! Augmented Dickey-Fuller unit-root test (constant, fixed lag order).
//!
//! Regression: Δy_t = α + β·y_{t-1} + Σ_{i=1..p} γ_i·Δy_{t-i} + ε_t, solved by
//! OLS. The statistic is the t-ratio of β. The p-value follows MacKinnon's
//! (1994) response surface for the constant-only case with one variable; the
//! critical values follow MacKinnon (2010).

use nalgebra::{DMatrix, DVector};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal};

/// Below this many observations the test is not attempted.
pub const MIN_OBSERVATIONS: usize = 10;

const TAU_MAX: f64 = 2.74;
const TAU_MIN: f64 = -18.83;
const TAU_STAR: f64 = -1.61;
const TAU_SMALL_P: [f64; 3] = [2.1659, 1.4412, 0.038269];
const TAU_LARGE_P: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];

/// Finite-sample response surface coefficients (b0, b1, b2, b3) for τ_c.
const CRIT_1: [f64; 4] = [-3.43035, -6.5393, -16.786, -79.433];
const CRIT_5: [f64; 4] = [-2.86154, -2.8903, -4.234, -40.040];
const CRIT_10: [f64; 4] = [-2.56677, -1.5384, -2.809, 0.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CriticalValues {
    pub one_pct: f64,
    pub five_pct: f64,
    pub ten_pct: f64,
}

impl CriticalValues {
    pub fn for_observations(n: usize) -> Self {
        let surface = |b: [f64; 4]| {
            let inv = 1.0 / n as f64;
            b[0] + b[1] * inv + b[2] * inv * inv + b[3] * inv * inv * inv
        };
        Self {
            one_pct: surface(CRIT_1),
            five_pct: surface(CRIT_5),
            ten_pct: surface(CRIT_10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AdfResult {
    /// t-ratio of the lagged level; NaN when the test could not be run.
    pub statistic: f64,
    pub p_value: f64,
    pub lags: usize,
    /// Observations used in the regression.
    pub n_obs: usize,
    pub critical_values: CriticalValues,
}

impl AdfResult {
    fn degenerate(lags: usize, n_obs: usize) -> Self {
        Self {
            statistic: f64::NAN,
            p_value: 1.0,
            lags,
            n_obs,
            critical_values: CriticalValues::for_observations(n_obs.max(1)),
        }
    }

    /// True if the unit-root null is rejected at `significance`.
    /// A test that could not be run never rejects.
    pub fn rejects_unit_root(&self, significance: f64) -> bool {
        self.statistic.is_finite() && self.p_value < significance
    }
}

/// Run the ADF test on `series`. Non-finite values are skipped.
pub fn adf_test(series: &[f64], lags: usize) -> AdfResult {
    let data: Vec<f64> = series.iter().copied().filter(|v| v.is_finite()).collect();
    let n = data.len();
    if n < MIN_OBSERVATIONS {
        return AdfResult::degenerate(lags, 0);
    }

    let diff: Vec<f64> = data.windows(2).map(|w| w[1] - w[0]).collect();
    let regressors = 2 + lags;
    let n_obs = diff.len().saturating_sub(lags);
    if n_obs <= regressors + 1 {
        return AdfResult::degenerate(lags, n_obs);
    }

    let mut x = Vec::with_capacity(n_obs * regressors);
    for t in lags..diff.len() {
        x.push(1.0);
        x.push(data[t]);
        for i in 1..=lags {
            x.push(diff[t - i]);
        }
    }
    let x = DMatrix::from_row_slice(n_obs, regressors, &x);
    let y = DVector::from_column_slice(&diff[lags..]);

    let xtx = x.transpose() * &x;
    let Some(xtx_inv) = xtx.try_inverse() else {
        return AdfResult::degenerate(lags, n_obs);
    };
    let beta = &xtx_inv * (x.transpose() * &y);
    let residuals = &y - &x * &beta;
    let sse = residuals.dot(&residuals);
    let mse = sse / (n_obs - regressors) as f64;
    let se = (mse * xtx_inv[(1, 1)]).sqrt();
    let statistic = beta[1] / se;
    if !statistic.is_finite() || se <= 0.0 {
        return AdfResult::degenerate(lags, n_obs);
    }

    AdfResult {
        statistic,
        p_value: mackinnon_p_value(statistic),
        lags,
        n_obs,
        critical_values: CriticalValues::for_observations(n_obs),
    }
}

/// Approximate asymptotic p-value of a τ_c statistic.
pub fn mackinnon_p_value(statistic: f64) -> f64 {
    if statistic > TAU_MAX {
        return 1.0;
    }
    if statistic < TAU_MIN {
        return 0.0;
    }
    let coefficients: &[f64] = if statistic <= TAU_STAR {
        &TAU_SMALL_P
    } else {
        &TAU_LARGE_P
    };
    let z = coefficients
        .iter()
        .rev()
        .fold(0.0, |acc, c| acc * statistic + c);
    match Normal::new(0.0, 1.0) {
        Ok(normal) => normal.cdf(z),
        Err(_) => f64::NAN,
    }
}
