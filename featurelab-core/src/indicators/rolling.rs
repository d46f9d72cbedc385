//! Trailing rolling-window statistics over plain series.
//!
//! Every function is pure, returns a series of the input length, and yields
//! NaN at row t unless the full window `t+1-window..=t` holds finite values.
//! Each window is summed afresh, so no floating error accumulates across rows.

/// The trailing window ending at `end` when it is complete and fully finite.
fn full_window(values: &[f64], end: usize, window: usize) -> Option<&[f64]> {
    if window == 0 || end + 1 < window {
        return None;
    }
    let slice = &values[end + 1 - window..=end];
    slice.iter().all(|v| v.is_finite()).then_some(slice)
}

fn rolling_apply(values: &[f64], window: usize, f: impl Fn(&[f64]) -> f64) -> Vec<f64> {
    (0..values.len())
        .map(|i| full_window(values, i, window).map_or(f64::NAN, &f))
        .collect()
}

fn mean(slice: &[f64]) -> f64 {
    slice.iter().sum::<f64>() / slice.len() as f64
}

/// Sample variance (divide by N-1). A single value has no sample variance.
fn sample_variance(slice: &[f64]) -> f64 {
    if slice.len() < 2 {
        return f64::NAN;
    }
    let m = mean(slice);
    slice.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (slice.len() - 1) as f64
}

pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, mean)
}

pub fn rolling_var(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, sample_variance)
}

pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, |w| sample_variance(w).sqrt())
}

pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, |w| w.iter().copied().fold(f64::INFINITY, f64::min))
}

pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, |w| {
        w.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    })
}

/// Element-wise |a - b|.
pub fn abs_diff(a: &[f64], b: &[f64]) -> Vec<f64> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(x, y)| (x - y).abs()).collect()
}
