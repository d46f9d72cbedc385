//! Fixed-width-window fractional differencing.
//!
//! The binomial expansion of (1 - B)^d gives weights
//! `w_0 = 1, w_k = -w_{k-1} * (d - k + 1) / k`. The window is cut at the first
//! weight whose magnitude drops below the threshold, so every output value uses
//! the same number of past observations and the result never looks forward.

/// Weights of the fixed-width window, `w_0` first.
///
/// `d = 0` yields `[1.0]`. Integer `d` terminates exactly once a weight hits
/// zero. The window is capped at `max_width` so a tiny threshold cannot
/// produce a window longer than the series.
pub fn ffd_weights(d: f64, threshold: f64, max_width: usize) -> Vec<f64> {
    let mut weights = vec![1.0];
    let mut k = 1usize;
    while weights.len() < max_width {
        let prev = weights[k - 1];
        let w = -prev * (d - k as f64 + 1.0) / k as f64;
        if w.abs() < threshold {
            break;
        }
        weights.push(w);
        k += 1;
    }
    weights
}

/// Fractionally difference `series` at order `d`.
///
/// Output has the input length; the first `width - 1` rows are NaN, as is any
/// row whose window contains a non-finite input.
pub fn frac_diff(series: &[f64], d: f64, threshold: f64) -> Vec<f64> {
    let n = series.len();
    if n == 0 {
        return Vec::new();
    }
    let weights = ffd_weights(d, threshold, n);
    let width = weights.len();

    let mut out = vec![f64::NAN; n];
    for t in (width - 1)..n {
        let mut acc = 0.0;
        for (k, w) in weights.iter().enumerate() {
            acc += w * series[t - k];
        }
        if acc.is_finite() {
            out[t] = acc;
        }
    }
    out
}
