//! Seeded synthetic price histories for demos, benches and tests.
//!
//! A random walk from 100.0 on weekdays only. The seed is the BLAKE3 hash of
//! the ticker, so the same ticker always yields the same rows.

use super::provider::{normalize_rows, DataError, PriceRequest, PriceSource};
use crate::domain::PriceRow;
use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate `count` weekday rows starting at `start`.
pub fn synthetic_rows(ticker: &str, start: NaiveDate, count: usize) -> Vec<PriceRow> {
    let seed: [u8; 32] = *blake3::hash(ticker.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let mut rows = Vec::with_capacity(count);
    let mut price = 100.0_f64;
    let mut current = start;
    while rows.len() < count {
        if matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            current += chrono::Duration::days(1);
            continue;
        }

        let daily_return: f64 = rng.gen_range(-0.03..0.03);
        let open = price * (1.0 + rng.gen_range(-0.005..0.005));
        let close = price * (1.0 + daily_return);
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
        let volume = rng.gen_range(500_000..5_000_000u64) as f64;

        rows.push(PriceRow::from_raw(current, open, high, low, close, volume));
        price = close;
        current += chrono::Duration::days(1);
    }
    rows
}

/// `PriceSource` backed by [`synthetic_rows`].
#[derive(Debug, Clone)]
pub struct SyntheticPriceSource {
    start: NaiveDate,
    rows: usize,
}

impl SyntheticPriceSource {
    pub fn new(start: NaiveDate, rows: usize) -> Self {
        Self { start, rows }
    }
}

impl PriceSource for SyntheticPriceSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(&self, request: &PriceRequest) -> Result<Vec<PriceRow>, DataError> {
        if request.ticker.is_empty() {
            return Err(DataError::ValidationError("empty ticker".into()));
        }
        let rows = synthetic_rows(&request.ticker, self.start, self.rows);
        Ok(normalize_rows(rows, request.lookback_years))
    }
}
