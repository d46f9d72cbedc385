//! PriceRow: one calendar day of OHLCV for a single instrument.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV row.
///
/// Prices are rounded up to whole cents when built through [`PriceRow::from_raw`].
/// Volume is a float: zero imputation averages neighbours and may produce halves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceRow {
    /// Build a row from provider values, ceiling-rounding the four prices to cents.
    pub fn from_raw(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open: round_up_cents(open),
            high: round_up_cents(high),
            low: round_up_cents(low),
            close: round_up_cents(close),
            volume,
        }
    }

    /// Returns true if any OHLCV field is NaN or infinite.
    pub fn has_missing(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite())
    }

    /// Returns true if any OHLCV field is exactly zero.
    pub fn has_zero(&self) -> bool {
        self.open == 0.0
            || self.high == 0.0
            || self.low == 0.0
            || self.close == 0.0
            || self.volume == 0.0
    }

    /// Basic sanity: positive prices and a consistent high/low envelope.
    pub fn is_sane(&self) -> bool {
        if self.has_missing() {
            return false;
        }
        self.open > 0.0
            && self.high > 0.0
            && self.low > 0.0
            && self.close > 0.0
            && self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
    }
}

/// Round up to two decimals (ceiling, not banker's rounding).
///
/// A product within 1e-6 of a whole cent is snapped to it first: `1.1 * 100.0`
/// is `110.00000000000001` in binary and must stay at 1.10.
pub fn round_up_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scaled = value * 100.0;
    let nearest = scaled.round();
    if (scaled - nearest).abs() < 1e-6 {
        nearest / 100.0
    } else {
        scaled.ceil() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> PriceRow {
        PriceRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            open: 100.0,
            high: 105.0,
            low: 98.0,
            close: 103.0,
            volume: 50_000.0,
        }
    }

    #[test]
    fn round_up_is_ceiling() {
        assert_eq!(round_up_cents(10.001), 10.01);
        assert_eq!(round_up_cents(10.009), 10.01);
        assert_eq!(round_up_cents(-1.239), -1.23);
    }

    #[test]
    fn round_up_keeps_exact_cents() {
        assert_eq!(round_up_cents(1.1), 1.1);
        assert_eq!(round_up_cents(0.29), 0.29);
        assert_eq!(round_up_cents(42.0), 42.0);
        assert_eq!(round_up_cents(612_345.25), 612_345.25);
        assert_eq!(round_up_cents(422_600.07), 422_600.07);
    }

    #[test]
    fn round_up_passes_nan_through() {
        assert!(round_up_cents(f64::NAN).is_nan());
    }

    #[test]
    fn from_raw_rounds_prices_not_volume() {
        let row = PriceRow::from_raw(
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            100.001,
            101.2345,
            99.0,
            100.5,
            1234.567,
        );
        assert_eq!(row.open, 100.01);
        assert_eq!(row.high, 101.24);
        assert_eq!(row.low, 99.0);
        assert_eq!(row.close, 100.5);
        assert_eq!(row.volume, 1234.567);
    }

    #[test]
    fn row_is_sane() {
        assert!(sample_row().is_sane());
    }

    #[test]
    fn row_detects_missing_and_zero() {
        let mut row = sample_row();
        row.volume = 0.0;
        assert!(row.has_zero());
        assert!(!row.has_missing());
        row.close = f64::NAN;
        assert!(row.has_missing());
        assert!(!row.is_sane());
    }

    #[test]
    fn row_serialization_roundtrip() {
        let row = sample_row();
        let json = serde_json::to_string(&row).unwrap();
        let deser: PriceRow = serde_json::from_str(&json).unwrap();
        assert_eq!(row, deser);
    }
}
