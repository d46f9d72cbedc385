//! Property tests for pipeline invariants.
//!
//! Uses proptest to verify:
//! 1. Quality gate: short histories are always rejected as too small
//! 2. Zero imputation: isolated interior zeros are always filled
//! 3. Signals: ATR_Diff is non-negative, Target is ternary and only fires on divergence
//! 4. Forward columns: ATR_15 and 15Diff reproduce from the close series bit for bit

use chrono::NaiveDate;
use featurelab_core::domain::{columns, FeatureTable, PriceRow, Target};
use featurelab_core::indicators::AtrSmoothing;
use featurelab_core::labeler::append_target;
use featurelab_core::quality::{DataQualityGate, QualityFailure};
use featurelab_core::signals::SignalDeriver;
use proptest::prelude::*;
use std::collections::HashMap;

// ── Strategies (proptest) ────────────────────────────────────────────

fn build_rows(steps: &[(f64, f64, f64)]) -> Vec<PriceRow> {
    let base = NaiveDate::from_ymd_opt(2015, 1, 5).unwrap();
    let mut price = 50.0_f64;
    steps
        .iter()
        .enumerate()
        .map(|(i, &(ret, up, down))| {
            let open = price;
            let close = (price * (1.0 + ret)).max(1.0);
            price = close;
            PriceRow::from_raw(
                base + chrono::Duration::days(i as i64),
                open,
                open.max(close) * (1.0 + up),
                open.min(close) * (1.0 - down),
                close,
                1000.0 + (i % 17) as f64 * 10.0,
            )
        })
        .collect()
}

fn arb_rows(min: usize, max: usize) -> impl Strategy<Value = Vec<PriceRow>> {
    prop::collection::vec((-0.04..0.04_f64, 0.0..0.02_f64, 0.0..0.02_f64), min..max)
        .prop_map(|steps| build_rows(&steps))
}

fn signal_table(rows: &[PriceRow], smoothing: AtrSmoothing) -> FeatureTable {
    let mut table = SignalDeriver::new(5, smoothing)
        .with_long_window(20)
        .derive(rows)
        .unwrap();
    append_target(&mut table).unwrap();
    table
}

// ── 1. Quality gate ──────────────────────────────────────────────────

proptest! {
    /// Fewer rows than the threshold is always rejected as too small.
    #[test]
    fn short_history_is_too_small(rows in arb_rows(0, 250), years in 1usize..4) {
        let gate = DataQualityGate::for_period(years, false);
        let report = gate.check(&rows).unwrap_err();
        let is_too_small = matches!(report.failures[0], QualityFailure::TooSmall { .. });
        prop_assert!(is_too_small);
        prop_assert_eq!(&report.reasons()[0], "The dataset is too small.");
    }
}

// ── 2. Zero imputation ───────────────────────────────────────────────

proptest! {
    /// Isolated interior zeros vanish with imputation and are all counted without it.
    #[test]
    fn imputation_removes_isolated_zeros(
        rows in arb_rows(40, 80),
        picks in prop::collection::btree_set(1usize..19, 1..6),
        field in 0usize..5,
    ) {
        let mut rows = rows;
        // Odd positions only, so no two zeros are neighbours.
        let positions: Vec<usize> = picks.iter().map(|p| 2 * p - 1).collect();
        for &i in &positions {
            let row = &mut rows[i];
            match field {
                0 => row.open = 0.0,
                1 => row.high = 0.0,
                2 => row.low = 0.0,
                3 => row.close = 0.0,
                _ => row.volume = 0.0,
            }
        }

        let strict = DataQualityGate::new(10, false).check(&rows).unwrap_err();
        prop_assert_eq!(
            strict.failures.clone(),
            vec![QualityFailure::ZeroValues { cells: positions.len() }]
        );

        let verdict = DataQualityGate::new(10, true).check(&rows).unwrap();
        prop_assert_eq!(verdict.report.imputed_cells, positions.len());
        prop_assert!(verdict.rows.iter().all(|r| !r.has_zero()));
    }
}

// ── 3. Signals and target ────────────────────────────────────────────

proptest! {
    #[test]
    fn atr_diff_is_non_negative(rows in arb_rows(40, 120)) {
        for smoothing in [AtrSmoothing::Simple, AtrSmoothing::Wilder] {
            let table = signal_table(&rows, smoothing);
            let diff = table.column(columns::ATR_DIFF).unwrap();
            prop_assert!(diff.iter().filter(|v| !v.is_nan()).all(|&v| v >= 0.0));
        }
    }

    /// Target is always one of {-1, 0, 1} and is 0 whenever ATR_Diff <= ATR_AvgDiff.
    #[test]
    fn target_only_fires_on_divergence(rows in arb_rows(40, 120)) {
        let table = signal_table(&rows, AtrSmoothing::Simple);
        let targets = table.targets();
        prop_assert!(targets.is_some());
        let targets = targets.unwrap();
        let diff = table.column(columns::ATR_DIFF).unwrap();
        let avg = table.column(columns::ATR_AVG_DIFF).unwrap();
        let fwd = table.column(columns::FORWARD_DIFF).unwrap();

        for i in 0..table.len() {
            if diff[i] <= avg[i] {
                prop_assert_eq!(targets[i], Target::Neutral);
            }
            match targets[i] {
                Target::Up => {
                    prop_assert!(fwd[i] > 0.0);
                }
                Target::Down => {
                    prop_assert!(fwd[i] < 0.0);
                }
                Target::Neutral => {}
            }
        }
    }
}

// ── 4. Forward columns round trip ────────────────────────────────────

proptest! {
    /// ATR_15 and 15Diff recomputed from the original closes, looked up by
    /// date, match the table bit for bit.
    #[test]
    fn forward_columns_reproduce_from_closes(rows in arb_rows(30, 100)) {
        let window = 5;
        let table = signal_table(&rows, AtrSmoothing::Simple);
        let index: HashMap<NaiveDate, usize> =
            rows.iter().enumerate().map(|(i, r)| (r.date, i)).collect();
        let range = table.column(columns::ATR_FORWARD).unwrap();
        let movement = table.column(columns::FORWARD_DIFF).unwrap();

        for (row, date) in table.dates().iter().enumerate() {
            let i = index[date];
            if i + window < rows.len() {
                let delta = rows[i + window].close - rows[i].close;
                prop_assert_eq!(movement[row].to_bits(), delta.to_bits());
                prop_assert_eq!(range[row].to_bits(), delta.abs().to_bits());
            } else {
                prop_assert!(movement[row].is_nan());
            }
        }
    }
}
