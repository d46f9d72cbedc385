//! End-to-end pipeline tests on deterministic trending histories.
//!
//! Fixture shape: 1300 consecutive days, open = close, high = close + 1,
//! low = close - 1, volume = 1000, default configuration (window 15, five
//! years of history required).

use chrono::NaiveDate;
use featurelab_core::domain::columns::{self, INTERMEDIATE_COLUMNS};
use featurelab_core::domain::{PriceRow, Target};
use featurelab_core::indicators::AtrSmoothing;
use featurelab_core::labeler::append_target;
use featurelab_core::manifest::RunManifest;
use featurelab_core::signals::SignalDeriver;
use featurelab_core::stationarity::StationarityConfig;
use featurelab_core::{FeaturePipeline, FeatureRun, PipelineConfig, PipelineError};
use std::collections::HashMap;

const DAYS: usize = 1300;
const WINDOW: usize = 15;

fn make_trending_rows(close_at: impl Fn(usize) -> f64) -> Vec<PriceRow> {
    let base = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
    (0..DAYS)
        .map(|t| {
            let close = close_at(t);
            PriceRow::from_raw(
                base + chrono::Duration::days(t as i64),
                close,
                close + 1.0,
                close - 1.0,
                close,
                1000.0,
            )
        })
        .collect()
}

fn linear_rows() -> Vec<PriceRow> {
    make_trending_rows(|t| 100.0 + t as f64)
}

/// Quarter steps stay exact in binary, so cent rounding leaves them alone.
fn accelerating_rows() -> Vec<PriceRow> {
    make_trending_rows(|t| 100.0 + 0.25 * (t * t) as f64)
}

/// Linear closes with a five-day range blowout: high and low widen to
/// close +/- 25 on rows 700..705.
fn spiked_rows() -> Vec<PriceRow> {
    let mut rows = linear_rows();
    for row in &mut rows[700..705] {
        row.high = row.close + 25.0;
        row.low = row.close - 25.0;
    }
    rows
}

fn run_default(rows: &[PriceRow]) -> FeatureRun {
    FeaturePipeline::new(PipelineConfig::default())
        .unwrap()
        .run(rows)
        .unwrap()
}

// ── 1. Gate and trimming ─────────────────────────────────────────────

#[test]
fn linear_history_is_accepted_and_forward_rows_trimmed() {
    let rows = linear_rows();
    let run = run_default(&rows);

    assert!(run.quality.is_accepted());
    assert_eq!(run.quality.imputed_cells, 0);
    assert_eq!(run.rows_in, DAYS);
    assert_eq!(run.rows_trimmed_forward, WINDOW);
    assert!(run.rows_out > 0);

    let last_kept = rows[DAYS - WINDOW - 1].date;
    assert!(run.table.dates().iter().all(|d| *d <= last_kept));
    for pair in run.table.dates().windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[test]
fn short_history_is_rejected_before_any_signal() {
    let rows = linear_rows();
    let err = FeaturePipeline::new(PipelineConfig::default())
        .unwrap()
        .run(&rows[..1000])
        .unwrap_err();
    match err {
        PipelineError::DataQuality(report) => {
            assert!(!report.is_accepted());
            assert_eq!(report.reasons(), vec!["The dataset is too small."]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

// ── 2. Output schema ─────────────────────────────────────────────────

#[test]
fn output_schema_and_completeness() {
    let run = run_default(&linear_rows());
    let names = run.table.column_names();

    for gone in INTERMEDIATE_COLUMNS {
        assert!(!names.contains(&gone), "{gone} should be dropped");
    }
    for source in StationarityConfig::default().sources {
        let column = columns::ffd_column(&source);
        assert!(names.contains(&column.as_str()), "{column} missing");
    }
    for source in columns::PRICE_COLUMNS {
        let column = columns::residual_column(source);
        assert!(names.contains(&column.as_str()), "{column} missing");
    }
    assert!(names.contains(&columns::TARGET));

    for column in run.table.columns() {
        assert_eq!(column.values.len(), run.rows_out);
        assert!(
            column.values.iter().all(|v| v.is_finite()),
            "{} has non-finite values",
            column.name
        );
    }
    assert_eq!(run.stationarity.len(), 9);
}

// ── 3. Target labels ─────────────────────────────────────────────────

#[test]
fn linear_closes_never_diverge() {
    // Constant true range and constant forward move: ATR_Diff equals its
    // own rolling mean, so no row is labelled.
    let run = run_default(&linear_rows());
    let targets = run.table.targets().unwrap();
    assert!(!targets.is_empty());
    assert!(targets.iter().all(|t| *t != Target::Down));
    assert!(targets.iter().all(|t| *t == Target::Neutral));
}

#[test]
fn accelerating_closes_are_always_up() {
    // ATR_Diff grows linearly, so it sits above its trailing mean on every
    // retained row and the forward move is always positive.
    let run = run_default(&accelerating_rows());
    let targets = run.table.targets().unwrap();
    assert!(!targets.is_empty());
    assert!(targets.iter().all(|t| *t == Target::Up));
}

#[test]
fn volatility_spike_labels_exactly_the_divergent_rows() {
    let rows = spiked_rows();
    let run = run_default(&rows);
    let targets = run.table.targets().unwrap();

    // Recompute the intermediate columns the pipeline drops.
    let mut signals = SignalDeriver::new(WINDOW, AtrSmoothing::Simple)
        .derive(&rows)
        .unwrap();
    append_target(&mut signals).unwrap();
    let index: HashMap<NaiveDate, usize> = signals
        .dates()
        .iter()
        .enumerate()
        .map(|(i, d)| (*d, i))
        .collect();
    let diff = signals.column(columns::ATR_DIFF).unwrap();
    let avg = signals.column(columns::ATR_AVG_DIFF).unwrap();

    let mut up = 0;
    for (row, date) in run.table.dates().iter().enumerate() {
        let i = index[date];
        assert_ne!(targets[row], Target::Down, "row {row} ({date})");
        let divergent = diff[i] > avg[i];
        assert_eq!(targets[row] == Target::Up, divergent, "row {row} ({date})");
        up += usize::from(divergent);
    }
    assert!(up > 0, "the spike should produce upward labels");
    assert!(up < targets.len());
}

// ── 4. Determinism ───────────────────────────────────────────────────

#[test]
fn runs_are_deterministic() {
    let rows = accelerating_rows();
    let pipeline = FeaturePipeline::new(PipelineConfig::default()).unwrap();
    let a = pipeline.run(&rows).unwrap();
    let b = pipeline.run(&rows).unwrap();

    assert_eq!(a.table, b.table);
    assert_eq!(a.stationarity.len(), b.stationarity.len());

    let ma = RunManifest::new(&rows, pipeline.config(), &a).to_json().unwrap();
    let mb = RunManifest::new(&rows, pipeline.config(), &b).to_json().unwrap();
    assert_eq!(ma, mb);
}

#[test]
fn manifest_records_the_run() {
    let rows = linear_rows();
    let pipeline = FeaturePipeline::new(PipelineConfig::default()).unwrap();
    let run = pipeline.run(&rows).unwrap();
    let manifest = RunManifest::new(&rows, pipeline.config(), &run);

    assert_eq!(manifest.rows_in, DAYS);
    assert_eq!(manifest.rows_out, run.table.len());
    assert_eq!(manifest.first_date, run.table.dates().first().copied());
    assert_eq!(manifest.last_date, run.table.dates().last().copied());
    assert_eq!(manifest.columns.len(), run.table.columns().len());
    assert_eq!(manifest.config_hash, PipelineConfig::default().config_hash());

    let json: serde_json::Value = serde_json::from_str(&manifest.to_json().unwrap()).unwrap();
    assert_eq!(json["version"], 1);
    assert_eq!(json["stationarity"].as_array().unwrap().len(), 9);
}
