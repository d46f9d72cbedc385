//! Smoke tests for the `featurelab` binary.

use chrono::NaiveDate;
use featurelab_core::data::synthetic_rows;
use std::fmt::Write as _;
use std::path::Path;
use std::process::{Command, Output};

fn featurelab(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_featurelab"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to spawn featurelab")
}

fn write_prices(path: &Path, ticker: &str, count: usize) {
    let start = NaiveDate::from_ymd_opt(2016, 1, 4).unwrap();
    let mut text = String::from("Date,Open,High,Low,Close,Volume\n");
    for row in synthetic_rows(ticker, start, count) {
        writeln!(
            text,
            "{},{},{},{},{},{}",
            row.date, row.open, row.high, row.low, row.close, row.volume
        )
        .unwrap();
    }
    std::fs::write(path, text).unwrap();
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn build_synthetic_writes_table_and_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("features.csv");
    let manifest = dir.path().join("manifest.json");

    let output = featurelab(&[
        "build",
        "--synthetic",
        "1300",
        "--output",
        out.to_str().unwrap(),
        "--manifest",
        manifest.to_str().unwrap(),
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).contains("Feature Run"));

    let table = std::fs::read_to_string(&out).unwrap();
    let header = table.lines().next().unwrap();
    assert!(header.starts_with("Date,"));
    assert!(header.contains("Target"));
    assert!(!header.contains("ATR_Diff"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&manifest).unwrap()).unwrap();
    assert_eq!(json["rows_out"].as_u64().unwrap() as usize, table.lines().count() - 1);
}

#[test]
fn build_from_csv_with_overrides() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("spy.csv");
    let out = dir.path().join("features.parquet");
    write_prices(&input, "SPY", 600);

    let output = featurelab(&[
        "build",
        "--input",
        input.to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
        "--window",
        "10",
        "--period-years",
        "2",
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(std::fs::metadata(&out).unwrap().len() > 0);
}

#[test]
fn build_rejects_invalid_window() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("features.csv");
    let output = featurelab(&[
        "build",
        "--synthetic",
        "1300",
        "--output",
        out.to_str().unwrap(),
        "--window",
        "0",
    ]);
    assert!(!output.status.success());
    assert!(!out.exists());
}

#[test]
fn check_reports_too_small_and_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tiny.csv");
    write_prices(&input, "TINY", 100);

    let output = featurelab(&["check", "--input", input.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains("REJECTED"));
    assert!(text.contains("The dataset is too small."));
}

#[test]
fn check_accepts_enough_history() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("qqq.csv");
    write_prices(&input, "QQQ", 300);

    let output = featurelab(&["check", "--input", input.to_str().unwrap(), "--period-years", "1"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("ACCEPTED: 252 rows"));
}

#[test]
fn compare_identical_and_different_files() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.csv");
    let b = dir.path().join("b.csv");
    let c = dir.path().join("c.csv");
    write_prices(&a, "IWM", 50);
    write_prices(&b, "IWM", 50);
    write_prices(&c, "IWM", 40);

    let same = featurelab(&[
        "compare",
        "--primary",
        a.to_str().unwrap(),
        "--secondary",
        b.to_str().unwrap(),
    ]);
    assert!(same.status.success());
    assert!(stdout(&same).contains("CONSISTENT"));

    let shorter = featurelab(&[
        "compare",
        "--primary",
        a.to_str().unwrap(),
        "--secondary",
        c.to_str().unwrap(),
    ]);
    assert_eq!(shorter.status.code(), Some(1));
    assert!(stdout(&shorter).contains("row counts differ"));
}
