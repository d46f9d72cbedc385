//! FeatureLab CLI — build, check and compare commands.
//!
//! Commands:
//! - `build`: run the feature pipeline over a price CSV and write the table
//! - `check`: run the data-quality gate only; exit code 1 on reject
//! - `compare`: check two price files for the same instrument against each other

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use featurelab_core::data::{
    check_consistency, write_table, ConsistencyReport, CsvPriceSource, PriceRequest, PriceSource,
    SyntheticPriceSource, DEFAULT_TOLERANCE,
};
use featurelab_core::domain::PriceRow;
use featurelab_core::manifest::RunManifest;
use featurelab_core::quality::DataQualityGate;
use featurelab_core::{FeaturePipeline, FeatureRun, PipelineConfig};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "featurelab",
    version,
    about = "FeatureLab CLI — labeled, stationary feature tables from daily prices"
)]
struct Cli {
    /// Debug logging (overrides RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full feature pipeline and write the feature table.
    Build {
        /// Price CSV with Date, Open, High, Low, Close, Volume columns.
        #[arg(long, required_unless_present = "synthetic")]
        input: Option<PathBuf>,

        /// Output file. A `.parquet` extension writes Parquet, anything else CSV.
        #[arg(long)]
        output: PathBuf,

        /// TOML pipeline configuration. Flags below override its values.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Forward horizon and rolling window.
        #[arg(long)]
        window: Option<usize>,

        /// Years of history to keep and require.
        #[arg(long)]
        period_years: Option<usize>,

        /// Fill interior zeros with the mean of their neighbours.
        #[arg(long, default_value_t = false)]
        impute_zero: bool,

        /// Write a JSON run manifest here.
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Use N seeded synthetic weekday rows instead of --input.
        #[arg(long, conflicts_with = "input")]
        synthetic: Option<usize>,
    },
    /// Run the data-quality gate only.
    Check {
        /// Price CSV to check.
        #[arg(long)]
        input: PathBuf,

        /// Years of history to keep and require.
        #[arg(long, default_value_t = 5)]
        period_years: usize,

        /// Fill interior zeros before checking.
        #[arg(long, default_value_t = false)]
        impute_zero: bool,
    },
    /// Compare two price files for the same instrument.
    Compare {
        /// Reference price CSV.
        #[arg(long)]
        primary: PathBuf,

        /// Price CSV checked against the reference.
        #[arg(long)]
        secondary: PathBuf,

        /// Allowed deviation as a fraction of the largest primary value.
        #[arg(long, default_value_t = DEFAULT_TOLERANCE)]
        tolerance: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Build {
            input,
            output,
            config,
            window,
            period_years,
            impute_zero,
            manifest,
            synthetic,
        } => {
            let config = load_config(config.as_deref(), window, period_years, impute_zero)?;
            run_build(input, synthetic, &output, config, manifest.as_deref())
        }
        Commands::Check {
            input,
            period_years,
            impute_zero,
        } => run_check(&input, period_years, impute_zero),
        Commands::Compare {
            primary,
            secondary,
            tolerance,
        } => run_compare(&primary, &secondary, tolerance),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(
    path: Option<&Path>,
    window: Option<usize>,
    period_years: Option<usize>,
    impute_zero: bool,
) -> Result<PipelineConfig> {
    let mut config = match path {
        Some(path) => PipelineConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    if let Some(window) = window {
        config.window = window;
    }
    if let Some(years) = period_years {
        config.period_years = years;
    }
    if impute_zero {
        config.impute_zero = true;
    }
    Ok(config)
}

/// Ticker label for logs and the synthetic seed: the file stem.
fn ticker_for(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_uppercase()
}

fn load_prices(path: &Path, lookback_years: Option<usize>) -> Result<Vec<PriceRow>> {
    let request = PriceRequest::daily(ticker_for(path), lookback_years);
    CsvPriceSource::new(path)
        .fetch(&request)
        .with_context(|| format!("reading prices from {}", path.display()))
}

fn run_build(
    input: Option<PathBuf>,
    synthetic: Option<usize>,
    output: &Path,
    config: PipelineConfig,
    manifest_path: Option<&Path>,
) -> Result<()> {
    let pipeline = FeaturePipeline::new(config).context("invalid pipeline configuration")?;
    let years = pipeline.config().period_years;

    let rows = match (input, synthetic) {
        (Some(path), None) => load_prices(&path, Some(years))?,
        (None, Some(count)) => {
            let Some(start) = NaiveDate::from_ymd_opt(2000, 1, 3) else {
                bail!("invalid synthetic start date");
            };
            SyntheticPriceSource::new(start, count)
                .fetch(&PriceRequest::daily("SYNTH", Some(years)))
                .context("generating synthetic prices")?
        }
        _ => bail!("exactly one of --input or --synthetic is required"),
    };

    let run = pipeline.run(&rows).context("feature pipeline failed")?;
    write_table(&run.table, output)
        .with_context(|| format!("writing features to {}", output.display()))?;
    info!(path = %output.display(), rows = run.rows_out, "features written");

    if let Some(path) = manifest_path {
        let manifest = RunManifest::new(&rows, pipeline.config(), &run);
        let json = manifest.to_json().context("serializing manifest")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing manifest to {}", path.display()))?;
    }

    print_summary(&run, output);
    Ok(())
}

fn run_check(input: &Path, period_years: usize, impute_zero: bool) -> Result<()> {
    if period_years == 0 {
        bail!("--period-years must be at least 1");
    }
    let rows = load_prices(input, Some(period_years))?;
    let gate = DataQualityGate::for_period(period_years, impute_zero);

    match gate.check(&rows) {
        Ok(verdict) => {
            println!("ACCEPTED: {} rows", verdict.report.rows);
            if verdict.report.imputed_cells > 0 {
                println!("Imputed cells: {}", verdict.report.imputed_cells);
            }
            Ok(())
        }
        Err(report) => {
            println!("REJECTED: {} rows", report.rows);
            for reason in report.reasons() {
                println!("  - {reason}");
            }
            std::process::exit(1);
        }
    }
}

fn run_compare(primary: &Path, secondary: &Path, tolerance: f64) -> Result<()> {
    if !(tolerance.is_finite() && tolerance >= 0.0) {
        bail!("--tolerance must be a non-negative number");
    }
    let a = load_prices(primary, None)?;
    let b = load_prices(secondary, None)?;
    let report = check_consistency(&a, &b, tolerance);
    print_consistency(&report, &a);
    if !report.consistent {
        std::process::exit(1);
    }
    Ok(())
}

fn print_consistency(report: &ConsistencyReport, primary: &[PriceRow]) {
    if let Some((p, s)) = report.shape_mismatch {
        println!("INCONSISTENT: row counts differ ({p} vs {s})");
        return;
    }
    if report.consistent {
        println!("CONSISTENT: {} rows within {:.4}", primary.len(), report.threshold);
        return;
    }
    println!(
        "INCONSISTENT: {} of {} rows outside {:.4}",
        report.mismatched_rows.len(),
        primary.len(),
        report.threshold
    );
    for &i in report.mismatched_rows.iter().take(10) {
        println!("  row {i} ({})", primary[i].date);
    }
}

fn print_summary(run: &FeatureRun, output: &Path) {
    println!();
    println!("=== Feature Run ===");
    println!("Rows in:          {}", run.rows_in);
    println!("Forward trimmed:  {}", run.rows_trimmed_forward);
    println!("Signal warmup:    {}", run.rows_dropped_signals);
    println!("Transform warmup: {}", run.rows_dropped_transforms);
    println!("Rows out:         {}", run.rows_out);
    println!("Columns:          {}", run.table.columns().len());
    if let (Some(first), Some(last)) = (run.table.dates().first(), run.table.dates().last()) {
        println!("Period:           {first} to {last}");
    }
    println!();
    println!("--- Stationarity ---");
    for report in &run.stationarity {
        let flag = if report.stationary { "" } else { "  (not stationary)" };
        println!("{:<14} d = {:.2}  p = {:.4}{flag}", report.source, report.d, report.p_value);
    }
    println!();
    println!("Written to: {}", output.display());
}
