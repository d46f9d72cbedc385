//! End-to-end feature pipeline.
//!
//! validate config → quality gate → signals → target → trim forward rows →
//! drop incomplete rows → stationarity → decomposition → drop incomplete rows
//! → drop intermediate columns.
//!
//! A run is a pure function of (rows, config). Nothing is cached between runs.

use crate::config::{ConfigError, PipelineConfig};
use crate::decompose::SeriesDecomposer;
use crate::domain::columns::INTERMEDIATE_COLUMNS;
use crate::domain::{FeatureTable, PriceRow, TableError};
use crate::labeler::append_target;
use crate::quality::{DataQualityGate, QualityReport};
use crate::signals::SignalDeriver;
use crate::stationarity::{StationarityReport, StationarityTransformer};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("data quality check failed: {0}")]
    DataQuality(QualityReport),

    #[error("feature table: {0}")]
    Table(#[from] TableError),
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct FeatureRun {
    pub table: FeatureTable,
    pub quality: QualityReport,
    pub stationarity: Vec<StationarityReport>,
    pub rows_in: usize,
    /// Rows removed because the forward horizon runs past the data.
    pub rows_trimmed_forward: usize,
    /// Rows removed for incomplete signal history.
    pub rows_dropped_signals: usize,
    /// Rows removed for incomplete differencing or decomposition windows.
    pub rows_dropped_transforms: usize,
    pub rows_out: usize,
}

#[derive(Debug, Clone)]
pub struct FeaturePipeline {
    config: PipelineConfig,
}

impl FeaturePipeline {
    /// Build a pipeline. The configuration is validated here so that a bad
    /// config fails before any data is touched.
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn run(&self, rows: &[PriceRow]) -> Result<FeatureRun, PipelineError> {
        let cfg = &self.config;
        let rows_in = rows.len();

        let gate = DataQualityGate::for_period(cfg.period_years, cfg.impute_zero);
        let verdict = gate.check(rows).map_err(PipelineError::DataQuality)?;

        let deriver = SignalDeriver::new(cfg.window, cfg.atr_smoothing);
        let mut table = deriver.derive(&verdict.rows)?;
        append_target(&mut table)?;
        let rows_trimmed_forward = table.truncate_tail(deriver.forward_horizon());
        let rows_dropped_signals = table.drop_missing();
        info!(
            rows = table.len(),
            trimmed = rows_trimmed_forward,
            dropped = rows_dropped_signals,
            "signals derived"
        );

        let stationary = StationarityTransformer::new(cfg.stationarity.clone()).transform(&table)?;
        let residuals = SeriesDecomposer::new(cfg.decomposition.clone()).transform(&table)?;

        let mut reports = Vec::with_capacity(stationary.len());
        for series in stationary {
            debug!(source = %series.source, d = series.d, stationary = series.stationary, "differenced");
            reports.push(series.report());
            table.push_column(series.column_name(), series.values)?;
        }
        let not_stationary = reports.iter().filter(|r| !r.stationary).count();
        if not_stationary > 0 {
            warn!(count = not_stationary, "some sources were not made stationary");
        }
        for residual in residuals {
            table.push_column(residual.column_name(), residual.values)?;
        }

        let rows_dropped_transforms = table.drop_missing();
        table.drop_columns(&INTERMEDIATE_COLUMNS)?;
        if table.is_empty() {
            warn!("no rows survived the pipeline");
        }

        let rows_out = table.len();
        info!(
            rows_in,
            rows_out,
            columns = table.columns().len(),
            "feature table built"
        );

        Ok(FeatureRun {
            table,
            quality: verdict.report,
            stationarity: reports,
            rows_in,
            rows_trimmed_forward,
            rows_dropped_signals,
            rows_dropped_transforms,
            rows_out,
        })
    }
}
