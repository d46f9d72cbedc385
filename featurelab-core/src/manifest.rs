//! Run manifest: a deterministic record of what a pipeline run consumed and
//! produced.
//!
//! Two runs over the same rows with the same configuration produce the same
//! manifest, byte for byte.

use crate::config::PipelineConfig;
use crate::domain::PriceRow;
use crate::pipeline::FeatureRun;
use crate::quality::QualityReport;
use crate::stationarity::StationarityReport;
use chrono::NaiveDate;
use serde::Serialize;

/// Bump when the manifest layout changes.
pub const MANIFEST_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunManifest {
    pub version: u32,
    pub dataset_hash: String,
    pub config_hash: String,
    pub config: PipelineConfig,
    pub quality: QualityReport,
    pub rows_in: usize,
    pub rows_trimmed_forward: usize,
    pub rows_dropped_signals: usize,
    pub rows_dropped_transforms: usize,
    pub rows_out: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub columns: Vec<String>,
    pub stationarity: Vec<StationarityReport>,
}

impl RunManifest {
    pub fn new(rows: &[PriceRow], config: &PipelineConfig, run: &FeatureRun) -> Self {
        Self {
            version: MANIFEST_VERSION,
            dataset_hash: dataset_hash(rows),
            config_hash: config.config_hash(),
            config: config.clone(),
            quality: run.quality.clone(),
            rows_in: run.rows_in,
            rows_trimmed_forward: run.rows_trimmed_forward,
            rows_dropped_signals: run.rows_dropped_signals,
            rows_dropped_transforms: run.rows_dropped_transforms,
            rows_out: run.rows_out,
            first_date: run.table.dates().first().copied(),
            last_date: run.table.dates().last().copied(),
            columns: run
                .table
                .column_names()
                .into_iter()
                .map(String::from)
                .collect(),
            stationarity: run.stationarity.clone(),
        }
    }

    /// Pretty-printed JSON. Non-finite numbers are written as `null`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Deterministic BLAKE3 hash over dates and OHLCV values in row order.
pub fn dataset_hash(rows: &[PriceRow]) -> String {
    let mut hasher = blake3::Hasher::new();
    for row in rows {
        hasher.update(row.date.to_string().as_bytes());
        hasher.update(&row.open.to_le_bytes());
        hasher.update(&row.high.to_le_bytes());
        hasher.update(&row.low.to_le_bytes());
        hasher.update(&row.close.to_le_bytes());
        hasher.update(&row.volume.to_le_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_rows;

    #[test]
    fn dataset_hash_is_order_and_value_sensitive() {
        let rows = make_rows(&[1.0, 2.0, 3.0]);
        let h = dataset_hash(&rows);
        assert_eq!(h, dataset_hash(&rows));
        assert_eq!(h.len(), 64);

        let mut changed = rows.clone();
        changed[1].volume += 1.0;
        assert_ne!(h, dataset_hash(&changed));

        let mut reversed = rows;
        reversed.reverse();
        assert_ne!(h, dataset_hash(&reversed));
    }

    #[test]
    fn empty_dataset_has_a_hash() {
        assert_eq!(dataset_hash(&[]), blake3::hash(b"").to_hex().to_string());
    }
}
