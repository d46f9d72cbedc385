//! Pipeline configuration, loaded from TOML.
//!
//! Every key is optional and takes its default when absent. Unknown keys are
//! rejected so a typo cannot silently fall back to a default.

use crate::decompose::DecompositionConfig;
use crate::domain::columns::is_transform_source;
use crate::indicators::AtrSmoothing;
use crate::stationarity::StationarityConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Upper bound on the number of differencing orders one search may test.
pub const MAX_TESTED_ORDERS: usize = 101;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{role} source '{column}' is not a raw or backward-looking column")]
    UnknownColumn { role: &'static str, column: String },

    #[error("{role} source '{column}' is listed more than once")]
    DuplicateColumn { role: &'static str, column: String },

    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Rolling window and forward horizon, in rows.
    pub window: usize,
    /// Years of history the quality gate requires.
    pub period_years: usize,
    pub impute_zero: bool,
    pub atr_smoothing: AtrSmoothing,
    pub stationarity: StationarityConfig,
    pub decomposition: DecompositionConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window: 15,
            period_years: 5,
            impute_zero: false,
            atr_smoothing: AtrSmoothing::default(),
            stationarity: StationarityConfig::default(),
            decomposition: DecompositionConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse a configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Check every parameter and source list. Runs before any computation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window < 2 {
            return Err(invalid("window", format!("must be >= 2, got {}", self.window)));
        }
        if self.period_years == 0 {
            return Err(invalid("period_years", "must be >= 1".to_string()));
        }
        let too_long = self
            .period_years
            .checked_mul(crate::quality::MIN_ROWS_PER_YEAR)
            .and(
                self.period_years
                    .checked_mul(crate::data::TRADING_DAYS_PER_LOOKBACK_YEAR),
            )
            .is_none();
        if too_long {
            return Err(invalid(
                "period_years",
                format!("{} years of daily rows overflows a row count", self.period_years),
            ));
        }

        let st = &self.stationarity;
        if !(st.significance > 0.0 && st.significance < 1.0) {
            return Err(invalid(
                "stationarity.significance",
                format!("must be in (0, 1), got {}", st.significance),
            ));
        }
        if !(st.d_min.is_finite() && st.d_min >= 0.0) {
            return Err(invalid("stationarity.d_min", format!("must be >= 0, got {}", st.d_min)));
        }
        if !(st.d_step.is_finite() && st.d_step > 0.0) {
            return Err(invalid("stationarity.d_step", format!("must be > 0, got {}", st.d_step)));
        }
        if !(st.d_max.is_finite() && st.d_max >= st.d_min) {
            return Err(invalid(
                "stationarity.d_max",
                format!("must be >= d_min ({}), got {}", st.d_min, st.d_max),
            ));
        }
        let orders = st.order_count();
        if orders > MAX_TESTED_ORDERS as f64 {
            return Err(invalid(
                "stationarity.d_step",
                format!("grid has {orders:.0} orders, limit is {MAX_TESTED_ORDERS}"),
            ));
        }
        if !(st.weight_threshold > 0.0 && st.weight_threshold < 1.0) {
            return Err(invalid(
                "stationarity.weight_threshold",
                format!("must be in (0, 1), got {}", st.weight_threshold),
            ));
        }
        check_sources("stationarity", &st.sources)?;

        if self.decomposition.period < 2 {
            return Err(invalid(
                "decomposition.period",
                format!("must be >= 2, got {}", self.decomposition.period),
            ));
        }
        check_sources("decomposition", &self.decomposition.sources)?;
        Ok(())
    }

    /// Minimum rows the quality gate requires.
    pub fn min_rows(&self) -> usize {
        self.period_years
            .saturating_mul(crate::quality::MIN_ROWS_PER_YEAR)
    }

    /// Deterministic BLAKE3 fingerprint of the full configuration.
    pub fn config_hash(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

fn invalid(name: &'static str, reason: String) -> ConfigError {
    ConfigError::InvalidParameter { name, reason }
}

fn check_sources(role: &'static str, sources: &[String]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for column in sources {
        if !is_transform_source(column) {
            return Err(ConfigError::UnknownColumn {
                role,
                column: column.clone(),
            });
        }
        if !seen.insert(column.as_str()) {
            return Err(ConfigError::DuplicateColumn {
                role,
                column: column.clone(),
            });
        }
    }
    Ok(())
}
