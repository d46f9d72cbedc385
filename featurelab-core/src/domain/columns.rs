//! Column names of the feature table.
//!
//! Names follow the established feature schema consumed by the downstream
//! scaler/classifier, so they are kept verbatim (including `15Diff`).

pub const DATE: &str = "Date";
pub const OPEN: &str = "Open";
pub const HIGH: &str = "High";
pub const LOW: &str = "Low";
pub const CLOSE: &str = "Close";
pub const VOLUME: &str = "Volume";

pub const VOLATILITY: &str = "Volatility";
pub const VOLATILITY_PCT: &str = "Volatility_Pct";
pub const ATR: &str = "ATR";
pub const ATR_FORWARD: &str = "ATR_15";
pub const FORWARD_DIFF: &str = "15Diff";
pub const ATR_DIFF: &str = "ATR_Diff";
pub const ATR_AVG_DIFF: &str = "ATR_AvgDiff";
pub const TARGET: &str = "Target";
pub const LOG_RETURN: &str = "LogReturn";
pub const VAR_LOG_RETURN: &str = "varLogReturn";
pub const STD_LOG_RETURN: &str = "stdLogReturn";
pub const RETURN: &str = "Return";
pub const VAR_RETURN: &str = "varReturn";
pub const STD_RETURN: &str = "stdReturn";
pub const NIGHT_GAIN: &str = "NightGain";
pub const INTRADAY_GAIN: &str = "IntradayGain";

/// Raw price/volume columns, in table order.
pub const PRICE_COLUMNS: [&str; 5] = [OPEN, HIGH, LOW, CLOSE, VOLUME];

/// Columns that only exist to build the target and are dropped at the end.
/// All of them see `window` rows into the future.
pub const INTERMEDIATE_COLUMNS: [&str; 4] = [ATR_FORWARD, FORWARD_DIFF, ATR_DIFF, ATR_AVG_DIFF];

/// Backward-looking columns produced by the signal stage.
pub const BACKWARD_SIGNAL_COLUMNS: [&str; 11] = [
    VOLATILITY,
    VOLATILITY_PCT,
    ATR,
    LOG_RETURN,
    VAR_LOG_RETURN,
    STD_LOG_RETURN,
    RETURN,
    VAR_RETURN,
    STD_RETURN,
    NIGHT_GAIN,
    INTRADAY_GAIN,
];

/// Prefix of fractionally differenced columns.
pub const FFD_PREFIX: &str = "ffd_adf_";
/// Prefix of decomposition residual columns.
pub const RESIDUAL_PREFIX: &str = "residual_";

/// Output column name for a fractionally differenced source.
pub fn ffd_column(source: &str) -> String {
    format!("{FFD_PREFIX}{source}")
}

/// Output column name for a decomposition residual.
pub fn residual_column(source: &str) -> String {
    format!("{RESIDUAL_PREFIX}{source}")
}

/// Whether `name` may be fed to the stationarity or decomposition stage.
///
/// Forward-looking columns and the label are excluded: transforming them
/// would leak future prices into features.
pub fn is_transform_source(name: &str) -> bool {
    PRICE_COLUMNS.contains(&name) || BACKWARD_SIGNAL_COLUMNS.contains(&name)
}
