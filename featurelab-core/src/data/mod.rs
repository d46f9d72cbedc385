//! Data adapters: price sources, export and cross-source checks.
//!
//! Everything here does I/O or talks to the outside world. The pipeline
//! stages in the rest of the crate never touch the filesystem.

pub mod consistency;
pub mod export;
pub mod ingest;
pub mod provider;
pub mod synthetic;

pub use consistency::{check_consistency, ConsistencyReport, DEFAULT_TOLERANCE};
pub use export::{table_to_csv, table_to_dataframe, write_csv, write_parquet, write_table};
pub use ingest::{read_price_csv, CsvPriceSource};
pub use provider::{
    normalize_rows, DataError, PriceRequest, PriceSource, TRADING_DAYS_PER_LOOKBACK_YEAR,
};
pub use synthetic::{synthetic_rows, SyntheticPriceSource};
