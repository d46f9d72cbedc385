//! Domain types for featurelab

pub mod columns;
pub mod price_row;
pub mod table;
pub mod target;

pub use price_row::{round_up_cents, PriceRow};
pub use table::{FeatureColumn, FeatureTable, TableError};
pub use target::Target;
