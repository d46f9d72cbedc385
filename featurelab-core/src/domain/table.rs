//! Feature table: the row-indexed, column-major container every stage appends to.
//!
//! Rows are identified only by position (a dense 0-based index) and by their
//! date. Stages may append columns and drop whole rows; nothing reorders rows.

use super::columns;
use super::price_row::PriceRow;
use super::target::Target;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("column '{name}' has {actual} values, table has {expected} rows")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("column '{0}' already exists")]
    DuplicateColumn(String),

    #[error("column '{0}' not found")]
    MissingColumn(String),
}

/// A named numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureColumn {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    dates: Vec<NaiveDate>,
    columns: Vec<FeatureColumn>,
}

impl FeatureTable {
    /// Seed a table with the raw OHLCV columns.
    pub fn from_rows(rows: &[PriceRow]) -> Self {
        let pick = |f: fn(&PriceRow) -> f64| rows.iter().map(f).collect::<Vec<f64>>();
        let columns = vec![
            FeatureColumn {
                name: columns::OPEN.to_string(),
                values: pick(|r| r.open),
            },
            FeatureColumn {
                name: columns::HIGH.to_string(),
                values: pick(|r| r.high),
            },
            FeatureColumn {
                name: columns::LOW.to_string(),
                values: pick(|r| r.low),
            },
            FeatureColumn {
                name: columns::CLOSE.to_string(),
                values: pick(|r| r.close),
            },
            FeatureColumn {
                name: columns::VOLUME.to_string(),
                values: pick(|r| r.volume),
            },
        ];
        Self {
            dates: rows.iter().map(|r| r.date).collect(),
            columns,
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    /// Column names in table order (the date column is not included).
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Full series of a named column.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Value of a named column at a row.
    pub fn value(&self, name: &str, row: usize) -> Option<f64> {
        self.column(name).and_then(|v| v.get(row).copied())
    }

    /// Decode the label column, if present and well-formed.
    pub fn targets(&self) -> Option<Vec<Target>> {
        self.column(columns::TARGET)?
            .iter()
            .map(|&v| Target::from_f64(v))
            .collect()
    }

    /// Append a new column at the end of the table.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<(), TableError> {
        let name = name.into();
        if values.len() != self.len() {
            return Err(TableError::LengthMismatch {
                name,
                expected: self.len(),
                actual: values.len(),
            });
        }
        if self.contains(&name) {
            return Err(TableError::DuplicateColumn(name));
        }
        self.columns.push(FeatureColumn { name, values });
        Ok(())
    }

    /// Remove the named columns. Every name must exist.
    pub(crate) fn drop_columns(&mut self, names: &[&str]) -> Result<(), TableError> {
        if let Some(missing) = names.iter().find(|n| !self.contains(n)) {
            return Err(TableError::MissingColumn(missing.to_string()));
        }
        self.columns.retain(|c| !names.contains(&c.name.as_str()));
        Ok(())
    }

    /// Drop the last `n` rows. Returns the number actually removed.
    pub(crate) fn truncate_tail(&mut self, n: usize) -> usize {
        let keep = self.len().saturating_sub(n);
        let removed = self.len() - keep;
        self.dates.truncate(keep);
        for column in &mut self.columns {
            column.values.truncate(keep);
        }
        removed
    }

    /// Drop every row holding a NaN or infinite value in any column.
    /// Returns the number of rows removed; survivors keep their order.
    pub(crate) fn drop_missing(&mut self) -> usize {
        let keep: Vec<bool> = (0..self.len())
            .map(|i| self.columns.iter().all(|c| c.values[i].is_finite()))
            .collect();
        self.retain_rows(&keep)
    }

    fn retain_rows(&mut self, keep: &[bool]) -> usize {
        let before = self.len();
        self.dates = filter_by(&self.dates, keep);
        for column in &mut self.columns {
            column.values = filter_by(&column.values, keep);
        }
        before - self.len()
    }
}

fn filter_by<T: Copy>(values: &[T], keep: &[bool]) -> Vec<T> {
    values
        .iter()
        .zip(keep)
        .filter_map(|(&v, &k)| k.then_some(v))
        .collect()
}
