//! Feature table export: CSV via the csv crate, Parquet via polars.
//!
//! Both formats carry the same flat table: a `Date` column followed by the
//! feature columns in table order. `Target` is written as an integer; every
//! other value uses the shortest representation that parses back to the same
//! `f64`.

use super::provider::DataError;
use crate::domain::{columns, FeatureTable};
use chrono::NaiveDate;
use polars::prelude::*;
use std::fs;
use std::path::Path;

/// Render the table as CSV text.
pub fn table_to_csv(table: &FeatureTable) -> Result<String, DataError> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec![columns::DATE];
    header.extend(table.column_names());
    wtr.write_record(&header)?;

    for (i, date) in table.dates().iter().enumerate() {
        let mut record = Vec::with_capacity(header.len());
        record.push(date.to_string());
        for column in table.columns() {
            let v = column.values[i];
            if column.name == columns::TARGET {
                record.push((v as i64).to_string());
            } else {
                record.push(v.to_string());
            }
        }
        wtr.write_record(&record)?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| DataError::ValidationError(format!("flush CSV writer: {e}")))?;
    String::from_utf8(data).map_err(|e| DataError::ValidationError(format!("CSV is not UTF-8: {e}")))
}

/// Write the table as CSV to `path`.
pub fn write_csv(table: &FeatureTable, path: &Path) -> Result<(), DataError> {
    fs::write(path, table_to_csv(table)?)?;
    Ok(())
}

/// Convert the table to a polars DataFrame.
pub fn table_to_dataframe(table: &FeatureTable) -> Result<DataFrame, DataError> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)
        .ok_or_else(|| DataError::ValidationError("epoch".into()))?;
    let days: Vec<i32> = table
        .dates()
        .iter()
        .map(|d| (*d - epoch).num_days() as i32)
        .collect();

    let mut frame_columns = Vec::with_capacity(table.columns().len() + 1);
    frame_columns.push(
        Column::new(columns::DATE.into(), days)
            .cast(&DataType::Date)
            .map_err(|e| DataError::ParquetError(format!("date cast: {e}")))?,
    );
    for column in table.columns() {
        let name: PlSmallStr = column.name.as_str().into();
        if column.name == columns::TARGET {
            let labels: Vec<i64> = column.values.iter().map(|&v| v as i64).collect();
            frame_columns.push(Column::new(name, labels));
        } else {
            frame_columns.push(Column::new(name, column.values.clone()));
        }
    }

    DataFrame::new(frame_columns)
        .map_err(|e| DataError::ParquetError(format!("dataframe creation: {e}")))
}

/// Write the table as Parquet to `path`.
pub fn write_parquet(table: &FeatureTable, path: &Path) -> Result<(), DataError> {
    let mut df = table_to_dataframe(table)?;
    let file = fs::File::create(path)?;
    ParquetWriter::new(file)
        .finish(&mut df)
        .map_err(|e| DataError::ParquetError(format!("write parquet: {e}")))?;
    Ok(())
}

/// Write CSV or Parquet depending on the file extension.
pub fn write_table(table: &FeatureTable, path: &Path) -> Result<(), DataError> {
    let is_parquet = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"));
    if is_parquet {
        write_parquet(table, path)
    } else {
        write_csv(table, path)
    }
}
