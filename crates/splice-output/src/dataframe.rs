//! Polars view of a daily table.

use crate::export::{DATE_HEADER, ExportError};
use chrono::Datelike;
use polars::prelude::*;
use splice_engine::{FusedDailyTable, PV_COLUMN};

/// Days from 0001-01-01 to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Convert `table` to a `DataFrame` with the CSV column order.
///
/// `Date` is a polars `Date` column. A present value that cannot be computed
/// is null.
///
/// # Errors
///
/// Returns an error if polars rejects a column.
pub fn to_dataframe(table: &FusedDailyTable) -> Result<DataFrame, ExportError> {
    let days: Vec<i32> = table
        .dates()
        .iter()
        .map(|d| d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)
        .collect();

    let mut columns: Vec<Column> = Vec::with_capacity(table.column_names().len() + 1);
    columns.push(
        Series::new(DATE_HEADER.into(), days)
            .cast(&DataType::Date)?
            .into(),
    );
    for column in table.frame.columns() {
        columns.push(Series::new(column.name.as_str().into(), column.values.as_slice()).into());
    }
    let pv: Vec<Option<f64>> = table.present_value.iter().map(|p| p.value()).collect();
    columns.push(Series::new(PV_COLUMN.into(), pv).into());
    for column in &table.changes {
        columns.push(Series::new(column.name.as_str().into(), column.values.as_slice()).into());
    }

    Ok(DataFrame::new(columns)?)
}
