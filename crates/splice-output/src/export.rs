//! CSV and JSON export.
//!
//! Every exportable value implements [`Exporter`]. The daily table writes its
//! columns in output order; the run report writes one record per ticker.

use serde_json::{Map, Value};
use splice_engine::FusedDailyTable;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Header of the leading date column.
pub const DATE_HEADER: &str = "Date";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors that can occur during export operations.
#[derive(Debug, Error)]
pub enum ExportError {
    /// CSV serialization error.
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// DataFrame construction error.
    #[error("DataFrame error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Output was not valid UTF-8.
    #[error("Invalid UTF-8 in output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values format.
    Csv,

    /// Compact JSON format.
    Json,

    /// Pretty-printed JSON format.
    PrettyJson,
}

impl ExportFormat {
    /// Get the file extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Csv => "csv",
            Self::Json | Self::PrettyJson => "json",
        }
    }
}

/// Trait for exporting data in various formats.
pub trait Exporter {
    /// Export data to a string in the specified format.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError>;

    /// Export data to a file in the specified format, creating parent
    /// directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or file writing fails.
    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let content = self.export_to_string(format)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }
}

fn format_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write `table` as CSV to `writer`.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_table_csv<W: Write>(table: &FusedDailyTable, writer: W) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec![DATE_HEADER];
    header.extend(table.column_names());
    wtr.write_record(&header)?;

    let main = table.frame.columns();
    let mut record: Vec<String> = Vec::with_capacity(header.len());
    for (row, date) in table.dates().iter().enumerate() {
        record.clear();
        record.push(date.format(DATE_FORMAT).to_string());
        record.extend(main.iter().map(|c| format_number(c.values[row])));
        record.push(table.present_value[row].to_string());
        record.extend(table.changes.iter().map(|c| format_number(c.values[row])));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    debug!(rows = table.height(), columns = header.len(), "wrote csv table");
    Ok(())
}

fn table_records(table: &FusedDailyTable) -> Vec<Value> {
    let main = table.frame.columns();
    table
        .dates()
        .iter()
        .enumerate()
        .map(|(row, date)| {
            let mut record = Map::new();
            record.insert(
                DATE_HEADER.to_string(),
                Value::String(date.format(DATE_FORMAT).to_string()),
            );
            for column in main.iter().chain(table.changes.iter()) {
                let value = column.values[row].map_or(Value::Null, Value::from);
                record.insert(column.name.clone(), value);
            }
            let pv = table.present_value[row];
            record.insert(
                splice_engine::PV_COLUMN.to_string(),
                pv.value().map_or_else(|| Value::String(pv.to_string()), Value::from),
            );
            Value::Object(record)
        })
        .collect()
}

impl Exporter for FusedDailyTable {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut buf = Vec::new();
                write_table_csv(self, &mut buf)?;
                Ok(String::from_utf8(buf)?)
            }
            ExportFormat::Json => Ok(serde_json::to_string(&table_records(self))?),
            ExportFormat::PrettyJson => Ok(serde_json::to_string_pretty(&table_records(self))?),
        }
    }

    fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        match format {
            ExportFormat::Csv => {
                let mut file = BufWriter::new(File::create(path)?);
                write_table_csv(self, &mut file)?;
                file.flush()?;
            }
            ExportFormat::Json | ExportFormat::PrettyJson => {
                fs::write(path, self.export_to_string(format)?)?;
            }
        }
        Ok(())
    }
}
