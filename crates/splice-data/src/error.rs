//! Error types for data operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading and normalizing input tables.
#[derive(Debug, Error)]
pub enum DataError {
    /// One or more required input files are absent for a security
    #[error("Missing input for {ticker}: {}", files.join(", "))]
    MissingInput {
        /// Ticker whose inputs were looked up
        ticker: String,
        /// File names that were not found
        files: Vec<String>,
    },

    /// A date label could not be parsed
    #[error("Unparseable date {value:?} in {origin}")]
    UnparseableDate {
        /// Table or file the label came from
        origin: String,
        /// The raw label
        value: String,
    },

    /// A wide statement table has no `Date` index axis
    #[error("No Date axis in {}", .0.display())]
    MissingDateAxis(PathBuf),

    /// A required column is absent
    #[error("Missing column {column:?} in {origin}")]
    MissingColumn {
        /// Table or file that was inspected
        origin: String,
        /// Name of the absent column
        column: String,
    },

    /// A column name already exists in a frame
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// A column does not match the frame height
    #[error("Column {column:?} has {actual} rows, expected {expected}")]
    LengthMismatch {
        /// Name of the offending column
        column: String,
        /// Frame height
        expected: usize,
        /// Column length
        actual: usize,
    },

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
