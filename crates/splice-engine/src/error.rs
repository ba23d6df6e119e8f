//! Engine error types.

use chrono::NaiveDate;
use splice_data::DataError;
use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors raised while fusing and aligning a single security.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No quarterly rows survived normalization
    #[error("No quarterly periods to fuse")]
    EmptyQuarterly,

    /// No daily observation on or after the first quarterly date
    #[error("No daily data on or after earliest quarterly date {earliest}")]
    NoOverlap {
        /// Earliest quarterly date
        earliest: NaiveDate,
    },

    /// A ratio references a field the fused table does not carry
    #[error("Ratio {ratio:?} needs missing field {field:?}")]
    MissingField {
        /// Ratio being computed
        ratio: String,
        /// Field that was not found
        field: String,
    },

    /// Frame construction error
    #[error(transparent)]
    Data(#[from] DataError),
}
