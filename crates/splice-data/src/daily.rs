//! Daily price history.

use crate::error::{DataError, Result};
use crate::frame::{Frame, NumericColumn};
use crate::normalize::{parse_cell, parse_date_label};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Header of the date column in the daily file.
pub const DATE_COLUMN: &str = "Date";
/// Header of the close price column.
pub const CLOSE_COLUMN: &str = "Close";
/// Header of the volume column.
pub const VOLUME_COLUMN: &str = "Volume";

/// One trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    /// Trading date
    pub date: NaiveDate,
    /// Closing price
    pub close: Option<f64>,
    /// Traded volume
    pub volume: Option<f64>,
}

/// Daily bars sorted ascending with unique dates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DailySeries {
    bars: Vec<DailyBar>,
}

impl DailySeries {
    /// Build a series from bars in any order.
    ///
    /// Bars are sorted by date; when a date repeats, the first bar in input
    /// order is kept.
    pub fn new(mut bars: Vec<DailyBar>) -> Self {
        bars.sort_by_key(|b| b.date);
        let before = bars.len();
        bars.dedup_by_key(|b| b.date);
        if bars.len() < before {
            warn!(dropped = before - bars.len(), "duplicate trading dates, keeping first");
        }
        Self { bars }
    }

    /// Read a `Date,Close,Volume` CSV.
    ///
    /// Any row whose date cannot be parsed fails the whole file; partially
    /// dated price history would silently misalign the as-of join.
    pub fn from_path(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(path)?;
        let headers = reader.headers()?.clone();
        let position = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| DataError::MissingColumn {
                    origin: path.display().to_string(),
                    column: name.to_string(),
                })
        };
        let date_idx = position(DATE_COLUMN)?;
        let close_idx = position(CLOSE_COLUMN)?;
        let volume_idx = position(VOLUME_COLUMN)?;

        let mut bars = Vec::new();
        for record in reader.records() {
            let record = record?;
            let label = record.get(date_idx).unwrap_or_default();
            let date = parse_date_label(label).ok_or_else(|| DataError::UnparseableDate {
                origin: path.display().to_string(),
                value: label.to_string(),
            })?;
            bars.push(DailyBar {
                date,
                close: record.get(close_idx).and_then(parse_cell),
                volume: record.get(volume_idx).and_then(parse_cell),
            });
        }

        debug!(path = %path.display(), rows = bars.len(), "loaded daily prices");
        Ok(Self::new(bars))
    }

    /// Bars in ascending date order.
    pub fn bars(&self) -> &[DailyBar] {
        &self.bars
    }

    /// Trading dates in ascending order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|b| b.date).collect()
    }

    /// Number of trading days.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether there are no trading days.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Bars from index `start` onwards.
    pub fn slice_from(&self, start: usize) -> Self {
        Self {
            bars: self.bars[start.min(self.bars.len())..].to_vec(),
        }
    }

    /// Frame with `Close` and `Volume` columns.
    pub fn to_frame(&self) -> Result<Frame> {
        Frame::with_columns(
            self.dates(),
            vec![
                NumericColumn::new(CLOSE_COLUMN, self.bars.iter().map(|b| b.close).collect()),
                NumericColumn::new(VOLUME_COLUMN, self.bars.iter().map(|b| b.volume).collect()),
            ],
        )
    }
}
