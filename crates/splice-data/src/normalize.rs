//! Statement normalization.
//!
//! Turns a [`RawStatementTable`] (metrics × periods, text cells) into a
//! [`StatementTable`] (dates × metrics, numeric cells) sorted by date.

use crate::error::{DataError, Result};
use crate::frame::{Frame, NumericColumn};
use crate::statement::{RawStatementTable, StatementTable};
use chrono::{NaiveDate, NaiveDateTime};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// What to do with a statement period label that is not a date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuarterlyDatePolicy {
    /// Fail the statement with [`DataError::UnparseableDate`]
    #[default]
    #[display("reject")]
    Reject,
    /// Drop the period and log a warning
    #[display("drop")]
    Drop,
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Remove a trailing UTC offset of the form `+HH:MM` / `-HH:MM`.
pub fn strip_utc_offset(label: &str) -> &str {
    let label = label.trim();
    let bytes = label.as_bytes();
    let n = bytes.len();
    if n < 6 {
        return label;
    }
    let tail = &bytes[n - 6..];
    let is_offset = matches!(tail[0], b'+' | b'-')
        && tail[1].is_ascii_digit()
        && tail[2].is_ascii_digit()
        && tail[3] == b':'
        && tail[4].is_ascii_digit()
        && tail[5].is_ascii_digit();
    if is_offset { &label[..n - 6] } else { label }
}

/// Parse a period or trading-day label into a calendar date.
///
/// Offsets are stripped first and any time-of-day component is discarded.
pub fn parse_date_label(label: &str) -> Option<NaiveDate> {
    let s = strip_utc_offset(label);
    if s.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse one statement cell.
///
/// A trailing `%` divides the value by 100. Empty, non-numeric and
/// non-finite cells are null.
pub fn parse_cell(cell: &str) -> Option<f64> {
    let s = cell.trim();
    let (number, scale) = match s.strip_suffix('%') {
        Some(stripped) => (stripped.trim(), 100.0),
        None => (s, 1.0),
    };
    if number.is_empty() {
        return None;
    }
    number
        .parse::<f64>()
        .ok()
        .map(|v| v / scale)
        .filter(|v| v.is_finite())
}

/// Normalize a raw wide statement into a date-indexed table.
///
/// Periods are transposed into rows and sorted ascending. A period whose date
/// duplicates an earlier one is dropped.
pub fn normalize(raw: &RawStatementTable, policy: QuarterlyDatePolicy) -> Result<StatementTable> {
    let mut periods: Vec<(NaiveDate, usize)> = Vec::with_capacity(raw.periods.len());
    for (idx, label) in raw.periods.iter().enumerate() {
        match parse_date_label(label) {
            Some(date) => periods.push((date, idx)),
            None => match policy {
                QuarterlyDatePolicy::Reject => {
                    return Err(DataError::UnparseableDate {
                        origin: format!("{} statement", raw.kind),
                        value: label.clone(),
                    });
                }
                QuarterlyDatePolicy::Drop => {
                    warn!(kind = %raw.kind, label = %label, "dropping unparseable period");
                }
            },
        }
    }

    // Stable sort keeps file order among equal dates so the first one wins.
    periods.sort_by_key(|(date, _)| *date);
    let before = periods.len();
    periods.dedup_by_key(|(date, _)| *date);
    if periods.len() < before {
        warn!(
            kind = %raw.kind,
            dropped = before - periods.len(),
            "duplicate period dates, keeping first"
        );
    }

    let dates: Vec<NaiveDate> = periods.iter().map(|(date, _)| *date).collect();
    let mut frame = Frame::new(dates);
    for (metric, cells) in &raw.rows {
        let values = periods
            .iter()
            .map(|(_, idx)| cells.get(*idx).and_then(|c| parse_cell(c)))
            .collect();
        frame.push_column(NumericColumn::new(metric.clone(), values))?;
    }

    debug!(
        kind = %raw.kind,
        periods = frame.height(),
        metrics = frame.width(),
        "normalized statement"
    );

    Ok(StatementTable {
        kind: raw.kind,
        frame,
    })
}
