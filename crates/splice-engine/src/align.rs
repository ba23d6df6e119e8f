//! Temporal alignment of daily prices with quarterly records.
//!
//! Each trading day is associated with the latest quarterly row dated on or
//! before it (a backward as-of join). The daily history is first trimmed to
//! start one trading day before the earliest quarter.

use crate::error::{EngineError, Result};
use crate::fill::FillPolicy;
use crate::fusion::FusedQuarterlyTable;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use splice_data::{DailySeries, Frame, NumericColumn};
use tracing::debug;

/// Configuration for the daily alignment stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    /// Residual fill applied to quarterly-derived daily columns (default: forward only)
    pub fill: FillPolicy,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            fill: FillPolicy::daily(),
        }
    }
}

/// For each target date, the index of the greatest key `<=` it.
///
/// Both slices must be sorted ascending.
pub fn asof_backward(keys: &[NaiveDate], targets: &[NaiveDate]) -> Vec<Option<usize>> {
    targets
        .iter()
        .map(|target| keys.partition_point(|k| k <= target).checked_sub(1))
        .collect()
}

/// Index of the first retained daily row.
///
/// That is one row before the first date on or after `earliest`, or the first
/// such row itself when nothing precedes it. `None` when no daily date reaches
/// `earliest`.
pub fn trim_start(daily: &[NaiveDate], earliest: NaiveDate) -> Option<usize> {
    let first_covered = daily.partition_point(|d| *d < earliest);
    (first_covered < daily.len()).then(|| first_covered.saturating_sub(1))
}

/// Daily rows joined with their as-of quarterly values.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// `Close`, `Volume`, then the fused quarterly columns in fused order
    pub frame: Frame,
    /// Quarterly row attached to each daily row
    pub asof: Vec<Option<usize>>,
}

impl Alignment {
    /// Attach quarterly-shaped columns to the daily rows with the same as-of
    /// association, then fill with `policy`.
    pub fn attach(&self, columns: &[NumericColumn], policy: &FillPolicy) -> Vec<NumericColumn> {
        columns
            .iter()
            .map(|column| {
                let mut daily = column.gather(&self.asof);
                policy.apply(&mut daily.values);
                daily
            })
            .collect()
    }

    /// Quarterly date each daily row was associated with.
    pub fn source_dates(&self, quarterly: &FusedQuarterlyTable) -> Vec<Option<NaiveDate>> {
        let dates = quarterly.frame.dates();
        self.asof
            .iter()
            .map(|idx| idx.map(|i| dates[i]))
            .collect()
    }
}

/// Trim `daily` against `fused` and join every retained day to its as-of
/// quarterly row.
///
/// # Errors
///
/// [`EngineError::NoOverlap`] when no trading day falls on or after the first
/// quarter, [`EngineError::EmptyQuarterly`] when `fused` has no rows.
pub fn align(
    fused: &FusedQuarterlyTable,
    daily: &DailySeries,
    config: &AlignConfig,
) -> Result<Alignment> {
    let earliest = fused.earliest_date().ok_or(EngineError::EmptyQuarterly)?;
    let start = trim_start(&daily.dates(), earliest).ok_or(EngineError::NoOverlap { earliest })?;

    let daily = daily.slice_from(start);
    let mut frame = daily.to_frame()?;
    let asof = asof_backward(fused.frame.dates(), frame.dates());

    for column in fused.frame.columns() {
        let mut joined = column.gather(&asof);
        if fused.partition.contains(&column.name) {
            config.fill.apply(&mut joined.values);
        }
        frame.push_column(joined)?;
    }

    debug!(
        rows = frame.height(),
        first = %frame.dates()[0],
        trimmed = start,
        "aligned daily rows to quarterly records"
    );

    Ok(Alignment { frame, asof })
}
