//! The per-security daily output table.

use crate::align::{AlignConfig, align};
use crate::changes::{PCT_CHANGE_SUFFIX, change_series};
use crate::error::Result;
use crate::fill::FillPolicy;
use crate::fusion::{FusedQuarterlyTable, unique_name};
use crate::ratios::RatioSet;
use crate::valuation::{PV_COLUMN, PresentValue, ValuationConfig, present_values};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use splice_data::{DailySeries, DataError, Frame, NumericColumn};
use std::collections::BTreeSet;
use tracing::debug;

/// Parameters for turning fused statements and daily prices into a
/// [`FusedDailyTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Gap fill on the quarterly table
    pub quarterly_fill: FillPolicy,
    /// Daily alignment
    pub align: AlignConfig,
    /// Ratios recomputed on daily rows
    pub ratios: RatioSet,
    /// Fail on ratio fields the table does not carry
    pub strict_fields: bool,
    /// Present value parameters
    pub valuation: ValuationConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quarterly_fill: FillPolicy::quarterly(),
            align: AlignConfig::default(),
            ratios: RatioSet::standard(),
            strict_fields: true,
            valuation: ValuationConfig::default(),
        }
    }
}

/// Daily rows with as-of quarterly fields, recomputed ratios, a present value
/// and quarterly change columns.
///
/// Output column order is `Close`, `Volume`, quarterly fields and ratios (all
/// in `frame`), then [`PV_COLUMN`], then the change columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FusedDailyTable {
    /// Daily, quarterly and ratio columns
    pub frame: Frame,
    /// One present value per row
    pub present_value: Vec<PresentValue>,
    /// `... Pct Change` columns, one per quarterly column
    pub changes: Vec<NumericColumn>,
}

impl FusedDailyTable {
    /// Gap-fill `fused`, align it to `daily`, then derive ratios, present
    /// values and change columns.
    ///
    /// # Errors
    ///
    /// Alignment errors, a missing ratio field under `strict_fields`, or a
    /// quarterly column whose name collides with a daily or present value
    /// column.
    pub fn build(
        mut fused: FusedQuarterlyTable,
        daily: &DailySeries,
        config: &EngineConfig,
    ) -> Result<Self> {
        fused.fill_gaps(&config.quarterly_fill);

        let alignment = align(&fused, daily, &config.align)?;
        let changes = alignment.attach(&change_series(&fused), &config.align.fill);
        let mut frame = alignment.frame;

        config.ratios.apply(&mut frame, config.strict_fields)?;
        if frame.contains(PV_COLUMN) {
            return Err(DataError::DuplicateColumn(PV_COLUMN.to_string()).into());
        }
        let present_value = present_values(&frame, &config.valuation);

        let mut taken: BTreeSet<String> = frame.column_names().map(str::to_string).collect();
        taken.insert(PV_COLUMN.to_string());
        let changes = changes
            .into_iter()
            .map(|mut column| {
                column.name = unique_name(&column.name, PCT_CHANGE_SUFFIX, &taken);
                taken.insert(column.name.clone());
                column
            })
            .collect();

        debug!(
            rows = frame.height(),
            columns = frame.width(),
            "built fused daily table"
        );

        Ok(Self {
            frame,
            present_value,
            changes,
        })
    }

    /// Trading dates.
    pub fn dates(&self) -> &[NaiveDate] {
        self.frame.dates()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Value column names in output order, excluding the date.
    pub fn column_names(&self) -> Vec<&str> {
        self.frame
            .column_names()
            .chain(std::iter::once(PV_COLUMN))
            .chain(self.changes.iter().map(|c| c.name.as_str()))
            .collect()
    }

    /// Look up a numeric column in either the main frame or the changes.
    pub fn column(&self, name: &str) -> Option<&NumericColumn> {
        self.frame
            .column(name)
            .or_else(|| self.changes.iter().find(|c| c.name == name))
    }
}
