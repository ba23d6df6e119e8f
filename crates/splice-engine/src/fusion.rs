//! Statement fusion.
//!
//! Outer-joins the four normalized statements on date. Columns keep their
//! statement's block order (income, balance, cash flow, ratios); a name that
//! is already taken by an earlier block gets the incoming block's suffix
//! instead of overwriting the earlier column.

use crate::error::{EngineError, Result};
use crate::fill::FillPolicy;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use splice_data::{Frame, NumericColumn, StatementTable};
use std::collections::BTreeSet;
use tracing::debug;

/// Split of fused columns into absolute figures and ratios.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnPartition {
    /// Income, balance sheet and cash flow columns
    pub absolute: Vec<String>,
    /// Ratio statement columns
    pub ratio: Vec<String>,
}

impl ColumnPartition {
    /// All partitioned column names, absolute first.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.absolute
            .iter()
            .chain(self.ratio.iter())
            .map(String::as_str)
    }

    /// Whether a column belongs to either partition.
    pub fn contains(&self, name: &str) -> bool {
        self.names().any(|n| n == name)
    }
}

/// Quarterly records from all four statements on one date index.
#[derive(Debug, Clone, PartialEq)]
pub struct FusedQuarterlyTable {
    /// One row per distinct period date, ascending
    pub frame: Frame,
    /// Absolute/ratio split of the frame's columns
    pub partition: ColumnPartition,
}

impl FusedQuarterlyTable {
    /// First period date.
    pub fn earliest_date(&self) -> Option<NaiveDate> {
        self.frame.dates().first().copied()
    }

    /// Fill gaps in every partitioned column with `policy`.
    pub fn fill_gaps(&mut self, policy: &FillPolicy) {
        let names: Vec<String> = self.partition.names().map(str::to_string).collect();
        for name in names {
            if let Some(column) = self.frame.column_mut(&name) {
                policy.apply(&mut column.values);
            }
        }
    }
}

/// Pick a name for an incoming column that does not collide with `taken`.
pub(crate) fn unique_name(name: &str, suffix: &str, taken: &BTreeSet<String>) -> String {
    let mut candidate = name.to_string();
    while taken.contains(&candidate) {
        candidate.push_str(suffix);
    }
    candidate
}

/// Fuse normalized statements into one quarterly table.
///
/// Statements are joined in statement order regardless of slice order.
///
/// # Errors
///
/// Returns [`EngineError::EmptyQuarterly`] when no statement has any period.
pub fn fuse(statements: &[StatementTable]) -> Result<FusedQuarterlyTable> {
    let mut ordered: Vec<&StatementTable> = statements.iter().collect();
    ordered.sort_by_key(|s| s.kind);

    let dates: Vec<NaiveDate> = ordered
        .iter()
        .flat_map(|s| s.frame.dates().iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if dates.is_empty() {
        return Err(EngineError::EmptyQuarterly);
    }

    let mut frame = Frame::new(dates.clone());
    let mut partition = ColumnPartition::default();
    let mut taken = BTreeSet::new();

    for statement in ordered {
        // Row in this statement for each fused date.
        let rows: Vec<Option<usize>> = dates
            .iter()
            .map(|d| statement.frame.dates().binary_search(d).ok())
            .collect();

        for column in statement.frame.columns() {
            let name = unique_name(&column.name, statement.kind.collision_suffix(), &taken);
            if name != column.name {
                debug!(kind = %statement.kind, from = %column.name, to = %name, "renamed colliding column");
            }
            let mut fused = column.gather(&rows);
            fused.name = name.clone();
            frame.push_column(fused)?;

            if statement.kind.is_ratio() {
                partition.ratio.push(name.clone());
            } else {
                partition.absolute.push(name.clone());
            }
            taken.insert(name);
        }
    }

    debug!(
        periods = frame.height(),
        columns = frame.width(),
        "fused quarterly statements"
    );

    Ok(FusedQuarterlyTable { frame, partition })
}

/// Build a statement table from literal columns; used by tests across the crate.
#[cfg(test)]
pub(crate) fn statement(
    kind: splice_data::StatementKind,
    dates: &[NaiveDate],
    columns: &[(&str, &[Option<f64>])],
) -> StatementTable {
    let frame = Frame::with_columns(
        dates.to_vec(),
        columns
            .iter()
            .map(|(name, values)| NumericColumn::new(*name, values.to_vec()))
            .collect(),
    )
    .unwrap();
    StatementTable { kind, frame }
}
