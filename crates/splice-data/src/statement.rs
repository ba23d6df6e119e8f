//! Quarterly statement kinds and raw wide tables.

use crate::error::{DataError, Result};
use crate::frame::Frame;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// The four quarterly statements fused per security, in fusion order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Income statement
    #[display("income")]
    Income,
    /// Balance sheet
    #[display("balance")]
    Balance,
    /// Cash flow statement
    #[display("cash_flow")]
    CashFlow,
    /// Ratio statement
    #[display("ratios")]
    Ratios,
}

impl StatementKind {
    /// All kinds in fusion order.
    pub const ALL: [Self; 4] = [Self::Income, Self::Balance, Self::CashFlow, Self::Ratios];

    /// File-name segment used by the statement exports.
    pub const fn file_segment(&self) -> &'static str {
        match self {
            Self::Income => "income-statement",
            Self::Balance => "balance-sheet",
            Self::CashFlow => "cash-flow-statement",
            Self::Ratios => "ratios",
        }
    }

    /// Suffix appended to a column from this statement whose name is already taken.
    pub const fn collision_suffix(&self) -> &'static str {
        match self {
            Self::Income => "_income",
            Self::Balance => "_balance",
            Self::CashFlow => "_cash_flow",
            Self::Ratios => "_ratios",
        }
    }

    /// Whether columns from this statement are ratios rather than absolute figures.
    pub const fn is_ratio(&self) -> bool {
        matches!(self, Self::Ratios)
    }

    /// Expected file name for a ticker, e.g. `aapl-income-statement-quarterly.csv`.
    pub fn file_name(&self, ticker: &str) -> String {
        format!(
            "{}-{}-quarterly.csv",
            ticker.to_lowercase(),
            self.file_segment()
        )
    }
}

/// A raw wide statement: metrics as rows, reporting periods as columns.
#[derive(Debug, Clone, PartialEq)]
pub struct RawStatementTable {
    /// Which statement this is
    pub kind: StatementKind,
    /// Period labels in file order
    pub periods: Vec<String>,
    /// `(metric, cells)` rows in file order; each row has one cell per period
    pub rows: Vec<(String, Vec<String>)>,
}

impl RawStatementTable {
    /// Read a wide statement CSV.
    ///
    /// The first header cell must be `Date`; it names the axis holding the
    /// metric names. The remaining header cells are period labels. Short rows
    /// are padded with empty cells.
    pub fn from_path(kind: StatementKind, path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)?;

        let headers = reader.headers()?.clone();
        if headers.get(0).map(str::trim) != Some("Date") {
            return Err(DataError::MissingDateAxis(path.to_path_buf()));
        }
        let periods: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

        let mut rows: Vec<(String, Vec<String>)> = Vec::new();
        for record in reader.records() {
            let record = record?;
            let Some(metric) = record.get(0).map(str::trim) else {
                continue;
            };
            if metric.is_empty() {
                continue;
            }
            if rows.iter().any(|(m, _)| m == metric) {
                warn!(%kind, metric, path = %path.display(), "duplicate metric row, keeping first");
                continue;
            }
            let mut cells: Vec<String> = record.iter().skip(1).map(str::to_string).collect();
            cells.resize(periods.len(), String::new());
            rows.push((metric.to_string(), cells));
        }

        Ok(Self {
            kind,
            periods,
            rows,
        })
    }
}

/// One normalized statement: one row per period date, one column per metric.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementTable {
    /// Which statement this is
    pub kind: StatementKind,
    /// Date-indexed metric columns, dates unique and ascending
    pub frame: Frame,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_file_names() {
        assert_eq!(
            StatementKind::Income.file_name("AAPL"),
            "aapl-income-statement-quarterly.csv"
        );
        assert_eq!(
            StatementKind::CashFlow.file_name("MSFT"),
            "msft-cash-flow-statement-quarterly.csv"
        );
        assert_eq!(StatementKind::Ratios.to_string(), "ratios");
    }

    #[test]
    fn test_read_wide_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Date,2024-03-31,2023-12-31").unwrap();
        writeln!(file, "Revenue,100,90").unwrap();
        writeln!(file, "Gross Margin,45%").unwrap();
        writeln!(file, "Revenue,1,1").unwrap();

        let raw = RawStatementTable::from_path(StatementKind::Income, file.path()).unwrap();
        assert_eq!(raw.periods, vec!["2024-03-31", "2023-12-31"]);
        assert_eq!(raw.rows.len(), 2);
        assert_eq!(raw.rows[0].1, vec!["100", "90"]);
        assert_eq!(raw.rows[1].1, vec!["45%", ""]);
    }

    #[test]
    fn test_missing_date_axis() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Metric,2024-03-31").unwrap();
        writeln!(file, "Revenue,100").unwrap();

        let err = RawStatementTable::from_path(StatementKind::Balance, file.path()).unwrap_err();
        assert!(matches!(err, DataError::MissingDateAxis(_)));
    }
}
