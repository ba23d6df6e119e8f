//! Run reports.

use crate::export::{ExportError, ExportFormat, Exporter};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What happened to one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Output file written.
    Written {
        /// Output path
        output: PathBuf,
        /// Trading-day rows
        rows: usize,
        /// Columns including `Date`
        columns: usize,
    },
    /// Security skipped.
    Skipped {
        /// Error that caused the skip
        reason: String,
    },
}

/// Outcome for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerOutcome {
    /// Ticker symbol
    pub ticker: String,
    /// Result
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl TickerOutcome {
    /// A written outcome.
    pub fn written(ticker: impl Into<String>, output: PathBuf, rows: usize, columns: usize) -> Self {
        Self {
            ticker: ticker.into(),
            status: OutcomeStatus::Written {
                output,
                rows,
                columns,
            },
        }
    }

    /// A skipped outcome.
    pub fn skipped(ticker: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            status: OutcomeStatus::Skipped {
                reason: reason.into(),
            },
        }
    }

    /// Whether the output file was written.
    pub const fn is_written(&self) -> bool {
        matches!(self.status, OutcomeStatus::Written { .. })
    }
}

/// Summary of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Report generation timestamp.
    pub timestamp: DateTime<Utc>,

    /// Input root the run read from.
    pub input_root: PathBuf,

    /// Per-ticker outcomes, sorted by ticker.
    pub outcomes: Vec<TickerOutcome>,
}

impl RunReport {
    /// Create a report; outcomes are sorted by ticker.
    pub fn new(input_root: PathBuf, mut outcomes: Vec<TickerOutcome>) -> Self {
        outcomes.sort_by(|a, b| a.ticker.cmp(&b.ticker));
        Self {
            timestamp: Utc::now(),
            input_root,
            outcomes,
        }
    }

    /// Number of tickers written.
    pub fn written(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_written()).count()
    }

    /// Number of tickers skipped.
    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.written()
    }

    /// Convert report to a pretty JSON string.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Serialize)]
struct OutcomeRow<'a> {
    ticker: &'a str,
    status: &'static str,
    output: Option<String>,
    rows: Option<usize>,
    columns: Option<usize>,
    reason: Option<&'a str>,
}

impl<'a> From<&'a TickerOutcome> for OutcomeRow<'a> {
    fn from(outcome: &'a TickerOutcome) -> Self {
        match &outcome.status {
            OutcomeStatus::Written {
                output,
                rows,
                columns,
            } => Self {
                ticker: &outcome.ticker,
                status: "written",
                output: Some(output.display().to_string()),
                rows: Some(*rows),
                columns: Some(*columns),
                reason: None,
            },
            OutcomeStatus::Skipped { reason } => Self {
                ticker: &outcome.ticker,
                status: "skipped",
                output: None,
                rows: None,
                columns: None,
                reason: Some(reason.as_str()),
            },
        }
    }
}

impl Exporter for RunReport {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(vec![]);
                for outcome in &self.outcomes {
                    wtr.serialize(OutcomeRow::from(outcome))?;
                }
                let data = String::from_utf8(wtr.into_inner().map_err(|e| e.into_error())?)?;
                Ok(data)
            }
            ExportFormat::Json => Ok(serde_json::to_string(self)?),
            ExportFormat::PrettyJson => self.to_json(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> RunReport {
        RunReport::new(
            PathBuf::from("data"),
            vec![
                TickerOutcome::skipped("MSFT", "Missing input for MSFT: msft-ratios-quarterly.csv"),
                TickerOutcome::written("AAPL", PathBuf::from("data/AAPL/AAPL_with_all.csv"), 250, 40),
            ],
        )
    }

    #[test]
    fn test_report_sorted_and_counted() {
        let report = report();
        assert_eq!(report.outcomes[0].ticker, "AAPL");
        assert_eq!(report.written(), 1);
        assert_eq!(report.skipped(), 1);
    }

    #[test]
    fn test_report_json_shape() {
        let json: serde_json::Value = serde_json::from_str(&report().to_json().unwrap()).unwrap();
        let outcomes = json["outcomes"].as_array().unwrap();
        assert_eq!(outcomes[0]["status"], "written");
        assert_eq!(outcomes[0]["rows"], 250);
        assert_eq!(outcomes[1]["status"], "skipped");
        assert!(outcomes[1]["reason"].as_str().unwrap().contains("msft-ratios"));

        let back: RunReport = serde_json::from_value(json).unwrap();
        assert_eq!(back.outcomes, report().outcomes);
    }

    #[test]
    fn test_report_csv() {
        let csv = report().export_to_string(ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "ticker,status,output,rows,columns,reason");
        assert_eq!(lines[1], "AAPL,written,data/AAPL/AAPL_with_all.csv,250,40,");
        assert!(lines[2].starts_with("MSFT,skipped,,,,"));
    }
}
