#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/splice/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod dataframe;
pub mod export;
pub mod report;

pub use dataframe::to_dataframe;
pub use export::{DATE_HEADER, ExportError, ExportFormat, Exporter, write_table_csv};
pub use report::{OutcomeStatus, RunReport, TickerOutcome};
