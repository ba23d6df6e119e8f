#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/splice/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod batch;
pub mod config;
pub mod pipeline;
pub mod universe;

// Re-export main types from sub-crates
pub use splice_data as data;
pub use splice_engine as engine;
pub use splice_output as output;

pub use batch::run_batch;
pub use config::{ConfigError, PipelineConfig};
pub use pipeline::{PipelineError, WrittenTable, build_table, process_ticker, ticker_outcome};
pub use universe::{DirectoryUniverse, ListedUniverse, Universe};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
