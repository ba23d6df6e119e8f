#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/splice/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod align;
pub mod changes;
pub mod error;
pub mod fill;
pub mod fusion;
pub mod ratios;
pub mod table;
pub mod valuation;

pub use align::{AlignConfig, Alignment, align, asof_backward, trim_start};
pub use changes::{PCT_CHANGE_SUFFIX, change_series, percent_change};
pub use error::{EngineError, Result};
pub use fill::{FillPolicy, FillStep};
pub use fusion::{ColumnPartition, FusedQuarterlyTable, fuse};
pub use ratios::{Expr, RatioDefinition, RatioPreset, RatioSet, safe_divide};
pub use table::{EngineConfig, FusedDailyTable};
pub use valuation::{PV_COLUMN, PresentValue, ValuationConfig, present_values};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
