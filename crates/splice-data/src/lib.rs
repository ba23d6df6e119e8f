#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/splice/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod daily;
pub mod error;
pub mod frame;
pub mod layout;
pub mod normalize;
pub mod statement;

pub use daily::{DailyBar, DailySeries};
pub use error::{DataError, Result};
pub use frame::{Frame, NumericColumn};
pub use layout::{SecurityFiles, discover_tickers};
pub use normalize::{QuarterlyDatePolicy, normalize, parse_cell, parse_date_label};
pub use statement::{RawStatementTable, StatementKind, StatementTable};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
