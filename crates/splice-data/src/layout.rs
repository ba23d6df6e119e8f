//! On-disk input layout.
//!
//! Each security lives in its own directory under the input root:
//!
//! ```text
//! <root>/<TICKER>/<TICKER>.csv
//! <root>/<TICKER>/<ticker>-income-statement-quarterly.csv
//! <root>/<TICKER>/<ticker>-balance-sheet-quarterly.csv
//! <root>/<TICKER>/<ticker>-cash-flow-statement-quarterly.csv
//! <root>/<TICKER>/<ticker>-ratios-quarterly.csv
//! ```

use crate::error::{DataError, Result};
use crate::statement::StatementKind;
use std::path::{Path, PathBuf};

/// Suffix of the fused output file name.
pub const OUTPUT_SUFFIX: &str = "_with_all.csv";

/// Resolved input files for one security.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityFiles {
    /// Ticker symbol as it appears in the directory name
    pub ticker: String,
    /// Directory holding the inputs
    pub dir: PathBuf,
    /// Daily price file
    pub daily: PathBuf,
    /// Statement files in fusion order
    pub statements: [(StatementKind, PathBuf); 4],
}

impl SecurityFiles {
    /// Resolve the expected paths for a ticker without touching the filesystem.
    pub fn resolve(root: &Path, ticker: &str) -> Self {
        let dir = root.join(ticker);
        let statements = StatementKind::ALL.map(|kind| (kind, dir.join(kind.file_name(ticker))));
        Self {
            ticker: ticker.to_string(),
            daily: dir.join(format!("{ticker}.csv")),
            dir,
            statements,
        }
    }

    /// Resolve and check that every input exists.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MissingInput`] listing every absent file.
    pub fn locate(root: &Path, ticker: &str) -> Result<Self> {
        let files = Self::resolve(root, ticker);
        let missing: Vec<String> = files
            .statements
            .iter()
            .map(|(_, path)| path)
            .chain(std::iter::once(&files.daily))
            .filter(|path| !path.is_file())
            .map(|path| {
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string())
            })
            .collect();

        if missing.is_empty() {
            Ok(files)
        } else {
            Err(DataError::MissingInput {
                ticker: ticker.to_string(),
                files: missing,
            })
        }
    }

    /// Output path: `<dir>/<TICKER>_with_all.csv`, where `dir` defaults to the
    /// security's own input directory.
    pub fn output_path(&self, output_root: Option<&Path>) -> PathBuf {
        output_root
            .unwrap_or(self.dir.as_path())
            .join(format!("{}{OUTPUT_SUFFIX}", self.ticker))
    }
}

/// List tickers as the sorted names of the sub-directories of `root`.
pub fn discover_tickers(root: &Path) -> Result<Vec<String>> {
    let mut tickers = Vec::new();
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_dir()
            && let Some(name) = entry.file_name().to_str()
        {
            tickers.push(name.to_string());
        }
    }
    tickers.sort();
    Ok(tickers)
}
