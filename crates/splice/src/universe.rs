//! Which tickers a run processes.

use serde::{Deserialize, Serialize};
use splice_data::{DataError, discover_tickers};
use std::path::PathBuf;

/// Trait for ticker universes.
pub trait Universe {
    /// All symbols in the universe, sorted and unique.
    ///
    /// # Errors
    ///
    /// Returns an error if the symbols cannot be listed.
    fn symbols(&self) -> Result<Vec<String>, DataError>;

    /// Check if a symbol is in the universe.
    fn contains(&self, symbol: &str) -> Result<bool, DataError> {
        Ok(self.symbols()?.iter().any(|s| s == symbol))
    }
}

/// An explicit ticker list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedUniverse(pub Vec<String>);

impl Universe for ListedUniverse {
    fn symbols(&self) -> Result<Vec<String>, DataError> {
        let mut symbols: Vec<String> = self.0.iter().map(|s| s.trim().to_string()).collect();
        symbols.retain(|s| !s.is_empty());
        symbols.sort();
        symbols.dedup();
        Ok(symbols)
    }
}

/// Every sub-directory of an input root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUniverse {
    /// Input root
    pub root: PathBuf,
}

impl Universe for DirectoryUniverse {
    fn symbols(&self) -> Result<Vec<String>, DataError> {
        discover_tickers(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listed_universe_sorted_unique() {
        let universe = ListedUniverse(vec!["MSFT".into(), " AAPL ".into(), "MSFT".into(), String::new()]);
        assert_eq!(universe.symbols().unwrap(), vec!["AAPL", "MSFT"]);
        assert!(universe.contains("AAPL").unwrap());
        assert!(!universe.contains("NOTREAL").unwrap());
    }

    #[test]
    fn test_directory_universe() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("MSFT")).unwrap();
        std::fs::create_dir(dir.path().join("AAPL")).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let universe = DirectoryUniverse {
            root: dir.path().to_path_buf(),
        };
        assert_eq!(universe.symbols().unwrap(), vec!["AAPL", "MSFT"]);
    }
}
