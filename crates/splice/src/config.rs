//! Pipeline configuration.

use crate::universe::{DirectoryUniverse, ListedUniverse, Universe};
use serde::{Deserialize, Serialize};
use splice_data::QuarterlyDatePolicy;
use splice_engine::EngineConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Fatal configuration errors. These stop the run before any ticker is
/// processed.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to read config {path}: {source}")]
    Read {
        /// Config file
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Configuration file is not valid JSON for [`PipelineConfig`]
    #[error("Invalid config {path}: {source}")]
    Parse {
        /// Config file
        path: PathBuf,
        /// Underlying error
        source: serde_json::Error,
    },

    /// Input root is not a directory
    #[error("Input root {0} is not a directory")]
    MissingInputRoot(PathBuf),

    /// Non-finite valuation parameter
    #[error("Invalid valuation rates: discount {discount_rate}, growth {growth_rate}")]
    InvalidRates {
        /// Discount rate
        discount_rate: f64,
        /// Growth rate
        growth_rate: f64,
    },

    /// Tickers could not be listed
    #[error("Failed to list tickers: {0}")]
    Discovery(#[from] splice_data::DataError),
}

/// Everything a run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding one sub-directory per ticker
    pub input_root: PathBuf,
    /// Output directory; each ticker's own input directory when unset
    pub output_root: Option<PathBuf>,
    /// Tickers to process; every sub-directory of `input_root` when empty
    pub tickers: Vec<String>,
    /// Handling of statement periods that are not dates
    pub date_policy: QuarterlyDatePolicy,
    /// Fusion, alignment, ratio and valuation parameters
    pub engine: EngineConfig,
    /// Process tickers on the rayon thread pool
    pub parallel: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_root: PathBuf::from("data"),
            output_root: None,
            tickers: Vec::new(),
            date_policy: QuarterlyDatePolicy::default(),
            engine: EngineConfig::default(),
            parallel: false,
        }
    }
}

impl PipelineConfig {
    /// Config rooted at `input_root` with defaults elsewhere.
    pub fn new(input_root: impl Into<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            ..Self::default()
        }
    }

    /// Load from a JSON file; absent keys take their defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check settings that would fail every ticker.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingInputRoot`] or [`ConfigError::InvalidRates`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.input_root.is_dir() {
            return Err(ConfigError::MissingInputRoot(self.input_root.clone()));
        }
        let valuation = &self.engine.valuation;
        if !valuation.discount_rate.is_finite() || !valuation.growth_rate.is_finite() {
            return Err(ConfigError::InvalidRates {
                discount_rate: valuation.discount_rate,
                growth_rate: valuation.growth_rate,
            });
        }
        Ok(())
    }

    /// Tickers to process, sorted.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Discovery`] if the input root cannot be listed.
    pub fn tickers(&self) -> Result<Vec<String>, ConfigError> {
        let symbols = if self.tickers.is_empty() {
            DirectoryUniverse {
                root: self.input_root.clone(),
            }
            .symbols()?
        } else {
            ListedUniverse(self.tickers.clone()).symbols()?
        };
        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splice_engine::{FillPolicy, RatioSet};

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("splice.json");
        std::fs::write(
            &path,
            r#"{
                "input_root": "/srv/data",
                "tickers": ["AAPL"],
                "engine": {
                    "align": {"fill": {"steps": ["forward", "backward"]}},
                    "valuation": {"discount_rate": 0.03, "growth_rate": 0.01}
                }
            }"#,
        )
        .unwrap();

        let config = PipelineConfig::from_json_file(&path).unwrap();
        assert_eq!(config.input_root, PathBuf::from("/srv/data"));
        assert_eq!(config.output_root, None);
        assert_eq!(config.engine.align.fill, FillPolicy::legacy_daily());
        assert_eq!(config.engine.quarterly_fill, FillPolicy::quarterly());
        assert_eq!(config.engine.ratios, RatioSet::standard());
        assert!(config.engine.strict_fields);
        assert_eq!(config.date_policy, QuarterlyDatePolicy::Reject);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("splice.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            PipelineConfig::from_json_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_validate() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = PipelineConfig::new(dir.path());
        assert!(config.validate().is_ok());

        config.engine.valuation.growth_rate = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRates { .. })));

        let missing = PipelineConfig::new(dir.path().join("absent"));
        assert!(matches!(missing.validate(), Err(ConfigError::MissingInputRoot(_))));
    }

    #[test]
    fn test_listed_tickers_win_over_discovery() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("AAPL")).unwrap();
        let mut config = PipelineConfig::new(dir.path());
        assert_eq!(config.tickers().unwrap(), vec!["AAPL"]);

        config.tickers = vec!["ZZZ".to_string()];
        assert_eq!(config.tickers().unwrap(), vec!["ZZZ"]);
    }
}
