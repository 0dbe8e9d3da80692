//! Ingestion configuration.
//!
//! # Example
//!
//! ```
//! use infobase::config::IngestConfig;
//!
//! let config = IngestConfig::default()
//!     .with_skip_missing(true)
//!     .with_parallel(true)
//!     .with_shard_rows(1024);
//! assert!(config.is_missing("?"));
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{InfoBaseError, Result};

/// Textual representations of a missing value.
pub const DEFAULT_MISSING_SYMBOLS: [&str; 4] = ["", "?", " ", "NaN"];

/// Settings for building an InfoBase from a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Leave cells matching `missing_symbols` out of the index.
    pub skip_missing: bool,
    pub missing_symbols: Vec<String>,
    /// Index row shards on a rayon pool, then merge.
    pub parallel: bool,
    /// Rows per shard for parallel ingestion.
    pub shard_rows: usize,
    /// Worker threads for parallel ingestion (default: CPU count).
    pub threads: Option<usize>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        IngestConfig {
            skip_missing: false,
            missing_symbols: DEFAULT_MISSING_SYMBOLS
                .iter()
                .map(|symbol| symbol.to_string())
                .collect(),
            parallel: false,
            shard_rows: 4096,
            threads: None,
        }
    }
}

impl IngestConfig {
    /// Load a configuration from a JSON file. Absent fields take defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: IngestConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_skip_missing(mut self, skip_missing: bool) -> Self {
        self.skip_missing = skip_missing;
        self
    }

    pub fn with_missing_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing_symbols = symbols.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_shard_rows(mut self, shard_rows: usize) -> Self {
        self.shard_rows = shard_rows;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.shard_rows == 0 {
            return Err(InfoBaseError::invalid_input("shard_rows must be positive"));
        }
        if self.threads == Some(0) {
            return Err(InfoBaseError::invalid_input("threads must be positive"));
        }
        Ok(())
    }

    /// Whether `value` is a missing-value symbol.
    pub fn is_missing(&self, value: &str) -> bool {
        self.missing_symbols.iter().any(|symbol| symbol == value)
    }

    /// Whether `value` should be left out of the index.
    pub fn skips(&self, value: &str) -> bool {
        self.skip_missing && self.is_missing(value)
    }
}
