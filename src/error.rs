//! Error types for the InfoBase library.
//!
//! All errors are represented by the [`InfoBaseError`] enum. Query-time
//! failures are local and synchronous: a failed support count or conversion
//! produces no partial output.
//!
//! # Examples
//!
//! ```
//! use infobase::error::{InfoBaseError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(InfoBaseError::invalid_input("row and label counts differ"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

use crate::index::SelectorId;

/// The main error type for InfoBase operations.
#[derive(Error, Debug)]
pub enum InfoBaseError {
    /// A query referenced a selector ID that was never registered.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A record value has no selector in the training-time dictionary.
    #[error("Unknown value {value:?} for feature {feature}")]
    UnknownValue {
        /// Position of the offending value in the record.
        feature: usize,
        /// The value that was never seen during ingestion.
        value: String,
    },

    /// Malformed input: mismatched lengths, empty queries, out-of-order rows.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Dataset parse errors.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Corrupt or unsupported persisted data.
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with InfoBaseError.
pub type Result<T> = std::result::Result<T, InfoBaseError>;

impl InfoBaseError {
    /// Create a not-found error for an unregistered selector ID.
    pub fn selector_not_found(id: SelectorId) -> Self {
        InfoBaseError::NotFound(format!("selector {id} is not registered"))
    }

    /// Create a new not-found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        InfoBaseError::NotFound(msg.into())
    }

    /// Create a new unknown-value error.
    pub fn unknown_value<S: Into<String>>(feature: usize, value: S) -> Self {
        InfoBaseError::UnknownValue {
            feature,
            value: value.into(),
        }
    }

    /// Create a new invalid input error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        InfoBaseError::InvalidInput(msg.into())
    }

    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        InfoBaseError::Parse(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        InfoBaseError::Storage(msg.into())
    }

    /// Whether this error is a [`InfoBaseError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, InfoBaseError::NotFound(_))
    }

    /// Whether this error is a [`InfoBaseError::UnknownValue`].
    pub fn is_unknown_value(&self) -> bool {
        matches!(self, InfoBaseError::UnknownValue { .. })
    }

    /// Whether this error is a [`InfoBaseError::InvalidInput`].
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, InfoBaseError::InvalidInput(_))
    }
}

impl From<csv::Error> for InfoBaseError {
    fn from(err: csv::Error) -> Self {
        InfoBaseError::Parse(format!("CSV error: {err}"))
    }
}
