//! # InfoBase
//!
//! Selector indexing and support counting for local-rule learners.
//!
//! ## Features
//!
//! - Dense selector IDs for every `(column, value)` pair of a dataset
//! - Sorted row lists (nlists) per selector
//! - Support counting by linear-merge intersection
//! - Class distributions for rule bodies
//! - Parallel sharded ingestion with deterministic IDs
//! - Checksummed on-disk cache

pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod index;
pub mod storage;
pub mod util;

pub mod prelude {
    pub use crate::config::IngestConfig;
    pub use crate::dataset::{ColumnType, Dataset};
    pub use crate::dataset::csv::{CsvDatasetReader, LabelColumn};
    pub use crate::error::{InfoBaseError, Result};
    pub use crate::index::{InfoBase, InfoBaseBuilder, NList, RowId, Selector, SelectorId};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
