//! Selector indexing: dictionary, nlists, support counting and conversion.
//!
//! ```
//! use infobase::dataset::Dataset;
//! use infobase::index::InfoBaseBuilder;
//!
//! let dataset = Dataset::from_strs(
//!     &["f0"],
//!     "class",
//!     &[&["a"], &["b"], &["a"]],
//!     &["x", "y", "x"],
//! )?;
//! let info_base = InfoBaseBuilder::default().build(&dataset)?;
//!
//! let a = info_base.convert(&["a"])?[0];
//! let x = info_base.lookup_named("class", "x")?;
//! assert_eq!(info_base.support_count(&[a])?, 2);
//! assert_eq!(info_base.support_count(&[a, x])?, 2);
//! # Ok::<(), infobase::error::InfoBaseError>(())
//! ```

pub mod builder;
pub mod converter;
pub mod dictionary;
pub mod info_base;
pub mod nlist;
pub mod persist;
pub mod support;

/// Dense identifier of a selector.
pub type SelectorId = u32;

/// Ordinal of a training record.
pub type RowId = u32;

pub use builder::InfoBaseBuilder;
pub use converter::RecordConverter;
pub use dictionary::{Selector, SelectorDictionary};
pub use info_base::{InfoBase, InfoBaseStats};
pub use nlist::{NList, NListStore};
pub use support::{ClassSupport, SupportCounter};
