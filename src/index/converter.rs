//! Conversion of raw records into selector-ID records.

use crate::error::{InfoBaseError, Result};
use crate::index::SelectorId;
use crate::index::dictionary::SelectorDictionary;

/// Maps positional feature values onto the selector IDs registered for them.
#[derive(Debug, Clone, Copy)]
pub struct RecordConverter<'a> {
    dictionary: &'a SelectorDictionary,
    feature_count: usize,
}

impl<'a> RecordConverter<'a> {
    /// Create a converter for records of `feature_count` values. The label
    /// is the virtual feature at index `feature_count`.
    pub fn new(dictionary: &'a SelectorDictionary, feature_count: usize) -> Self {
        RecordConverter {
            dictionary,
            feature_count,
        }
    }

    fn check_width(&self, width: usize) -> Result<()> {
        if width != self.feature_count {
            return Err(InfoBaseError::invalid_input(format!(
                "record has {width} values, expected {}",
                self.feature_count
            )));
        }
        Ok(())
    }

    /// Convert a record to one selector ID per value, preserving order.
    ///
    /// Fails with [`InfoBaseError::UnknownValue`] on the first value that was
    /// not seen for its feature during ingestion.
    pub fn convert<S: AsRef<str>>(&self, record: &[S]) -> Result<Vec<SelectorId>> {
        self.check_width(record.len())?;

        record
            .iter()
            .enumerate()
            .map(|(feature, value)| {
                let value = value.as_ref();
                self.dictionary
                    .lookup(feature, value)
                    .ok_or_else(|| InfoBaseError::unknown_value(feature, value))
            })
            .collect()
    }

    /// Like [`RecordConverter::convert`], but unseen values become `None` so
    /// the caller can apply its own fallback.
    pub fn convert_partial<S: AsRef<str>>(&self, record: &[S]) -> Result<Vec<Option<SelectorId>>> {
        self.check_width(record.len())?;

        Ok(record
            .iter()
            .enumerate()
            .map(|(feature, value)| self.dictionary.lookup(feature, value.as_ref()))
            .collect())
    }

    /// Convert a labeled record; the class selector ID is appended last.
    pub fn convert_labeled<S: AsRef<str>>(&self, record: &[S], label: &str) -> Result<Vec<SelectorId>> {
        let mut ids = self.convert(record)?;
        let class_id = self
            .dictionary
            .lookup(self.feature_count, label)
            .ok_or_else(|| InfoBaseError::unknown_value(self.feature_count, label))?;
        ids.push(class_id);
        Ok(ids)
    }
}
