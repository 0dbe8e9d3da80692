//! The frozen InfoBase.
//!
//! An [`InfoBase`] owns the selector dictionary and the nlist store built from
//! one training dataset. It exposes no mutating methods, so once built it can
//! be shared across threads and queried concurrently without locking.

use serde::{Deserialize, Serialize};

use crate::dataset::{Column, ColumnType};
use crate::error::{InfoBaseError, Result};
use crate::index::converter::RecordConverter;
use crate::index::dictionary::{Selector, SelectorDictionary};
use crate::index::nlist::{NList, NListStore};
use crate::index::support::{ClassSupport, SupportCounter};
use crate::index::{RowId, SelectorId};

/// Summary statistics of an InfoBase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfoBaseStats {
    pub rows: usize,
    pub features: usize,
    pub selectors: usize,
    pub feature_selectors: usize,
    pub classes: usize,
    pub total_postings: usize,
    pub avg_nlist_len: f64,
    pub max_nlist_len: usize,
}

/// Selector dictionary and nlist store of one fitted dataset.
#[derive(Debug, Clone)]
pub struct InfoBase {
    /// Feature columns followed by the label column.
    columns: Vec<Column>,
    row_count: usize,
    dictionary: SelectorDictionary,
    nlists: NListStore,
    /// Selectors of the label column, in ID order.
    class_ids: Vec<SelectorId>,
}

impl InfoBase {
    /// Freeze a dictionary and store into an InfoBase.
    pub(crate) fn from_parts(
        columns: Vec<Column>,
        row_count: usize,
        mut dictionary: SelectorDictionary,
        mut nlists: NListStore,
    ) -> Self {
        // Selectors registered without a posting still need an (empty) nlist.
        if let Some(last) = dictionary.len().checked_sub(1) {
            nlists.register(last as SelectorId);
        }
        dictionary.update_frequencies(&nlists);

        let class_feature = columns.len().saturating_sub(1);
        let class_ids = dictionary.feature_selectors(class_feature);

        InfoBase {
            columns,
            row_count,
            dictionary,
            nlists,
            class_ids,
        }
    }

    /// Number of training rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of feature columns (the label excluded).
    pub fn feature_count(&self) -> usize {
        self.columns.len().saturating_sub(1)
    }

    /// Feature columns followed by the label column.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Declared type of every column, label last.
    pub fn column_types(&self) -> Vec<ColumnType> {
        self.columns.iter().map(|column| column.column_type).collect()
    }

    /// Name of the label column.
    pub fn label_name(&self) -> &str {
        self.columns.last().map_or("", |column| column.name.as_str())
    }

    pub fn dictionary(&self) -> &SelectorDictionary {
        &self.dictionary
    }

    pub fn nlists(&self) -> &NListStore {
        &self.nlists
    }

    /// Number of registered selectors, class selectors included.
    pub fn selector_count(&self) -> usize {
        self.dictionary.len()
    }

    /// Get a selector by ID.
    pub fn selector(&self, id: SelectorId) -> Result<&Selector> {
        self.dictionary.selector(id)
    }

    /// Value a selector was registered with.
    pub fn lookup_value(&self, id: SelectorId) -> Result<&str> {
        self.dictionary.lookup_value(id)
    }

    /// Selector ID of `value` in the column named `name`.
    pub fn lookup_named(&self, name: &str, value: &str) -> Result<SelectorId> {
        let feature = self
            .columns
            .iter()
            .position(|column| column.name == name)
            .ok_or_else(|| InfoBaseError::not_found(format!("no column named {name:?}")))?;
        self.dictionary
            .lookup(feature, value)
            .ok_or_else(|| InfoBaseError::unknown_value(feature, value))
    }

    /// Render a selector as `(column=value)`.
    pub fn condition(&self, id: SelectorId) -> Result<String> {
        let selector = self.dictionary.selector(id)?;
        let name = self
            .columns
            .get(selector.feature)
            .map_or("?", |column| column.name.as_str());
        Ok(format!("({}={})", name, selector.value))
    }

    /// Nlist of a single selector.
    pub fn nlist(&self, id: SelectorId) -> Result<&NList> {
        self.nlists.get(id)
    }

    pub fn support_counter(&self) -> SupportCounter<'_> {
        SupportCounter::new(&self.nlists, &self.class_ids)
    }

    pub fn converter(&self) -> RecordConverter<'_> {
        RecordConverter::new(&self.dictionary, self.feature_count())
    }

    /// Number of training rows satisfying every selector in `selector_ids`.
    pub fn support_count(&self, selector_ids: &[SelectorId]) -> Result<usize> {
        self.support_counter().support_count(selector_ids)
    }

    /// Rows satisfying every selector in `selector_ids`.
    pub fn support_nlist(&self, selector_ids: &[SelectorId]) -> Result<NList> {
        self.support_counter().support_nlist(selector_ids)
    }

    /// Support of `body ∧ class` for every class.
    pub fn class_distribution(&self, body: &[SelectorId]) -> Result<Vec<ClassSupport>> {
        self.support_counter().class_distribution(body)
    }

    /// Convert a feature record to selector IDs.
    pub fn convert<S: AsRef<str>>(&self, record: &[S]) -> Result<Vec<SelectorId>> {
        self.converter().convert(record)
    }

    /// Convert a feature record, mapping unseen values to `None`.
    pub fn convert_partial<S: AsRef<str>>(&self, record: &[S]) -> Result<Vec<Option<SelectorId>>> {
        self.converter().convert_partial(record)
    }

    /// Convert a feature record plus label.
    pub fn convert_labeled<S: AsRef<str>>(&self, record: &[S], label: &str) -> Result<Vec<SelectorId>> {
        self.converter().convert_labeled(record, label)
    }

    /// Class selector IDs in ID order.
    pub fn class_ids(&self) -> &[SelectorId] {
        &self.class_ids
    }

    /// The majority class; ties go to the lowest selector ID.
    pub fn default_class(&self) -> Option<SelectorId> {
        let mut best: Option<(SelectorId, u32)> = None;
        for &id in &self.class_ids {
            let frequency = self.dictionary.selector(id).map_or(0, |s| s.frequency);
            if best.is_none_or(|(_, max)| frequency > max) {
                best = Some((id, frequency));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Absolute support threshold for a ratio of the training rows.
    pub fn min_support_count(&self, ratio: f64) -> usize {
        (ratio.clamp(0.0, 1.0) * self.row_count as f64).ceil() as usize
    }

    /// Candidate selectors for rule construction: feature selectors with
    /// frequency of at least `min_support`, then every class selector, each
    /// group in ascending frequency order.
    pub fn constructing_selectors(&self, min_support: usize) -> Vec<&Selector> {
        let class_feature = self.feature_count();
        let by_frequency = |a: &&Selector, b: &&Selector| {
            a.frequency.cmp(&b.frequency).then(a.id.cmp(&b.id))
        };

        let mut features: Vec<&Selector> = self
            .dictionary
            .iter()
            .filter(|s| s.feature != class_feature && s.frequency as usize >= min_support)
            .collect();
        features.sort_by(by_frequency);

        let mut classes: Vec<&Selector> = self
            .dictionary
            .iter()
            .filter(|s| s.feature == class_feature)
            .collect();
        classes.sort_by(by_frequency);

        features.extend(classes);
        features
    }

    /// Selector-ID records of all training rows: feature selectors in column
    /// order followed by the class selector. Skipped missing values leave no
    /// entry.
    pub fn id_records(&self) -> Vec<Vec<SelectorId>> {
        let width = self.columns.len();
        let mut slots: Vec<Vec<Option<SelectorId>>> = vec![vec![None; width]; self.row_count];

        for selector in self.dictionary.iter() {
            if let Ok(nlist) = self.nlists.get(selector.id) {
                for &row in nlist {
                    if let Some(slot) = slots
                        .get_mut(row as usize)
                        .and_then(|record| record.get_mut(selector.feature))
                    {
                        *slot = Some(selector.id);
                    }
                }
            }
        }

        slots
            .into_iter()
            .map(|record| record.into_iter().flatten().collect())
            .collect()
    }

    /// Selector-ID record of one training row.
    pub fn id_record(&self, row: RowId) -> Result<Vec<SelectorId>> {
        if row as usize >= self.row_count {
            return Err(InfoBaseError::not_found(format!(
                "row {row} out of range for {} rows",
                self.row_count
            )));
        }

        let mut record: Vec<(usize, SelectorId)> = self
            .dictionary
            .iter()
            .filter(|selector| {
                self.nlists
                    .get(selector.id)
                    .is_ok_and(|nlist| nlist.contains(row))
            })
            .map(|selector| (selector.feature, selector.id))
            .collect();
        record.sort_unstable();
        Ok(record.into_iter().map(|(_, id)| id).collect())
    }

    /// Summary statistics.
    pub fn stats(&self) -> InfoBaseStats {
        let selectors = self.dictionary.len();
        let total_postings = self.nlists.total_postings();
        InfoBaseStats {
            rows: self.row_count,
            features: self.feature_count(),
            selectors,
            feature_selectors: selectors - self.class_ids.len(),
            classes: self.class_ids.len(),
            total_postings,
            avg_nlist_len: if selectors > 0 {
                total_postings as f64 / selectors as f64
            } else {
                0.0
            },
            max_nlist_len: self.nlists.max_len(),
        }
    }
}
