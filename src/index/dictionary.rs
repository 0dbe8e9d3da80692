//! Selector dictionary.
//!
//! Maps `(feature index, value)` pairs onto dense selector IDs. IDs are
//! allocated in first-registration order starting at zero, so the dictionary
//! is a bijection between observed pairs and `0..len()`.

use std::fmt;

use ahash::AHashMap;

use crate::error::{InfoBaseError, Result};
use crate::index::SelectorId;
use crate::index::nlist::NListStore;

/// An atomic predicate `feature = value`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Dense selector ID.
    pub id: SelectorId,
    /// Index of the feature (column) the selector tests.
    pub feature: usize,
    /// The observed value.
    pub value: String,
    /// Number of records satisfying the selector, filled in when the
    /// owning InfoBase is frozen.
    pub frequency: u32,
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(f{}={})", self.feature, self.value)
    }
}

/// Bidirectional mapping between `(feature, value)` pairs and selector IDs.
#[derive(Debug, Clone, Default)]
pub struct SelectorDictionary {
    /// Per-feature value lookup.
    by_feature: Vec<AHashMap<String, SelectorId>>,
    /// Selectors indexed by ID.
    selectors: Vec<Selector>,
}

impl SelectorDictionary {
    /// Create an empty dictionary.
    pub fn new() -> Self {
        SelectorDictionary::default()
    }

    /// Create an empty dictionary sized for `feature_count` features.
    pub fn with_features(feature_count: usize) -> Self {
        SelectorDictionary {
            by_feature: vec![AHashMap::new(); feature_count],
            selectors: Vec::new(),
        }
    }

    /// Register a `(feature, value)` pair and return its selector ID.
    ///
    /// Registering an already known pair returns the existing ID.
    pub fn register(&mut self, feature: usize, value: &str) -> Result<SelectorId> {
        if let Some(id) = self.lookup(feature, value) {
            return Ok(id);
        }

        let id = SelectorId::try_from(self.selectors.len()).map_err(|_| {
            InfoBaseError::invalid_input("selector ID space exhausted")
        })?;

        if feature >= self.by_feature.len() {
            self.by_feature.resize_with(feature + 1, AHashMap::new);
        }
        self.by_feature[feature].insert(value.to_string(), id);
        self.selectors.push(Selector {
            id,
            feature,
            value: value.to_string(),
            frequency: 0,
        });

        Ok(id)
    }

    /// Find the selector ID of a `(feature, value)` pair, if registered.
    pub fn lookup(&self, feature: usize, value: &str) -> Option<SelectorId> {
        self.by_feature
            .get(feature)
            .and_then(|values| values.get(value))
            .copied()
    }

    /// Get the value a selector ID was registered with.
    pub fn lookup_value(&self, id: SelectorId) -> Result<&str> {
        self.selector(id).map(|selector| selector.value.as_str())
    }

    /// Get the selector registered under `id`.
    pub fn selector(&self, id: SelectorId) -> Result<&Selector> {
        self.selectors
            .get(id as usize)
            .ok_or_else(|| InfoBaseError::selector_not_found(id))
    }

    /// Whether `id` has been registered.
    pub fn contains(&self, id: SelectorId) -> bool {
        (id as usize) < self.selectors.len()
    }

    /// Number of registered selectors.
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// Check if no selector has been registered.
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Number of features the dictionary has seen or was sized for.
    pub fn feature_count(&self) -> usize {
        self.by_feature.len()
    }

    /// Number of distinct values registered for `feature`.
    pub fn distinct_values(&self, feature: usize) -> usize {
        self.by_feature.get(feature).map_or(0, |values| values.len())
    }

    /// Iterate over all selectors in ID order.
    pub fn iter(&self) -> std::slice::Iter<'_, Selector> {
        self.selectors.iter()
    }

    /// Selector IDs of one feature, in ID order.
    pub fn feature_selectors(&self, feature: usize) -> Vec<SelectorId> {
        self.selectors
            .iter()
            .filter(|selector| selector.feature == feature)
            .map(|selector| selector.id)
            .collect()
    }

    /// Copy posting-list lengths into the selectors' `frequency` field.
    pub(crate) fn update_frequencies(&mut self, nlists: &NListStore) {
        for selector in &mut self.selectors {
            selector.frequency = nlists
                .get(selector.id)
                .map_or(0, |nlist| nlist.len() as u32);
        }
    }
}
