//! Posting lists ("nlists") of record indices.
//!
//! Every selector owns one [`NList`]: the strictly increasing row IDs of the
//! records it holds for. The ordering invariant is what makes linear-merge
//! intersection possible, so every mutating path here checks it.

use crate::error::{InfoBaseError, Result};
use crate::index::{RowId, SelectorId};

/// Strictly increasing, duplicate-free sequence of row IDs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NList {
    rows: Vec<RowId>,
}

impl NList {
    /// Create an empty nlist.
    pub fn new() -> Self {
        NList::default()
    }

    /// Build an nlist from rows that must already be strictly increasing.
    pub fn from_sorted(rows: Vec<RowId>) -> Result<Self> {
        if let Some(pair) = rows.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(InfoBaseError::invalid_input(format!(
                "row IDs must be strictly increasing, found {} before {}",
                pair[0], pair[1]
            )));
        }
        Ok(NList { rows })
    }

    /// Append a row ID, which must exceed every ID already present.
    pub fn push(&mut self, row: RowId) -> Result<()> {
        if let Some(&last) = self.rows.last()
            && row <= last
        {
            return Err(InfoBaseError::invalid_input(format!(
                "row {row} appended after row {last}"
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Append a strictly increasing run of row IDs.
    pub fn extend_sorted(&mut self, rows: &[RowId]) -> Result<()> {
        let mut previous = self.rows.last().copied();
        for &row in rows {
            if previous.is_some_and(|last| row <= last) {
                return Err(InfoBaseError::invalid_input(format!(
                    "row {row} is not greater than its predecessor"
                )));
            }
            previous = Some(row);
        }
        self.rows.extend_from_slice(rows);
        Ok(())
    }

    /// Number of rows, i.e. the support count of the selector.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the nlist is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row IDs in increasing order.
    pub fn rows(&self) -> &[RowId] {
        &self.rows
    }

    /// Get an iterator over the row IDs.
    pub fn iter(&self) -> std::slice::Iter<'_, RowId> {
        self.rows.iter()
    }

    /// Whether `row` is in the nlist.
    pub fn contains(&self, row: RowId) -> bool {
        self.rows.binary_search(&row).is_ok()
    }

    /// Intersect with another nlist.
    pub fn intersect(&self, other: &NList) -> NList {
        NList {
            rows: intersect_sorted(&self.rows, &other.rows),
        }
    }

    /// Keep only the rows also present in `other`, reusing this allocation.
    pub fn retain_common(&mut self, other: &[RowId]) {
        let mut kept = 0;
        let mut j = 0;

        for i in 0..self.rows.len() {
            let row = self.rows[i];
            while j < other.len() && other[j] < row {
                j += 1;
            }
            if j == other.len() {
                break;
            }
            if other[j] == row {
                self.rows[kept] = row;
                kept += 1;
                j += 1;
            }
        }

        self.rows.truncate(kept);
    }

    /// Consume the nlist and return its rows.
    pub fn into_rows(self) -> Vec<RowId> {
        self.rows
    }
}

impl<'a> IntoIterator for &'a NList {
    type Item = &'a RowId;
    type IntoIter = std::slice::Iter<'a, RowId>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Intersect two strictly increasing slices by linear merge.
pub fn intersect_sorted(left: &[RowId], right: &[RowId]) -> Vec<RowId> {
    let mut result = Vec::with_capacity(left.len().min(right.len()));
    let mut i = 0;
    let mut j = 0;

    while i < left.len() && j < right.len() {
        let a = left[i];
        let b = right[j];

        if a == b {
            result.push(a);
            i += 1;
            j += 1;
        } else if a < b {
            i += 1;
        } else {
            j += 1;
        }
    }

    result
}

/// Count the common rows of two strictly increasing slices without allocating.
pub fn intersect_count(left: &[RowId], right: &[RowId]) -> usize {
    let mut count = 0;
    let mut i = 0;
    let mut j = 0;

    while i < left.len() && j < right.len() {
        let a = left[i];
        let b = right[j];

        if a == b {
            count += 1;
            i += 1;
            j += 1;
        } else if a < b {
            i += 1;
        } else {
            j += 1;
        }
    }

    count
}

/// Posting list store indexed by selector ID.
#[derive(Debug, Clone, Default)]
pub struct NListStore {
    lists: Vec<NList>,
}

impl NListStore {
    /// Create an empty store.
    pub fn new() -> Self {
        NListStore::default()
    }

    /// Make sure an (initially empty) nlist exists for `id`.
    ///
    /// Selector IDs are dense, so registering `id` also registers every
    /// smaller ID.
    pub fn register(&mut self, id: SelectorId) {
        let index = id as usize;
        if index >= self.lists.len() {
            self.lists.resize_with(index + 1, NList::new);
        }
    }

    /// Append `row` to the nlist of `id`.
    ///
    /// Rows must arrive in increasing order per selector.
    pub fn append(&mut self, id: SelectorId, row: RowId) -> Result<()> {
        self.get_mut(id)?.push(row)
    }

    /// Append a strictly increasing run of rows to the nlist of `id`.
    pub fn extend(&mut self, id: SelectorId, rows: &[RowId]) -> Result<()> {
        self.get_mut(id)?.extend_sorted(rows)
    }

    /// Get the nlist of a registered selector.
    pub fn get(&self, id: SelectorId) -> Result<&NList> {
        self.lists
            .get(id as usize)
            .ok_or_else(|| InfoBaseError::selector_not_found(id))
    }

    fn get_mut(&mut self, id: SelectorId) -> Result<&mut NList> {
        self.lists
            .get_mut(id as usize)
            .ok_or_else(|| InfoBaseError::selector_not_found(id))
    }

    /// Number of registered selectors.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Sum of all nlist lengths.
    pub fn total_postings(&self) -> usize {
        self.lists.iter().map(NList::len).sum()
    }

    /// Length of the longest nlist.
    pub fn max_len(&self) -> usize {
        self.lists.iter().map(NList::len).max().unwrap_or(0)
    }

    /// Iterate over `(selector ID, nlist)` pairs in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (SelectorId, &NList)> {
        self.lists
            .iter()
            .enumerate()
            .map(|(index, nlist)| (index as SelectorId, nlist))
    }
}
