//! Support counting over conjunctions of selectors.
//!
//! The support of a conjunction is the size of the intersection of its
//! selectors' nlists. Inputs are intersected shortest-first so the running
//! result only ever shrinks; the order has no effect on the answer.

use serde::{Deserialize, Serialize};

use crate::error::{InfoBaseError, Result};
use crate::index::nlist::{NList, NListStore, intersect_count};
use crate::index::SelectorId;

/// Support of `body ∧ class` for one class selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSupport {
    /// Selector ID of the class value.
    pub class_id: SelectorId,
    /// Number of records satisfying the body and carrying this class.
    pub count: usize,
}

/// Read-only support counter over a frozen nlist store.
#[derive(Debug, Clone, Copy)]
pub struct SupportCounter<'a> {
    nlists: &'a NListStore,
    class_ids: &'a [SelectorId],
}

impl<'a> SupportCounter<'a> {
    /// Create a counter. `class_ids` are the selectors used by
    /// [`SupportCounter::class_distribution`].
    pub fn new(nlists: &'a NListStore, class_ids: &'a [SelectorId]) -> Self {
        SupportCounter { nlists, class_ids }
    }

    /// Resolve every ID up front so an unknown ID is reported even when an
    /// earlier nlist is already empty.
    fn resolve(&self, selector_ids: &[SelectorId]) -> Result<Vec<&'a NList>> {
        let mut nlists = selector_ids
            .iter()
            .map(|&id| self.nlists.get(id))
            .collect::<Result<Vec<_>>>()?;
        nlists.sort_by_key(|nlist| nlist.len());
        Ok(nlists)
    }

    /// Number of records satisfying every selector in `selector_ids`.
    pub fn support_count(&self, selector_ids: &[SelectorId]) -> Result<usize> {
        if selector_ids.is_empty() {
            return Err(InfoBaseError::invalid_input(
                "support count needs at least one selector",
            ));
        }

        let nlists = self.resolve(selector_ids)?;
        match nlists.as_slice() {
            [single] => Ok(single.len()),
            [first, second] => Ok(intersect_count(first.rows(), second.rows())),
            _ => Ok(Self::intersect_all(&nlists).len()),
        }
    }

    /// The nlist of the conjunction of `selector_ids`.
    pub fn support_nlist(&self, selector_ids: &[SelectorId]) -> Result<NList> {
        if selector_ids.is_empty() {
            return Err(InfoBaseError::invalid_input(
                "support nlist needs at least one selector",
            ));
        }

        let nlists = self.resolve(selector_ids)?;
        Ok(Self::intersect_all(&nlists))
    }

    /// Sequential pairwise intersection; `nlists` is non-empty and sorted by
    /// length.
    fn intersect_all(nlists: &[&NList]) -> NList {
        let mut running = nlists[0].clone();
        for nlist in &nlists[1..] {
            if running.is_empty() {
                break;
            }
            running.retain_common(nlist.rows());
        }
        running
    }

    /// Support of `body ∧ class` for every class selector, in class ID order.
    ///
    /// An empty body yields the plain class frequencies.
    pub fn class_distribution(&self, body: &[SelectorId]) -> Result<Vec<ClassSupport>> {
        let classes = self
            .class_ids
            .iter()
            .map(|&id| self.nlists.get(id).map(|nlist| (id, nlist)))
            .collect::<Result<Vec<_>>>()?;

        if body.is_empty() {
            return Ok(classes
                .into_iter()
                .map(|(class_id, nlist)| ClassSupport {
                    class_id,
                    count: nlist.len(),
                })
                .collect());
        }

        let covered = self.support_nlist(body)?;
        Ok(classes
            .into_iter()
            .map(|(class_id, nlist)| ClassSupport {
                class_id,
                count: intersect_count(covered.rows(), nlist.rows()),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// feature0 = ["a", "b", "a"], class = ["x", "y", "x"]
    /// IDs: 0 = (f0=a), 1 = (class=x), 2 = (f0=b), 3 = (class=y)
    fn three_row_store() -> NListStore {
        let mut store = NListStore::new();
        store.register(3);
        store.extend(0, &[0, 2]).unwrap();
        store.extend(1, &[0, 2]).unwrap();
        store.extend(2, &[1]).unwrap();
        store.extend(3, &[1]).unwrap();
        store
    }

    #[test]
    fn test_single_selector() {
        let store = three_row_store();
        let counter = SupportCounter::new(&store, &[1, 3]);
        assert_eq!(counter.support_count(&[0]).unwrap(), 2);
        assert_eq!(counter.support_count(&[2]).unwrap(), 1);
    }

    #[test]
    fn test_conjunctions() {
        let store = three_row_store();
        let counter = SupportCounter::new(&store, &[1, 3]);

        assert_eq!(counter.support_count(&[0, 1]).unwrap(), 2);
        assert_eq!(counter.support_count(&[0, 3]).unwrap(), 0);
        assert_eq!(counter.support_count(&[2, 3, 2]).unwrap(), 1);
        assert_eq!(counter.support_count(&[0, 1, 3]).unwrap(), 0);
        assert_eq!(counter.support_nlist(&[1, 0]).unwrap().rows(), &[0, 2]);
    }

    #[test]
    fn test_unknown_selector() {
        let store = three_row_store();
        let counter = SupportCounter::new(&store, &[1, 3]);

        assert!(counter.support_count(&[9]).unwrap_err().is_not_found());
        // Reported even though (f0=a) ∧ (class=y) is already empty.
        assert!(counter.support_count(&[0, 3, 9]).unwrap_err().is_not_found());
    }

    #[test]
    fn test_empty_query() {
        let store = three_row_store();
        let counter = SupportCounter::new(&store, &[1, 3]);
        assert!(counter.support_count(&[]).unwrap_err().is_invalid_input());
        assert!(counter.support_nlist(&[]).is_err());
    }

    #[test]
    fn test_empty_nlist_short_circuits() {
        let mut store = three_row_store();
        store.register(4);
        let counter = SupportCounter::new(&store, &[1, 3]);
        assert_eq!(counter.support_count(&[0, 1, 4]).unwrap(), 0);
        assert_eq!(counter.support_count(&[4]).unwrap(), 0);
    }

    #[test]
    fn test_class_distribution() {
        let store = three_row_store();
        let counter = SupportCounter::new(&store, &[1, 3]);

        let distribution = counter.class_distribution(&[0]).unwrap();
        assert_eq!(
            distribution,
            vec![
                ClassSupport { class_id: 1, count: 2 },
                ClassSupport { class_id: 3, count: 0 },
            ]
        );

        let priors = counter.class_distribution(&[]).unwrap();
        assert_eq!(priors.iter().map(|c| c.count).collect::<Vec<_>>(), vec![2, 1]);

        assert!(counter.class_distribution(&[11]).is_err());
    }
}
