//! One-pass construction of an InfoBase from a labeled dataset.
//!
//! Rows are scanned in file order. For every row `r` and every column `i`
//! (the label being the virtual column `feature_count`), `(i, value)` is
//! registered in the dictionary and `r` is appended to that selector's nlist.
//! Because rows only ever increase, nlists are built sorted without any
//! re-sorting.
//!
//! Parallel ingestion splits the rows into contiguous shards, indexes each
//! shard on its own and merges the shards in order. Registering each shard's
//! pairs in local first-occurrence order reproduces the global first-occurrence
//! order, so selector IDs and nlists are identical to the sequential pass.

use std::iter;
use std::time::Instant;

use ahash::AHashMap;
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::config::IngestConfig;
use crate::dataset::Dataset;
use crate::error::{InfoBaseError, Result};
use crate::index::dictionary::SelectorDictionary;
use crate::index::info_base::InfoBase;
use crate::index::nlist::NListStore;
use crate::index::RowId;

/// Pairs first seen in one shard, with their rows inside the shard.
struct ShardIndex<'a> {
    postings: Vec<(usize, &'a str, Vec<RowId>)>,
    skipped: usize,
}

/// Builds a frozen [`InfoBase`] from a [`Dataset`].
#[derive(Debug, Clone, Default)]
pub struct InfoBaseBuilder {
    config: IngestConfig,
}

impl InfoBaseBuilder {
    /// Create a builder.
    pub fn new(config: IngestConfig) -> Self {
        InfoBaseBuilder { config }
    }

    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Ingest `dataset` and freeze the result.
    pub fn build(&self, dataset: &Dataset) -> Result<InfoBase> {
        self.config.validate()?;

        if RowId::try_from(dataset.row_count()).is_err() {
            return Err(InfoBaseError::invalid_input(format!(
                "{} rows exceed the row ID range",
                dataset.row_count()
            )));
        }

        let start = Instant::now();
        let columns = dataset.infer_columns(|value| self.config.skips(value));

        let (dictionary, nlists, skipped) = if self.config.parallel {
            self.ingest_sharded(dataset)?
        } else {
            self.ingest_sequential(dataset)?
        };

        if skipped > 0 {
            warn!("Skipped {skipped} missing values during ingestion");
        }

        let info_base = InfoBase::from_parts(columns, dataset.row_count(), dictionary, nlists);
        info!(
            "Built InfoBase: {} rows, {} features, {} selectors ({} classes) in {:?}",
            info_base.row_count(),
            info_base.feature_count(),
            info_base.selector_count(),
            info_base.class_ids().len(),
            start.elapsed()
        );

        Ok(info_base)
    }

    fn ingest_sequential(
        &self,
        dataset: &Dataset,
    ) -> Result<(SelectorDictionary, NListStore, usize)> {
        let mut dictionary = SelectorDictionary::with_features(dataset.feature_count() + 1);
        let mut nlists = NListStore::new();
        let mut skipped = 0;

        for (row, (features, label)) in dataset.records().enumerate() {
            let row = row as RowId;
            let values = features.iter().map(String::as_str).chain(iter::once(label));

            for (feature, value) in values.enumerate() {
                if self.config.skips(value) {
                    skipped += 1;
                    continue;
                }
                let id = dictionary.register(feature, value)?;
                nlists.register(id);
                nlists.append(id, row)?;
            }
        }

        Ok((dictionary, nlists, skipped))
    }

    fn index_shard<'a>(&self, dataset: &'a Dataset, first_row: usize, len: usize) -> ShardIndex<'a> {
        let mut positions: AHashMap<(usize, &'a str), usize> = AHashMap::new();
        let mut postings: Vec<(usize, &'a str, Vec<RowId>)> = Vec::new();
        let mut skipped = 0;

        let rows = &dataset.rows()[first_row..first_row + len];
        let labels = &dataset.labels()[first_row..first_row + len];

        for (offset, (features, label)) in rows.iter().zip(labels).enumerate() {
            let row = (first_row + offset) as RowId;
            let values = features
                .iter()
                .map(String::as_str)
                .chain(iter::once(label.as_str()));

            for (feature, value) in values.enumerate() {
                if self.config.skips(value) {
                    skipped += 1;
                    continue;
                }
                let slot = *positions.entry((feature, value)).or_insert_with(|| {
                    postings.push((feature, value, Vec::new()));
                    postings.len() - 1
                });
                postings[slot].2.push(row);
            }
        }

        ShardIndex { postings, skipped }
    }

    fn ingest_sharded(
        &self,
        dataset: &Dataset,
    ) -> Result<(SelectorDictionary, NListStore, usize)> {
        let threads = self.config.threads.unwrap_or_else(num_cpus::get);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|e| InfoBaseError::invalid_input(format!("thread pool: {e}")))?;

        let shard_rows = self.config.shard_rows;
        let row_count = dataset.row_count();
        let shard_starts: Vec<usize> = (0..row_count).step_by(shard_rows).collect();
        debug!(
            "Indexing {} rows in {} shards on {} threads",
            row_count,
            shard_starts.len(),
            threads
        );

        let shards: Vec<ShardIndex<'_>> = pool.install(|| {
            shard_starts
                .par_iter()
                .map(|&start| self.index_shard(dataset, start, shard_rows.min(row_count - start)))
                .collect()
        });

        let mut dictionary = SelectorDictionary::with_features(dataset.feature_count() + 1);
        let mut nlists = NListStore::new();
        let mut skipped = 0;

        for (shard_no, shard) in shards.into_iter().enumerate() {
            debug!("Merging shard {shard_no}: {} local selectors", shard.postings.len());
            skipped += shard.skipped;
            for (feature, value, rows) in shard.postings {
                let id = dictionary.register(feature, value)?;
                nlists.register(id);
                nlists.extend(id, &rows)?;
            }
        }

        Ok((dictionary, nlists, skipped))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_rows() -> Dataset {
        Dataset::from_strs(&["f0"], "class", &[&["a"], &["b"], &["a"]], &["x", "y", "x"]).unwrap()
    }

    #[test]
    fn test_sequential_ingestion() {
        let info_base = InfoBaseBuilder::default().build(&three_rows()).unwrap();

        let a = info_base.dictionary().lookup(0, "a").unwrap();
        let x = info_base.dictionary().lookup(1, "x").unwrap();
        let y = info_base.dictionary().lookup(1, "y").unwrap();

        assert_eq!((a, x, y), (0, 1, 3));
        assert_eq!(info_base.nlist(a).unwrap().rows(), &[0, 2]);
        assert_eq!(info_base.nlist(y).unwrap().rows(), &[1]);
        assert_eq!(info_base.support_count(&[a]).unwrap(), 2);
        assert_eq!(info_base.support_count(&[a, x]).unwrap(), 2);
        assert_eq!(info_base.support_count(&[a, y]).unwrap(), 0);
    }

    #[test]
    fn test_sharded_matches_sequential() {
        let rows: Vec<Vec<String>> = (0..103)
            .map(|i| vec![format!("v{}", i % 7), format!("w{}", (i * 5) % 11)])
            .collect();
        let labels: Vec<String> = (0..103).map(|i| format!("c{}", i % 3)).collect();
        let dataset = Dataset::new(
            vec!["a".to_string(), "b".to_string()],
            "class",
            rows,
            labels,
        )
        .unwrap();

        let sequential = InfoBaseBuilder::default().build(&dataset).unwrap();
        let sharded = InfoBaseBuilder::new(
            IngestConfig::default()
                .with_parallel(true)
                .with_shard_rows(10)
                .with_threads(3),
        )
        .build(&dataset)
        .unwrap();

        assert_eq!(sequential.selector_count(), sharded.selector_count());
        for (id, nlist) in sequential.nlists().iter() {
            assert_eq!(
                sequential.selector(id).unwrap(),
                sharded.selector(id).unwrap()
            );
            assert_eq!(nlist, sharded.nlist(id).unwrap());
        }
    }

    #[test]
    fn test_skip_missing() {
        let dataset = Dataset::from_strs(
            &["f0", "f1"],
            "class",
            &[&["1", "?"], &["?", "a"], &["2", "a"]],
            &["x", "x", "y"],
        )
        .unwrap();

        let kept = InfoBaseBuilder::default().build(&dataset).unwrap();
        assert!(kept.dictionary().lookup(0, "?").is_some());
        assert_eq!(kept.column_types()[0], crate::dataset::ColumnType::Nominal);

        let skipping = InfoBaseBuilder::new(IngestConfig::default().with_skip_missing(true))
            .build(&dataset)
            .unwrap();
        assert!(skipping.dictionary().lookup(0, "?").is_none());
        assert_eq!(skipping.column_types()[0], crate::dataset::ColumnType::Numeric);
        assert_eq!(skipping.id_record(0).unwrap().len(), 2);
        assert_eq!(skipping.stats().total_postings, 7);
    }

    #[test]
    fn test_empty_dataset() {
        let dataset = Dataset::from_strs(&["f0"], "class", &[], &[]).unwrap();
        for parallel in [false, true] {
            let info_base = InfoBaseBuilder::new(IngestConfig::default().with_parallel(parallel))
                .build(&dataset)
                .unwrap();
            assert_eq!(info_base.row_count(), 0);
            assert_eq!(info_base.selector_count(), 0);
            assert_eq!(info_base.default_class(), None);
            assert!(info_base.support_count(&[0]).unwrap_err().is_not_found());
        }
    }
}
