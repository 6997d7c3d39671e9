//! Periodic relevance recomputation

use crate::config::RelevanceConfig;
use crate::index::Indexer;
use crate::storage::Storage;

/// Recomputes keyword relevance every `interval` indexed pages
#[derive(Debug, Clone)]
pub struct RelevanceBatch {
    interval: u64,
    batches_run: u64,
}

impl RelevanceBatch {
    /// Creates a trigger firing every `interval` pages
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            batches_run: 0,
        }
    }

    /// Builds the trigger from the `[relevance]` section
    pub fn from_config(config: &RelevanceConfig) -> Self {
        Self::new(config.batch_interval)
    }

    /// True when `pages` is a non-zero multiple of the interval
    pub fn is_due(&self, pages: u64) -> bool {
        pages > 0 && pages % self.interval == 0
    }

    /// Number of batches run so far
    pub fn batches_run(&self) -> u64 {
        self.batches_run
    }

    /// Runs a batch if `pages` has reached the next multiple of the interval
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - A batch ran and the dirty set is now empty
    /// * `Ok(false)` - Not due yet
    pub async fn maybe_run<S: Storage>(
        &mut self,
        indexer: &mut Indexer<S>,
        pages: u64,
    ) -> crate::Result<bool> {
        if !self.is_due(pages) {
            return Ok(false);
        }
        self.run(indexer).await?;
        Ok(true)
    }

    /// Recomputes every dirty keyword once, then clears the dirty set
    ///
    /// # Returns
    ///
    /// The number of keywords recomputed
    pub async fn run<S: Storage>(&mut self, indexer: &mut Indexer<S>) -> crate::Result<usize> {
        let keywords: Vec<String> = indexer.dirty_keywords().iter().cloned().collect();

        for keyword in &keywords {
            indexer.recompute_relevance(keyword).await?;
        }
        indexer.clear_dirty_keywords();

        self.batches_run += 1;
        tracing::info!(
            "Relevance batch {}: recomputed {} keywords",
            self.batches_run,
            keywords.len()
        );
        Ok(keywords.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{ResilientStorage, RetryPolicy};
    use crate::storage::mock::MockStorage;
    use std::collections::HashMap;
    use std::time::Duration;

    fn indexer() -> Indexer<MockStorage> {
        let policy = RetryPolicy::new(Duration::from_millis(1), Some(1));
        Indexer::new(ResilientStorage::new(MockStorage::new(), policy))
    }

    #[test]
    fn test_is_due() {
        let batch = RelevanceBatch::new(1000);
        assert!(!batch.is_due(0));
        assert!(!batch.is_due(999));
        assert!(batch.is_due(1000));
        assert!(!batch.is_due(1001));
        assert!(batch.is_due(2000));
    }

    #[test]
    fn test_zero_interval_clamped() {
        let batch = RelevanceBatch::new(0);
        assert!(batch.is_due(1));
    }

    #[tokio::test]
    async fn test_cadence_over_thousand_pages() {
        let mut indexer = indexer();
        let mut batch = RelevanceBatch::new(1000);
        let words = ["alpha", "beta", "gamma", "delta"];

        for i in 0..1000u64 {
            let text = format!("{} common", words[(i % 4) as usize]);
            indexer.index_page(&format!("p{}", i), "T", &text).await.unwrap();
            let pages = indexer.pages_indexed();
            let ran = batch.maybe_run(&mut indexer, pages).await.unwrap();
            assert_eq!(ran, i == 999);
        }

        let calls = &indexer.store().inner().recompute_calls;
        let mut per_keyword: HashMap<&str, usize> = HashMap::new();
        for call in calls {
            *per_keyword.entry(call.as_str()).or_default() += 1;
        }

        assert_eq!(per_keyword.len(), 5);
        assert!(per_keyword.values().all(|&n| n == 1));
        assert!(indexer.dirty_keywords().is_empty());
        assert_eq!(batch.batches_run(), 1);
    }

    #[tokio::test]
    async fn test_only_keywords_since_last_batch() {
        let mut indexer = indexer();
        let mut batch = RelevanceBatch::new(2);

        indexer.index_page("a", "A", "one").await.unwrap();
        indexer.index_page("b", "B", "two").await.unwrap();
        assert!(batch.maybe_run(&mut indexer, 2).await.unwrap());

        indexer.index_page("c", "C", "three").await.unwrap();
        indexer.index_page("d", "D", "three").await.unwrap();
        assert!(batch.maybe_run(&mut indexer, 4).await.unwrap());

        let calls = &indexer.store().inner().recompute_calls;
        assert_eq!(calls, &vec!["one", "two", "three"]);
    }
}
