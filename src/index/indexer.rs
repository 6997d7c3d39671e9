//! Keyword, page and occurrence bookkeeping

use crate::extract::{truncate_chars, MAX_CONTENT_CHARS, MAX_TITLE_CHARS};
use crate::index::retry::ResilientStorage;
use crate::index::tokenize;
use crate::storage::Storage;
use std::collections::{BTreeSet, HashMap};

/// Longest keyword stored, in characters
pub const MAX_KEYWORD_CHARS: usize = 255;

/// Writes pages and their keywords to storage
///
/// The indexer keeps an in-memory map of keyword ids so that each keyword
/// row is inserted once. The map starts empty on every run, matching the
/// freshly reset schema. Every keyword recorded since the last relevance
/// batch is remembered as dirty.
pub struct Indexer<S> {
    store: ResilientStorage<S>,
    known_keywords: HashMap<String, i64>,
    dirty: BTreeSet<String>,
    pages_indexed: u64,
}

impl<S: Storage> Indexer<S> {
    /// Creates an indexer with empty caches
    pub fn new(store: ResilientStorage<S>) -> Self {
        Self {
            store,
            known_keywords: HashMap::new(),
            dirty: BTreeSet::new(),
            pages_indexed: 0,
        }
    }

    /// Drops and recreates the schema and forgets all cached ids
    pub async fn reset(&mut self) -> crate::Result<()> {
        self.store
            .execute("create index tables", |s| s.reset_schema())
            .await?;
        self.known_keywords.clear();
        self.dirty.clear();
        self.pages_indexed = 0;
        Ok(())
    }

    /// Persists a page and returns its id
    ///
    /// Title and content are truncated to [`MAX_TITLE_CHARS`] and
    /// [`MAX_CONTENT_CHARS`] characters.
    pub async fn record_page(&mut self, url: &str, title: &str, text: &str) -> crate::Result<i64> {
        let title = truncate_chars(title, MAX_TITLE_CHARS);
        let content = truncate_chars(text, MAX_CONTENT_CHARS);

        let id = self
            .store
            .execute("insert webpage", |s| s.insert_webpage(url, title, content))
            .await?;

        self.pages_indexed += 1;
        tracing::debug!("Recorded page {} as #{}", url, id);
        Ok(id)
    }

    /// Records one mention of `token` on a page
    ///
    /// A first mention inserts the occurrence with a counter of 1; later
    /// mentions on the same page hit the primary key and increment the
    /// counter instead.
    pub async fn record_occurrence(&mut self, page_id: i64, token: &str) -> crate::Result<()> {
        let token = truncate_chars(token, MAX_KEYWORD_CHARS);
        let keyword_id = self.keyword_id(token).await?;
        self.dirty.insert(token.to_string());

        let inserted = self
            .store
            .execute("insert occurrence", |s| {
                match s.insert_occurrence(page_id, keyword_id, 1, 0.0) {
                    Ok(()) => Ok(true),
                    Err(e) if e.is_constraint_violation() => Ok(false),
                    Err(e) => Err(e),
                }
            })
            .await?;

        if !inserted {
            tracing::trace!("'{}' repeated on page #{}", token, page_id);
            self.store
                .execute("update occurrence", |s| {
                    s.increment_occurrence(page_id, keyword_id)
                })
                .await?;
        }

        Ok(())
    }

    /// Records a page and every token of its text
    ///
    /// # Returns
    ///
    /// The id of the new page
    pub async fn index_page(&mut self, url: &str, title: &str, text: &str) -> crate::Result<i64> {
        let page_id = self.record_page(url, title, text).await?;
        for token in tokenize(text) {
            self.record_occurrence(page_id, &token).await?;
        }
        Ok(page_id)
    }

    /// Recomputes the stored relevance of one keyword
    pub async fn recompute_relevance(&mut self, keyword: &str) -> crate::Result<()> {
        self.store
            .execute("update relevance", |s| s.recompute_relevance(keyword))
            .await
    }

    /// Keywords recorded since the dirty set was last cleared
    pub fn dirty_keywords(&self) -> &BTreeSet<String> {
        &self.dirty
    }

    /// Forgets the dirty keywords
    pub fn clear_dirty_keywords(&mut self) {
        self.dirty.clear();
    }

    /// Number of pages recorded in this run
    pub fn pages_indexed(&self) -> u64 {
        self.pages_indexed
    }

    /// Number of distinct keywords recorded in this run
    pub fn keyword_count(&self) -> u64 {
        self.known_keywords.len() as u64
    }

    /// Returns the storage handle
    pub fn store(&self) -> &ResilientStorage<S> {
        &self.store
    }

    /// Unwraps the storage handle
    pub fn into_store(self) -> ResilientStorage<S> {
        self.store
    }

    async fn keyword_id(&mut self, token: &str) -> crate::Result<i64> {
        if let Some(&id) = self.known_keywords.get(token) {
            return Ok(id);
        }

        let id = self
            .store
            .execute("insert keyword", |s| match s.insert_keyword(token) {
                Err(e) if e.is_constraint_violation() => s.find_keyword(token)?.ok_or(e),
                other => other,
            })
            .await?;

        tracing::trace!("New keyword '{}' as #{}", token, id);
        self.known_keywords.insert(token.to_string(), id);
        Ok(id)
    }
}
