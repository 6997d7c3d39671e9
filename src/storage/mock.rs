//! In-memory storage double with scripted failures

use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{OccurrenceRecord, SearchHit, WebpageRecord};
use std::collections::BTreeMap;

/// Map-backed [`Storage`] that records calls and fails on demand
#[derive(Debug)]
pub struct MockStorage {
    pub webpages: Vec<WebpageRecord>,
    pub keywords: BTreeMap<String, i64>,
    pub occurrences: BTreeMap<(i64, i64), OccurrenceRecord>,
    /// Keyword names passed to `recompute_relevance`, in call order
    pub recompute_calls: Vec<String>,
    /// The next N write statements fail
    pub fail_statements: u32,
    /// The next N reconnects fail
    pub fail_reconnects: u32,
    /// Every write statement fails, even after reconnecting
    pub always_fail: bool,
    pub connected: bool,
    pub disconnects: u32,
    pub reconnects: u32,
    pub resets: u32,
}

impl Default for MockStorage {
    fn default() -> Self {
        Self {
            webpages: Vec::new(),
            keywords: BTreeMap::new(),
            occurrences: BTreeMap::new(),
            recompute_calls: Vec::new(),
            fail_statements: 0,
            fail_reconnects: 0,
            always_fail: false,
            connected: true,
            disconnects: 0,
            reconnects: 0,
            resets: 0,
        }
    }
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counter of the occurrence for `keyword` on `webpage_id`
    pub fn counter(&self, webpage_id: i64, keyword: &str) -> Option<u32> {
        let keyword_id = self.keywords.get(keyword)?;
        self.occurrences
            .get(&(webpage_id, *keyword_id))
            .map(|o| o.counter)
    }

    fn write(&mut self) -> StorageResult<()> {
        if !self.connected {
            return Err(StorageError::Disconnected);
        }
        if self.always_fail {
            return Err(StorageError::Database("statement rejected".to_string()));
        }
        if self.fail_statements > 0 {
            self.fail_statements -= 1;
            return Err(StorageError::Database("connection reset".to_string()));
        }
        Ok(())
    }

    fn read(&self) -> StorageResult<()> {
        if self.connected {
            Ok(())
        } else {
            Err(StorageError::Disconnected)
        }
    }
}

impl Storage for MockStorage {
    fn reset_schema(&mut self) -> StorageResult<()> {
        self.write()?;
        self.webpages.clear();
        self.keywords.clear();
        self.occurrences.clear();
        self.resets += 1;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.connected = false;
        self.disconnects += 1;
    }

    fn reconnect(&mut self) -> StorageResult<()> {
        if self.fail_reconnects > 0 {
            self.fail_reconnects -= 1;
            return Err(StorageError::Database("connection refused".to_string()));
        }
        self.connected = true;
        self.reconnects += 1;
        Ok(())
    }

    fn insert_webpage(&mut self, url: &str, title: &str, content: &str) -> StorageResult<i64> {
        self.write()?;
        if self.webpages.iter().any(|page| page.url == url) {
            return Err(StorageError::ConstraintViolation(format!("webpage.url {}", url)));
        }
        let id = self.webpages.len() as i64 + 1;
        self.webpages.push(WebpageRecord {
            id,
            url: url.to_string(),
            title: title.to_string(),
            content: content.to_string(),
        });
        Ok(id)
    }

    fn insert_keyword(&mut self, name: &str) -> StorageResult<i64> {
        self.write()?;
        if self.keywords.contains_key(name) {
            return Err(StorageError::ConstraintViolation(format!(
                "UNIQUE constraint failed: keyword.name ({})",
                name
            )));
        }
        let id = self.keywords.len() as i64 + 1;
        self.keywords.insert(name.to_string(), id);
        Ok(id)
    }

    fn insert_occurrence(
        &mut self,
        webpage_id: i64,
        keyword_id: i64,
        counter: u32,
        relevance: f64,
    ) -> StorageResult<()> {
        self.write()?;
        if self.occurrences.contains_key(&(webpage_id, keyword_id)) {
            return Err(StorageError::ConstraintViolation(
                "UNIQUE constraint failed: occurrence".to_string(),
            ));
        }
        self.occurrences.insert(
            (webpage_id, keyword_id),
            OccurrenceRecord {
                webpage_id,
                keyword_id,
                counter,
                relevance,
            },
        );
        Ok(())
    }

    fn increment_occurrence(&mut self, webpage_id: i64, keyword_id: i64) -> StorageResult<()> {
        self.write()?;
        let occurrence = self
            .occurrences
            .get_mut(&(webpage_id, keyword_id))
            .ok_or_else(|| StorageError::Database("no such occurrence".to_string()))?;
        occurrence.counter += 1;
        Ok(())
    }

    fn recompute_relevance(&mut self, keyword: &str) -> StorageResult<()> {
        self.write()?;
        self.recompute_calls.push(keyword.to_string());
        Ok(())
    }

    fn count_webpages(&self) -> StorageResult<u64> {
        self.read()?;
        Ok(self.webpages.len() as u64)
    }

    fn count_keywords(&self) -> StorageResult<u64> {
        self.read()?;
        Ok(self.keywords.len() as u64)
    }

    fn count_occurrences(&self) -> StorageResult<u64> {
        self.read()?;
        Ok(self.occurrences.len() as u64)
    }

    fn get_webpage(&self, id: i64) -> StorageResult<Option<WebpageRecord>> {
        self.read()?;
        Ok(self.webpages.iter().find(|page| page.id == id).cloned())
    }

    fn find_keyword(&self, name: &str) -> StorageResult<Option<i64>> {
        self.read()?;
        Ok(self.keywords.get(name).copied())
    }

    fn get_occurrence(
        &self,
        webpage_id: i64,
        keyword_id: i64,
    ) -> StorageResult<Option<OccurrenceRecord>> {
        self.read()?;
        Ok(self.occurrences.get(&(webpage_id, keyword_id)).cloned())
    }

    fn search(&self, _terms: &[String], _limit: usize) -> StorageResult<Vec<SearchHit>> {
        self.read()?;
        Ok(Vec::new())
    }
}
