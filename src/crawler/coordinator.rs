//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Resetting the index and seeding the frontier
//! - Selecting, fetching and extracting one URL at a time
//! - Feeding discovered links back into the frontier
//! - Indexing titled pages and triggering relevance batches
//! - Honouring cooperative stop requests and publishing progress

use crate::config::Config;
use crate::crawler::{CrawlControl, FetchResult, Fetcher, Frontier, HttpFetcher, OfferOutcome};
use crate::extract::extract_page;
use crate::index::{Indexer, RelevanceBatch, ResilientStorage, RetryPolicy};
use crate::state::{CrawlReport, CrawlState, PageOutcome, StopReason};
use crate::storage::{open_storage, SqliteStorage, Storage};
use crate::url::normalize_url;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

/// Main crawler coordinator structure
///
/// Owns the frontier and the indexer for the lifetime of a run. Nothing else
/// touches them; other tasks interact only through the shared
/// [`CrawlControl`].
pub struct Coordinator<F, S> {
    fetcher: F,
    frontier: Frontier,
    indexer: Indexer<S>,
    relevance: RelevanceBatch,
    control: Arc<CrawlControl>,
    seed_url: String,
    max_pages: u64,
    max_url_length: usize,
    progress_interval: u64,
    flush_on_drain: bool,
    state: CrawlState,
    report: CrawlReport,
}

impl Coordinator<HttpFetcher, SqliteStorage> {
    /// Creates a coordinator that fetches over HTTP and writes to SQLite
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `control` - Stop flag and progress counters shared with the caller
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError)` - Failed to open storage or build the HTTP client
    pub fn new(config: &Config, control: Arc<CrawlControl>) -> crate::Result<Self> {
        let fetcher = HttpFetcher::new(&config.user_agent, config.crawler.fetch_timeout())?;
        let storage = open_storage(Path::new(&config.storage.database_path))?;
        Self::with_parts(config, fetcher, storage, control)
    }
}

impl<F: Fetcher, S: Storage> Coordinator<F, S> {
    /// Creates a coordinator from an explicit fetcher and storage backend
    pub fn with_parts(
        config: &Config,
        fetcher: F,
        storage: S,
        control: Arc<CrawlControl>,
    ) -> crate::Result<Self> {
        let seed = normalize_url(&config.crawler.seed_url)?;
        let store = ResilientStorage::new(storage, RetryPolicy::from_config(&config.storage));

        Ok(Self {
            fetcher,
            frontier: Frontier::with_seed(seed.as_str()),
            indexer: Indexer::new(store),
            relevance: RelevanceBatch::from_config(&config.relevance),
            control,
            seed_url: seed.to_string(),
            max_pages: config.crawler.max_pages,
            max_url_length: config.crawler.max_url_length,
            progress_interval: config.crawler.progress_interval.max(1),
            flush_on_drain: config.relevance.flush_on_drain,
            state: CrawlState::Idle,
            report: CrawlReport::default(),
        })
    }

    /// Returns the frontier
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Returns the indexer
    pub fn indexer(&self) -> &Indexer<S> {
        &self.indexer
    }

    /// Returns the current loop state
    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Returns the totals collected so far
    pub fn report(&self) -> &CrawlReport {
        &self.report
    }

    /// Consumes the coordinator and returns its storage backend
    pub fn into_storage(self) -> S {
        self.indexer.into_store().into_inner()
    }

    /// Runs the crawl until the frontier drains, a stop is requested, or the page limit is hit
    ///
    /// The index tables are dropped and recreated first, so every run starts
    /// from an empty index.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The loop stopped normally
    /// * `Err(CrawlError)` - Storage failed permanently; the loop was aborted
    pub async fn run(&mut self) -> crate::Result<CrawlReport> {
        tracing::info!("Starting crawl from {}", self.seed_url);
        self.indexer.reset().await?;

        let start_time = Instant::now();

        let stop_reason = loop {
            self.state = CrawlState::Selecting;

            if self.control.is_stop_requested() {
                tracing::info!("Stop requested, draining");
                break StopReason::StopRequested;
            }

            if self.max_pages > 0 && self.report.urls_processed >= self.max_pages {
                tracing::info!("Reached page limit of {}", self.max_pages);
                break StopReason::PageLimit;
            }

            if self.step().await?.is_none() {
                tracing::info!("Frontier is empty, crawl complete");
                break StopReason::Drained;
            }

            if self.report.urls_processed % self.progress_interval == 0 {
                let elapsed = start_time.elapsed();
                let rate = self.report.pages_indexed as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
                tracing::info!(
                    "Progress: {} URLs processed, {} pages indexed, {} keywords, {} in frontier, {:.2} pages/sec",
                    self.report.urls_processed,
                    self.report.pages_indexed,
                    self.indexer.keyword_count(),
                    self.frontier.pending_len(),
                    rate
                );
            }
        };

        if self.flush_on_drain && !self.indexer.dirty_keywords().is_empty() {
            tracing::info!("Recomputing relevance for keywords touched since the last batch");
            self.relevance.run(&mut self.indexer).await?;
        }

        self.state = CrawlState::Drained;
        self.control.set_current_url(None);

        self.report.keywords = self.indexer.keyword_count();
        self.report.relevance_batches = self.relevance.batches_run();
        self.report.pending_urls = self.frontier.pending_len() as u64;
        self.report.stop_reason = stop_reason;
        self.report.elapsed = start_time.elapsed();

        tracing::info!(
            "Crawl finished ({}): {} URLs processed, {} pages indexed in {:?}",
            stop_reason,
            self.report.urls_processed,
            self.report.pages_indexed,
            self.report.elapsed
        );

        Ok(self.report.clone())
    }

    /// Selects the next URL and processes it
    ///
    /// # Returns
    ///
    /// * `Ok(Some(outcome))` - A URL was processed
    /// * `Ok(None)` - The frontier is exhausted
    pub async fn step(&mut self) -> crate::Result<Option<PageOutcome>> {
        self.state = CrawlState::Selecting;
        let Some(url) = self.frontier.select_next() else {
            return Ok(None);
        };

        let outcome = self.process_url(&url).await?;

        self.report.record(outcome);
        self.control.record_progress(
            self.report.urls_processed,
            self.indexer.pages_indexed(),
            self.indexer.keyword_count(),
        );
        self.state = CrawlState::Selecting;

        Ok(Some(outcome))
    }

    /// Processes a single URL
    ///
    /// This method:
    /// 1. Fetches the page; a failed fetch abandons the URL
    /// 2. Extracts title, text and links; an untitled page is abandoned
    /// 3. Offers every link to the frontier
    /// 4. Indexes the page and its keywords
    /// 5. Runs the relevance batch when it is due
    async fn process_url(&mut self, url: &str) -> crate::Result<PageOutcome> {
        self.control.set_current_url(Some(url));
        tracing::debug!("Processing URL: {}", url);

        self.state = CrawlState::Fetching;
        let (final_url, body) = match self.fetcher.fetch(url).await {
            FetchResult::Success {
                final_url, body, ..
            } => (final_url, body),
            FetchResult::HttpError { status_code } => {
                tracing::debug!("HTTP {} for {}, skipping", status_code, url);
                return Ok(PageOutcome::FetchFailed);
            }
            FetchResult::ContentMismatch { content_type } => {
                tracing::debug!("Not HTML ({}) at {}, skipping", content_type, url);
                return Ok(PageOutcome::FetchFailed);
            }
            FetchResult::NetworkError { error } => {
                tracing::debug!("Failed to fetch {}: {}", url, error);
                return Ok(PageOutcome::FetchFailed);
            }
        };

        self.state = CrawlState::Extracting;
        let base_url = match Url::parse(&final_url) {
            Ok(base) => base,
            Err(_) => Url::parse(url)?,
        };
        let page = extract_page(&body, &base_url, self.max_url_length);

        let Some(title) = page.title else {
            tracing::debug!("No title on {}, not indexing", url);
            return Ok(PageOutcome::Untitled);
        };

        for link in &page.links {
            if self.frontier.offer(link) == OfferOutcome::Added {
                tracing::trace!("Discovered {}", link);
            }
        }

        self.state = CrawlState::Indexing;
        let page_id = self.indexer.index_page(url, &title, &page.text).await?;

        let pages = self.indexer.pages_indexed();
        self.relevance.maybe_run(&mut self.indexer, pages).await?;

        Ok(PageOutcome::Indexed {
            page_id,
            links: page.links.len(),
        })
    }
}
