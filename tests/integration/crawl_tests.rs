//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! fetch, extract and index cycle against a real SQLite file.

use std::sync::Arc;
use tempfile::TempDir;
use webindex::config::{Config, CrawlerConfig, RelevanceConfig, StorageConfig, UserAgentConfig};
use webindex::crawler::{CrawlControl, Coordinator};
use webindex::output::{load_statistics, search};
use webindex::state::StopReason;
use webindex::storage::{SqliteStorage, Storage};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling from `seed_url` into `db_path`
fn create_test_config(seed_url: &str, db_path: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            seed_url: seed_url.to_string(),
            max_pages: 0,
            max_url_length: 256,
            fetch_timeout_secs: 5,
            progress_interval: 10,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        storage: StorageConfig {
            database_path: db_path.to_string(),
            reconnect_backoff_ms: 1,
            max_reconnect_attempts: 2,
        },
        relevance: RelevanceConfig::default(),
    }
}

async fn mount_page(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html.to_string(), "text/html"))
        .mount(server)
        .await;
}

/// Home links to /a twice and /b once; /a links back home and to a missing page
async fn mount_small_site(server: &MockServer) {
    mount_page(
        server,
        "/",
        r#"<html><head><title>Home</title></head><body>
            <p>Welcome home</p>
            <a href="/a">alpha</a> <a href="/a#top">again</a> <a href="/b">beta</a>
        </body></html>"#,
    )
    .await;

    mount_page(
        server,
        "/a",
        r#"<html><head><title>Page A</title></head><body>
            <p>alpha alpha shared</p>
            <a href="/">home</a> <a href="/missing">gone</a>
        </body></html>"#,
    )
    .await;

    mount_page(
        server,
        "/b",
        "<html><body><p>No title here</p><a href=\"/c\">c</a></body></html>",
    )
    .await;
}

fn db_path(dir: &TempDir) -> String {
    dir.path().join("index.db").to_string_lossy().into_owned()
}

#[tokio::test]
async fn test_full_crawl_small_site() {
    let server = MockServer::start().await;
    mount_small_site(&server).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", server.uri()), &db_path(&dir));

    let mut coordinator = Coordinator::new(&config, Arc::new(CrawlControl::new())).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.stop_reason, StopReason::Drained);
    assert_eq!(report.urls_processed, 4);
    assert_eq!(report.pages_indexed, 2);
    assert_eq!(report.untitled_pages, 1);
    assert_eq!(report.fetch_failures, 1);
    assert_eq!(report.pending_urls, 0);

    // /c is only linked from the untitled page, so it is never discovered
    assert!(!coordinator.frontier().is_visited(&format!("{}/c", server.uri())));

    let storage = coordinator.into_storage();
    let stats = load_statistics(&storage).unwrap();
    assert_eq!(stats.webpages, 2);
    // welcome, home, alpha, again, beta, shared, gone
    assert_eq!(stats.keywords, 7);
    assert_eq!(stats.occurrences, 9);

    let home = storage.get_webpage(1).unwrap().unwrap();
    assert_eq!(home.title, "Home");
    assert_eq!(home.content, "Welcome home alpha again beta");

    let page_a = storage.get_webpage(2).unwrap().unwrap();
    assert_eq!(page_a.title, "Page A");
    assert!(page_a.url.ends_with("/a"));

    let alpha = storage.find_keyword("alpha").unwrap().unwrap();
    let occurrence = storage.get_occurrence(2, alpha).unwrap().unwrap();
    assert_eq!(occurrence.counter, 2);
    assert!(occurrence.relevance > 0.0);
}

#[tokio::test]
async fn test_search_after_crawl() {
    let server = MockServer::start().await;
    mount_small_site(&server).await;

    let dir = TempDir::new().unwrap();
    let path = db_path(&dir);
    let config = create_test_config(&format!("{}/", server.uri()), &path);

    let mut coordinator = Coordinator::new(&config, Arc::new(CrawlControl::new())).unwrap();
    coordinator.run().await.unwrap();
    drop(coordinator);

    // A fresh connection sees the committed index
    let storage = SqliteStorage::new(std::path::Path::new(&path)).unwrap();

    let hits = search(&storage, "Alpha", 10).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].title, "Page A");
    assert!(hits[0].score > hits[1].score);

    let hits = search(&storage, "shared alpha", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Page A");

    assert!(search(&storage, "nowhere", 10).unwrap().is_empty());
}

#[tokio::test]
async fn test_untitled_seed_writes_nothing() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        "<html><body><p>Plenty of text</p><a href=\"/next\">next</a></body></html>",
    )
    .await;
    mount_page(&server, "/next", "<title>Next</title><body>next</body>").await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", server.uri()), &db_path(&dir));

    let mut coordinator = Coordinator::new(&config, Arc::new(CrawlControl::new())).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.urls_processed, 1);
    assert_eq!(report.untitled_pages, 1);

    let storage = coordinator.into_storage();
    assert_eq!(storage.count_webpages().unwrap(), 0);
    assert_eq!(storage.count_keywords().unwrap(), 0);
    assert_eq!(storage.count_occurrences().unwrap(), 0);
}

#[tokio::test]
async fn test_http_error_seed_is_abandoned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", server.uri()), &db_path(&dir));

    let mut coordinator = Coordinator::new(&config, Arc::new(CrawlControl::new())).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.stop_reason, StopReason::Drained);
    assert_eq!(report.fetch_failures, 1);
    assert_eq!(report.pages_indexed, 0);
    assert!(coordinator.frontier().is_empty());
}

#[tokio::test]
async fn test_non_html_resources_are_not_indexed() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<title>Downloads</title><body>
            <a href="/report">report</a> <a href="/manual.pdf">manual</a>
        </body>"#,
    )
    .await;

    // Served as PDF although the path has no extension
    Mock::given(method("GET"))
        .and(path("/report"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4 <title>Fake</title>".to_vec(), "application/pdf"),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Dropped by extension before it ever reaches the frontier
    Mock::given(method("GET"))
        .and(path("/manual.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", server.uri()), &db_path(&dir));

    let mut coordinator = Coordinator::new(&config, Arc::new(CrawlControl::new())).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.urls_processed, 2);
    assert_eq!(report.pages_indexed, 1);
    assert_eq!(report.fetch_failures, 1);

    let storage = coordinator.into_storage();
    assert_eq!(storage.count_webpages().unwrap(), 1);
    assert!(storage.find_keyword("fake").unwrap().is_none());
}

#[tokio::test]
async fn test_page_limit_leaves_pending_urls() {
    let server = MockServer::start().await;
    mount_small_site(&server).await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&format!("{}/", server.uri()), &db_path(&dir));
    config.crawler.max_pages = 1;

    let mut coordinator = Coordinator::new(&config, Arc::new(CrawlControl::new())).unwrap();
    let report = coordinator.run().await.unwrap();

    assert_eq!(report.stop_reason, StopReason::PageLimit);
    assert_eq!(report.pages_indexed, 1);
    assert_eq!(report.pending_urls, 2);

    let a = format!("{}/a", server.uri());
    assert_eq!(coordinator.frontier().score(&a), Some(2));
}

#[tokio::test]
async fn test_rerun_starts_from_empty_index() {
    let server = MockServer::start().await;
    mount_small_site(&server).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&format!("{}/", server.uri()), &db_path(&dir));

    for _ in 0..2 {
        let mut coordinator = Coordinator::new(&config, Arc::new(CrawlControl::new())).unwrap();
        coordinator.run().await.unwrap();
    }

    let storage = SqliteStorage::new(std::path::Path::new(&db_path(&dir))).unwrap();
    assert_eq!(storage.count_webpages().unwrap(), 2);
    assert_eq!(storage.get_webpage(1).unwrap().unwrap().title, "Home");
}
