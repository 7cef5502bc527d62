//! Integration tests for the harvest pipeline
//!
//! These tests use wiremock to create mock HTTP servers and exercise the
//! full fetch → discover → extract → report cycle end-to-end.

use regex::Regex;
use spire_harvest::config::{CrawlerConfig, DEFAULT_EMAIL_PATTERN};
use spire_harvest::crawler::{build_http_client, BatchRunner, FetchCache, Fetcher, Progress};
use spire_harvest::directory;
use spire_harvest::report::build_rows;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a crawler configuration suitable for hitting a local mock server
fn create_test_config() -> CrawlerConfig {
    CrawlerConfig {
        max_concurrent_seeds: 5,
        request_timeout: Some(5),
        cache_max_entries: 100,
        cache_ttl: 300,
    }
}

fn create_test_fetcher(config: &CrawlerConfig) -> Arc<Fetcher> {
    let client = build_http_client(config).expect("Failed to build client");
    let cache = FetchCache::new(
        config.cache_max_entries,
        Duration::from_secs(config.cache_ttl),
    );
    Arc::new(Fetcher::new(client, cache))
}

fn create_test_runner(keywords: &[&str]) -> BatchRunner {
    let config = create_test_config();
    BatchRunner::new(
        create_test_fetcher(&config),
        keywords.iter().map(|k| k.to_string()).collect(),
        Regex::new(DEFAULT_EMAIL_PATTERN).expect("Failed to compile pattern"),
        config.max_concurrent_seeds as usize,
    )
}

/// Progress double that counts completions
#[derive(Default)]
struct CountingProgress {
    completions: AtomicUsize,
}

impl Progress for CountingProgress {
    fn seed_completed(&self, _completed: usize, _total: usize, _seed: &str) {
        self.completions.fetch_add(1, Ordering::SeqCst);
    }
}

async fn mount_html(server: &MockServer, page_path: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body.to_string())
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_contact_page_email_flow() {
    let mock_server = MockServer::start().await;

    mount_html(
        &mock_server,
        "/",
        r#"<html><body><a href="/contact-us">Contact</a></body></html>"#,
    )
    .await;
    mount_html(
        &mock_server,
        "/contact-us",
        "<html><body><p>Reach us at info@example.org.</p></body></html>",
    )
    .await;

    let seed = Url::parse(&format!("{}/", mock_server.uri())).unwrap();
    let runner = create_test_runner(&["contact"]);
    let progress = CountingProgress::default();

    let results = runner.run(std::slice::from_ref(&seed), &progress).await;

    assert_eq!(results.len(), 1);
    let pages = &results[seed.as_str()];
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].emails, vec!["info@example.org"]);
    assert_eq!(pages[0].error, None);

    // The spreadsheet row pairs the seed with the discovered email
    let rows = build_rows(
        std::slice::from_ref(&seed),
        &results,
        &Regex::new(DEFAULT_EMAIL_PATTERN).unwrap(),
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].url, seed.to_string());
    assert_eq!(rows[0].email, Some("info@example.org".to_string()));

    assert_eq!(progress.completions.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_every_seed_has_an_entry() {
    let mock_server = MockServer::start().await;

    mount_html(
        &mock_server,
        "/good/",
        r#"<html><body><a href="/good/contact">Contact</a></body></html>"#,
    )
    .await;
    mount_html(
        &mock_server,
        "/good/contact",
        "<html><body>mail: board@example.org</body></html>",
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/missing/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/broken/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let base = mock_server.uri();
    let seeds: Vec<Url> = ["/good/", "/missing/", "/broken/"]
        .iter()
        .map(|p| Url::parse(&format!("{}{}", base, p)).unwrap())
        .collect();

    let runner = create_test_runner(&["contact"]);
    let progress = CountingProgress::default();
    let results = runner.run(&seeds, &progress).await;

    // One entry per seed, failures included
    assert_eq!(results.len(), 3);
    for seed in &seeds {
        assert!(results.contains_key(seed.as_str()), "missing {}", seed);
    }

    // Failed homepages simply found no contact candidates
    assert!(results[seeds[1].as_str()].is_empty());
    assert!(results[seeds[2].as_str()].is_empty());

    // The good seed still produced its email
    assert_eq!(results[seeds[0].as_str()][0].emails, vec!["board@example.org"]);

    assert_eq!(progress.completions.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_failed_homepage_becomes_null_row() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let seed = Url::parse(&format!("{}/", mock_server.uri())).unwrap();
    let runner = create_test_runner(&["contact"]);
    let results = runner.run(std::slice::from_ref(&seed), &CountingProgress::default()).await;

    let rows = build_rows(
        std::slice::from_ref(&seed),
        &results,
        &Regex::new(DEFAULT_EMAIL_PATTERN).unwrap(),
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].url, seed.to_string());
    assert_eq!(rows[0].email, None);
}

#[tokio::test]
async fn test_cache_serves_repeat_fetches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("<html>cached body</html>"),
        )
        .expect(1) // The second fetch must come from the cache
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(&create_test_config());
    let url = format!("{}/page", mock_server.uri());

    let first = fetcher.fetch(&url).await;
    let second = fetcher.fetch(&url).await;

    assert_eq!(first.text(), "<html>cached body</html>");
    assert_eq!(first.text(), second.text());
}

#[tokio::test]
async fn test_cache_ttl_expiry_forces_refetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>body</html>"))
        .expect(2)
        .mount(&mock_server)
        .await;

    let config = create_test_config();
    let client = build_http_client(&config).unwrap();
    let cache = FetchCache::new(config.cache_max_entries, Duration::from_millis(50));
    let fetcher = Fetcher::new(client, cache);

    let url = format!("{}/page", mock_server.uri());
    fetcher.fetch(&url).await;

    tokio::time::sleep(Duration::from_millis(100)).await;

    let refetched = fetcher.fetch(&url).await;
    assert_eq!(refetched.text(), "<html>body</html>");
}

#[tokio::test]
async fn test_failures_are_not_cached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2) // Both fetches must reach the network
        .mount(&mock_server)
        .await;

    let fetcher = create_test_fetcher(&create_test_config());
    let url = format!("{}/flaky", mock_server.uri());

    assert!(fetcher.fetch(&url).await.is_failed());
    assert!(fetcher.fetch(&url).await.is_failed());
}

#[tokio::test]
async fn test_malformed_html_does_not_abort_batch() {
    let mock_server = MockServer::start().await;

    mount_html(
        &mock_server,
        "/mangled/",
        "<html><a href='/mangled/contact'>x<div><<<<not closed",
    )
    .await;
    mount_html(
        &mock_server,
        "/mangled/contact",
        "pastor@example.org somewhere in the wreckage",
    )
    .await;
    mount_html(
        &mock_server,
        "/fine/",
        r#"<html><body><a href="/fine/contact">Contact</a></body></html>"#,
    )
    .await;
    mount_html(&mock_server, "/fine/contact", "office@example.org").await;

    let base = mock_server.uri();
    let seeds: Vec<Url> = ["/mangled/", "/fine/"]
        .iter()
        .map(|p| Url::parse(&format!("{}{}", base, p)).unwrap())
        .collect();

    let runner = create_test_runner(&["contact"]);
    let results = runner.run(&seeds, &CountingProgress::default()).await;

    assert_eq!(results.len(), 2);
    // The recovering parser still found the anchor in the mangled page
    assert_eq!(
        results[seeds[0].as_str()][0].emails,
        vec!["pastor@example.org"]
    );
    assert_eq!(
        results[seeds[1].as_str()][0].emails,
        vec!["office@example.org"]
    );
}

#[tokio::test]
async fn test_candidate_order_preserved() {
    let mock_server = MockServer::start().await;

    mount_html(
        &mock_server,
        "/",
        r#"<html><body>
            <a href="/contact">Contact</a>
            <a href="/about">About</a>
        </body></html>"#,
    )
    .await;
    mount_html(&mock_server, "/contact", "first@example.org").await;
    mount_html(&mock_server, "/about", "second@example.org").await;

    let seed = Url::parse(&format!("{}/", mock_server.uri())).unwrap();
    let runner = create_test_runner(&["contact", "about"]);
    let results = runner.run(std::slice::from_ref(&seed), &CountingProgress::default()).await;

    let pages = &results[seed.as_str()];
    assert_eq!(pages.len(), 2);
    assert!(pages[0].page_url.ends_with("/contact"));
    assert_eq!(pages[0].emails, vec!["first@example.org"]);
    assert!(pages[1].page_url.ends_with("/about"));
    assert_eq!(pages[1].emails, vec!["second@example.org"]);
}

#[tokio::test]
async fn test_unreachable_contact_page_recorded_as_error() {
    let mock_server = MockServer::start().await;

    mount_html(
        &mock_server,
        "/",
        r#"<html><body><a href="/contact">Contact</a></body></html>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/contact"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let seed = Url::parse(&format!("{}/", mock_server.uri())).unwrap();
    let runner = create_test_runner(&["contact"]);
    let results = runner.run(std::slice::from_ref(&seed), &CountingProgress::default()).await;

    let pages = &results[seed.as_str()];
    assert_eq!(pages.len(), 1);
    assert!(pages[0].emails.is_empty());
    assert!(pages[0].error.is_some());

    // The error text stays out of the email column
    let rows = build_rows(
        std::slice::from_ref(&seed),
        &results,
        &Regex::new(DEFAULT_EMAIL_PATTERN).unwrap(),
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].email, None);
}

#[tokio::test]
async fn test_directory_feed_filtering() {
    let mock_server = MockServer::start().await;

    let feed_body = r#"{
        "churches": [
            {"name": "First", "website": "https://first.example/"},
            {"name": "Second", "website": "not a url"},
            {"name": "Third", "website": ""},
            {"name": "Fourth"}
        ]
    }"#;

    Mock::given(method("GET"))
        .and(path("/kerkzoeker/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(feed_body.to_string())
                .insert_header("content-type", "application/json"),
        )
        .mount(&mock_server)
        .await;

    let config = spire_harvest::config::DirectoryConfig {
        feed_url: format!("{}/kerkzoeker/", mock_server.uri()),
        records_field: "churches".to_string(),
    };
    let client = build_http_client(&create_test_config()).unwrap();

    let seeds = directory::fetch_seed_urls(&client, &config).await.unwrap();

    // Only the syntactically valid absolute URL survives
    assert_eq!(seeds.len(), 1);
    assert_eq!(seeds[0].as_str(), "https://first.example/");
}

#[tokio::test]
async fn test_directory_feed_missing_field_is_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"orgs": []}"#))
        .mount(&mock_server)
        .await;

    let config = spire_harvest::config::DirectoryConfig {
        feed_url: format!("{}/feed", mock_server.uri()),
        records_field: "churches".to_string(),
    };
    let client = build_http_client(&create_test_config()).unwrap();

    let result = directory::fetch_seed_urls(&client, &config).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_shared_contact_page_fetched_once_across_seeds() {
    let mock_server = MockServer::start().await;

    // Two organizations, same shared contact page
    mount_html(
        &mock_server,
        "/org-a/",
        r#"<html><body><a href="/shared/contact">Contact</a></body></html>"#,
    )
    .await;
    mount_html(
        &mock_server,
        "/org-b/",
        r#"<html><body><a href="/shared/contact">Contact</a></body></html>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/shared/contact"))
        .respond_with(ResponseTemplate::new(200).set_body_string("shared@example.org"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base = mock_server.uri();
    let seed_a = Url::parse(&format!("{}/org-a/", base)).unwrap();
    let seed_b = Url::parse(&format!("{}/org-b/", base)).unwrap();

    // Run the seeds one after the other: concurrent first fetches of the
    // same URL are allowed to race, sequential ones must hit the cache
    let runner = create_test_runner(&["contact"]);
    let first = runner.process_seed(&seed_a).await;
    let second = runner.process_seed(&seed_b).await;

    assert_eq!(first.1[0].emails, vec!["shared@example.org"]);
    assert_eq!(second.1[0].emails, vec!["shared@example.org"]);
}
