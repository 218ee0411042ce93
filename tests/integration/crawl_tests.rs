//! Crawl pipeline tests against mock servers

use crate::{test_config, test_service};
use pagemeta::config::Config;
use pagemeta::crawler::Crawler;
use pagemeta::metadata::HtmlVersion;
use pagemeta::storage::{CrawlStatus, SqliteStorage, Storage};
use pagemeta::PageMetaError;
use std::time::Duration;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body.into())
        .insert_header("content-type", "text/html")
}

/// Mounts a catch-all HEAD 200 so link probes succeed
async fn mount_healthy_links(server: &MockServer) {
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

fn crawler() -> Crawler {
    let mut config = Config::default();
    config.fetcher.timeout_secs = 2;
    config.link_check.timeout_secs = 2;
    Crawler::new(&config).expect("Failed to build crawler")
}

#[tokio::test]
async fn test_html5_page_metadata() {
    let site = MockServer::start().await;
    let other = MockServer::start().await;
    mount_healthy_links(&site).await;
    mount_healthy_links(&other).await;

    // "localhost" is a different hostname from the 127.0.0.1 page host
    let other_port = other.address().port();
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!(
            r#"<!DOCTYPE html>
            <html><head><title>  Test Page  </title></head><body>
            <h1>Welcome</h1>
            <h2>One</h2><h2>Two</h2>
            <a href="/about">About</a>
            <a href="contact">Contact</a>
            <a href="http://localhost:{}/elsewhere">Elsewhere</a>
            <a href="">Empty</a>
            </body></html>"#,
            other_port
        )))
        .mount(&site)
        .await;

    let url = Url::parse(&site.uri()).unwrap();
    let metadata = crawler().crawl(&url).await.unwrap();

    assert_eq!(metadata.html_version, HtmlVersion::Html5);
    assert_eq!(metadata.title, "Test Page");
    assert_eq!(metadata.h1_count, 1);
    assert_eq!(metadata.h2_count, 2);
    assert_eq!(metadata.h3_count, 0);
    assert_eq!(metadata.internal_links, 2);
    assert_eq!(metadata.external_links, 1);
    assert!(metadata.broken_links.is_empty());
    assert!(!metadata.has_login_form);
}

#[tokio::test]
async fn test_legacy_doctypes() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/xhtml"))
        .respond_with(html(
            r#"<!DOCTYPE html PUBLIC "-//W3C//DTD XHTML 1.0 Strict//EN"
            "http://www.w3.org/TR/xhtml1/DTD/xhtml1-strict.dtd">
            <html><head><title>X</title></head><body></body></html>"#,
        ))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/html4"))
        .respond_with(html(
            r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN">
            <html><head><title>Old</title></head><body></body></html>"#,
        ))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/bare"))
        .respond_with(html("<html><body><h3>No doctype</h3></body></html>"))
        .mount(&site)
        .await;

    let crawler = crawler();
    let at = |p: &str| Url::parse(&format!("{}{}", site.uri(), p)).unwrap();

    let xhtml = crawler.crawl(&at("/xhtml")).await.unwrap();
    assert_eq!(xhtml.html_version, HtmlVersion::Xhtml);

    let html4 = crawler.crawl(&at("/html4")).await.unwrap();
    assert_eq!(html4.html_version, HtmlVersion::Html4);

    let bare = crawler.crawl(&at("/bare")).await.unwrap();
    assert_eq!(bare.html_version, HtmlVersion::Unknown);
    assert_eq!(bare.title, "");
    assert_eq!(bare.h3_count, 1);
}

#[tokio::test]
async fn test_login_form_detection() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(html(
            r#"<!DOCTYPE html><html><body>
            <form action="/search"><input type="text" name="q"></form>
            <form action="/session">
              <input type="email" name="user">
              <input type="PASSWORD" name="pass">
            </form>
            </body></html>"#,
        ))
        .mount(&site)
        .await;

    Mock::given(method("GET"))
        .and(path("/loose"))
        .respond_with(html(
            r#"<!DOCTYPE html><html><body>
            <form action="/search"><input type="text" name="q"></form>
            <input type="password" name="orphan">
            </body></html>"#,
        ))
        .mount(&site)
        .await;

    let crawler = crawler();

    let url = Url::parse(&format!("{}/login", site.uri())).unwrap();
    assert!(crawler.crawl(&url).await.unwrap().has_login_form);

    let url = Url::parse(&format!("{}/loose", site.uri())).unwrap();
    assert!(!crawler.crawl(&url).await.unwrap().has_login_form);
}

#[tokio::test]
async fn test_broken_link_sample_is_capped_and_ordered() {
    let site = MockServer::start().await;

    let anchors: String = (0..12)
        .map(|i| format!(r#"<a href="/dead{}">Dead {}</a>"#, i, i))
        .collect();
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(format!(
            "<!DOCTYPE html><html><body>{}</body></html>",
            anchors
        )))
        .mount(&site)
        .await;

    // Only the first ten anchors are probed
    Mock::given(method("HEAD"))
        .and(path_regex(r"^/dead\d+$"))
        .respond_with(ResponseTemplate::new(404))
        .expect(10)
        .mount(&site)
        .await;

    let url = Url::parse(&site.uri()).unwrap();
    let metadata = crawler().crawl(&url).await.unwrap();

    let expected: Vec<String> = (0..10)
        .map(|i| format!("{}/dead{}", site.uri(), i))
        .collect();

    assert_eq!(metadata.internal_links, 12);
    assert_eq!(metadata.broken_links, expected);
}

#[tokio::test]
async fn test_mixed_link_health() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<!DOCTYPE html><html><body>
            <a href="/ok">OK</a>
            <a href="/gone">Gone</a>
            <a href="/error">Error</a>
            <a href="mailto:team@example.com">Mail</a>
            </body></html>"#,
        ))
        .mount(&site)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&site)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&site)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&site)
        .await;

    let url = Url::parse(&site.uri()).unwrap();
    let metadata = crawler().crawl(&url).await.unwrap();

    assert_eq!(
        metadata.broken_links,
        vec![
            format!("{}/gone", site.uri()),
            format!("{}/error", site.uri()),
            "mailto:team@example.com".to_string(),
        ]
    );
    assert_eq!(metadata.internal_links, 3);
    assert_eq!(metadata.external_links, 0);
}

#[tokio::test]
async fn test_server_error_fails_crawl() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&site)
        .await;

    let url = Url::parse(&site.uri()).unwrap();
    let result = crawler().crawl(&url).await;

    match result {
        Err(PageMetaError::Fetch { message, .. }) => assert_eq!(message, "HTTP 500"),
        other => panic!("expected fetch error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html("<!DOCTYPE html><html></html>").set_delay(Duration::from_secs(5)))
        .mount(&site)
        .await;

    let mut config = Config::default();
    config.fetcher.timeout_secs = 1;
    let crawler = Crawler::new(&config).unwrap();

    let url = Url::parse(&site.uri()).unwrap();
    let result = crawler.crawl(&url).await;

    assert!(matches!(result, Err(PageMetaError::Timeout { .. })));
}

#[tokio::test]
async fn test_slow_link_is_broken_but_crawl_succeeds() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<!DOCTYPE html><html><body><a href="/slow">Slow</a></body></html>"#,
        ))
        .mount(&site)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&site)
        .await;

    let mut config = Config::default();
    config.link_check.timeout_secs = 1;
    let crawler = Crawler::new(&config).unwrap();

    let url = Url::parse(&site.uri()).unwrap();
    let metadata = crawler.crawl(&url).await.unwrap();

    assert_eq!(metadata.broken_links, vec![format!("{}/slow", site.uri())]);
}

/// Fires `cancel` after `after`
fn cancel_after(cancel: &CancellationToken, after: Duration) {
    let cancel = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        cancel.cancel();
    });
}

#[tokio::test]
async fn test_cancel_during_page_fetch() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html("<!DOCTYPE html><html></html>").set_delay(Duration::from_secs(8)))
        .mount(&site)
        .await;

    let mut config = Config::default();
    config.fetcher.timeout_secs = 30;
    let crawler = Crawler::new(&config).unwrap();
    let url = Url::parse(&site.uri()).unwrap();

    let cancel = CancellationToken::new();
    cancel_after(&cancel, Duration::from_millis(200));

    let started = std::time::Instant::now();
    let result = crawler.crawl_with_cancel(&url, &cancel).await;

    assert!(matches!(result, Err(PageMetaError::Cancelled { .. })));
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_cancel_during_link_check() {
    let site = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<!DOCTYPE html><html><body><a href="/a">A</a><a href="/b">B</a></body></html>"#,
        ))
        .mount(&site)
        .await;
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(8)))
        .mount(&site)
        .await;

    let mut config = Config::default();
    config.link_check.timeout_secs = 30;
    let crawler = Crawler::new(&config).unwrap();
    let url = Url::parse(&site.uri()).unwrap();

    let cancel = CancellationToken::new();
    cancel_after(&cancel, Duration::from_millis(300));

    let started = std::time::Instant::now();
    let result = crawler.crawl_with_cancel(&url, &cancel).await;

    // No partial metadata, even though the page itself was parsed
    assert!(matches!(result, Err(PageMetaError::Cancelled { .. })));
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test]
async fn test_service_stores_one_record_per_url() {
    let site = MockServer::start().await;
    mount_healthy_links(&site).await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(html(
            "<!DOCTYPE html><html><head><title>Page</title></head><body></body></html>",
        ))
        .mount(&site)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let config = test_config(&db_path);
    let service = test_service(&config);

    // Both spellings normalize to the same key
    let first = service
        .crawl_and_store(&format!("{}/page/", site.uri()))
        .await
        .unwrap();
    let second = service
        .crawl_and_store(&format!("{}/page", site.uri()))
        .await
        .unwrap();

    assert!(first.is_success());
    assert!(second.is_success());
    assert_eq!(first.record.id, second.record.id);
    assert_eq!(first.record.created_at, second.record.created_at);
    assert!(second.record.last_crawled_at >= first.record.last_crawled_at);
    assert_eq!(second.record.url, format!("{}/page", site.uri()));

    // Records survive reopening the database
    drop(service);
    let storage = SqliteStorage::new(&db_path).unwrap();
    let records = storage.list_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, CrawlStatus::Done);
    assert_eq!(
        records[0].metadata.as_ref().map(|m| m.title.as_str()),
        Some("Page")
    );
}

#[tokio::test]
async fn test_failed_recrawl_clears_metadata() {
    let site = MockServer::start().await;
    mount_healthy_links(&site).await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(html("<!DOCTYPE html><html><body><h1>Up</h1></body></html>"))
        .up_to_n_times(1)
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&site)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let config = test_config(&temp_dir.path().join("test.db"));
    let service = test_service(&config);

    let first = service
        .crawl_and_store(&format!("{}/flaky", site.uri()))
        .await
        .unwrap();
    assert_eq!(first.metadata().map(|m| m.h1_count), Some(1));

    let second = service.recrawl(first.record.id).await.unwrap();
    assert!(matches!(second.failure, Some(PageMetaError::Fetch { .. })));
    assert_eq!(second.record.id, first.record.id);
    assert_eq!(second.record.status, CrawlStatus::Failed);
    assert!(second.metadata().is_none());

    let stored = service.get(first.record.id).unwrap().unwrap();
    assert_eq!(stored.status, CrawlStatus::Failed);
    assert!(stored.metadata.is_none());
}
