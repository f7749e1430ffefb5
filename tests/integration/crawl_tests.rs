//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::sync::{Arc, Mutex};
use sumi_press::article::ArticleView;
use sumi_press::config::Config;
use sumi_press::crawler::{crawl, Coordinator, FetchError};
use sumi_press::storage::{lookup_article, open_storage, ArticleStore, SqliteStorage};
use sumi_press::PressError;
use tempfile::TempDir;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing images into `images_dir`
fn create_test_config(images_dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.http.timeout_secs = 5;
    config.http.connect_timeout_secs = 2;
    config.images.folder = images_dir.path().to_string_lossy().into_owned();
    config
}

fn create_coordinator(config: &Config) -> Coordinator<SqliteStorage> {
    let storage = SqliteStorage::new_in_memory("articles").expect("Failed to create store");
    Coordinator::new(config, storage).expect("Failed to create coordinator")
}

fn listing_html(hrefs: &[&str]) -> String {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a class="open-section" href="{}">Story</a>"#, href))
        .collect();
    format!("<html><body><div class=\"list\">{}</div></body></html>", anchors)
}

fn article_html(title: &str, date: &str, paragraphs: &[&str], image: Option<&str>) -> String {
    let body: String = paragraphs.iter().map(|p| format!("<p>{}</p>", p)).collect();
    let image = image
        .map(|src| format!(r#"<div class="medium-insert-images"><img src="{}"></div>"#, src))
        .unwrap_or_default();
    format!(
        r#"<html><body>
            <div class="heading_H"><h1>{}</h1></div>
            <span class="post-date-time">{}</span>
            <div class="content-area">{}{}</div>
        </body></html>"#,
        title, date, body, image
    )
}

async fn mount_html(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_image(server: &MockServer, route: &str, bytes: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(bytes)
                .insert_header("content-type", "image/jpeg"),
        )
        .mount(server)
        .await;
}

fn count_articles(coordinator: &Coordinator<SqliteStorage>) -> u64 {
    coordinator
        .store()
        .lock()
        .unwrap()
        .count_articles()
        .expect("Failed to count articles")
}

#[tokio::test]
async fn test_full_crawl_stores_articles_and_images() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let images_dir = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/category/world",
        listing_html(&["/latest/1-first", "/latest/2-second"]),
    )
    .await;
    mount_html(
        &mock_server,
        "/latest/1-first",
        article_html("First Story", "March 05, 2024", &["Hello.", "World."], Some("/img/first.jpg")),
    )
    .await;
    mount_html(
        &mock_server,
        "/latest/2-second",
        article_html("Second Story", "April 11, 2024", &["Body."], Some("/img/second.jpg")),
    )
    .await;
    mount_image(&mock_server, "/img/first.jpg", vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3]).await;
    mount_image(&mock_server, "/img/second.jpg", vec![0xFF; 5000]).await;

    let config = create_test_config(&images_dir);
    let coordinator = create_coordinator(&config);

    let report = coordinator
        .crawl_category(&format!("{}/category/world", base_url))
        .await;

    assert_eq!(report.discovered, 2);
    assert_eq!(
        report.scraped_urls,
        vec![
            format!("{}/latest/1-first", base_url),
            format!("{}/latest/2-second", base_url),
        ]
    );
    assert!(report.skipped.is_empty());
    assert_eq!(count_articles(&coordinator), 2);

    let first_image = images_dir.path().join("first.jpg");
    assert_eq!(
        std::fs::read(&first_image).unwrap(),
        vec![0xFF, 0xD8, 0xFF, 0xE0, 1, 2, 3]
    );
    assert_eq!(
        std::fs::read(images_dir.path().join("second.jpg")).unwrap().len(),
        5000
    );

    let store = coordinator.store();
    let store = store.lock().unwrap();
    let article = store
        .get_by_url(&format!("{}/latest/1-first", base_url))
        .unwrap();
    assert_eq!(article.title, "First Story");
    assert_eq!(article.body, "Hello.\nWorld.");
    assert_eq!(
        article.image_path.as_deref(),
        Some(first_image.to_string_lossy().as_ref())
    );
}

#[tokio::test]
async fn test_second_crawl_is_idempotent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let images_dir = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/category/world",
        listing_html(&["/latest/1-first", "/latest/2-second"]),
    )
    .await;

    // Each article page must be fetched exactly once across both crawls
    for (route, title) in [("/latest/1-first", "First"), ("/latest/2-second", "Second")] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(article_html(title, "March 05, 2024", &["Text."], None)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(&images_dir);
    let coordinator = create_coordinator(&config);
    let category = format!("{}/category/world", base_url);

    let first = coordinator.crawl_category(&category).await;
    assert_eq!(first.scraped_urls.len(), 2);
    assert_eq!(count_articles(&coordinator), 2);

    let second = coordinator.crawl_category(&category).await;
    assert!(second.scraped_urls.is_empty());
    assert_eq!(second.already_known, 2);
    assert!(second.skipped.is_empty());
    assert_eq!(count_articles(&coordinator), 2);

    // Wiremock verifies the expect(1) counts when mock_server drops
}

#[tokio::test]
async fn test_malformed_article_is_isolated() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let images_dir = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/category/world",
        listing_html(&["/latest/1-good", "/latest/2-broken", "/latest/3-good"]),
    )
    .await;
    mount_html(
        &mock_server,
        "/latest/1-good",
        article_html("Good One", "March 05, 2024", &["A."], None),
    )
    .await;
    mount_html(
        &mock_server,
        "/latest/2-broken",
        r#"<html><body><span class="post-date-time">March 05, 2024</span>
           <div class="content-area"><p>No heading here.</p></div></body></html>"#
            .to_string(),
    )
    .await;
    mount_html(
        &mock_server,
        "/latest/3-good",
        article_html("Good Three", "March 06, 2024", &["C."], None),
    )
    .await;

    let config = create_test_config(&images_dir);
    let coordinator = create_coordinator(&config);

    let report = coordinator
        .crawl_category(&format!("{}/category/world", base_url))
        .await;

    assert_eq!(
        report.scraped_urls,
        vec![
            format!("{}/latest/1-good", base_url),
            format!("{}/latest/3-good", base_url),
        ]
    );
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].url, format!("{}/latest/2-broken", base_url));
    assert!(report.skipped[0].reason.contains("title"));
    assert_eq!(count_articles(&coordinator), 2);
}

#[tokio::test]
async fn test_article_fetch_failure_is_isolated() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let images_dir = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/category/world",
        listing_html(&["/latest/1-gone", "/latest/2-here"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/latest/1-gone"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    mount_html(
        &mock_server,
        "/latest/2-here",
        article_html("Still Here", "March 05, 2024", &["B."], None),
    )
    .await;

    let config = create_test_config(&images_dir);
    let coordinator = create_coordinator(&config);

    let report = coordinator
        .crawl_category(&format!("{}/category/world", base_url))
        .await;

    assert_eq!(report.scraped_urls, vec![format!("{}/latest/2-here", base_url)]);
    assert_eq!(report.skipped.len(), 1);
    assert!(report.skipped[0].reason.contains("500"));

    // A failed article is not stored, so the next crawl tries it again
    let store = coordinator.store();
    assert!(!store
        .lock()
        .unwrap()
        .exists(&format!("{}/latest/1-gone", base_url))
        .unwrap());
}

#[tokio::test]
async fn test_missing_image_still_persists() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let images_dir = TempDir::new().unwrap();

    mount_html(&mock_server, "/category/world", listing_html(&["/latest/1-plain"])).await;
    mount_html(
        &mock_server,
        "/latest/1-plain",
        article_html("No Picture", "March 05, 2024", &["Words."], None),
    )
    .await;

    let config = create_test_config(&images_dir);
    let coordinator = create_coordinator(&config);

    let report = coordinator
        .crawl_category(&format!("{}/category/world", base_url))
        .await;
    assert_eq!(report.scraped_urls.len(), 1);

    let store = coordinator.store();
    let article = store
        .lock()
        .unwrap()
        .get_by_url(&format!("{}/latest/1-plain", base_url))
        .unwrap();
    assert_eq!(article.image_path, None);
}

#[tokio::test]
async fn test_broken_image_still_persists() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let images_dir = TempDir::new().unwrap();

    mount_html(&mock_server, "/category/world", listing_html(&["/latest/1-pic"])).await;
    mount_html(
        &mock_server,
        "/latest/1-pic",
        article_html("Broken Picture", "March 05, 2024", &["Words."], Some("/img/missing.jpg")),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/img/missing.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&images_dir);
    let coordinator = create_coordinator(&config);

    let report = coordinator
        .crawl_category(&format!("{}/category/world", base_url))
        .await;
    assert_eq!(report.scraped_urls.len(), 1);
    assert!(report.skipped.is_empty());

    let store = coordinator.store();
    let article = store
        .lock()
        .unwrap()
        .get_by_url(&format!("{}/latest/1-pic", base_url))
        .unwrap();
    assert_eq!(article.image_path, None);
    assert!(!images_dir.path().join("missing.jpg").exists());
}

#[tokio::test]
async fn test_category_failure_returns_empty_report() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let images_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/category/world"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&images_dir);
    let coordinator = create_coordinator(&config);
    let category = format!("{}/category/world", base_url);

    let report = coordinator.crawl_category(&category).await;
    assert!(report.scraped_urls.is_empty());
    assert!(report.skipped.is_empty());
    assert_eq!(count_articles(&coordinator), 0);

    let result = coordinator.try_crawl_category(&category).await;
    assert!(matches!(
        result,
        Err(PressError::Fetch(FetchError::Status { status: 503, .. }))
    ));
}

#[tokio::test]
async fn test_listing_link_filtering() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let images_dir = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/category/world",
        listing_html(&[
            "/latest/1-a",
            "/category/sports",
            "/latest/2-b",
            "/about",
            "/latest/3-c",
            "/latest/1-a",
        ]),
    )
    .await;
    for route in ["/latest/1-a", "/latest/2-b", "/latest/3-c"] {
        mount_html(
            &mock_server,
            route,
            article_html("Story", "March 05, 2024", &[], None),
        )
        .await;
    }
    for route in ["/category/sports", "/about"] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(&images_dir);
    let coordinator = create_coordinator(&config);

    let report = coordinator
        .crawl_category(&format!("{}/category/world", base_url))
        .await;

    assert_eq!(report.discovered, 3);
    assert_eq!(report.scraped_urls.len(), 3);
}

#[tokio::test]
async fn test_fetch_by_url_round_trip() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let images_dir = TempDir::new().unwrap();

    mount_html(&mock_server, "/category/world", listing_html(&["/latest/9-round"])).await;
    mount_html(
        &mock_server,
        "/latest/9-round",
        article_html(
            "Test Headline",
            "March 05, 2024",
            &["Hello.", "World."],
            Some(&format!("{}/img/pic.jpg", base_url)),
        ),
    )
    .await;
    mount_image(&mock_server, "/img/pic.jpg", vec![1, 2, 3, 4]).await;

    let config = create_test_config(&images_dir);
    let coordinator = create_coordinator(&config);

    coordinator
        .crawl_category(&format!("{}/category/world", base_url))
        .await;

    let store = coordinator.store();
    let store = store.lock().unwrap();
    let article = lookup_article(&*store, &format!("{}/latest/9-round#top", base_url)).unwrap();
    let view = ArticleView::from_article(&article, &config.images.route);

    assert_eq!(view.title, "Test Headline");
    assert_eq!(view.date, "2024-03-05");
    assert_eq!(view.text, "Hello.\nWorld.");
    assert_eq!(view.image_path.as_deref(), Some("/images/pic.jpg"));
}

#[tokio::test]
async fn test_concurrent_crawlers_do_not_duplicate() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let images_dir = TempDir::new().unwrap();

    mount_html(
        &mock_server,
        "/category/world",
        listing_html(&["/latest/1-a", "/latest/2-b"]),
    )
    .await;
    for route in ["/latest/1-a", "/latest/2-b"] {
        mount_html(
            &mock_server,
            route,
            article_html("Shared", "March 05, 2024", &["X."], None),
        )
        .await;
    }

    let config = create_test_config(&images_dir);
    let shared = Arc::new(Mutex::new(
        SqliteStorage::new_in_memory("articles").expect("Failed to create store"),
    ));
    let first = Coordinator::with_shared_store(&config, Arc::clone(&shared)).unwrap();
    let second = Coordinator::with_shared_store(&config, Arc::clone(&shared)).unwrap();

    let category = format!("{}/category/world", base_url);
    let (a, b) = tokio::join!(
        first.crawl_category(&category),
        second.crawl_category(&category)
    );

    let mut all: Vec<String> = a.scraped_urls.into_iter().chain(b.scraped_urls).collect();
    all.sort();
    assert_eq!(
        all,
        vec![
            format!("{}/latest/1-a", base_url),
            format!("{}/latest/2-b", base_url),
        ]
    );
    assert_eq!(shared.lock().unwrap().count_articles().unwrap(), 2);
}

#[tokio::test]
async fn test_crawl_entry_point_persists_to_database_file() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let images_dir = TempDir::new().unwrap();
    let db_dir = TempDir::new().unwrap();

    mount_html(&mock_server, "/category/world", listing_html(&["/latest/1-disk"])).await;
    mount_html(
        &mock_server,
        "/latest/1-disk",
        article_html("On Disk", "March 05, 2024", &["Kept."], None),
    )
    .await;

    let mut config = create_test_config(&images_dir);
    config.storage.database_path = db_dir
        .path()
        .join("nested/articles.db")
        .to_string_lossy()
        .into_owned();

    let report = crawl(&config, &format!("{}/category/world", base_url))
        .await
        .unwrap();
    assert_eq!(report.scraped_count(), 1);

    // A fresh connection sees the committed article
    let storage = open_storage(&config.storage).unwrap();
    assert_eq!(storage.count_articles().unwrap(), 1);
    let article = lookup_article(&storage, &format!("{}/latest/1-disk", base_url)).unwrap();
    assert_eq!(article.title, "On Disk");
}

#[tokio::test]
async fn test_requests_carry_configured_user_agent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let images_dir = TempDir::new().unwrap();

    // Only requests with the browser identity get a response
    Mock::given(method("GET"))
        .and(path("/category/world"))
        .and(header("user-agent", "Mozilla/5.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&["/latest/1-ua"])))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/latest/1-ua"))
        .and(header("user-agent", "Mozilla/5.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_html(
            "Identified",
            "March 05, 2024",
            &["Text."],
            Some("/img/ua.jpg"),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/img/ua.jpg"))
        .and(header("user-agent", "Mozilla/5.0"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7, 7, 7]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&images_dir);
    assert_eq!(config.http.user_agent, "Mozilla/5.0");
    let coordinator = create_coordinator(&config);

    let report = coordinator
        .crawl_category(&format!("{}/category/world", base_url))
        .await;

    assert_eq!(report.scraped_urls, vec![format!("{}/latest/1-ua", base_url)]);
    assert_eq!(
        std::fs::read(images_dir.path().join("ua.jpg")).unwrap(),
        vec![7, 7, 7]
    );
}

#[tokio::test]
async fn test_stalled_listing_page_times_out() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let images_dir = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/category/world"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing_html(&["/latest/1-late"]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&images_dir);
    config.http.timeout_secs = 1;
    let coordinator = create_coordinator(&config);
    let category = format!("{}/category/world", base_url);

    let report = coordinator.crawl_category(&category).await;
    assert!(report.scraped_urls.is_empty());
    assert_eq!(report.discovered, 0);
    assert_eq!(count_articles(&coordinator), 0);

    let result = coordinator.try_crawl_category(&category).await;
    assert!(matches!(
        result,
        Err(PressError::Fetch(FetchError::Timeout { .. }))
    ));
}
