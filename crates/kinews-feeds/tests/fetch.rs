//! Integration tests for `FeedClient` using wiremock HTTP mocks.

use kinews_core::FeedSource;
use kinews_feeds::{FeedClient, FeedError};
use kinews_ranking::RawFeedEntry;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Test</title>
  <item><title>KI-Startup sammelt Geld ein</title><link>https://t.test/1</link></item>
  <item><title>Neue Robotik-Plattform</title><link>https://t.test/2</link></item>
</channel></rss>"#;

fn test_client() -> FeedClient {
    FeedClient::new(5, "kinews-test/0.1").expect("client construction should not fail")
}

fn source(name: &str, url: String, enabled: bool) -> FeedSource {
    FeedSource {
        name: name.to_string(),
        url,
        enabled,
        categories: vec![],
    }
}

async fn mount_feed(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/rss+xml")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetch_parses_entries_and_sends_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .and(header("user-agent", "kinews-test/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(FEED))
        .mount(&server)
        .await;

    let entries = test_client()
        .fetch(&format!("{}/feed", server.uri()))
        .await
        .expect("should parse feed");

    assert_eq!(entries.len(), 2);
    let RawFeedEntry::Rss(first) = &entries[0] else {
        panic!("expected RSS item");
    };
    assert_eq!(first.title.as_deref(), Some("KI-Startup sammelt Geld ein"));
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let url = format!("{}/gone", server.uri());
    let err = test_client().fetch(&url).await.unwrap_err();
    match err {
        FeedError::Status { status, url: failed } => {
            assert_eq!(status, 404);
            assert_eq!(failed, url);
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_an_xml_error() {
    let server = MockServer::start().await;
    mount_feed(&server, "/broken", "<rss><channel><item></channel>").await;

    let err = test_client()
        .fetch(&format!("{}/broken", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, FeedError::Xml(_)));
}

#[tokio::test]
async fn fetch_source_tags_entries_with_source_name() {
    let server = MockServer::start().await;
    mount_feed(&server, "/t3n", FEED).await;

    let entries = test_client()
        .fetch_source(&source("t3n", format!("{}/t3n", server.uri()), true))
        .await
        .expect("should fetch");
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.source_name == "t3n"));
}

#[tokio::test]
async fn collect_skips_failing_and_disabled_feeds() {
    let server = MockServer::start().await;
    mount_feed(&server, "/a", FEED).await;
    mount_feed(&server, "/disabled", FEED).await;
    Mock::given(method("GET"))
        .and(path("/down"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let sources = vec![
        source("Down", format!("{}/down", server.uri()), true),
        source("A", format!("{}/a", server.uri()), true),
        source("Off", format!("{}/disabled", server.uri()), false),
    ];

    let entries = test_client().collect(&sources).await;
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.source_name == "A"));
}

#[tokio::test]
async fn collect_with_all_feeds_failing_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let sources = vec![source("X", format!("{}/x", server.uri()), true)];
    assert!(test_client().collect(&sources).await.is_empty());
}
