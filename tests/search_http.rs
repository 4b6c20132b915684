//! Integration tests for the HTTP fetcher and the controller running on top
//! of it, using a wiremock server in place of the posts API.

use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use searchbox::app::search_lines;
use searchbox::search::{
    FetchError, HttpSearchFetcher, SearchController, SearchFetcher, FETCH_FAILED_MESSAGE,
};

fn posts(titles: &[&str]) -> serde_json::Value {
    json!(titles
        .iter()
        .enumerate()
        .map(|(i, t)| json!({
            "userId": 1,
            "id": i + 1,
            "title": t,
            "body": format!("{t} body")
        }))
        .collect::<Vec<_>>())
}

async fn mount_posts(server: &MockServer, query: &str, titles: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("q", query))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts(titles)))
        .mount(server)
        .await;
}

async fn settle(controller: &SearchController) -> searchbox::search::SearchSnapshot {
    let mut rx = controller.subscribe();
    timeout(Duration::from_secs(5), async {
        while rx.borrow_and_update().is_loading {
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("controller did not settle");
    controller.snapshot()
}

// ============================================================================
// Fetcher
// ============================================================================

#[tokio::test]
async fn fetcher_parses_posts() {
    let server = MockServer::start().await;
    mount_posts(&server, "rust", &["rust post", "more rust"]).await;

    let fetcher = HttpSearchFetcher::new(&server.uri()).unwrap();
    let items = fetcher
        .fetch("rust", CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].id, 1);
    assert_eq!(items[0].title, "rust post");
    assert_eq!(items[1].body, "more rust body");
}

#[tokio::test]
async fn fetcher_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let fetcher = HttpSearchFetcher::new(&server.uri()).unwrap();
    let err = fetcher
        .fetch("rust", CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(err, FetchError::Status(503));
}

#[tokio::test]
async fn fetcher_reports_bad_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let fetcher = HttpSearchFetcher::new(&server.uri()).unwrap();
    let err = fetcher
        .fetch("rust", CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn fetcher_stops_on_cancel() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(posts(&["late"]))
                .set_delay(Duration::from_secs(10)),
        )
        .mount(&server)
        .await;

    let fetcher = HttpSearchFetcher::new(&server.uri()).unwrap();
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let err = timeout(Duration::from_secs(5), fetcher.fetch("late", token))
        .await
        .expect("fetch ignored cancellation")
        .unwrap_err();
    assert_eq!(err, FetchError::Cancelled);
}

// ============================================================================
// Controller over HTTP
// ============================================================================

#[tokio::test]
async fn typed_burst_sends_single_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("q", "rust"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts(&["rust post"])))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = Arc::new(HttpSearchFetcher::new(&server.uri()).unwrap());
    let mut out = Vec::new();
    search_lines(
        fetcher,
        Duration::from_millis(100),
        &b"r\nru\nrus\nrust\n"[..],
        &mut out,
    )
    .await
    .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("1. rust post"), "{text}");

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
}

#[tokio::test]
async fn server_error_surfaces_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let fetcher = HttpSearchFetcher::new(&server.uri()).unwrap();
    let controller = SearchController::spawn(fetcher, Duration::from_millis(20));

    controller.set_query("rust").await;
    let snap = settle(&controller).await;

    assert_eq!(snap.error.as_deref(), Some(FETCH_FAILED_MESSAGE));
    assert!(snap.results.is_empty());
}

#[tokio::test]
async fn slow_response_is_superseded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("q", "slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(posts(&["stale"]))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;
    mount_posts(&server, "fast", &["fresh"]).await;

    let fetcher = HttpSearchFetcher::new(&server.uri()).unwrap();
    let controller = SearchController::spawn(fetcher, Duration::from_millis(20));

    controller.set_query("slow").await;
    tokio::time::sleep(Duration::from_millis(150)).await;
    controller.set_query("fast").await;
    let snap = settle(&controller).await;
    assert_eq!(snap.results[0].title, "fresh");

    tokio::time::sleep(Duration::from_millis(600)).await;
    let snap = controller.snapshot();
    assert_eq!(snap.results.len(), 1);
    assert_eq!(snap.results[0].title, "fresh");
    assert_eq!(snap.query, "fast");
}
