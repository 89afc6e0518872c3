//! Integration tests for `SearchClient::collect_listings`.
//!
//! Each test stands up a `wiremock` server that serves canned results pages
//! so no real network traffic is made.

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shelfwatch_scraper::{CollectOptions, ScraperError, SearchClient, StopReason};

fn test_client(server: &MockServer) -> SearchClient {
    SearchClient::new(
        &format!("{}/s", server.uri()),
        "data engineering books",
        5,
        "shelfwatch-test/0.1",
        0,
        0,
    )
    .expect("failed to build test SearchClient")
}

fn options(max_pages: u32, target_items: usize) -> CollectOptions {
    CollectOptions {
        max_pages,
        target_items,
        page_delay_secs: 0..=0,
    }
}

fn result_item(title: &str) -> String {
    format!(
        r#"<div class="s-result-item">
  <h2><span class="a-size-medium a-text-normal">{title}</span></h2>
  <a class="a-size-base a-link-normal">Jane Author</a>
  <span class="a-icon-alt">4.5 out of 5 stars</span>
  <span class="a-price-whole">30.</span>
</div>"#
    )
}

fn results_page(titles: &[&str]) -> String {
    let items: String = titles.iter().map(|t| result_item(t)).collect();
    format!("<html><body><div class=\"s-main-slot\">{items}</div></body></html>")
}

async fn mount_page(server: &MockServer, page: u32, body: String) {
    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn sends_search_terms_and_browser_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("k", "data engineering books"))
        .and(query_param("page", "1"))
        .and(header("user-agent", "shelfwatch-test/0.1"))
        .and(header("sec-ch-ua-platform", "macOS"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&["Book A"])))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = test_client(&server)
        .collect_listings(&options(1, 100))
        .await;

    assert_eq!(outcome.listings.len(), 1);
    assert_eq!(outcome.listings[0].title, "Book A");
    assert_eq!(outcome.stop_reason, StopReason::PageCap);
}

#[tokio::test]
async fn collects_across_pages_and_drops_repeated_titles() {
    let server = MockServer::start().await;
    mount_page(&server, 1, results_page(&["Book A", "Book B"])).await;
    mount_page(&server, 2, results_page(&["Book B", "Book C"])).await;

    let outcome = test_client(&server)
        .collect_listings(&options(2, 100))
        .await;

    let titles: Vec<&str> = outcome.listings.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, ["Book A", "Book B", "Book C"]);
    assert_eq!(outcome.duplicates_dropped, 1);
    assert_eq!(outcome.pages_fetched, 2);
    assert_eq!(outcome.containers_seen, 4);
}

#[tokio::test]
async fn failed_page_keeps_listings_from_earlier_pages() {
    let server = MockServer::start().await;
    mount_page(&server, 1, results_page(&["Book A", "Book B"])).await;
    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let outcome = test_client(&server)
        .collect_listings(&options(3, 100))
        .await;

    assert_eq!(outcome.listings.len(), 2);
    assert_eq!(outcome.pages_fetched, 1);
    assert_eq!(outcome.stop_reason, StopReason::FetchFailed);
    assert!(
        matches!(
            outcome.fetch_error,
            Some(ScraperError::UnexpectedStatus { status: 503, .. })
        ),
        "expected a 503 fetch error, got: {:?}",
        outcome.fetch_error
    );
}

#[tokio::test]
async fn empty_results_page_ends_the_loop() {
    let server = MockServer::start().await;
    mount_page(&server, 1, results_page(&["Book A"])).await;
    mount_page(&server, 2, results_page(&[])).await;
    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&["Book Z"])))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = test_client(&server)
        .collect_listings(&options(3, 100))
        .await;

    assert_eq!(outcome.listings.len(), 1);
    assert_eq!(outcome.stop_reason, StopReason::NoResults);
    assert_eq!(outcome.pages_fetched, 2);
}

#[tokio::test]
async fn stops_at_target_item_count() {
    let server = MockServer::start().await;
    mount_page(&server, 1, results_page(&["Book A", "Book B", "Book C"])).await;
    Mock::given(method("GET"))
        .and(path("/s"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(&["Book D"])))
        .expect(0)
        .mount(&server)
        .await;

    let outcome = test_client(&server)
        .collect_listings(&options(3, 2))
        .await;

    let titles: Vec<&str> = outcome.listings.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, ["Book A", "Book B"]);
    assert_eq!(outcome.stop_reason, StopReason::TargetReached);
}

#[tokio::test]
async fn fetch_results_page_maps_non_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = test_client(&server).fetch_results_page(1).await;

    assert!(
        matches!(result, Err(ScraperError::UnexpectedStatus { status: 404, .. })),
        "expected UnexpectedStatus 404, got: {result:?}"
    );
}

#[tokio::test]
async fn retries_server_errors_when_enabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/s"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_page(&server, 1, results_page(&["Book A"])).await;

    let client = SearchClient::new(
        &format!("{}/s", server.uri()),
        "books",
        5,
        "shelfwatch-test/0.1",
        1,
        0,
    )
    .expect("failed to build test SearchClient");

    let body = client.fetch_results_page(1).await.expect("retry should succeed");
    assert!(body.contains("Book A"));
}
