//! Integration tests for the crawler
//!
//! These tests use wiremock to serve listing pages and exercise the full
//! fetch → classify → extract → navigate cycle end-to-end with the HTTP
//! provider.

use koi_skimmer::config::{CrawlerConfig, FetchConfig, SelectorConfig};
use koi_skimmer::crawler::{Controller, Frontier, HttpProvider};
use koi_skimmer::extract::ExtractionProfile;
use koi_skimmer::output::{JsonlSink, MemorySink, Sink};
use koi_skimmer::Record;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test crawler configuration with short timeouts and backoff
fn test_crawler_config(max_pages: u32, max_concurrency: u32) -> CrawlerConfig {
    CrawlerConfig {
        max_pages,
        max_concurrency,
        request_timeout_seconds: 5,
        max_retries: 2,
        structure_wait_seconds: 0,
        retry_backoff_ms: 1,
        debug_mode: false,
    }
}

/// Builds a controller around the HTTP provider and a memory sink
fn build_controller(config: CrawlerConfig) -> (Arc<Controller>, Arc<MemorySink>) {
    let profile = ExtractionProfile::compile(&SelectorConfig::default()).unwrap();
    let frontier = Arc::new(Frontier::new(config.max_pages as usize));
    let provider = Arc::new(
        HttpProvider::new(&FetchConfig::default(), Duration::from_secs(5)).unwrap(),
    );
    let sink = Arc::new(MemorySink::new());
    let controller = Arc::new(Controller::new(
        config,
        profile,
        frontier,
        provider,
        Arc::clone(&sink) as Arc<dyn Sink>,
    ));
    (controller, sink)
}

/// Renders a listing page with the given item titles
///
/// `titleless_items` adds containers that carry a price but no title, so
/// they must be dropped by the extractor. `next_href` controls the
/// pagination link: `Some` renders an enabled control, `None` a disabled
/// one.
fn listing_page(titles: &[&str], titleless_items: usize, next_href: Option<&str>) -> String {
    let mut html = String::from("<html><body>");
    for (i, title) in titles.iter().enumerate() {
        html.push_str(&format!(
            r#"<div class="s-card-container" data-asin="B{:04}">
                <span class="a-size-medium">{}</span>
                <span class="a-price"><span class="a-offscreen">${}.99</span></span>
                <span class="a-icon-alt">4.{} out of 5 stars</span>
            </div>"#,
            i, title, i, i
        ));
    }
    for _ in 0..titleless_items {
        html.push_str(
            r#"<div class="s-card-container">
                <span class="a-price"><span class="a-offscreen">$0.99</span></span>
            </div>"#,
        );
    }
    match next_href {
        Some(href) => html.push_str(&format!(
            r#"<a class="s-pagination-next" href="{}">Next</a>"#,
            href
        )),
        None => html.push_str(
            r##"<a class="s-pagination-next s-pagination-disabled" href="#">Next</a>"##,
        ),
    }
    html.push_str("</body></html>");
    html
}

/// A challenge interstitial with skeleton listing markup and a pagination
/// link that must never be followed
fn blocked_page() -> String {
    r#"<html><body>
        <form action="/errors/validateCaptcha"><input type="text" name="field-keywords"></form>
        <a class="s-pagination-next" href="/s?page=2">Next</a>
    </body></html>"#
        .to_string()
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_pagination_end_to_end() {
    let server = MockServer::start().await;

    // Page 1: 3 valid items, 1 titleless item, working next link
    mount_page(
        &server,
        "/s",
        listing_page(&["Alpha", "Beta", "Gamma"], 1, Some("/s2")),
    )
    .await;
    // Page 2: 2 valid items, disabled next control
    mount_page(&server, "/s2", listing_page(&["Delta", "Epsilon"], 0, None)).await;

    let (controller, sink) = build_controller(test_crawler_config(2, 1));
    controller
        .seed(&[format!("{}/s", server.uri())])
        .unwrap();

    let summary = Arc::clone(&controller).run().await.unwrap();

    // Exactly 5 valid records reach the sink, in any order
    assert_eq!(sink.len(), 5);
    let titles: Vec<_> = sink
        .records()
        .iter()
        .map(|r| r.title.clone().unwrap())
        .collect();
    for expected in ["Alpha", "Beta", "Gamma", "Delta", "Epsilon"] {
        assert!(titles.iter().any(|t| t == expected), "missing {}", expected);
    }

    // Exactly 2 pages fetched
    assert_eq!(summary.pages_visited, 2);
    assert_eq!(summary.records_dropped, 1);
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_budget_caps_fetched_pages() {
    let server = MockServer::start().await;

    // An endless chain: every page links onward
    mount_page(&server, "/p1", listing_page(&["One"], 0, Some("/p2"))).await;
    mount_page(&server, "/p2", listing_page(&["Two"], 0, Some("/p3"))).await;
    mount_page(&server, "/p3", listing_page(&["Three"], 0, Some("/p4"))).await;

    let (controller, sink) = build_controller(test_crawler_config(2, 1));
    controller
        .seed(&[format!("{}/p1", server.uri())])
        .unwrap();

    let summary = Arc::clone(&controller).run().await.unwrap();

    assert_eq!(summary.pages_visited, 2);
    assert_eq!(sink.len(), 2);
    let requests = server.received_requests().await.unwrap();
    assert!(
        requests.len() <= 2,
        "fetched {} pages with a budget of 2",
        requests.len()
    );
}

#[tokio::test]
async fn test_blocked_seed_yields_nothing() {
    let server = MockServer::start().await;
    mount_page(&server, "/s", blocked_page()).await;

    let (controller, sink) = build_controller(test_crawler_config(5, 1));
    controller
        .seed(&[format!("{}/s", server.uri())])
        .unwrap();

    let summary = Arc::clone(&controller).run().await.unwrap();

    assert!(sink.is_empty());
    assert_eq!(summary.pages_blocked, 1);
    assert_eq!(summary.records_pushed, 0);

    // The frontier never grew beyond the seed: the pagination link inside
    // the interstitial was not followed
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_retry_exhaustion_isolated_to_one_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_page(&server, "/healthy", listing_page(&["Survivor"], 0, None)).await;

    let (controller, sink) = build_controller(test_crawler_config(5, 1));
    controller
        .seed(&[
            format!("{}/broken", server.uri()),
            format!("{}/healthy", server.uri()),
        ])
        .unwrap();

    let summary = Arc::clone(&controller).run().await.unwrap();

    // The broken seed used its whole retry budget: 1 attempt + 2 retries
    let requests = server.received_requests().await.unwrap();
    let broken_hits = requests
        .iter()
        .filter(|r| r.url.path() == "/broken")
        .count();
    assert_eq!(broken_hits, 3);

    // ...and the healthy seed still completed
    assert_eq!(summary.pages_failed, 1);
    assert_eq!(summary.pages_normal, 1);
    assert_eq!(sink.len(), 1);
    assert_eq!(sink.records()[0].title.as_deref(), Some("Survivor"));
}

#[tokio::test]
async fn test_three_seeds_two_workers() {
    let server = MockServer::start().await;
    mount_page(&server, "/list1", listing_page(&["A"], 0, None)).await;
    mount_page(&server, "/list2", listing_page(&["B"], 0, None)).await;
    mount_page(&server, "/list3", listing_page(&["C"], 0, None)).await;

    let (controller, sink) = build_controller(test_crawler_config(5, 2));
    controller
        .seed(&[
            format!("{}/list1", server.uri()),
            format!("{}/list2", server.uri()),
            format!("{}/list3", server.uri()),
        ])
        .unwrap();

    let summary = Arc::clone(&controller).run().await.unwrap();

    // Exactly 3 fetch cycles, all complete, no URL processed twice
    assert_eq!(summary.pages_visited, 3);
    assert_eq!(sink.len(), 3);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    let mut paths: Vec<_> = requests.iter().map(|r| r.url.path().to_string()).collect();
    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), 3);
}

#[tokio::test]
async fn test_seed_deduplication() {
    let server = MockServer::start().await;
    mount_page(&server, "/s", listing_page(&["Once"], 0, None)).await;

    let (controller, sink) = build_controller(test_crawler_config(5, 2));
    let seeded = controller
        .seed(&[
            format!("{}/s", server.uri()),
            format!("{}/s#fragment", server.uri()),
        ])
        .unwrap();

    assert_eq!(seeded, 1);
    let summary = Arc::clone(&controller).run().await.unwrap();

    assert_eq!(summary.pages_visited, 1);
    assert_eq!(sink.len(), 1);
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_records_stream_to_jsonl_sink() {
    let server = MockServer::start().await;
    mount_page(&server, "/s", listing_page(&["Alpha", "Beta"], 0, None)).await;

    let dir = tempfile::tempdir().unwrap();
    let records_path = dir.path().join("records.jsonl");

    let profile = ExtractionProfile::compile(&SelectorConfig::default()).unwrap();
    let config = test_crawler_config(2, 1);
    let frontier = Arc::new(Frontier::new(config.max_pages as usize));
    let provider = Arc::new(
        HttpProvider::new(&FetchConfig::default(), Duration::from_secs(5)).unwrap(),
    );
    let sink = Arc::new(JsonlSink::new(&records_path).unwrap());
    let controller = Arc::new(Controller::new(
        config,
        profile,
        frontier,
        provider,
        sink as Arc<dyn Sink>,
    ));

    controller
        .seed(&[format!("{}/s", server.uri())])
        .unwrap();
    Arc::clone(&controller).run().await.unwrap();

    let content = std::fs::read_to_string(&records_path).unwrap();
    let records: Vec<Record> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.is_valid()));
    assert!(records.iter().all(|r| r.price.is_some()));
}

#[tokio::test]
async fn test_empty_seed_retries_then_completes() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/s",
        "<html><body><p>No results match your search.</p></body></html>".to_string(),
    )
    .await;

    let (controller, sink) = build_controller(test_crawler_config(5, 1));
    controller
        .seed(&[format!("{}/s", server.uri())])
        .unwrap();

    let summary = Arc::clone(&controller).run().await.unwrap();

    // Retried up to the budget, then settled as a terminal empty result
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
    assert_eq!(summary.pages_empty, 1);
    assert_eq!(summary.pages_failed, 0);
    assert!(sink.is_empty());
}
