//! End-to-end `Toolkit` tests: real `ContentFetcher` against `wiremock`,
//! in-memory store.

use std::time::Duration;

use pagesense_db::ResultStore;
use pagesense_pipeline::{ToolResponse, Toolkit};
use pagesense_scraper::ContentFetcher;
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn test_toolkit() -> Toolkit {
    let fetcher = ContentFetcher::new(Duration::from_secs(5), "pagesense-test/0.1", 5000)
        .expect("failed to build test ContentFetcher");
    let store = ResultStore::open_in_memory().await.unwrap();
    Toolkit::new(fetcher, store, Duration::ZERO)
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html")
}

async fn mount_page(server: &MockServer, route: &str, title: &str, text: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(&format!(
            "<html><head><title>{title}</title></head>\n<body><p>{text}</p></body></html>"
        )))
        .mount(server)
        .await;
}

fn to_json<T: serde::Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap()
}

// ---------------------------------------------------------------------------
// scrape_and_analyze / batch_analyze_urls
// ---------------------------------------------------------------------------

#[tokio::test]
async fn scrape_and_analyze_persists_page_and_analysis() {
    let server = MockServer::start().await;
    mount_page(&server, "/happy", "Happy", "An excellent and wonderful day.").await;
    let toolkit = test_toolkit().await;
    let url = format!("{}/happy", server.uri());

    let json = to_json(&toolkit.scrape_and_analyze(&url).await);

    assert_eq!(json["success"], true);
    assert_eq!(json["title"], "Happy");
    assert_eq!(json["sentiment"]["label"], "positive");
    assert_eq!(json["sentiment"]["method"], "simple");
    // "Happy " from the title plus the 31-char paragraph.
    assert_eq!(json["content_length"], 37);
    assert_eq!(toolkit.store().count_analyses().await.unwrap(), 1);
}

#[tokio::test]
async fn scrape_and_analyze_reports_http_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let toolkit = test_toolkit().await;

    let json = to_json(&toolkit.scrape_and_analyze(&server.uri()).await);
    assert_eq!(json["success"], false);
    assert_eq!(json["stage"], "scraping");
    assert_eq!(toolkit.store().count_pages().await.unwrap(), 0);
}

#[tokio::test]
async fn batch_analyze_urls_wraps_batch_result() {
    let server = MockServer::start().await;
    mount_page(&server, "/ok", "Ok", "fine content").await;
    let toolkit = test_toolkit().await;

    let urls = vec![
        format!("{}/ok", server.uri()),
        format!("{}/missing", server.uri()),
    ];
    let json = to_json(&toolkit.batch_analyze_urls(&urls).await);

    assert_eq!(json["success"], true);
    assert_eq!(json["total_urls"], 2);
    assert_eq!(json["successful"], 1);
    assert_eq!(json["failed"], 1);
    assert_eq!(json["results"][1]["url"], urls[1]);
}

// ---------------------------------------------------------------------------
// Query operations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn history_and_sentiment_search_after_scrapes() {
    let server = MockServer::start().await;
    mount_page(&server, "/good", "Good", "good great best").await;
    mount_page(&server, "/bad", "Bad", "terrible awful worst").await;
    let toolkit = test_toolkit().await;

    toolkit
        .scrape_and_analyze(&format!("{}/good", server.uri()))
        .await;
    toolkit
        .scrape_and_analyze(&format!("{}/bad", server.uri()))
        .await;

    let history = to_json(&toolkit.get_analysis_history(None).await);
    assert_eq!(history["success"], true);
    assert_eq!(history["count"], 2);
    assert_eq!(history["history"][0]["title"], "Bad");

    let limited = to_json(&toolkit.get_analysis_history(Some(1)).await);
    assert_eq!(limited["count"], 1);

    let negatives = to_json(&toolkit.search_by_sentiment("negative").await);
    assert_eq!(negatives["success"], true);
    assert_eq!(negatives["sentiment_label"], "negative");
    assert_eq!(negatives["count"], 1);
    assert_eq!(negatives["results"][0]["title"], "Bad");
}

#[tokio::test]
async fn search_by_sentiment_rejects_unknown_label() {
    let toolkit = test_toolkit().await;
    let response = toolkit.search_by_sentiment("ecstatic").await;

    assert!(!response.is_success());
    let json = to_json(&response);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("ecstatic"));
}

#[tokio::test]
async fn search_by_sentiment_accepts_mixed_case() {
    let toolkit = test_toolkit().await;
    let response = toolkit.search_by_sentiment(" Neutral ").await;
    let body = response.ok().expect("label should parse");
    assert_eq!(body.count, 0);
}

#[tokio::test]
async fn keyword_analysis_uses_default_min_frequency() {
    let server = MockServer::start().await;
    mount_page(&server, "/k", "K", "compiler compiler borrow checker").await;
    let toolkit = test_toolkit().await;
    toolkit
        .scrape_and_analyze(&format!("{}/k", server.uri()))
        .await;

    let json = to_json(&toolkit.get_keyword_analysis(None).await);
    assert_eq!(json["success"], true);
    assert_eq!(json["analyzed_documents"], 1);
    assert_eq!(json["top_keywords"][0]["word"], "compiler");
    assert_eq!(json["top_keywords"][0]["total_count"], 2);
}

#[tokio::test]
async fn summary_report_shape() {
    let toolkit = test_toolkit().await;
    let json = to_json(&toolkit.generate_summary_report().await);

    assert_eq!(json["success"], true);
    assert_eq!(json["summary"]["total_analyses"], 0);
    assert_eq!(json["summary"]["recent_analyses_7days"], 0);
    assert!(json["summary"]["sentiment_distribution"].is_object());
    assert!(json["generated_at"].is_string());
}

#[tokio::test]
async fn query_on_closed_store_is_error_response() {
    let toolkit = test_toolkit().await;
    toolkit.store().pool().close().await;

    let response = toolkit.get_analysis_history(Some(5)).await;
    assert!(matches!(response, ToolResponse::Err { .. }));
    assert_eq!(to_json(&response)["success"], false);
}

// ---------------------------------------------------------------------------
// analyze_rss_feed / extract_links
// ---------------------------------------------------------------------------

#[tokio::test]
async fn analyze_rss_feed_runs_pipeline_on_entries() {
    let server = MockServer::start().await;
    let feed = format!(
        r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>Mock Feed</title><link>{uri}</link><description>d</description>
  <item><title>One</title><link>{uri}/p1</link></item>
  <item><title>Two</title><link>{uri}/p2</link></item>
</channel></rss>"#,
        uri = server.uri()
    );
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(feed.into_bytes(), "application/rss+xml"),
        )
        .mount(&server)
        .await;
    mount_page(&server, "/p1", "P1", "amazing post").await;
    mount_page(&server, "/p2", "P2", "poor post").await;
    let toolkit = test_toolkit().await;

    let json = to_json(
        &toolkit
            .analyze_rss_feed(&format!("{}/feed.xml", server.uri()), None)
            .await,
    );

    assert_eq!(json["success"], true);
    assert_eq!(json["feed_title"], "Mock Feed");
    assert_eq!(json["analyzed_items"], 2);
    assert_eq!(json["results"][0]["rss_title"], "One");
    assert_eq!(json["results"][0]["success"], true);
    assert_eq!(json["results"][1]["sentiment"]["label"], "negative");
}

#[tokio::test]
async fn analyze_rss_feed_reports_unreachable_feed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let toolkit = test_toolkit().await;

    let json = to_json(&toolkit.analyze_rss_feed(&server.uri(), Some(3)).await);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("404"));
}

#[tokio::test]
async fn extract_links_response_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/index"))
        .respond_with(html(
            r#"<a href="/a">a</a><a href="https://elsewhere.example/b">b</a><a href="/a">dup</a>"#,
        ))
        .mount(&server)
        .await;
    let toolkit = test_toolkit().await;
    let url = format!("{}/index", server.uri());

    let json = to_json(&toolkit.extract_links(&url, None).await);
    assert_eq!(json["success"], true);
    assert_eq!(json["url"], url);
    assert_eq!(json["count"], 2);
    assert_eq!(json["links"][1], "https://elsewhere.example/b");
}

#[tokio::test]
async fn extract_links_failure_is_error_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let toolkit = test_toolkit().await;

    let json = to_json(&toolkit.extract_links(&server.uri(), None).await);
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().starts_with("HTTP Error"));
}
