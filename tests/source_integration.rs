//! Integration tests for the HTTP document source against a mock server.

mod support;

use std::time::Duration;

use support::pages::{Row, listing_html, record_html};
use support::socket_guard::start_mock_server_or_skip;
use undl_core::BROWSER_USER_AGENT;
use undl_core::http_client::{HttpTimeouts, build_http_client};
use undl_core::source::{DocumentSource, HttpDocumentSource, Locator, SourceError};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn source(timeout: Duration) -> HttpDocumentSource {
    let client = build_http_client(HttpTimeouts::default()).unwrap();
    HttpDocumentSource::new(client, timeout)
}

#[tokio::test]
async fn test_load_and_query_listing_rows() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let html = listing_html(&[
        Row::new("First resolution", "/record/1?ln=en", "A/RES/1 | 2024-01-02 | Resolutions"),
        Row::new("Second resolution", "/record/2?ln=en", "A/RES/2 | 2024-01-03 | Resolutions"),
    ]);
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(header("user-agent", BROWSER_USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .expect(1)
        .mount(&server)
        .await;

    let mut source = source(Duration::from_secs(5));
    source.load(&format!("{}/search", server.uri())).await.unwrap();

    let rows = source
        .query(&Locator::css("div.result-row"), None, None)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    let link = source
        .query_one(&Locator::css("div.result-title a"), Some(&rows[1]), None)
        .await
        .unwrap();
    assert_eq!(link.text(), "Second resolution");
    assert_eq!(
        link.attribute("href"),
        Some(format!("{}/record/2?ln=en", server.uri()).as_str())
    );

    let brief = source
        .query_one(&Locator::css("div.brief-options"), Some(&rows[0]), None)
        .await
        .unwrap();
    assert_eq!(brief.text(), "A/RES/1 | 2024-01-02 | Resolutions");
}

#[tokio::test]
async fn test_load_http_error_status() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut source = source(Duration::from_secs(5));
    let err = source
        .load(&format!("{}/search", server.uri()))
        .await
        .unwrap_err();
    assert!(
        matches!(err, SourceError::HttpStatus { status: 503, .. }),
        "Expected HTTP 503, got: {err}"
    );

    let after = source.query(&Locator::css("a"), None, None).await;
    assert!(matches!(after, Err(SourceError::NoPage)), "failed load leaves no page");
}

#[tokio::test]
async fn test_load_times_out() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let mut source = source(Duration::from_millis(200));
    let err = source
        .load(&format!("{}/slow", server.uri()))
        .await
        .unwrap_err();
    assert!(err.is_timeout(), "Expected timeout, got: {err}");
}

#[tokio::test]
async fn test_navigation_makes_previous_elements_stale() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&[Row::new(
            "Only",
            "/record/1",
            "A/RES/1 | 2024 | Resolutions",
        )])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/record/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(record_html(&[
            "/record/1/files/A_RES_1-EN.pdf",
        ])))
        .mount(&server)
        .await;

    let mut source = source(Duration::from_secs(5));
    source.load(&format!("{}/search", server.uri())).await.unwrap();
    let row = source
        .query_one(&Locator::css("div.result-row"), None, None)
        .await
        .unwrap();

    source.load(&format!("{}/record/1", server.uri())).await.unwrap();
    source
        .wait_for_staleness(&row, Some(Duration::from_secs(1)))
        .await
        .unwrap();

    let scoped = source.query(&Locator::css("a"), Some(&row), None).await;
    assert!(matches!(scoped, Err(SourceError::StaleElement)));

    let pdfs = source
        .query(&Locator::css("a[href*='.pdf']"), None, None)
        .await
        .unwrap();
    assert_eq!(pdfs.len(), 1);
    assert!(pdfs[0].attribute("href").unwrap().ends_with("A_RES_1-EN.pdf"));
}

#[tokio::test]
async fn test_missing_elements_report_timeout() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(&[])))
        .mount(&server)
        .await;

    let mut source = source(Duration::from_secs(5));
    source.load(&format!("{}/empty", server.uri())).await.unwrap();
    let err = source
        .query(&Locator::css("div.result-row"), None, Some(Duration::from_secs(30)))
        .await
        .unwrap_err();
    assert!(err.is_timeout(), "Expected timeout, got: {err}");
}
