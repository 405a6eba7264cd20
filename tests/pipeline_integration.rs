//! Integration tests for the two-pass harvest.

mod support;

use std::sync::atomic::Ordering;
use std::time::Duration;

use support::fakes::{FnExtractor, TrackingSource, echo_extractor};
use support::pages::{Row, listing_html, record_html};
use support::socket_guard::start_mock_server_or_skip;
use undl_core::http_client::{HttpTimeouts, build_http_client};
use undl_core::pdf::{ExtractError, SnippetExtractor};
use undl_core::pipeline::{HarvestError, HarvestSettings, Harvester, OrderingPolicy};
use undl_core::record::{FailureKind, Snippet};
use undl_core::resolver::{LanguagePreference, RecordResolver};
use undl_core::source::HttpDocumentSource;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn tracked_source() -> (
    TrackingSource<HttpDocumentSource>,
    std::sync::Arc<std::sync::atomic::AtomicBool>,
) {
    let client = build_http_client(HttpTimeouts::default()).unwrap();
    TrackingSource::new(HttpDocumentSource::new(client, Duration::from_secs(5)))
}

fn harvester(
    server: &MockServer,
    ordering: OrderingPolicy,
    extractor: Box<dyn SnippetExtractor>,
) -> Harvester {
    let settings = HarvestSettings {
        ordering,
        ..HarvestSettings::new(format!("{}/search", server.uri()), Duration::from_secs(5))
    };
    let resolver = RecordResolver::new(LanguagePreference::english(), Duration::from_secs(2));
    Harvester::new(settings, resolver, extractor)
}

async fn mount_html(server: &MockServer, at: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(html))
        .mount(server)
        .await;
}

/// Three rows; the second has no brief-options block.
async fn mount_three_row_listing(server: &MockServer) {
    mount_html(
        server,
        "/search",
        listing_html(&[
            Row::new("Row one", "/record/1", "A/RES/1 | 2024-01-01 | Resolutions"),
            Row::without_brief("Row two", "/record/2"),
            Row::new("Row three", "/record/3", "A/RES/3 | 2024-03-03 | Resolutions"),
        ]),
    )
    .await;
    mount_html(server, "/record/1", record_html(&["/files/r1-FR.pdf", "/files/r1-EN.pdf"])).await;
    mount_html(server, "/record/3", record_html(&["/files/r3-EN.pdf"])).await;
}

#[tokio::test]
async fn test_failed_rows_come_first_by_default() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_three_row_listing(&server).await;

    let (source, closed) = tracked_source();
    let report = harvester(&server, OrderingPolicy::FailuresFirst, Box::new(echo_extractor()))
        .run(Box::new(source))
        .await
        .unwrap();

    assert!(closed.load(Ordering::SeqCst), "source must be closed");
    assert_eq!(report.records.len(), 3, "one record per row");

    let failed = &report.records[0];
    assert_eq!(failed.snippet().failure_kind(), Some(FailureKind::RowMetadata));
    assert!(failed.extracted_text_snippet().starts_with("[Error: "));
    assert_eq!(failed.title(), "");
    assert_eq!(failed.document_symbol(), "");
    assert_eq!(failed.date(), "");
    assert_eq!(failed.pdf_url(), "");

    let first = &report.records[1];
    assert_eq!(first.title(), "Row one");
    assert_eq!(first.document_symbol(), "A/RES/1");
    assert_eq!(first.date(), "2024-01-01");
    assert_eq!(first.pdf_url(), format!("{}/files/r1-EN.pdf", server.uri()));
    assert_eq!(first.extracted_text_snippet(), "text of r1-EN.pdf");

    assert_eq!(report.records[2].title(), "Row three");
    assert_eq!(report.summary.total, 3);
    assert_eq!(report.summary.with_text, 2);
    assert_eq!(report.summary.without_text(), 1);
}

#[tokio::test]
async fn test_discovery_ordering_keeps_listing_order() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_three_row_listing(&server).await;

    let (source, _closed) = tracked_source();
    let report = harvester(&server, OrderingPolicy::Discovery, Box::new(echo_extractor()))
        .run(Box::new(source))
        .await
        .unwrap();

    let snippets: Vec<String> = report
        .records
        .iter()
        .map(|r| r.extracted_text_snippet())
        .collect();
    assert_eq!(snippets[0], "text of r1-EN.pdf");
    assert!(snippets[1].starts_with("[Error: "), "got: {}", snippets[1]);
    assert_eq!(snippets[2], "text of r3-EN.pdf");
}

#[tokio::test]
async fn test_record_without_pdf_is_not_extracted() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_html(
        &server,
        "/search",
        listing_html(&[Row::new("Draft", "/record/8", "A/C.3/78/L.1 | 2023-10-10 | Drafts")]),
    )
    .await;
    mount_html(&server, "/record/8", record_html(&[])).await;

    let (extractor, calls) = FnExtractor::new(|_url: &str| Ok(Snippet::extracted("never", false)));
    let (source, _closed) = tracked_source();
    let report = harvester(&server, OrderingPolicy::FailuresFirst, Box::new(extractor))
        .run(Box::new(source))
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0, "no PDF means no extraction");
    let record = &report.records[0];
    assert_eq!(record.pdf_url(), "");
    assert_eq!(record.extracted_text_snippet(), "[No PDF available]");
    assert_eq!(record.document_symbol(), "A/C.3/78/L.1");
}

#[tokio::test]
async fn test_extractor_error_is_isolated_to_its_record() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_html(
        &server,
        "/search",
        listing_html(&[
            Row::new("Bad", "/record/1", "A/RES/1 | 2024 | Resolutions"),
            Row::new("Good", "/record/2", "A/RES/2 | 2024 | Resolutions"),
        ]),
    )
    .await;
    mount_html(&server, "/record/1", record_html(&["/files/bad-EN.pdf"])).await;
    mount_html(&server, "/record/2", record_html(&["/files/good-EN.pdf"])).await;

    let (extractor, calls) = FnExtractor::new(|url: &str| {
        if url.ends_with("bad-EN.pdf") {
            Err(ExtractError::Panicked {
                url: url.to_string(),
            })
        } else {
            Ok(Snippet::extracted("fine", false))
        }
    });
    let (source, _closed) = tracked_source();
    let report = harvester(&server, OrderingPolicy::FailuresFirst, Box::new(extractor))
        .run(Box::new(source))
        .await
        .unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    let bad = &report.records[0];
    assert_eq!(bad.snippet().failure_kind(), Some(FailureKind::UnexpectedItem));
    let rendered = bad.extracted_text_snippet();
    assert!(rendered.starts_with("[Error: PDF backend panicked"), "got: {rendered}");
    assert_eq!(rendered.chars().count(), "[Error: ]".len() + 50);
    assert_eq!(report.records[1].extracted_text_snippet(), "fine");
}

#[tokio::test]
async fn test_unreachable_record_page_yields_no_pdf() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_html(
        &server,
        "/search",
        listing_html(&[Row::new("Gone", "/record/404", "A/RES/4 | 2024 | Resolutions")]),
    )
    .await;

    let (source, _closed) = tracked_source();
    let report = harvester(&server, OrderingPolicy::FailuresFirst, Box::new(echo_extractor()))
        .run(Box::new(source))
        .await
        .unwrap();
    assert_eq!(report.records[0].extracted_text_snippet(), "[No PDF available]");
}

#[tokio::test]
async fn test_listing_failure_is_fatal_and_closes_source() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let (source, closed) = tracked_source();
    let result = harvester(&server, OrderingPolicy::FailuresFirst, Box::new(echo_extractor()))
        .run(Box::new(source))
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, HarvestError::ListingLoad { .. }), "got: {err}");
    assert!(closed.load(Ordering::SeqCst), "source must be closed on error");
}

#[tokio::test]
async fn test_listing_without_rows_is_fatal() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_html(&server, "/search", listing_html(&[])).await;

    let (source, closed) = tracked_source();
    let result = harvester(&server, OrderingPolicy::FailuresFirst, Box::new(echo_extractor()))
        .run(Box::new(source))
        .await;

    assert!(matches!(result, Err(HarvestError::ListingLoad { .. })));
    assert!(closed.load(Ordering::SeqCst));
}
