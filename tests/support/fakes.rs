//! Test doubles for the source, extractor, PDF backend and OCR engine.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use undl_core::pdf::{ExtractError, OcrEngine, OcrError, PdfBackend, PdfPages, SnippetExtractor};
use undl_core::record::Snippet;
use undl_core::source::{DocumentSource, Element, Locator, SourceError};

/// Wraps a source and records whether it was closed.
pub struct TrackingSource<S> {
    inner: S,
    closed: Arc<AtomicBool>,
}

impl<S> TrackingSource<S> {
    pub fn new(inner: S) -> (Self, Arc<AtomicBool>) {
        let closed = Arc::new(AtomicBool::new(false));
        (
            Self {
                inner,
                closed: closed.clone(),
            },
            closed,
        )
    }
}

#[async_trait]
impl<S: DocumentSource> DocumentSource for TrackingSource<S> {
    fn name(&self) -> &str {
        "tracking"
    }

    fn default_timeout(&self) -> Duration {
        self.inner.default_timeout()
    }

    async fn load(&mut self, url: &str) -> Result<(), SourceError> {
        self.inner.load(url).await
    }

    async fn query(
        &mut self,
        locator: &Locator,
        scope: Option<&Element>,
        timeout: Option<Duration>,
    ) -> Result<Vec<Element>, SourceError> {
        self.inner.query(locator, scope, timeout).await
    }

    async fn wait_for_staleness(
        &mut self,
        element: &Element,
        timeout: Option<Duration>,
    ) -> Result<(), SourceError> {
        self.inner.wait_for_staleness(element, timeout).await
    }

    async fn close(&mut self) -> Result<(), SourceError> {
        self.closed.store(true, Ordering::SeqCst);
        self.inner.close().await
    }
}

/// Extractor answering from a closure and counting calls.
pub struct FnExtractor<F> {
    respond: F,
    calls: Arc<AtomicUsize>,
}

impl<F> FnExtractor<F>
where
    F: Fn(&str) -> Result<Snippet, ExtractError> + Send + Sync,
{
    pub fn new(respond: F) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                respond,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

#[async_trait]
impl<F> SnippetExtractor for FnExtractor<F>
where
    F: Fn(&str) -> Result<Snippet, ExtractError> + Send + Sync,
{
    async fn extract(&self, pdf_url: &str) -> Result<Snippet, ExtractError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.respond)(pdf_url)
    }
}

/// Extractor that returns the file name of the PDF URL as text.
pub fn echo_extractor() -> FnExtractor<impl Fn(&str) -> Result<Snippet, ExtractError> + Send + Sync>
{
    FnExtractor::new(|url: &str| {
        let name = url.rsplit('/').next().unwrap_or_default();
        Ok(Snippet::extracted(format!("text of {name}"), false))
    })
    .0
}

/// Backend that treats the bytes as UTF-8 text with pages separated by form feeds.
///
/// Bytes starting with `BROKEN` fail to open; bytes starting with `PANIC` panic.
pub struct TextBackend;

struct TextPages(Vec<String>);

impl PdfBackend for TextBackend {
    fn open(&self, bytes: &[u8]) -> Result<Box<dyn PdfPages>, ExtractError> {
        let text = String::from_utf8_lossy(bytes);
        assert!(!text.starts_with("PANIC"), "backend panicked on request");
        if text.starts_with("BROKEN") {
            return Err(ExtractError::Open("cannot tell if this is a PDF".to_string()));
        }
        if text.is_empty() {
            return Ok(Box::new(TextPages(Vec::new())));
        }
        Ok(Box::new(TextPages(
            text.split('\u{c}').map(str::to_string).collect(),
        )))
    }
}

impl PdfPages for TextPages {
    fn page_count(&self) -> Result<usize, ExtractError> {
        Ok(self.0.len())
    }

    fn page_text(&self, index: usize) -> Result<String, ExtractError> {
        self.0
            .get(index)
            .cloned()
            .ok_or_else(|| ExtractError::page(index, "out of range"))
    }

    fn render_page_png(&self, _index: usize, _dpi: u32) -> Result<Vec<u8>, ExtractError> {
        Ok(b"\x89PNG".to_vec())
    }
}

/// OCR engine returning a fixed text, or failing when `None`.
pub struct FixedOcr(pub Option<&'static str>);

impl OcrEngine for FixedOcr {
    fn recognize(&self, _png: &[u8]) -> Result<String, OcrError> {
        match self.0 {
            Some(text) => Ok(text.to_string()),
            None => Err(OcrError::Failed {
                program: "tesseract".to_string(),
                status: 1,
                stderr: "Error opening data file".to_string(),
            }),
        }
    }
}
