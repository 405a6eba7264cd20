//! PDF snippet extraction.
//!
//! A snippet comes from the PDF text layer when there is one, and from OCR
//! of the first page otherwise. Every outcome is a [`Snippet`]; download,
//! parse and OCR problems become failure values on the record.

mod backend;
mod download;
mod error;
#[cfg(test)]
mod fixtures;
mod ocr;

pub use backend::{DEFAULT_RENDER_DPI, MupdfBackend, PdfBackend, PdfPages};
pub use download::PdfDownloader;
pub use error::{DownloadError, ExtractError, OcrError};
pub use ocr::{DEFAULT_OCR_LANGUAGE, OcrEngine, TesseractOcr};

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, instrument, warn};

use crate::record::{FailureKind, Snippet};

/// Default snippet length, in characters.
pub const DEFAULT_MAX_CHARS: usize = 500;

#[allow(clippy::expect_used)]
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

/// Collapses whitespace runs to one space and trims both ends.
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Returns the first `max_chars` characters of `text`.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Produces the snippet for a PDF URL.
///
/// `Err` is reserved for failures outside the normal failure kinds; the
/// caller records those as unexpected per-record errors.
#[async_trait]
pub trait SnippetExtractor: Send + Sync {
    async fn extract(&self, pdf_url: &str) -> Result<Snippet, ExtractError>;
}

/// Downloads a PDF and reads its text layer, falling back to OCR.
///
/// Parsing, rendering and OCR are blocking and run on the blocking pool.
pub struct PdfTextExtractor {
    downloader: PdfDownloader,
    reader: SnippetReader,
}

impl PdfTextExtractor {
    #[must_use]
    pub fn new(
        downloader: PdfDownloader,
        backend: Box<dyn PdfBackend>,
        ocr: Box<dyn OcrEngine>,
        max_chars: usize,
    ) -> Self {
        Self {
            downloader,
            reader: SnippetReader {
                backend: Arc::from(backend),
                ocr: Arc::from(ocr),
                max_chars,
                render_dpi: DEFAULT_RENDER_DPI,
            },
        }
    }

    /// Sets the resolution used to render pages for OCR.
    #[must_use]
    pub fn with_render_dpi(mut self, dpi: u32) -> Self {
        self.reader.render_dpi = dpi;
        self
    }

    /// Maximum snippet length in characters.
    #[must_use]
    pub fn max_chars(&self) -> usize {
        self.reader.max_chars
    }

    /// Builds the snippet from downloaded PDF bytes on the calling thread.
    ///
    /// Same bytes give the same snippet when the text layer is used.
    #[must_use]
    pub fn snippet_from_bytes(&self, bytes: &[u8]) -> Snippet {
        self.reader.snippet(bytes)
    }
}

#[async_trait]
impl SnippetExtractor for PdfTextExtractor {
    #[instrument(skip(self))]
    async fn extract(&self, pdf_url: &str) -> Result<Snippet, ExtractError> {
        let bytes = match self.downloader.fetch(pdf_url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "PDF download failed");
                return Ok(Snippet::failed(FailureKind::PdfDownload, e.to_string()));
            }
        };

        let reader = self.reader.clone();
        match tokio::task::spawn_blocking(move || reader.snippet(&bytes)).await {
            Ok(snippet) => Ok(snippet),
            Err(e) if e.is_panic() => Err(ExtractError::Panicked {
                url: pdf_url.to_string(),
            }),
            Err(e) => Err(ExtractError::Interrupted {
                url: pdf_url.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

/// Blocking half of the extractor: text layer, then OCR of the first page.
#[derive(Clone)]
struct SnippetReader {
    backend: Arc<dyn PdfBackend>,
    ocr: Arc<dyn OcrEngine>,
    max_chars: usize,
    render_dpi: u32,
}

impl SnippetReader {
    fn snippet(&self, bytes: &[u8]) -> Snippet {
        match self.text_layer(bytes) {
            Ok(text) if !text.is_empty() => {
                Snippet::extracted(truncate_chars(&text, self.max_chars), false)
            }
            Ok(_) => self.ocr_first_page(bytes),
            Err(e) => {
                warn!(error = %e, "PDF could not be parsed");
                Snippet::failed(FailureKind::PdfParse, e.to_string())
            }
        }
    }

    fn text_layer(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        let document = self.backend.open(bytes)?;
        let pages = document.page_count()?;

        let mut text = String::new();
        let mut chars = 0;
        for index in 0..pages {
            let page = document.page_text(index)?;
            chars += page.chars().count();
            text.push_str(&page);
            if chars >= self.max_chars {
                break;
            }
        }
        debug!(pages, chars, "Read text layer");
        Ok(normalize_whitespace(&text))
    }

    fn ocr_first_page(&self, bytes: &[u8]) -> Snippet {
        debug!("No text layer, running OCR on first page");
        match self.recognize_first_page(bytes) {
            Ok(text) if text.is_empty() => {
                warn!("OCR found no text on first page");
                Snippet::failed(FailureKind::NoText, "")
            }
            Ok(text) => Snippet::extracted(truncate_chars(&text, self.max_chars), true),
            Err(e) => {
                warn!(error = %e, "OCR failed");
                Snippet::failed(FailureKind::Ocr, e.to_string())
            }
        }
    }

    fn recognize_first_page(&self, bytes: &[u8]) -> Result<String, OcrError> {
        let document = self.backend.open(bytes)?;
        if document.page_count()? == 0 {
            return Err(OcrError::NoPages);
        }
        let png = document.render_page_png(0, self.render_dpi)?;
        let text = self.ocr.recognize(&png)?;
        Ok(normalize_whitespace(&text))
    }
}
