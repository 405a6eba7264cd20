//! Document records and the tagged snippet result.
//!
//! Extraction failures never leave the pipeline as errors: each one is kept
//! as a [`Snippet::Failed`] value on the record it belongs to, and only the
//! output boundary ([`Snippet::render`]) turns it into the bracketed
//! placeholder text that ends up in the table.

use std::fmt;

/// Prefix prepended to text that came from OCR rather than the text layer.
pub const OCR_TAG: &str = "[OCR] ";

/// Number of characters of an error message kept in an `[Error: ...]` placeholder.
pub const ERROR_DETAIL_CHARS: usize = 50;

/// Why a record has no extracted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Title link or brief-options block could not be read from the result row.
    RowMetadata,
    /// The PDF could not be fetched (transport error or non-2xx status).
    PdfDownload,
    /// The downloaded bytes could not be opened or read as a PDF.
    PdfParse,
    /// The OCR engine failed on a document without a text layer.
    Ocr,
    /// Neither the text layer nor OCR produced any text.
    NoText,
    /// The record page did not link to any PDF.
    NoPdf,
    /// Anything else that went wrong while processing one record.
    UnexpectedItem,
}

impl FailureKind {
    /// Returns true for failures whose placeholder carries the error message.
    #[must_use]
    pub fn carries_detail(self) -> bool {
        matches!(self, Self::RowMetadata | Self::PdfParse | Self::UnexpectedItem)
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::RowMetadata => "row-metadata",
            Self::PdfDownload => "pdf-download",
            Self::PdfParse => "pdf-parse",
            Self::Ocr => "ocr",
            Self::NoText => "no-text",
            Self::NoPdf => "no-pdf",
            Self::UnexpectedItem => "unexpected",
        };
        f.write_str(label)
    }
}

/// A failure attached to a record in place of extracted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Failure category; decides the rendered placeholder.
    pub kind: FailureKind,
    /// Human-readable detail (error message), possibly empty.
    pub detail: String,
}

impl Failure {
    /// Creates a failure with a detail message.
    #[must_use]
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// Creates a failure without a detail message.
    #[must_use]
    pub fn bare(kind: FailureKind) -> Self {
        Self::new(kind, String::new())
    }
}

/// Extracted text of a record, or the reason there is none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snippet {
    /// Non-empty text, already normalized and truncated.
    Text {
        /// The snippet content.
        text: String,
        /// Whether the text came from OCR.
        ocr: bool,
    },
    /// No text; see the failure.
    Failed(Failure),
}

impl Snippet {
    /// Wraps extracted text, turning empty text into [`FailureKind::NoText`].
    #[must_use]
    pub fn extracted(text: impl Into<String>, ocr: bool) -> Self {
        let text = text.into();
        if text.is_empty() {
            Self::failed(FailureKind::NoText, "")
        } else {
            Self::Text { text, ocr }
        }
    }

    /// Creates a failed snippet.
    #[must_use]
    pub fn failed(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self::Failed(Failure::new(kind, detail))
    }

    /// Returns true when the snippet holds extracted text.
    #[must_use]
    pub fn has_text(&self) -> bool {
        matches!(self, Self::Text { .. })
    }

    /// Returns the failure kind, if any.
    #[must_use]
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Text { .. } => None,
            Self::Failed(failure) => Some(failure.kind),
        }
    }

    /// Renders the snippet as it appears in the output table.
    ///
    /// The result is never empty.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Text { text, ocr: true } => format!("{OCR_TAG}{text}"),
            Self::Text { text, ocr: false } => text.clone(),
            Self::Failed(failure) => render_failure(failure),
        }
    }
}

fn render_failure(failure: &Failure) -> String {
    match failure.kind {
        FailureKind::PdfDownload => "[PDF download failed]".to_string(),
        FailureKind::Ocr => "[OCR failed - check Tesseract installation]".to_string(),
        FailureKind::NoText => "[No text could be extracted]".to_string(),
        FailureKind::NoPdf => "[No PDF available]".to_string(),
        FailureKind::RowMetadata | FailureKind::PdfParse | FailureKind::UnexpectedItem => {
            let detail: String = failure.detail.chars().take(ERROR_DETAIL_CHARS).collect();
            format!("[Error: {detail}]")
        }
    }
}

/// Metadata captured from one result row on the listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowMetadata {
    /// Document title (title link text).
    pub title: String,
    /// Document symbol, e.g. `A/RES/2758 (XXVI)`.
    pub document_symbol: String,
    /// Publication date as displayed.
    pub date: String,
}

/// A record whose row metadata is known but whose PDF has not been processed.
///
/// Produced by the discovery pass and consumed by [`PendingRecord::finalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRecord {
    index: usize,
    metadata: RowMetadata,
    record_url: String,
}

impl PendingRecord {
    /// Creates a pending record for the row at `index` (discovery order).
    #[must_use]
    pub fn new(index: usize, metadata: RowMetadata, record_url: impl Into<String>) -> Self {
        Self {
            index,
            metadata,
            record_url: record_url.into(),
        }
    }

    /// Position of the row on the listing page.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Row metadata captured in the discovery pass.
    #[must_use]
    pub fn metadata(&self) -> &RowMetadata {
        &self.metadata
    }

    /// Record detail page URL (may be empty).
    #[must_use]
    pub fn record_url(&self) -> &str {
        &self.record_url
    }

    /// Attaches the PDF URL and snippet, producing the final record.
    #[must_use]
    pub fn finalize(self, pdf_url: impl Into<String>, snippet: Snippet) -> DocumentRecord {
        DocumentRecord {
            date: self.metadata.date,
            document_symbol: self.metadata.document_symbol,
            title: self.metadata.title,
            pdf_url: pdf_url.into(),
            snippet,
        }
    }
}

/// One finalized row of output. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    date: String,
    document_symbol: String,
    title: String,
    pdf_url: String,
    snippet: Snippet,
}

impl DocumentRecord {
    /// Record for a result row whose metadata could not be read.
    #[must_use]
    pub fn row_failure(detail: impl Into<String>) -> Self {
        Self {
            date: String::new(),
            document_symbol: String::new(),
            title: String::new(),
            pdf_url: String::new(),
            snippet: Snippet::failed(FailureKind::RowMetadata, detail),
        }
    }

    #[must_use]
    pub fn date(&self) -> &str {
        &self.date
    }

    #[must_use]
    pub fn document_symbol(&self) -> &str {
        &self.document_symbol
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn pdf_url(&self) -> &str {
        &self.pdf_url
    }

    #[must_use]
    pub fn snippet(&self) -> &Snippet {
        &self.snippet
    }

    /// The snippet column as written to the output table.
    #[must_use]
    pub fn extracted_text_snippet(&self) -> String {
        self.snippet.render()
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of records produced.
    pub total: usize,
    /// Records whose snippet holds extracted text.
    pub with_text: usize,
}

impl RunSummary {
    /// Tallies a finished record list.
    #[must_use]
    pub fn from_records(records: &[DocumentRecord]) -> Self {
        Self {
            total: records.len(),
            with_text: records.iter().filter(|r| r.snippet().has_text()).count(),
        }
    }

    /// Records without extracted text.
    #[must_use]
    pub fn without_text(&self) -> usize {
        self.total - self.with_text
    }
}
