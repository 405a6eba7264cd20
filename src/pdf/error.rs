//! Error types for PDF download, parsing and OCR.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while downloading a PDF.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} downloading {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The provided URL is malformed or invalid.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },
}

impl DownloadError {
    /// Creates a network error from a reqwest error; timeouts map to [`DownloadError::Timeout`].
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        let url = url.into();
        if source.is_timeout() {
            return Self::Timeout { url };
        }
        Self::Network { url, source }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }
}

/// Errors raised while reading a downloaded PDF.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The bytes could not be opened as a document.
    #[error("cannot open document: {0}")]
    Open(String),

    /// A page could not be loaded or its text read.
    #[error("cannot read page {page}: {message}")]
    Page {
        /// Zero-based page index.
        page: usize,
        /// Backend message.
        message: String,
    },

    /// A page could not be rendered to an image.
    #[error("cannot render page {page}: {message}")]
    Render {
        /// Zero-based page index.
        page: usize,
        /// Backend message.
        message: String,
    },

    /// The PDF backend panicked while processing the document.
    #[error("PDF backend panicked while processing {url}")]
    Panicked {
        /// The PDF URL.
        url: String,
    },

    /// The blocking task was cancelled before it finished.
    #[error("PDF processing of {url} was interrupted: {message}")]
    Interrupted {
        /// The PDF URL.
        url: String,
        /// Task error message.
        message: String,
    },
}

impl ExtractError {
    /// Creates a page read error.
    pub fn page(page: usize, message: impl ToString) -> Self {
        Self::Page {
            page,
            message: message.to_string(),
        }
    }

    /// Creates a page render error.
    pub fn render(page: usize, message: impl ToString) -> Self {
        Self::Render {
            page,
            message: message.to_string(),
        }
    }
}

/// Errors raised by the OCR stage.
#[derive(Debug, Error)]
pub enum OcrError {
    /// The document could not be reopened or its first page rendered.
    #[error("cannot prepare page image: {0}")]
    Document(#[from] ExtractError),

    /// The document has no page to recognize.
    #[error("document has no pages")]
    NoPages,

    /// Writing the page image for the OCR engine failed.
    #[error("IO error staging page image at {path}: {source}")]
    Io {
        /// The staging path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The OCR program could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The OCR program exited unsuccessfully.
    #[error("{program} exited with status {status}: {stderr}")]
    Failed {
        /// Program that was invoked.
        program: String,
        /// Exit code, or -1 when killed by a signal.
        status: i32,
        /// Captured standard error.
        stderr: String,
    },
}
