//! Error types for record page resolution.

use thiserror::Error;

use crate::source::SourceError;

/// Errors that can occur while looking up the PDF links of a record page.
///
/// These never leave [`RecordResolver::resolve_pdf_url`](super::RecordResolver::resolve_pdf_url);
/// they are logged and turned into an empty result.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The record page could not be loaded.
    #[error("could not open record page {url}: {source}")]
    Navigation {
        /// The record page URL.
        url: String,
        /// The underlying source error.
        #[source]
        source: SourceError,
    },

    /// The record page loaded but could not be queried.
    #[error("could not list PDF links on {url}: {source}")]
    Query {
        /// The record page URL.
        url: String,
        /// The underlying source error.
        #[source]
        source: SourceError,
    },
}

impl ResolveError {
    /// Creates a navigation error.
    pub fn navigation(url: impl Into<String>, source: SourceError) -> Self {
        Self::Navigation {
            url: url.into(),
            source,
        }
    }

    /// Creates a query error.
    pub fn query(url: impl Into<String>, source: SourceError) -> Self {
        Self::Query {
            url: url.into(),
            source,
        }
    }
}
