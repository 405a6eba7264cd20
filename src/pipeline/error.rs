//! Error types for a harvest run.

use thiserror::Error;

use crate::source::SourceError;

/// Errors that abort a whole run.
///
/// Per-record problems never show up here; they are kept on the records.
#[derive(Debug, Error)]
pub enum HarvestError {
    /// The listing page could not be loaded or showed no result rows in time.
    #[error("could not load listing {url}: {source}")]
    ListingLoad {
        /// The listing URL.
        url: String,
        /// The underlying source error.
        #[source]
        source: SourceError,
    },
}

impl HarvestError {
    /// Creates a listing load error.
    pub fn listing_load(url: impl Into<String>, source: SourceError) -> Self {
        Self::ListingLoad {
            url: url.into(),
            source,
        }
    }
}
