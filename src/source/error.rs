//! Error types for document source operations.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while loading or querying pages.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A bounded wait expired before its condition held.
    #[error("timed out after {}s waiting for {what}", timeout.as_secs_f32())]
    Timeout {
        /// What was being waited for (locator or condition).
        what: String,
        /// The wait bound that expired.
        timeout: Duration,
    },

    /// Network-level failure while loading a page.
    #[error("network error loading {url}: {source}")]
    Network {
        /// The page URL.
        url: String,
        /// The underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered a page load with a non-success status.
    #[error("HTTP {status} loading {url}")]
    HttpStatus {
        /// The page URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The page URL could not be parsed.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
    },

    /// The locator is not a valid selector.
    #[error("invalid locator '{locator}': {reason}")]
    InvalidLocator {
        /// The rejected locator.
        locator: String,
        /// Parser message.
        reason: String,
    },

    /// A scoped query used an element from a page that is no longer loaded.
    #[error("stale element reference: element belongs to a page that is no longer loaded")]
    StaleElement,

    /// A query was issued before any page was loaded.
    #[error("no page loaded")]
    NoPage,

    /// The session was already closed.
    #[error("document source session is closed")]
    Closed,
}

impl SourceError {
    /// Creates a timeout error.
    pub fn timeout(what: impl Into<String>, timeout: Duration) -> Self {
        Self::Timeout {
            what: what.into(),
            timeout,
        }
    }

    /// Creates a network error from a reqwest error.
    ///
    /// Transport timeouts are reported as [`SourceError::Timeout`].
    pub fn network(url: impl Into<String>, source: reqwest::Error, timeout: Duration) -> Self {
        let url = url.into();
        if source.is_timeout() {
            return Self::timeout(format!("page load of {url}"), timeout);
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

    /// Creates an invalid locator error.
    pub fn invalid_locator(locator: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidLocator {
            locator: locator.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for expired bounded waits.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}
