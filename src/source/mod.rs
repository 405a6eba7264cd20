//! Navigable document source: load a page, query elements, wait on them.
//!
//! The harvesting pipeline only talks to the [`DocumentSource`] trait, so any
//! backend with bounded-wait query semantics can drive it. The crate ships
//! [`HttpDocumentSource`], which fetches server-rendered HTML and answers
//! CSS-selector queries against it.
//!
//! Elements are returned as owned [`Element`] snapshots tagged with the page
//! generation they came from. Loading another page bumps the generation and
//! makes every earlier snapshot stale, which mirrors how a browser drops
//! references to the previous document on navigation.

mod error;
mod http;

pub use error::SourceError;
pub use http::HttpDocumentSource;

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

/// CSS selector identifying elements on a page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator(String);

impl Locator {
    /// Creates a locator from a CSS selector.
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self(selector.into())
    }

    /// The selector text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of one element of a loaded page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    text: String,
    attributes: HashMap<String, String>,
    html: String,
    generation: u64,
}

impl Element {
    /// Creates an element snapshot.
    ///
    /// `html` is the element's outer HTML; it is the scope of nested queries.
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        attributes: HashMap<String, String>,
        html: impl Into<String>,
        generation: u64,
    ) -> Self {
        Self {
            text: text.into(),
            attributes,
            html: html.into(),
            generation,
        }
    }

    /// Rendered text of the element and its descendants.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Attribute value, if present. Link attributes are absolute URLs.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Outer HTML of the element.
    #[must_use]
    pub fn html(&self) -> &str {
        &self.html
    }

    /// Page generation the snapshot was taken from.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A navigable source of documents with bounded waits.
///
/// Implementations own one browsing session. A session is used by one
/// caller at a time and must be released with [`DocumentSource::close`].
///
/// # Object Safety
///
/// This trait uses `async_trait` so the pipeline can hold a
/// `Box<dyn DocumentSource>`.
#[async_trait]
pub trait DocumentSource: Send {
    /// Short backend name for logging.
    fn name(&self) -> &str;

    /// Wait bound used when a call passes `None`.
    fn default_timeout(&self) -> Duration;

    /// Navigates to `url`, replacing the current page.
    async fn load(&mut self, url: &str) -> Result<(), SourceError>;

    /// Waits until at least one element matches `locator` and returns all
    /// matches, in document order.
    ///
    /// With `scope`, only descendants of that element are searched.
    async fn query(
        &mut self,
        locator: &Locator,
        scope: Option<&Element>,
        timeout: Option<Duration>,
    ) -> Result<Vec<Element>, SourceError>;

    /// Waits until an element matches `locator` and returns the first match.
    async fn query_one(
        &mut self,
        locator: &Locator,
        scope: Option<&Element>,
        timeout: Option<Duration>,
    ) -> Result<Element, SourceError> {
        let wait = timeout.unwrap_or_else(|| self.default_timeout());
        self.query(locator, scope, Some(wait))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::timeout(locator.as_str(), wait))
    }

    /// Waits until `element` no longer belongs to the current page.
    async fn wait_for_staleness(
        &mut self,
        element: &Element,
        timeout: Option<Duration>,
    ) -> Result<(), SourceError>;

    /// Ends the session. Later calls fail with [`SourceError::Closed`].
    async fn close(&mut self) -> Result<(), SourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_accessors() {
        let mut attributes = HashMap::new();
        attributes.insert("href".to_string(), "https://example.org/record/1".to_string());
        let element = Element::new("Title", attributes, "<a>Title</a>", 4);

        assert_eq!(element.text(), "Title");
        assert_eq!(element.attribute("href"), Some("https://example.org/record/1"));
        assert_eq!(element.attribute("class"), None);
        assert_eq!(element.generation(), 4);
    }

    #[test]
    fn test_locator_display() {
        let locator = Locator::css("div.result-row");
        assert_eq!(locator.to_string(), "div.result-row");
        assert_eq!(locator.as_str(), "div.result-row");
    }
}
