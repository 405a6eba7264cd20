//! Document source backed by plain HTTP fetches and HTML parsing.
//!
//! Works for sites that render their listing and record pages on the
//! server. A fetched page is a fixed snapshot: nothing on it changes until
//! the next [`DocumentSource::load`], so a presence wait that finds no match
//! fails right away with [`SourceError::Timeout`] instead of polling.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};
use url::Url;

use super::{DocumentSource, Element, Locator, SourceError};

/// Attributes holding links; their values are reported as absolute URLs.
const LINK_ATTRIBUTES: [&str; 2] = ["href", "src"];

#[derive(Debug)]
struct LoadedPage {
    url: Url,
    html: String,
}

/// [`DocumentSource`] that fetches pages with `reqwest` and queries them with `scraper`.
#[derive(Debug)]
pub struct HttpDocumentSource {
    client: Client,
    default_timeout: Duration,
    page: Option<LoadedPage>,
    generation: u64,
    closed: bool,
}

impl HttpDocumentSource {
    /// Creates a session using `client`; `default_timeout` bounds page loads
    /// and waits that do not pass their own timeout.
    #[must_use]
    pub fn new(client: Client, default_timeout: Duration) -> Self {
        Self {
            client,
            default_timeout,
            page: None,
            generation: 0,
            closed: false,
        }
    }

    /// URL of the loaded page after redirects, if any.
    #[must_use]
    pub fn current_url(&self) -> Option<&str> {
        self.page.as_ref().map(|page| page.url.as_str())
    }

    /// Number of navigations started in this session.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn ensure_open(&self) -> Result<(), SourceError> {
        if self.closed {
            Err(SourceError::Closed)
        } else {
            Ok(())
        }
    }

    fn select(&self, locator: &Locator, scope: Option<&Element>) -> Result<Vec<Element>, SourceError> {
        let page = self.page.as_ref().ok_or(SourceError::NoPage)?;
        let selector = Selector::parse(locator.as_str())
            .map_err(|e| SourceError::invalid_locator(locator.as_str(), e.to_string()))?;

        let Some(scope) = scope else {
            let document = Html::parse_document(&page.html);
            return Ok(document
                .select(&selector)
                .map(|el| snapshot(el, &page.url, self.generation))
                .collect());
        };

        if scope.generation() != self.generation {
            return Err(SourceError::StaleElement);
        }
        let fragment = Html::parse_fragment(scope.html());
        let Some(scope_root) = fragment.root_element().child_elements().next() else {
            return Ok(Vec::new());
        };
        Ok(scope_root
            .select(&selector)
            .filter(|el| el.id() != scope_root.id())
            .map(|el| snapshot(el, &page.url, self.generation))
            .collect())
    }
}

fn snapshot(element: ElementRef<'_>, base: &Url, generation: u64) -> Element {
    let text = element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ");

    let attributes: HashMap<String, String> = element
        .value()
        .attrs()
        .map(|(name, value)| {
            let value = if LINK_ATTRIBUTES.contains(&name) {
                absolutize(value, base)
            } else {
                value.to_string()
            };
            (name.to_string(), value)
        })
        .collect();

    Element::new(text, attributes, element.html(), generation)
}

fn absolutize(value: &str, base: &Url) -> String {
    base.join(value.trim())
        .map_or_else(|_| value.to_string(), |url| url.to_string())
}

#[async_trait]
impl DocumentSource for HttpDocumentSource {
    fn name(&self) -> &'static str {
        "http"
    }

    fn default_timeout(&self) -> Duration {
        self.default_timeout
    }

    #[instrument(skip(self), fields(source = "http"))]
    async fn load(&mut self, url: &str) -> Result<(), SourceError> {
        self.ensure_open()?;
        let parsed = Url::parse(url).map_err(|_| SourceError::invalid_url(url))?;

        // Navigation drops the previous document even when it fails.
        self.generation += 1;
        self.page = None;

        let response = self
            .client
            .get(parsed)
            .timeout(self.default_timeout)
            .send()
            .await
            .map_err(|e| SourceError::network(url, e, self.default_timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::http_status(url, status.as_u16()));
        }

        let final_url = response.url().clone();
        let html = response
            .text()
            .await
            .map_err(|e| SourceError::network(url, e, self.default_timeout))?;

        debug!(
            bytes = html.len(),
            generation = self.generation,
            "Page loaded"
        );
        self.page = Some(LoadedPage {
            url: final_url,
            html,
        });
        Ok(())
    }

    async fn query(
        &mut self,
        locator: &Locator,
        scope: Option<&Element>,
        timeout: Option<Duration>,
    ) -> Result<Vec<Element>, SourceError> {
        self.ensure_open()?;
        let wait = timeout.unwrap_or(self.default_timeout);
        let found = self.select(locator, scope)?;
        if found.is_empty() {
            return Err(SourceError::timeout(locator.as_str(), wait));
        }
        Ok(found)
    }

    async fn wait_for_staleness(
        &mut self,
        element: &Element,
        timeout: Option<Duration>,
    ) -> Result<(), SourceError> {
        self.ensure_open()?;
        if element.generation() != self.generation {
            return Ok(());
        }
        // Only a navigation through this session can make the element stale,
        // and none can happen while we hold `&mut self`.
        let wait = timeout.unwrap_or(self.default_timeout);
        tokio::time::sleep(wait).await;
        Err(SourceError::timeout("element to become stale", wait))
    }

    async fn close(&mut self) -> Result<(), SourceError> {
        if !self.closed {
            debug!(generation = self.generation, "Closing document source session");
        }
        self.closed = true;
        self.page = None;
        Ok(())
    }
}
