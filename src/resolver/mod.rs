//! Record page resolution: pick the PDF in the wanted language.
//!
//! Record pages list one file per language, named with a two-letter code
//! right before the extension (`...-EN.pdf`, `...-FR.pdf`). Selection is
//! done by [`select_pdf_href`]:
//!
//! 1. the first link with the preferred suffix;
//! 2. otherwise the first link carrying none of the reserved suffixes;
//! 3. otherwise the first link, whatever its language.

mod error;

pub use error::ResolveError;

use std::time::Duration;

use tracing::{debug, instrument, warn};

use crate::source::{DocumentSource, Locator};

/// Locator for PDF links on a record page.
pub const PDF_LINK_SELECTOR: &str = "a[href*='.pdf']";

/// Language codes used as file suffixes on record pages.
///
/// Chinese appears both as `CH` and `ZH`.
pub const LANGUAGE_CODES: [&str; 7] = ["EN", "AR", "CH", "ZH", "FR", "RU", "ES"];

/// Which language suffix to look for and which ones to avoid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePreference {
    preferred: String,
    reserved: Vec<String>,
}

impl LanguagePreference {
    /// Prefers `code` (case-insensitive, e.g. `"fr"`) and reserves every
    /// other known language suffix.
    #[must_use]
    pub fn for_language(code: &str) -> Self {
        let code = code.trim().to_ascii_uppercase();
        let reserved = LANGUAGE_CODES
            .iter()
            .filter(|other| **other != code)
            .map(|other| suffix(other))
            .collect();
        Self {
            preferred: suffix(&code),
            reserved,
        }
    }

    /// English preference: `-EN.pdf`, avoiding the other official languages.
    #[must_use]
    pub fn english() -> Self {
        Self::for_language("EN")
    }

    /// The preferred suffix, e.g. `-EN.pdf`.
    #[must_use]
    pub fn preferred(&self) -> &str {
        &self.preferred
    }

    /// Suffixes treated as "another language".
    #[must_use]
    pub fn reserved(&self) -> &[String] {
        &self.reserved
    }

    fn is_reserved(&self, href: &str) -> bool {
        self.reserved.iter().any(|s| href.contains(s.as_str()))
    }
}

impl Default for LanguagePreference {
    fn default() -> Self {
        Self::english()
    }
}

fn suffix(code: &str) -> String {
    format!("-{code}.pdf")
}

/// Picks the best PDF link from `hrefs` (in page order).
///
/// Returns `None` only when `hrefs` is empty.
#[must_use]
pub fn select_pdf_href<'a>(hrefs: &'a [String], preference: &LanguagePreference) -> Option<&'a str> {
    hrefs
        .iter()
        .find(|href| href.contains(preference.preferred()))
        .or_else(|| hrefs.iter().find(|href| !preference.is_reserved(href)))
        .or_else(|| hrefs.first())
        .map(String::as_str)
}

/// Navigates to record pages and selects their PDF link.
#[derive(Debug, Clone)]
pub struct RecordResolver {
    preference: LanguagePreference,
    timeout: Duration,
}

impl RecordResolver {
    /// Creates a resolver; `timeout` bounds the wait for PDF links.
    #[must_use]
    pub fn new(preference: LanguagePreference, timeout: Duration) -> Self {
        Self {
            preference,
            timeout,
        }
    }

    /// The language preference in use.
    #[must_use]
    pub fn preference(&self) -> &LanguagePreference {
        &self.preference
    }

    /// Returns the selected PDF URL of `record_url`, or an empty string.
    ///
    /// Never fails: navigation and query errors are logged as warnings and
    /// produce an empty string, as do an empty `record_url` and a page
    /// without PDF links.
    pub async fn resolve_pdf_url(&self, source: &mut dyn DocumentSource, record_url: &str) -> String {
        match self.try_resolve(source, record_url).await {
            Ok(Some(url)) => url,
            Ok(None) => String::new(),
            Err(error) => {
                warn!(error = %error, "Could not resolve PDF link");
                String::new()
            }
        }
    }

    /// Resolves `record_url`, reporting failures instead of swallowing them.
    ///
    /// `Ok(None)` means there was nothing to select: empty input, or no PDF
    /// links appeared within the timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the page cannot be loaded or queried.
    #[instrument(skip(self, source))]
    pub async fn try_resolve(
        &self,
        source: &mut dyn DocumentSource,
        record_url: &str,
    ) -> Result<Option<String>, ResolveError> {
        if record_url.is_empty() {
            return Ok(None);
        }

        source
            .load(record_url)
            .await
            .map_err(|e| ResolveError::navigation(record_url, e))?;

        let links = match source
            .query(&Locator::css(PDF_LINK_SELECTOR), None, Some(self.timeout))
            .await
        {
            Ok(links) => links,
            Err(e) if e.is_timeout() => {
                debug!("No PDF links on record page");
                return Ok(None);
            }
            Err(e) => return Err(ResolveError::query(record_url, e)),
        };

        let hrefs: Vec<String> = links
            .iter()
            .map(|link| link.attribute("href").unwrap_or_default().to_string())
            .collect();
        let selected = select_pdf_href(&hrefs, &self.preference)
            .filter(|href| !href.is_empty())
            .map(str::to_string);
        debug!(candidates = hrefs.len(), found = selected.is_some(), "Selected PDF link");
        Ok(selected)
    }
}
