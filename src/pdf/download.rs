//! Single-shot PDF download into memory.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use super::error::DownloadError;

/// Downloads PDFs with one GET per file and no retries.
#[derive(Debug, Clone)]
pub struct PdfDownloader {
    client: Client,
    timeout: Duration,
}

impl PdfDownloader {
    /// Creates a downloader over the shared client; `timeout` bounds each request.
    #[must_use]
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Fetches `url` and returns the response body.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError`] if the URL is invalid, the request fails or
    /// times out, or the server answers with a non-success status.
    #[instrument(skip(self), fields(url = %url))]
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        let response = self
            .client
            .get(parsed)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| DownloadError::network(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::http_status(url, status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DownloadError::network(url, e))?;
        debug!(bytes = bytes.len(), "PDF downloaded");
        Ok(bytes.to_vec())
    }
}
