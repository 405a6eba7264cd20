//! Two-pass harvest of a search listing.
//!
//! Pass 1 reads every result row of the listing page into owned values.
//! Pass 2 then visits each record page, which replaces the listing, so no
//! listing element is touched after the first navigation.

mod error;

pub use error::HarvestError;

use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::parser::parse_brief_options;
use crate::pdf::SnippetExtractor;
use crate::record::{DocumentRecord, FailureKind, PendingRecord, RowMetadata, RunSummary, Snippet};
use crate::resolver::RecordResolver;
use crate::source::{DocumentSource, Element, Locator, SourceError};

/// Result row on the listing page.
pub const RESULT_ROW_SELECTOR: &str = "div.result-row";

/// Title link inside a result row.
pub const TITLE_LINK_SELECTOR: &str = "div.result-title a";

/// Pipe-delimited metadata block inside a result row.
pub const BRIEF_OPTIONS_SELECTOR: &str = "div.brief-options";

/// Wait bound for the elements of one result row.
pub const DEFAULT_ROW_TIMEOUT: Duration = Duration::from_secs(2);

/// Order of records in the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderingPolicy {
    /// Rows that failed in pass 1 first, then the others; both in listing order.
    #[default]
    FailuresFirst,
    /// Listing order.
    Discovery,
}

/// Settings for one run.
#[derive(Debug, Clone)]
pub struct HarvestSettings {
    pub listing_url: String,
    pub listing_timeout: Duration,
    pub row_timeout: Duration,
    pub ordering: OrderingPolicy,
}

impl HarvestSettings {
    #[must_use]
    pub fn new(listing_url: impl Into<String>, listing_timeout: Duration) -> Self {
        Self {
            listing_url: listing_url.into(),
            listing_timeout,
            row_timeout: DEFAULT_ROW_TIMEOUT,
            ordering: OrderingPolicy::default(),
        }
    }
}

/// Records of a completed run.
#[derive(Debug, Clone)]
pub struct HarvestReport {
    pub records: Vec<DocumentRecord>,
    pub summary: RunSummary,
}

/// Runs the two passes over one listing.
pub struct Harvester {
    settings: HarvestSettings,
    resolver: RecordResolver,
    extractor: Box<dyn SnippetExtractor>,
}

impl Harvester {
    #[must_use]
    pub fn new(
        settings: HarvestSettings,
        resolver: RecordResolver,
        extractor: Box<dyn SnippetExtractor>,
    ) -> Self {
        Self {
            settings,
            resolver,
            extractor,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &HarvestSettings {
        &self.settings
    }

    /// Harvests the listing through `source` and closes it afterwards.
    ///
    /// Yields one record per result row.
    ///
    /// # Errors
    ///
    /// Returns [`HarvestError::ListingLoad`] when the listing page cannot be
    /// loaded or shows no result rows in time.
    #[instrument(skip(self, source), fields(url = %self.settings.listing_url))]
    pub async fn run(
        &self,
        mut source: Box<dyn DocumentSource>,
    ) -> Result<HarvestReport, HarvestError> {
        let result = self.harvest(source.as_mut()).await;
        if let Err(e) = source.close().await {
            warn!(error = %e, "Failed to close document source");
        }
        result
    }

    async fn harvest(&self, source: &mut dyn DocumentSource) -> Result<HarvestReport, HarvestError> {
        let url = &self.settings.listing_url;
        info!(source = source.name(), "Loading listing page");
        source
            .load(url)
            .await
            .map_err(|e| HarvestError::listing_load(url, e))?;
        let rows = source
            .query(
                &Locator::css(RESULT_ROW_SELECTOR),
                None,
                Some(self.settings.listing_timeout),
            )
            .await
            .map_err(|e| HarvestError::listing_load(url, e))?;
        info!(rows = rows.len(), "Found result rows");

        let mut failed = Vec::new();
        let mut pending = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            match self.read_row(source, row).await {
                Ok((metadata, record_url)) => {
                    pending.push(PendingRecord::new(index, metadata, record_url));
                }
                Err(e) => {
                    warn!(row = index, error = %e, "Could not read result row");
                    failed.push((index, DocumentRecord::row_failure(e.to_string())));
                }
            }
        }

        let mut extracted = Vec::with_capacity(pending.len());
        for record in pending {
            let index = record.index();
            extracted.push((index, self.process(source, record).await));
        }

        let records = order_records(failed, extracted, self.settings.ordering);
        let summary = RunSummary::from_records(&records);
        info!(
            total = summary.total,
            with_text = summary.with_text,
            "Harvest finished"
        );
        Ok(HarvestReport { records, summary })
    }

    async fn read_row(
        &self,
        source: &mut dyn DocumentSource,
        row: &Element,
    ) -> Result<(RowMetadata, String), SourceError> {
        let timeout = Some(self.settings.row_timeout);
        let link = source
            .query_one(&Locator::css(TITLE_LINK_SELECTOR), Some(row), timeout)
            .await?;
        let brief = source
            .query_one(&Locator::css(BRIEF_OPTIONS_SELECTOR), Some(row), timeout)
            .await?;

        let (document_symbol, date) = parse_brief_options(brief.text());
        let metadata = RowMetadata {
            title: link.text().trim().to_string(),
            document_symbol,
            date,
        };
        let record_url = link.attribute("href").unwrap_or_default().to_string();
        Ok((metadata, record_url))
    }

    async fn process(&self, source: &mut dyn DocumentSource, record: PendingRecord) -> DocumentRecord {
        let pdf_url = self
            .resolver
            .resolve_pdf_url(source, record.record_url())
            .await;
        if pdf_url.is_empty() {
            warn!(row = record.index(), record = record.record_url(), "No PDF available");
            return record.finalize("", Snippet::failed(FailureKind::NoPdf, ""));
        }

        debug!(row = record.index(), pdf = %pdf_url, "Extracting snippet");
        let snippet = match self.extractor.extract(&pdf_url).await {
            Ok(snippet) => snippet,
            Err(e) => {
                warn!(row = record.index(), error = %e, "Unexpected error while processing record");
                Snippet::failed(FailureKind::UnexpectedItem, e.to_string())
            }
        };
        record.finalize(pdf_url, snippet)
    }
}

fn order_records(
    failed: Vec<(usize, DocumentRecord)>,
    extracted: Vec<(usize, DocumentRecord)>,
    policy: OrderingPolicy,
) -> Vec<DocumentRecord> {
    let mut all: Vec<(usize, DocumentRecord)> = failed.into_iter().chain(extracted).collect();
    if policy == OrderingPolicy::Discovery {
        all.sort_by_key(|(index, _)| *index);
    }
    all.into_iter().map(|(_, record)| record).collect()
}
