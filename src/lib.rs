//! UN Digital Library scraper core library
//!
//! Harvests a search listing of the UN Digital Library into one record per
//! result row: date, document symbol, title, the PDF link of the preferred
//! language, and the opening text of that PDF.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`source`] - Navigable document source (load, bounded-wait queries)
//! - [`parser`] - Row metadata parsing (`symbol | date | collection`)
//! - [`resolver`] - PDF link selection on record pages
//! - [`pdf`] - PDF download, text layer extraction and OCR fallback
//! - [`pipeline`] - Two-pass harvest of a listing
//! - [`record`] - Record and snippet types
//! - [`output`] - CSV writer
//! - [`config`] - Defaults, TOML config file and overrides

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod http_client;
pub mod output;
pub mod parser;
pub mod pdf;
pub mod pipeline;
pub mod record;
pub mod resolver;
pub mod source;
mod user_agent;

// Re-export commonly used types
pub use config::{ConfigError, ScrapeMode, ScraperConfig};
pub use http_client::{HttpTimeouts, build_http_client};
pub use output::{OutputError, write_csv};
pub use parser::parse_brief_options;
pub use pdf::{PdfTextExtractor, SnippetExtractor};
pub use pipeline::{HarvestError, HarvestReport, HarvestSettings, Harvester, OrderingPolicy};
pub use record::{DocumentRecord, FailureKind, RunSummary, Snippet};
pub use resolver::{LanguagePreference, RecordResolver};
pub use source::{DocumentSource, Element, HttpDocumentSource, Locator, SourceError};
pub use user_agent::BROWSER_USER_AGENT;
