//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use undl_core::config::{ConfigOverrides, ScrapeMode};

/// Scrape the UN Digital Library search listing into a CSV table.
///
/// Each result row becomes one record with its date, document symbol, title,
/// PDF link and the opening text of the PDF (OCR is used for scanned files).
#[derive(Parser, Debug)]
#[command(name = "undl-scraper")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Config file (default: ./undl-scraper.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Search preset: picks the listing URL and output file
    #[arg(short, long, value_enum)]
    pub mode: Option<ScrapeMode>,

    /// Listing URL to scrape instead of the preset one
    #[arg(short, long)]
    pub url: Option<String>,

    /// Output CSV path
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Maximum snippet length in characters
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub max_chars: Option<u64>,

    /// Tesseract data directory
    #[arg(long, value_name = "DIR")]
    pub tessdata_dir: Option<PathBuf>,

    /// Tesseract language code (e.g. eng, fra, chi_sim)
    #[arg(long)]
    pub ocr_lang: Option<String>,

    /// Preferred PDF language suffix (EN, AR, CH, ZH, FR, RU, ES)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Timeout for PDF downloads in seconds (1-600)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=600))]
    pub request_timeout: Option<u64>,

    /// Timeout for page loads in seconds (1-600)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=600))]
    pub page_timeout: Option<u64>,

    /// Write records in listing order instead of failed rows first
    #[arg(long)]
    pub preserve_row_order: bool,
}

impl Args {
    /// Values that override the config file.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            mode: self.mode,
            url: self.url.clone(),
            request_timeout_secs: self.request_timeout,
            page_timeout_secs: self.page_timeout,
            max_chars: self
                .max_chars
                .map(|n| usize::try_from(n).unwrap_or(usize::MAX)),
            ocr_language: self.ocr_lang.clone(),
            tessdata_dir: self.tessdata_dir.clone(),
            language: self.language.clone(),
            output_path: self.output.clone(),
            preserve_row_order: self.preserve_row_order,
        }
    }
}
