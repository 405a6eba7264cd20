//! CLI entry point for the UN Digital Library scraper.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use undl_core::config::{ScraperConfig, load_file_config};
use undl_core::http_client::{HttpTimeouts, build_http_client};
use undl_core::output::write_csv;
use undl_core::pdf::{MupdfBackend, PdfDownloader, PdfTextExtractor, TesseractOcr};
use undl_core::pipeline::{HarvestSettings, Harvester};
use undl_core::resolver::{LanguagePreference, RecordResolver};
use undl_core::source::HttpDocumentSource;

mod cli;

use cli::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let file_config = load_file_config(args.config.as_deref())?;
    let config = ScraperConfig::resolve(file_config.as_ref(), &args.overrides())?;
    debug!(?config, "Configuration resolved");

    info!(mode = config.mode.label(), "UN Digital Library scraper starting");

    let client = build_http_client(HttpTimeouts {
        request: config.request_timeout,
        ..HttpTimeouts::default()
    })
    .context("failed to build HTTP client")?;

    let source = HttpDocumentSource::new(client.clone(), config.page_timeout);
    let resolver = RecordResolver::new(
        LanguagePreference::for_language(&config.language),
        config.page_timeout,
    );
    let ocr = TesseractOcr::new(config.ocr_language.clone(), config.tessdata_dir.clone());
    let extractor = PdfTextExtractor::new(
        PdfDownloader::new(client, config.request_timeout),
        Box::new(MupdfBackend::new()),
        Box::new(ocr),
        config.max_chars,
    );

    let settings = HarvestSettings {
        listing_url: config.listing_url.clone(),
        listing_timeout: config.page_timeout,
        row_timeout: config.row_timeout,
        ordering: config.ordering,
    };
    let harvester = Harvester::new(settings, resolver, Box::new(extractor));

    let report = harvester.run(Box::new(source)).await?;

    if report.records.is_empty() {
        info!("No documents were extracted");
        return Ok(());
    }

    write_csv(&config.output_path, &report.records)?;
    info!(
        mode = config.mode.label(),
        total = report.summary.total,
        with_text = report.summary.with_text,
        without_text = report.summary.without_text(),
        output = %config.output_path.display(),
        "Summary"
    );

    Ok(())
}
