//! Run configuration: built-in defaults, optional TOML file, CLI overrides.
//!
//! Layers are applied in that order. The scrape mode is resolved first
//! because it picks the default listing URL and output path that the other
//! layers may then replace.
//!
//! ```toml
//! [search]
//! mode = "resolutions"
//! url = "https://digitallibrary.un.org/search?p=china"
//!
//! [http]
//! request_timeout_secs = 30
//! page_timeout_secs = 30
//! row_timeout_secs = 2
//!
//! [extraction]
//! max_chars = 500
//!
//! [ocr]
//! language = "eng"
//! tessdata_dir = "/usr/share/tesseract-ocr/5/tessdata"
//!
//! [resolver]
//! language = "EN"
//!
//! [output]
//! path = "data/UN_Resolutions_Sample.csv"
//! preserve_row_order = false
//! ```

mod error;

pub use error::ConfigError;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use serde::Deserialize;
use tracing::debug;

use crate::pdf::{DEFAULT_MAX_CHARS, DEFAULT_OCR_LANGUAGE};
use crate::pipeline::{DEFAULT_ROW_TIMEOUT, OrderingPolicy};
use crate::resolver::LANGUAGE_CODES;

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "undl-scraper.toml";

/// Default timeout for HTTP requests (PDF downloads), in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default timeout for page loads and listing waits, in seconds.
pub const DEFAULT_PAGE_TIMEOUT_SECS: u64 = 30;

const MAX_TIMEOUT_SECS: u64 = 600;

/// Resolutions and decisions mentioning China, newest first, 50 per page.
pub const RESOLUTIONS_URL: &str = "https://digitallibrary.un.org/search?cc=Resolutions%20and%20Decisions&ln=en&p=china&f=&rm=&sf=latest%20first&so=d&rg=50&c=Resolutions%20and%20Decisions&c=&of=hb&fti=0&fti=0";

/// Universal Periodic Review documents on China, newest first, 50 per page.
pub const UPR_URL: &str = "https://digitallibrary.un.org/search?cc=Documents%20and%20Publications&ln=en&p=universal%20periodic%20review%20china&f=&rm=&sf=latest%20first&so=d&rg=50&c=Documents%20and%20Publications&c=&of=hb&fti=0&fti=0";

/// Preset search target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeMode {
    /// General Assembly resolutions and decisions.
    #[default]
    Resolutions,
    /// Universal Periodic Review reports.
    Upr,
}

impl ScrapeMode {
    /// Human-readable name used in the banner and summary.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Resolutions => "Resolutions",
            Self::Upr => "UPR Reports",
        }
    }

    #[must_use]
    pub fn listing_url(self) -> &'static str {
        match self {
            Self::Resolutions => RESOLUTIONS_URL,
            Self::Upr => UPR_URL,
        }
    }

    #[must_use]
    pub fn output_path(self) -> &'static str {
        match self {
            Self::Resolutions => "data/UN_Resolutions_Sample.csv",
            Self::Upr => "data/UN_UPR_Reports_Sample.csv",
        }
    }
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScraperConfig {
    pub mode: ScrapeMode,
    pub listing_url: String,
    /// Bound on each HTTP request (PDF downloads).
    pub request_timeout: Duration,
    /// Bound on page loads and the listing wait.
    pub page_timeout: Duration,
    /// Bound on reading the elements of one result row.
    pub row_timeout: Duration,
    /// Snippet length in characters.
    pub max_chars: usize,
    /// Tesseract language code, e.g. `eng`.
    pub ocr_language: String,
    pub tessdata_dir: Option<PathBuf>,
    /// Two-letter suffix of the preferred PDF language, e.g. `EN`.
    pub language: String,
    pub output_path: PathBuf,
    pub ordering: OrderingPolicy,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self::for_mode(ScrapeMode::default())
    }
}

impl ScraperConfig {
    /// Built-in defaults for `mode`.
    #[must_use]
    pub fn for_mode(mode: ScrapeMode) -> Self {
        Self {
            mode,
            listing_url: mode.listing_url().to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            page_timeout: Duration::from_secs(DEFAULT_PAGE_TIMEOUT_SECS),
            row_timeout: DEFAULT_ROW_TIMEOUT,
            max_chars: DEFAULT_MAX_CHARS,
            ocr_language: DEFAULT_OCR_LANGUAGE.to_string(),
            tessdata_dir: None,
            language: "EN".to_string(),
            output_path: PathBuf::from(mode.output_path()),
            ordering: OrderingPolicy::default(),
        }
    }

    /// Layers `file` and then `overrides` over the defaults of the selected mode.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a file or override value is out of range.
    pub fn resolve(
        file: Option<&FileConfig>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        if let Some(file) = file {
            file.validate()?;
        }
        overrides.validate()?;

        let mode = overrides
            .mode
            .or_else(|| file.and_then(|f| f.search.mode))
            .unwrap_or_default();
        let mut config = Self::for_mode(mode);
        if let Some(file) = file {
            config.apply_file(file);
        }
        config.apply_overrides(overrides);
        config.language = config.language.to_ascii_uppercase();
        Ok(config)
    }

    fn apply_file(&mut self, file: &FileConfig) {
        if let Some(url) = &file.search.url {
            self.listing_url.clone_from(url);
        }
        if let Some(secs) = file.http.request_timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.http.page_timeout_secs {
            self.page_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = file.http.row_timeout_secs {
            self.row_timeout = Duration::from_secs(secs);
        }
        if let Some(max_chars) = file.extraction.max_chars {
            self.max_chars = max_chars;
        }
        if let Some(language) = &file.ocr.language {
            self.ocr_language.clone_from(language);
        }
        if let Some(dir) = &file.ocr.tessdata_dir {
            self.tessdata_dir = Some(dir.clone());
        }
        if let Some(language) = &file.resolver.language {
            self.language.clone_from(language);
        }
        if let Some(path) = &file.output.path {
            self.output_path.clone_from(path);
        }
        if let Some(preserve) = file.output.preserve_row_order {
            self.ordering = ordering_for(preserve);
        }
    }

    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(url) = &overrides.url {
            self.listing_url.clone_from(url);
        }
        if let Some(secs) = overrides.request_timeout_secs {
            self.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = overrides.page_timeout_secs {
            self.page_timeout = Duration::from_secs(secs);
        }
        if let Some(max_chars) = overrides.max_chars {
            self.max_chars = max_chars;
        }
        if let Some(language) = &overrides.ocr_language {
            self.ocr_language.clone_from(language);
        }
        if let Some(dir) = &overrides.tessdata_dir {
            self.tessdata_dir = Some(dir.clone());
        }
        if let Some(language) = &overrides.language {
            self.language.clone_from(language);
        }
        if let Some(path) = &overrides.output_path {
            self.output_path.clone_from(path);
        }
        if overrides.preserve_row_order {
            self.ordering = OrderingPolicy::Discovery;
        }
    }
}

fn ordering_for(preserve_row_order: bool) -> OrderingPolicy {
    if preserve_row_order {
        OrderingPolicy::Discovery
    } else {
        OrderingPolicy::FailuresFirst
    }
}

/// Values given on the command line; `None` leaves the lower layer in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub mode: Option<ScrapeMode>,
    pub url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub page_timeout_secs: Option<u64>,
    pub max_chars: Option<usize>,
    pub ocr_language: Option<String>,
    pub tessdata_dir: Option<PathBuf>,
    pub language: Option<String>,
    pub output_path: Option<PathBuf>,
    pub preserve_row_order: bool,
}

impl ConfigOverrides {
    fn validate(&self) -> Result<(), ConfigError> {
        validate_timeout_secs("request_timeout_secs", self.request_timeout_secs)?;
        validate_timeout_secs("page_timeout_secs", self.page_timeout_secs)?;
        validate_max_chars(self.max_chars)?;
        validate_language(self.language.as_deref())
    }
}

/// Contents of a TOML config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub search: SearchSection,
    pub http: HttpSection,
    pub extraction: ExtractionSection,
    pub ocr: OcrSection,
    pub resolver: ResolverSection,
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchSection {
    pub mode: Option<ScrapeMode>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HttpSection {
    pub request_timeout_secs: Option<u64>,
    pub page_timeout_secs: Option<u64>,
    pub row_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractionSection {
    pub max_chars: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OcrSection {
    pub language: Option<String>,
    pub tessdata_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverSection {
    pub language: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub path: Option<PathBuf>,
    pub preserve_row_order: Option<bool>,
}

impl FileConfig {
    /// Parses TOML text; `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys.
    pub fn parse(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads and parses the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path)
    }

    /// Checks values against the accepted ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for the first value out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_timeout_secs("http.request_timeout_secs", self.http.request_timeout_secs)?;
        validate_timeout_secs("http.page_timeout_secs", self.http.page_timeout_secs)?;
        validate_timeout_secs("http.row_timeout_secs", self.http.row_timeout_secs)?;
        validate_max_chars(self.extraction.max_chars)?;
        validate_language(self.resolver.language.as_deref())
    }
}

/// Loads the config file for this run.
///
/// An explicit `path` must exist. Without one, [`DEFAULT_CONFIG_FILE`] in the
/// working directory is used when present.
///
/// # Errors
///
/// Returns [`ConfigError`] if an explicit file is missing or any file is invalid.
pub fn load_file_config(path: Option<&Path>) -> Result<Option<FileConfig>, ConfigError> {
    let path = match path {
        Some(path) if !path.exists() => {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                return Ok(None);
            }
            default
        }
    };
    debug!(path = %path.display(), "Loading config file");
    FileConfig::load(&path).map(Some)
}

fn validate_timeout_secs(field: &'static str, value: Option<u64>) -> Result<(), ConfigError> {
    let Some(value) = value else {
        return Ok(());
    };
    if !(1..=MAX_TIMEOUT_SECS).contains(&value) {
        return Err(ConfigError::invalid(field, value, "range 1..=600"));
    }
    Ok(())
}

fn validate_max_chars(value: Option<usize>) -> Result<(), ConfigError> {
    match value {
        Some(0) => Err(ConfigError::invalid("extraction.max_chars", 0, "at least 1")),
        _ => Ok(()),
    }
}

fn validate_language(value: Option<&str>) -> Result<(), ConfigError> {
    let Some(value) = value else {
        return Ok(());
    };
    let upper = value.trim().to_ascii_uppercase();
    if !LANGUAGE_CODES.contains(&upper.as_str()) {
        return Err(ConfigError::invalid(
            "resolver.language",
            value,
            "one of EN, AR, CH, ZH, FR, RU, ES",
        ));
    }
    Ok(())
}
