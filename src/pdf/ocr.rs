//! OCR through the `tesseract` command-line program.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use super::error::OcrError;

/// Default OCR language.
pub const DEFAULT_OCR_LANGUAGE: &str = "eng";

/// Full automatic page segmentation, no orientation detection.
const PAGE_SEGMENTATION_MODE: &str = "3";

/// Recognizes text in a page image.
pub trait OcrEngine: Send + Sync {
    /// Returns the text found in the PNG image `png`.
    ///
    /// # Errors
    ///
    /// Returns [`OcrError`] if the engine cannot be run or fails.
    fn recognize(&self, png: &[u8]) -> Result<String, OcrError>;
}

/// Runs `tesseract <image> stdout -l <lang> --psm 3`.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    program: PathBuf,
    language: String,
    tessdata_dir: Option<PathBuf>,
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self {
            program: PathBuf::from("tesseract"),
            language: DEFAULT_OCR_LANGUAGE.to_string(),
            tessdata_dir: None,
        }
    }
}

impl TesseractOcr {
    #[must_use]
    pub fn new(language: impl Into<String>, tessdata_dir: Option<PathBuf>) -> Self {
        Self {
            language: language.into(),
            tessdata_dir,
            ..Self::default()
        }
    }

    /// Uses `program` instead of `tesseract` from `PATH`.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Arguments passed to the program for `image`.
    #[must_use]
    pub fn command_args(&self, image: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            image.as_os_str().to_os_string(),
            "stdout".into(),
            "-l".into(),
            self.language.clone().into(),
            "--psm".into(),
            PAGE_SEGMENTATION_MODE.into(),
        ];
        if let Some(dir) = &self.tessdata_dir {
            args.push("--tessdata-dir".into());
            args.push(dir.as_os_str().to_os_string());
        }
        args
    }

    fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, png: &[u8]) -> Result<String, OcrError> {
        let mut image = tempfile::Builder::new()
            .prefix("undl-page-")
            .suffix(".png")
            .tempfile()
            .map_err(|source| OcrError::Io {
                path: std::env::temp_dir(),
                source,
            })?;
        image
            .write_all(png)
            .and_then(|()| image.flush())
            .map_err(|source| OcrError::Io {
                path: image.path().to_path_buf(),
                source,
            })?;

        let output = Command::new(&self.program)
            .args(self.command_args(image.path()))
            .output()
            .map_err(|source| OcrError::Spawn {
                program: self.program_name(),
                source,
            })?;

        if !output.status.success() {
            return Err(OcrError::Failed {
                program: self.program_name(),
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(chars = text.chars().count(), "OCR finished");
        Ok(text)
    }
}
