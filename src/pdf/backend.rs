//! PDF backends: page text and page rendering.

use mupdf::{Colorspace, Document, ImageFormat, Matrix, TextPageFlags};

use super::error::ExtractError;

/// Resolution used when rendering a page for OCR.
pub const DEFAULT_RENDER_DPI: u32 = 300;

/// PDF user space is 72 units per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// Opens PDF bytes.
pub trait PdfBackend: Send + Sync {
    /// Opens `bytes` as a PDF document.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Open`] when the bytes are not a readable PDF.
    fn open(&self, bytes: &[u8]) -> Result<Box<dyn PdfPages>, ExtractError>;
}

/// An opened document.
pub trait PdfPages {
    /// Number of pages.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] if the page tree cannot be read.
    fn page_count(&self) -> Result<usize, ExtractError>;

    /// Text layer of page `index` (zero-based).
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Page`] if the page cannot be loaded.
    fn page_text(&self, index: usize) -> Result<String, ExtractError>;

    /// Page `index` rendered as a PNG image at `dpi`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Render`] if the page cannot be rendered.
    fn render_page_png(&self, index: usize, dpi: u32) -> Result<Vec<u8>, ExtractError>;
}

/// MuPDF-based implementation of [`PdfBackend`].
#[derive(Debug, Default, Clone, Copy)]
pub struct MupdfBackend;

impl MupdfBackend {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for MupdfBackend {
    fn open(&self, bytes: &[u8]) -> Result<Box<dyn PdfPages>, ExtractError> {
        let document =
            Document::from_bytes(bytes, "pdf").map_err(|e| ExtractError::Open(e.to_string()))?;
        Ok(Box::new(MupdfPages { document }))
    }
}

struct MupdfPages {
    document: Document,
}

impl MupdfPages {
    fn load(&self, index: usize) -> Result<mupdf::Page, ExtractError> {
        let number = i32::try_from(index).map_err(|e| ExtractError::page(index, e))?;
        self.document
            .load_page(number)
            .map_err(|e| ExtractError::page(index, e))
    }
}

impl PdfPages for MupdfPages {
    fn page_count(&self) -> Result<usize, ExtractError> {
        let count = self
            .document
            .page_count()
            .map_err(|e| ExtractError::Open(e.to_string()))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn page_text(&self, index: usize) -> Result<String, ExtractError> {
        let page = self.load(index)?;
        let text_page = page
            .to_text_page(TextPageFlags::empty())
            .map_err(|e| ExtractError::page(index, e))?;

        let mut text = String::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                text.extend(line.chars().map(|c| c.char().unwrap_or('\u{FFFD}')));
                text.push('\n');
            }
        }
        Ok(text)
    }

    fn render_page_png(&self, index: usize, dpi: u32) -> Result<Vec<u8>, ExtractError> {
        let page = self.load(index)?;
        #[allow(clippy::cast_precision_loss)]
        let scale = dpi as f32 / POINTS_PER_INCH;
        let pixmap = page
            .to_pixmap(
                &Matrix::new_scale(scale, scale),
                &Colorspace::device_rgb(),
                false,
                true,
            )
            .map_err(|e| ExtractError::render(index, e))?;

        let mut png = Vec::new();
        pixmap
            .write_to(&mut png, ImageFormat::PNG)
            .map_err(|e| ExtractError::render(index, e))?;
        Ok(png)
    }
}
