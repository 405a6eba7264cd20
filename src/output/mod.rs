//! CSV output of harvested records.

mod error;

pub use error::OutputError;

use std::fs;
use std::path::Path;

use tracing::info;

use crate::record::DocumentRecord;

/// Header row of the output table.
pub const CSV_HEADER: &str = "Date,Document_Symbol,Title,PDF_URL,Extracted_Text_Snippet";

/// Quotes a field when it contains a quote, comma or line break.
fn csv_escape(s: &str) -> String {
    if s.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Renders `records` as CSV text, header included.
#[must_use]
pub fn render_csv(records: &[DocumentRecord]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for record in records {
        let row = [
            csv_escape(record.date()),
            csv_escape(record.document_symbol()),
            csv_escape(record.title()),
            csv_escape(record.pdf_url()),
            csv_escape(&record.extracted_text_snippet()),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Writes `records` to `path` as UTF-8 CSV, creating the parent directory.
///
/// # Errors
///
/// Returns [`OutputError`] if the directory or file cannot be written.
pub fn write_csv(path: &Path, records: &[DocumentRecord]) -> Result<(), OutputError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| OutputError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, render_csv(records)).map_err(|source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(records = records.len(), path = %path.display(), "Saved records");
    Ok(())
}
