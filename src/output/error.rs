//! Error types for writing the output table.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while writing the CSV file.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The parent directory could not be created.
    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        /// Directory that was being created.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The file could not be written.
    #[error("cannot write {path}: {source}")]
    Write {
        /// Output file path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}
