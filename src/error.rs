//! Error type for the persistence layer.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading or writing library files.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a valid library file: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize library: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("{} line {line}: {message}", path.display())]
    InvalidRow {
        path: PathBuf,
        line: u64,
        message: String,
    },

    #[error("failed to process CSV file {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("unsupported file type for {}: use a .csv or .json file", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("could not locate home directory")]
    NoHomeDir,
}

/// Convenience alias for persistence results.
pub type LibraryResult<T> = std::result::Result<T, LibraryError>;
