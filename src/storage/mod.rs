//! Persistence split across the canonical library file and the two
//! import/export formats.

mod json;
mod store;
mod tabular;

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use crate::error::{LibraryError, LibraryResult};
use crate::models::Book;

pub use json::{read_books as read_json, write_books as write_json};
pub use store::LibraryStore;
pub use tabular::{read_books as read_csv, write_books as write_csv};

/// File formats supported by import and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Csv,
}

impl FileFormat {
    /// Pick the format from the file extension. `.txt` is treated as JSON
    /// because older library files used that name.
    pub fn from_path(path: &Path) -> LibraryResult<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("json") | Some("txt") => Ok(FileFormat::Json),
            Some("csv") => Ok(FileFormat::Csv),
            _ => Err(LibraryError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FileFormat::Json => "JSON",
            FileFormat::Csv => "CSV",
        }
    }

    /// Parse every record in `path`. Nothing is returned unless the whole
    /// file is valid.
    pub fn read(self, path: &Path) -> LibraryResult<Vec<Book>> {
        match self {
            FileFormat::Json => read_json(path),
            FileFormat::Csv => read_csv(path),
        }
    }

    pub fn write(self, path: &Path, books: &[Book]) -> LibraryResult<()> {
        match self {
            FileFormat::Json => write_json(path, books),
            FileFormat::Csv => write_csv(path, books),
        }
    }
}

/// Write `contents` to a uniquely named temp file in the same directory, then
/// rename it over `path`, so readers never observe a half-written file. The
/// temp file is removed again if anything fails before the rename.
pub(crate) fn write_atomic(path: &Path, contents: &[u8]) -> LibraryResult<()> {
    let parent = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(|source| write_error(parent, source))?;
            parent
        }
        None => Path::new("."),
    };

    let mut prefix = OsString::from(".");
    if let Some(name) = path.file_name() {
        prefix.push(name);
        prefix.push(".");
    }
    let mut tmp = tempfile::Builder::new()
        .prefix(&prefix)
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|source| write_error(parent, source))?;
    tmp.write_all(contents).map_err(|source| write_error(path, source))?;
    tmp.persist(path).map_err(|err| write_error(path, err.error))?;
    Ok(())
}

fn write_error(path: &Path, source: io::Error) -> LibraryError {
    LibraryError::Write {
        path: path.to_path_buf(),
        source,
    }
}
