use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{LibraryError, LibraryResult};
use crate::models::Book;

/// Read a JSON array of books. A missing file is an error here; callers that
/// treat absence as "empty" check for it themselves.
pub fn read_books(path: &Path) -> LibraryResult<Vec<Book>> {
    let data = fs::read_to_string(path).map_err(|source| LibraryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| LibraryError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Like [`read_books`], but a missing file yields an empty list.
pub(crate) fn read_books_or_empty(path: &Path) -> LibraryResult<Vec<Book>> {
    match read_books(path) {
        Err(LibraryError::Read { source, .. }) if source.kind() == ErrorKind::NotFound => {
            Ok(Vec::new())
        }
        other => other,
    }
}

/// Write the books as an indented JSON array.
pub fn write_books(path: &Path, books: &[Book]) -> LibraryResult<()> {
    let json = serde_json::to_string_pretty(books).map_err(LibraryError::Serialize)?;
    super::write_atomic(path, json.as_bytes())
}
