//! Comma-separated import/export. Columns are matched by header name so
//! spreadsheets that reorder them still import; exports always use `HEADER`
//! order.

use std::fs::File;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{LibraryError, LibraryResult};
use crate::models::{format_rating, parse_rating, parse_year, Book, NewBook, UNRATED};

/// Column names, in export order.
pub const HEADER: [&str; 6] = [
    "title",
    "author",
    "publication_year",
    "genre",
    "read_status",
    "rating",
];

/// Raw text of one imported row. Fields are parsed afterwards so errors can
/// name the offending line.
#[derive(Debug, Deserialize)]
struct ImportRow {
    title: String,
    author: String,
    publication_year: String,
    genre: String,
    read_status: String,
    rating: String,
}

impl ImportRow {
    fn into_book(self) -> Result<Book, String> {
        let publication_year = parse_year(&self.publication_year).map_err(|e| e.to_string())?;
        let rating = parse_rating(&self.rating).map_err(|e| e.to_string())?;
        Ok(Book::new(NewBook {
            title: self.title,
            author: self.author,
            publication_year,
            genre: self.genre,
            // Anything other than "yes" counts as unread.
            read_status: self.read_status.trim().eq_ignore_ascii_case("yes"),
            rating,
        }))
    }
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    title: &'a str,
    author: &'a str,
    publication_year: i32,
    genre: &'a str,
    read_status: &'static str,
    rating: String,
}

impl<'a> From<&'a Book> for ExportRow<'a> {
    fn from(book: &'a Book) -> Self {
        Self {
            title: &book.title,
            author: &book.author,
            publication_year: book.publication_year,
            genre: &book.genre,
            read_status: if book.read_status { "yes" } else { "no" },
            rating: book
                .rating
                .map(format_rating)
                .unwrap_or_else(|| UNRATED.to_string()),
        }
    }
}

/// Parse every row of a CSV file. The first bad row aborts the whole read.
pub fn read_books(path: &Path) -> LibraryResult<Vec<Book>> {
    let file = File::open(path).map_err(|source| LibraryError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = ReaderBuilder::new().trim(Trim::Headers).from_reader(file);

    let headers = reader
        .headers()
        .map_err(|source| csv_error(path, source))?
        .clone();
    if let Some(missing) = HEADER
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(LibraryError::InvalidRow {
            path: path.to_path_buf(),
            line: 1,
            message: format!("missing column \"{missing}\""),
        });
    }

    let mut books = Vec::new();
    let mut record = StringRecord::new();
    while reader
        .read_record(&mut record)
        .map_err(|source| csv_error(path, source))?
    {
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let invalid = |message: String| LibraryError::InvalidRow {
            path: path.to_path_buf(),
            line,
            message,
        };
        let row: ImportRow = record
            .deserialize(Some(&headers))
            .map_err(|err| invalid(err.to_string()))?;
        books.push(row.into_book().map_err(invalid)?);
    }

    Ok(books)
}

/// Write the books as CSV. The header is always written, even for an empty
/// library, and the file only appears once fully rendered.
pub fn write_books(path: &Path, books: &[Book]) -> LibraryResult<()> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer
        .write_record(HEADER)
        .map_err(|source| csv_error(path, source))?;
    for book in books {
        writer
            .serialize(ExportRow::from(book))
            .map_err(|source| csv_error(path, source))?;
    }
    let bytes = writer.into_inner().map_err(|err| LibraryError::Write {
        path: path.to_path_buf(),
        source: err.into_error(),
    })?;
    super::write_atomic(path, &bytes)
}

/// Structural CSV errors that carry a position are reported per line.
fn csv_error(path: &Path, source: csv::Error) -> LibraryError {
    match source.position().map(|pos| pos.line()) {
        Some(line) => LibraryError::InvalidRow {
            path: path.to_path_buf(),
            line,
            message: source.to_string(),
        },
        None => LibraryError::Csv {
            path: path.to_path_buf(),
            source,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn write(dir: &tempfile::TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn reads_rows_with_reordered_columns() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write(
            &dir,
            "in.csv",
            "author,title,genre,publication_year,rating,read_status\n\
             Frank Herbert,Dune,SF,1965,5,Yes\n\
             \"Roe, Jane\",Foo,Drama,1999,N/A,no\n",
        );

        let books = read_books(&path).unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].title, "Dune");
        assert!(books[0].read_status);
        assert_eq!(books[0].rating, Some(5.0));
        assert_eq!(books[1].author, "Roe, Jane");
        assert!(!books[1].read_status);
        assert_eq!(books[1].rating, None);
    }

    #[test]
    fn bad_year_names_the_line() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write(
            &dir,
            "bad.csv",
            "title,author,publication_year,genre,read_status,rating\n\
             Dune,Frank Herbert,1965,SF,yes,5\n\
             Foo,Jane Roe,nineteen,Drama,no,3\n",
        );

        match read_books(&path) {
            Err(LibraryError::InvalidRow { line, message, .. }) => {
                assert_eq!(line, 3);
                assert!(message.contains("nineteen"));
            }
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn missing_column_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write(&dir, "cols.csv", "title,author\nDune,Frank Herbert\n");

        match read_books(&path) {
            Err(LibraryError::InvalidRow { line, message, .. }) => {
                assert_eq!(line, 1);
                assert!(message.contains("publication_year"));
            }
            other => panic!("expected missing column, got {other:?}"),
        }
    }

    #[test]
    fn empty_library_still_gets_header() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        write_books(&path, &[]).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "title,author,publication_year,genre,read_status,rating\n"
        );
    }

    #[test]
    fn export_maps_read_status_and_rating() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let mut rated = Book::new(NewBook {
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            publication_year: 1965,
            genre: "SF".into(),
            read_status: true,
            rating: Some(4.5),
        });
        let unrated = Book {
            read_status: false,
            rating: None,
            ..rated.clone()
        };
        rated.title = "Dune, Messiah".into();

        write_books(&path, &[rated, unrated]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "\"Dune, Messiah\",Frank Herbert,1965,SF,yes,4.5");
        assert_eq!(lines[2], "Dune,Frank Herbert,1965,SF,no,N/A");
    }
}
