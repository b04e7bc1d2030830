//! The running session: the in-memory library plus the store it came from.
//! All mutations go through here so the "unsaved changes" flag stays honest
//! and import/export see the same data the UI shows.

use std::path::Path;

use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::{Library, SortKey};
use crate::error::{LibraryError, LibraryResult};
use crate::models::{Book, NewBook};
use crate::storage::{FileFormat, LibraryStore};

pub struct Session {
    library: Library,
    store: LibraryStore,
    modified: bool,
}

impl Session {
    /// Load the library behind `store`. A load failure is handed back next to
    /// an empty session instead of aborting, so the caller can report it and
    /// carry on.
    pub fn open(store: LibraryStore) -> (Self, Option<LibraryError>) {
        let (books, error) = match store.load() {
            Ok(books) => (books, None),
            Err(err) => {
                warn!(error = %err, "could not load library, starting empty");
                (Vec::new(), Some(err))
            }
        };
        let session = Self {
            library: Library::from_books(books),
            store,
            modified: false,
        };
        (session, error)
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn store(&self) -> &LibraryStore {
        &self.store
    }

    /// True after any change since the last load or save.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn add(&mut self, fields: NewBook) -> &Book {
        self.modified = true;
        let book = self.library.add(fields);
        info!(id = %book.id, title = %book.title, "added book");
        book
    }

    /// Remove every book titled `title` (case-insensitive).
    pub fn remove_by_title(&mut self, title: &str) -> usize {
        let removed = self.library.remove_by_title(title);
        if removed > 0 {
            self.modified = true;
            info!(title, removed, "removed books by title");
        }
        removed
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Book> {
        let book = self.library.remove(id)?;
        self.modified = true;
        info!(%id, title = %book.title, "removed book");
        Some(book)
    }

    pub fn toggle_read(&mut self, id: Uuid) -> Option<bool> {
        let read = self.library.toggle_read(id)?;
        self.modified = true;
        Some(read)
    }

    pub fn sort(&mut self, key: SortKey) {
        self.library.sort(key);
        self.modified = true;
    }

    pub fn save(&mut self) -> LibraryResult<()> {
        if let Err(err) = self.store.save(self.library.books()) {
            warn!(error = %err, "save failed");
            return Err(err);
        }
        self.modified = false;
        Ok(())
    }

    /// Append every record in `path`. The file is parsed completely before
    /// anything is appended, so a bad row leaves the library as it was.
    pub fn import(&mut self, path: &Path) -> LibraryResult<usize> {
        let result = FileFormat::from_path(path).and_then(|format| format.read(path));
        let books = match result {
            Ok(books) => books,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "import failed");
                return Err(err);
            }
        };
        let count = books.len();
        if count > 0 {
            let reassigned = self.library.extend(books);
            if reassigned > 0 {
                info!(reassigned, "assigned new ids to imported duplicates");
            }
            self.modified = true;
        }
        info!(path = %path.display(), count, "imported books");
        Ok(count)
    }

    /// Write the whole library to `path` in the format its extension names.
    pub fn export(&self, path: &Path) -> LibraryResult<usize> {
        let result = FileFormat::from_path(path)
            .and_then(|format| format.write(path, self.library.books()));
        if let Err(err) = result {
            warn!(path = %path.display(), error = %err, "export failed");
            return Err(err);
        }
        let count = self.library.len();
        info!(path = %path.display(), count, "exported books");
        Ok(count)
    }
}
