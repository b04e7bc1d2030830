use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{LibraryError, LibraryResult};
use crate::models::Book;

use super::json;

/// The canonical library file plus its optional backup copy.
#[derive(Debug, Clone)]
pub struct LibraryStore {
    path: PathBuf,
    backup: Option<PathBuf>,
}

impl LibraryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            backup: None,
        }
    }

    /// Copy the previous canonical file to `backup` before every save.
    pub fn with_backup(mut self, backup: impl Into<PathBuf>) -> Self {
        self.backup = Some(backup.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> Option<&Path> {
        self.backup.as_deref()
    }

    /// Load the canonical file. Absence means a fresh, empty library.
    pub fn load(&self) -> LibraryResult<Vec<Book>> {
        let books = json::read_books_or_empty(&self.path)?;
        info!(path = %self.path.display(), count = books.len(), "loaded library");
        Ok(books)
    }

    /// Persist `books`. The previous canonical file, if any, is copied to the
    /// backup location first and the new contents land via an atomic rename,
    /// so one good copy survives any failure along the way.
    pub fn save(&self, books: &[Book]) -> LibraryResult<()> {
        if let Some(backup) = &self.backup {
            self.copy_to_backup(backup)?;
        }
        json::write_books(&self.path, books)?;
        info!(path = %self.path.display(), count = books.len(), "saved library");
        Ok(())
    }

    fn copy_to_backup(&self, backup: &Path) -> LibraryResult<()> {
        if !self.path.exists() {
            return Ok(());
        }
        if let Some(parent) = backup.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| LibraryError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::copy(&self.path, backup).map_err(|source| LibraryError::Write {
            path: backup.to_path_buf(),
            source,
        })?;
        debug!(backup = %backup.display(), "copied previous library to backup");
        Ok(())
    }
}
