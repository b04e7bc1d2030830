use std::env;
use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::error::{LibraryError, LibraryResult};
use crate::storage::LibraryStore;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".library-manager";
/// Canonical library file inside the data directory.
const LIBRARY_FILE_NAME: &str = "library.json";
/// Previous canonical file, copied here before each save.
const BACKUP_FILE_NAME: &str = "library.backup.json";
const LOG_FILE_NAME: &str = "library-manager.log";

/// Overrides the data directory.
pub const HOME_ENV: &str = "LIBRARY_MANAGER_HOME";
/// `off`, `0`, `false` or `no` disables the backup copy.
pub const BACKUP_ENV: &str = "LIBRARY_MANAGER_BACKUP";
/// `tracing` filter directive for the log file.
pub const LOG_ENV: &str = "LIBRARY_MANAGER_LOG";

/// Resolved file locations for one run.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub library_file: PathBuf,
    pub backup_file: Option<PathBuf>,
    pub log_file: PathBuf,
}

impl Config {
    /// Resolve paths from the environment, defaulting to a folder in the
    /// user's home directory.
    pub fn from_env() -> LibraryResult<Self> {
        let data_dir = match env::var_os(HOME_ENV) {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => {
                let base_dirs = BaseDirs::new().ok_or(LibraryError::NoHomeDir)?;
                base_dirs.home_dir().join(DATA_DIR_NAME)
            }
        };
        let backup = env::var(BACKUP_ENV)
            .map(|value| backup_enabled(&value))
            .unwrap_or(true);

        let mut config = Self::in_dir(&data_dir);
        if !backup {
            config.backup_file = None;
        }
        Ok(config)
    }

    /// Standard layout rooted at `dir`, backup enabled.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            data_dir: dir.to_path_buf(),
            library_file: dir.join(LIBRARY_FILE_NAME),
            backup_file: Some(dir.join(BACKUP_FILE_NAME)),
            log_file: dir.join(LOG_FILE_NAME),
        }
    }

    pub fn store(&self) -> LibraryStore {
        let store = LibraryStore::new(&self.library_file);
        match &self.backup_file {
            Some(backup) => store.with_backup(backup),
            None => store,
        }
    }
}

fn backup_enabled(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "off" | "0" | "false" | "no"
    )
}
