//! Core library surface for the personal library manager.
//!
//! The record model, catalog operations, and persistence are usable without
//! the terminal UI; the `bin` target only wires them to [`ui::run_app`].
pub mod catalog;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod session;
pub mod storage;
pub mod ui;

/// The in-memory store and its query types.
pub use catalog::{Library, SearchQuery, SortKey, Statistics};
pub use config::Config;
pub use error::{LibraryError, LibraryResult};
pub use models::{Book, NewBook};
pub use session::Session;
pub use storage::{FileFormat, LibraryStore};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
