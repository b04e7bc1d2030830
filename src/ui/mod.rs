//! Ratatui front-end: a numbered main menu, modal forms for each action, and
//! list/statistics screens. All state lives in [`App`]; [`run_app`] owns the
//! terminal.

mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
