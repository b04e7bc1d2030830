//! Binary entry point: resolve paths, start logging, load the library, and
//! drive the Ratatui event loop until the user exits.
use anyhow::Context;
use library_manager::{logging, run_app, App, Config, Session};
use tracing::info;

/// Load the library and launch the UI. Only setup failures (no home
/// directory, unusable terminal) escape as errors; a damaged library file is
/// reported inside the UI instead.
fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("failed to resolve data directory")?;
    logging::init(&config)?;
    info!(data_dir = %config.data_dir.display(), "starting library manager");

    let (session, load_error) = Session::open(config.store());
    let mut app = App::new(session);
    if let Some(err) = load_error {
        app.report_load_error(&err);
    }

    run_app(&mut app)
}
