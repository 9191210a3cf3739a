//! Logging set-up and the message formats shared by the loader

use std::path::Path;
use std::time::Duration;

/// Initialise `env_logger`, defaulting to `info` when `RUST_LOG` is unset.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// `Reading <format> episodes from <path>`
pub fn log_load_start(format: &str, path: &Path) {
    ::log::info!("Reading {format} episodes from {}", path.display());
}

/// `Loaded <n> episode records from <path> in <elapsed>`
pub fn log_load_complete(path: &Path, records: usize, elapsed: Duration) {
    if records == 0 {
        ::log::warn!("No episode records in {} ({elapsed:?})", path.display());
    } else {
        ::log::info!(
            "Loaded {records} episode records from {} in {elapsed:?}",
            path.display()
        );
    }
}

/// Warning tied to an optional path
pub fn log_warning(message: &str, path: Option<&Path>) {
    match path {
        Some(path) => ::log::warn!("{message}: {}", path.display()),
        None => ::log::warn!("{message}"),
    }
}
