//! Logging and progress reporting

pub mod log;
pub mod progress;

pub use self::log::{init_logging, log_load_complete, log_load_start, log_warning};
pub use self::progress::{create_file_progress_bar, finish_progress_bar};
