//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, progress displays,
//! logging setup and the command runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod logging;
pub mod presenter;
pub mod progress;

// Re-export commonly used types
pub use app::{BatchArgs, ServiceSettings, EXIT_ERROR, EXIT_SUCCESS};
pub use args::{Cli, Commands, ConfigAction, TranscribeArgs};
pub use presenter::Presenter;
