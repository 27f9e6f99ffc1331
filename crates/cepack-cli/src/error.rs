//! Error handling for the cepack CLI.
//!
//! Library errors keep their own diagnostics (codes and help text) and are
//! reported through `miette`; the CLI only adds the failures that belong to
//! it, like unreadable option files.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Assembly or validation failed
    #[error(transparent)]
    Cepack(#[from] cepack::Error),

    /// The options file (or an environment override) could not be parsed
    #[error("Invalid options in {source_name}: {message}\n\nHint: {hint}")]
    InvalidOptions {
        source_name: String,
        message: String,
        hint: String,
    },

    /// `--config` pointed at a file that does not exist
    #[error("Options file not found: {}\n\nHint: Create a cepack.json file or drop --config", .0.display())]
    OptionsFileNotFound(PathBuf),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<cepack_config::ConfigError> for CliError {
    fn from(err: cepack_config::ConfigError) -> Self {
        CliError::Cepack(err.into())
    }
}

pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Convert a CLI error into a report for `main`.
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match err {
        CliError::Cepack(e) => miette::Report::new(e),
        other => miette::miette!("{}", other),
    }
}
