//! Error types for option validation and project metadata loading.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Option validation errors (no I/O has happened yet)
    #[error("{}", missing_option_message(.field))]
    MissingRequiredOption { field: &'static str },

    #[error(
        "Please specify the compilation type using the \"type\" parameter (valid values are \"panel\" or \"script-engine\"){}",
        .value.as_deref().map(|v| format!(", got \"{v}\"")).unwrap_or_default()
    )]
    InvalidTargetType { value: Option<String> },

    // Manifest and metadata errors
    #[error("project manifest not found: {}", .path.display())]
    ManifestNotFound { path: PathBuf },

    #[error("invalid project manifest {}: {message}", .path.display())]
    InvalidManifest { path: PathBuf, message: String },

    #[error("invalid config value for '{field}'{}", .hint.as_deref().map(|h| format!(": {h}")).unwrap_or_default())]
    InvalidValue { field: String, hint: Option<String> },

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn missing_option_message(field: &str) -> String {
    match field {
        "out" => "Please specify the output directory using the \"out\" parameter.".to_string(),
        "entry" => "Please specify the entry file using the \"entry\" parameter.".to_string(),
        other => format!("Please specify the \"{other}\" parameter."),
    }
}

impl ConfigError {
    /// Name of the missing option, if this is a missing-option error.
    pub fn missing_field(&self) -> Option<&'static str> {
        match self {
            ConfigError::MissingRequiredOption { field } => Some(*field),
            _ => None,
        }
    }
}
