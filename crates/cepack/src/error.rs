use std::path::PathBuf;

use cepack_config::ConfigError;

/// Error types for cepack operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid options or unreadable project metadata.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The script-engine compatibility shim is not installed.
    #[error("script-engine shim not found: {}", .path.display())]
    ShimNotFound { path: PathBuf },

    /// The external native-script compiler reported a failure.
    #[error("external compiler failed: {message}")]
    ExternalCompilerFailure { message: String },

    /// The configuration could not be rendered as JSON.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for cepack operations.
pub type Result<T> = std::result::Result<T, Error>;

impl miette::Diagnostic for Error {
    fn code(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        Some(Box::new(match self {
            Error::Config(ConfigError::MissingRequiredOption { .. }) => "MISSING_OPTION",
            Error::Config(ConfigError::InvalidTargetType { .. }) => "INVALID_TARGET_TYPE",
            Error::Config(ConfigError::ManifestNotFound { .. }) => "MANIFEST_NOT_FOUND",
            Error::Config(_) => "INVALID_CONFIG",
            Error::ShimNotFound { .. } => "SHIM_NOT_FOUND",
            Error::ExternalCompilerFailure { .. } => "COMPILER_FAILURE",
            Error::Serialization(_) => "SERIALIZATION_ERROR",
            Error::Io(_) => "IO_ERROR",
        }))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(miette::Severity::Error)
    }

    fn help(&self) -> Option<Box<dyn std::fmt::Display + '_>> {
        match self {
            Error::Config(ConfigError::ManifestNotFound { path }) => Some(Box::new(format!(
                "No package.json at {}.\nPass `root` pointing at the project, or supply `pkg` directly.",
                path.display()
            ))),
            Error::ShimNotFound { .. } => Some(Box::new(
                "Install the shim package: npm install --save-dev extendscript-es5-shim-ts",
            )),
            _ => None,
        }
    }
}
