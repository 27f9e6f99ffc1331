//! Option validation.
//!
//! Runs before anything else touches the options and never performs I/O:
//! a bad request fails here, before a manifest or shim file is read.

use std::path::PathBuf;

use tracing::debug;

use crate::ambient::AmbientEnv;
use crate::error::{ConfigError, Result};
use crate::options::{BuildOptions, TargetType, ValidatedOptions};

/// Trait for pluggable option validation strategies
pub trait OptionsValidator {
    /// Validate raw options and fill in ambient defaults
    fn validate(&self, options: BuildOptions, ambient: &AmbientEnv) -> Result<ValidatedOptions>;
}

/// Checks the required fields and the target type.
///
/// Fields are checked in the order `out`, `entry`, `type`; the first problem
/// wins. Everything else is passed through unchecked.
///
/// # Example
///
/// ```
/// use cepack_config::{AmbientEnv, BuildOptions, OptionsValidator, RequiredOptionsValidator, TargetType};
///
/// let ambient = AmbientEnv::new("/work/project");
/// let options = BuildOptions::new("src/jsx/main.ts", "dist", TargetType::ScriptEngine);
///
/// let validated = RequiredOptionsValidator.validate(options, &ambient).unwrap();
/// assert_eq!(validated.root, std::path::PathBuf::from("/work/project"));
/// ```
pub struct RequiredOptionsValidator;

impl OptionsValidator for RequiredOptionsValidator {
    fn validate(&self, options: BuildOptions, ambient: &AmbientEnv) -> Result<ValidatedOptions> {
        let out = require_path(&options.out, "out")?;
        let entry = require_path(&options.entry, "entry")?;

        let target = match options.target.as_deref() {
            Some(raw) => raw.parse::<TargetType>()?,
            None => return Err(ConfigError::InvalidTargetType { value: None }),
        };

        let root = options
            .root
            .clone()
            .unwrap_or_else(|| ambient.cwd().to_path_buf());
        let env = options
            .env
            .clone()
            .or_else(|| ambient.environment_name().map(str::to_string));

        debug!(kind = %target, entry = %entry.display(), out = %out.display(), "options validated");

        Ok(ValidatedOptions::new(entry, out, target, root, env, options))
    }
}

fn require_path(value: &Option<PathBuf>, field: &'static str) -> Result<PathBuf> {
    value
        .clone()
        .ok_or(ConfigError::MissingRequiredOption { field })
}

/// Convenience function for the default validator
pub fn validate(options: BuildOptions, ambient: &AmbientEnv) -> Result<ValidatedOptions> {
    RequiredOptionsValidator.validate(options, ambient)
}
