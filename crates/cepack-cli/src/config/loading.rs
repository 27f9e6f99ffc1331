use std::path::{Path, PathBuf};

use cepack::BuildOptions;
use cepack_config::AmbientEnv;
use figment::{
    Figment,
    providers::{Format as _, Json, Serialized},
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::cli::OptionArgs;
use crate::error::{CliError, Result};

/// Options file looked up in the project root when `--config` is not given.
pub const OPTIONS_FILE: &str = "cepack.json";

/// Prefix for environment variables that set options (`CEPACK_DEV_PORT`, ...).
pub const ENV_PREFIX: &str = "CEPACK_";

/// Load build options from every source.
///
/// Priority: CLI flags > `CEPACK_*` environment variables > options file >
/// defaults. Nothing here validates the result; a missing `entry` or an
/// unknown `type` is reported by the assembler like any other caller's.
pub fn load_options(args: &OptionArgs, ambient: &AmbientEnv) -> Result<BuildOptions> {
    let mut figment = Figment::from(Serialized::defaults(BuildOptions::default()));

    let options_file = options_file(args, ambient)?;
    if let Some(path) = &options_file {
        debug!(path = %path.display(), "reading options file");
        figment = figment.merge(Json::file(path));
    }

    figment = figment
        .merge(Serialized::defaults(env_overrides(ambient)))
        .merge(Serialized::defaults(args.to_options()));

    figment.extract().map_err(|e| CliError::InvalidOptions {
        source_name: options_file
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "command-line options".to_string()),
        message: e.to_string(),
        hint: format!("Check field names and types in {OPTIONS_FILE} and {ENV_PREFIX}* variables"),
    })
}

/// `CEPACK_*` variables from the captured environment, keyed by option name.
///
/// Values that parse as JSON (`7000`, `true`) keep that type; anything else
/// is a string.
fn env_overrides(ambient: &AmbientEnv) -> Map<String, Value> {
    ambient
        .vars()
        .iter()
        .filter_map(|(key, raw)| {
            let name = key.strip_prefix(ENV_PREFIX).filter(|name| !name.is_empty())?;
            let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.clone()));
            Some((camel_case(name), value))
        })
        .collect()
}

/// The options file to read, if any.
///
/// An explicit `--config` must exist; the default `cepack.json` is optional.
fn options_file(args: &OptionArgs, ambient: &AmbientEnv) -> Result<Option<PathBuf>> {
    if let Some(path) = &args.config {
        let path = resolve(path, ambient.cwd());
        if !path.is_file() {
            return Err(CliError::OptionsFileNotFound(path));
        }
        return Ok(Some(path));
    }

    let root = args
        .root
        .as_deref()
        .map(|root| resolve(root, ambient.cwd()))
        .unwrap_or_else(|| ambient.cwd().to_path_buf());
    let default_path = root.join(OPTIONS_FILE);
    Ok(default_path.is_file().then_some(default_path))
}

fn resolve(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// `dev_port` -> `devPort`, matching the options file's field names.
fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}
