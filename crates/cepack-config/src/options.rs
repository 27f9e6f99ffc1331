//! User-facing build options.
//!
//! `BuildOptions` is the raw option bag a caller hands to cepack. Every
//! optional field is an `Option` so that "explicitly supplied" can be told
//! apart from "left out": `is_dev: Some(false)` is a production request,
//! `is_dev: None` is not. Unknown keys survive in `extra` and are carried
//! forward to the external compiler untouched.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ConfigError, Result};
use crate::manifest::Manifest;

/// Compilation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetType {
    /// Web UI running inside the CEP embedding shell
    #[serde(alias = "cep")]
    Panel,
    /// Single-file ExtendScript bundle for the host application's interpreter
    #[serde(alias = "extendscript")]
    ScriptEngine,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetType::Panel => "panel",
            TargetType::ScriptEngine => "script-engine",
        }
    }
}

impl FromStr for TargetType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "panel" | "cep" => Ok(TargetType::Panel),
            "script-engine" | "extendscript" => Ok(TargetType::ScriptEngine),
            other => Err(ConfigError::InvalidTargetType {
                value: Some(other.to_string()),
            }),
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw build options as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildOptions {
    /// Entry module
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entry: Option<PathBuf>,

    /// Output directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out: Option<PathBuf>,

    /// Target type, kept as the caller's string until validation
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    /// Project root (defaults to the working directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Environment name used to select `cep.<env>` overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env: Option<String>,

    /// Pre-loaded project manifest (skips reading `package.json`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pkg: Option<Manifest>,

    /// Extension identifier selecting one of the project's extension profiles
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_dev: Option<bool>,

    /// Unrecognized options, passed through unchanged
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl BuildOptions {
    /// Create options with the three required fields set.
    ///
    /// # Example
    ///
    /// ```
    /// use cepack_config::{BuildOptions, TargetType};
    ///
    /// let options = BuildOptions::new("src/panel/index.ts", "dist", TargetType::Panel)
    ///     .with_id("com.example.panel")
    ///     .with_dev_port(3001);
    /// assert_eq!(options.target.as_deref(), Some("panel"));
    /// ```
    pub fn new(entry: impl Into<PathBuf>, out: impl Into<PathBuf>, target: TargetType) -> Self {
        Self {
            entry: Some(entry.into()),
            out: Some(out.into()),
            target: Some(target.as_str().to_string()),
            ..Self::default()
        }
    }

    /// Create from serde_json::Value (for programmatic option bags)
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "options".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Convert to a JSON object containing only the fields that were supplied.
    pub fn to_map(&self) -> Result<Map<String, Value>> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Ok(Map::new()),
            Err(e) => Err(ConfigError::InvalidValue {
                field: "options".to_string(),
                hint: Some(e.to_string()),
            }),
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    pub fn with_pkg(mut self, pkg: Manifest) -> Self {
        self.pkg = Some(pkg);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_dev_port(mut self, port: u16) -> Self {
        self.dev_port = Some(port);
        self
    }

    pub fn with_dev_host(mut self, host: impl Into<String>) -> Self {
        self.dev_host = Some(host.into());
        self
    }

    pub fn with_html_filename(mut self, filename: impl Into<String>) -> Self {
        self.html_filename = Some(filename.into());
        self
    }

    pub fn with_out_name(mut self, name: impl Into<String>) -> Self {
        self.out_name = Some(name.into());
        self
    }

    pub fn with_is_dev(mut self, is_dev: bool) -> Self {
        self.is_dev = Some(is_dev);
        self
    }

    /// Attach an option cepack does not interpret itself.
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Options that passed validation, with ambient defaults filled in.
///
/// Only produced by [`crate::validate`]; holds on to the caller's original
/// request so it can be forwarded verbatim to the external compiler.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedOptions {
    pub entry: PathBuf,
    pub out: PathBuf,
    pub target: TargetType,
    pub root: PathBuf,
    pub env: Option<String>,
    pub pkg: Option<Manifest>,
    pub id: Option<String>,
    pub dev_port: Option<u16>,
    pub dev_host: Option<String>,
    pub html_filename: Option<String>,
    pub out_name: Option<String>,
    pub is_dev: Option<bool>,
    original: BuildOptions,
}

impl ValidatedOptions {
    pub(crate) fn new(
        entry: PathBuf,
        out: PathBuf,
        target: TargetType,
        root: PathBuf,
        env: Option<String>,
        original: BuildOptions,
    ) -> Self {
        Self {
            entry,
            out,
            target,
            root,
            env,
            pkg: original.pkg.clone(),
            id: original.id.clone(),
            dev_port: original.dev_port,
            dev_host: original.dev_host.clone(),
            html_filename: original.html_filename.clone(),
            out_name: original.out_name.clone(),
            is_dev: original.is_dev,
            original,
        }
    }

    /// The options exactly as the caller supplied them.
    pub fn original(&self) -> &BuildOptions {
        &self.original
    }

    pub fn extra(&self) -> &IndexMap<String, Value> {
        &self.original.extra
    }
}
