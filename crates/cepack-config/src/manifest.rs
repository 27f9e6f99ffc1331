//! Project manifest (`package.json`) loading.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{ConfigError, Result};

pub const MANIFEST_FILE: &str = "package.json";

/// The parts of `package.json` cepack reads. Everything else is preserved in
/// `rest` so the manifest can be handed on unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub dependencies: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub dev_dependencies: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub peer_dependencies: IndexMap<String, String>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub optional_dependencies: IndexMap<String, String>,

    /// Extension metadata block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cep: Option<Value>,

    #[serde(flatten)]
    pub rest: IndexMap<String, Value>,
}

impl Manifest {
    /// Location of the manifest inside a project root.
    pub fn path_in(root: &Path) -> PathBuf {
        root.join(MANIFEST_FILE)
    }

    /// Load `package.json` from a project root.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ManifestNotFound` if the file does not exist and
    /// `ConfigError::InvalidManifest` if it is not valid JSON.
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path_in(root);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigError::ManifestNotFound { path });
            }
            Err(err) => return Err(err.into()),
        };

        debug!(path = %path.display(), "loaded project manifest");
        Self::from_json(&content).map_err(|message| ConfigError::InvalidManifest { path, message })
    }

    fn from_json(content: &str) -> std::result::Result<Self, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }

    /// Create from serde_json::Value
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "pkg".to_string(),
            hint: Some(e.to_string()),
        })
    }

    /// Packages that must stay outside the bundle at runtime.
    ///
    /// Runtime, peer and optional dependencies. A package listed only under
    /// `devDependencies` is inlined; one that also appears in a runtime table
    /// stays external. Sorted.
    pub fn runtime_dependencies(&self) -> Vec<String> {
        let names: BTreeSet<&str> = self
            .dependencies
            .keys()
            .chain(self.peer_dependencies.keys())
            .chain(self.optional_dependencies.keys())
            .map(String::as_str)
            .collect();
        names.into_iter().map(str::to_string).collect()
    }
}
