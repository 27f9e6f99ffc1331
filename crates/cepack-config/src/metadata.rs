//! Project-level build metadata.
//!
//! The metadata (bundle name, dev-server defaults, extension profiles) is
//! derived from the project manifest by a [`MetadataProvider`].
//! [`ProjectMetadataResolver`] only supplies defaults for its two inputs and
//! hands the provider's answer back unchanged.

use figment::{Figment, providers::Serialized};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::ambient::AmbientEnv;
use crate::error::{ConfigError, Result};
use crate::manifest::Manifest;
use crate::options::ValidatedOptions;

/// Per-extension overrides, selected by `id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionProfile {
    /// Empty when the manifest omits it; such a profile is never selected
    #[serde(default)]
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dev_host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_filename: Option<String>,
}

impl ExtensionProfile {
    /// Whether this profile is the one for extension `id`.
    pub fn is_for(&self, id: &str) -> bool {
        !self.id.is_empty() && self.id == id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    #[serde(alias = "name")]
    pub bundle_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_id: Option<String>,

    pub dev_port: u16,

    pub dev_host: String,

    pub html_filename: String,

    /// Extension profiles, in manifest order
    #[serde(default)]
    pub extensions: Vec<ExtensionProfile>,
}

impl Default for ProjectMetadata {
    fn default() -> Self {
        Self {
            bundle_name: "CEP Extension".to_string(),
            bundle_id: Some("com.mycompany.myextension".to_string()),
            dev_port: 8080,
            dev_host: "localhost".to_string(),
            html_filename: "index.html".to_string(),
            extensions: Vec::new(),
        }
    }
}

/// Source of project metadata.
///
/// Implement this to plug in a different metadata resolver; the default is
/// [`ManifestMetadataProvider`].
pub trait MetadataProvider {
    fn project_metadata(&self, manifest: &Manifest, environment: Option<&str>) -> Result<ProjectMetadata>;
}

/// Derives metadata from the manifest's `cep` block.
///
/// Layers, lowest priority first:
/// 1. built-in defaults ([`ProjectMetadata::default`])
/// 2. the `cep` object
/// 3. the `cep.<environment>` object
/// 4. `CEP_NAME`, `CEP_ID`, `CEP_DEV_PORT`, `CEP_DEV_HOST`, `CEP_HTML_FILENAME`
#[derive(Debug, Clone, Default)]
pub struct ManifestMetadataProvider {
    overrides: EnvOverrides,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
struct EnvOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    bundle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bundle_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dev_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dev_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    html_filename: Option<String>,
}

const METADATA_FIELDS: &[&str] = &[
    "bundleName",
    "bundleId",
    "devPort",
    "devHost",
    "htmlFilename",
    "extensions",
];

impl ManifestMetadataProvider {
    /// Provider without environment-variable overrides.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that applies `CEP_*` overrides from the snapshot.
    pub fn from_ambient(ambient: &AmbientEnv) -> Result<Self> {
        let dev_port = ambient
            .var("CEP_DEV_PORT")
            .map(|raw| {
                raw.parse::<u16>().map_err(|e| ConfigError::InvalidValue {
                    field: "CEP_DEV_PORT".to_string(),
                    hint: Some(format!("expected a port number, got '{raw}': {e}")),
                })
            })
            .transpose()?;

        Ok(Self {
            overrides: EnvOverrides {
                bundle_name: ambient.var("CEP_NAME").map(str::to_string),
                bundle_id: ambient.var("CEP_ID").map(str::to_string),
                dev_port,
                dev_host: ambient.var("CEP_DEV_HOST").map(str::to_string),
                html_filename: ambient.var("CEP_HTML_FILENAME").map(str::to_string),
            },
        })
    }
}

impl MetadataProvider for ManifestMetadataProvider {
    fn project_metadata(&self, manifest: &Manifest, environment: Option<&str>) -> Result<ProjectMetadata> {
        let cep = manifest.cep.as_ref().and_then(Value::as_object);

        let mut figment = Figment::from(Serialized::defaults(ProjectMetadata::default()));

        if let Some(cep) = cep {
            figment = figment.merge(Serialized::defaults(metadata_layer(cep)));

            let env_block = environment
                .and_then(|env| cep.get(env))
                .and_then(Value::as_object);
            if let Some(env_block) = env_block {
                debug!(environment, "applying environment-specific cep block");
                figment = figment.merge(Serialized::defaults(metadata_layer(env_block)));
            }
        }

        figment = figment.merge(Serialized::defaults(&self.overrides));

        figment.extract().map_err(|e| ConfigError::InvalidValue {
            field: "cep".to_string(),
            hint: Some(e.to_string()),
        })
    }
}

/// Keep only metadata keys, accepting `name` as a spelling of `bundleName`.
fn metadata_layer(block: &Map<String, Value>) -> Map<String, Value> {
    let mut layer = Map::new();
    for (key, value) in block {
        let key = match key.as_str() {
            "name" if !block.contains_key("bundleName") => "bundleName",
            other => other,
        };
        if METADATA_FIELDS.contains(&key) && !value.is_null() {
            layer.insert(key.to_string(), value.clone());
        }
    }
    layer
}

/// Supplies the manifest and environment name, then defers to a provider.
pub struct ProjectMetadataResolver<'a> {
    provider: &'a dyn MetadataProvider,
    ambient: &'a AmbientEnv,
}

impl<'a> ProjectMetadataResolver<'a> {
    pub fn new(provider: &'a dyn MetadataProvider, ambient: &'a AmbientEnv) -> Self {
        Self { provider, ambient }
    }

    /// Resolve metadata for a project.
    ///
    /// `manifest` defaults to `root/package.json`, `environment` to the
    /// snapshot's `NODE_ENV`.
    ///
    /// # Errors
    ///
    /// `ConfigError::ManifestNotFound` when no manifest is given and none
    /// exists under `root`; anything the provider returns.
    pub fn resolve(
        &self,
        manifest: Option<&Manifest>,
        environment: Option<&str>,
        root: &std::path::Path,
    ) -> Result<ProjectMetadata> {
        let environment = environment.or_else(|| self.ambient.environment_name());

        let loaded;
        let manifest = match manifest {
            Some(manifest) => manifest,
            None => {
                loaded = Manifest::load(root)?;
                &loaded
            }
        };

        self.provider.project_metadata(manifest, environment)
    }

    /// Resolve metadata for validated options.
    pub fn resolve_for(&self, options: &ValidatedOptions) -> Result<ProjectMetadata> {
        self.resolve(options.pkg.as_ref(), options.env.as_deref(), &options.root)
    }
}
