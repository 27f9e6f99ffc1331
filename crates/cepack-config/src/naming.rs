//! Extension override resolution.
//!
//! Naming fields are layered, lowest priority first:
//!
//! 1. project defaults from [`ProjectMetadata`]
//! 2. the single extension profile matching the requested `id` (only the
//!    fields it actually sets)
//! 3. explicit user options
//!
//! A missing or ambiguous `id` match leaves the project defaults in place.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::metadata::{ExtensionProfile, ProjectMetadata};
use crate::options::ValidatedOptions;

/// Suffix appended to the entry's directory name to form the bundle file name.
pub const OUT_NAME_SUFFIX: &str = ".js";

/// Dev-server and naming fields after all layers are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedNaming {
    pub dev_port: u16,
    pub dev_host: String,
    pub html_filename: String,
    pub bundle_name: String,
    pub out_name: String,
}

/// Naming derived from the project alone, before user overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectNaming {
    pub dev_port: u16,
    pub dev_host: String,
    pub html_filename: String,
    pub bundle_name: String,
}

pub struct ExtensionOverrideResolver<'a> {
    metadata: &'a ProjectMetadata,
}

impl<'a> ExtensionOverrideResolver<'a> {
    pub fn new(metadata: &'a ProjectMetadata) -> Self {
        Self { metadata }
    }

    /// Project defaults overlaid with the matching extension profile.
    pub fn project_naming(&self, extension_id: Option<&str>) -> ProjectNaming {
        let mut naming = ProjectNaming {
            dev_port: self.metadata.dev_port,
            dev_host: self.metadata.dev_host.clone(),
            html_filename: self.metadata.html_filename.clone(),
            bundle_name: self.metadata.bundle_name.clone(),
        };

        if let Some(profile) = extension_id.and_then(|id| self.matching_profile(id)) {
            if let Some(port) = profile.dev_port {
                naming.dev_port = port;
            }
            if let Some(host) = &profile.dev_host {
                naming.dev_host = host.clone();
            }
            if let Some(filename) = &profile.html_filename {
                naming.html_filename = filename.clone();
            }
            if let Some(name) = &profile.name {
                naming.bundle_name = name.clone();
            }
        }

        naming
    }

    fn matching_profile(&self, id: &str) -> Option<&'a ExtensionProfile> {
        if self.metadata.extensions.is_empty() {
            return None;
        }

        let mut matches = self.metadata.extensions.iter().filter(|ext| ext.is_for(id));
        match (matches.next(), matches.next()) {
            (Some(profile), None) => Some(profile),
            (None, _) => {
                debug!(id, "no extension profile matches; using project defaults");
                None
            }
            (Some(_), Some(_)) => {
                debug!(id, "several extension profiles match; using project defaults");
                None
            }
        }
    }

    /// Full resolution: project, then extension profile, then user options.
    ///
    /// # Example
    ///
    /// ```
    /// use cepack_config::{AmbientEnv, BuildOptions, ExtensionOverrideResolver, ProjectMetadata, TargetType, validate};
    ///
    /// let options = validate(
    ///     BuildOptions::new("src/panel/index.ts", "/build", TargetType::Panel),
    ///     &AmbientEnv::new("/work"),
    /// )
    /// .unwrap();
    ///
    /// let metadata = ProjectMetadata { dev_port: 9000, ..ProjectMetadata::default() };
    /// let naming = ExtensionOverrideResolver::new(&metadata).resolve(&options);
    /// assert_eq!(naming.dev_port, 9000);
    /// assert_eq!(naming.out_name, "panel.js");
    /// ```
    pub fn resolve(&self, options: &ValidatedOptions) -> ResolvedNaming {
        let project = self.project_naming(options.id.as_deref());

        ResolvedNaming {
            dev_port: options.dev_port.unwrap_or(project.dev_port),
            dev_host: options.dev_host.clone().unwrap_or(project.dev_host),
            html_filename: options
                .html_filename
                .clone()
                .unwrap_or(project.html_filename),
            bundle_name: project.bundle_name,
            out_name: options
                .out_name
                .clone()
                .unwrap_or_else(|| derive_out_name(&options.entry)),
        }
    }
}

/// Bundle file name for an entry: its directory's name plus `.js`.
///
/// `src/panel/index.ts` becomes `panel.js`. An entry with no named parent
/// directory falls back to its own file stem.
pub fn derive_out_name(entry: &Path) -> String {
    let stem = entry
        .parent()
        .and_then(Path::file_name)
        .or_else(|| entry.file_stem())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bundle".to_string());
    format!("{stem}{OUT_NAME_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn profile(id: &str) -> ExtensionProfile {
        ExtensionProfile {
            id: id.to_string(),
            ..ExtensionProfile::default()
        }
    }

    #[test]
    fn absent_profile_fields_keep_defaults() {
        let metadata = ProjectMetadata {
            extensions: vec![ExtensionProfile {
                dev_port: Some(3101),
                ..profile("com.example.panel")
            }],
            ..ProjectMetadata::default()
        };

        let naming = ExtensionOverrideResolver::new(&metadata).project_naming(Some("com.example.panel"));
        assert_eq!(naming.dev_port, 3101);
        assert_eq!(naming.dev_host, "localhost");
        assert_eq!(naming.html_filename, "index.html");
        assert_eq!(naming.bundle_name, "CEP Extension");
    }

    #[test]
    fn ambiguous_match_falls_back() {
        let metadata = ProjectMetadata {
            extensions: vec![
                ExtensionProfile { dev_port: Some(1), ..profile("dup") },
                ExtensionProfile { dev_port: Some(2), ..profile("dup") },
            ],
            ..ProjectMetadata::default()
        };

        let naming = ExtensionOverrideResolver::new(&metadata).project_naming(Some("dup"));
        assert_eq!(naming.dev_port, 8080);
    }

    #[test]
    fn no_id_ignores_profiles() {
        let metadata = ProjectMetadata {
            extensions: vec![ExtensionProfile { dev_port: Some(1), ..profile("a") }],
            ..ProjectMetadata::default()
        };
        let naming = ExtensionOverrideResolver::new(&metadata).project_naming(None);
        assert_eq!(naming.dev_port, 8080);
    }

    #[test]
    fn out_name_from_entry_directory() {
        assert_eq!(derive_out_name(&PathBuf::from("src/panel/index.ts")), "panel.js");
        assert_eq!(derive_out_name(&PathBuf::from("/abs/client/main.tsx")), "client.js");
        assert_eq!(derive_out_name(&PathBuf::from("index.ts")), "index.js");
    }
}
