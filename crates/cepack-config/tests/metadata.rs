//! Tests for project metadata resolution against real manifests on disk.

use cepack_config::{
    AmbientEnv, BuildOptions, ConfigError, ExtensionOverrideResolver, Manifest,
    ManifestMetadataProvider, MetadataProvider, ProjectMetadata, ProjectMetadataResolver,
    TargetType, validate,
};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn write_manifest(dir: &TempDir, value: serde_json::Value) {
    fs::write(
        dir.path().join("package.json"),
        serde_json::to_string_pretty(&value).expect("serialize manifest"),
    )
    .expect("write manifest");
}

#[test]
fn manifest_is_loaded_from_root_by_default() {
    let dir = TempDir::new().expect("tempdir");
    write_manifest(
        &dir,
        json!({
            "name": "my-extension",
            "cep": { "bundleName": "My Extension", "devPort": 3000 }
        }),
    );

    let ambient = AmbientEnv::new(dir.path());
    let provider = ManifestMetadataProvider::new();
    let metadata = ProjectMetadataResolver::new(&provider, &ambient)
        .resolve(None, None, dir.path())
        .expect("resolve metadata");

    assert_eq!(metadata.bundle_name, "My Extension");
    assert_eq!(metadata.dev_port, 3000);
    assert_eq!(metadata.dev_host, "localhost");
}

#[test]
fn missing_manifest_propagates() {
    let dir = TempDir::new().expect("tempdir");
    let ambient = AmbientEnv::new(dir.path());
    let provider = ManifestMetadataProvider::new();

    let err = ProjectMetadataResolver::new(&provider, &ambient)
        .resolve(None, None, dir.path())
        .unwrap_err();
    assert!(matches!(err, ConfigError::ManifestNotFound { .. }));
}

#[test]
fn supplied_manifest_skips_disk() {
    let dir = TempDir::new().expect("tempdir");
    let ambient = AmbientEnv::new(dir.path());
    let provider = ManifestMetadataProvider::new();
    let manifest = Manifest::from_value(json!({ "cep": { "name": "Inline" } })).unwrap();

    let metadata = ProjectMetadataResolver::new(&provider, &ambient)
        .resolve(Some(&manifest), None, dir.path())
        .expect("resolve metadata");
    assert_eq!(metadata.bundle_name, "Inline");
}

#[test]
fn environment_defaults_to_node_env() {
    let manifest = Manifest::from_value(json!({
        "cep": {
            "devHost": "localhost",
            "production": { "devHost": "0.0.0.0" }
        }
    }))
    .unwrap();
    let ambient = AmbientEnv::new("/p").with_var("NODE_ENV", "production");
    let provider = ManifestMetadataProvider::new();

    let metadata = ProjectMetadataResolver::new(&provider, &ambient)
        .resolve(Some(&manifest), None, ambient.cwd())
        .expect("resolve metadata");
    assert_eq!(metadata.dev_host, "0.0.0.0");
}

/// Provider stub that ignores the manifest and records the environment.
struct FixedProvider(ProjectMetadata);

impl MetadataProvider for FixedProvider {
    fn project_metadata(
        &self,
        _manifest: &Manifest,
        environment: Option<&str>,
    ) -> cepack_config::Result<ProjectMetadata> {
        let mut metadata = self.0.clone();
        if let Some(env) = environment {
            metadata.bundle_id = Some(env.to_string());
        }
        Ok(metadata)
    }
}

#[test]
fn provider_result_is_returned_unchanged() {
    let fixed = ProjectMetadata {
        bundle_name: "MyExt".into(),
        bundle_id: None,
        dev_port: 9000,
        dev_host: "localhost".into(),
        html_filename: "index.html".into(),
        extensions: vec![],
    };
    let ambient = AmbientEnv::new("/p");
    let provider = FixedProvider(fixed.clone());
    let options = validate(
        BuildOptions::new("src/panel/index.ts", "/build", TargetType::Panel)
            .with_pkg(Manifest::default()),
        &ambient,
    )
    .unwrap();

    let metadata = ProjectMetadataResolver::new(&provider, &ambient)
        .resolve_for(&options)
        .expect("resolve metadata");
    assert_eq!(metadata, fixed);

    let naming = ExtensionOverrideResolver::new(&metadata).resolve(&options);
    assert_eq!(naming.dev_port, 9000);
    assert_eq!(naming.dev_host, "localhost");
    assert_eq!(naming.html_filename, "index.html");
    assert_eq!(naming.out_name, "panel.js");
}

#[test]
fn extension_profiles_are_read_in_order() {
    let manifest = Manifest::from_value(json!({
        "cep": {
            "bundleName": "Suite",
            "extensions": [
                { "id": "com.example.main", "name": "Main", "devPort": 3101 },
                { "id": "com.example.settings", "htmlFilename": "settings.html" }
            ]
        }
    }))
    .unwrap();

    let metadata = ManifestMetadataProvider::new()
        .project_metadata(&manifest, None)
        .expect("metadata");

    let ids: Vec<_> = metadata.extensions.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["com.example.main", "com.example.settings"]);
    assert_eq!(metadata.extensions[1].dev_port, None);
    assert_eq!(
        metadata.extensions[1].html_filename.as_deref(),
        Some("settings.html")
    );
}

#[test]
fn profile_without_id_is_never_selected() {
    let manifest = Manifest::from_value(json!({
        "cep": {
            "bundleName": "Suite",
            "extensions": [
                { "name": "Orphan", "devPort": 3100 },
                { "id": "com.example.main", "devPort": 3101 }
            ]
        }
    }))
    .unwrap();

    let metadata = ManifestMetadataProvider::new()
        .project_metadata(&manifest, None)
        .expect("a profile without id does not fail resolution");
    assert_eq!(metadata.extensions.len(), 2);
    assert_eq!(metadata.extensions[0].id, "");

    let dev_port_for = |id: &str| {
        let options = validate(
            BuildOptions::new("src/main/index.ts", "dist", TargetType::Panel).with_id(id),
            &AmbientEnv::new("/work"),
        )
        .expect("valid options");
        ExtensionOverrideResolver::new(&metadata).resolve(&options).dev_port
    };
    assert_eq!(dev_port_for("com.example.main"), 3101);
    assert_eq!(dev_port_for(""), 8080);

}
