//! End-to-end tests for the `cepack` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn cepack(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cepack").unwrap();
    cmd.current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("NODE_ENV")
        .env_remove("RUST_LOG")
        .env_remove("CEP_DEV_PORT")
        .env_remove("CEPACK_DEV_PORT");
    cmd
}

fn panel_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{
            "name": "my-panel",
            "dependencies": { "lodash": "^4.17.21" },
            "cep": { "bundleName": "My Panel", "devPort": 9000 }
        }"#,
    )
    .unwrap();
    dir
}

#[test]
fn config_prints_panel_configuration() {
    let dir = panel_project();

    cepack(dir.path())
        .args([
            "config",
            "--entry",
            "src/panel/index.ts",
            "--out",
            "dist",
            "--type",
            "panel",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""target": "node-webkit""#))
        .stdout(predicate::str::contains(r#""port": 9000"#))
        .stdout(predicate::str::contains(r#""filename": "panel.js""#))
        .stdout(predicate::str::contains(r#""lodash""#));
}

#[test]
fn options_file_and_env_are_layered() {
    let dir = panel_project();
    fs::write(
        dir.path().join("cepack.json"),
        r#"{ "entry": "src/panel/index.ts", "out": "dist", "type": "panel", "devPort": 3000 }"#,
    )
    .unwrap();

    cepack(dir.path())
        .args(["config"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""port": 3000"#));

    cepack(dir.path())
        .env("CEPACK_DEV_PORT", "7000")
        .args(["config"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""port": 7000"#));

    cepack(dir.path())
        .env("CEPACK_DEV_PORT", "7000")
        .args(["config", "--dev-port", "7100"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""port": 7100"#));
}

#[test]
fn config_writes_output_file() {
    let dir = panel_project();

    cepack(dir.path())
        .args([
            "config",
            "-e",
            "src/panel/index.ts",
            "-o",
            "dist",
            "-t",
            "cep",
            "--output",
            "webpack.json",
        ])
        .assert()
        .success();

    let written = fs::read_to_string(dir.path().join("webpack.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value["output"]["filename"], "panel.js");
}

#[test]
fn missing_out_fails_before_reading_project() {
    let dir = TempDir::new().unwrap();

    cepack(dir.path())
        .args(["config", "--entry", "src/panel/index.ts", "--type", "panel"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("output directory"));
}

#[test]
fn unknown_type_is_rejected() {
    let dir = panel_project();

    cepack(dir.path())
        .args(["check", "--entry", "a/index.ts", "--out", "dist", "--type", "applet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("compilation type"));
}

#[test]
fn check_reports_panel_naming() {
    let dir = panel_project();

    cepack(dir.path())
        .args([
            "check",
            "--entry",
            "src/panel/index.ts",
            "--out",
            "dist",
            "--type",
            "panel",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("name: My Panel"))
        .stdout(predicate::str::contains("dev server: http://localhost:9000/index.html"))
        .stdout(predicate::str::contains("entry loaders: ts-loader"));
}

#[test]
fn check_warns_when_no_module_rule_handles_entry() {
    let dir = panel_project();

    cepack(dir.path())
        .args([
            "check",
            "--entry",
            "src/panel/index.coffee",
            "--out",
            "dist",
            "--type",
            "panel",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("entry loaders: (none)"))
        .stderr(predicate::str::contains("No module rule handles"));
}

#[test]
fn check_warns_about_missing_shim() {
    let dir = TempDir::new().unwrap();

    cepack(dir.path())
        .args([
            "check",
            "--entry",
            "src/jsx/main.ts",
            "--out",
            "dist",
            "--type",
            "script-engine",
            "--json",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""shimInstalled": false"#))
        .stdout(predicate::str::contains(r#""outName": "extendscript.js""#))
        .stdout(predicate::str::contains(r#""ts-loader""#))
        .stderr(predicate::str::contains("extendscript-es5-shim-ts"));
}

#[test]
fn check_warns_about_unmatched_extension_id() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("package.json"),
        r#"{ "cep": { "extensions": [{ "id": "com.example.main", "devPort": 3101 }] } }"#,
    )
    .unwrap();

    cepack(dir.path())
        .args([
            "check",
            "--entry",
            "src/panel/index.ts",
            "--out",
            "dist",
            "--type",
            "panel",
            "--id",
            "com.example.other",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("localhost:8080"))
        .stderr(predicate::str::contains("No extension profile"));
}
