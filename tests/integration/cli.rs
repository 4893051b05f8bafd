//! Argument handling, output rules and error reporting of the binary.

use predicates::prelude::*;

use crate::common::TestProject;
use crate::fixtures::{INVALID_NAME, UNKNOWN_BLADE, WORDPRESS};

#[test]
fn test_help_lists_commands() {
    let project = TestProject::new().unwrap();
    project
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("deployment"))
        .stdout(predicate::str::contains("view"))
        .stdout(predicate::str::contains("managedapp"));
}

#[test]
fn test_missing_bundle_file() {
    let project = TestProject::new().unwrap();
    project
        .cmd()
        .arg("generate")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("bundle.json"));
    assert!(!project.exists("azuredeploy.json"));
}

#[test]
fn test_existing_output_requires_overwrite() {
    let project = TestProject::with_bundle(WORDPRESS).unwrap();
    project.write_file("azuredeploy.json", "{}").unwrap();

    project
        .cmd()
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--overwrite"));
    assert_eq!(project.read_file("azuredeploy.json").unwrap(), "{}");

    project.cmd().args(["generate", "--overwrite"]).assert().success();
    assert_ne!(project.read_file("azuredeploy.json").unwrap(), "{}");
}

#[test]
fn test_existing_ui_output_blocks_both_artifacts() {
    let project = TestProject::with_bundle(WORDPRESS).unwrap();
    project.write_file("createUiDefinition.json", "{}").unwrap();

    project.cmd().args(["generate", "--ui"]).assert().failure();
    assert!(!project.exists("azuredeploy.json"));
}

#[test]
fn test_dash_writes_to_stdout() {
    let project = TestProject::with_bundle(WORDPRESS).unwrap();
    let output = project.cmd().args(["generate", "-o", "-"]).assert().success();

    let stdout = String::from_utf8_lossy(&output.get_output().stdout).to_string();
    let template: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(template["$schema"].as_str().unwrap().contains("deploymentTemplate"));
    assert!(!project.exists("azuredeploy.json"));
}

#[test]
fn test_indent_uses_tabs() {
    let project = TestProject::with_bundle(WORDPRESS).unwrap();
    project.cmd().args(["generate", "--indent"]).assert().success();

    let content = project.read_file("azuredeploy.json").unwrap();
    assert!(content.starts_with("{\n\t\""));
    assert!(content.ends_with("}\n"));

    project.cmd().args(["generate", "--overwrite"]).assert().success();
    let compact = project.read_file("azuredeploy.json").unwrap();
    assert_eq!(compact.lines().count(), 1);
}

#[test]
fn test_invalid_field_name_is_reported() {
    let project = TestProject::with_bundle(INVALID_NAME).unwrap();
    project
        .cmd()
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("db-host"))
        .stderr(predicate::str::contains("db_host"));
}

#[test]
fn test_unknown_blade_suggests_declared_blade() {
    let project = TestProject::with_bundle(UNKNOWN_BLADE).unwrap();
    project
        .cmd()
        .args(["generate", "--ui"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Netwrk"))
        .stderr(predicate::str::contains("Did you mean 'Network'?"));
    assert!(!project.exists("azuredeploy.json"));
}

#[test]
fn test_timeout_out_of_range() {
    let project = TestProject::with_bundle(WORDPRESS).unwrap();
    project.cmd().args(["generate", "--timeout", "121"]).assert().failure();
    assert!(!project.exists("azuredeploy.json"));
}

#[test]
fn test_arc_conflicts_with_replace() {
    let project = TestProject::with_bundle(WORDPRESS).unwrap();
    project
        .cmd()
        .args(["generate", "--arc", "--replace"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("arc"))
        .stderr(predicate::str::contains("replace"));
}

#[test]
fn test_config_file_overrides_defaults() {
    let project = TestProject::with_bundle(WORDPRESS).unwrap();
    project
        .write_file("defaults.toml", "msi_name = \"wordpress-installer\"\nporter_version = \"v1.0.0\"\n")
        .unwrap();

    project.cmd().args(["--config", "defaults.toml", "generate"]).assert().success();

    let template = project.read_json("azuredeploy.json").unwrap();
    assert_eq!(template["parameters"]["msi_name"]["defaultValue"], "wordpress-installer");
    assert_eq!(template["parameters"]["porter_version"]["defaultValue"], "v1.0.0");
}

#[test]
fn test_config_from_environment() {
    let project = TestProject::with_bundle(WORDPRESS).unwrap();
    let path = project.write_file("env.toml", "porter_version = \"v0.38.4\"\n").unwrap();

    project
        .cmd()
        .env("CNAB_ARM_CONFIG", &path)
        .args(["generate", "--simplify"])
        .assert()
        .success();

    let template = project.read_json("azuredeploy.json").unwrap();
    assert_eq!(template["variables"]["porter_version"], "v0.38.4");
}

#[test]
fn test_unknown_config_key_is_rejected() {
    let project = TestProject::with_bundle(WORDPRESS).unwrap();
    project.write_file("defaults.toml", "msi_nmae = \"typo\"\n").unwrap();

    project
        .cmd()
        .args(["--config", "defaults.toml", "generate"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("msi_nmae"));
}
