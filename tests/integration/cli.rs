//! Binary-level behavior checked with `assert_cmd`.

use assert_cmd::Command;
use modsync_cli::test_utils::ArtifactFixture;
use predicates::prelude::*;
use std::path::Path;

use crate::common::TestRepo;

fn modsync(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("modsync").unwrap();
    cmd.arg("--root").arg(root).env("NO_COLOR", "1").env_remove("MODSYNC_CONFIG").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let repo = TestRepo::new().unwrap();
    modsync(repo.root())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("pack"))
        .stdout(predicate::str::contains("unpack"))
        .stdout(predicate::str::contains("clone"))
        .stdout(predicate::str::contains("enabler"));
}

#[test]
fn test_list_empty_repository() {
    let repo = TestRepo::new().unwrap();
    modsync(repo.root())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No modules or enablers installed."));
}

#[test]
fn test_list_json_includes_broken_manifests() {
    let repo = TestRepo::new().unwrap();
    repo.install(&ArtifactFixture::module("sample", "0.2.0").git_source("https://example.com/sample.git", None))
        .unwrap();
    repo.install(&ArtifactFixture::enabler("lint", "1.0.0")).unwrap();
    repo.write_file("modules/broken/module.manifest.json", "{ not json").unwrap();

    let output = modsync(repo.root()).args(["list", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["name"], "broken");
    assert!(rows[0]["error"].is_string());
    assert_eq!(rows[1]["name"], "sample");
    assert_eq!(rows[1]["git"], "https://example.com/sample.git");
    assert_eq!(rows[2]["kind"], "enabler");
}

#[test]
fn test_list_table() {
    let repo = TestRepo::new().unwrap();
    repo.install(&ArtifactFixture::module("sample", "0.2.0")).unwrap();

    modsync(repo.root())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("KIND"))
        .stdout(predicate::str::is_match(r"module\s+sample\s+0\.2\.0").unwrap());
}

#[test]
fn test_validate_json_reports_files() {
    let repo = TestRepo::new().unwrap();
    repo.install(&ArtifactFixture::module("sample", "0.2.0").file("sample.psm1", "x")).unwrap();

    let output = modsync(repo.root()).args(["validate", "sample", "--json"]).output().unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], true);
    assert_eq!(
        report["files"],
        serde_json::json!(["modules/sample/module.manifest.json", "modules/sample/sample.psm1"])
    );
}

#[test]
fn test_validate_reports_every_error() {
    let repo = TestRepo::new().unwrap();
    repo.install(
        &ArtifactFixture::module("sample", "0.2.0")
            .include("modules/sample/missing-one.ps1")
            .include("modules/sample/missing-two.ps1"),
    )
    .unwrap();

    modsync(repo.root())
        .args(["validate", "sample"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("missing-one.ps1"))
        .stdout(predicate::str::contains("missing-two.ps1"))
        .stderr(predicate::str::contains("2 validation error(s)"));
}

#[test]
fn test_error_output_has_suggestion() {
    let repo = TestRepo::new().unwrap();
    modsync(repo.root())
        .args(["validate", "ghost"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error: No module manifest found"))
        .stderr(predicate::str::contains("suggestion:"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let repo = TestRepo::new().unwrap();
    repo.write_config("[layout]\nmodule_dir = \"mods\"\n").unwrap();

    modsync(repo.root())
        .arg("list")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_custom_layout_from_config() {
    let repo = TestRepo::new().unwrap();
    repo.write_config("[layout]\nmodules_dir = \"automation/modules\"\n").unwrap();
    repo.write_file("automation/modules/sample/module.manifest.json",
        r#"{"name":"sample","version":"0.2.0","description":"d","include":["automation/modules/sample/module.manifest.json"]}"#)
        .unwrap();

    modsync(repo.root())
        .args(["pack", "sample"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dist/sample/sample.0.2.0.zip"));
}
