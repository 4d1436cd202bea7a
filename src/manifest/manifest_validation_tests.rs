//! Tests for manifest validation rules and their ordering.

use crate::core::ModsyncError;
use crate::manifest::Manifest;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn manifest(json: &str) -> Manifest {
    Manifest::parse(json.as_bytes()).unwrap()
}

fn field_of(err: &ModsyncError) -> &str {
    match err {
        ModsyncError::ManifestValidationError {
            field,
            ..
        } => field,
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn test_name_rules() {
    let temp = tempdir().unwrap();
    let missing = manifest(r#"{"version":"1","include":["a"]}"#);
    assert_eq!(field_of(&missing.validate(temp.path()).unwrap_err()), "name");

    let upper = manifest(r#"{"name":"Sample","version":"1","include":["a"]}"#);
    let err = upper.validate(temp.path()).unwrap_err();
    assert_eq!(field_of(&err), "name");
    assert!(err.to_string().contains("lowercase"));
}

#[test]
fn test_rules_are_checked_in_order() {
    let temp = tempdir().unwrap();
    // name, version and include are all wrong; name is reported
    let all_bad = manifest(r#"{"name":"","version":"","include":[]}"#);
    assert_eq!(field_of(&all_bad.validate(temp.path()).unwrap_err()), "name");

    let bad_version = manifest(r#"{"name":"a","version":" ","include":[]}"#);
    assert_eq!(field_of(&bad_version.validate(temp.path()).unwrap_err()), "version");

    let bad_include = manifest(r#"{"name":"a","version":"1","include":[]}"#);
    assert_eq!(field_of(&bad_include.validate(temp.path()).unwrap_err()), "include");
}

#[test]
fn test_malformed_paths_are_rejected() {
    let temp = tempdir().unwrap();
    for entry in ["modules/a/", "/abs/path", "../escape", "modules/./a"] {
        let m = manifest(&format!(r#"{{"name":"a","version":"1","include":["{entry}"]}}"#));
        assert_eq!(field_of(&m.validate(temp.path()).unwrap_err()), "include", "entry {entry}");
    }

    let bad_exclude = manifest(r#"{"name":"a","version":"1","include":["a"],"exclude":["b/"]}"#);
    assert_eq!(field_of(&bad_exclude.validate(temp.path()).unwrap_err()), "exclude");
}

#[test]
fn test_missing_paths_are_all_reported() {
    let temp = tempdir().unwrap();
    fs::create_dir_all(temp.path().join("modules/a")).unwrap();
    fs::write(temp.path().join("modules/a/present.txt"), "x").unwrap();

    let m = manifest(
        r#"{"name":"a","version":"1",
            "include":["modules/a/present.txt","modules/a/gone.txt"],
            "exclude":["modules/a/also-gone.txt"]}"#,
    );
    let errors = m.validation_errors(temp.path());
    let missing: Vec<String> = errors
        .iter()
        .map(|e| match e {
            ModsyncError::MissingPath {
                path,
                ..
            } => path.clone(),
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(missing, vec!["modules/a/gone.txt", "modules/a/also-gone.txt"]);
}

#[test]
fn test_valid_manifest_with_backslashes() {
    let temp = tempdir().unwrap();
    fs::create_dir_all(temp.path().join("modules/a")).unwrap();
    fs::write(temp.path().join("modules/a/run.ps1"), "x").unwrap();

    let m = manifest(r#"{"name":"a","version":"1","include":["modules\\a\\run.ps1"]}"#);
    assert!(m.validate(temp.path()).is_ok());
    assert_eq!(m.normalized_include().unwrap(), vec!["modules/a/run.ps1"]);
}

#[test]
fn test_validate_location() {
    let m = manifest(r#"{"name":"sample","version":"1","include":["a"]}"#);
    assert!(m.validate_location(Path::new("/repo/modules/sample/module.manifest.json")).is_ok());

    let err = m.validate_location(Path::new("/repo/modules/other/module.manifest.json")).unwrap_err();
    assert_eq!(field_of(&err), "name");
    assert!(err.to_string().contains("'other'"));
}

#[test]
fn test_version_must_be_a_single_file_name_component() {
    let temp = tempdir().unwrap();
    for version in ["../1.0.0", "1.0/0", "1.0\\0", "1..0"] {
        let m = manifest(&format!(r#"{{"name":"a","version":"{}","include":["a"]}}"#, version.replace('\\', "\\\\")));
        let err = m.validate(temp.path()).unwrap_err();
        assert_eq!(field_of(&err), "version", "version {version}");
    }
    assert!(crate::manifest::check_version("1.0.0-rc.1").is_ok());
}
