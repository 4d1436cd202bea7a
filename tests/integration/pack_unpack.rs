use anyhow::Result;
use modsync_cli::test_utils::ArtifactFixture;
use std::fs;

use crate::common::{FileAssert, TestRepo};

fn sample() -> ArtifactFixture {
    ArtifactFixture::module("sample", "0.2.0")
        .file("sample.psm1", "function Invoke-Sample { 'v2' }")
        .file("lib/helper.ps1", "function Get-Helper {}")
}

#[test]
fn test_pack_writes_versioned_archive() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.install(&sample())?;

    repo.run_modsync(&["pack", "sample"])?
        .assert_success()
        .assert_stdout_contains("Packed module sample@0.2.0")
        .assert_stdout_contains("dist/sample/sample.0.2.0.zip")
        .assert_stdout_contains("sha256:");

    FileAssert::exists(repo.path("dist/sample/sample.0.2.0.zip"));
    Ok(())
}

#[test]
fn test_pack_is_byte_identical_across_runs() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.install(&sample())?;
    let archive = repo.path("dist/sample/sample.0.2.0.zip");

    repo.run_modsync(&["pack", "sample"])?.assert_success();
    let first = fs::read(&archive)?;

    repo.run_modsync(&["pack", "sample", "--version", "0.2.0"])?.assert_success();
    let second = fs::read(&archive)?;

    assert_eq!(first, second);
    Ok(())
}

#[test]
fn test_unpack_restores_deleted_module() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.install(&sample())?;
    repo.run_modsync(&["pack", "sample"])?.assert_success();

    fs::remove_dir_all(repo.path("modules/sample"))?;
    repo.run_modsync(&["unpack", "sample", "--version", "0.2.0"])?
        .assert_success()
        .assert_stdout_contains("Unpacked module sample@0.2.0");

    FileAssert::contains(repo.path("modules/sample/sample.psm1"), "'v2'");
    FileAssert::exists(repo.path("modules/sample/lib/helper.ps1"));
    FileAssert::exists(repo.path("modules/sample/module.manifest.json"));
    Ok(())
}

#[test]
fn test_pack_removes_legacy_archives() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.install(&sample())?;
    repo.write_file("dist/sample/Module.zip", "legacy")?;
    repo.write_file("dist/sample/Module.0.2.0.zip", "legacy")?;

    repo.run_modsync(&["pack", "sample"])?.assert_success();

    FileAssert::not_exists(repo.path("dist/sample/Module.zip"));
    FileAssert::not_exists(repo.path("dist/sample/Module.0.2.0.zip"));
    FileAssert::exists(repo.path("dist/sample/sample.0.2.0.zip"));
    Ok(())
}

#[test]
fn test_pack_rejects_other_version() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.install(&sample())?;

    repo.run_modsync(&["pack", "sample", "--version", "0.3.0"])?
        .assert_failure()
        .assert_stderr_contains("Version mismatch");

    FileAssert::not_exists(repo.path("dist/sample"));
    Ok(())
}

#[test]
fn test_unpack_without_archive_fails() -> Result<()> {
    let repo = TestRepo::new()?;

    repo.run_modsync(&["unpack", "sample", "--version", "9.9.9"])?
        .assert_failure()
        .assert_stderr_contains("No archive for 'sample' version '9.9.9'");
    Ok(())
}

#[test]
fn test_pack_and_unpack_enabler() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.install(&ArtifactFixture::enabler("lint", "1.0.0").file("rules.json", "{}"))?;

    repo.run_modsync(&["pack", "lint", "--kind", "enabler"])?.assert_success();
    fs::remove_dir_all(repo.path("enablers/lint"))?;
    repo.run_modsync(&["unpack", "lint", "--version", "1.0.0", "--kind", "enabler"])?.assert_success();

    FileAssert::exists(repo.path("enablers/lint/rules.json"));
    FileAssert::exists(repo.path("enablers/lint/enabler.manifest.json"));
    Ok(())
}
