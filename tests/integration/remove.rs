use anyhow::Result;
use modsync_cli::test_utils::ArtifactFixture;

use crate::common::{FileAssert, TestRepo};

#[test]
fn test_remove_prunes_module_directory() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.install(
        &ArtifactFixture::module("sample", "0.2.0")
            .file("sample.psm1", "x")
            .file("lib/nested/helper.ps1", "y"),
    )?;

    repo.run_modsync(&["remove", "sample"])?
        .assert_success()
        .assert_stdout_contains("Removed module sample@0.2.0 (3 deleted, 0 copied)");

    FileAssert::not_exists(repo.path("modules/sample"));
    FileAssert::exists(repo.path("modules"));
    Ok(())
}

#[test]
fn test_remove_keeps_excluded_files() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.install(
        &ArtifactFixture::module("sample", "0.2.0")
            .file("sample.psm1", "x")
            .excluded_file("local.settings.json", "{\"token\": \"local\"}"),
    )?;

    repo.run_modsync(&["remove", "sample"])?.assert_success();

    FileAssert::not_exists(repo.path("modules/sample/sample.psm1"));
    FileAssert::not_exists(repo.path("modules/sample/module.manifest.json"));
    FileAssert::contains(repo.path("modules/sample/local.settings.json"), "local");
    Ok(())
}

#[test]
fn test_remove_dry_run_lists_plan() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.install(&ArtifactFixture::module("sample", "0.2.0").file("sample.psm1", "x"))?;

    repo.run_modsync(&["remove", "sample", "--dry-run"])?
        .assert_success()
        .assert_stdout_contains("Would remove module sample@0.2.0")
        .assert_stdout_contains("- modules/sample/sample.psm1");

    FileAssert::exists(repo.path("modules/sample/sample.psm1"));
    Ok(())
}

#[test]
fn test_remove_missing_module_fails() -> Result<()> {
    let repo = TestRepo::new()?;

    repo.run_modsync(&["remove", "ghost"])?
        .assert_failure()
        .assert_stderr_contains("Precondition failed");
    Ok(())
}
