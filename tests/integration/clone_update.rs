use anyhow::Result;
use modsync_cli::test_utils::ArtifactFixture;

use crate::common::{FileAssert, TestRepo, TestSourceRepo, git_available};

/// A source repository with `v0.2.0` and `v0.3.0` of module `sample`.
///
/// 0.3.0 rewrites `sample.psm1`, drops `old.ps1` and adds `new.ps1`.
fn publish_two_versions(repo: &TestRepo) -> Result<TestSourceRepo> {
    let source = repo.create_source_repo("sample")?;
    let url = source.file_url();

    source.publish(
        &ArtifactFixture::module("sample", "0.2.0")
            .file("sample.psm1", "v2")
            .file("old.ps1", "old")
            .git_source(&url, None),
        "v0.2.0",
    )?;

    source.git.remove_file("modules/sample/old.ps1")?;
    source.publish(
        &ArtifactFixture::module("sample", "0.3.0")
            .file("sample.psm1", "v3")
            .file("new.ps1", "new")
            .git_source(&url, None),
        "v0.3.0",
    )?;
    Ok(source)
}

#[test]
fn test_clone_then_update() -> Result<()> {
    if !git_available() {
        eprintln!("git not installed, skipping");
        return Ok(());
    }
    let repo = TestRepo::new()?;
    let source = publish_two_versions(&repo)?;

    repo.run_modsync(&["clone", "sample", "--version", "0.2.0", "--git", &source.file_url()])?
        .assert_success()
        .assert_stdout_contains("Cloned module sample@0.2.0");
    FileAssert::contains(repo.path("modules/sample/sample.psm1"), "v2");
    FileAssert::exists(repo.path("modules/sample/old.ps1"));

    // The installed manifest carries source.git, so no --git is needed
    repo.run_modsync(&["update", "sample", "--version", "0.3.0"])?
        .assert_success()
        .assert_stdout_contains("Updated module sample@0.3.0");
    FileAssert::contains(repo.path("modules/sample/sample.psm1"), "v3");
    FileAssert::exists(repo.path("modules/sample/new.ps1"));
    FileAssert::not_exists(repo.path("modules/sample/old.ps1"));
    FileAssert::contains(repo.path("modules/sample/module.manifest.json"), "0.3.0");

    // The source repository is never modified
    FileAssert::exists(source.path.join("modules/sample/new.ps1"));
    Ok(())
}

#[test]
fn test_update_dry_run_leaves_workspace_untouched() -> Result<()> {
    if !git_available() {
        eprintln!("git not installed, skipping");
        return Ok(());
    }
    let repo = TestRepo::new()?;
    let source = publish_two_versions(&repo)?;
    repo.run_modsync(&["clone", "sample", "--version", "0.2.0", "--git", &source.file_url()])?
        .assert_success();

    repo.run_modsync(&["update", "sample", "--version", "0.3.0", "--dry-run"])?
        .assert_success()
        .assert_stdout_contains("Would update module sample@0.3.0")
        .assert_stdout_contains("- modules/sample/old.ps1")
        .assert_stdout_contains("+ modules/sample/new.ps1");

    FileAssert::exists(repo.path("modules/sample/old.ps1"));
    FileAssert::not_exists(repo.path("modules/sample/new.ps1"));
    FileAssert::contains(repo.path("modules/sample/sample.psm1"), "v2");
    Ok(())
}

#[test]
fn test_clone_into_existing_module_fails() -> Result<()> {
    if !git_available() {
        eprintln!("git not installed, skipping");
        return Ok(());
    }
    let repo = TestRepo::new()?;
    let source = publish_two_versions(&repo)?;
    repo.install(&ArtifactFixture::module("sample", "0.1.0").file("sample.psm1", "local"))?;

    repo.run_modsync(&["clone", "sample", "--version", "0.2.0", "--git", &source.file_url()])?
        .assert_failure()
        .assert_stderr_contains("Precondition failed");

    FileAssert::contains(repo.path("modules/sample/sample.psm1"), "local");
    Ok(())
}

#[test]
fn test_clone_unknown_tag_names_available_tags() -> Result<()> {
    if !git_available() {
        eprintln!("git not installed, skipping");
        return Ok(());
    }
    let repo = TestRepo::new()?;
    let source = publish_two_versions(&repo)?;

    repo.run_modsync(&["clone", "sample", "--version", "9.9.9", "--git", &source.file_url()])?
        .assert_failure()
        .assert_stderr_contains("v9.9.9")
        .assert_stderr_contains("v0.3.0");

    FileAssert::not_exists(repo.path("modules/sample"));
    Ok(())
}

#[test]
fn test_clone_with_tag_prefix() -> Result<()> {
    if !git_available() {
        eprintln!("git not installed, skipping");
        return Ok(());
    }
    let repo = TestRepo::new()?;
    let source = repo.create_source_repo("prefixed")?;
    let url = source.file_url();
    source.publish(
        &ArtifactFixture::module("prefixed", "1.0.0")
            .file("prefixed.psm1", "one")
            .git_source(&url, Some("rel-")),
        "rel-1.0.0",
    )?;
    source.publish(
        &ArtifactFixture::module("prefixed", "1.1.0")
            .file("prefixed.psm1", "one-one")
            .git_source(&url, Some("rel-")),
        "rel-1.1.0",
    )?;

    repo.run_modsync(&["clone", "prefixed", "--version", "1.0.0", "--git", &url, "--tag-prefix", "rel-"])?
        .assert_success();
    FileAssert::contains(repo.path("modules/prefixed/prefixed.psm1"), "one");

    // The prefix now comes from the installed manifest
    repo.run_modsync(&["update", "prefixed", "--version", "1.1.0"])?.assert_success();
    FileAssert::contains(repo.path("modules/prefixed/prefixed.psm1"), "one-one");
    Ok(())
}

#[test]
fn test_update_without_source_fails() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.install(&ArtifactFixture::module("sample", "0.2.0").file("sample.psm1", "x"))?;

    repo.run_modsync(&["update", "sample", "--version", "0.3.0"])?
        .assert_failure()
        .assert_stderr_contains("No git source for 'sample'");

    FileAssert::exists(repo.path("modules/sample/sample.psm1"));
    Ok(())
}
