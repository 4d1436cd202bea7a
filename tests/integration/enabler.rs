//! Enabler lifecycle with a shell task runner in place of pwsh.

use anyhow::Result;
use modsync_cli::test_utils::ArtifactFixture;

use crate::common::{FileAssert, TestRepo, git_available};

const SH_TASKS: &str = r#"
[tasks]
file = "tasks.sh"
program = "sh"
args = ["{file}", "{task}"]
timeout_secs = 30
"#;

/// Appends `<task> <version>` to `callbacks.log` at the repository root.
const RECORDING_SCRIPT: &str = "echo \"$1 $MODSYNC_ENABLER_VERSION\" >> \"$MODSYNC_ROOT/callbacks.log\"\n";

fn lint(version: &str, url: &str) -> ArtifactFixture {
    ArtifactFixture::enabler("lint", version)
        .file("tasks.sh", RECORDING_SCRIPT)
        .file("rules.json", format!("{{\"version\": \"{version}\"}}"))
        .git_source(url, None)
}

#[cfg(unix)]
#[test]
fn test_enabler_install_upgrade_remove() -> Result<()> {
    if !git_available() {
        eprintln!("git not installed, skipping");
        return Ok(());
    }
    let repo = TestRepo::new()?;
    repo.write_config(SH_TASKS)?;
    let source = repo.create_source_repo("lint")?;
    let url = source.file_url();
    source.publish(&lint("1.0.0", &url), "v1.0.0")?;
    source.publish(&lint("1.1.0", &url), "v1.1.0")?;

    repo.run_modsync(&["enabler", "install", "lint", "--version", "1.0.0", "--git", &url])?
        .assert_success()
        .assert_stdout_contains("Installed enabler lint@1.0.0")
        .assert_stdout_contains("callback: ran");
    FileAssert::contains(repo.path("callbacks.log"), "install 1.0.0");

    repo.run_modsync(&["enabler", "upgrade", "lint", "--version", "1.1.0"])?
        .assert_success()
        .assert_stdout_contains("Updated enabler lint@1.1.0");
    FileAssert::contains(repo.path("callbacks.log"), "upgrade 1.1.0");
    FileAssert::contains(repo.path("enablers/lint/rules.json"), "1.1.0");

    // The remove task still finds its script: it runs before deletion
    repo.run_modsync(&["enabler", "remove", "lint"])?.assert_success();
    FileAssert::contains(repo.path("callbacks.log"), "remove 1.1.0");
    FileAssert::not_exists(repo.path("enablers/lint"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_failing_task_does_not_fail_install() -> Result<()> {
    if !git_available() {
        eprintln!("git not installed, skipping");
        return Ok(());
    }
    let repo = TestRepo::new()?;
    repo.write_config(SH_TASKS)?;
    let source = repo.create_source_repo("broken")?;
    source.publish(
        &ArtifactFixture::enabler("broken", "1.0.0").file("tasks.sh", "echo boom >&2\nexit 3\n"),
        "v1.0.0",
    )?;

    repo.run_modsync(&["enabler", "install", "broken", "--version", "1.0.0", "--git", &source.file_url()])?
        .assert_success()
        .assert_stdout_contains("callback: failed");

    FileAssert::exists(repo.path("enablers/broken/tasks.sh"));
    Ok(())
}

#[cfg(unix)]
#[test]
fn test_install_present_enabler_only_runs_task() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.write_config(SH_TASKS)?;
    repo.install(&ArtifactFixture::enabler("lint", "1.0.0").file("tasks.sh", RECORDING_SCRIPT))?;

    repo.run_modsync(&["enabler", "install", "lint", "--version", "1.0.0"])?
        .assert_success()
        .assert_stdout_contains("(0 deleted, 0 copied)");
    FileAssert::contains(repo.path("callbacks.log"), "install 1.0.0");

    repo.run_modsync(&["enabler", "install", "lint", "--version", "2.0.0"])?
        .assert_failure()
        .assert_stderr_contains("Version mismatch");
    Ok(())
}

#[test]
fn test_enabler_without_task_file_is_skipped() -> Result<()> {
    let repo = TestRepo::new()?;
    repo.install(&ArtifactFixture::enabler("plain", "1.0.0").file("rules.json", "{}"))?;

    repo.run_modsync(&["enabler", "remove", "plain"])?
        .assert_success()
        .assert_stdout_contains("callback: no task file");
    FileAssert::not_exists(repo.path("enablers/plain"));
    Ok(())
}
