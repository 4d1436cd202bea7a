//! Test doubles for the engine's capabilities.

use crate::core::ModsyncError;
use crate::hooks::{Callback, CallbackOutcome, CallbackRequest, CallbackTask};
use crate::source::{Fetcher, RemoteReference};
use crate::utils::fs::{StagingRoot, copy_file, to_relative};
use crate::workspace::{FsWorkspace, Workspace};
use anyhow::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use walkdir::WalkDir;

/// Serves tags from local directories instead of cloning.
#[derive(Debug, Default)]
pub struct DirectoryFetcher {
    tags: HashMap<String, PathBuf>,
    requests: Mutex<Vec<String>>,
}

impl DirectoryFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve the contents of `dir` for `tag`.
    #[must_use]
    pub fn with_tag(mut self, tag: &str, dir: impl Into<PathBuf>) -> Self {
        self.tags.insert(tag.to_string(), dir.into());
        self
    }

    /// Tags requested so far, in order.
    pub fn requested_tags(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Fetcher for DirectoryFetcher {
    async fn fetch(&self, reference: &RemoteReference) -> Result<StagingRoot> {
        let tag = reference.tag();
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(tag.clone());
        }

        let Some(source) = self.tags.get(&tag) else {
            return Err(ModsyncError::FetchFailed {
                url: reference.url.clone(),
                tag,
                reason: "tag not served by test fetcher".to_string(),
            }
            .into());
        };

        let staging = StagingRoot::new("test_fetch")?;
        for entry in WalkDir::new(source).into_iter().filter_map(Result::ok) {
            if entry.file_type().is_file()
                && let Some(relative) = to_relative(source, entry.path())
            {
                copy_file(entry.path(), &staging.path().join(relative))?;
            }
        }
        Ok(staging)
    }
}

/// A workspace primitive invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceEvent {
    Delete(String),
    Copy(String),
    Write(String),
    Prune(String),
}

/// Wraps [`FsWorkspace`], records every mutation and can fail copies.
#[derive(Debug)]
pub struct FaultyWorkspace {
    inner: FsWorkspace,
    fail_copies_after: Option<usize>,
    events: Mutex<Vec<WorkspaceEvent>>,
}

impl FaultyWorkspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            inner: FsWorkspace::new(root),
            fail_copies_after: None,
            events: Mutex::new(Vec::new()),
        }
    }

    /// Fail every copy after the first `count` succeed.
    #[must_use]
    pub const fn fail_copies_after(mut self, count: usize) -> Self {
        self.fail_copies_after = Some(count);
        self
    }

    pub fn events(&self) -> Vec<WorkspaceEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    fn record(&self, event: WorkspaceEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }

    fn copies_so_far(&self) -> usize {
        self.events().iter().filter(|e| matches!(e, WorkspaceEvent::Copy(_))).count()
    }
}

impl Workspace for FaultyWorkspace {
    fn root(&self) -> &Path {
        self.inner.root()
    }

    fn write_file(&self, relative: &str, bytes: &[u8]) -> Result<()> {
        self.record(WorkspaceEvent::Write(relative.to_string()));
        self.inner.write_file(relative, bytes)
    }

    fn copy_in(&self, source: &Path, relative: &str) -> Result<()> {
        if let Some(limit) = self.fail_copies_after
            && self.copies_so_far() >= limit
        {
            return Err(ModsyncError::FileSystemError {
                operation: "copy (injected fault)".to_string(),
                path: relative.to_string(),
            }
            .into());
        }
        self.record(WorkspaceEvent::Copy(relative.to_string()));
        self.inner.copy_in(source, relative)
    }

    fn delete(&self, relative: &str) -> Result<bool> {
        self.record(WorkspaceEvent::Delete(relative.to_string()));
        self.inner.delete(relative)
    }

    fn prune_empty(&self, relative: &str) -> Result<bool> {
        self.record(WorkspaceEvent::Prune(relative.to_string()));
        self.inner.prune_empty(relative)
    }
}

/// One observed callback invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackRecord {
    pub task: CallbackTask,
    pub name: String,
    pub version: String,
    /// Whether the enabler directory existed when the callback ran
    pub artifact_present: bool,
}

/// Records invocations and answers with a fixed outcome.
#[derive(Debug)]
pub struct RecordingCallback {
    outcome: CallbackOutcome,
    records: Mutex<Vec<CallbackRecord>>,
}

impl Default for RecordingCallback {
    fn default() -> Self {
        Self::returning(CallbackOutcome::Invoked)
    }
}

impl RecordingCallback {
    #[must_use]
    pub const fn returning(outcome: CallbackOutcome) -> Self {
        Self {
            outcome,
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn records(&self) -> Vec<CallbackRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Callback for RecordingCallback {
    async fn try_invoke(&self, request: &CallbackRequest) -> CallbackOutcome {
        if let Ok(mut records) = self.records.lock() {
            records.push(CallbackRecord {
                task: request.task,
                name: request.name.clone(),
                version: request.version.clone(),
                artifact_present: request.artifact_dir.exists(),
            });
        }
        self.outcome.clone()
    }
}
