//! Artifact fixtures: a manifest plus the files it declares.

use crate::core::ArtifactKind;
use crate::manifest::{Manifest, Source};
use crate::utils::fs::join_relative;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Builder for a module or enabler tree under the default layout.
///
/// Files are given relative to the artifact directory (`modules/<name>/`);
/// every file plus the manifest itself ends up in `include`.
#[derive(Debug, Clone)]
pub struct ArtifactFixture {
    kind: ArtifactKind,
    name: String,
    version: String,
    files: Vec<(String, Vec<u8>)>,
    extra_include: Vec<String>,
    exclude: Vec<String>,
    source: Option<Source>,
}

impl ArtifactFixture {
    pub fn module(name: &str, version: &str) -> Self {
        Self::new(ArtifactKind::Module, name, version)
    }

    pub fn enabler(name: &str, version: &str) -> Self {
        Self::new(ArtifactKind::Enabler, name, version)
    }

    fn new(kind: ArtifactKind, name: &str, version: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            version: version.to_string(),
            files: Vec::new(),
            extra_include: Vec::new(),
            exclude: Vec::new(),
            source: None,
        }
    }

    /// Add a declared file, relative to the artifact directory.
    #[must_use]
    pub fn file(mut self, relative: &str, content: impl AsRef<[u8]>) -> Self {
        self.files.push((relative.to_string(), content.as_ref().to_vec()));
        self
    }

    /// Declare an include entry without writing anything for it.
    #[must_use]
    pub fn include(mut self, repo_relative: &str) -> Self {
        self.extra_include.push(repo_relative.to_string());
        self
    }

    /// Write a file under the artifact directory and declare it excluded.
    #[must_use]
    pub fn excluded_file(mut self, relative: &str, content: impl AsRef<[u8]>) -> Self {
        let path = self.path_of(relative);
        self.exclude.push(path);
        self.files.push((relative.to_string(), content.as_ref().to_vec()));
        self
    }

    #[must_use]
    pub fn git_source(mut self, url: &str, tag_prefix: Option<&str>) -> Self {
        self.source = Some(Source {
            git: url.to_string(),
            tag_prefix: tag_prefix.map(String::from),
        });
        self
    }

    /// Artifact directory, e.g. `modules/sample`.
    #[must_use]
    pub fn dir(&self) -> String {
        let base = match self.kind {
            ArtifactKind::Module => crate::constants::DEFAULT_MODULES_DIR,
            ArtifactKind::Enabler => crate::constants::DEFAULT_ENABLERS_DIR,
        };
        format!("{base}/{}", self.name)
    }

    /// Repository-relative path of a file under the artifact directory.
    #[must_use]
    pub fn path_of(&self, relative: &str) -> String {
        format!("{}/{relative}", self.dir())
    }

    /// Repository-relative manifest path.
    #[must_use]
    pub fn manifest_path(&self) -> String {
        self.path_of(self.kind.manifest_file_name())
    }

    /// The manifest this fixture writes.
    #[must_use]
    pub fn manifest(&self) -> Manifest {
        let mut include = vec![self.manifest_path()];
        include.extend(self.files.iter().map(|(relative, _)| self.path_of(relative)));
        include.extend(self.extra_include.iter().cloned());

        Manifest {
            schema: None,
            name: self.name.clone(),
            version: self.version.clone(),
            description: format!("{} fixture", self.name),
            include,
            exclude: self.exclude.clone(),
            source: self.source.clone(),
            install: None,
        }
    }

    /// Write the manifest and every file under `root`.
    pub fn write_to(&self, root: &Path) -> Result<Manifest> {
        let manifest = self.manifest();
        for (relative, content) in &self.files {
            let path = join_relative(root, &self.path_of(relative));
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        }

        let path = join_relative(root, &self.manifest_path());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, manifest.to_json()?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(manifest)
    }
}
