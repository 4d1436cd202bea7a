//! Selecting which files of a staging root move into the workspace.

use crate::core::ModsyncError;
use crate::installer::plan::CopyStep;
use crate::manifest::Manifest;
use crate::resolver::expand;
use crate::utils::fs::join_relative;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Copy steps for every file `manifest` declares, read from `source_root`.
///
/// Include entries must exist in the source. With `fallback_root` set, a
/// missing entry may instead be satisfied by a file of the same name directly
/// under that root (archives produced by older tooling were flat). Exclude
/// entries are applied when present and ignored when absent, since packed
/// archives never contain them.
pub(crate) fn copy_steps(
    manifest: &Manifest,
    source_root: &Path,
    fallback_root: Option<&Path>,
) -> Result<Vec<CopyStep>, ModsyncError> {
    let mut selected = BTreeMap::new();

    for entry in manifest.normalized_include()? {
        let mut files = BTreeSet::new();
        expand(source_root, &entry, &mut files);

        if !files.is_empty() {
            for file in files {
                let source = join_relative(source_root, &file);
                selected.insert(file, source);
            }
            continue;
        }

        let fallback = fallback_root.and_then(|root| {
            let file_name = entry.rsplit('/').next()?;
            let candidate = root.join(file_name);
            candidate.is_file().then_some(candidate)
        });
        match fallback {
            Some(source) => {
                tracing::debug!("{entry} missing from staging tree, using {}", source.display());
                selected.insert(entry, source);
            }
            None => {
                return Err(ModsyncError::MissingPath {
                    path: entry,
                    root: source_root.display().to_string(),
                });
            }
        }
    }

    let mut excluded = BTreeSet::new();
    for entry in manifest.normalized_exclude()? {
        expand(source_root, &entry, &mut excluded);
    }
    for path in &excluded {
        if selected.remove(path).is_some() {
            tracing::debug!("Excluded {path}");
        }
    }

    if selected.is_empty() {
        return Err(ModsyncError::EmptyFileSet {
            name: manifest.name.clone(),
        });
    }

    Ok(selected
        .into_iter()
        .map(|(destination, source)| CopyStep {
            source,
            destination,
        })
        .collect())
}
