//! Archive codec: resolved path sets to zip archives and back.
//!
//! # Determinism
//!
//! [`pack`] writes one deflated entry per resolved file, in sorted order, with a
//! fixed timestamp (1980-01-01 00:00:00, the zip epoch) and fixed permissions.
//! Two packs of an unchanged tree therefore produce byte-identical archives.
//!
//! # Staging
//!
//! [`unpack`] never writes into the repository. It expands the whole archive into
//! a fresh [`StagingRoot`]; selecting which paths move on into the workspace is
//! the reconciliation engine's job.
//!
//! # Naming
//!
//! Archives live at `dist/<name>/<name>.<version>.zip`. Older tooling produced
//! `Module.zip` and `Module.<version>.zip`; those are read as a fallback and
//! deleted on pack, never written.

use crate::constants::{ARCHIVE_EXTENSION, LEGACY_ARCHIVE_STEM};
use crate::core::ModsyncError;
use crate::resolver::ResolvedSet;
use crate::utils::fs::{StagingRoot, ensure_dir, ensure_parent_dir};
use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipArchive, ZipWriter};

/// Permissions recorded for every entry.
const ENTRY_PERMISSIONS: u32 = 0o644;

/// File name of the archive for `name` at `version`.
#[must_use]
pub fn archive_file_name(name: &str, version: &str) -> String {
    format!("{name}.{version}.{ARCHIVE_EXTENSION}")
}

/// Legacy archive file names for `version`, most specific first.
#[must_use]
pub fn legacy_file_names(version: &str) -> [String; 2] {
    [
        format!("{LEGACY_ARCHIVE_STEM}.{version}.{ARCHIVE_EXTENSION}"),
        format!("{LEGACY_ARCHIVE_STEM}.{ARCHIVE_EXTENSION}"),
    ]
}

/// File names to try, in order, when looking for an archive to unpack.
#[must_use]
pub fn archive_candidates(name: &str, version: &str) -> Vec<String> {
    let mut candidates = vec![archive_file_name(name, version)];
    candidates.extend(legacy_file_names(version));
    candidates
}

/// Build a zip archive holding every file of `set`.
///
/// Entry names are the set's root-relative forward-slash paths; content is the
/// raw file bytes read from the set's root.
pub fn pack(set: &ResolvedSet) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .last_modified_time(DateTime::default())
        .unix_permissions(ENTRY_PERMISSIONS);

    for relative in set.iter() {
        let source = set.absolute(relative);
        let content = std::fs::read(&source)
            .with_context(|| format!("Failed to read {} for packing", source.display()))?;

        writer.start_file(relative, options).map_err(|e| archive_error(relative, e))?;
        writer.write_all(&content).with_context(|| format!("Failed to write entry {relative}"))?;
        tracing::trace!("Packed {relative} ({} bytes)", content.len());
    }

    let cursor = writer.finish().map_err(|e| archive_error("<archive>", e))?;
    Ok(cursor.into_inner())
}

/// Expand `bytes` into a fresh staging root.
pub fn unpack(bytes: &[u8]) -> Result<StagingRoot> {
    let staging = StagingRoot::new("unpack")?;
    unpack_into(bytes, staging.path())?;
    Ok(staging)
}

/// Expand `bytes` into `dest`, rejecting entries that would escape it.
pub fn unpack_into(bytes: &[u8], dest: &Path) -> Result<()> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| archive_error("<archive>", e))?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).map_err(|e| archive_error("<archive>", e))?;
        let name = entry.name().to_string();
        let relative = entry.enclosed_name().ok_or_else(|| ModsyncError::ArchiveError {
            path: name.clone(),
            reason: "entry path escapes the extraction root".to_string(),
        })?;
        let target = dest.join(relative);

        if entry.is_dir() {
            ensure_dir(&target)?;
            continue;
        }

        ensure_parent_dir(&target)?;
        let mut file = std::fs::File::create(&target)
            .with_context(|| format!("Failed to create {}", target.display()))?;
        std::io::copy(&mut entry, &mut file)
            .with_context(|| format!("Failed to extract entry {name}"))?;
        tracing::trace!("Extracted {name}");
    }

    tracing::debug!("Expanded {} entries into {}", archive.len(), dest.display());
    Ok(())
}

/// Entry names of an archive, in stored order.
pub fn entry_names(bytes: &[u8]) -> Result<Vec<String>> {
    let archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| archive_error("<archive>", e))?;
    Ok(archive.file_names().map(String::from).collect())
}

/// Hex-encoded SHA-256 digest of archive bytes.
#[must_use]
pub fn digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn archive_error(path: &str, error: zip::result::ZipError) -> ModsyncError {
    ModsyncError::ArchiveError {
        path: path.to_string(),
        reason: error.to_string(),
    }
}
