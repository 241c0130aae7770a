//! Unpack an archive to disk.

use crate::error::{TerrainError, TerrainResult};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};
use vpkette_formats::vpk::{VpkError, VpkReader};

/// What an extraction wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractSummary {
    /// Files written
    pub files: usize,
    /// Bytes written
    pub bytes: usize,
}

/// Resolve a logical path under `target`, refusing anything that would
/// land outside it
fn destination(target: &Path, logical: &str) -> TerrainResult<PathBuf> {
    let relative = Path::new(logical);
    if relative
        .components()
        .all(|component| matches!(component, Component::Normal(_)))
    {
        Ok(target.join(relative))
    } else {
        Err(VpkError::InvalidPath {
            path: logical.to_string(),
            reason: "path escapes the extraction directory",
        }
        .into())
    }
}

/// Write every file of `archive` under `target`.
///
/// Parent directories are created as needed. Paths are checked before
/// anything is written, so a hostile archive writes nothing.
pub fn extract_all(archive: &Path, target: &Path) -> TerrainResult<ExtractSummary> {
    let mut reader = VpkReader::open(archive).map_err(|err| match err {
        VpkError::Io(source) => TerrainError::io(archive, source),
        other => other.into(),
    })?;

    let destinations = reader
        .index()
        .paths()
        .map(|path| destination(target, path))
        .collect::<TerrainResult<Vec<_>>>()?;

    let mut summary = ExtractSummary::default();
    for (file, destination) in reader.files().zip(destinations) {
        let (path, data) = file?;
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|source| TerrainError::io(parent, source))?;
        }
        fs::write(&destination, &data).map_err(|source| TerrainError::io(&destination, source))?;
        debug!("Extracted {} ({} bytes)", path, data.len());

        summary.files += 1;
        summary.bytes += data.len();
    }

    info!(
        "Extracted {} files ({} bytes) from {} to {}",
        summary.files,
        summary.bytes,
        archive.display(),
        target.display()
    );
    Ok(summary)
}
