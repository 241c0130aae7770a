//! Terrain patching.
//!
//! Patching reads every file of the stock archive and of the override
//! archive, merges them with the override taking precedence, and writes a
//! fresh single-file archive. The output is built completely in memory
//! before the output path is touched.

use crate::error::{TerrainError, TerrainResult};
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use vpkette_formats::vpk::{FileMap, PatchMerge, VpkBuilder, VpkError, VpkReader};

/// What a patch run produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchSummary {
    /// Files in the base archive
    pub base_files: usize,
    /// Files in the override archive
    pub override_files: usize,
    /// Files in the written archive
    pub merged_files: usize,
    /// Size of the written archive
    pub bytes_written: usize,
}

/// Read every file of an archive, attributing I/O failures to `path`
pub fn read_archive(path: &Path) -> TerrainResult<FileMap> {
    VpkReader::open(path)
        .and_then(VpkReader::into_file_map)
        .map_err(|err| match err {
            VpkError::Io(source) => TerrainError::io(path, source),
            other => other.into(),
        })
}

/// Patch `base` with `overrides` and write the result to `output`.
///
/// Compiled maps in the override archive replace the stock map.
pub fn patch_archive(base: &Path, overrides: &Path, output: &Path) -> TerrainResult<PatchSummary> {
    patch_archive_with(&PatchMerge::default(), base, overrides, output)
}

/// Patch `base` with `overrides` using a custom merge policy
pub fn patch_archive_with(
    merge: &PatchMerge,
    base: &Path,
    overrides: &Path,
    output: &Path,
) -> TerrainResult<PatchSummary> {
    info!(
        "Patching {} with {}",
        base.display(),
        overrides.display()
    );

    let base_files = read_archive(base)?;
    let override_files = read_archive(overrides)?;
    let (base_count, override_count) = (base_files.len(), override_files.len());

    let merged = merge.merge(base_files, override_files);
    let merged_files = merged.len();
    let bytes = VpkBuilder::from_file_map(merged)?.build()?;

    write_output(output, &bytes)?;

    let summary = PatchSummary {
        base_files: base_count,
        override_files: override_count,
        merged_files,
        bytes_written: bytes.len(),
    };
    info!(
        "Wrote {} ({} files, {} bytes; {} base, {} override)",
        output.display(),
        summary.merged_files,
        summary.bytes_written,
        summary.base_files,
        summary.override_files
    );

    Ok(summary)
}

fn write_output(output: &Path, bytes: &[u8]) -> TerrainResult<()> {
    fs::write(output, bytes).map_err(|source| {
        if output.is_file() {
            match fs::remove_file(output) {
                Ok(()) => warn!("Removed partial output {}", output.display()),
                Err(err) => warn!(
                    "Failed to remove partial output {}: {}",
                    output.display(),
                    err
                ),
            }
        }
        TerrainError::io(output, source)
    })
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_read_archive_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dota.vpk");

        let err = read_archive(&path).unwrap_err();
        match err {
            TerrainError::Io { path: failed, .. } => assert_eq!(failed, path),
            other => panic!("expected Io, got {other}"),
        }
    }

    #[test]
    fn test_read_archive_not_a_vpk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dota.vpk");
        fs::write(&path, b"definitely not an archive").unwrap();

        let err = read_archive(&path).unwrap_err();
        assert!(matches!(err, TerrainError::Vpk(ref vpk) if vpk.is_corruption()));
    }

    #[test]
    fn test_write_failure_reports_output() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("missing").join("dota.vpk");

        let err = write_output(&output, b"data").unwrap_err();
        assert!(matches!(err, TerrainError::Io { ref path, .. } if *path == output));
        assert!(!output.exists());
    }
}
