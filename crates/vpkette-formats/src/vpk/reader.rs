//! Content extraction from open archives
//!
//! An open archive owns its directory file buffer and any companion archives
//! it had to load. Companions are read on first use and kept until the
//! reader is dropped.

use crate::vpk::FileMap;
use crate::vpk::checksum::SelfHashes;
use crate::vpk::constants::SELF_HASHES_SIZE;
use crate::vpk::cursor::ByteCursor;
use crate::vpk::entry::VpkEntry;
use crate::vpk::error::{VpkError, VpkResult};
use crate::vpk::index::VpkIndex;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Language tag removed from directory file names to find companions
const LANGUAGE_TAG: &str = "english";

/// Marker in directory file names replaced by the companion number
const DIR_MARKER: &str = "dir.";

/// Derive a companion archive file name from the directory file name
///
/// The first `english` is removed and the first `dir.` is replaced by the
/// zero-padded archive index, so `pak01_dir.vpk` becomes `pak01_003.vpk`.
pub fn companion_file_name(dir_file_name: &str, archive_index: u16) -> String {
    dir_file_name
        .replacen(LANGUAGE_TAG, "", 1)
        .replacen(DIR_MARKER, &format!("{archive_index:03}."), 1)
}

fn companion_path_for(dir_path: Option<&Path>, archive_index: u16) -> Option<PathBuf> {
    let dir_path = dir_path?;
    let name = dir_path.file_name()?.to_str()?;
    Some(dir_path.with_file_name(companion_file_name(name, archive_index)))
}

/// Reader for a VPK archive held in memory
#[derive(Debug)]
pub struct VpkReader {
    /// Directory file location, if opened from disk
    path: Option<PathBuf>,
    /// Directory file contents
    data: Vec<u8>,
    /// Parsed tree
    index: VpkIndex,
    /// Companion archives loaded so far
    companions: HashMap<u16, Vec<u8>>,
}

impl VpkReader {
    /// Open and index an archive on disk
    pub fn open<P: AsRef<Path>>(path: P) -> VpkResult<Self> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        let index = VpkIndex::parse(&data)?;
        debug!(
            "Opened {} ({} bytes, {} entries)",
            path.display(),
            data.len(),
            index.len()
        );

        Ok(Self {
            path: Some(path.to_path_buf()),
            data,
            index,
            companions: HashMap::new(),
        })
    }

    /// Index an archive already in memory
    ///
    /// Entries stored in companion archives cannot be read from such a
    /// reader.
    pub fn from_bytes(data: Vec<u8>) -> VpkResult<Self> {
        let index = VpkIndex::parse(&data)?;
        Ok(Self {
            path: None,
            data,
            index,
            companions: HashMap::new(),
        })
    }

    /// Parsed directory tree
    pub fn index(&self) -> &VpkIndex {
        &self.index
    }

    /// Directory file location
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Location of a companion archive
    pub fn companion_path(&self, archive_index: u16) -> Option<PathBuf> {
        companion_path_for(self.path.as_deref(), archive_index)
    }

    /// Self-hash trailer, when the header declares one
    pub fn self_hashes(&self) -> VpkResult<Option<SelfHashes>> {
        let header = &self.index.header;
        if (header.self_hashes_length as usize) < SELF_HASHES_SIZE {
            return Ok(None);
        }

        let trailer =
            ByteCursor::new(&self.data).slice(header.self_hashes_offset(), SELF_HASHES_SIZE)?;
        SelfHashes::parse(trailer).map(Some)
    }

    /// Read a file by logical path
    pub fn read_file(&mut self, path: &str) -> VpkResult<Option<Vec<u8>>> {
        let Some(entry) = self.index.get(path).copied() else {
            return Ok(None);
        };
        self.data_for(&entry).map(Some)
    }

    /// Materialize the contents of an entry
    ///
    /// The result is the entry's preload bytes followed by `file_length`
    /// bytes at `archive_offset` in the backing file.
    pub fn data_for(&mut self, entry: &VpkEntry) -> VpkResult<Vec<u8>> {
        let total = usize::try_from(entry.total_length()).map_err(|_| {
            VpkError::ArchiveTooLarge {
                what: "file",
                size: entry.total_length(),
            }
        })?;
        let mut output = Vec::with_capacity(total);

        let preload = ByteCursor::new(&self.data)
            .slice(entry.preload_offset, usize::from(entry.preload_length))?;
        output.extend_from_slice(preload);

        if entry.file_length > 0 {
            let offset =
                usize::try_from(entry.archive_offset).map_err(|_| VpkError::ArchiveTooLarge {
                    what: "archive offset",
                    size: entry.archive_offset,
                })?;
            let backing = if entry.is_embedded() {
                self.data.as_slice()
            } else {
                self.companion(entry.archive_index)?
            };
            output.extend_from_slice(
                ByteCursor::new(backing).slice(offset, entry.file_length as usize)?,
            );
        }

        Ok(output)
    }

    /// Lazily read every file in traversal order
    pub fn files(&mut self) -> Files<'_> {
        Files {
            reader: self,
            position: 0,
        }
    }

    /// Read every file into an ordered path map
    pub fn into_file_map(mut self) -> VpkResult<FileMap> {
        self.files().collect()
    }

    fn companion(&mut self, archive_index: u16) -> VpkResult<&[u8]> {
        let data = match self.companions.entry(archive_index) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let path = companion_path_for(self.path.as_deref(), archive_index)
                    .ok_or(VpkError::CompanionUnavailable { archive_index })?;
                debug!("Opening companion archive {}", path.display());
                entry.insert(fs::read(&path)?)
            }
        };
        Ok(data.as_slice())
    }
}

/// Single-pass iterator over `(path, contents)` pairs
///
/// Created by [`VpkReader::files`].
#[derive(Debug)]
pub struct Files<'a> {
    reader: &'a mut VpkReader,
    position: usize,
}

impl Iterator for Files<'_> {
    type Item = VpkResult<(String, Vec<u8>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let (path, entry) = self.reader.index.get_index(self.position)?;
        let (path, entry) = (path.to_string(), *entry);
        self.position += 1;
        Some(self.reader.data_for(&entry).map(|data| (path, data)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.reader.index.len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}
