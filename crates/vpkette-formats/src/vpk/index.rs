//! Directory tree parsing
//!
//! The tree maps every logical path to its [`VpkEntry`]. It is walked as
//! three nested lists (extension, directory, filename), each closed by an
//! empty string. Running out of bytes in the middle of a string reads as an
//! empty string and therefore closes the current list; only fixed-width
//! reads past the end of the tree are errors.

use crate::vpk::constants::{BLANK_TOKEN, ENTRY_SIZE};
use crate::vpk::cursor::ByteCursor;
use crate::vpk::entry::{EntryRecord, VpkEntry};
use crate::vpk::error::{VpkError, VpkResult};
use crate::vpk::header::VpkHeader;
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Parsed directory of a VPK archive
///
/// Entries keep tree traversal order. A path that appears twice keeps its
/// first position and the entry read last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VpkIndex {
    /// Archive header
    pub header: VpkHeader,
    entries: IndexMap<String, VpkEntry>,
}

impl VpkIndex {
    /// Parse the header and directory tree of an archive
    pub fn parse(data: &[u8]) -> VpkResult<Self> {
        let header = VpkHeader::parse(data)?;

        let tree_start = header.header_size();
        let tree_end = header.embedded_data_offset();
        if tree_end > data.len() {
            warn!(
                "Tree claims {} bytes but only {} are available",
                header.tree_length,
                data.len().saturating_sub(tree_start)
            );
        }

        let cursor = ByteCursor::new(&data[..tree_end.min(data.len())]);
        let data_offset = header.embedded_data_offset();
        let mut entries = IndexMap::new();
        let mut pos = tree_start;

        loop {
            let (extension, next) = cursor.read_cstring(pos)?;
            pos = next;
            if extension.is_empty() {
                break;
            }

            loop {
                let (directory, next) = cursor.read_cstring(pos)?;
                pos = next;
                if directory.is_empty() {
                    break;
                }

                loop {
                    let (filename, next) = cursor.read_cstring(pos)?;
                    pos = next;
                    if filename.is_empty() {
                        break;
                    }

                    let record = EntryRecord::read_at(&cursor, pos)?;
                    pos += ENTRY_SIZE;

                    let path = logical_path(directory, filename, extension);
                    if !record.has_valid_terminator() {
                        return Err(VpkError::MalformedIndex {
                            path,
                            terminator: record.terminator,
                        });
                    }

                    // Preload bytes sit inline in the tree after the record
                    let preload_offset = pos;
                    cursor.slice(pos, usize::from(record.preload_length))?;
                    pos += usize::from(record.preload_length);

                    let entry = VpkEntry::from_record(&record, data_offset, preload_offset);
                    if entries.insert(path, entry).is_some() {
                        debug!("Duplicate tree entry, keeping the last one");
                    }
                }
            }
        }

        debug!(
            "Parsed VPK v{} tree: {} entries, {} of {} tree bytes used",
            header.version,
            entries.len(),
            pos - tree_start,
            header.tree_length
        );

        Ok(Self { header, entries })
    }

    /// Look up an entry by logical path
    pub fn get(&self, path: &str) -> Option<&VpkEntry> {
        self.entries.get(path)
    }

    /// Look up an entry by traversal position
    pub fn get_index(&self, index: usize) -> Option<(&str, &VpkEntry)> {
        self.entries
            .get_index(index)
            .map(|(path, entry)| (path.as_str(), entry))
    }

    /// Check if a path is present
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Iterate over entries in traversal order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VpkEntry)> {
        self.entries
            .iter()
            .map(|(path, entry)| (path.as_str(), entry))
    }

    /// Iterate over paths in traversal order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the archive has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Join tree components into a logical path
///
/// The blank token as directory means the archive root; as extension it
/// means the file has none.
pub(crate) fn logical_path(directory: &str, filename: &str, extension: &str) -> String {
    let mut path = String::with_capacity(directory.len() + filename.len() + extension.len() + 2);
    if directory != BLANK_TOKEN {
        path.push_str(directory);
        path.push('/');
    }
    path.push_str(filename);
    if extension != BLANK_TOKEN {
        path.push('.');
        path.push_str(extension);
    }
    path
}
