//! VPK archive builder
//!
//! Builds single-file version 2 archives: every file is embedded after the
//! tree, nothing is preloaded and no companion archives are produced.
//!
//! Files are grouped by extension, then by directory, in the order each
//! group is first seen. Within a directory files keep insertion order. The
//! resulting layout is observable by consumers, so insertion order matters.

use crate::vpk::FileMap;
use crate::vpk::checksum::SelfHashes;
use crate::vpk::constants::{BLANK_TOKEN, ENTRY_SIZE};
use crate::vpk::entry::EntryRecord;
use crate::vpk::error::{VpkError, VpkResult};
use crate::vpk::header::VpkHeader;
use indexmap::IndexMap;
use tracing::debug;
use vpkette_crypto::file_crc32;

/// Extension -> directory -> files, in first-seen order
type TreeGroups<'a, T> = IndexMap<&'a str, IndexMap<&'a str, Vec<(&'a str, T)>>>;

/// A logical path split into its tree components
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TreePath<'a> {
    directory: &'a str,
    filename: &'a str,
    extension: &'a str,
}

impl<'a> TreePath<'a> {
    fn split(path: &'a str) -> VpkResult<Self> {
        let invalid = |reason| VpkError::InvalidPath {
            path: path.to_string(),
            reason,
        };

        if path.is_empty() {
            return Err(invalid("path is empty"));
        }
        if path.contains('\0') {
            return Err(invalid("path contains a NUL byte"));
        }
        if path.starts_with('/') {
            return Err(invalid("path must be relative"));
        }
        if path.ends_with('/') {
            return Err(invalid("path has no file name"));
        }

        let (directory, file) = path.rsplit_once('/').unwrap_or((BLANK_TOKEN, path));
        let (filename, extension) = file.rsplit_once('.').unwrap_or((file, BLANK_TOKEN));

        if directory == BLANK_TOKEN && path.contains('/') {
            return Err(invalid("directory name is reserved"));
        }
        if filename.is_empty() {
            return Err(invalid("file name is empty"));
        }
        if extension.is_empty() {
            return Err(invalid("extension is empty"));
        }
        if extension == BLANK_TOKEN && file.contains('.') {
            return Err(invalid("extension is reserved"));
        }

        Ok(Self {
            directory,
            filename,
            extension,
        })
    }
}

fn group<'a, T, I>(items: I) -> VpkResult<TreeGroups<'a, T>>
where
    I: IntoIterator<Item = (&'a str, T)>,
{
    let mut groups: TreeGroups<'a, T> = IndexMap::new();
    for (path, item) in items {
        let split = TreePath::split(path)?;
        groups
            .entry(split.extension)
            .or_default()
            .entry(split.directory)
            .or_default()
            .push((split.filename, item));
    }
    Ok(groups)
}

fn tree_length_of<T>(groups: &TreeGroups<'_, T>) -> usize {
    let mut length = 0;
    for (extension, directories) in groups {
        length += extension.len() + 1;
        for (directory, files) in directories {
            length += directory.len() + 1;
            for (filename, _) in files {
                length += filename.len() + 1 + ENTRY_SIZE;
            }
            // Closes the file list
            length += 1;
        }
        // Closes the directory list
        length += 1;
    }
    // Closes the extension list
    length + 1
}

/// Size of the tree an archive holding `paths` would have
pub fn calculate_tree_length<'a, I>(paths: I) -> VpkResult<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let groups = group(paths.into_iter().map(|path| (path, ())))?;
    Ok(tree_length_of(&groups))
}

fn to_u32(value: usize, what: &'static str) -> VpkResult<u32> {
    u32::try_from(value).map_err(|_| VpkError::ArchiveTooLarge {
        what,
        size: value as u64,
    })
}

/// Builder for VPK archives
#[derive(Debug, Clone, Default)]
pub struct VpkBuilder {
    files: FileMap,
}

impl VpkBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder holding every file of `files`, in order
    pub fn from_file_map(files: FileMap) -> VpkResult<Self> {
        for path in files.keys() {
            TreePath::split(path)?;
        }
        Ok(Self { files })
    }

    /// Add a file
    ///
    /// Adding a path twice keeps its original position with the new data.
    pub fn add_file(&mut self, path: impl Into<String>, data: Vec<u8>) -> VpkResult<()> {
        let path = path.into();
        TreePath::split(&path)?;
        self.files.insert(path, data);
        Ok(())
    }

    /// Number of files added
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if no files were added
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Serialize the archive
    pub fn build(&self) -> VpkResult<Vec<u8>> {
        let groups = group(
            self.files
                .iter()
                .map(|(path, data)| (path.as_str(), data.as_slice())),
        )?;

        let mut tree = Vec::with_capacity(tree_length_of(&groups));
        let mut ordered: Vec<&[u8]> = Vec::with_capacity(self.files.len());
        let mut data_length = 0usize;

        for (extension, directories) in &groups {
            tree.extend_from_slice(extension.as_bytes());
            tree.push(0);

            for (directory, files) in directories {
                tree.extend_from_slice(directory.as_bytes());
                tree.push(0);

                for &(filename, data) in files {
                    tree.extend_from_slice(filename.as_bytes());
                    tree.push(0);

                    let record = EntryRecord::embedded(
                        file_crc32(data),
                        to_u32(data_length, "embedded data")?,
                        to_u32(data.len(), "file")?,
                    );
                    record.write_into(&mut tree)?;

                    data_length += data.len();
                    ordered.push(data);
                }
                tree.push(0);
            }
            tree.push(0);
        }
        tree.push(0);

        let header = VpkHeader::new(
            to_u32(tree.len(), "tree")?,
            to_u32(data_length, "embedded data")?,
        );
        let header_bytes = header.to_bytes()?;
        let hashes = SelfHashes::compute(&header_bytes, &tree, ordered.iter().copied());

        let mut output = Vec::with_capacity(
            header_bytes.len() + tree.len() + data_length + header.self_hashes_length as usize,
        );
        output.extend_from_slice(&header_bytes);
        output.extend_from_slice(&tree);
        for data in ordered {
            output.extend_from_slice(data);
        }
        output.extend_from_slice(&hashes.to_bytes());

        debug!(
            "Built VPK: {} files, {} tree bytes, {} data bytes",
            self.files.len(),
            tree.len(),
            data_length
        );

        Ok(output)
    }
}
