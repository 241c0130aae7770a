//! Self-hash trailer of version 2 archives
//!
//! The trailer is three MD5 digests:
//!
//! 1. **Tree hash**: the tree bytes alone
//! 2. **Chunk hash**: the chunk hash table (always empty when written here)
//! 3. **File hash**: header, tree, embedded data, then the two digests above

use crate::vpk::constants::SELF_HASHES_SIZE;
use crate::vpk::cursor::ByteCursor;
use crate::vpk::error::VpkResult;
use vpkette_crypto::{Md5Digest, Md5Hasher};

/// The 48-byte self-hash trailer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelfHashes {
    /// MD5 of the tree
    pub tree_hash: Md5Digest,
    /// MD5 of the chunk hash table
    pub chunk_hashes_hash: Md5Digest,
    /// MD5 of everything before this digest
    pub file_hash: Md5Digest,
}

impl SelfHashes {
    /// Compute the trailer for an archive with an empty chunk hash table
    ///
    /// `files` must yield the embedded file contents in the order they are
    /// laid out after the tree.
    pub fn compute<'a, I>(header: &[u8], tree: &[u8], files: I) -> Self
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let tree_hash = Md5Digest::from_data(tree);
        let chunk_hashes_hash = Md5Digest::empty();

        let mut hasher = Md5Hasher::new();
        hasher.update(header);
        hasher.update(tree);
        for data in files {
            hasher.update(data);
        }
        hasher.update(tree_hash.as_bytes());
        hasher.update(chunk_hashes_hash.as_bytes());

        Self {
            tree_hash,
            chunk_hashes_hash,
            file_hash: hasher.finish(),
        }
    }

    /// Decode a trailer from the first 48 bytes of `data`
    pub fn parse(data: &[u8]) -> VpkResult<Self> {
        let cursor = ByteCursor::new(data);
        let digest = |pos: usize| -> VpkResult<Md5Digest> {
            let mut bytes = [0u8; 16];
            bytes.copy_from_slice(cursor.slice(pos, 16)?);
            Ok(Md5Digest::from_bytes(bytes))
        };

        Ok(Self {
            tree_hash: digest(0)?,
            chunk_hashes_hash: digest(16)?,
            file_hash: digest(32)?,
        })
    }

    /// Serialize in trailer order
    pub fn to_bytes(&self) -> [u8; SELF_HASHES_SIZE] {
        let mut bytes = [0u8; SELF_HASHES_SIZE];
        bytes[..16].copy_from_slice(self.tree_hash.as_bytes());
        bytes[16..32].copy_from_slice(self.chunk_hashes_hash.as_bytes());
        bytes[32..].copy_from_slice(self.file_hash.as_bytes());
        bytes
    }
}

impl crate::VpkFormat for SelfHashes {
    fn parse(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>> {
        Self::parse(data).map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }

    fn build(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        Ok(self.to_bytes().to_vec())
    }
}
