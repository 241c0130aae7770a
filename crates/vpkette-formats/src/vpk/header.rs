//! VPK header structure

use crate::vpk::constants::{
    HEADER_SIZE_V1, HEADER_SIZE_V2, SELF_HASHES_SIZE, VPK_SIGNATURE, VPK_VERSION,
};
use crate::vpk::cursor::ByteCursor;
use crate::vpk::error::{VpkError, VpkResult};
use binrw::{BinRead, BinWrite};
use std::io::Cursor;

/// VPK header (12 bytes for v1, 28 bytes for v2, little-endian)
#[derive(Debug, Clone, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct VpkHeader {
    /// Signature: 0x55AA1234
    pub signature: u32,

    /// Format version (1 or 2)
    pub version: u32,

    /// Size of the directory tree following the header
    pub tree_length: u32,

    /// Bytes of file data embedded after the tree
    #[br(if(version >= 2))]
    #[bw(if(*version >= 2))]
    pub embed_chunk_length: u32,

    /// Size of the chunk hash table
    #[br(if(version >= 2))]
    #[bw(if(*version >= 2))]
    pub chunk_hashes_length: u32,

    /// Size of the self-hash trailer (48 when present)
    #[br(if(version >= 2))]
    #[bw(if(*version >= 2))]
    pub self_hashes_length: u32,

    /// Size of the signature section
    #[br(if(version >= 2))]
    #[bw(if(*version >= 2))]
    pub signature_length: u32,
}

impl VpkHeader {
    /// Create a version 2 header for an archive with all data embedded
    pub fn new(tree_length: u32, embed_chunk_length: u32) -> Self {
        Self {
            signature: VPK_SIGNATURE,
            version: VPK_VERSION,
            tree_length,
            embed_chunk_length,
            chunk_hashes_length: 0,
            self_hashes_length: SELF_HASHES_SIZE as u32,
            signature_length: 0,
        }
    }

    /// Parse the header at the start of `data`
    pub fn parse(data: &[u8]) -> VpkResult<Self> {
        let cursor = ByteCursor::new(data);

        let signature = cursor.read_u32_le(0)?;
        if signature != VPK_SIGNATURE {
            return Err(VpkError::InvalidSignature(signature));
        }

        let version = cursor.read_u32_le(4)?;
        let size = Self::size_for_version(version)?;
        let bytes = cursor.slice(0, size)?;

        Ok(Self::read(&mut Cursor::new(bytes))?)
    }

    /// Serialize the header
    pub fn to_bytes(&self) -> VpkResult<Vec<u8>> {
        let mut output = Vec::with_capacity(self.header_size());
        self.write(&mut Cursor::new(&mut output))?;
        Ok(output)
    }

    /// Header size in bytes for this version
    pub fn header_size(&self) -> usize {
        if self.version >= 2 {
            HEADER_SIZE_V2
        } else {
            HEADER_SIZE_V1
        }
    }

    /// Absolute offset of the embedded data region
    pub fn embedded_data_offset(&self) -> usize {
        self.header_size() + self.tree_length as usize
    }

    /// Absolute offset of the self-hash trailer
    pub fn self_hashes_offset(&self) -> usize {
        self.embedded_data_offset()
            + self.embed_chunk_length as usize
            + self.chunk_hashes_length as usize
    }

    fn size_for_version(version: u32) -> VpkResult<usize> {
        match version {
            1 => Ok(HEADER_SIZE_V1),
            2 => Ok(HEADER_SIZE_V2),
            other => Err(VpkError::UnsupportedVersion(other)),
        }
    }
}

impl crate::VpkFormat for VpkHeader {
    fn parse(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>> {
        Self::parse(data).map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }

    fn build(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
        self.to_bytes()
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }
}
