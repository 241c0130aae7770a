//! Directory entry records

use crate::vpk::constants::{EMBEDDED_ARCHIVE_INDEX, ENTRY_SIZE, ENTRY_TERMINATOR};
use crate::vpk::cursor::ByteCursor;
use crate::vpk::error::VpkResult;
use binrw::BinWrite;
use std::io::Cursor;

/// The 18-byte record stored after each filename in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinWrite)]
#[bw(little)]
pub struct EntryRecord {
    /// CRC-32 of the file contents
    pub crc32: u32,

    /// Bytes stored inline in the tree right after this record
    pub preload_length: u16,

    /// Companion archive number, or 0x7FFF for embedded data
    pub archive_index: u16,

    /// Offset of the data, relative to the embedded data region when
    /// embedded, or to the start of the companion archive otherwise
    pub archive_offset: u32,

    /// Bytes of data stored at `archive_offset`
    pub file_length: u32,

    /// Always 0xFFFF in a well-formed tree
    pub terminator: u16,
}

impl EntryRecord {
    /// Create a record for data embedded in the directory file
    pub fn embedded(crc32: u32, archive_offset: u32, file_length: u32) -> Self {
        Self {
            crc32,
            preload_length: 0,
            archive_index: EMBEDDED_ARCHIVE_INDEX,
            archive_offset,
            file_length,
            terminator: ENTRY_TERMINATOR,
        }
    }

    /// Read a record at `pos`
    ///
    /// The terminator is returned as found; validating it is up to the
    /// caller, which knows the path the record belongs to.
    pub fn read_at(cursor: &ByteCursor<'_>, pos: usize) -> VpkResult<Self> {
        cursor.slice(pos, ENTRY_SIZE)?;
        Ok(Self {
            crc32: cursor.read_u32_le(pos)?,
            preload_length: cursor.read_u16_le(pos + 4)?,
            archive_index: cursor.read_u16_le(pos + 6)?,
            archive_offset: cursor.read_u32_le(pos + 8)?,
            file_length: cursor.read_u32_le(pos + 12)?,
            terminator: cursor.read_u16_le(pos + 16)?,
        })
    }

    /// Append the serialized record to `output`
    pub fn write_into(&self, output: &mut Vec<u8>) -> VpkResult<()> {
        let end = output.len() as u64;
        let mut cursor = Cursor::new(output);
        cursor.set_position(end);
        self.write(&mut cursor)?;
        Ok(())
    }

    /// Check if the data lives in the directory file itself
    pub fn is_embedded(&self) -> bool {
        self.archive_index == EMBEDDED_ARCHIVE_INDEX
    }

    /// Check if the record ends with the expected terminator
    pub fn has_valid_terminator(&self) -> bool {
        self.terminator == ENTRY_TERMINATOR
    }
}

/// Parsed entry of an open archive, with offsets resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VpkEntry {
    /// CRC-32 of the file contents
    pub crc32: u32,
    /// Bytes stored inline in the tree
    pub preload_length: u16,
    /// Companion archive number, or 0x7FFF for embedded data
    pub archive_index: u16,
    /// Offset of the data in its backing file (whole-file offset for
    /// embedded data)
    pub archive_offset: u64,
    /// Bytes of data stored at `archive_offset`
    pub file_length: u32,
    /// Absolute offset of the preload bytes in the directory file
    pub preload_offset: usize,
}

impl VpkEntry {
    /// Resolve a record read from the tree
    ///
    /// `data_offset` is the absolute offset of the embedded data region and
    /// `preload_offset` the position right after the record.
    pub fn from_record(record: &EntryRecord, data_offset: usize, preload_offset: usize) -> Self {
        let archive_offset = if record.is_embedded() {
            u64::from(record.archive_offset) + data_offset as u64
        } else {
            u64::from(record.archive_offset)
        };

        Self {
            crc32: record.crc32,
            preload_length: record.preload_length,
            archive_index: record.archive_index,
            archive_offset,
            file_length: record.file_length,
            preload_offset,
        }
    }

    /// Check if the data lives in the directory file itself
    pub fn is_embedded(&self) -> bool {
        self.archive_index == EMBEDDED_ARCHIVE_INDEX
    }

    /// Total size of the file (preload plus archive data)
    pub fn total_length(&self) -> u64 {
        u64::from(self.preload_length) + u64::from(self.file_length)
    }
}
