//! Error types for VPK operations

use thiserror::Error;

/// VPK operation result type
pub type VpkResult<T> = Result<T, VpkError>;

/// Error types for VPK parsing, extraction and building
#[derive(Debug, Error)]
pub enum VpkError {
    /// Fixed-width read or data range past the end of a buffer
    #[error("read out of bounds: {len} bytes at offset {offset}, buffer is {size} bytes")]
    OutOfBounds {
        /// Offset of the read
        offset: usize,
        /// Number of bytes requested
        len: usize,
        /// Size of the buffer
        size: usize,
    },

    /// Entry record does not end with the 0xFFFF terminator
    #[error("malformed index: entry for '{path}' has terminator 0x{terminator:04x}")]
    MalformedIndex {
        /// Logical path of the entry
        path: String,
        /// Terminator value found
        terminator: u16,
    },

    /// Header signature mismatch
    #[error("invalid VPK signature: 0x{0:08x}")]
    InvalidSignature(u32),

    /// Unsupported header version
    #[error("unsupported VPK version: {0}")]
    UnsupportedVersion(u32),

    /// Path cannot be stored in the tree
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// Offending path
        path: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// A size or offset does not fit the 32-bit fields of the format
    #[error("{what} too large for VPK: {size} bytes")]
    ArchiveTooLarge {
        /// Which quantity overflowed
        what: &'static str,
        /// Its size
        size: u64,
    },

    /// Entry lives in a companion archive that cannot be located
    #[error("companion archive {archive_index:03} unavailable")]
    CompanionUnavailable {
        /// Archive index of the entry
        archive_index: u16,
    },

    /// Tree string is not valid UTF-8
    #[error("invalid UTF-8 in tree string at offset {offset}")]
    InvalidUtf8 {
        /// Offset of the string
        offset: usize,
    },

    /// Binary read/write error
    #[error("binary format error: {0}")]
    BinRw(#[from] binrw::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VpkError {
    /// Check if the archive contents are damaged or not a VPK at all
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Self::OutOfBounds { .. }
                | Self::MalformedIndex { .. }
                | Self::InvalidSignature(_)
                | Self::UnsupportedVersion(_)
                | Self::InvalidUtf8 { .. }
        )
    }

    /// Check if this error came from the filesystem
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_) | Self::CompanionUnavailable { .. })
    }
}
