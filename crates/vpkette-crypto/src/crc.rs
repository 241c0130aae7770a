//! CRC-32 checksums for directory entries

/// CRC-32 (ISO-HDLC polynomial) of a file's raw bytes
pub fn file_crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}
