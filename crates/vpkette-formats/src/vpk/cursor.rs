//! Bounds-checked positional reads over an in-memory buffer

use crate::vpk::error::{VpkError, VpkResult};

/// Positional reader for little-endian integers and NUL-terminated strings
///
/// Reads never advance hidden state; every call takes the position to read
/// from and string reads return the position just past what they consumed.
#[derive(Debug, Clone, Copy)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
}

impl<'a> ByteCursor<'a> {
    /// Create a cursor over `data`
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Length of the underlying buffer
    pub const fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the underlying buffer is empty
    pub const fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow `len` bytes starting at `pos`
    pub fn slice(&self, pos: usize, len: usize) -> VpkResult<&'a [u8]> {
        pos.checked_add(len)
            .and_then(|end| self.data.get(pos..end))
            .ok_or(VpkError::OutOfBounds {
                offset: pos,
                len,
                size: self.data.len(),
            })
    }

    /// Read a little-endian `u16` at `pos`
    pub fn read_u16_le(&self, pos: usize) -> VpkResult<u16> {
        let bytes = self.slice(pos, 2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    /// Read a little-endian `u32` at `pos`
    pub fn read_u32_le(&self, pos: usize) -> VpkResult<u32> {
        let bytes = self.slice(pos, 4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a NUL-terminated string at `pos`
    ///
    /// Returns the string and the position after its terminator. A string
    /// that runs into the end of the buffer without a terminator reads as
    /// empty with the end-of-buffer position, so an empty result means either
    /// an empty string or truncation; callers tell them apart by position.
    pub fn read_cstring(&self, pos: usize) -> VpkResult<(&'a str, usize)> {
        let Some(rest) = self.data.get(pos..) else {
            return Ok(("", self.data.len()));
        };

        match rest.iter().position(|&b| b == 0) {
            Some(nul) => {
                let text = std::str::from_utf8(&rest[..nul])
                    .map_err(|_| VpkError::InvalidUtf8 { offset: pos })?;
                Ok((text, pos + nul + 1))
            }
            None => Ok(("", self.data.len())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_reads() {
        let data = [0x34, 0x12, 0xAA, 0x55, 0xFF];
        let cursor = ByteCursor::new(&data);

        assert_eq!(cursor.read_u16_le(0).unwrap(), 0x1234);
        assert_eq!(cursor.read_u32_le(0).unwrap(), 0x55AA_1234);
        assert_eq!(cursor.read_u16_le(3).unwrap(), 0xFF55);
    }

    #[test]
    fn test_fixed_width_out_of_bounds() {
        let data = [0u8; 5];
        let cursor = ByteCursor::new(&data);

        assert!(matches!(
            cursor.read_u32_le(2),
            Err(VpkError::OutOfBounds {
                offset: 2,
                len: 4,
                size: 5
            })
        ));
        assert!(cursor.read_u16_le(4).is_err());
        assert!(cursor.read_u16_le(usize::MAX).is_err());
    }

    #[test]
    fn test_cstring_reads() {
        let data = b"vmap_c\0maps\0\0";
        let cursor = ByteCursor::new(data);

        let (ext, pos) = cursor.read_cstring(0).unwrap();
        assert_eq!(ext, "vmap_c");
        assert_eq!(pos, 7);

        let (dir, pos) = cursor.read_cstring(pos).unwrap();
        assert_eq!(dir, "maps");
        assert_eq!(pos, 12);

        let (empty, pos) = cursor.read_cstring(pos).unwrap();
        assert_eq!(empty, "");
        assert_eq!(pos, 13);
    }

    #[test]
    fn test_cstring_truncated_reads_empty() {
        let cursor = ByteCursor::new(b"unterminated");
        assert_eq!(cursor.read_cstring(0).unwrap(), ("", 12));

        // Past the end behaves the same way
        assert_eq!(cursor.read_cstring(40).unwrap(), ("", 12));
    }

    #[test]
    fn test_cstring_invalid_utf8() {
        let cursor = ByteCursor::new(&[0xFF, 0xFE, 0x00]);
        assert!(matches!(
            cursor.read_cstring(0),
            Err(VpkError::InvalidUtf8 { offset: 0 })
        ));
    }
}
