//! MD5 digests for the archive self-hash trailer

use md5::{Digest, Md5};
use std::fmt;

/// Size of an MD5 digest in bytes
pub const MD5_DIGEST_SIZE: usize = 16;

/// 16-byte MD5 digest value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Md5Digest([u8; MD5_DIGEST_SIZE]);

impl Md5Digest {
    /// Create digest from raw bytes
    pub const fn from_bytes(bytes: [u8; MD5_DIGEST_SIZE]) -> Self {
        Self(bytes)
    }

    /// Compute the digest of a single buffer
    pub fn from_data(data: &[u8]) -> Self {
        let mut hasher = Md5Hasher::new();
        hasher.update(data);
        hasher.finish()
    }

    /// Digest of zero bytes
    pub fn empty() -> Self {
        Self::from_data(&[])
    }

    /// Parse digest from hex string
    pub fn from_hex(hex: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = [0u8; MD5_DIGEST_SIZE];
        hex::decode_to_slice(hex, &mut bytes)?;
        Ok(Self(bytes))
    }

    /// Get raw bytes
    pub const fn as_bytes(&self) -> &[u8; MD5_DIGEST_SIZE] {
        &self.0
    }

    /// Convert to hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Md5Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; MD5_DIGEST_SIZE]> for Md5Digest {
    fn from(bytes: [u8; MD5_DIGEST_SIZE]) -> Self {
        Self(bytes)
    }
}

/// Incremental MD5 over several buffers
///
/// The whole-file hash covers the header, tree, file data and the two
/// preceding digests, so it is fed piece by piece instead of from one
/// contiguous buffer.
#[derive(Clone, Default)]
pub struct Md5Hasher {
    inner: Md5,
}

impl Md5Hasher {
    /// Create a new hasher
    pub fn new() -> Self {
        Self { inner: Md5::new() }
    }

    /// Feed more data
    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    /// Consume the hasher and return the digest
    pub fn finish(self) -> Md5Digest {
        let result = self.inner.finalize();
        let mut bytes = [0u8; MD5_DIGEST_SIZE];
        bytes.copy_from_slice(&result);
        Md5Digest(bytes)
    }
}

impl fmt::Debug for Md5Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Md5Hasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_from_data() {
        let digest = Md5Digest::from_data(b"Hello, World!");
        assert_eq!(digest.to_hex(), "65a8e27d8879283831b664bd8b7f0ad4");
    }

    #[test]
    fn test_empty_digest() {
        assert_eq!(Md5Digest::empty().to_hex(), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let mut hasher = Md5Hasher::new();
        hasher.update(b"Hello, ");
        hasher.update(b"World!");
        assert_eq!(hasher.finish(), Md5Digest::from_data(b"Hello, World!"));
    }

    #[test]
    fn test_hex_round_trip() {
        let digest = Md5Digest::from_data(b"vpk");
        let parsed = Md5Digest::from_hex(&digest.to_hex()).expect("valid hex");
        assert_eq!(parsed, digest);
        assert!(Md5Digest::from_hex("not hex").is_err());
    }
}
