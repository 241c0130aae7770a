//! Checksums and digests for Valve package (VPK) archives
//!
//! VPK archives carry two kinds of integrity data:
//!
//! - **CRC-32** per file, stored in every directory entry
//! - **MD5** digests in the self-hash trailer of version 2 archives
//!   (tree hash, chunk hash table hash, whole-file hash)
//!
//! # Examples
//!
//! ```
//! use vpkette_crypto::{Md5Digest, file_crc32};
//!
//! let digest = Md5Digest::from_data(b"Hello, World!");
//! assert_eq!(digest.to_hex(), "65a8e27d8879283831b664bd8b7f0ad4");
//!
//! assert_eq!(file_crc32(b"123456789"), 0xCBF4_3926);
//! ```

#![warn(missing_docs)]

pub mod crc;
pub mod md5;

pub use crc::file_crc32;
pub use md5::{Md5Digest, Md5Hasher};
