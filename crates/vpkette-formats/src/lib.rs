//! Parser and builder for Valve package (VPK) archives
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::similar_names)] // Domain-specific naming patterns
#![allow(clippy::return_self_not_must_use)] // Builder patterns
//! This crate provides symmetric (parser and builder) support for the VPK
//! directory-tree-indexed container used by Source and Source 2 games to
//! bundle large sets of named files.
//!
//! # Supported Operations
//!
//! - **Index parsing**: header and extension/directory/filename tree
//! - **Content extraction**: embedded data and numbered companion archives
//! - **Building**: tree layout, per-file CRC-32 and the MD5 self-hash trailer
//! - **Patch merging**: combine a base and an override archive into one
//!
//! # Design Principles
//!
//! - **Whole-buffer reads**: an archive is loaded once and parsed in memory
//! - **Owned handles**: every open archive owns its buffers, nothing global
//! - **Round-Trip Guarantee**: parse(build(files)) yields the same files

#![warn(missing_docs)]

/// VPK archive reading, writing and merging
///
/// See the [`vpk`] module for the binary layout and usage examples.
pub mod vpk;

/// Common format trait implemented by whole-buffer formats
pub trait VpkFormat: Sized {
    /// Parse from bytes
    fn parse(data: &[u8]) -> Result<Self, Box<dyn std::error::Error>>;

    /// Build to bytes
    fn build(&self) -> Result<Vec<u8>, Box<dyn std::error::Error>>;

    /// Verify round-trip correctness
    fn verify_round_trip(data: &[u8]) -> Result<(), Box<dyn std::error::Error>> {
        let parsed = Self::parse(data)?;
        let rebuilt = parsed.build()?;
        if data != rebuilt.as_slice() {
            return Err("Round-trip verification failed".into());
        }
        Ok(())
    }
}
