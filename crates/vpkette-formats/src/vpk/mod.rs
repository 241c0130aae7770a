//! VPK archive reading, writing and merging
//!
//! A VPK archive is a directory file (`*_dir.vpk` or a single `*.vpk`) that
//! holds a tree of file names and, optionally, the file contents themselves.
//! Contents that do not live in the directory file are stored in numbered
//! companion archives next to it (`pak01_000.vpk`, `pak01_001.vpk`, ...).
//!
//! # Binary Layout
//!
//! All integers are little-endian.
//!
//! ```text
//! offset 0                     header (12 bytes for v1, 28 bytes for v2)
//! offset H                     tree, tree_length bytes
//! offset H + tree_length       embedded file data, embed_chunk_length bytes
//! ...                          chunk hash table, chunk_hashes_length bytes
//! ...                          self-hash trailer, self_hashes_length bytes
//! ```
//!
//! The tree is three nested lists of NUL-terminated strings, each list closed
//! by an empty string:
//!
//! ```text
//! extension\0
//!   directory\0            (" " for the archive root)
//!     filename\0 <18-byte entry> <preload bytes>
//!     ...
//!   \0
//! \0
//! \0
//! ```
//!
//! # Usage Examples
//!
//! ## Build and read back an archive
//!
//! ```rust
//! use vpkette_formats::vpk::{VpkBuilder, VpkReader};
//!
//! let mut builder = VpkBuilder::new();
//! builder.add_file("maps/dota.vmap_c", b"map".to_vec())?;
//! builder.add_file("readme.txt", b"hello".to_vec())?;
//! let bytes = builder.build()?;
//!
//! let mut reader = VpkReader::from_bytes(bytes)?;
//! assert_eq!(reader.read_file("readme.txt")?, Some(b"hello".to_vec()));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Merge two archives
//!
//! ```rust
//! use vpkette_formats::vpk::{FileMap, PatchMerge};
//!
//! let mut base = FileMap::new();
//! base.insert("maps/dota.vmap_c".to_string(), b"base".to_vec());
//! base.insert("scripts/items.txt".to_string(), b"items".to_vec());
//!
//! let mut guest = FileMap::new();
//! guest.insert("maps/dota_desert.vmap_c".to_string(), b"desert".to_vec());
//!
//! let merged = PatchMerge::default().merge(base, guest);
//! assert_eq!(merged["maps/dota.vmap_c"], b"desert".to_vec());
//! assert_eq!(merged["scripts/items.txt"], b"items".to_vec());
//! ```

mod builder;
mod checksum;
mod cursor;
mod entry;
mod error;
mod header;
mod index;
mod merge;
mod reader;

pub use builder::{VpkBuilder, calculate_tree_length};
pub use checksum::SelfHashes;
pub use cursor::ByteCursor;
pub use entry::{EntryRecord, VpkEntry};
pub use error::{VpkError, VpkResult};
pub use header::VpkHeader;
pub use index::VpkIndex;
pub use merge::{CANONICAL_MAP_NAME, COMPILED_MAP_EXTENSION, MapRewrite, PatchMerge};
pub use reader::{Files, VpkReader, companion_file_name};

/// Ordered mapping from logical path to file contents
///
/// Insertion order is significant: the builder groups files by extension
/// and directory in first-seen order.
pub type FileMap = indexmap::IndexMap<String, Vec<u8>>;

/// VPK format constants
pub mod constants {
    /// Header signature
    pub const VPK_SIGNATURE: u32 = 0x55AA_1234;

    /// Version written by the builder
    pub const VPK_VERSION: u32 = 2;

    /// Header size of version 1 archives
    pub const HEADER_SIZE_V1: usize = 12;

    /// Header size of version 2 archives
    pub const HEADER_SIZE_V2: usize = 28;

    /// Size of a directory entry record
    pub const ENTRY_SIZE: usize = 18;

    /// Archive index marking data embedded in the directory file
    pub const EMBEDDED_ARCHIVE_INDEX: u16 = 0x7FFF;

    /// Value every entry record ends with
    pub const ENTRY_TERMINATOR: u16 = 0xFFFF;

    /// Size of the self-hash trailer (three MD5 digests)
    pub const SELF_HASHES_SIZE: usize = 48;

    /// Token standing for the archive root directory, or a missing extension
    pub const BLANK_TOKEN: &str = " ";
}
