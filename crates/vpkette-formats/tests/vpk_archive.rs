#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! Integration tests for VPK building, parsing and merging
//!
//! Exercises the public API end to end: archives built by `VpkBuilder` must
//! parse back into the same files, serialize deterministically, and carry
//! well-formed entries and self-hashes.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::BTreeMap;
use vpkette_crypto::{Md5Digest, file_crc32};
use vpkette_formats::vpk::constants::{
    EMBEDDED_ARCHIVE_INDEX, ENTRY_SIZE, HEADER_SIZE_V2, SELF_HASHES_SIZE,
};
use vpkette_formats::vpk::{
    ByteCursor, EntryRecord, FileMap, PatchMerge, SelfHashes, VpkBuilder, VpkError, VpkHeader,
    VpkIndex, VpkReader,
};

fn build(files: &FileMap) -> Vec<u8> {
    VpkBuilder::from_file_map(files.clone())
        .unwrap()
        .build()
        .unwrap()
}

fn extract_all(bytes: Vec<u8>) -> BTreeMap<String, Vec<u8>> {
    VpkReader::from_bytes(bytes)
        .unwrap()
        .into_file_map()
        .unwrap()
        .into_iter()
        .collect()
}

fn sample_files() -> FileMap {
    let mut files = FileMap::new();
    files.insert("maps/dota.vmap_c".to_string(), vec![0xAB; 300]);
    files.insert("maps/dota/entities.vents_c".to_string(), b"entities".to_vec());
    files.insert("readme.txt".to_string(), b"terrain".to_vec());
    files.insert("maps/minimap.txt".to_string(), Vec::new());
    files.insert("bin/LICENSE".to_string(), b"MIT".to_vec());
    files
}

/// Path segment made of characters that survive the tree encoding
fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9_]{1,8}"
}

fn logical_path() -> impl Strategy<Value = String> {
    (
        prop::collection::vec(segment(), 0..3),
        segment(),
        prop::option::of("[a-z_]{1,6}"),
    )
        .prop_map(|(dirs, name, extension)| {
            let mut path = dirs.join("/");
            if !path.is_empty() {
                path.push('/');
            }
            path.push_str(&name);
            if let Some(extension) = extension {
                path.push('.');
                path.push_str(&extension);
            }
            path
        })
}

fn file_map() -> impl Strategy<Value = FileMap> {
    prop::collection::vec(
        (logical_path(), prop::collection::vec(any::<u8>(), 0..64)),
        0..24,
    )
    .prop_map(|pairs| pairs.into_iter().collect())
}

proptest! {
    #[test]
    fn round_trip_preserves_files(files in file_map()) {
        let bytes = build(&files);
        let expected: BTreeMap<String, Vec<u8>> = files.into_iter().collect();
        prop_assert_eq!(extract_all(bytes), expected);
    }

    #[test]
    fn serialization_is_deterministic(files in file_map()) {
        prop_assert_eq!(build(&files), build(&files));
    }

    #[test]
    fn written_entries_are_embedded(files in file_map()) {
        let bytes = build(&files);
        let index = VpkIndex::parse(&bytes).unwrap();
        prop_assert_eq!(index.len(), files.len());
        for (path, entry) in index.iter() {
            prop_assert_eq!(entry.archive_index, EMBEDDED_ARCHIVE_INDEX);
            prop_assert_eq!(entry.preload_length, 0);
            prop_assert_eq!(entry.crc32, file_crc32(&files[path]));
        }
    }
}

#[test]
fn archive_sections_add_up() {
    let files = sample_files();
    let bytes = build(&files);
    let header = VpkHeader::parse(&bytes).unwrap();

    let data_length: usize = files.values().map(Vec::len).sum();
    assert_eq!(header.embed_chunk_length as usize, data_length);
    assert_eq!(header.chunk_hashes_length, 0);
    assert_eq!(header.self_hashes_length as usize, SELF_HASHES_SIZE);
    assert_eq!(header.signature_length, 0);
    assert_eq!(
        bytes.len(),
        HEADER_SIZE_V2 + header.tree_length as usize + data_length + SELF_HASHES_SIZE
    );
}

#[test]
fn self_hashes_cover_tree_and_whole_file() {
    let bytes = build(&sample_files());
    let reader = VpkReader::from_bytes(bytes.clone()).unwrap();
    let header = &reader.index().header;
    let hashes = reader.self_hashes().unwrap().unwrap();

    let tree = &bytes[HEADER_SIZE_V2..header.embedded_data_offset()];
    assert_eq!(hashes.tree_hash, Md5Digest::from_data(tree));
    assert_eq!(hashes.chunk_hashes_hash, Md5Digest::empty());

    let covered = &bytes[..bytes.len() - 16];
    assert_eq!(hashes.file_hash, Md5Digest::from_data(covered));
}

#[test]
fn flipping_a_file_byte_changes_crc_and_file_hash() {
    let files = sample_files();
    let mut flipped = files.clone();
    flipped["readme.txt"][0] ^= 0x01;

    let original = build(&files);
    let changed = build(&flipped);

    let original_index = VpkIndex::parse(&original).unwrap();
    let changed_index = VpkIndex::parse(&changed).unwrap();
    assert_ne!(
        original_index.get("readme.txt").unwrap().crc32,
        changed_index.get("readme.txt").unwrap().crc32
    );
    assert_eq!(
        original_index.get("maps/dota.vmap_c").unwrap().crc32,
        changed_index.get("maps/dota.vmap_c").unwrap().crc32
    );

    let trailer = |bytes: &[u8]| SelfHashes::parse(&bytes[bytes.len() - SELF_HASHES_SIZE..]).unwrap();
    let (before, after) = (trailer(&original), trailer(&changed));
    assert_ne!(before.file_hash, after.file_hash);
    assert_eq!(before.chunk_hashes_hash, after.chunk_hashes_hash);

    // The tree hash covers only tree bytes: the new CRC changes it, the data does not
    let tree_of = |bytes: &[u8]| {
        let header = VpkHeader::parse(bytes).unwrap();
        Md5Digest::from_data(&bytes[HEADER_SIZE_V2..header.embedded_data_offset()])
    };
    assert_eq!(before.tree_hash, tree_of(&original));
    assert_eq!(after.tree_hash, tree_of(&changed));
}

#[test]
fn corrupted_terminator_is_rejected() {
    let mut files = FileMap::new();
    files.insert("maps/dota.vmap_c".to_string(), b"map".to_vec());
    let mut bytes = build(&files);

    // "vmap_c\0" "maps\0" "dota\0" then the record; terminator is its last two bytes
    let record_at = HEADER_SIZE_V2 + 7 + 5 + 5;
    let cursor = ByteCursor::new(&bytes);
    assert_eq!(
        EntryRecord::read_at(&cursor, record_at).unwrap().terminator,
        0xFFFF
    );
    bytes[record_at + ENTRY_SIZE - 2] = 0;
    bytes[record_at + ENTRY_SIZE - 1] = 0;

    match VpkIndex::parse(&bytes) {
        Err(VpkError::MalformedIndex { path, terminator }) => {
            assert_eq!(path, "maps/dota.vmap_c");
            assert_eq!(terminator, 0x0000);
        }
        other => panic!("expected MalformedIndex, got {other:?}"),
    }
    assert!(VpkReader::from_bytes(bytes).is_err());
}

#[test]
fn merge_then_build_patches_base() {
    let mut base = FileMap::new();
    base.insert("maps/dota.vmap_c".to_string(), b"base map".to_vec());
    base.insert("maps/dota/lighting.vtex_c".to_string(), b"base light".to_vec());
    base.insert("scripts/items.txt".to_string(), b"items".to_vec());

    let mut guest = FileMap::new();
    guest.insert("maps/dota_desert.vmap_c".to_string(), b"desert map".to_vec());
    guest.insert("maps/dota/lighting.vtex_c".to_string(), b"desert light".to_vec());

    let base_archive = build(&base);
    let guest_archive = build(&guest);

    let base = VpkReader::from_bytes(base_archive).unwrap().into_file_map().unwrap();
    let guest = VpkReader::from_bytes(guest_archive).unwrap().into_file_map().unwrap();
    let merged = PatchMerge::default().merge(base, guest);

    let patched = extract_all(build(&merged));
    let expected: BTreeMap<String, Vec<u8>> = [
        ("maps/dota.vmap_c", &b"desert map"[..]),
        ("maps/dota/lighting.vtex_c", &b"desert light"[..]),
        ("scripts/items.txt", &b"items"[..]),
    ]
    .into_iter()
    .map(|(path, data)| (path.to_string(), data.to_vec()))
    .collect();
    assert_eq!(patched, expected);
}
