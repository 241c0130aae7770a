#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
//! End-to-end tests for staging terrains in a scratch game directory

use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use vpkette_formats::vpk::{FileMap, VpkBuilder, VpkReader};
use vpkette_terrain::{
    GamePaths, TerrainCatalog, TerrainError, extract_all, patch_archive, read_archive,
};

fn file_map(files: &[(&str, &str)]) -> FileMap {
    files
        .iter()
        .map(|&(path, data)| (path.to_string(), data.as_bytes().to_vec()))
        .collect()
}

fn write_archive(path: &Path, files: &[(&str, &str)]) {
    let bytes = VpkBuilder::from_file_map(file_map(files))
        .unwrap()
        .build()
        .unwrap();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}

/// Game directory with a stock map and the desert terrain
fn game_dir() -> (TempDir, GamePaths) {
    let dir = tempfile::tempdir().unwrap();
    let paths = GamePaths::new(dir.path());

    write_archive(
        &paths.base_archive(),
        &[
            ("maps/dota.vmap_c", "stock map"),
            ("maps/dota/lighting.vtex_c", "stock lighting"),
            ("maps/dota/entities.vents_c", "stock entities"),
            ("scripts/npc/npc_units.txt", "units"),
        ],
    );
    write_archive(
        &paths.override_archive("dota_desert.vpk"),
        &[
            ("maps/dota_desert.vmap_c", "desert map"),
            ("maps/dota/lighting.vtex_c", "desert lighting"),
            ("materials/sand.vmat_c", "sand"),
        ],
    );

    (dir, paths)
}

#[test]
fn apply_desert_terrain() {
    let (_dir, paths) = game_dir();
    let catalog = TerrainCatalog::builtin();
    let terrain = catalog.select("1").unwrap();
    assert_eq!(terrain.name, "Desert Terrain");

    let output = paths.prepare_staging("tempcontent").unwrap();
    let summary = patch_archive(
        &paths.base_archive(),
        &paths.override_archive(terrain.file),
        &output,
    )
    .unwrap();

    assert_eq!(summary.base_files, 4);
    assert_eq!(summary.override_files, 3);
    assert_eq!(summary.merged_files, 5);
    assert_eq!(summary.bytes_written as u64, fs::metadata(&output).unwrap().len());

    let staged = read_archive(&output).unwrap();
    let expected = file_map(&[
        ("maps/dota.vmap_c", "desert map"),
        ("maps/dota/lighting.vtex_c", "desert lighting"),
        ("materials/sand.vmat_c", "sand"),
        ("maps/dota/entities.vents_c", "stock entities"),
        ("scripts/npc/npc_units.txt", "units"),
    ]);
    let mut staged: Vec<_> = staged.into_iter().collect();
    let mut expected: Vec<_> = expected.into_iter().collect();
    staged.sort();
    expected.sort();
    assert_eq!(staged, expected);
}

#[test]
fn stock_archive_is_untouched() {
    let (_dir, paths) = game_dir();
    let before = fs::read(paths.base_archive()).unwrap();

    let output = paths.prepare_staging("tempcontent").unwrap();
    patch_archive(
        &paths.base_archive(),
        &paths.override_archive("dota_desert.vpk"),
        &output,
    )
    .unwrap();

    assert_eq!(fs::read(paths.base_archive()).unwrap(), before);
}

#[test]
fn patching_is_deterministic() {
    let (_dir, paths) = game_dir();
    let base = paths.base_archive();
    let desert = paths.override_archive("dota_desert.vpk");

    let first = paths.prepare_staging("first").unwrap();
    let second = paths.prepare_staging("second").unwrap();
    patch_archive(&base, &desert, &first).unwrap();
    patch_archive(&base, &desert, &second).unwrap();

    assert_eq!(fs::read(first).unwrap(), fs::read(second).unwrap());
}

#[test]
fn staged_archive_carries_self_hashes() {
    let (_dir, paths) = game_dir();
    let output = paths.prepare_staging("tempcontent").unwrap();
    patch_archive(
        &paths.base_archive(),
        &paths.override_archive("dota_desert.vpk"),
        &output,
    )
    .unwrap();

    let reader = VpkReader::open(&output).unwrap();
    assert_eq!(reader.index().header.version, 2);
    assert!(reader.self_hashes().unwrap().is_some());
}

#[test]
fn missing_terrain_archive_writes_nothing() {
    let (_dir, paths) = game_dir();
    let output = paths.prepare_staging("tempcontent").unwrap();

    let err = patch_archive(
        &paths.base_archive(),
        &paths.override_archive("dota_reef.vpk"),
        &output,
    )
    .unwrap_err();

    assert!(matches!(err, TerrainError::Io { .. }));
    assert!(!output.exists());
}

#[test]
fn extract_staged_archive() {
    let (dir, paths) = game_dir();
    let target = dir.path().join("unpacked");

    let summary = extract_all(&paths.override_archive("dota_desert.vpk"), &target).unwrap();
    assert_eq!(summary.files, 3);
    assert_eq!(summary.bytes, "desert map".len() + "desert lighting".len() + "sand".len());

    assert_eq!(
        fs::read_to_string(target.join("maps/dota_desert.vmap_c")).unwrap(),
        "desert map"
    );
    assert_eq!(
        fs::read_to_string(target.join("maps/dota/lighting.vtex_c")).unwrap(),
        "desert lighting"
    );
    assert_eq!(
        fs::read_to_string(target.join("materials/sand.vmat_c")).unwrap(),
        "sand"
    );
}
