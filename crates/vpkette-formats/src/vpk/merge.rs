//! Merging a base archive with an override archive
//!
//! Override files come first in the result, then every base file whose path
//! the override does not already provide. Compiled maps in the override are
//! renamed to the base map's name before insertion so that a differently
//! named map replaces the base one.

use crate::vpk::FileMap;
use tracing::debug;

/// Compiled map extension
pub const COMPILED_MAP_EXTENSION: &str = "vmap_c";

/// File name of the base game's compiled map
pub const CANONICAL_MAP_NAME: &str = "dota";

/// Renames override files with a given extension to a fixed file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapRewrite {
    extension: String,
    canonical_name: String,
}

impl MapRewrite {
    /// Rename every `*.{extension}` to `{canonical_name}.{extension}`
    pub fn new(extension: impl Into<String>, canonical_name: impl Into<String>) -> Self {
        Self {
            extension: extension.into(),
            canonical_name: canonical_name.into(),
        }
    }

    /// Rewritten path, or `None` when the extension does not match
    ///
    /// The directory is kept as is.
    pub fn apply(&self, path: &str) -> Option<String> {
        let (directory, file) = match path.rsplit_once('/') {
            Some((directory, file)) => (Some(directory), file),
            None => (None, path),
        };
        let (_, extension) = file.rsplit_once('.')?;
        if extension != self.extension {
            return None;
        }

        Some(match directory {
            Some(directory) => format!("{directory}/{}.{extension}", self.canonical_name),
            None => format!("{}.{extension}", self.canonical_name),
        })
    }
}

impl Default for MapRewrite {
    fn default() -> Self {
        Self::new(COMPILED_MAP_EXTENSION, CANONICAL_MAP_NAME)
    }
}

/// Override-wins merge of two file sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchMerge {
    map_rewrite: Option<MapRewrite>,
}

impl PatchMerge {
    /// Merge without renaming any override files
    pub fn new() -> Self {
        Self { map_rewrite: None }
    }

    /// Merge renaming override files per `rewrite`
    pub fn with_map_rewrite(rewrite: MapRewrite) -> Self {
        Self {
            map_rewrite: Some(rewrite),
        }
    }

    /// Combine `base` and `overrides`
    ///
    /// Overrides win on path collisions. If two override files end up on the
    /// same path after renaming, the later one wins.
    pub fn merge(&self, base: FileMap, overrides: FileMap) -> FileMap {
        let mut merged = FileMap::with_capacity(base.len() + overrides.len());
        let override_count = overrides.len();

        for (path, data) in overrides {
            let path = self
                .map_rewrite
                .as_ref()
                .and_then(|rewrite| rewrite.apply(&path))
                .unwrap_or(path);
            if merged.insert(path, data).is_some() {
                debug!("Two override files map to the same path, keeping the later one");
            }
        }

        let mut shadowed = 0usize;
        for (path, data) in base {
            if merged.contains_key(&path) {
                shadowed += 1;
            } else {
                merged.insert(path, data);
            }
        }

        debug!(
            "Merged {} override files over base, {} base files shadowed, {} total",
            override_count,
            shadowed,
            merged.len()
        );

        merged
    }
}

impl Default for PatchMerge {
    fn default() -> Self {
        Self::with_map_rewrite(MapRewrite::default())
    }
}
