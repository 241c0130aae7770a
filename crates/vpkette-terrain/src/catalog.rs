//! Terrain catalog.
//!
//! A catalog maps a display name to the override archive shipped in the
//! game's `dota/maps` directory. Catalog files are JSON objects and keep
//! their key order, which is also the numbering shown to users.

use crate::error::{TerrainError, TerrainResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// Terrains shipped with the game, in menu order
const BUILTIN_TERRAINS: &[(&str, &str)] = &[
    ("Desert Terrain", "dota_desert.vpk"),
    ("The King's New Journey", "dota_journey.vpk"),
    ("Immortal Gardens", "dota_coloseum.vpk"),
    ("Overgrown Empire", "dota_jungle.vpk"),
    ("Reef's Edge", "dota_reef.vpk"),
    ("Sanctums of the Divine", "dota_ti10.vpk"),
    ("The Emerald Abyss", "dota_cavern.vpk"),
    ("Seasonal Terrain: Autumn", "dota_autumn.vpk"),
    ("Seasonal Terrain: Winter", "dota_winter.vpk"),
    ("Seasonal Terrain: Spring", "dota_spring.vpk"),
    ("Seasonal Terrain: Summer", "dota_summer.vpk"),
];

/// A catalog entry resolved by [`TerrainCatalog::select`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terrain<'a> {
    /// 1-based menu position
    pub number: usize,
    /// Display name
    pub name: &'a str,
    /// Override archive file name
    pub file: &'a str,
}

/// Ordered set of selectable terrains
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TerrainCatalog {
    terrains: IndexMap<String, String>,
}

impl Default for TerrainCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TerrainCatalog {
    /// The stock terrains
    pub fn builtin() -> Self {
        Self {
            terrains: BUILTIN_TERRAINS
                .iter()
                .map(|&(name, file)| (name.to_string(), file.to_string()))
                .collect(),
        }
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `TerrainError::Io` if the file cannot be opened and
    /// `TerrainError::Catalog` if it is not an object of name to file
    /// name, or a file name is not a bare file name.
    pub fn from_file(path: &Path) -> TerrainResult<Self> {
        let file = File::open(path).map_err(|source| TerrainError::io(path, source))?;
        let catalog: Self = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
            TerrainError::Catalog {
                path: path.to_path_buf(),
                source,
            }
        })?;

        if let Some((name, file)) = catalog
            .terrains
            .iter()
            .find(|(_, file)| !is_bare_file_name(file))
        {
            return Err(TerrainError::Catalog {
                path: path.to_path_buf(),
                source: serde::de::Error::custom(format!(
                    "terrain '{name}' has file '{file}', expected a file name in dota/maps"
                )),
            });
        }

        debug!(
            "Loaded {} terrains from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Number of terrains
    pub fn len(&self) -> usize {
        self.terrains.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.terrains.is_empty()
    }

    /// Terrains in menu order
    pub fn iter(&self) -> impl Iterator<Item = Terrain<'_>> {
        self.terrains
            .iter()
            .enumerate()
            .map(|(position, (name, file))| Terrain {
                number: position + 1,
                name,
                file,
            })
    }

    /// Resolve a display name or a 1-based menu number.
    ///
    /// Names match exactly; anything else is read as a number.
    pub fn select(&self, key: &str) -> TerrainResult<Terrain<'_>> {
        let key = key.trim();

        let position = self
            .terrains
            .get_index_of(key)
            .or_else(|| key.parse::<usize>().ok()?.checked_sub(1));

        position
            .and_then(|position| {
                let (name, file) = self.terrains.get_index(position)?;
                Some(Terrain {
                    number: position + 1,
                    name,
                    file,
                })
            })
            .ok_or_else(|| TerrainError::InvalidSelection(key.to_string()))
    }
}

fn is_bare_file_name(file: &str) -> bool {
    !file.is_empty()
        && file != "."
        && file != ".."
        && !file.contains(['/', '\\', '\0'])
}
