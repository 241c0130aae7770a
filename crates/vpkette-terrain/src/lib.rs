//! Custom terrain staging for Dota 2.
//!
//! Dota 2 keeps its map in `dota/maps/dota.vpk` and ships each alternative
//! terrain as a separate override archive next to it. This crate merges a
//! chosen terrain into the stock map and stages the result in a
//! `dota_<language>` directory, where the game picks it up when launched
//! with `-language <language>`. The stock archive is never modified.
//!
//! # Architecture
//!
//! - `catalog`: selectable terrains and their archive file names
//! - `paths`: archive locations inside the game directory
//! - `patch`: read, merge and rewrite archives
//! - `extract`: unpack an archive to disk
//! - `config`: command-line and environment configuration
//!
//! # Example
//!
//! ```no_run
//! use vpkette_terrain::{GamePaths, TerrainCatalog, patch_archive};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let paths = GamePaths::new("/games/dota 2 beta/game");
//! let catalog = TerrainCatalog::builtin();
//! let terrain = catalog.select("Desert Terrain")?;
//!
//! let output = paths.prepare_staging("tempcontent")?;
//! let summary = patch_archive(
//!     &paths.base_archive(),
//!     &paths.override_archive(terrain.file),
//!     &output,
//! )?;
//! println!("staged {} files", summary.merged_files);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
pub mod paths;
pub mod patch;

pub use catalog::{Terrain, TerrainCatalog};
pub use config::{Cli, Command, DEFAULT_LANGUAGE};
pub use error::{TerrainError, TerrainResult};
pub use extract::{ExtractSummary, extract_all};
pub use paths::GamePaths;
pub use patch::{PatchSummary, patch_archive, patch_archive_with, read_archive};
