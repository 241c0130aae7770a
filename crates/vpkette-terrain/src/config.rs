//! Command-line configuration.
//!
//! Options can be given as flags or environment variables:
//!
//! - `--game-dir` / `VPKETTE_GAME_DIR`: game content root
//! - `--steam-dir` / `VPKETTE_STEAM_DIR`: Steam root used to find the game
//! - `--catalog` / `VPKETTE_CATALOG`: JSON terrain catalog
//! - `--language` / `VPKETTE_LANGUAGE`: staging language
//!
//! # Example
//!
//! ```
//! use clap::Parser;
//! use vpkette_terrain::{Cli, Command};
//!
//! let cli = Cli::parse_from(["vpkette", "--game-dir", "/games/dota", "apply", "3"]);
//! assert!(matches!(cli.command, Command::Apply { ref terrain } if terrain == "3"));
//! ```

use crate::catalog::TerrainCatalog;
use crate::error::{TerrainError, TerrainResult};
use crate::paths::GamePaths;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default staging language
pub const DEFAULT_LANGUAGE: &str = "tempcontent";

/// Stage custom terrains for Dota 2
#[derive(Debug, Clone, Parser)]
#[command(name = "vpkette", about = "Stage custom Dota 2 terrains", version)]
pub struct Cli {
    /// Game content root (the directory containing dota/maps/dota.vpk)
    #[arg(long, global = true, env = "VPKETTE_GAME_DIR")]
    pub game_dir: Option<PathBuf>,

    /// Steam installation used to locate the game when --game-dir is absent
    #[arg(long, global = true, env = "VPKETTE_STEAM_DIR")]
    pub steam_dir: Option<PathBuf>,

    /// JSON file mapping terrain names to archive file names
    #[arg(long, global = true, env = "VPKETTE_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Language directory the patched archive is staged under
    #[arg(long, global = true, env = "VPKETTE_LANGUAGE", default_value = DEFAULT_LANGUAGE)]
    pub language: String,

    /// Action to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the selectable terrains
    Terrains,

    /// Patch the stock map with a terrain and stage the result
    Apply {
        /// Terrain name or number from `terrains`
        terrain: String,
    },

    /// Print the index of an archive
    List {
        /// Archive to inspect
        archive: PathBuf,
    },

    /// Unpack every file of an archive
    Extract {
        /// Archive to unpack
        archive: PathBuf,
        /// Directory to write into
        target: PathBuf,
    },
}

impl Cli {
    /// Parse configuration from command-line arguments
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// The configured catalog, or the stock terrains
    pub fn load_catalog(&self) -> TerrainResult<TerrainCatalog> {
        self.catalog
            .as_deref()
            .map_or_else(|| Ok(TerrainCatalog::builtin()), TerrainCatalog::from_file)
    }

    /// Resolve the game layout from `--game-dir` or `--steam-dir`
    pub fn game_paths(&self) -> TerrainResult<GamePaths> {
        match (&self.game_dir, &self.steam_dir) {
            (Some(game_dir), _) => Ok(GamePaths::new(game_dir)),
            (None, Some(steam_dir)) => GamePaths::discover(steam_dir),
            (None, None) => Err(TerrainError::MissingGameDir),
        }
    }
}
