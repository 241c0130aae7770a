//! Game directory layout.
//!
//! Every archive location is derived from the game content root, the
//! directory holding `dota/maps/dota.vpk`. Staged archives go into a
//! `dota_<language>` directory next to `dota`, which the game loads when
//! started with `-language <language>`.

use crate::error::{TerrainError, TerrainResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Steam application id of the game
const APP_ID: &str = "570";

/// Content root relative to a Steam library
const LIBRARY_GAME_DIR: [&str; 4] = ["steamapps", "common", "dota 2 beta", "game"];

/// Archive every terrain is patched into
const BASE_ARCHIVE: &str = "dota.vpk";

/// Locations of the archives involved in staging a terrain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GamePaths {
    game_dir: PathBuf,
}

impl GamePaths {
    /// Use an explicit game content root
    pub fn new(game_dir: impl Into<PathBuf>) -> Self {
        Self {
            game_dir: game_dir.into(),
        }
    }

    /// Find the game through the Steam library index.
    ///
    /// # Errors
    ///
    /// Returns `TerrainError::Io` if `libraryfolders.vdf` cannot be read
    /// and `TerrainError::MissingGameDir` if no library lists the game.
    pub fn discover(steam_dir: &Path) -> TerrainResult<Self> {
        let library_index = steam_dir.join("steamapps").join("libraryfolders.vdf");
        let text = fs::read_to_string(&library_index)
            .map_err(|source| TerrainError::io(&library_index, source))?;

        let library = library_with_app(&text, APP_ID).ok_or(TerrainError::MissingGameDir)?;
        let game_dir = LIBRARY_GAME_DIR
            .iter()
            .fold(PathBuf::from(library), |path, part| path.join(part));
        debug!("Discovered game directory {}", game_dir.display());

        Ok(Self { game_dir })
    }

    /// Game content root
    pub fn game_dir(&self) -> &Path {
        &self.game_dir
    }

    /// Directory holding the stock map archives
    pub fn maps_dir(&self) -> PathBuf {
        self.game_dir.join("dota").join("maps")
    }

    /// The stock map archive
    pub fn base_archive(&self) -> PathBuf {
        self.maps_dir().join(BASE_ARCHIVE)
    }

    /// An override archive shipped next to the stock map
    pub fn override_archive(&self, file: &str) -> PathBuf {
        self.maps_dir().join(file)
    }

    /// Where the patched archive is staged for `language`
    pub fn staged_archive(&self, language: &str) -> PathBuf {
        self.game_dir
            .join(format!("dota_{language}"))
            .join("maps")
            .join(BASE_ARCHIVE)
    }

    /// Create the staging directory for `language` and return the
    /// staged archive path.
    pub fn prepare_staging(&self, language: &str) -> TerrainResult<PathBuf> {
        let archive = self.staged_archive(language);
        if let Some(dir) = archive.parent() {
            fs::create_dir_all(dir).map_err(|source| TerrainError::io(dir, source))?;
        }
        Ok(archive)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Text(String),
    Open,
    Close,
}

/// Split KeyValues text into quoted strings and braces
fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '{' => tokens.push(Token::Open),
            '}' => tokens.push(Token::Close),
            '"' => {
                let mut value = String::new();
                while let Some(c) = chars.next() {
                    match c {
                        '"' => break,
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                value.push(escaped);
                            }
                        }
                        _ => value.push(c),
                    }
                }
                tokens.push(Token::Text(value));
            }
            _ => {}
        }
    }

    tokens
}

/// Library path of the first library whose app list holds `app_id`
fn library_with_app(text: &str, app_id: &str) -> Option<String> {
    let tokens = tokenize(text);
    let mut library = None;
    let mut position = 0;

    while position < tokens.len() {
        match (&tokens[position], tokens.get(position + 1)) {
            (Token::Text(key), Some(Token::Text(value))) => {
                if key == "path" {
                    library = Some(value.clone());
                } else if key == app_id {
                    return library;
                }
                position += 2;
            }
            _ => position += 1,
        }
    }

    None
}
