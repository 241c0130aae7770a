//! Error types for terrain staging.
//!
//! All errors use thiserror, matching the format crate.

use std::path::PathBuf;
use thiserror::Error;
use vpkette_formats::vpk::VpkError;

/// Result type for terrain operations
pub type TerrainResult<T> = Result<T, TerrainError>;

/// Errors raised while selecting, patching or extracting archives
#[derive(Debug, Error)]
pub enum TerrainError {
    /// Archive could not be read or written
    #[error("archive error: {0}")]
    Vpk(#[from] VpkError),

    /// Filesystem operation failed
    #[error("failed to access {path}: {source}")]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Catalog lookup did not match any terrain
    #[error("invalid terrain selection: {0}")]
    InvalidSelection(String),

    /// Catalog file is not a JSON object of name to file name
    #[error("invalid terrain catalog {path}: {source}")]
    Catalog {
        /// Catalog file
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// No game directory was configured or discovered
    #[error("game directory not found: pass --game-dir or --steam-dir")]
    MissingGameDir,
}

impl TerrainError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_io_error_keeps_source() {
        let err = TerrainError::io(
            "/games/dota/maps/dota.vpk",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(
            err.to_string(),
            "failed to access /games/dota/maps/dota.vpk: missing"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_vpk_error_converts() {
        let err: TerrainError = VpkError::InvalidSignature(0).into();
        assert!(matches!(err, TerrainError::Vpk(VpkError::InvalidSignature(0))));
    }
}
