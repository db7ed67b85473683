//! Level Asset Files
//!
//! JSON serialization of the *input* tile grid (never of the derived mesh -
//! geometry is rebuilt from the grid on every level load). A level file
//! carries a display name, byte dimensions and the two row-major tile
//! arrays:
//!
//! ```json
//! {
//!   "name": "keep",
//!   "width": 4,
//!   "height": 2,
//!   "heights": [2, 2, 3, 3, 2, 2, 3, 3],
//!   "texture_ids": [0, 0, 1, 1, 0, 0, 1, 1]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::map::tile_map::{TileMap, TileMapError};

/// On-disk level document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LevelFile {
    pub name: String,
    pub width: u8,
    pub height: u8,
    /// Row-major tile heights, `width * height` entries.
    pub heights: Vec<u8>,
    /// Row-major tile texture ids, `width * height` entries.
    pub texture_ids: Vec<u8>,
}

impl LevelFile {
    /// Parse a level file from disk.
    pub fn load(path: &Path) -> Result<Self, LevelFileError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Write the level back out as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), LevelFileError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }

    /// Validate the arrays against the declared dimensions and hand over a
    /// usable [`TileMap`].
    pub fn into_tile_map(self) -> Result<TileMap, TileMapError> {
        TileMap::new(self.width, self.height, self.heights, self.texture_ids)
    }
}

/// Load a level file and validate it into a [`TileMap`] in one step.
pub fn load_level(path: &Path) -> Result<TileMap, LevelFileError> {
    let level = LevelFile::load(path)?;
    log::info!(
        "loaded level '{}' ({}x{} tiles) from {}",
        level.name,
        level.width,
        level.height,
        path.display()
    );
    Ok(level.into_tile_map()?)
}

// ============================================================================
// ERROR TYPE
// ============================================================================

/// Errors from loading or saving a level file.
#[derive(Debug)]
pub enum LevelFileError {
    /// Standard I/O error.
    Io(std::io::Error),
    /// JSON parse/serialize error.
    Json(serde_json::Error),
    /// The document parsed but its arrays contradict its dimensions.
    Map(TileMapError),
}

impl std::fmt::Display for LevelFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelFileError::Io(e) => write!(f, "IO error: {e}"),
            LevelFileError::Json(e) => write!(f, "JSON error: {e}"),
            LevelFileError::Map(e) => write!(f, "invalid level data: {e}"),
        }
    }
}

impl std::error::Error for LevelFileError {}

impl From<std::io::Error> for LevelFileError {
    fn from(e: std::io::Error) -> Self {
        LevelFileError::Io(e)
    }
}

impl From<serde_json::Error> for LevelFileError {
    fn from(e: serde_json::Error) -> Self {
        LevelFileError::Json(e)
    }
}

impl From<TileMapError> for LevelFileError {
    fn from(e: TileMapError) -> Self {
        LevelFileError::Map(e)
    }
}

// ============================================================================
// Tests
// ============================================================================
