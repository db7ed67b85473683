//! Map Module
//!
//! Tile-grid input for the sector renderer: the immutable [`TileMap`]
//! (per-tile height + texture id), the load-time [`VisitedMask`] scratch
//! bitset, and the JSON level asset loader.

pub mod level_file;
pub mod tile_map;
pub mod visited;

pub use level_file::{LevelFile, LevelFileError, load_level};
pub use tile_map::{MAX_MAP_AXIS, TileMap, TileMapError};
pub use visited::VisitedMask;
