//! Tile Map
//!
//! The immutable per-level input grid: two parallel byte arrays (height and
//! texture id) plus byte dimensions. Coordinates and heights are quantized to
//! single bytes because they are baked directly into the packed GPU vertex
//! format, which caps a level at 255 tiles per axis and 255 height units.
//!
//! The map is read-only for the whole level lifetime; everything downstream
//! (sector decomposition, face meshing, culling) derives from it.

use glam::Vec3;

/// Maximum tiles per map axis, imposed by the single-byte vertex coordinates.
pub const MAX_MAP_AXIS: usize = 255;

/// Immutable tile grid for one level.
#[derive(Clone, Debug)]
pub struct TileMap {
    width: u8,
    height: u8,
    heights: Vec<u8>,
    texture_ids: Vec<u8>,
}

// ============================================================================
// ERROR TYPE
// ============================================================================

/// Errors from constructing a [`TileMap`] out of raw arrays.
#[derive(Debug)]
pub enum TileMapError {
    /// The height array length does not equal `width * height`.
    HeightArraySizeMismatch { expected: usize, actual: usize },
    /// The texture-id array length does not equal `width * height`.
    TextureArraySizeMismatch { expected: usize, actual: usize },
}

impl std::fmt::Display for TileMapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileMapError::HeightArraySizeMismatch { expected, actual } => {
                write!(f, "height array has {actual} entries, expected {expected}")
            }
            TileMapError::TextureArraySizeMismatch { expected, actual } => {
                write!(f, "texture-id array has {actual} entries, expected {expected}")
            }
        }
    }
}

impl std::error::Error for TileMapError {}

// ============================================================================
// TILE MAP
// ============================================================================

impl TileMap {
    /// Build a map from row-major height and texture-id arrays.
    ///
    /// Both arrays must hold exactly `width * height` bytes.
    pub fn new(
        width: u8,
        height: u8,
        heights: Vec<u8>,
        texture_ids: Vec<u8>,
    ) -> Result<Self, TileMapError> {
        let expected = width as usize * height as usize;
        if heights.len() != expected {
            return Err(TileMapError::HeightArraySizeMismatch {
                expected,
                actual: heights.len(),
            });
        }
        if texture_ids.len() != expected {
            return Err(TileMapError::TextureArraySizeMismatch {
                expected,
                actual: texture_ids.len(),
            });
        }
        Ok(Self {
            width,
            height,
            heights,
            texture_ids,
        })
    }

    /// Build a map by evaluating `tile` at every `(x, y)` position.
    /// `tile` returns the `(height, texture_id)` pair for that tile.
    pub fn from_fn(width: u8, height: u8, mut tile: impl FnMut(u8, u8) -> (u8, u8)) -> Self {
        let count = width as usize * height as usize;
        let mut heights = Vec::with_capacity(count);
        let mut texture_ids = Vec::with_capacity(count);
        for y in 0..height {
            for x in 0..width {
                let (h, t) = tile(x, y);
                heights.push(h);
                texture_ids.push(t);
            }
        }
        Self {
            width,
            height,
            heights,
            texture_ids,
        }
    }

    /// Map width in tiles (X axis).
    #[inline]
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Map height in tiles (Z axis, the row axis).
    #[inline]
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Total number of tiles.
    #[inline]
    pub fn tile_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    fn index(&self, x: u8, y: u8) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }

    /// Tile height at `(x, y)`.
    #[inline]
    pub fn height_at(&self, x: u8, y: u8) -> u8 {
        self.heights[self.index(x, y)]
    }

    /// Tile texture id at `(x, y)`.
    #[inline]
    pub fn texture_id_at(&self, x: u8, y: u8) -> u8 {
        self.texture_ids[self.index(x, y)]
    }

    /// Tallest tile on the map. Zero for an empty map.
    pub fn max_tile_height(&self) -> u8 {
        self.heights.iter().copied().max().unwrap_or(0)
    }

    /// World-space bounding box of the whole level, used by external passes
    /// (e.g. shadow cascades) that need the full extent.
    pub fn world_aabb(&self) -> (Vec3, Vec3) {
        (
            Vec3::ZERO,
            Vec3::new(
                self.width as f32,
                self.max_tile_height() as f32,
                self.height as f32,
            ),
        )
    }
}

// ============================================================================
// Tests
// ============================================================================
