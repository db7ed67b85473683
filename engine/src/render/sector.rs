//! Sector Decomposition
//!
//! Partitions the tile map into "sectors": maximal axis-aligned rectangles of
//! tiles sharing the same height and texture id. The scan is a deterministic
//! greedy pass in row-major order, not a minimum-rectangle cover; adjacent
//! tiles with equal attributes may land in different sectors depending on
//! scan order, and that split is an accepted property of the algorithm.
//!
//! Each sector later owns a contiguous slice of the shared face-mesh buffer
//! (`face_range`) and a vertical extent (`visible_heights`) used for its
//! culling bounding box. Both are filled in by the face generator; the
//! builder only knows the flat top height.

use crate::map::{TileMap, VisitedMask};

/// Texture-id budget for sector faces. The packed vertex attribute byte
/// spends 3 bits on the face orientation, leaving room for 16 textures.
pub const MAX_SECTOR_TEXTURES: u8 = 16;

/// Vertical extent of a sector: `max` is the flat top height, `min` is
/// `max` minus the tallest wall the sector emits. Only the bounding box for
/// frustum culling reads `min`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeightBounds {
    pub min: u8,
    pub max: u8,
}

/// A sector's contiguous slice of the shared CPU face-mesh buffer, in faces.
/// Established once by the face generator and never moved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaceRange {
    pub start: u32,
    pub len: u32,
}

/// A maximal uniform rectangle of tiles.
///
/// Invariant: every tile in `[origin, origin + size)` has height
/// `visible_heights.max` and texture id `texture_id`.
#[derive(Clone, Debug)]
pub struct Sector {
    pub texture_id: u8,
    /// Top-down corner (X, Z) in tiles.
    pub origin: [u8; 2],
    /// Top-down extent (X, Z) in tiles; both components are at least 1.
    pub size: [u8; 2],
    pub visible_heights: HeightBounds,
    pub face_range: FaceRange,
}

impl Sector {
    /// Whether the tile at `(x, y)` carries this sector's attributes.
    #[inline]
    fn matches_attributes(&self, map: &TileMap, x: u8, y: u8) -> bool {
        map.height_at(x, y) == self.visible_heights.max
            && map.texture_id_at(x, y) == self.texture_id
    }

    /// Whether the tile at `(x, y)` lies inside this sector's footprint.
    pub fn contains_tile(&self, x: u8, y: u8) -> bool {
        x >= self.origin[0]
            && y >= self.origin[1]
            && (x as usize) < self.origin[0] as usize + self.size[0] as usize
            && (y as usize) < self.origin[1] as usize + self.size[1] as usize
    }
}

// ============================================================================
// ERROR TYPE
// ============================================================================

/// Fatal level-asset validation failure during sector construction.
#[derive(Debug)]
pub enum SectorBuildError {
    /// A tile's texture id does not fit the packed attribute byte.
    TextureIdOutOfRange { x: u8, y: u8, texture_id: u8 },
}

impl std::fmt::Display for SectorBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SectorBuildError::TextureIdOutOfRange { x, y, texture_id } => write!(
                f,
                "cannot create a sector at map position ({x}, {y}): texture id {texture_id} \
                 exceeds the maximum of {}",
                MAX_SECTOR_TEXTURES - 1
            ),
        }
    }
}

impl std::error::Error for SectorBuildError {}

// ============================================================================
// GREEDY DECOMPOSITION
// ============================================================================

/// Partition the map into sectors.
///
/// Runs in O(width * height): every tile is visited a bounded number of
/// times, and each tile ends up in exactly one sector. Fails if any seed
/// tile's texture id is out of range; since tiles only merge with
/// attribute-equal seeds, this check covers every tile on the map.
pub fn build_sectors(map: &TileMap) -> Result<Vec<Sector>, SectorBuildError> {
    // Rough face/sector ratio observed on real maps; only a capacity hint.
    let mut sectors = Vec::with_capacity(map.tile_count() / 8 + 1);
    let mut visited = VisitedMask::new(map.width(), map.height());

    for y in 0..map.height() {
        let mut x = 0usize;
        while x < map.width() as usize {
            if visited.is_marked(x as u8, y) {
                x += 1;
                continue;
            }

            let texture_id = map.texture_id_at(x as u8, y);
            if texture_id >= MAX_SECTOR_TEXTURES {
                return Err(SectorBuildError::TextureIdOutOfRange {
                    x: x as u8,
                    y,
                    texture_id,
                });
            }

            let sector = grow_sector(map, &mut visited, x as u8, y, texture_id);

            // Fast path: the run we just marked cannot seed another sector,
            // so skip straight past it. The visited check above already
            // guarantees correctness without this.
            x += sector.size[0] as usize;
            sectors.push(sector);
        }
    }

    Ok(sectors)
}

/// Expand a seed tile rightward, then downward, into the largest uniform
/// rectangle, and mark the whole rectangle as visited.
fn grow_sector(map: &TileMap, visited: &mut VisitedMask, ox: u8, oy: u8, texture_id: u8) -> Sector {
    let mut sector = Sector {
        texture_id,
        origin: [ox, oy],
        size: [0, 0],
        visible_heights: HeightBounds {
            min: 0,
            max: map.height_at(ox, oy),
        },
        face_range: FaceRange::default(),
    };

    // First the horizontal run: unmarked tiles with matching attributes.
    // The seed itself always passes.
    let mut run_width = 0usize;
    while ox as usize + run_width < map.width() as usize {
        let x = (ox as usize + run_width) as u8;
        if visited.is_marked(x, oy) || !sector.matches_attributes(map, x, oy) {
            break;
        }
        run_width += 1;
    }

    // Then extend downward while every tile of the run still matches. Rows
    // below the seed cannot belong to an earlier sector (an earlier rectangle
    // covering them would have covered the seed row too and stopped the
    // horizontal run), so only attributes need checking here.
    let mut run_height = 0usize;
    'rows: for y in oy as usize..map.height() as usize {
        for x in ox as usize..ox as usize + run_width {
            if !sector.matches_attributes(map, x as u8, y as u8) {
                break 'rows;
            }
        }
        run_height += 1;
    }

    sector.size = [run_width as u8, run_height as u8];
    visited.mark_area(ox, oy, sector.size[0], sector.size[1]);
    sector
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn map_2x1(heights: [u8; 2], textures: [u8; 2]) -> TileMap {
        TileMap::new(2, 1, heights.to_vec(), textures.to_vec()).unwrap()
    }

    #[test]
    fn test_uniform_pair_forms_one_sector() {
        let map = map_2x1([3, 3], [0, 0]);
        let sectors = build_sectors(&map).unwrap();
        assert_eq!(sectors.len(), 1);
        assert_eq!(sectors[0].origin, [0, 0]);
        assert_eq!(sectors[0].size, [2, 1]);
        assert_eq!(sectors[0].visible_heights.max, 3);
    }

    #[test]
    fn test_height_step_splits_into_two_sectors() {
        let map = map_2x1([3, 1], [0, 0]);
        let sectors = build_sectors(&map).unwrap();
        assert_eq!(sectors.len(), 2);
        assert_eq!(sectors[0].size, [1, 1]);
        assert_eq!(sectors[1].size, [1, 1]);
        assert_eq!(sectors[0].visible_heights.max, 3);
        assert_eq!(sectors[1].visible_heights.max, 1);
    }

    #[test]
    fn test_texture_id_at_budget_fails_with_tile_position() {
        let map = map_2x1([3, 3], [0, MAX_SECTOR_TEXTURES]);
        let err = build_sectors(&map).unwrap_err();
        match err {
            SectorBuildError::TextureIdOutOfRange { x, y, texture_id } => {
                assert_eq!((x, y), (1, 0));
                assert_eq!(texture_id, 16);
            }
        }
        let msg = format!(
            "{}",
            SectorBuildError::TextureIdOutOfRange {
                x: 1,
                y: 0,
                texture_id: 16
            }
        );
        assert!(msg.contains("(1, 0)"));
        assert!(msg.contains("16"));
    }

    #[test]
    fn test_texture_budget_boundary_is_accepted() {
        let map = map_2x1([3, 3], [MAX_SECTOR_TEXTURES - 1, MAX_SECTOR_TEXTURES - 1]);
        assert_eq!(build_sectors(&map).unwrap().len(), 1);
    }

    #[test]
    fn test_partition_covers_every_tile_exactly_once() {
        // Mixed map: plateaus, a trench and two texture regions.
        let map = TileMap::from_fn(16, 12, |x, y| {
            let h = if y >= 6 { 4 } else if x < 8 { 2 } else { 7 };
            let t = if x >= 12 { 3 } else { 1 };
            (h, t)
        });
        let sectors = build_sectors(&map).unwrap();

        let mut owners = vec![0u32; map.tile_count()];
        for sector in &sectors {
            for y in 0..map.height() {
                for x in 0..map.width() {
                    if sector.contains_tile(x, y) {
                        owners[y as usize * map.width() as usize + x as usize] += 1;
                    }
                }
            }
        }
        assert!(owners.iter().all(|&n| n == 1), "partition is not exact");
    }

    #[test]
    fn test_sector_attributes_are_uniform() {
        let map = TileMap::from_fn(16, 16, |x, y| ((x / 3 + y / 5) % 5, (x / 7) % 2));
        for sector in build_sectors(&map).unwrap() {
            for y in 0..sector.size[1] {
                for x in 0..sector.size[0] {
                    let (tx, ty) = (sector.origin[0] + x, sector.origin[1] + y);
                    assert_eq!(map.height_at(tx, ty), sector.visible_heights.max);
                    assert_eq!(map.texture_id_at(tx, ty), sector.texture_id);
                }
            }
        }
    }

    #[test]
    fn test_scan_is_deterministic() {
        let map = TileMap::from_fn(32, 32, |x, y| ((x ^ y) % 6, 0));
        let a = build_sectors(&map).unwrap();
        let b = build_sectors(&map).unwrap();
        assert_eq!(a.len(), b.len());
        for (sa, sb) in a.iter().zip(&b) {
            assert_eq!(sa.origin, sb.origin);
            assert_eq!(sa.size, sb.size);
        }
    }

    #[test]
    fn test_single_tile_map() {
        let map = TileMap::new(1, 1, vec![5], vec![2]).unwrap();
        let sectors = build_sectors(&map).unwrap();
        assert_eq!(sectors.len(), 1);
        assert_eq!(sectors[0].size, [1, 1]);
        assert_eq!(sectors[0].texture_id, 2);
    }

    #[test]
    fn test_full_width_row_at_max_axis() {
        let map = TileMap::from_fn(255, 1, |_, _| (1, 0));
        let sectors = build_sectors(&map).unwrap();
        assert_eq!(sectors.len(), 1);
        assert_eq!(sectors[0].size, [255, 1]);
    }
}
