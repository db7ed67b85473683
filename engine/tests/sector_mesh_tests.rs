//! Sector Mesh Tests - Decomposition and Face Generation
//!
//! End-to-end checks of the load-time pipeline: the greedy partition, the
//! per-sector attribute invariants, and the emitted face geometry (flat
//! round trip, wall non-duplication, boundary behavior).

use std::collections::HashMap;

use rampart_engine::map::TileMap;
use rampart_engine::render::{SectorMesh, VERTICES_PER_FACE, orientation};

/// Varied terrain with plateaus, ramps of different heights and several
/// texture regions.
fn varied_map() -> TileMap {
    TileMap::from_fn(24, 18, |x, y| {
        let h = match (x / 6, y / 6) {
            (0, _) => 2,
            (1, 0) => 7,
            (1, _) => 4,
            (2, 1) => 0,
            (2, _) => 5,
            _ => 3,
        };
        let t = (x / 8 + y / 9) as u8 % 4;
        (h, t)
    })
}

// ============================================================================
// Partition Tests
// ============================================================================

#[test]
fn test_every_tile_belongs_to_exactly_one_sector() {
    let map = varied_map();
    let mesh = SectorMesh::build(&map).unwrap();

    let mut covered = vec![0u32; map.tile_count()];
    for sector in mesh.sectors() {
        for dy in 0..sector.size[1] {
            for dx in 0..sector.size[0] {
                let x = sector.origin[0] + dx;
                let y = sector.origin[1] + dy;
                covered[y as usize * map.width() as usize + x as usize] += 1;
            }
        }
    }
    assert!(covered.iter().all(|&n| n == 1));
}

#[test]
fn test_sector_tiles_share_the_sector_attributes() {
    let map = varied_map();
    let mesh = SectorMesh::build(&map).unwrap();

    for sector in mesh.sectors() {
        for dy in 0..sector.size[1] {
            for dx in 0..sector.size[0] {
                let x = sector.origin[0] + dx;
                let y = sector.origin[1] + dy;
                assert_eq!(map.height_at(x, y), sector.visible_heights.max);
                assert_eq!(map.texture_id_at(x, y), sector.texture_id);
            }
        }
    }
}

// ============================================================================
// Wall Non-Duplication Tests
// ============================================================================

/// Break every emitted vertical face into unit-wide wall columns keyed by
/// the tile edge they cover.
///
/// Key: (axis, plane, cell) where axis 0 means a wall in an X = `plane`
/// plane covering the edge next to varying coordinate `cell`.
/// Value: (bottom, top) vertical extent.
fn wall_columns(mesh: &SectorMesh) -> HashMap<(u8, u8, u8), (u8, u8)> {
    let mut columns = HashMap::new();
    for face in mesh.vertices().chunks_exact(VERTICES_PER_FACE) {
        let orient = face[0].info & 0b111;
        if orient == orientation::FLAT {
            continue;
        }
        let axis = match orient {
            orientation::NS_RIGHT | orientation::NS_LEFT => 0u8,
            _ => 1u8,
        };
        let (plane_idx, vary_idx) = if axis == 0 { (0, 2) } else { (2, 0) };
        let plane = face[0].pos[plane_idx];
        let vary = |v: &rampart_engine::FaceVertex| v.pos[vary_idx];
        let near = face.iter().map(vary).min().unwrap();
        let far = face.iter().map(vary).max().unwrap();
        let bottom = face.iter().map(|v| v.pos[1]).min().unwrap();
        let top = face.iter().map(|v| v.pos[1]).max().unwrap();

        for cell in near..far {
            let prev = columns.insert((axis, plane, cell), (bottom, top));
            assert!(
                prev.is_none(),
                "tile edge (axis {axis}, plane {plane}, cell {cell}) walled twice"
            );
        }
    }
    columns
}

#[test]
fn test_each_height_step_gets_exactly_one_wall() {
    let map = varied_map();
    let mesh = SectorMesh::build(&map).unwrap();
    let mut columns = wall_columns(&mesh);

    // Horizontal neighbors: a step between (x, y) and (x + 1, y) must be
    // covered by exactly one column in the X = x + 1 plane, spanning from
    // the lower top to the higher top.
    for y in 0..map.height() {
        for x in 0..map.width() - 1 {
            let a = map.height_at(x, y);
            let b = map.height_at(x + 1, y);
            let expected = (a != b).then(|| (a.min(b), a.max(b)));
            assert_eq!(
                columns.remove(&(0, x + 1, y)),
                expected,
                "wall between ({x}, {y}) and ({}, {y})",
                x + 1
            );
        }
    }
    // Vertical neighbors, same idea in the Z = y + 1 plane.
    for y in 0..map.height() - 1 {
        for x in 0..map.width() {
            let a = map.height_at(x, y);
            let b = map.height_at(x, y + 1);
            let expected = (a != b).then(|| (a.min(b), a.max(b)));
            assert_eq!(
                columns.remove(&(1, y + 1, x)),
                expected,
                "wall between ({x}, {y}) and ({x}, {})",
                y + 1
            );
        }
    }

    assert!(
        columns.is_empty(),
        "walls emitted where no height step exists: {columns:?}"
    );
}

// ============================================================================
// Flat-Face Round Trip
// ============================================================================

#[test]
fn test_flat_faces_rebuild_the_tile_grid() {
    let map = varied_map();
    let mesh = SectorMesh::build(&map).unwrap();

    let mut heights = vec![None::<u8>; map.tile_count()];
    let mut textures = vec![None::<u8>; map.tile_count()];
    for face in mesh.vertices().chunks_exact(VERTICES_PER_FACE) {
        if face[0].info & 0b111 != orientation::FLAT {
            continue;
        }
        let x0 = face.iter().map(|v| v.pos[0]).min().unwrap();
        let x1 = face.iter().map(|v| v.pos[0]).max().unwrap();
        let z0 = face.iter().map(|v| v.pos[2]).min().unwrap();
        let z1 = face.iter().map(|v| v.pos[2]).max().unwrap();
        for z in z0..z1 {
            for x in x0..x1 {
                let i = z as usize * map.width() as usize + x as usize;
                assert!(heights[i].is_none());
                heights[i] = Some(face[0].pos[1]);
                textures[i] = Some(face[0].info >> 3);
            }
        }
    }

    for y in 0..map.height() {
        for x in 0..map.width() {
            let i = y as usize * map.width() as usize + x as usize;
            assert_eq!(heights[i], Some(map.height_at(x, y)));
            assert_eq!(textures[i], Some(map.texture_id_at(x, y)));
        }
    }
}

// ============================================================================
// Shipped Level Asset
// ============================================================================

#[test]
fn test_shipped_keep_level_builds() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("levels/keep.json");
    let map = rampart_engine::load_level(&path).unwrap();
    assert_eq!((map.width(), map.height()), (8, 6));

    let mesh = SectorMesh::build(&map).unwrap();
    assert!(!mesh.sectors().is_empty());
    // The outer wall ring is taller than everything inside, so the level
    // must contain vertical faces.
    assert!(mesh.face_count() as usize > mesh.sectors().len());
}
