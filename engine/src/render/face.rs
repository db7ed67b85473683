//! Face Mesh Generation
//!
//! Turns the sector list into renderable geometry: one flat top quad per
//! sector plus vertical wall segments wherever a sector looks down on a
//! shorter neighbor. All faces go into one shared CPU vertex buffer, six
//! vertices (two triangles) per face, and each sector records its contiguous
//! slice of that buffer.
//!
//! Walls are emitted from the taller side only: a height step between two
//! sectors produces exactly one connecting face, so nothing is ever drawn
//! twice - by construction, not by deduplication.
//!
//! ## Vertex format
//!
//! Each vertex is 4 bytes: a quantized position (one byte per axis) and a
//! packed attribute byte `(texture_id << 3) | orientation_id`. The shader
//! stage derives texture coordinates and the surface normal from the
//! position and orientation alone; there is no UV buffer.

use crate::map::TileMap;
use crate::render::sector::{FaceRange, Sector};

/// Two triangles per quad.
pub const VERTICES_PER_FACE: usize = 6;

/// Face orientation ids packed into the low 3 bits of the attribute byte.
/// The shader keys its normal and texture-plane selection off these.
pub mod orientation {
    /// Horizontal top face.
    pub const FLAT: u8 = 0;
    /// Wall on the sector's +X boundary plane, spanning along Z.
    pub const NS_RIGHT: u8 = 1;
    /// Wall on the sector's +Z boundary plane, spanning along X.
    pub const EW_BOTTOM: u8 = 2;
    /// Wall on the sector's -X boundary plane, spanning along Z.
    pub const NS_LEFT: u8 = 3;
    /// Wall on the sector's -Z boundary plane, spanning along X.
    pub const EW_TOP: u8 = 4;
}

/// Packed 4-byte mesh vertex.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FaceVertex {
    /// Quantized world position (X, Y, Z), one byte per axis.
    pub pos: [u8; 3],
    /// `(texture_id << 3) | orientation_id`.
    pub info: u8,
}

static_assertions::assert_eq_size!(FaceVertex, [u8; 4]);

impl FaceVertex {
    #[inline]
    fn new(x: u8, y: u8, z: u8, info: u8) -> Self {
        Self { pos: [x, y, z], info }
    }

    /// Texture id unpacked from the attribute byte.
    #[inline]
    pub fn texture_id(self) -> u8 {
        self.info >> 3
    }

    /// Orientation id unpacked from the attribute byte.
    #[inline]
    pub fn orientation_id(self) -> u8 {
        self.info & 0b111
    }
}

#[inline]
fn pack_info(texture_id: u8, orientation_id: u8) -> u8 {
    (texture_id << 3) | orientation_id
}

// ============================================================================
// FACE GENERATION
// ============================================================================

/// Which of the two boundary edges along an axis a wall sits on.
#[derive(Clone, Copy, PartialEq, Eq)]
enum EdgeSide {
    /// The `origin + size` edge (+X for NS walls, +Z for EW walls).
    Far,
    /// The `origin - 1` edge (-X for NS walls, -Z for EW walls).
    Near,
}

/// One wall segment found while scanning just outside a sector edge:
/// a run of neighbor tiles with the same (strictly positive) height step.
#[derive(Clone, Copy, Debug)]
struct WallSegment {
    /// Start position along the varying axis.
    start: u8,
    /// Run length along the varying axis.
    len: u8,
    /// Constant height difference (sector top minus neighbor height).
    step_height: u8,
}

/// Append every sector's faces to one shared vertex buffer.
///
/// Fills in each sector's `face_range` (its slice of the buffer) and
/// `visible_heights.min` (top height minus its tallest wall, for the
/// culling bounding box). Sector data is already validated; this phase is
/// pure derivation and cannot fail.
pub fn build_face_meshes(sectors: &mut [Sector], map: &TileMap) -> Vec<FaceVertex> {
    // Roughly three faces per sector on real maps; only a capacity hint.
    let mut vertices = Vec::with_capacity(sectors.len() * 3 * VERTICES_PER_FACE);

    for sector in sectors.iter_mut() {
        let start = (vertices.len() / VERTICES_PER_FACE) as u32;

        emit_flat_face(sector, &mut vertices);
        let tallest_wall = emit_vertical_faces(sector, map, &mut vertices);

        sector.visible_heights.min = sector.visible_heights.max - tallest_wall;
        sector.face_range = FaceRange {
            start,
            len: (vertices.len() / VERTICES_PER_FACE) as u32 - start,
        };
    }

    vertices
}

/// The sector's horizontal top quad at `visible_heights.max`.
fn emit_flat_face(sector: &Sector, out: &mut Vec<FaceVertex>) {
    let info = pack_info(sector.texture_id, orientation::FLAT);
    let [near_x, near_z] = sector.origin;
    let far_x = near_x + sector.size[0];
    let far_z = near_z + sector.size[1];
    let y = sector.visible_heights.max;

    out.extend_from_slice(&[
        FaceVertex::new(near_x, y, far_z, info),
        FaceVertex::new(far_x, y, near_z, info),
        FaceVertex::new(near_x, y, near_z, info),
        FaceVertex::new(near_x, y, far_z, info),
        FaceVertex::new(far_x, y, far_z, info),
        FaceVertex::new(far_x, y, near_z, info),
    ]);
}

/// Scan all four sector edges for downward height steps and emit one wall
/// per constant-step run. Returns the tallest wall height seen.
fn emit_vertical_faces(sector: &Sector, map: &TileMap, out: &mut Vec<FaceVertex>) -> u8 {
    let dimensions = [map.width(), map.height()];
    let mut tallest = 0u8;

    // fixed_axis 0 walks the two X-boundary edges (walls spanning along Z),
    // fixed_axis 1 the two Z-boundary edges (walls spanning along X).
    for fixed_axis in 0..2usize {
        let varying_axis = 1 - fixed_axis;
        let span_start = sector.origin[varying_axis];
        let span_end = span_start + sector.size[varying_axis];

        for side in [EdgeSide::Far, EdgeSide::Near] {
            // Wall plane coordinate, and the row/column just outside the
            // sector to compare heights against. Grid-boundary edges have no
            // neighbor and are skipped.
            let (plane, neighbor) = match side {
                EdgeSide::Near => {
                    let origin = sector.origin[fixed_axis];
                    if origin == 0 {
                        continue;
                    }
                    (origin, origin - 1)
                }
                EdgeSide::Far => {
                    let far = sector.origin[fixed_axis] + sector.size[fixed_axis];
                    if far == dimensions[fixed_axis] {
                        continue;
                    }
                    (far, far)
                }
            };

            let mut cursor = span_start;
            while let Some(segment) =
                next_wall_segment(sector, map, fixed_axis, neighbor, cursor, span_end)
            {
                emit_wall_face(sector, fixed_axis, side, plane, segment, out);
                tallest = tallest.max(segment.step_height);
                cursor = segment.start + segment.len;
            }
        }
    }

    tallest
}

/// Height sample along an edge: `fixed` is the neighbor row/column outside
/// the sector, `varying` the position along the edge.
#[inline]
fn neighbor_height(map: &TileMap, fixed_axis: usize, fixed: u8, varying: u8) -> u8 {
    if fixed_axis == 0 {
        map.height_at(fixed, varying)
    } else {
        map.height_at(varying, fixed)
    }
}

/// Find the next run of neighbor tiles, starting at `cursor`, whose height
/// sits strictly below the sector top by a constant amount. Returns `None`
/// once the edge is exhausted. A single edge can yield several segments of
/// different step heights.
fn next_wall_segment(
    sector: &Sector,
    map: &TileMap,
    fixed_axis: usize,
    neighbor: u8,
    mut cursor: u8,
    span_end: u8,
) -> Option<WallSegment> {
    let top = sector.visible_heights.max as i16;

    let mut step_height = 0u8;
    while cursor < span_end {
        let diff = top - neighbor_height(map, fixed_axis, neighbor, cursor) as i16;
        if diff > 0 {
            step_height = diff as u8;
            break;
        }
        cursor += 1;
    }
    if cursor == span_end {
        return None;
    }

    let start = cursor;
    let mut end = cursor;
    while end < span_end {
        let diff = top - neighbor_height(map, fixed_axis, neighbor, end) as i16;
        if diff != step_height as i16 {
            break;
        }
        end += 1;
    }

    Some(WallSegment {
        start,
        len: end - start,
        step_height,
    })
}

/// Emit one wall quad. Winding differs per edge so that normals always
/// point out of the sector; the vertex orders below are a fixed lookup by
/// (axis, side), nothing is computed per vertex.
fn emit_wall_face(
    sector: &Sector,
    fixed_axis: usize,
    side: EdgeSide,
    plane: u8,
    segment: WallSegment,
    out: &mut Vec<FaceVertex>,
) {
    let orientation_id = match (fixed_axis, side) {
        (0, EdgeSide::Far) => orientation::NS_RIGHT,
        (0, EdgeSide::Near) => orientation::NS_LEFT,
        (1, EdgeSide::Far) => orientation::EW_BOTTOM,
        _ => orientation::EW_TOP,
    };
    let info = pack_info(sector.texture_id, orientation_id);

    let top_y = sector.visible_heights.max;
    let bottom_y = top_y - segment.step_height;
    let near = segment.start;
    let far = near + segment.len;

    let quad = if fixed_axis == 0 {
        // Wall in the X = `plane` plane, spanning along Z.
        let x = plane;
        match side {
            EdgeSide::Near => [
                FaceVertex::new(x, bottom_y, near, info),
                FaceVertex::new(x, top_y, far, info),
                FaceVertex::new(x, top_y, near, info),
                FaceVertex::new(x, bottom_y, near, info),
                FaceVertex::new(x, bottom_y, far, info),
                FaceVertex::new(x, top_y, far, info),
            ],
            EdgeSide::Far => [
                FaceVertex::new(x, top_y, near, info),
                FaceVertex::new(x, top_y, far, info),
                FaceVertex::new(x, bottom_y, near, info),
                FaceVertex::new(x, top_y, far, info),
                FaceVertex::new(x, bottom_y, far, info),
                FaceVertex::new(x, bottom_y, near, info),
            ],
        }
    } else {
        // Wall in the Z = `plane` plane, spanning along X.
        let z = plane;
        match side {
            EdgeSide::Near => [
                FaceVertex::new(near, top_y, z, info),
                FaceVertex::new(far, top_y, z, info),
                FaceVertex::new(near, bottom_y, z, info),
                FaceVertex::new(far, top_y, z, info),
                FaceVertex::new(far, bottom_y, z, info),
                FaceVertex::new(near, bottom_y, z, info),
            ],
            EdgeSide::Far => [
                FaceVertex::new(near, bottom_y, z, info),
                FaceVertex::new(far, top_y, z, info),
                FaceVertex::new(near, top_y, z, info),
                FaceVertex::new(near, bottom_y, z, info),
                FaceVertex::new(far, bottom_y, z, info),
                FaceVertex::new(far, top_y, z, info),
            ],
        }
    };

    out.extend_from_slice(&quad);
}

// ============================================================================
// Tests
// ============================================================================
