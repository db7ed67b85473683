//! Frustum Culling and Run Batching
//!
//! CPU core of the per-frame visibility pass. Walks the sector list in its
//! generation order, tests each sector's bounding box against the camera
//! frustum, and coalesces consecutive visible sectors into contiguous runs:
//! because face ranges were laid out in the same order, one run is one bulk
//! copy into the GPU buffer instead of one copy per sector.
//!
//! Kept free of any GPU types so the whole pass is unit-testable; the
//! render context drives it against the mapped vertex buffer.

use glam::{Mat4, Vec3, Vec4, Vec4Swizzles};

use crate::render::face::{FaceVertex, VERTICES_PER_FACE};
use crate::render::sector::Sector;

/// Six view-frustum planes as `(normal, distance)` rows; a point `p` is
/// inside a plane when `dot(normal, p) + distance >= 0`.
#[derive(Clone, Copy, Debug)]
pub struct Frustum {
    pub planes: [Vec4; 6],
}

impl Frustum {
    /// Extract the planes from a view-projection matrix (Gribb-Hartmann),
    /// assuming the wgpu/Vulkan clip convention of depth in `[0, 1]`.
    pub fn from_view_proj(view_proj: Mat4) -> Self {
        let r0 = view_proj.row(0);
        let r1 = view_proj.row(1);
        let r2 = view_proj.row(2);
        let r3 = view_proj.row(3);

        let mut planes = [
            r3 + r0, // left
            r3 - r0, // right
            r3 + r1, // bottom
            r3 - r1, // top
            r2,      // near (z >= 0)
            r3 - r2, // far
        ];
        for plane in &mut planes {
            let len = plane.xyz().length();
            if len > 0.0 {
                *plane /= len;
            }
        }
        Self { planes }
    }

    /// Inclusive AABB test: a box exactly touching a plane counts as
    /// visible. Uses the positive-vertex trick, so a box is rejected as soon
    /// as its farthest corner along one plane normal lies behind that plane.
    pub fn contains_aabb(&self, min: Vec3, max: Vec3) -> bool {
        for plane in &self.planes {
            let positive_vertex = Vec3::new(
                if plane.x >= 0.0 { max.x } else { min.x },
                if plane.y >= 0.0 { max.y } else { min.y },
                if plane.z >= 0.0 { max.z } else { min.z },
            );
            if plane.xyz().dot(positive_vertex) + plane.w < 0.0 {
                return false;
            }
        }
        true
    }
}

/// Bounding box of a sector: its footprint rectangle swept over the
/// vertical extent `[visible_heights.min, visible_heights.max]`.
pub fn sector_aabb(sector: &Sector) -> (Vec3, Vec3) {
    let [x, z] = sector.origin;
    let [w, d] = sector.size;
    (
        Vec3::new(x as f32, sector.visible_heights.min as f32, z as f32),
        Vec3::new(
            (x as u16 + w as u16) as f32,
            sector.visible_heights.max as f32,
            (z as u16 + d as u16) as f32,
        ),
    )
}

/// One maximal stretch of consecutive visible sectors, as a face slice of
/// the shared CPU buffer. `start` and `len` are in faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceRun {
    pub start: u32,
    pub len: u32,
}

/// Walk the sector list once and collect the visible runs into `runs`
/// (cleared first, so the caller can reuse the allocation frame to frame).
/// Returns the total visible face count.
pub fn collect_visible_runs(sectors: &[Sector], frustum: &Frustum, runs: &mut Vec<FaceRun>) -> u32 {
    runs.clear();
    let mut total_faces = 0u32;

    let mut i = 0;
    while i < sectors.len() {
        let run_start = sectors[i].face_range.start;
        let mut run_faces = 0u32;

        while i < sectors.len() {
            let (min, max) = sector_aabb(&sectors[i]);
            if !frustum.contains_aabb(min, max) {
                break;
            }
            run_faces += sectors[i].face_range.len;
            i += 1;
        }

        if run_faces != 0 {
            runs.push(FaceRun {
                start: run_start,
                len: run_faces,
            });
            total_faces += run_faces;
        }

        // Step past the sector that failed the test (or past the end).
        i += 1;
    }

    total_faces
}

/// Copy the runs, in order, into the destination at the next free offset.
/// Returns the number of vertices written. The destination must hold the
/// total run size; the GPU buffer always does, since its capacity equals
/// the full static mesh.
pub fn pack_runs(runs: &[FaceRun], cpu_vertices: &[FaceVertex], dst: &mut [FaceVertex]) -> usize {
    let mut cursor = 0usize;
    for run in runs {
        let src_start = run.start as usize * VERTICES_PER_FACE;
        let count = run.len as usize * VERTICES_PER_FACE;
        dst[cursor..cursor + count].copy_from_slice(&cpu_vertices[src_start..src_start + count]);
        cursor += count;
    }
    cursor
}

// ============================================================================
// Tests
// ============================================================================
