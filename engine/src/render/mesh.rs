//! Sector Mesh
//!
//! Load-time container for one level's static geometry: the sector list and
//! the shared CPU vertex buffer the face generator filled. Built exactly once
//! per level and immutable afterwards; the per-frame culler only reads it.

use glam::Vec3;

use crate::map::TileMap;
use crate::render::face::{FaceVertex, VERTICES_PER_FACE, build_face_meshes};
use crate::render::sector::{Sector, SectorBuildError, build_sectors};

/// Immutable static mesh for one level.
pub struct SectorMesh {
    sectors: Vec<Sector>,
    vertices: Vec<FaceVertex>,
    world_aabb: (Vec3, Vec3),
}

impl SectorMesh {
    /// Decompose the map into sectors and generate all faces.
    ///
    /// Fails fatally on [`SectorBuildError::TextureIdOutOfRange`]; anything
    /// past that validation is pure derivation.
    pub fn build(map: &TileMap) -> Result<Self, SectorBuildError> {
        let mut sectors = build_sectors(map)?;
        let vertices = build_face_meshes(&mut sectors, map);

        log::info!(
            "built sector mesh: {} sectors, {} faces ({} bytes static)",
            sectors.len(),
            vertices.len() / VERTICES_PER_FACE,
            vertices.len() * std::mem::size_of::<FaceVertex>(),
        );

        Ok(Self {
            sectors,
            vertices,
            world_aabb: map.world_aabb(),
        })
    }

    /// Sectors in generation (scan) order; the culler walks this order.
    #[inline]
    pub fn sectors(&self) -> &[Sector] {
        &self.sectors
    }

    /// The shared CPU vertex buffer, 6 vertices per face.
    #[inline]
    pub fn vertices(&self) -> &[FaceVertex] {
        &self.vertices
    }

    /// Total face count of the full static mesh. This is also the capacity
    /// of the GPU-side buffer.
    #[inline]
    pub fn face_count(&self) -> u32 {
        (self.vertices.len() / VERTICES_PER_FACE) as u32
    }

    /// World-space bounds of the whole level.
    #[inline]
    pub fn world_aabb(&self) -> (Vec3, Vec3) {
        self.world_aabb
    }
}

// ============================================================================
// Tests
// ============================================================================
