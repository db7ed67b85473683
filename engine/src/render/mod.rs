//! Render Module
//!
//! Everything between the tile map and the draw call: the greedy sector
//! decomposition, face mesh generation into one shared vertex buffer, the
//! per-frame frustum culling / run batching core, and the wgpu-facing
//! render context that owns the fixed-capacity GPU buffer.

pub mod context;
pub mod culling;
pub mod face;
pub mod mesh;
pub mod sector;

pub use context::{FACE_VERTEX_STRIDE, SectorRenderContext};
pub use culling::{FaceRun, Frustum, collect_visible_runs, pack_runs, sector_aabb};
pub use face::{FaceVertex, VERTICES_PER_FACE, build_face_meshes, orientation};
pub use sector::{
    FaceRange, HeightBounds, MAX_SECTOR_TEXTURES, Sector, SectorBuildError, build_sectors,
};
pub use mesh::SectorMesh;
