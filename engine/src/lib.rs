//! Rampart Engine Library
//!
//! Sector meshing and frustum-batched submission for a retro first-person
//! renderer. A level is a 2D tile grid (per-tile height + texture id); this
//! library turns it into renderable geometry once at load time and then
//! re-selects the visible subset every frame:
//!
//! - [`map`] - the immutable [`TileMap`](map::TileMap) input, the load-time
//!   visited bitset, and JSON level assets
//! - [`render`] - greedy sector decomposition, face mesh generation into a
//!   shared packed vertex buffer, frustum culling with contiguous-run
//!   batching, and the wgpu render context
//!
//! # Example
//!
//! ```ignore
//! use rampart_engine::map::TileMap;
//! use rampart_engine::render::{Frustum, SectorMesh, SectorRenderContext};
//!
//! // Load time, once per level:
//! let map = TileMap::from_fn(64, 64, |x, y| (terrain_height(x, y), 0));
//! let mesh = SectorMesh::build(&map)?;
//! let mut context = SectorRenderContext::new(&device, mesh);
//!
//! // Per frame, after the camera computes its planes:
//! let frustum = Frustum::from_view_proj(camera_view_proj);
//! let visible = context.cull_and_submit(&queue, &frustum);
//! // ... inside the render pass, with pipeline and bind groups set:
//! context.draw(&mut render_pass);
//! ```

pub mod map;
pub mod render;

pub use map::{LevelFile, LevelFileError, TileMap, TileMapError, VisitedMask, load_level};
pub use render::{
    FaceRange, FaceRun, FaceVertex, Frustum, HeightBounds, MAX_SECTOR_TEXTURES, Sector,
    SectorBuildError, SectorMesh, SectorRenderContext, VERTICES_PER_FACE,
};
