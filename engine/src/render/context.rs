//! Sector Render Context
//!
//! GPU side of the sector pipeline: owns the static [`SectorMesh`] and a
//! fixed-capacity vertex buffer sized to the full mesh. Every frame the
//! buffer's live contents are rewritten with just the visible subset, then
//! a single draw call covers it.
//!
//! The per-frame upload uses `Queue::write_buffer_with`: the returned view
//! is a mapped staging region that is handed back to wgpu when it drops, on
//! every exit path. That is the scoped map/write/unmap contract this pass
//! needs - there is exactly one writer and the write always closes before
//! the draw is recorded.

use crate::render::culling::{FaceRun, Frustum, collect_visible_runs, pack_runs};
use crate::render::face::{FaceVertex, VERTICES_PER_FACE};
use crate::render::mesh::SectorMesh;

/// Byte stride of one packed vertex.
pub const FACE_VERTEX_STRIDE: wgpu::BufferAddress = std::mem::size_of::<FaceVertex>() as u64;

/// Static level geometry plus its GPU vertex buffer.
pub struct SectorRenderContext {
    mesh: SectorMesh,
    vertex_buffer: wgpu::Buffer,
    /// Reused frame to frame to avoid a per-frame allocation.
    run_scratch: Vec<FaceRun>,
    /// Face count uploaded by the most recent submit (culled or full).
    visible_faces: u32,
}

impl SectorRenderContext {
    /// Allocate the vertex buffer at full-mesh capacity and wrap the mesh.
    /// The buffer size never changes afterwards; only its contents do.
    pub fn new(device: &wgpu::Device, mesh: SectorMesh) -> Self {
        let capacity_bytes =
            mesh.face_count() as u64 * VERTICES_PER_FACE as u64 * FACE_VERTEX_STRIDE;

        let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("sector face mesh"),
            // A level with no faces still gets a valid (stride-sized) buffer.
            size: capacity_bytes.max(FACE_VERTEX_STRIDE),
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            mesh,
            vertex_buffer,
            run_scratch: Vec::new(),
            visible_faces: 0,
        }
    }

    /// The static mesh this context renders.
    #[inline]
    pub fn mesh(&self) -> &SectorMesh {
        &self.mesh
    }

    /// The fixed-capacity GPU vertex buffer.
    #[inline]
    pub fn vertex_buffer(&self) -> &wgpu::Buffer {
        &self.vertex_buffer
    }

    /// Faces uploaded by the most recent submit.
    #[inline]
    pub fn visible_faces(&self) -> u32 {
        self.visible_faces
    }

    /// Vertex layout for the packed 4-byte format. wgpu has no 3-component
    /// u8 attribute, so position and the attribute byte travel as one
    /// `Uint8x4`; the shader reads `.xyz` as the position and unpacks
    /// texture id and orientation from `.w`.
    pub fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 1] = [wgpu::VertexAttribute {
            format: wgpu::VertexFormat::Uint8x4,
            offset: 0,
            shader_location: 0,
        }];
        wgpu::VertexBufferLayout {
            array_stride: FACE_VERTEX_STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }

    /// Per-frame visibility pass: cull sectors against `frustum`, coalesce
    /// visible neighbors into runs, and bulk-copy each run into the vertex
    /// buffer at the next free offset. Returns the visible face count.
    ///
    /// With nothing visible, no buffer is touched and the later
    /// [`Self::draw`] records no draw call.
    pub fn cull_and_submit(&mut self, queue: &wgpu::Queue, frustum: &Frustum) -> u32 {
        let mut runs = std::mem::take(&mut self.run_scratch);
        let visible_faces = collect_visible_runs(self.mesh.sectors(), frustum, &mut runs);
        self.visible_faces = visible_faces;

        if visible_faces != 0 {
            let bytes = visible_faces as u64 * VERTICES_PER_FACE as u64 * FACE_VERTEX_STRIDE;
            // Both failure modes here are programming errors: the byte count
            // is non-zero, and the capacity was derived from the same static
            // mesh the runs slice into.
            let size = wgpu::BufferSize::new(bytes).expect("visible byte range is non-zero");
            let mut view = queue
                .write_buffer_with(&self.vertex_buffer, 0, size)
                .expect("visible faces exceed the static mesh capacity");

            let dst: &mut [FaceVertex] = bytemuck::cast_slice_mut(&mut view[..]);
            let written = pack_runs(&runs, self.mesh.vertices(), dst);
            debug_assert_eq!(written, visible_faces as usize * VERTICES_PER_FACE);
            // `view` drops here: the staging region is handed back to wgpu
            // before any draw can be recorded against the buffer.
        }

        self.run_scratch = runs;
        visible_faces
    }

    /// Upload the complete static mesh, bypassing culling. Used by passes
    /// that need every face regardless of the camera, e.g. an external
    /// shadow-map pass. Returns the full face count.
    pub fn submit_full_mesh(&mut self, queue: &wgpu::Queue) -> u32 {
        let faces = self.mesh.face_count();
        if faces != 0 {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(self.mesh.vertices()));
        }
        self.visible_faces = faces;
        faces
    }

    /// Record the frame's single draw call, sized to the last submit.
    /// Records nothing when no faces are live; the caller binds the
    /// pipeline and bind groups.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.visible_faces == 0 {
            return;
        }
        let vertex_count = self.visible_faces * VERTICES_PER_FACE as u32;
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..vertex_count, 0..1);
    }
}

// ============================================================================
// Tests
// ============================================================================
