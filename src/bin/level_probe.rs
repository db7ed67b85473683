//! Level Probe
//!
//! Headless diagnostic for the sector pipeline: loads a level file (or a
//! built-in demo map), builds the static sector mesh, then sweeps a camera
//! around the level and reports how many faces the frustum culler submits
//! from each angle.
//!
//! When a GPU adapter is available the sweep runs against a real device
//! through `SectorRenderContext` (buffer writes included); without one it
//! falls back to the CPU run-collection core, which is the same walk minus
//! the upload.
//!
//! Usage: `level-probe [path/to/level.json]`

use std::path::Path;

use glam::{Mat4, Vec3};
use rampart_engine::map::{TileMap, load_level};
use rampart_engine::render::{Frustum, SectorMesh, SectorRenderContext, collect_visible_runs};

/// A small keep: raised plaza, surrounding yard, sunken moat ring and an
/// outer wall, exercising flat faces and walls of several step heights.
fn demo_map() -> TileMap {
    TileMap::from_fn(48, 48, |x, y| {
        let on_border = x == 0 || y == 0 || x == 47 || y == 47;
        if on_border {
            (8, 2)
        } else if (16..32).contains(&x) && (16..32).contains(&y) {
            (5, 1)
        } else if (12..36).contains(&x) && (12..36).contains(&y) {
            (1, 3)
        } else {
            (2, 0)
        }
    })
}

/// Perspective camera on a ring around the level, looking at its center.
fn orbit_frustum(map: &TileMap, angle_rad: f32) -> Frustum {
    let (_, world_max) = map.world_aabb();
    let center = Vec3::new(world_max.x * 0.5, world_max.y * 0.5, world_max.z * 0.5);
    let radius = world_max.x.max(world_max.z) * 1.2;
    let eye = center + Vec3::new(angle_rad.cos() * radius, 20.0, angle_rad.sin() * radius);

    let view = Mat4::look_at_rh(eye, center, Vec3::Y);
    let proj = Mat4::perspective_rh(60f32.to_radians(), 16.0 / 9.0, 0.1, 1000.0);
    Frustum::from_view_proj(proj * view)
}

/// Same ring position, but looking directly away from the level.
fn facing_away_frustum(map: &TileMap) -> Frustum {
    let (_, world_max) = map.world_aabb();
    let center = Vec3::new(world_max.x * 0.5, 0.0, world_max.z * 0.5);
    let eye = center + Vec3::new(world_max.x * 1.2, 20.0, 0.0);
    let away = eye + (eye - center);

    let view = Mat4::look_at_rh(eye, away, Vec3::Y);
    let proj = Mat4::perspective_rh(60f32.to_radians(), 16.0 / 9.0, 0.1, 1000.0);
    Frustum::from_view_proj(proj * view)
}

fn sweep_on_gpu(mesh: SectorMesh, map: &TileMap) -> Option<()> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::HighPerformance,
        compatible_surface: None,
        force_fallback_adapter: false,
    }))
    .map_err(|e| log::warn!("no GPU adapter ({e}), falling back to CPU culling"))
    .ok()?;

    let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
        label: Some("Rampart Probe Device"),
        required_features: wgpu::Features::empty(),
        required_limits: wgpu::Limits::default(),
        memory_hints: wgpu::MemoryHints::Performance,
        ..Default::default()
    }))
    .map_err(|e| log::warn!("device creation failed ({e}), falling back to CPU culling"))
    .ok()?;

    log::info!("culling on {}", adapter.get_info().name);
    let mut context = SectorRenderContext::new(&device, mesh);

    for step in 0..8 {
        let angle = step as f32 * std::f32::consts::TAU / 8.0;
        let visible = context.cull_and_submit(&queue, &orbit_frustum(map, angle));
        queue.submit(std::iter::empty());
        log::info!(
            "orbit {:>3}°: {:>5} / {} faces submitted",
            (step * 45),
            visible,
            context.mesh().face_count()
        );
    }

    let visible = context.cull_and_submit(&queue, &facing_away_frustum(map));
    queue.submit(std::iter::empty());
    log::info!("facing away: {visible} faces submitted (expected 0)");
    Some(())
}

fn sweep_on_cpu(mesh: &SectorMesh, map: &TileMap) {
    let mut runs = Vec::new();
    for step in 0..8 {
        let angle = step as f32 * std::f32::consts::TAU / 8.0;
        let visible = collect_visible_runs(mesh.sectors(), &orbit_frustum(map, angle), &mut runs);
        log::info!(
            "orbit {:>3}°: {:>5} / {} faces visible in {} runs",
            (step * 45),
            visible,
            mesh.face_count(),
            runs.len()
        );
    }

    let visible = collect_visible_runs(mesh.sectors(), &facing_away_frustum(map), &mut runs);
    log::info!("facing away: {visible} faces visible (expected 0)");
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let map = match std::env::args().nth(1) {
        Some(path) => match load_level(Path::new(&path)) {
            Ok(map) => map,
            Err(e) => {
                log::error!("failed to load level '{path}': {e}");
                std::process::exit(1);
            }
        },
        None => {
            log::info!("no level given, using the built-in demo map");
            demo_map()
        }
    };

    let mesh = match SectorMesh::build(&map) {
        Ok(mesh) => mesh,
        Err(e) => {
            log::error!("level failed to load: {e}");
            std::process::exit(1);
        }
    };

    let walls = mesh.face_count() as usize - mesh.sectors().len();
    log::info!(
        "{}x{} tiles -> {} sectors, {} faces ({} flat, {} walls)",
        map.width(),
        map.height(),
        mesh.sectors().len(),
        mesh.face_count(),
        mesh.sectors().len(),
        walls
    );

    if sweep_on_gpu(mesh, &map).is_none() {
        // The mesh moved into the GPU attempt only on success; rebuild is
        // cheap and keeps the two paths independent.
        let mesh = SectorMesh::build(&map).expect("mesh built once already");
        sweep_on_cpu(&mesh, &map);
    }
}
