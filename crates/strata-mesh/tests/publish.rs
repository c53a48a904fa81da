use std::collections::HashMap;

use strata_blocks::{BlockRegistry, RenderPass};
use strata_mesh::{
    BackendError, ChunkMeshBuilder, GraphicsBackend, TextureId, Topology, VERTICES_PER_QUAD,
    Vertex, VertexFormat, begin_render, end_render, publish_cpu, render_part,
};
use strata_world::{ChunkCoord, FnGrid};

/// Records every call; fails uploads once `fail_uploads` is set.
#[derive(Default)]
struct RecordingBackend {
    next: u32,
    live: HashMap<u32, usize>,
    fail_uploads: bool,
    uploads: usize,
    released: Vec<u32>,
    draws: Vec<(u32, usize)>,
    binds: usize,
    bound: Option<u32>,
    batch: Option<VertexFormat>,
}

impl GraphicsBackend for RecordingBackend {
    type Handle = u32;

    fn create_vertex_buffer(
        &mut self,
        vertices: &[Vertex],
        topology: Topology,
        format: VertexFormat,
    ) -> Result<u32, BackendError> {
        assert_eq!(topology, Topology::TriangleList);
        assert_eq!(format, VertexFormat::P3fT2fC4b);
        if self.fail_uploads {
            return Err(BackendError::OutOfMemory {
                requested: vertices.len() * format.stride(),
                available: 0,
            });
        }
        self.next += 1;
        self.uploads += 1;
        self.live.insert(self.next, vertices.len());
        Ok(self.next)
    }

    fn release_buffer(&mut self, handle: u32) {
        self.live.remove(&handle);
        self.released.push(handle);
    }

    fn bind_buffer(&mut self, handle: u32) -> Result<(), BackendError> {
        if !self.live.contains_key(&handle) {
            return Err(BackendError::UnknownBuffer(handle));
        }
        if self.bound != Some(handle) {
            self.bound = Some(handle);
            self.binds += 1;
        }
        Ok(())
    }

    fn bind_texture(&mut self, _texture: TextureId) -> Result<(), BackendError> {
        Ok(())
    }

    fn begin_batch(&mut self, format: VertexFormat) {
        self.batch = Some(format);
    }

    fn draw(&mut self, handle: u32, vertex_count: usize) -> Result<(), BackendError> {
        if self.batch.is_none() {
            return Err(BackendError::NotInBatch);
        }
        self.bind_buffer(handle)?;
        self.draws.push((handle, vertex_count));
        Ok(())
    }

    fn end_batch(&mut self) {
        self.batch = None;
    }
}

fn registry() -> BlockRegistry {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let assets = root.join("../../assets");
    BlockRegistry::load_from_paths(assets.join("atlas.toml"), assets.join("blocks.toml")).unwrap()
}

#[test]
fn empty_passes_publish_null_parts() {
    let reg = registry();
    let stone = reg.id_by_name("stone").unwrap();
    let grid = FnGrid(move |x: i32, y: i32, z: i32| if (x, y, z) == (1, 1, 1) { stone } else { 0 });
    let mut backend = RecordingBackend::default();
    let mut b = ChunkMeshBuilder::default();
    let info = b.build(&grid, &reg, ChunkCoord::new(0, 0, 0), &mut backend);

    assert_eq!(backend.uploads, 1);
    let solid = info[RenderPass::Solid];
    assert!(solid.buffer.is_some());
    assert_eq!(solid.vertex_count, 6 * VERTICES_PER_QUAD);
    for pass in [RenderPass::Translucent, RenderPass::Sprite] {
        assert_eq!(info.part(pass).buffer, None);
        assert_eq!(info.part(pass).vertex_count, 0);
        assert!(!info.part(pass).upload_failed());
    }
    assert_eq!(backend.live[&solid.buffer.unwrap()], solid.vertex_count);
}

#[test]
fn degenerate_section_creates_nothing() {
    let reg = registry();
    let mut backend = RecordingBackend::default();
    let mut b = ChunkMeshBuilder::default();
    let info = b.build(&FnGrid(|_: i32, _: i32, _: i32| 0u8), &reg, ChunkCoord::new(0, 0, 0), &mut backend);
    assert!(info.is_empty());
    assert_eq!(backend.uploads, 0);
}

#[test]
fn upload_failure_keeps_count_without_buffer() {
    let reg = registry();
    let stone = reg.id_by_name("stone").unwrap();
    let grid = FnGrid(move |x: i32, y: i32, z: i32| if (x, y, z) == (2, 2, 2) { stone } else { 0 });
    let mut backend = RecordingBackend {
        fail_uploads: true,
        ..RecordingBackend::default()
    };
    let mut b = ChunkMeshBuilder::default();
    let info = b.build(&grid, &reg, ChunkCoord::new(0, 0, 0), &mut backend);
    let solid = info[RenderPass::Solid];
    assert!(solid.upload_failed());
    assert_eq!(solid.buffer, None);
    assert_eq!(solid.vertex_count, 6 * VERTICES_PER_QUAD);
    assert!(info.any_upload_failed());

    // Failed parts are skipped at draw time
    begin_render(&mut backend);
    assert!(!render_part(&mut backend, &solid).unwrap());
    end_render(&mut backend);
    assert!(backend.draws.is_empty());
}

#[test]
fn cpu_handoff_publishes_same_data() {
    let reg = registry();
    let stone = reg.id_by_name("stone").unwrap();
    let rose = reg.id_by_name("rose").unwrap();
    let water = reg.id_by_name("water").unwrap();
    let grid = FnGrid(move |x: i32, y: i32, z: i32| match (x, y, z) {
        (1, 1, 1) => stone,
        (3, 1, 1) => rose,
        (5, 1, 1) => water,
        _ => 0,
    });
    let mut worker = ChunkMeshBuilder::default();
    let cpu = worker.build_cpu(&grid, &reg, ChunkCoord::new(0, 0, 0));
    let mut backend = RecordingBackend::default();
    let info = publish_cpu(&mut backend, &cpu);
    assert_eq!(backend.uploads, 3);
    for pass in RenderPass::ALL {
        assert_eq!(info.part(pass).vertex_count, cpu.vertices(pass).len());
        assert!(info.part(pass).buffer.is_some());
    }
    assert_eq!(info.total_vertices(), cpu.total_vertices());
}

#[test]
fn batched_draws_and_release() {
    let reg = registry();
    let stone = reg.id_by_name("stone").unwrap();
    let rose = reg.id_by_name("rose").unwrap();
    let grid = FnGrid(move |x: i32, y: i32, z: i32| match (x, y, z) {
        (1, 1, 1) => stone,
        (3, 1, 1) => rose,
        _ => 0,
    });
    let mut backend = RecordingBackend::default();
    let mut b = ChunkMeshBuilder::default();
    let mut info = b.build(&grid, &reg, ChunkCoord::new(0, 0, 0), &mut backend);

    assert_eq!(render_part(&mut backend, &info[RenderPass::Solid]), Err(BackendError::NotInBatch));

    begin_render(&mut backend);
    let mut drawn = 0;
    for pass in RenderPass::ALL {
        if render_part(&mut backend, info.part(pass)).unwrap() {
            drawn += 1;
        }
    }
    // Redrawing the last part reuses the bound buffer
    render_part(&mut backend, info.part(RenderPass::Sprite)).unwrap();
    end_render(&mut backend);
    assert_eq!(drawn, 2);
    assert_eq!(backend.draws.len(), 3);
    assert_eq!(backend.binds, 2);

    info.release(&mut backend);
    assert!(backend.live.is_empty());
    assert_eq!(backend.released.len(), 2);
    assert!(info.is_empty());
    // Releasing twice is a no-op
    info.release(&mut backend);
    assert_eq!(backend.released.len(), 2);
}
