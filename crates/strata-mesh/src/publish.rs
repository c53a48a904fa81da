use std::fmt::Debug;
use std::ops::Index;

use strata_blocks::RenderPass;
use thiserror::Error;

use crate::chunk::ChunkMeshCpu;
use crate::vertex::{Topology, Vertex, VertexFormat};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("vertex buffer of {requested} bytes exceeds the remaining {available} bytes")]
    OutOfMemory { requested: usize, available: usize },
    #[error("unknown vertex buffer {0}")]
    UnknownBuffer(u32),
    #[error("unknown texture {0}")]
    UnknownTexture(u32),
    #[error("draw issued outside a batch")]
    NotInBatch,
    #[error("draw of {requested} vertices from a buffer holding {available}")]
    DrawOutOfRange { requested: usize, available: usize },
}

/// Opaque texture handle, e.g. the terrain atlas.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Allocates, binds and draws static vertex buffers.
///
/// Lives on one thread; builders on other threads hand over `ChunkMeshCpu`.
pub trait GraphicsBackend {
    type Handle: Copy + Eq + Debug;

    fn create_vertex_buffer(
        &mut self,
        vertices: &[Vertex],
        topology: Topology,
        format: VertexFormat,
    ) -> Result<Self::Handle, BackendError>;

    fn release_buffer(&mut self, handle: Self::Handle);

    fn bind_buffer(&mut self, handle: Self::Handle) -> Result<(), BackendError>;

    fn bind_texture(&mut self, texture: TextureId) -> Result<(), BackendError>;

    fn begin_batch(&mut self, format: VertexFormat);

    /// Draws from the bound buffer; rebinding is skipped by the backend when
    /// `handle` is already bound.
    fn draw(&mut self, handle: Self::Handle, vertex_count: usize) -> Result<(), BackendError>;

    fn end_batch(&mut self);
}

/// Published geometry of one pass. The caller owns the handle and must
/// release it when the section is unloaded or rebuilt.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChunkPartInfo<H> {
    pub buffer: Option<H>,
    pub vertex_count: usize,
}

impl<H> Default for ChunkPartInfo<H> {
    fn default() -> Self {
        Self {
            buffer: None,
            vertex_count: 0,
        }
    }
}

impl<H: Copy> ChunkPartInfo<H> {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    /// Geometry was counted but the backend refused the upload.
    #[inline]
    pub fn upload_failed(&self) -> bool {
        self.buffer.is_none() && self.vertex_count > 0
    }

    pub fn release<B>(&mut self, backend: &mut B)
    where
        B: GraphicsBackend<Handle = H> + ?Sized,
    {
        if let Some(h) = self.buffer.take() {
            backend.release_buffer(h);
        }
        self.vertex_count = 0;
    }
}

/// One part per render pass, indexed by `RenderPass`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SectionDrawInfo<H> {
    pub parts: [ChunkPartInfo<H>; RenderPass::COUNT],
}

impl<H> Default for SectionDrawInfo<H> {
    fn default() -> Self {
        Self {
            parts: [
                ChunkPartInfo::default(),
                ChunkPartInfo::default(),
                ChunkPartInfo::default(),
            ],
        }
    }
}

impl<H: Copy> SectionDrawInfo<H> {
    #[inline]
    pub fn part(&self, pass: RenderPass) -> &ChunkPartInfo<H> {
        &self.parts[pass.index()]
    }

    pub fn total_vertices(&self) -> usize {
        self.parts.iter().map(|p| p.vertex_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.iter().all(ChunkPartInfo::is_empty)
    }

    pub fn any_upload_failed(&self) -> bool {
        self.parts.iter().any(ChunkPartInfo::upload_failed)
    }

    /// Releases every handle and zeroes the counts.
    pub fn release<B>(&mut self, backend: &mut B)
    where
        B: GraphicsBackend<Handle = H> + ?Sized,
    {
        for part in &mut self.parts {
            part.release(backend);
        }
    }
}

impl<H> Index<RenderPass> for SectionDrawInfo<H> {
    type Output = ChunkPartInfo<H>;

    #[inline]
    fn index(&self, pass: RenderPass) -> &ChunkPartInfo<H> {
        &self.parts[pass.index()]
    }
}

/// Uploads one pass. Empty input creates nothing; a failed upload is logged and
/// returned as a part without a buffer.
pub fn publish_part<B>(backend: &mut B, pass: RenderPass, vertices: &[Vertex]) -> ChunkPartInfo<B::Handle>
where
    B: GraphicsBackend + ?Sized,
{
    if vertices.is_empty() {
        return ChunkPartInfo::default();
    }
    match backend.create_vertex_buffer(vertices, Topology::TriangleList, VertexFormat::P3fT2fC4b) {
        Ok(h) => ChunkPartInfo {
            buffer: Some(h),
            vertex_count: vertices.len(),
        },
        Err(e) => {
            log::warn!(
                "vertex upload failed pass={} vertices={}: {}",
                pass.name(),
                vertices.len(),
                e
            );
            ChunkPartInfo {
                buffer: None,
                vertex_count: vertices.len(),
            }
        }
    }
}

/// Uploads per-pass slices given in `RenderPass` order.
pub fn publish_passes<B>(
    backend: &mut B,
    passes: [&[Vertex]; RenderPass::COUNT],
) -> SectionDrawInfo<B::Handle>
where
    B: GraphicsBackend + ?Sized,
{
    let mut info = SectionDrawInfo::default();
    for pass in RenderPass::ALL {
        info.parts[pass.index()] = publish_part(backend, pass, passes[pass.index()]);
    }
    info
}

/// Publishes a mesh built off the backend thread.
pub fn publish_cpu<B>(backend: &mut B, cpu: &ChunkMeshCpu) -> SectionDrawInfo<B::Handle>
where
    B: GraphicsBackend + ?Sized,
{
    publish_passes(
        backend,
        [
            cpu.vertices(RenderPass::Solid),
            cpu.vertices(RenderPass::Translucent),
            cpu.vertices(RenderPass::Sprite),
        ],
    )
}

/// Opens a batch for section parts. Bind the atlas once before the first batch.
#[inline]
pub fn begin_render<B: GraphicsBackend + ?Sized>(backend: &mut B) {
    backend.begin_batch(VertexFormat::P3fT2fC4b);
}

/// Draws one part. Returns `Ok(false)` for empty or failed parts.
pub fn render_part<B>(backend: &mut B, part: &ChunkPartInfo<B::Handle>) -> Result<bool, BackendError>
where
    B: GraphicsBackend + ?Sized,
{
    match part.buffer {
        Some(h) if part.vertex_count > 0 => {
            backend.draw(h, part.vertex_count)?;
            Ok(true)
        }
        _ => Ok(false),
    }
}

#[inline]
pub fn end_render<B: GraphicsBackend + ?Sized>(backend: &mut B) {
    backend.end_batch();
}
