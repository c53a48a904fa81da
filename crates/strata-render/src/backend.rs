use std::num::NonZeroU32;

use hashbrown::HashMap;
use strata_mesh::{BackendError, GraphicsBackend, TextureId, Topology, Vertex, VertexFormat};

/// Handle of a buffer stored by `SoftwareBackend`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BufferId(NonZeroU32);

impl BufferId {
    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

struct StoredBuffer {
    bytes: Vec<u8>,
    vertex_count: usize,
    format: VertexFormat,
}

/// Counters since creation or the last `reset_frame_stats`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub uploads: usize,
    pub failed_uploads: usize,
    pub releases: usize,
    pub buffer_binds: usize,
    pub texture_binds: usize,
    pub batches: usize,
    pub draw_calls: usize,
    pub vertices_drawn: usize,
}

/// In-process graphics backend: buffers are byte copies kept in a map.
///
/// An optional byte budget stands in for device memory; uploads past it fail.
pub struct SoftwareBackend {
    buffers: HashMap<BufferId, StoredBuffer>,
    textures: HashMap<String, TextureId>,
    next_buffer: u32,
    next_texture: u32,
    budget_bytes: Option<usize>,
    used_bytes: usize,
    bound_buffer: Option<BufferId>,
    bound_texture: Option<TextureId>,
    batch: Option<VertexFormat>,
    stats: DrawStats,
}

impl Default for SoftwareBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SoftwareBackend {
    pub fn new() -> Self {
        Self {
            buffers: HashMap::new(),
            textures: HashMap::new(),
            next_buffer: 0,
            next_texture: 0,
            budget_bytes: None,
            used_bytes: 0,
            bound_buffer: None,
            bound_texture: None,
            batch: None,
            stats: DrawStats::default(),
        }
    }

    pub fn with_budget(budget_bytes: usize) -> Self {
        Self {
            budget_bytes: Some(budget_bytes),
            ..Self::new()
        }
    }

    /// Returns the texture registered under `key`, creating it on first use.
    pub fn load_texture(&mut self, key: &str) -> TextureId {
        if let Some(&id) = self.textures.get(key) {
            return id;
        }
        self.next_texture += 1;
        let id = TextureId(self.next_texture);
        self.textures.insert(key.to_string(), id);
        log::debug!("texture '{}' -> {}", key, id.0);
        id
    }

    #[inline]
    pub fn used_bytes(&self) -> usize {
        self.used_bytes
    }

    #[inline]
    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    #[inline]
    pub fn stats(&self) -> DrawStats {
        self.stats
    }

    pub fn reset_frame_stats(&mut self) {
        self.stats = DrawStats::default();
    }

    #[inline]
    pub fn bound_buffer(&self) -> Option<BufferId> {
        self.bound_buffer
    }

    #[inline]
    pub fn bound_texture(&self) -> Option<TextureId> {
        self.bound_texture
    }

    /// Reads a stored buffer back, mainly for tests and diagnostics.
    pub fn read_vertices(&self, id: BufferId) -> Option<Vec<Vertex>> {
        self.buffers
            .get(&id)
            .map(|b| bytemuck::pod_collect_to_vec::<u8, Vertex>(&b.bytes))
    }

    pub fn vertex_count(&self, id: BufferId) -> Option<usize> {
        self.buffers.get(&id).map(|b| b.vertex_count)
    }
}

impl GraphicsBackend for SoftwareBackend {
    type Handle = BufferId;

    fn create_vertex_buffer(
        &mut self,
        vertices: &[Vertex],
        topology: Topology,
        format: VertexFormat,
    ) -> Result<BufferId, BackendError> {
        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        debug_assert_eq!(bytes.len(), vertices.len() * format.stride());
        debug_assert_eq!(vertices.len() % topology.vertices_per_primitive(), 0);
        if let Some(budget) = self.budget_bytes {
            let available = budget.saturating_sub(self.used_bytes);
            if bytes.len() > available {
                self.stats.failed_uploads += 1;
                return Err(BackendError::OutOfMemory {
                    requested: bytes.len(),
                    available,
                });
            }
        }
        self.next_buffer += 1;
        let id = NonZeroU32::new(self.next_buffer)
            .map(BufferId)
            .ok_or(BackendError::OutOfMemory {
                requested: bytes.len(),
                available: 0,
            })?;
        self.used_bytes += bytes.len();
        self.buffers.insert(
            id,
            StoredBuffer {
                bytes: bytes.to_vec(),
                vertex_count: vertices.len(),
                format,
            },
        );
        self.stats.uploads += 1;
        Ok(id)
    }

    fn release_buffer(&mut self, handle: BufferId) {
        if let Some(buf) = self.buffers.remove(&handle) {
            self.used_bytes -= buf.bytes.len();
            self.stats.releases += 1;
            if self.bound_buffer == Some(handle) {
                self.bound_buffer = None;
            }
        } else {
            log::warn!("release of unknown buffer {}", handle.get());
        }
    }

    fn bind_buffer(&mut self, handle: BufferId) -> Result<(), BackendError> {
        if !self.buffers.contains_key(&handle) {
            return Err(BackendError::UnknownBuffer(handle.get()));
        }
        if self.bound_buffer != Some(handle) {
            self.bound_buffer = Some(handle);
            self.stats.buffer_binds += 1;
        }
        Ok(())
    }

    fn bind_texture(&mut self, texture: TextureId) -> Result<(), BackendError> {
        if !self.textures.values().any(|&t| t == texture) {
            return Err(BackendError::UnknownTexture(texture.0));
        }
        if self.bound_texture != Some(texture) {
            self.bound_texture = Some(texture);
            self.stats.texture_binds += 1;
        }
        Ok(())
    }

    fn begin_batch(&mut self, format: VertexFormat) {
        self.batch = Some(format);
        self.stats.batches += 1;
    }

    fn draw(&mut self, handle: BufferId, vertex_count: usize) -> Result<(), BackendError> {
        let Some(format) = self.batch else {
            return Err(BackendError::NotInBatch);
        };
        let buf = self
            .buffers
            .get(&handle)
            .ok_or(BackendError::UnknownBuffer(handle.get()))?;
        debug_assert_eq!(buf.format, format);
        if vertex_count > buf.vertex_count {
            return Err(BackendError::DrawOutOfRange {
                requested: vertex_count,
                available: buf.vertex_count,
            });
        }
        self.bind_buffer(handle)?;
        self.stats.draw_calls += 1;
        self.stats.vertices_drawn += vertex_count;
        Ok(())
    }

    fn end_batch(&mut self) {
        self.batch = None;
    }
}
