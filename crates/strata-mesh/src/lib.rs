//! Section mesher: padded-volume sampling, face culling, per-pass vertex
//! accumulation and publishing to a graphics backend.
#![forbid(unsafe_code)]

pub mod builder;
pub mod chunk;
pub mod constants;
mod emit;
pub mod face;
pub mod model;
pub mod padded;
pub mod pass;
pub mod publish;
pub mod vertex;

pub use builder::{BuildStats, ChunkMeshBuilder, flag_index};
pub use chunk::ChunkMeshCpu;
pub use constants::VERTICES_PER_QUAD;
pub use face::Face;
pub use model::{BlockModel, FacePalette, ModelRegistry};
pub use padded::{PaddedVolume, SampleFlags};
pub use pass::{PassAccumulator, PassTable};
pub use publish::{
    BackendError, ChunkPartInfo, GraphicsBackend, SectionDrawInfo, TextureId, begin_render,
    end_render, publish_cpu, publish_part, publish_passes, render_part,
};
pub use vertex::{Topology, Vertex, VertexFormat};
