use bytemuck::{Pod, Zeroable};

/// Interleaved vertex: position, atlas UV and RGBA tint.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub uv: [f32; 2],
    pub col: [u8; 4],
}

impl Vertex {
    #[inline]
    pub const fn new(pos: [f32; 3], uv: [f32; 2], col: [u8; 4]) -> Self {
        Self { pos, uv, col }
    }
}

/// Vertex layouts a backend may be asked to store.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VertexFormat {
    /// 3 x f32 position, 2 x f32 texcoord, 4 x u8 colour.
    P3fT2fC4b,
}

impl VertexFormat {
    #[inline]
    pub const fn stride(self) -> usize {
        match self {
            VertexFormat::P3fT2fC4b => std::mem::size_of::<Vertex>(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Topology {
    TriangleList,
}

impl Topology {
    #[inline]
    pub const fn vertices_per_primitive(self) -> usize {
        match self {
            Topology::TriangleList => 3,
        }
    }
}
