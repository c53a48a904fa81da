use strata_blocks::RenderPass;
use strata_geom::Aabb;
use strata_world::ChunkCoord;

use crate::builder::BuildStats;
use crate::vertex::Vertex;

/// Owned per-pass vertices of one section, ready to hand to the backend thread.
#[derive(Clone, Debug)]
pub struct ChunkMeshCpu {
    pub coord: ChunkCoord,
    pub bbox: Aabb,
    pub passes: [Vec<Vertex>; RenderPass::COUNT],
    pub stats: BuildStats,
}

impl ChunkMeshCpu {
    #[inline]
    pub fn vertices(&self, pass: RenderPass) -> &[Vertex] {
        &self.passes[pass.index()]
    }

    pub fn total_vertices(&self) -> usize {
        self.passes.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.iter().all(Vec::is_empty)
    }
}
