use strata_blocks::{AIR, BlockId};

use super::{CHUNK_SIZE, ChunkCoord};
use crate::grid::BlockGrid;

/// Dense, finite block storage spanning `[0, size)` on every axis.
///
/// Everything outside reads as air.
#[derive(Clone, Debug)]
pub struct World {
    pub chunks_x: usize,
    pub chunks_y: usize,
    pub chunks_z: usize,
    blocks: Vec<BlockId>,
}

impl World {
    pub fn new(chunks_x: usize, chunks_y: usize, chunks_z: usize) -> Self {
        let volume = chunks_x * chunks_y * chunks_z * CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE;
        Self {
            chunks_x,
            chunks_y,
            chunks_z,
            blocks: vec![AIR; volume],
        }
    }

    #[inline]
    pub fn size_x(&self) -> usize {
        self.chunks_x * CHUNK_SIZE
    }

    #[inline]
    pub fn size_y(&self) -> usize {
        self.chunks_y * CHUNK_SIZE
    }

    #[inline]
    pub fn size_z(&self) -> usize {
        self.chunks_z * CHUNK_SIZE
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && y >= 0
            && z >= 0
            && (x as usize) < self.size_x()
            && (y as usize) < self.size_y()
            && (z as usize) < self.size_z()
    }

    #[inline]
    fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.size_z() + z) * self.size_x() + x
    }

    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<BlockId> {
        if !self.contains(x, y, z) {
            return None;
        }
        Some(self.blocks[self.idx(x as usize, y as usize, z as usize)])
    }

    /// Writes a block. Returns `false` (and does nothing) outside the world.
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, id: BlockId) -> bool {
        if !self.contains(x, y, z) {
            return false;
        }
        let i = self.idx(x as usize, y as usize, z as usize);
        self.blocks[i] = id;
        true
    }

    /// Fills the inclusive box `min..=max`, clipped to the world.
    pub fn fill(&mut self, min: (i32, i32, i32), max: (i32, i32, i32), id: BlockId) {
        for y in min.1..=max.1 {
            for z in min.2..=max.2 {
                for x in min.0..=max.0 {
                    self.set_block(x, y, z, id);
                }
            }
        }
    }

    #[inline]
    pub fn section_count(&self) -> usize {
        self.chunks_x * self.chunks_y * self.chunks_z
    }

    pub fn contains_section(&self, coord: ChunkCoord) -> bool {
        coord.cx >= 0
            && coord.cy >= 0
            && coord.cz >= 0
            && (coord.cx as usize) < self.chunks_x
            && (coord.cy as usize) < self.chunks_y
            && (coord.cz as usize) < self.chunks_z
    }

    /// Every section in y, z, x order.
    pub fn sections(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        (0..self.chunks_y).flat_map(move |cy| {
            (0..self.chunks_z).flat_map(move |cz| {
                (0..self.chunks_x).map(move |cx| ChunkCoord::new(cx as i32, cy as i32, cz as i32))
            })
        })
    }

    /// Sections whose mesh depends on the block at `(x, y, z)`: its own plus any
    /// neighbour whose halo reads it.
    pub fn sections_touching(&self, x: i32, y: i32, z: i32) -> Vec<ChunkCoord> {
        let own = ChunkCoord::containing(x, y, z);
        let s = CHUNK_SIZE as i32;
        let (lx, ly, lz) = (x.rem_euclid(s), y.rem_euclid(s), z.rem_euclid(s));
        let mut out = vec![own];
        let edges = [
            (lx == 0, (-1, 0, 0)),
            (lx == s - 1, (1, 0, 0)),
            (ly == 0, (0, -1, 0)),
            (ly == s - 1, (0, 1, 0)),
            (lz == 0, (0, 0, -1)),
            (lz == s - 1, (0, 0, 1)),
        ];
        for (hit, (dx, dy, dz)) in edges {
            if hit {
                out.push(own.offset(dx, dy, dz));
            }
        }
        out.retain(|c| self.contains_section(*c));
        out
    }

    /// Count of non-air blocks, mainly for diagnostics.
    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|&&b| b != AIR).count()
    }
}

impl BlockGrid for World {
    #[inline]
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        self.get(x, y, z).unwrap_or(AIR)
    }
}
