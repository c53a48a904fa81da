use strata_blocks::{AIR, BlockId};
use strata_world::BlockGrid;

use crate::constants::{PAD, PADDED_LEN, SECTION};
use crate::face::Face;
use crate::model::{BlockModel, ModelRegistry};

/// Outcome of sampling: either flag lets the caller skip meshing entirely.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SampleFlags {
    /// Every interior cell is air.
    pub all_air: bool,
    /// Every interior and face-halo cell is a full opaque block.
    pub all_solid: bool,
}

impl SampleFlags {
    #[inline]
    pub fn is_degenerate(self) -> bool {
        self.all_air || self.all_solid
    }
}

/// A section plus a one-block halo, flattened y-major into `18^3` bytes.
///
/// Local coordinates run `-1..=16` on each axis; `0..16` is the section
/// proper. Edge and corner halo cells are never read by face lookups and
/// stay air.
#[derive(Clone)]
pub struct PaddedVolume {
    cells: Box<[BlockId]>,
}

impl Default for PaddedVolume {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PaddedVolume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let solid = self.cells.iter().filter(|&&b| b != AIR).count();
        f.debug_struct("PaddedVolume").field("non_air", &solid).finish()
    }
}

impl PaddedVolume {
    pub fn new() -> Self {
        Self {
            cells: vec![AIR; PADDED_LEN].into_boxed_slice(),
        }
    }

    /// Flat index of local `(lx, ly, lz)`, or `None` if any axis leaves `-1..=16`.
    #[inline]
    pub fn checked_index(lx: i32, ly: i32, lz: i32) -> Option<usize> {
        let r = -1..=SECTION as i32;
        if !(r.contains(&lx) && r.contains(&ly) && r.contains(&lz)) {
            return None;
        }
        Some((((ly + 1) as usize * PAD + (lz + 1) as usize) * PAD) + (lx + 1) as usize)
    }

    /// Flat index of local `(lx, ly, lz)`. Panics if any axis leaves `-1..=16`.
    #[inline]
    pub fn index(lx: i32, ly: i32, lz: i32) -> usize {
        match Self::checked_index(lx, ly, lz) {
            Some(i) => i,
            None => panic!("padded coordinate ({lx}, {ly}, {lz}) outside -1..=16"),
        }
    }

    #[inline]
    pub fn get(&self, index: usize) -> BlockId {
        self.cells[index]
    }

    #[inline]
    pub fn at(&self, lx: i32, ly: i32, lz: i32) -> Option<BlockId> {
        Self::checked_index(lx, ly, lz).map(|i| self.cells[i])
    }

    /// Block across `face` from the cell at `index`.
    #[inline]
    pub fn neighbor(&self, index: usize, face: Face) -> BlockId {
        let n = index.wrapping_add_signed(face.padded_offset());
        self.cells[n]
    }

    #[inline]
    pub fn as_slice(&self) -> &[BlockId] {
        &self.cells
    }

    /// Fills the volume for the section whose block origin is `(x1, y1, z1)`.
    ///
    /// Out-of-world and unloaded neighbours come back as air from the grid.
    pub fn sample<G, R>(&mut self, grid: &G, models: &R, origin: (i32, i32, i32)) -> SampleFlags
    where
        G: BlockGrid + ?Sized,
        R: ModelRegistry + ?Sized,
    {
        let (x1, y1, z1) = origin;
        let s = SECTION as i32;
        let is_full = |id: BlockId| models.model(id).is_some_and(|m| m.is_full_opaque());

        self.cells.fill(AIR);
        let mut all_air = true;
        let mut all_solid = true;

        for ly in 0..s {
            for lz in 0..s {
                let row = Self::index(0, ly, lz);
                for lx in 0..s {
                    let id = grid.block_at(x1 + lx, y1 + ly, z1 + lz);
                    self.cells[row + lx as usize] = id;
                    all_air &= id == AIR;
                    all_solid &= is_full(id);
                }
            }
        }

        // Face halos in face order: -X, +X, -Z, +Z, -Y, +Y
        for (a, b) in square(s) {
            for (lx, ly, lz) in [(-1, a, b), (s, a, b)] {
                let id = grid.block_at(x1 + lx, y1 + ly, z1 + lz);
                self.cells[Self::index(lx, ly, lz)] = id;
                all_solid &= is_full(id);
            }
        }
        for (a, b) in square(s) {
            for (lx, ly, lz) in [(a, b, -1), (a, b, s)] {
                let id = grid.block_at(x1 + lx, y1 + ly, z1 + lz);
                self.cells[Self::index(lx, ly, lz)] = id;
                all_solid &= is_full(id);
            }
        }
        for (a, b) in square(s) {
            for (lx, ly, lz) in [(a, -1, b), (a, s, b)] {
                let id = grid.block_at(x1 + lx, y1 + ly, z1 + lz);
                self.cells[Self::index(lx, ly, lz)] = id;
                all_solid &= is_full(id);
            }
        }

        SampleFlags {
            all_air,
            all_solid,
        }
    }
}

#[inline]
fn square(s: i32) -> impl Iterator<Item = (i32, i32)> {
    (0..s).flat_map(move |a| (0..s).map(move |b| (a, b)))
}
