use hashbrown::HashMap;
use strata_world::{ChunkCoord, World};

/// Latest requested revision per section. A finished job whose revision is
/// older than this was superseded while it ran and should be dropped.
#[derive(Default, Debug)]
pub struct SectionRevisions {
    revs: HashMap<ChunkCoord, u64>,
}

impl SectionRevisions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current revision, 0 for sections never bumped.
    #[inline]
    pub fn current(&self, coord: ChunkCoord) -> u64 {
        self.revs.get(&coord).copied().unwrap_or(0)
    }

    pub fn bump(&mut self, coord: ChunkCoord) -> u64 {
        let rev = self.revs.entry(coord).or_insert(0);
        *rev += 1;
        *rev
    }

    #[inline]
    pub fn is_current(&self, coord: ChunkCoord, rev: u64) -> bool {
        self.current(coord) == rev
    }

    /// Bumps every section whose mesh can change when the block at
    /// `(x, y, z)` changes, including neighbours across a border.
    pub fn bump_block(&mut self, world: &World, x: i32, y: i32, z: i32) -> Vec<(ChunkCoord, u64)> {
        world
            .sections_touching(x, y, z)
            .into_iter()
            .map(|c| (c, self.bump(c)))
            .collect()
    }

    pub fn forget(&mut self, coord: ChunkCoord) {
        self.revs.remove(&coord);
    }

    pub fn len(&self) -> usize {
        self.revs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.revs.is_empty()
    }
}
