use hashbrown::HashMap;
use strata_mesh::{GraphicsBackend, SectionDrawInfo};
use strata_world::ChunkCoord;

/// Published sections by coordinate. Owns the handles it holds and releases
/// them when a section is replaced or dropped.
pub struct SectionCache<H> {
    sections: HashMap<ChunkCoord, SectionDrawInfo<H>>,
}

impl<H: Copy + Eq + std::fmt::Debug> Default for SectionCache<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Copy + Eq + std::fmt::Debug> SectionCache<H> {
    pub fn new() -> Self {
        Self {
            sections: HashMap::new(),
        }
    }

    /// Stores `info`, releasing whatever it supersedes. Empty sections are
    /// not kept.
    pub fn insert<B>(&mut self, backend: &mut B, coord: ChunkCoord, info: SectionDrawInfo<H>)
    where
        B: GraphicsBackend<Handle = H> + ?Sized,
    {
        let old = if info.is_empty() {
            self.sections.remove(&coord)
        } else {
            self.sections.insert(coord, info)
        };
        if let Some(mut old) = old {
            old.release(backend);
        }
    }

    /// Unloads one section. Returns whether anything was cached.
    pub fn remove<B>(&mut self, backend: &mut B, coord: ChunkCoord) -> bool
    where
        B: GraphicsBackend<Handle = H> + ?Sized,
    {
        match self.sections.remove(&coord) {
            Some(mut info) => {
                info.release(backend);
                true
            }
            None => false,
        }
    }

    pub fn clear<B>(&mut self, backend: &mut B)
    where
        B: GraphicsBackend<Handle = H> + ?Sized,
    {
        for (_, mut info) in self.sections.drain() {
            info.release(backend);
        }
    }

    #[inline]
    pub fn get(&self, coord: ChunkCoord) -> Option<&SectionDrawInfo<H>> {
        self.sections.get(&coord)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChunkCoord, &SectionDrawInfo<H>)> {
        self.sections.iter()
    }

    pub fn total_vertices(&self) -> usize {
        self.sections.values().map(SectionDrawInfo::total_vertices).sum()
    }
}
