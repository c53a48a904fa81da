use std::ops::{Index, IndexMut};

use strata_blocks::RenderPass;

use crate::vertex::Vertex;

/// Grow-only vertex buffer for one render pass.
///
/// A rebuild resets `target` and `cursor`, adds to `target` while counting,
/// sizes the buffer once, then emission writes at `cursor`.
#[derive(Clone, Debug, Default)]
pub struct PassAccumulator {
    vertices: Vec<Vertex>,
    target: usize,
    cursor: usize,
}

impl PassAccumulator {
    /// Logically truncates; the buffer keeps its length and capacity.
    #[inline]
    pub fn reset(&mut self) {
        self.target = 0;
        self.cursor = 0;
    }

    #[inline]
    pub fn add_target(&mut self, n: usize) {
        self.target += n;
    }

    /// Grows the buffer to hold at least `target` vertices. Never shrinks.
    pub fn grow_to_target(&mut self) {
        if self.vertices.len() < self.target {
            self.vertices.resize(self.target, Vertex::default());
        }
    }

    /// Room between the cursor and the counted target.
    #[inline]
    pub fn remaining_mut(&mut self) -> &mut [Vertex] {
        &mut self.vertices[self.cursor..self.target]
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.cursor += n;
    }

    /// Vertices written during this rebuild.
    #[inline]
    pub fn filled(&self) -> &[Vertex] {
        &self.vertices[..self.cursor]
    }

    #[inline]
    pub fn target(&self) -> usize {
        self.target
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Allocated slots, kept across rebuilds.
    #[inline]
    pub fn allocated(&self) -> usize {
        self.vertices.len()
    }
}

/// One accumulator per render pass, indexed by `RenderPass`.
#[derive(Clone, Debug, Default)]
pub struct PassTable {
    passes: [PassAccumulator; RenderPass::COUNT],
}

impl PassTable {
    pub fn reset(&mut self) {
        self.passes.iter_mut().for_each(PassAccumulator::reset);
    }

    pub fn grow_to_targets(&mut self) {
        self.passes.iter_mut().for_each(PassAccumulator::grow_to_target);
    }

    pub fn iter(&self) -> impl Iterator<Item = (RenderPass, &PassAccumulator)> {
        RenderPass::ALL.into_iter().zip(self.passes.iter())
    }

    /// Filled slices in pass order.
    pub fn filled(&self) -> [&[Vertex]; RenderPass::COUNT] {
        [
            self.passes[0].filled(),
            self.passes[1].filled(),
            self.passes[2].filled(),
        ]
    }

    pub fn total_written(&self) -> usize {
        self.passes.iter().map(PassAccumulator::cursor).sum()
    }
}

impl Index<RenderPass> for PassTable {
    type Output = PassAccumulator;

    #[inline]
    fn index(&self, pass: RenderPass) -> &PassAccumulator {
        &self.passes[pass.index()]
    }
}

impl IndexMut<RenderPass> for PassTable {
    #[inline]
    fn index_mut(&mut self, pass: RenderPass) -> &mut PassAccumulator {
        &mut self.passes[pass.index()]
    }
}
