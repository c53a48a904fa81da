use strata_blocks::BlockId;

/// Read access to block ids by world coordinate.
///
/// Implementations must return air (`0`) for coordinates outside loaded data
/// (world boundary, unloaded neighbours) instead of failing.
pub trait BlockGrid {
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId;
}

impl<G: BlockGrid + ?Sized> BlockGrid for &G {
    #[inline]
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        (**self).block_at(x, y, z)
    }
}

impl<G: BlockGrid + ?Sized> BlockGrid for Box<G> {
    #[inline]
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        (**self).block_at(x, y, z)
    }
}

/// Adapts a closure into a grid, handy for synthetic test worlds.
#[derive(Clone, Copy, Debug)]
pub struct FnGrid<F>(pub F);

impl<F> BlockGrid for FnGrid<F>
where
    F: Fn(i32, i32, i32) -> BlockId,
{
    #[inline]
    fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        (self.0)(x, y, z)
    }
}
