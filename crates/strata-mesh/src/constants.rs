//! Shared constants for strata-mesh. Centralizes the padded-volume layout.

use strata_world::CHUNK_SIZE;

/// Blocks per section edge.
pub const SECTION: usize = CHUNK_SIZE;
/// Padded edge: the section plus a one-block halo on each side.
pub const PAD: usize = SECTION + 2;
pub const PADDED_LEN: usize = PAD * PAD * PAD;
pub const SECTION_VOLUME: usize = SECTION * SECTION * SECTION;

// Padded-volume strides, y outer, z middle, x inner
pub const STRIDE_X: isize = 1;
pub const STRIDE_Z: isize = PAD as isize;
pub const STRIDE_Y: isize = (PAD * PAD) as isize;

pub const OFFSET_LEFT: isize = -STRIDE_X;
pub const OFFSET_RIGHT: isize = STRIDE_X;
pub const OFFSET_FRONT: isize = -STRIDE_Z;
pub const OFFSET_BACK: isize = STRIDE_Z;
pub const OFFSET_BOTTOM: isize = -STRIDE_Y;
pub const OFFSET_TOP: isize = STRIDE_Y;

pub const FACE_COUNT: usize = 6;
/// One draw flag per (block, face).
pub const FLAG_COUNT: usize = SECTION_VOLUME * FACE_COUNT;

/// Non-indexed triangle list: two triangles per quad.
pub const VERTICES_PER_QUAD: usize = 6;

pub(crate) const OPAQUE_ALPHA: u8 = 255;
