use serde::{Deserialize, Serialize};

use super::CHUNK_SIZE;

/// Section coordinate; the section spans `origin() .. origin() + CHUNK_SIZE` on each axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    /// Section containing the block at world `(x, y, z)`.
    #[inline]
    pub fn containing(x: i32, y: i32, z: i32) -> Self {
        let s = CHUNK_SIZE as i32;
        Self::new(x.div_euclid(s), y.div_euclid(s), z.div_euclid(s))
    }

    /// World-space block origin `(x1, y1, z1)`.
    #[inline]
    pub fn origin(self) -> (i32, i32, i32) {
        let s = CHUNK_SIZE as i32;
        (self.cx * s, self.cy * s, self.cz * s)
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            cz: self.cz + dz,
        }
    }

    /// The six face-adjacent sections.
    pub fn neighbors(self) -> [ChunkCoord; 6] {
        [
            self.offset(-1, 0, 0),
            self.offset(1, 0, 0),
            self.offset(0, 0, -1),
            self.offset(0, 0, 1),
            self.offset(0, -1, 0),
            self.offset(0, 1, 0),
        ]
    }

    #[inline]
    pub fn distance_sq(self, other: ChunkCoord) -> i64 {
        let dx = i64::from(self.cx - other.cx);
        let dy = i64::from(self.cy - other.cy);
        let dz = i64::from(self.cz - other.cz);
        dx * dx + dy * dy + dz * dz
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<ChunkCoord> for (i32, i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cy, value.cz)
    }
}
