use serde::{Deserialize, Serialize};

/// Byte-sized block type; `0` is always air.
pub type BlockId = u8;

pub const AIR: BlockId = 0;

/// Partition of section geometry by blending and draw-order requirements.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderPass {
    Solid = 0,
    Translucent = 1,
    Sprite = 2,
}

impl RenderPass {
    pub const COUNT: usize = 3;
    pub const ALL: [RenderPass; RenderPass::COUNT] =
        [RenderPass::Solid, RenderPass::Translucent, RenderPass::Sprite];

    /// Stable `[0..3)` slot used by per-pass tables.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            RenderPass::Solid => "solid",
            RenderPass::Translucent => "translucent",
            RenderPass::Sprite => "sprite",
        }
    }
}

// Used by cube-like shapes to pick a texture per face
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum FaceRole {
    Top,
    Bottom,
    Side,
}

// Shape abstraction used by the mesher to select emitters
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Cube,
    /// Sits on the cell floor and rises `height` in `(0, 1)`.
    Partial { height: f32 },
    /// Two crossed diagonal planes.
    Sprite,
}
