use strata_blocks::{BlockId, BlockRegistry, BlockType, RenderPass, Shape};

use crate::constants::{OPAQUE_ALPHA, VERTICES_PER_QUAD};
use crate::emit::{emit_box_face, emit_sprite_face};
use crate::face::Face;
use crate::vertex::Vertex;

/// Geometry and visibility rules for one block type.
///
/// `neighbor` is the model of the block across `face`, or `None` for air and
/// undefined ids.
pub trait BlockModel {
    fn render_pass(&self) -> RenderPass;

    /// Whether the shape has geometry in the slot for `face` at all.
    fn has_face(&self, face: Face) -> bool;

    fn face_hidden(&self, face: Face, neighbor: Option<&Self>) -> bool;

    /// Vertices `emit_face` will write for this face. Must agree exactly.
    fn vertex_count(&self, face: Face, neighbor: Option<&Self>) -> usize;

    /// Height in `(0, 1]`.
    fn height(&self) -> f32;

    /// Occupies the whole cell and is opaque on all six faces.
    ///
    /// Sections made only of such blocks (halo included) are skipped without
    /// counting. That shortcut holds only while no solid-pass model exposes a
    /// face to a neighbouring full opaque block; a new shape that interlocks
    /// with cubes must revisit it.
    fn is_full_opaque(&self) -> bool;

    /// Tint for `face`, picked from the builder's palette.
    fn face_tint(&self, face: Face, palette: &FacePalette) -> [u8; 4] {
        palette.for_face(face)
    }

    /// Writes the face's vertices for the block at world `(x, y, z)` into the
    /// front of `out` and returns how many were written.
    fn emit_face(
        &self,
        face: Face,
        x: i32,
        y: i32,
        z: i32,
        neighbor: Option<&Self>,
        tint: [u8; 4],
        out: &mut [Vertex],
    ) -> usize;
}

/// Resolves block ids to models. Air and undefined ids yield `None`.
pub trait ModelRegistry {
    type Model: BlockModel;

    fn model(&self, id: BlockId) -> Option<&Self::Model>;
}

/// Six per-face tints in face order: X sides, Z sides, bottom, top.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FacePalette {
    colors: [[u8; 4]; 6],
}

impl FacePalette {
    pub const SHADE_X: f32 = 0.6;
    pub const SHADE_Z: f32 = 0.8;
    pub const SHADE_BOTTOM: f32 = 0.5;

    pub const fn new(colors: [[u8; 4]; 6]) -> Self {
        Self { colors }
    }

    /// Derives the classic shaded palette from a full-sun colour.
    pub fn from_sun(sun: [u8; 3]) -> Self {
        let shade = |f: f32| -> [u8; 4] {
            let s = |c: u8| (c as f32 * f).round().clamp(0.0, 255.0) as u8;
            [s(sun[0]), s(sun[1]), s(sun[2]), OPAQUE_ALPHA]
        };
        let x = shade(Self::SHADE_X);
        let z = shade(Self::SHADE_Z);
        Self {
            colors: [x, x, z, z, shade(Self::SHADE_BOTTOM), shade(1.0)],
        }
    }

    #[inline]
    pub fn for_face(&self, face: Face) -> [u8; 4] {
        self.colors[face.index()]
    }

    /// Unshaded full-sun tone.
    #[inline]
    pub fn full(&self) -> [u8; 4] {
        self.colors[Face::Top.index()]
    }
}

impl Default for FacePalette {
    fn default() -> Self {
        Self::from_sun([255, 255, 255])
    }
}

impl BlockModel for BlockType {
    #[inline]
    fn render_pass(&self) -> RenderPass {
        self.pass
    }

    #[inline]
    fn has_face(&self, face: Face) -> bool {
        match self.shape {
            Shape::Cube | Shape::Partial { .. } => true,
            Shape::Sprite => face.is_side(),
        }
    }

    fn face_hidden(&self, face: Face, neighbor: Option<&Self>) -> bool {
        if self.shape == Shape::Sprite {
            return false;
        }
        let Some(n) = neighbor else {
            return false;
        };
        if self.cull_same && n.id == self.id && (face.is_side() || self.shape == Shape::Cube) {
            return true;
        }
        if !n.opaque || n.shape == Shape::Sprite {
            return false;
        }
        match face {
            // A partial above rests on its own floor and leaves our gap open,
            // unless we are a cube whose top is that floor
            Face::Top => self.shape == Shape::Cube || n.shape == Shape::Cube,
            // Only a full cube reaches up to our floor
            Face::Bottom => n.shape == Shape::Cube,
            _ => n.height() >= self.height(),
        }
    }

    #[inline]
    fn vertex_count(&self, face: Face, _neighbor: Option<&Self>) -> usize {
        if self.has_face(face) { VERTICES_PER_QUAD } else { 0 }
    }

    #[inline]
    fn height(&self) -> f32 {
        BlockType::height(self)
    }

    #[inline]
    fn is_full_opaque(&self) -> bool {
        BlockType::is_full_opaque(self)
    }

    fn face_tint(&self, face: Face, palette: &FacePalette) -> [u8; 4] {
        match self.shape {
            Shape::Sprite => palette.full(),
            _ => palette.for_face(face),
        }
    }

    fn emit_face(
        &self,
        face: Face,
        x: i32,
        y: i32,
        z: i32,
        _neighbor: Option<&Self>,
        tint: [u8; 4],
        out: &mut [Vertex],
    ) -> usize {
        match self.shape {
            Shape::Sprite => emit_sprite_face(face, x, y, z, self.tex_side, tint, out),
            Shape::Cube | Shape::Partial { .. } => emit_box_face(
                face,
                x,
                y,
                z,
                self.height(),
                self.tex_for(face.role()),
                self.inv_element_v,
                tint,
                out,
            ),
        }
    }
}

impl ModelRegistry for BlockRegistry {
    type Model = BlockType;

    #[inline]
    fn model(&self, id: BlockId) -> Option<&BlockType> {
        self.get(id)
    }
}
