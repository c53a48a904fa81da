use strata_blocks::FaceRole;
use strata_geom::Vec3;

use crate::constants::{
    OFFSET_BACK, OFFSET_BOTTOM, OFFSET_FRONT, OFFSET_LEFT, OFFSET_RIGHT, OFFSET_TOP,
};

/// The six cube directions. The discriminant order is also the traversal
/// order of counting and emission, and the palette order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    /// -X
    Left = 0,
    /// +X
    Right = 1,
    /// -Z
    Front = 2,
    /// +Z
    Back = 3,
    /// -Y
    Bottom = 4,
    /// +Y
    Top = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Left,
        Face::Right,
        Face::Front,
        Face::Back,
        Face::Bottom,
        Face::Top,
    ];

    /// Returns the `[0..6)` index of this face.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns the integer grid delta `(dx,dy,dz)` when stepping out of this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::Left => (-1, 0, 0),
            Face::Right => (1, 0, 0),
            Face::Front => (0, 0, -1),
            Face::Back => (0, 0, 1),
            Face::Bottom => (0, -1, 0),
            Face::Top => (0, 1, 0),
        }
    }

    /// Returns the unit-normal vector for this face.
    #[inline]
    pub fn normal(self) -> Vec3 {
        let (dx, dy, dz) = self.delta();
        Vec3::new(dx as f32, dy as f32, dz as f32)
    }

    /// Index step to the neighbour across this face inside the padded volume.
    #[inline]
    pub const fn padded_offset(self) -> isize {
        match self {
            Face::Left => OFFSET_LEFT,
            Face::Right => OFFSET_RIGHT,
            Face::Front => OFFSET_FRONT,
            Face::Back => OFFSET_BACK,
            Face::Bottom => OFFSET_BOTTOM,
            Face::Top => OFFSET_TOP,
        }
    }

    /// Classifies the face into top/bottom/side role for texture lookup.
    #[inline]
    pub fn role(self) -> FaceRole {
        match self {
            Face::Top => FaceRole::Top,
            Face::Bottom => FaceRole::Bottom,
            _ => FaceRole::Side,
        }
    }

    #[inline]
    pub fn is_side(self) -> bool {
        self.role() == FaceRole::Side
    }
}
