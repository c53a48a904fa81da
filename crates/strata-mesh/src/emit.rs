use strata_blocks::TexRect;
use strata_geom::Vec3;

use crate::constants::VERTICES_PER_QUAD;
use crate::face::Face;
use crate::vertex::Vertex;

// Unit-cell corners per face, counter-clockwise seen from outside:
// bottom-left, bottom-right, top-right, top-left. Y is scaled by the block height.
const BOX_CORNERS: [[[f32; 3]; 4]; 6] = [
    // Left (-X)
    [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
    // Right (+X)
    [[1.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]],
    // Front (-Z)
    [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
    // Back (+Z)
    [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
    // Bottom (-Y)
    [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
    // Top (+Y)
    [[0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
];

// Crossed sprite planes. Left/Right are the two sides of the (0,0)-(1,1)
// diagonal, Front/Back the two sides of the (1,0)-(0,1) diagonal.
const SPRITE_CORNERS: [[[f32; 3]; 4]; 4] = [
    [[0.0, 0.0, 0.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
    [[1.0, 0.0, 1.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 1.0]],
    [[1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [1.0, 1.0, 0.0]],
    [[0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 1.0]],
];

/// Writes one quad as two triangles `(a,b,c)`, `(a,c,d)`.
#[inline]
fn write_quad(out: &mut [Vertex], corners: [Vec3; 4], uvs: [[f32; 2]; 4], tint: [u8; 4]) -> usize {
    const ORDER: [usize; VERTICES_PER_QUAD] = [0, 1, 2, 0, 2, 3];
    let out = &mut out[..VERTICES_PER_QUAD];
    for (slot, &i) in out.iter_mut().zip(ORDER.iter()) {
        *slot = Vertex::new(corners[i].to_array(), uvs[i], tint);
    }
    VERTICES_PER_QUAD
}

#[inline]
fn corners_at(unit: &[[f32; 3]; 4], origin: Vec3, height: f32) -> [Vec3; 4] {
    unit.map(|c| origin + Vec3::new(c[0], c[1] * height, c[2]))
}

/// Emits one face of a box sitting on the cell floor and `height` tall.
///
/// Side quads shrink to `height` and the V-range top moves down by
/// `(1 - height) * inv_element_v`, so the visible part is the lower texture.
pub(crate) fn emit_box_face(
    face: Face,
    x: i32,
    y: i32,
    z: i32,
    height: f32,
    rect: TexRect,
    inv_element_v: f32,
    tint: [u8; 4],
    out: &mut [Vertex],
) -> usize {
    let origin = Vec3::from_block(x, y, z);
    let corners = corners_at(&BOX_CORNERS[face.index()], origin, height);
    let v0 = if face.is_side() {
        rect.v0 + (1.0 - height) * inv_element_v
    } else {
        rect.v0
    };
    let uvs = [
        [rect.u0, rect.v1],
        [rect.u1, rect.v1],
        [rect.u1, v0],
        [rect.u0, v0],
    ];
    write_quad(out, corners, uvs, tint)
}

/// Emits one side of a sprite plane. Only the four lateral faces exist.
pub(crate) fn emit_sprite_face(
    face: Face,
    x: i32,
    y: i32,
    z: i32,
    rect: TexRect,
    tint: [u8; 4],
    out: &mut [Vertex],
) -> usize {
    if !face.is_side() {
        return 0;
    }
    let origin = Vec3::from_block(x, y, z);
    let corners = corners_at(&SPRITE_CORNERS[face.index()], origin, 1.0);
    let uvs = [
        [rect.u0, rect.v1],
        [rect.u1, rect.v1],
        [rect.u1, rect.v0],
        [rect.u0, rect.v0],
    ];
    write_quad(out, corners, uvs, tint)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri_normal(v: &[Vertex]) -> Vec3 {
        let a = Vec3::from(v[0].pos);
        let b = Vec3::from(v[1].pos);
        let c = Vec3::from(v[2].pos);
        (b - a).cross(c - a)
    }

    #[test]
    fn box_faces_wind_outward() {
        let rect = TexRect { u0: 0.0, v0: 0.0, u1: 1.0, v1: 1.0 };
        for face in Face::ALL {
            let mut out = [Vertex::default(); VERTICES_PER_QUAD];
            let n = emit_box_face(face, 3, 4, 5, 1.0, rect, 1.0, [255; 4], &mut out);
            assert_eq!(n, VERTICES_PER_QUAD);
            assert!(tri_normal(&out[0..3]).dot(face.normal()) > 0.0, "{face:?}");
            assert!(tri_normal(&out[3..6]).dot(face.normal()) > 0.0, "{face:?}");
        }
    }

    #[test]
    fn sprite_has_no_caps() {
        let rect = TexRect::default();
        let mut out = [Vertex::default(); VERTICES_PER_QUAD];
        assert_eq!(emit_sprite_face(Face::Top, 0, 0, 0, rect, [255; 4], &mut out), 0);
        assert_eq!(emit_sprite_face(Face::Bottom, 0, 0, 0, rect, [255; 4], &mut out), 0);
        assert_eq!(
            emit_sprite_face(Face::Back, 0, 0, 0, rect, [255; 4], &mut out),
            VERTICES_PER_QUAD
        );
    }

    #[test]
    #[should_panic]
    fn short_output_panics() {
        let rect = TexRect::default();
        let mut out = [Vertex::default(); 4];
        emit_box_face(Face::Top, 0, 0, 0, 1.0, rect, 1.0, [255; 4], &mut out);
    }
}
