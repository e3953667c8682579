//! Per-face vertex tables for unit cubes.
//!
//! Corners are listed counter-clockwise when viewed from outside the cube,
//! so [`crate::mesh::QUAD_INDICES`] produces triangles whose winding agrees
//! with [`Face::normal`].

use strata_voxel::Face;

/// Unit-cube corner offsets per face, indexed by [`Face::index`].
pub const FACE_CORNERS: [[[f32; 3]; 4]; 6] = [
    // +X
    [[1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0], [1.0, 0.0, 1.0]],
    // -X
    [[0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]],
    // +Y
    [[0.0, 1.0, 0.0], [0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0]],
    // -Y
    [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
    // +Z
    [[1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0], [0.0, 0.0, 1.0]],
    // -Z
    [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0], [1.0, 0.0, 0.0]],
];

/// Texture coordinates for a single unit face.
pub const QUAD_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Returns the four corners of `face` for the block at `(x, y, z)`.
#[inline]
#[must_use]
pub fn face_corners(face: Face, x: f32, y: f32, z: f32) -> [[f32; 3]; 4] {
    FACE_CORNERS[face.index()].map(|[cx, cy, cz]| [cx + x, cy + y, cz + z])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    #[test]
    fn test_winding_matches_normal() {
        for face in Face::ALL {
            let [a, b, c, _] = FACE_CORNERS[face.index()];
            let n = cross(sub(b, a), sub(c, a));
            assert_eq!(n, face.normal(), "{face:?}");
        }
    }

    #[test]
    fn test_corners_lie_on_face_plane() {
        for face in Face::ALL {
            let axis = face.axis();
            let plane = if face.is_positive() { 1.0 } else { 0.0 };
            for corner in FACE_CORNERS[face.index()] {
                assert_eq!(corner[axis], plane, "{face:?}");
            }
        }
    }

    #[test]
    fn test_face_corners_translate() {
        let corners = face_corners(Face::PosY, 2.0, 3.0, 4.0);
        assert!(corners.iter().all(|c| c[1] == 4.0));
        assert_eq!(corners[0], [2.0, 4.0, 4.0]);
    }
}
