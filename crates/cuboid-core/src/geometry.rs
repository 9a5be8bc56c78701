//! Fixed cuboid geometry.
//!
//! Convention:
//! - right-handed, +Y up, centered at the origin
//! - counter-clockwise front faces (backends cull back faces; the cuboid is convex,
//!   so no depth buffer is required)
//! - UV origin top-left, +V down

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::config::Dimensions;

pub const FACE_COUNT: usize = 6;
pub const VERTICES_PER_FACE: usize = 4;
pub const INDICES_PER_FACE: usize = 6;

/// Interleaved vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// One cuboid face, named by its outward normal.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Face {
    Front,
    Right,
    Back,
    Left,
    Top,
    Bottom,
}

impl Face {
    pub const ALL: [Face; FACE_COUNT] = [
        Face::Front,
        Face::Right,
        Face::Back,
        Face::Left,
        Face::Top,
        Face::Bottom,
    ];

    /// (normal, right, up) as seen from outside the cuboid.
    fn basis(self) -> (Vec3, Vec3, Vec3) {
        match self {
            Face::Front => (Vec3::Z, Vec3::X, Vec3::Y),
            Face::Right => (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            Face::Back => (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
            Face::Left => (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            Face::Top => (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            Face::Bottom => (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        }
    }

    /// Quadrant of the 2x2 UV layout sampled by this face.
    ///
    /// Quadrants are numbered row-major from the top-left: 0 1 / 2 3.
    pub fn quadrant(self) -> usize {
        let i = Face::ALL.iter().position(|f| *f == self).unwrap_or(0);
        i % 4
    }
}

/// UV rectangle `(u_min, v_min, u_max, v_max)` of a quadrant.
pub fn quadrant_uv_rect(quadrant: usize) -> [f32; 4] {
    let qx = (quadrant % 2) as f32 * 0.5;
    let qy = ((quadrant / 2) % 2) as f32 * 0.5;
    [qx, qy, qx + 0.5, qy + 0.5]
}

/// CPU-side cuboid mesh data. Built once per scene and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct CuboidGeometry {
    dimensions: Dimensions,
    vertices: Vec<Vertex>,
    indices: Vec<u16>,
}

impl CuboidGeometry {
    pub fn new(dimensions: Dimensions) -> Self {
        let half = Vec3::new(
            dimensions.width.abs() * 0.5,
            dimensions.height.abs() * 0.5,
            dimensions.depth.abs() * 0.5,
        );

        let mut vertices = Vec::with_capacity(FACE_COUNT * VERTICES_PER_FACE);
        let mut indices = Vec::with_capacity(FACE_COUNT * INDICES_PER_FACE);

        for face in Face::ALL {
            let (n, r, u) = face.basis();
            let center = n * n.abs().dot(half);
            let er = r * r.abs().dot(half);
            let eu = u * u.abs().dot(half);

            let [u0, v0, u1, v1] = quadrant_uv_rect(face.quadrant());

            // bottom-left, bottom-right, top-right, top-left (seen from outside)
            let corners = [
                (center - er - eu, [u0, v1]),
                (center + er - eu, [u1, v1]),
                (center + er + eu, [u1, v0]),
                (center - er + eu, [u0, v0]),
            ];

            let base = vertices.len() as u16;
            for (p, uv) in corners {
                vertices.push(Vertex {
                    position: p.to_array(),
                    normal: n.to_array(),
                    uv,
                });
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self { dimensions, vertices, indices }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Number of faces. Always 6.
    pub fn face_count(&self) -> usize {
        self.indices.len() / INDICES_PER_FACE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> CuboidGeometry {
        CuboidGeometry::new(Dimensions { width: 2.0, height: 1.0, depth: 4.0 })
    }

    #[test]
    fn has_six_quads() {
        let g = geometry();
        assert_eq!(g.face_count(), 6);
        assert_eq!(g.vertices().len(), 24);
        assert_eq!(g.indices().len(), 36);
        assert!(g.indices().iter().all(|&i| (i as usize) < g.vertices().len()));
    }

    #[test]
    fn vertices_lie_on_the_box() {
        let g = geometry();
        for v in g.vertices() {
            let [x, y, z] = v.position;
            assert_eq!(x.abs(), 1.0);
            assert_eq!(y.abs(), 0.5);
            assert_eq!(z.abs(), 2.0);
        }
    }

    #[test]
    fn triangles_wind_counter_clockwise_outward() {
        let g = geometry();
        for tri in g.indices().chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| g.vertices()[i as usize]);
            let pa = Vec3::from_array(a.position);
            let pb = Vec3::from_array(b.position);
            let pc = Vec3::from_array(c.position);
            let winding = (pb - pa).cross(pc - pa).normalize();
            assert!(winding.dot(Vec3::from_array(a.normal)) > 0.999);
        }
    }

    #[test]
    fn each_face_samples_one_quadrant() {
        let g = geometry();
        for (face, quad) in Face::ALL.iter().zip(g.vertices().chunks(VERTICES_PER_FACE)) {
            let [u0, v0, u1, v1] = quadrant_uv_rect(face.quadrant());
            for v in quad {
                assert!(v.uv[0] >= u0 && v.uv[0] <= u1);
                assert!(v.uv[1] >= v0 && v.uv[1] <= v1);
            }
        }
    }

    #[test]
    fn side_faces_cover_all_quadrants() {
        let sides: Vec<usize> = Face::ALL[..4].iter().map(|f| f.quadrant()).collect();
        assert_eq!(sides, vec![0, 1, 2, 3]);
        assert_eq!(Face::Top.quadrant(), 0);
        assert_eq!(Face::Bottom.quadrant(), 1);
    }
}
