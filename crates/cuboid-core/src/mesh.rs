use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Mat4, Quat};

use crate::geometry::CuboidGeometry;
use crate::material::Material;

/// Pitch clamp for user-driven rotation (just under 90°).
const MAX_PITCH: f32 = FRAC_PI_2 * (85.0 / 90.0);

/// Mesh orientation in radians.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Orientation {
    /// Rotation around +Y, wrapped to `[0, TAU)`.
    pub yaw: f32,
    /// Rotation around +X, clamped to ±85°.
    pub pitch: f32,
}

impl Orientation {
    pub fn rotate(&mut self, dyaw: f32, dpitch: f32) {
        self.yaw = (self.yaw + dyaw).rem_euclid(TAU);
        self.pitch = (self.pitch + dpitch).clamp(-MAX_PITCH, MAX_PITCH);
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_quat(Quat::from_rotation_x(self.pitch) * Quat::from_rotation_y(self.yaw))
    }
}

/// The single renderable object of a scene.
///
/// Geometry is fixed at construction. The material is replaced wholesale; the
/// mesh itself (and its orientation) survives every image change.
pub struct CuboidMesh<T> {
    geometry: CuboidGeometry,
    material: Material<T>,
    material_generation: u64,
    orientation: Orientation,
}

impl<T> CuboidMesh<T> {
    /// Builds the mesh with its initial (neutral) material.
    pub fn new(geometry: CuboidGeometry, neutral_color: [f32; 4]) -> Self {
        Self {
            geometry,
            material: Material::neutral(neutral_color),
            material_generation: 0,
            orientation: Orientation::default(),
        }
    }

    pub fn geometry(&self) -> &CuboidGeometry {
        &self.geometry
    }

    pub fn material(&self) -> &Material<T> {
        &self.material
    }

    /// Incremented on every material swap. Backends key bind groups on it.
    pub fn material_generation(&self) -> u64 {
        self.material_generation
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn orientation_mut(&mut self) -> &mut Orientation {
        &mut self.orientation
    }

    /// Swaps the visual content of the material and returns the previous one.
    ///
    /// Geometry and orientation are untouched.
    pub fn replace_material_surface(&mut self, material: Material<T>) -> Material<T> {
        self.material_generation = self.material_generation.wrapping_add(1);
        std::mem::replace(&mut self.material, material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Dimensions;

    #[test]
    fn replace_keeps_geometry_and_orientation() {
        let mut mesh: CuboidMesh<u32> =
            CuboidMesh::new(CuboidGeometry::new(Dimensions::default()), [0.5; 4]);
        mesh.orientation_mut().rotate(1.0, 0.25);
        let before = mesh.orientation();
        let geometry = mesh.geometry().clone();

        let old = mesh.replace_material_surface(Material::textured(7, 64, 32));

        assert!(!old.is_textured());
        assert_eq!(mesh.material().texture(), Some(&7));
        assert_eq!(mesh.material_generation(), 1);
        assert_eq!(mesh.orientation(), before);
        assert_eq!(mesh.geometry(), &geometry);
    }

    #[test]
    fn pitch_is_clamped_and_yaw_wraps() {
        let mut o = Orientation::default();
        o.rotate(TAU + 0.5, 10.0);
        assert!((o.yaw - 0.5).abs() < 1e-5);
        assert!((o.pitch - MAX_PITCH).abs() < 1e-6);

        o.rotate(-1.0, -20.0);
        assert!(o.yaw >= 0.0 && o.yaw < TAU);
        assert!((o.pitch + MAX_PITCH).abs() < 1e-6);
    }
}
