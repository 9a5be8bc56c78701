use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Direction *towards* the light, world space.
pub const LIGHT_DIRECTION: [f32; 3] = [-0.4, 0.8, 0.6];

/// Ambient term added to the diffuse light.
pub const AMBIENT: f32 = 0.35;

/// Fixed camera looking at the cuboid center.
///
/// Created once per scene. Only the aspect ratio changes (on resize).
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    eye: Vec3,
    fov_y: f32,
    z_near: f32,
    z_far: f32,
    aspect: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig, width: u32, height: u32) -> Self {
        let elevation = config.elevation_deg.to_radians();
        let eye = Vec3::new(0.0, elevation.sin(), elevation.cos()) * config.distance;

        let mut camera = Self {
            eye,
            fov_y: config.fov_y_deg.to_radians(),
            z_near: config.z_near,
            z_far: config.z_far,
            aspect: 1.0,
        };
        camera.set_viewport(width, height);
        camera
    }

    /// Recomputes the projection aspect. Zero-sized viewports keep the last aspect.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    pub fn view_proj(&self) -> Mat4 {
        let view = Mat4::look_at_rh(self.eye, Vec3::ZERO, Vec3::Y);
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect, self.z_near, self.z_far);
        proj * view
    }
}

pub fn light_direction() -> Vec3 {
    Vec3::from_array(LIGHT_DIRECTION).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_follows_viewport() {
        let mut cam = Camera::new(&CameraConfig::default(), 800, 400);
        assert_eq!(cam.aspect(), 2.0);

        cam.set_viewport(300, 600);
        assert_eq!(cam.aspect(), 0.5);

        cam.set_viewport(0, 600);
        assert_eq!(cam.aspect(), 0.5);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let cam = Camera::new(&CameraConfig::default(), 640, 480);
        let clip = cam.view_proj() * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn eye_sits_at_configured_distance() {
        let cfg = CameraConfig::default();
        let cam = Camera::new(&cfg, 1, 1);
        assert!((cam.eye().length() - cfg.distance).abs() < 1e-4);
        assert!(cam.eye().y > 0.0);
    }
}
