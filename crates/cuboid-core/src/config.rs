/// Cuboid extents in world units (full width/height/depth, centered at the origin).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self { width: 2.0, height: 1.2, depth: 2.0 }
    }
}

/// Fixed camera rig parameters.
///
/// The camera never moves after construction; only the aspect ratio follows
/// the surface on resize.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraConfig {
    /// Eye distance from the cuboid center.
    pub distance: f32,
    /// Eye elevation above the horizon, in degrees.
    pub elevation_deg: f32,
    /// Vertical field of view, in degrees.
    pub fov_y_deg: f32,
    pub z_near: f32,
    pub z_far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 4.5,
            elevation_deg: 25.0,
            fov_y_deg: 45.0,
            z_near: 0.1,
            z_far: 100.0,
        }
    }
}

/// Texture loader limits.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Largest accepted width or height, in pixels.
    pub max_dimension: u32,

    /// Base64 characters decoded between progress reports.
    ///
    /// Rounded down to a multiple of 4 (minimum 4) so chunk boundaries never
    /// split a base64 quantum.
    pub chunk_chars: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_dimension: 8192,
            chunk_chars: 64 * 1024,
        }
    }
}

impl LoaderConfig {
    pub(crate) fn aligned_chunk(&self) -> usize {
        (self.chunk_chars / 4).max(1) * 4
    }
}

/// Viewer configuration.
///
/// Keep this structure small; every field has a usable default.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub dimensions: Dimensions,

    /// Linear RGBA of the material shown before any image is bound.
    pub neutral_color: [f32; 4],

    /// Linear RGBA the surface is cleared to each frame.
    pub clear_color: [f32; 4],

    pub camera: CameraConfig,

    /// Idle spin around the vertical axis, radians per second.
    pub spin_speed: f32,

    pub loader: LoaderConfig,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            dimensions: Dimensions::default(),
            neutral_color: [0.72, 0.72, 0.74, 1.0],
            clear_color: [0.12, 0.12, 0.12, 1.0],
            camera: CameraConfig::default(),
            spin_speed: 0.35,
            loader: LoaderConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_is_multiple_of_four() {
        let cfg = LoaderConfig { chunk_chars: 10, ..Default::default() };
        assert_eq!(cfg.aligned_chunk(), 8);

        let cfg = LoaderConfig { chunk_chars: 0, ..Default::default() };
        assert_eq!(cfg.aligned_chunk(), 4);

        assert_eq!(LoaderConfig::default().aligned_chunk() % 4, 0);
    }
}
