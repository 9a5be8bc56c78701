//! Backend seams.
//!
//! The viewer owns exactly one `Surface` and, once running, exactly one
//! `RenderContext` created from it. Every GPU resource a context acquires is
//! released when the context (or the texture handle) is dropped.

use glam::{Mat4, Vec3};

use crate::error::{InitializationError, TextureLoadError};
use crate::mesh::CuboidMesh;
use crate::texture::DecodedImage;

/// Drawable size in physical pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Caller-owned drawing target.
pub trait Surface {
    type Context: RenderContext;

    /// Current drawable size. Read on construction and on every `resize`.
    fn size(&self) -> SurfaceSize;

    /// Creates the rendering context bound to this surface.
    fn create_context(&self) -> Result<Self::Context, InitializationError>;
}

/// Result of one repaint.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    Presented,
    /// Transient failure; try again next frame.
    Skipped,
    /// The context cannot render anymore (e.g. device out of memory).
    Fatal,
}

/// Everything a backend needs to repaint one frame.
pub struct SceneFrame<'a, T> {
    pub view_proj: Mat4,
    pub model: Mat4,
    /// Normalized direction towards the light.
    pub light_dir: Vec3,
    pub ambient: f32,
    pub clear_color: [f32; 4],
    pub mesh: &'a CuboidMesh<T>,
}

/// Rendering context owned by a running scene.
pub trait RenderContext {
    /// Texture handle. Dropping it releases the GPU texture.
    type Texture;

    /// Reconfigures output size. Zero sizes must be tolerated.
    fn resize(&mut self, size: SurfaceSize);

    /// Uploads decoded pixels as a texture usable by `render`.
    fn upload_texture(&mut self, image: &DecodedImage) -> Result<Self::Texture, TextureLoadError>;

    /// Repaints the surface.
    fn render(&mut self, frame: &SceneFrame<'_, Self::Texture>) -> FrameOutcome;
}
