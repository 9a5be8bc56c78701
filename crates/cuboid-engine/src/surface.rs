//! wgpu backend for the cuboid viewer.
//!
//! [`WindowSurface`] is the caller-owned drawing target; [`GpuScene`] is the
//! render context the viewer creates from it on `run`.

use std::sync::Arc;

use cuboid_core::{
    DecodedImage, FrameOutcome, InitializationError, RenderContext, SceneFrame, Surface,
    SurfaceSize, TextureLoadError,
};
use winit::window::Window;

use crate::device::{Acquired, Gpu, GpuConfig};
use crate::render::{
    CuboidRenderer, FrameTarget, GpuTexture, OverlayHandle, OverlayStyle, ProgressOverlay, RenderCtx,
};

/// A window handed to the viewer as its drawing surface.
///
/// The loading overlay reads `overlay`; whoever reports progress into the same
/// handle controls what it shows.
pub struct WindowSurface {
    window: Arc<Window>,
    config: GpuConfig,
    overlay: OverlayHandle,
}

impl WindowSurface {
    pub fn new(window: Arc<Window>, config: GpuConfig, overlay: OverlayHandle) -> Self {
        Self { window, config, overlay }
    }
}

impl Surface for WindowSurface {
    type Context = GpuScene;

    fn size(&self) -> SurfaceSize {
        let size = self.window.inner_size();
        SurfaceSize::new(size.width, size.height)
    }

    fn create_context(&self) -> Result<GpuScene, InitializationError> {
        let gpu = pollster::block_on(Gpu::new(Arc::clone(&self.window), self.size(), &self.config))
            .map_err(|e| InitializationError::context_creation(format!("{e:#}")))?;

        Ok(GpuScene {
            cuboid: CuboidRenderer::new(),
            overlay: ProgressOverlay::new(OverlayStyle::default()),
            overlay_state: self.overlay.clone(),
            window: Arc::clone(&self.window),
            gpu,
        })
    }
}

/// Renderers plus the device they draw with.
pub struct GpuScene {
    // Renderer resources are released before the device.
    cuboid: CuboidRenderer,
    overlay: ProgressOverlay,
    overlay_state: OverlayHandle,
    window: Arc<Window>,
    gpu: Gpu,
}

impl RenderContext for GpuScene {
    type Texture = GpuTexture;

    fn resize(&mut self, size: SurfaceSize) {
        self.gpu.resize(size);
    }

    fn upload_texture(&mut self, image: &DecodedImage) -> Result<GpuTexture, TextureLoadError> {
        let (width, height) = (image.width(), image.height());
        let max = self.gpu.max_texture_dimension();
        if width > max || height > max {
            return Err(TextureLoadError::TooLarge { width, height, max });
        }

        let ctx = RenderCtx::new(&self.gpu);
        let texture = GpuTexture::from_rgba8(&ctx, width, height, image.pixels(), "cuboid image");
        log::debug!("uploaded {width}x{height} texture");
        Ok(texture)
    }

    fn render(&mut self, frame: &SceneFrame<'_, GpuTexture>) -> FrameOutcome {
        let mut gpu_frame = match self.gpu.begin_frame() {
            Acquired::Frame(f) => f,
            Acquired::Skipped(reason) => {
                log::trace!("frame skipped: {reason}");
                return FrameOutcome::Skipped;
            }
            Acquired::Lost => {
                log::error!("swapchain lost (out of memory)");
                return FrameOutcome::Fatal;
            }
        };

        {
            let ctx = RenderCtx::new(&self.gpu);
            let mut target = FrameTarget {
                encoder: &mut gpu_frame.encoder,
                view: &gpu_frame.view,
            };
            self.cuboid.render(&ctx, &mut target, frame);
            self.overlay.render(&ctx, &mut target, self.overlay_state.visible_progress());
        }

        self.window.pre_present_notify();
        self.gpu.submit(gpu_frame);
        FrameOutcome::Presented
    }
}

impl Drop for GpuScene {
    fn drop(&mut self) {
        log::debug!("releasing GPU scene");
    }
}
