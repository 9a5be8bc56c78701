use anyhow::{Context, Result};
use cuboid_core::SurfaceSize;

use super::GpuConfig;

/// One acquired swapchain image plus the encoder recording into it.
///
/// Short-lived: holding the surface texture blocks acquisition of the next one.
pub struct GpuFrame {
    pub(crate) surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}

/// Outcome of asking the swapchain for the next image.
pub enum Acquired {
    Frame(GpuFrame),
    /// Nothing to draw into this time (zero-sized, timed out, or just reconfigured).
    Skipped(&'static str),
    /// The swapchain cannot recover; the render loop has to stop.
    Lost,
}

/// Window surface together with its current configuration.
///
/// A zero-sized window cannot be configured, so `size` may run ahead of the
/// configured extent until the next non-empty resize.
pub(crate) struct Swapchain {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    size: SurfaceSize,
}

impl Swapchain {
    pub(crate) fn new(
        surface: wgpu::Surface<'static>,
        adapter: &wgpu::Adapter,
        device: &wgpu::Device,
        size: SurfaceSize,
        options: &GpuConfig,
    ) -> Result<Self> {
        let caps = surface.get_capabilities(adapter);

        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !options.prefer_srgb || f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .context("surface reports no supported formats")?;

        // Opaque output: the viewer always clears to an opaque color.
        let alpha_mode = if caps.alpha_modes.contains(&wgpu::CompositeAlphaMode::Opaque) {
            wgpu::CompositeAlphaMode::Opaque
        } else {
            caps.alpha_modes.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto)
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width,
            height: size.height,
            present_mode: options.present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: options.max_frame_latency,
        };
        surface.configure(device, &config);
        log::debug!("swapchain {format:?} {}x{} ({:?})", size.width, size.height, options.present_mode);

        Ok(Self { surface, config, size })
    }

    pub(crate) fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub(crate) fn size(&self) -> SurfaceSize {
        self.size
    }

    pub(crate) fn resize(&mut self, device: &wgpu::Device, size: SurfaceSize) {
        self.size = size;
        if size.is_empty() {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(device, &self.config);
    }

    pub(crate) fn acquire(&mut self, device: &wgpu::Device) -> Acquired {
        if self.size.is_empty() {
            return Acquired::Skipped("zero-sized surface");
        }

        let surface_texture = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(device, &self.config);
                return Acquired::Skipped("swapchain reconfigured");
            }
            Err(wgpu::SurfaceError::Timeout) => return Acquired::Skipped("acquire timed out"),
            Err(wgpu::SurfaceError::Other) => return Acquired::Skipped("acquire failed"),
            Err(wgpu::SurfaceError::OutOfMemory) => return Acquired::Lost,
        };

        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("cuboid frame encoder"),
        });

        Acquired::Frame(GpuFrame {
            surface_texture,
            view,
            encoder,
        })
    }
}
