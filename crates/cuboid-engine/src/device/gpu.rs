use std::sync::Arc;

use anyhow::{Context, Result};
use cuboid_core::SurfaceSize;
use winit::window::Window;

use super::swapchain::Swapchain;
use super::{Acquired, GpuConfig, GpuFrame};

/// Device, queue, and the window swapchain.
///
/// The surface is created from a shared window handle, so `Gpu` holds no
/// borrow of the window and can be dropped independently of it.
pub struct Gpu {
    // Released before the device.
    swapchain: Swapchain,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl Gpu {
    /// Creates a device able to present to `window` at `size`.
    ///
    /// Adapter/device acquisition is asynchronous under wgpu.
    pub async fn new(window: Arc<Window>, size: SurfaceSize, config: &GpuConfig) -> Result<Self> {
        anyhow::ensure!(!size.is_empty(), "surface has zero size");

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: config.backends,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window)
            .context("failed to create wgpu surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: config.power_preference,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("failed to find a suitable GPU adapter")?;

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("cuboid device"),
                required_features: wgpu::Features::empty(),
                required_limits: config.limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let swapchain = Swapchain::new(surface, &adapter, &device, size, config)?;

        Ok(Self {
            swapchain,
            device,
            queue,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.swapchain.format()
    }

    /// Current drawable size in physical pixels.
    pub fn size(&self) -> SurfaceSize {
        self.swapchain.size()
    }

    /// Largest 2D texture edge the device accepts.
    pub fn max_texture_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    pub fn resize(&mut self, size: SurfaceSize) {
        self.swapchain.resize(&self.device, size);
    }

    /// Acquires the next swapchain image, recovering from outdated surfaces.
    pub fn begin_frame(&mut self) -> Acquired {
        self.swapchain.acquire(&self.device)
    }

    /// Submits the frame's commands and presents it.
    pub fn submit(&self, frame: GpuFrame) {
        let GpuFrame {
            surface_texture,
            view,
            encoder,
        } = frame;
        self.queue.submit(std::iter::once(encoder.finish()));
        drop(view);
        surface_texture.present();
    }
}
