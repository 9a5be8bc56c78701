use cuboid_core::SurfaceSize;

use crate::device::Gpu;

/// Device access for renderers while recording one frame.
#[derive(Copy, Clone)]
pub struct RenderCtx<'a> {
    gpu: &'a Gpu,
}

impl<'a> RenderCtx<'a> {
    pub fn new(gpu: &'a Gpu) -> Self {
        Self { gpu }
    }

    #[inline]
    pub fn device(&self) -> &'a wgpu::Device {
        self.gpu.device()
    }

    #[inline]
    pub fn queue(&self) -> &'a wgpu::Queue {
        self.gpu.queue()
    }

    /// Swapchain format; pipelines are rebuilt when it changes.
    #[inline]
    pub fn format(&self) -> wgpu::TextureFormat {
        self.gpu.surface_format()
    }

    /// Drawable size in physical pixels.
    #[inline]
    pub fn size(&self) -> SurfaceSize {
        self.gpu.size()
    }
}

/// Color target of the frame being recorded.
pub struct FrameTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub view: &'a wgpu::TextureView,
}

impl FrameTarget<'_> {
    /// Begins a single-attachment pass over the frame.
    pub fn pass(&mut self, label: &str, load: wgpu::LoadOp<wgpu::Color>) -> wgpu::RenderPass<'_> {
        self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}
