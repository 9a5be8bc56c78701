/// Device and presentation options for the viewer window.
#[derive(Debug, Clone)]
pub struct GpuConfig {
    /// Backends wgpu may pick from.
    pub backends: wgpu::Backends,

    /// The viewer draws one small mesh; the integrated GPU is usually enough.
    pub power_preference: wgpu::PowerPreference,

    /// FIFO paces `tick` to the display refresh.
    pub present_mode: wgpu::PresentMode,

    /// Pick an sRGB swapchain format when one exists. Uploaded images are tagged
    /// sRGB, so an sRGB target shows them at their original brightness.
    pub prefer_srgb: bool,

    /// Frames the presentation engine may queue ahead (a hint).
    pub max_frame_latency: u32,

    /// Limits requested from the device. `max_texture_dimension_2d` also bounds
    /// accepted image sizes.
    pub limits: wgpu::Limits,
}

impl Default for GpuConfig {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::all(),
            power_preference: wgpu::PowerPreference::LowPower,
            present_mode: wgpu::PresentMode::Fifo,
            prefer_srgb: true,
            max_frame_latency: 2,
            limits: wgpu::Limits::default(),
        }
    }
}
