use std::cell::Cell;
use std::rc::Rc;

use bytemuck::{Pod, Zeroable};

use super::bind;
use super::{FrameTarget, RenderCtx};

/// Shared loading state written by a progress sink and read by [`ProgressOverlay`].
///
/// Cloning yields another handle to the same state.
#[derive(Debug, Clone, Default)]
pub struct OverlayHandle {
    progress: Rc<Cell<Option<u8>>>,
}

impl OverlayHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a progress report. 100 completes the load and hides the overlay.
    pub fn set_progress(&self, percent: u8) {
        self.progress.set((percent < 100).then_some(percent));
    }

    pub fn hide(&self) {
        self.progress.set(None);
    }

    /// Progress to display, or `None` when the overlay is hidden.
    pub fn visible_progress(&self) -> Option<u8> {
        self.progress.get()
    }
}

/// Overlay colors (linear, premultiplied alpha).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OverlayStyle {
    pub backdrop: [f32; 4],
    pub track: [f32; 4],
    pub fill: [f32; 4],
    /// Bar width as a fraction of the surface width.
    pub bar_width: f32,
    /// Bar height in physical pixels.
    pub bar_height: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            backdrop: [0.0, 0.0, 0.0, 0.55],
            track: [0.12, 0.12, 0.12, 0.9],
            fill: [0.25, 0.55, 0.95, 1.0],
            bar_width: 0.5,
            bar_height: 8.0,
        }
    }
}

/// Full-surface backdrop plus a horizontal progress bar, drawn over the scene.
#[derive(Default)]
pub struct ProgressOverlay {
    style: OverlayStyle,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    viewport_ubo: Option<wgpu::Buffer>,

    // Quad corners come from the vertex index; only instances are uploaded.
    instance_vbo: Option<wgpu::Buffer>,
}

impl ProgressOverlay {
    pub fn new(style: OverlayStyle) -> Self {
        Self { style, ..Self::default() }
    }

    /// Draws the overlay for `progress` on top of `target`. Nothing is drawn for `None`.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut FrameTarget<'_>, progress: Option<u8>) {
        let Some(percent) = progress else { return };
        let size = ctx.size();
        if size.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);

        let (w, h) = (size.width as f32, size.height as f32);
        let instances = layout_instances(&self.style, w, h, percent);

        let (Some(pipeline), Some(bind_group), Some(ubo), Some(instance_vbo)) = (
            self.pipeline.as_ref(),
            self.bind_group.as_ref(),
            self.viewport_ubo.as_ref(),
            self.instance_vbo.as_ref(),
        ) else {
            return;
        };

        let viewport = ViewportUniform {
            size: [w, h],
            _pad: [0.0; 2],
        };
        ctx.queue().write_buffer(ubo, 0, bytemuck::bytes_of(&viewport));
        ctx.queue().write_buffer(instance_vbo, 0, bytemuck::cast_slice(&instances));

        let mut rpass = target.pass("progress overlay pass", wgpu::LoadOp::Load);
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, instance_vbo.slice(..));
        rpass.draw(0..6, 0..instances.len() as u32);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.format()) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device().create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("progress overlay shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/overlay.wgsl").into()),
        });

        let bind_group_layout = ctx.device().create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("progress overlay bgl"),
            entries: &[bind::uniform::<ViewportUniform>(0, wgpu::ShaderStages::VERTEX)],
        });

        let pipeline_layout = ctx.device().create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("progress overlay pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = ctx.device().create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("progress overlay pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[OverlayInstance::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.format(),
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.format());
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.viewport_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.viewport_ubo.is_some() && self.instance_vbo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let viewport_ubo = bind::uniform_buffer::<ViewportUniform>(ctx.device(), "progress overlay viewport ubo");

        let bind_group = ctx.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("progress overlay bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: viewport_ubo.as_entire_binding(),
            }],
        });

        self.instance_vbo = Some(ctx.device().create_buffer(&wgpu::BufferDescriptor {
            label: Some("progress overlay instance vbo"),
            size: (INSTANCE_COUNT * std::mem::size_of::<OverlayInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.viewport_ubo = Some(viewport_ubo);
        self.bind_group = Some(bind_group);
    }
}

const INSTANCE_COUNT: usize = 3;

/// Backdrop, bar track, and bar fill in physical pixels.
fn layout_instances(style: &OverlayStyle, w: f32, h: f32, percent: u8) -> [OverlayInstance; INSTANCE_COUNT] {
    let bar_w = (w * style.bar_width).max(1.0);
    let bar_h = style.bar_height.min(h);
    let origin = [(w - bar_w) * 0.5, (h - bar_h) * 0.5];
    let fraction = f32::from(percent.min(100)) / 100.0;

    [
        OverlayInstance {
            origin: [0.0, 0.0],
            size: [w, h],
            color: style.backdrop,
        },
        OverlayInstance {
            origin,
            size: [bar_w, bar_h],
            color: style.track,
        },
        OverlayInstance {
            origin,
            size: [bar_w * fraction, bar_h],
            color: style.fill,
        },
    ]
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct ViewportUniform {
    size: [f32; 2],
    _pad: [f32; 2],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct OverlayInstance {
    origin: [f32; 2],
    size: [f32; 2],
    color: [f32; 4],
}

impl OverlayInstance {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // origin
        1 => Float32x2, // size
        2 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<OverlayInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_hides_at_completion() {
        let handle = OverlayHandle::new();
        assert_eq!(handle.visible_progress(), None);

        handle.set_progress(0);
        assert_eq!(handle.visible_progress(), Some(0));
        handle.set_progress(42);
        assert_eq!(handle.visible_progress(), Some(42));
        handle.set_progress(100);
        assert_eq!(handle.visible_progress(), None);
    }

    #[test]
    fn clones_share_state() {
        let a = OverlayHandle::new();
        let b = a.clone();
        a.set_progress(10);
        assert_eq!(b.visible_progress(), Some(10));
        b.hide();
        assert_eq!(a.visible_progress(), None);
    }

    #[test]
    fn bar_is_centered_and_fill_tracks_progress() {
        let style = OverlayStyle::default();
        let [backdrop, track, fill] = layout_instances(&style, 800.0, 600.0, 25);

        assert_eq!(backdrop.size, [800.0, 600.0]);
        assert_eq!(track.size, [400.0, 8.0]);
        assert_eq!(track.origin, [200.0, 296.0]);
        assert_eq!(fill.origin, track.origin);
        assert_eq!(fill.size, [100.0, 8.0]);
    }

    #[test]
    fn empty_fill_at_zero() {
        let [_, _, fill] = layout_instances(&OverlayStyle::default(), 100.0, 100.0, 0);
        assert_eq!(fill.size[0], 0.0);
    }
}
