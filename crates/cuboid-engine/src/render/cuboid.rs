use bytemuck::{Pod, Zeroable};
use cuboid_core::SceneFrame;
use cuboid_core::geometry::{CuboidGeometry, Vertex};
use wgpu::util::DeviceExt;

use super::bind;
use super::{FrameTarget, RenderCtx};

/// Uploaded image bound by a textured material.
///
/// Dropping the handle destroys the GPU texture immediately instead of waiting
/// for the last bind group referencing it to go away.
pub struct GpuTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl GpuTexture {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    /// Creates a texture and uploads tightly packed RGBA8 pixels into it.
    pub fn from_rgba8(ctx: &RenderCtx<'_>, width: u32, height: u32, pixels: &[u8], label: &str) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = ctx.device().create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    pub fn width(&self) -> u32 {
        self.texture.width()
    }

    pub fn height(&self) -> u32 {
        self.texture.height()
    }
}

impl Drop for GpuTexture {
    fn drop(&mut self) {
        self.texture.destroy();
    }
}

impl std::fmt::Debug for GpuTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuTexture")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

/// Draws the lit, textured cuboid.
///
/// Group 0 holds the per-frame uniform; group 1 holds the material texture and
/// sampler. The material bind group is rebuilt only when the mesh's material
/// generation changes. Neutral materials sample a 1x1 white texture so one
/// pipeline serves both material kinds.
#[derive(Default)]
pub struct CuboidRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    frame_bgl: Option<wgpu::BindGroupLayout>,
    material_bgl: Option<wgpu::BindGroupLayout>,

    frame_ubo: Option<wgpu::Buffer>,
    frame_bind_group: Option<wgpu::BindGroup>,

    vbo: Option<wgpu::Buffer>,
    ibo: Option<wgpu::Buffer>,
    index_count: u32,

    sampler: Option<wgpu::Sampler>,
    white: Option<GpuTexture>,

    material_bind_group: Option<wgpu::BindGroup>,
    material_generation: Option<u64>,
}

impl CuboidRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears `target` with the frame's clear color and draws the cuboid.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut FrameTarget<'_>,
        frame: &SceneFrame<'_, GpuTexture>,
    ) {
        self.ensure_pipeline(ctx);
        self.ensure_geometry(ctx, frame.mesh.geometry());
        self.ensure_frame_bindings(ctx);
        self.ensure_material(ctx, frame);
        self.write_frame_uniform(ctx, frame);

        let [r, g, b, a] = frame.clear_color.map(f64::from);
        let mut rpass = target.pass("cuboid pass", wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }));

        let (Some(pipeline), Some(frame_bg), Some(material_bg), Some(vbo), Some(ibo)) = (
            self.pipeline.as_ref(),
            self.frame_bind_group.as_ref(),
            self.material_bind_group.as_ref(),
            self.vbo.as_ref(),
            self.ibo.as_ref(),
        ) else {
            return;
        };

        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, frame_bg, &[]);
        rpass.set_bind_group(1, material_bg, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.format()) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device().create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("cuboid shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/cuboid.wgsl").into()),
        });

        let frame_bgl = ctx.device().create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cuboid frame bgl"),
            entries: &[bind::uniform::<FrameUniform>(
                0,
                wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            )],
        });

        let material_bgl = ctx.device().create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("cuboid material bgl"),
            entries: &[bind::texture_2d(0), bind::filtering_sampler(1)],
        });

        let pipeline_layout = ctx.device().create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cuboid pipeline layout"),
            bind_group_layouts: &[&frame_bgl, &material_bgl],
            immediate_size: 0,
        });

        let pipeline = ctx.device().create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("cuboid pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.format(),
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            // Convex mesh: back-face culling alone resolves visibility.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
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
        self.frame_bgl = Some(frame_bgl);
        self.material_bgl = Some(material_bgl);

        // Bind groups were created against the old layouts.
        self.frame_bind_group = None;
        self.frame_ubo = None;
        self.material_bind_group = None;
        self.material_generation = None;
    }

    fn ensure_geometry(&mut self, ctx: &RenderCtx<'_>, geometry: &CuboidGeometry) {
        if self.vbo.is_some() && self.ibo.is_some() {
            return;
        }

        self.vbo = Some(ctx.device().create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cuboid vbo"),
            contents: bytemuck::cast_slice(geometry.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        }));

        self.ibo = Some(ctx.device().create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cuboid ibo"),
            contents: bytemuck::cast_slice(geometry.indices()),
            usage: wgpu::BufferUsages::INDEX,
        }));
        self.index_count = geometry.indices().len() as u32;
    }

    fn ensure_frame_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.frame_bind_group.is_some() && self.frame_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.frame_bgl.as_ref() else { return };

        let ubo = bind::uniform_buffer::<FrameUniform>(ctx.device(), "cuboid frame ubo");

        let bind_group = ctx.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cuboid frame bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        self.frame_ubo = Some(ubo);
        self.frame_bind_group = Some(bind_group);
    }

    fn ensure_material(&mut self, ctx: &RenderCtx<'_>, frame: &SceneFrame<'_, GpuTexture>) {
        let generation = frame.mesh.material_generation();
        if self.material_generation == Some(generation) && self.material_bind_group.is_some() {
            return;
        }

        if self.sampler.is_none() {
            self.sampler = Some(ctx.device().create_sampler(&wgpu::SamplerDescriptor {
                label: Some("cuboid sampler"),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: wgpu::FilterMode::Linear,
                min_filter: wgpu::FilterMode::Linear,
                mipmap_filter: wgpu::MipmapFilterMode::Nearest,
                ..Default::default()
            }));
        }
        if self.white.is_none() {
            self.white = Some(GpuTexture::from_rgba8(ctx, 1, 1, &[255; 4], "cuboid white texture"));
        }

        let (Some(bgl), Some(sampler), Some(white)) =
            (self.material_bgl.as_ref(), self.sampler.as_ref(), self.white.as_ref())
        else {
            return;
        };
        let view = frame.mesh.material().texture().map_or(&white.view, |t| &t.view);

        // Replacing the bind group drops the previous one, releasing its hold on the
        // superseded texture.
        self.material_bind_group = Some(ctx.device().create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("cuboid material bind group"),
            layout: bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        }));
        self.material_generation = Some(generation);
        log::trace!("material bind group rebuilt (generation {generation})");
    }

    fn write_frame_uniform(&self, ctx: &RenderCtx<'_>, frame: &SceneFrame<'_, GpuTexture>) {
        let Some(ubo) = self.frame_ubo.as_ref() else { return };
        let light = frame.light_dir;
        let u = FrameUniform {
            view_proj: frame.view_proj.to_cols_array_2d(),
            model: frame.model.to_cols_array_2d(),
            light: [light.x, light.y, light.z, frame.ambient],
            base_color: frame.mesh.material().base_color(),
        };
        ctx.queue().write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct FrameUniform {
    view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    /// xyz = direction towards the light, w = ambient term.
    light: [f32; 4],
    base_color: [f32; 4],
}

const VERTEX_ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x3, // position
    1 => Float32x3, // normal
    2 => Float32x2  // uv
];

fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_matches_core_vertex() {
        let layout = vertex_layout();
        assert_eq!(layout.array_stride, 32);
        let offsets: Vec<u64> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 12, 24]);
    }

    #[test]
    fn frame_uniform_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<FrameUniform>() % 16, 0);
    }
}
