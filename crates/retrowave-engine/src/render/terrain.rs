use bytemuck::{Pod, Zeroable};

use crate::device::DEPTH_FORMAT;
use crate::paint::Color;
use crate::render::{Camera, PointLight, RenderCtx, RenderTarget};

/// Borrowed view of a CPU-side streamed mesh.
///
/// `positions`, `colors` and `normals` are flat `xyz` arrays of equal length.
/// `generation` changes whenever the contents change; the renderer re-uploads
/// only then.
#[derive(Debug, Copy, Clone)]
pub struct StreamedMesh<'a> {
    pub positions: &'a [f32],
    pub colors: &'a [f32],
    pub normals: &'a [f32],
    pub generation: u64,
}

impl StreamedMesh<'_> {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    fn is_consistent(&self) -> bool {
        self.positions.len() % 3 == 0
            && self.colors.len() == self.positions.len()
            && self.normals.len() == self.positions.len()
    }
}

/// Per-frame scene parameters for the terrain pass.
#[derive(Debug, Copy, Clone)]
pub struct TerrainScene {
    pub camera: Camera,
    pub light: PointLight,
    pub ambient: f32,
    pub line_color: Color,
    pub draw_fill: bool,
    pub draw_lines: bool,
}

impl Default for TerrainScene {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            light: PointLight::default(),
            ambient: 0.5,
            line_color: Color::white(),
            draw_fill: true,
            draw_lines: true,
        }
    }
}

/// Draws a streamed terrain mesh as shaded triangles plus wireframe lines.
///
/// Both pipelines read the same three vertex buffers (position, color, normal);
/// the fill pipeline interprets them as a triangle list, the line pipeline as
/// a line list. GPU buffers are sized on first upload and only rewritten
/// afterwards.
#[derive(Default)]
pub struct TerrainRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    fill_pipeline: Option<wgpu::RenderPipeline>,
    line_pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    scene_ubo: Option<wgpu::Buffer>,

    position_vbo: Option<wgpu::Buffer>,
    color_vbo: Option<wgpu::Buffer>,
    normal_vbo: Option<wgpu::Buffer>,
    vertex_capacity: usize,

    vertex_count: u32,
    uploaded_generation: Option<u64>,
    warned_inconsistent: bool,
}

impl TerrainRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads `mesh` if its generation differs from the one on the GPU.
    ///
    /// Colors are uploaded only when the vertex buffers are (re)created; they are
    /// fixed per row slot and do not change with scrolling.
    pub fn upload(&mut self, ctx: &RenderCtx<'_>, mesh: StreamedMesh<'_>) {
        if !mesh.is_consistent() {
            if !self.warned_inconsistent {
                log::error!(
                    "TerrainRenderer: mesh buffers disagree in length ({} / {} / {}); upload skipped",
                    mesh.positions.len(),
                    mesh.colors.len(),
                    mesh.normals.len()
                );
                self.warned_inconsistent = true;
            }
            return;
        }

        if self.uploaded_generation == Some(mesh.generation) {
            return;
        }

        let created = self.ensure_vertex_buffers(ctx, mesh.vertex_count());

        let (Some(pos), Some(col), Some(nrm)) = (
            self.position_vbo.as_ref(),
            self.color_vbo.as_ref(),
            self.normal_vbo.as_ref(),
        ) else {
            return;
        };

        ctx.queue.write_buffer(pos, 0, bytemuck::cast_slice(mesh.positions));
        ctx.queue.write_buffer(nrm, 0, bytemuck::cast_slice(mesh.normals));
        if created {
            ctx.queue.write_buffer(col, 0, bytemuck::cast_slice(mesh.colors));
        }

        self.vertex_count = mesh.vertex_count() as u32;
        self.uploaded_generation = Some(mesh.generation);
    }

    /// Draws the uploaded mesh into `target`.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, scene: &TerrainScene) {
        if self.vertex_count == 0 {
            return;
        }

        self.ensure_pipelines(ctx);
        self.ensure_bindings(ctx);
        self.write_scene_uniform(ctx, scene);

        let Some(fill) = self.fill_pipeline.as_ref() else { return };
        let Some(lines) = self.line_pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(pos) = self.position_vbo.as_ref() else { return };
        let Some(col) = self.color_vbo.as_ref() else { return };
        let Some(nrm) = self.normal_vbo.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("retrowave terrain pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, pos.slice(..));
        rpass.set_vertex_buffer(1, col.slice(..));
        rpass.set_vertex_buffer(2, nrm.slice(..));

        if scene.draw_fill {
            rpass.set_pipeline(fill);
            rpass.draw(0..self.vertex_count, 0..1);
        }
        if scene.draw_lines {
            rpass.set_pipeline(lines);
            rpass.draw(0..self.vertex_count, 0..1);
        }
    }

    fn ensure_pipelines(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.fill_pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("retrowave terrain shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/terrain.wgsl").into()),
        });

        let bind_group_layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("retrowave terrain bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<SceneUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("retrowave terrain pipeline layout"),
                bind_group_layouts: &[&bind_group_layout],
                immediate_size: 0,
            });

        let fill = create_pipeline(ctx, &shader, &pipeline_layout, PassKind::Fill);
        let lines = create_pipeline(ctx, &shader, &pipeline_layout, PassKind::Lines);

        self.pipeline_format = Some(ctx.surface_format);
        self.fill_pipeline = Some(fill);
        self.line_pipeline = Some(lines);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.scene_ubo = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.scene_ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let scene_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("retrowave terrain scene ubo"),
            size: std::mem::size_of::<SceneUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("retrowave terrain bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_ubo.as_entire_binding(),
            }],
        });

        self.scene_ubo = Some(scene_ubo);
        self.bind_group = Some(bind_group);
    }

    /// Returns `true` when the buffers were (re)created.
    fn ensure_vertex_buffers(&mut self, ctx: &RenderCtx<'_>, vertex_count: usize) -> bool {
        if vertex_count == self.vertex_capacity && self.position_vbo.is_some() {
            return false;
        }

        let size = (vertex_count.max(1) * std::mem::size_of::<[f32; 3]>()) as u64;
        let make = |label: &'static str| {
            ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(label),
                size,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        };

        self.position_vbo = Some(make("retrowave terrain positions"));
        self.color_vbo = Some(make("retrowave terrain colors"));
        self.normal_vbo = Some(make("retrowave terrain normals"));
        self.vertex_capacity = vertex_count;

        log::debug!("TerrainRenderer: allocated vertex buffers for {vertex_count} vertices");
        true
    }

    fn write_scene_uniform(&mut self, ctx: &RenderCtx<'_>, scene: &TerrainScene) {
        let Some(ubo) = self.scene_ubo.as_ref() else { return };
        let u = SceneUniform::new(scene, ctx.viewport.aspect());
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&u));
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum PassKind {
    Fill,
    Lines,
}

fn create_pipeline(
    ctx: &RenderCtx<'_>,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    kind: PassKind,
) -> wgpu::RenderPipeline {
    let (label, entry, topology, bias) = match kind {
        // Push filled faces back slightly so the wireframe wins the depth test.
        PassKind::Fill => (
            "retrowave terrain fill pipeline",
            "fs_fill",
            wgpu::PrimitiveTopology::TriangleList,
            wgpu::DepthBiasState {
                constant: 2,
                slope_scale: 1.0,
                clamp: 0.0,
            },
        ),
        PassKind::Lines => (
            "retrowave terrain line pipeline",
            "fs_line",
            wgpu::PrimitiveTopology::LineList,
            wgpu::DepthBiasState::default(),
        ),
    };

    ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),

        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[
                attribute_layout(&POSITION_ATTRS),
                attribute_layout(&COLOR_ATTRS),
                attribute_layout(&NORMAL_ATTRS),
            ],
        },

        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: ctx.surface_format,
                blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Double-sided: the shader flips normals toward the eye.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias,
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const COLOR_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x3];
const NORMAL_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x3];

fn attribute_layout(attrs: &'static [wgpu::VertexAttribute]) -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: attrs,
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct SceneUniform {
    view_proj: [[f32; 4]; 4],
    eye: [f32; 4],
    light_pos: [f32; 4],  // w = range
    light: [f32; 4],      // x = intensity, y = ambient
    line_color: [f32; 4],
}

impl SceneUniform {
    fn new(scene: &TerrainScene, aspect: f32) -> Self {
        let cam = &scene.camera;
        let light = &scene.light;
        Self {
            view_proj: cam.view_proj(aspect).to_cols_array_2d(),
            eye: cam.eye.extend(1.0).to_array(),
            light_pos: light.position.extend(light.range.max(f32::EPSILON)).to_array(),
            light: [light.intensity, scene.ambient, 0.0, 0.0],
            line_color: scene.line_color.to_array(),
        }
    }
}
