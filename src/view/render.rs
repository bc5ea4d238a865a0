use bytemuck::NoUninit;
use glam::{Mat4, Vec3};
use wgpu::*;

use crate::model::mesh::{Mesh, MeshBuffer, Vertex};

/// Vertex-stage uniform block: world, view and projection kept separate so
/// the shader can light in world space.
#[repr(C)]
#[derive(Debug, Clone, Copy, NoUninit)]
pub struct TransformsUniform {
    pub world: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
}

impl TransformsUniform {
    pub fn new(world: Mat4, view: Mat4, proj: Mat4) -> Self {
        Self {
            world: world.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
        }
    }
}

/// Fragment-stage lighting block. Layout padded to WGSL uniform rules.
#[repr(C)]
#[derive(Debug, Clone, Copy, NoUninit)]
pub struct LightingUniform {
    pub sun_dir: [f32; 3],
    pub sun_intensity: f32,
    pub ambient: f32,
    pub _pad: [f32; 3],
}

impl Default for LightingUniform {
    fn default() -> Self {
        Self {
            sun_dir: Vec3::new(-1.0, -1.0, -0.5).normalize().to_array(),
            sun_intensity: 0.9,
            ambient: 0.15,
            _pad: [0.0; 3],
        }
    }
}

pub struct SceneResources {
    pub transforms_buffer: wgpu::Buffer,
    pub lighting_buffer: wgpu::Buffer,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub scene_bind_group: wgpu::BindGroup,
}

pub struct PipelineResources {
    pub pipeline: wgpu::RenderPipeline,
    pub wireframe_pipeline: Option<wgpu::RenderPipeline>,
}

pub fn create_depth_texture(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let depth_view = depth_texture.create_view(&wgpu::TextureViewDescriptor::default());
    (depth_texture, depth_view)
}

pub fn create_scene_resources(device: &wgpu::Device) -> SceneResources {
    let transforms_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("transforms_buffer"),
        size: std::mem::size_of::<TransformsUniform>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let lighting_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("lighting_buffer"),
        size: std::mem::size_of::<LightingUniform>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("scene_bind_group_layout"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
    });

    let scene_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("scene_bind_group"),
        layout: &bind_group_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: transforms_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: lighting_buffer.as_entire_binding(),
            },
        ],
    });

    SceneResources {
        transforms_buffer,
        lighting_buffer,
        bind_group_layout,
        scene_bind_group,
    }
}

fn sphere_pipeline_descriptor<'a>(
    label: &'a str,
    layout: &'a wgpu::PipelineLayout,
    shader: &'a wgpu::ShaderModule,
    vertex_layout: &'a [wgpu::VertexBufferLayout<'a>],
    targets: &'a [Option<wgpu::ColorTargetState>],
    depth_format: wgpu::TextureFormat,
    polygon_mode: wgpu::PolygonMode,
) -> wgpu::RenderPipelineDescriptor<'a> {
    wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layout,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets,
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: depth_format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
        cache: None,
    }
}

pub fn create_sphere_pipelines(
    device: &wgpu::Device,
    format: wgpu::TextureFormat,
    bind_group_layout: &wgpu::BindGroupLayout,
    depth_format: wgpu::TextureFormat,
) -> PipelineResources {
    let shader_src = include_str!("shaders/sphere.wgsl");
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("sphere_shader"),
        source: wgpu::ShaderSource::Wgsl(shader_src.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pipeline_layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    let vertex_layout = [wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    }];
    let targets = [Some(wgpu::ColorTargetState {
        format,
        blend: Some(wgpu::BlendState::REPLACE),
        write_mask: wgpu::ColorWrites::ALL,
    })];

    let pipeline = device.create_render_pipeline(&sphere_pipeline_descriptor(
        "sphere_pipeline",
        &pipeline_layout,
        &shader,
        &vertex_layout,
        &targets,
        depth_format,
        wgpu::PolygonMode::Fill,
    ));

    let wireframe_pipeline = if device.features().contains(wgpu::Features::POLYGON_MODE_LINE) {
        Some(device.create_render_pipeline(&sphere_pipeline_descriptor(
            "sphere_wireframe_pipeline",
            &pipeline_layout,
            &shader,
            &vertex_layout,
            &targets,
            depth_format,
            wgpu::PolygonMode::Line,
        )))
    } else {
        None
    };

    PipelineResources {
        pipeline,
        wireframe_pipeline,
    }
}

/// Consolidated render state to avoid parameter explosion
pub struct RenderState {
    pub width: u32,
    pub height: u32,

    pub pipeline: RenderPipeline,
    pub wireframe_pipeline: Option<RenderPipeline>,
    pub wireframe_mode: bool,

    pub sphere: Option<MeshBuffer>,

    pub egui_renderer: egui_wgpu::Renderer,
}

/// Background clear color, a dark slate.
pub const CLEAR_COLOR: Color = Color {
    r: 18.0 / 255.0,
    g: 24.0 / 255.0,
    b: 32.0 / 255.0,
    a: 1.0,
};

impl RenderState {
    /// Replace the sphere buffers. The previous buffers are dropped before
    /// the new ones are installed.
    pub fn set_mesh(&mut self, device: &Device, mesh: &Mesh) {
        self.sphere = None;
        self.sphere = Some(mesh.upload(device));
    }

    pub fn draw_frame(
        &mut self,
        device: &Device,
        queue: &Queue,
        surface: &Surface,
        depth_view: &TextureView,
        scene_bg: &BindGroup,
        egui_primitives: &[egui::ClippedPrimitive],
        egui_textures: &egui::TexturesDelta,
        pixels_per_point: f32,
    ) -> Result<(), SurfaceError> {
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.width, self.height],
            pixels_per_point,
        };

        let frame = surface.get_current_texture()?;
        let view = frame.texture.create_view(&TextureViewDescriptor::default());
        let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("encoder"),
        });

        {
            let mut rp = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("render_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(CLEAR_COLOR),
                        store: StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(RenderPassDepthStencilAttachment {
                    view: depth_view,
                    depth_ops: Some(Operations {
                        load: LoadOp::Clear(1.0),
                        store: StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let active_pipeline = if self.wireframe_mode && self.wireframe_pipeline.is_some() {
                self.wireframe_pipeline.as_ref().unwrap()
            } else {
                &self.pipeline
            };

            if let Some(sphere) = &self.sphere {
                rp.set_pipeline(active_pipeline);
                rp.set_bind_group(0, scene_bg, &[]);
                rp.set_vertex_buffer(0, sphere.vertex_buffer.slice(..));
                rp.set_index_buffer(sphere.index_buffer.slice(..), IndexFormat::Uint16);
                rp.draw_indexed(0..sphere.index_count, 0, 0..1);
            }
        }

        for (id, image_delta) in &egui_textures.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer.update_buffers(
            device,
            queue,
            &mut encoder,
            egui_primitives,
            &screen_descriptor,
        );

        {
            let egui_pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("egui_render_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Load,
                        store: StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer.render(
                &mut egui_pass.forget_lifetime(),
                egui_primitives,
                &screen_descriptor,
            );
        }

        for id in &egui_textures.free {
            self.egui_renderer.free_texture(id);
        }

        queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        Ok(())
    }
}
