use crate::shaders;
use bytemuck::{Pod, Zeroable};
use flyline_render::{FillMode, FramePlan, GEOMETRY_COLOR, SquareDraw};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Vertex {
    position: [f32; 3],
}

fn to_vertices(points: &[Vec3]) -> Vec<Vertex> {
    points
        .iter()
        .map(|p| Vertex {
            position: p.to_array(),
        })
        .collect()
}

fn square_vertices(fill: FillMode) -> Vec<Vertex> {
    to_vertices(
        &SquareDraw {
            fill,
            color: GEOMETRY_COLOR,
        }
        .vertices(),
    )
}

/// A uniform buffer and the bind group that exposes it.
struct UniformSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl UniformSlot {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                color: GEOMETRY_COLOR,
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        Self { buffer, bind_group }
    }

    fn write(&self, queue: &wgpu::Queue, view_proj: Mat4, color: [f32; 4]) {
        queue.write_buffer(
            &self.buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: view_proj.to_cols_array_2d(),
                color,
            }),
        );
    }
}

/// wgpu-based frame renderer.
pub struct WgpuRenderer {
    triangle_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    /// Camera transform, used for the square.
    scene_uniforms: UniformSlot,
    /// Identity transform, used for the NDC line.
    overlay_uniforms: UniformSlot,
    square_solid_buffer: wgpu::Buffer,
    square_solid_count: u32,
    square_wire_buffer: wgpu::Buffer,
    square_wire_count: u32,
    line_buffer: wgpu::Buffer,
}

impl WgpuRenderer {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let scene_uniforms = UniformSlot::new(device, &bind_group_layout, "scene_uniforms");
        let overlay_uniforms = UniformSlot::new(device, &bind_group_layout, "overlay_uniforms");

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("flat_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::FLAT_SHADER.into()),
        });

        let make_pipeline = |label: &str, topology: wgpu::PrimitiveTopology| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                    }],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: surface_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    // The square is visible from both sides.
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: Default::default(),
                multiview: None,
                cache: None,
            })
        };

        let triangle_pipeline =
            make_pipeline("triangle_pipeline", wgpu::PrimitiveTopology::TriangleList);
        let line_pipeline = make_pipeline("line_pipeline", wgpu::PrimitiveTopology::LineList);

        let solid = square_vertices(FillMode::Solid);
        let square_solid_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("square_solid_buffer"),
            contents: bytemuck::cast_slice(&solid),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let wire = square_vertices(FillMode::Wireframe);
        let square_wire_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("square_wire_buffer"),
            contents: bytemuck::cast_slice(&wire),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // Refilled each frame a line is drawn.
        let line_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("line_buffer"),
            size: 2 * std::mem::size_of::<Vertex>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        tracing::debug!("renderer ready for {surface_format:?}");

        Self {
            triangle_pipeline,
            line_pipeline,
            scene_uniforms,
            overlay_uniforms,
            square_solid_buffer,
            square_solid_count: solid.len() as u32,
            square_wire_buffer,
            square_wire_count: wire.len() as u32,
            line_buffer,
        }
    }

    /// Render one frame: clear, square, line.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        plan: &FramePlan,
    ) {
        if let Some(square) = &plan.square {
            self.scene_uniforms.write(queue, plan.view_proj, square.color);
        }
        if let Some(line) = &plan.line {
            self.overlay_uniforms.write(queue, Mat4::IDENTITY, line.color);
            queue.write_buffer(
                &self.line_buffer,
                0,
                bytemuck::cast_slice(&to_vertices(&line.points)),
            );
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let [r, g, b, a] = plan.clear_color.map(f64::from);
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            if let Some(square) = &plan.square {
                let (pipeline, buffer, count) = match square.fill {
                    FillMode::Solid => (
                        &self.triangle_pipeline,
                        &self.square_solid_buffer,
                        self.square_solid_count,
                    ),
                    FillMode::Wireframe => (
                        &self.line_pipeline,
                        &self.square_wire_buffer,
                        self.square_wire_count,
                    ),
                };
                pass.set_pipeline(pipeline);
                pass.set_bind_group(0, &self.scene_uniforms.bind_group, &[]);
                pass.set_vertex_buffer(0, buffer.slice(..));
                pass.draw(0..count, 0..1);
            }

            if plan.line.is_some() {
                pass.set_pipeline(&self.line_pipeline);
                pass.set_bind_group(0, &self.overlay_uniforms.bind_group, &[]);
                pass.set_vertex_buffer(0, self.line_buffer.slice(..));
                pass.draw(0..2, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}
