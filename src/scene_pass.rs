//! The city render pass: depth-tested, back-face-culled cubes lit by a
//! single point light.
//!
//! Two bind groups, written through `queue.write_buffer`:
//! - **Group 0**: camera uniforms (projection, view, light position), once
//!   per frame.
//! - **Group 1**: model uniforms (model matrix, normal matrix), one aligned
//!   slice per object selected with a dynamic offset, so every object keeps
//!   its own indexed draw call.
//!
//! Each frame calls [`ScenePass::prepare`] with the frame's camera and
//! objects before the render pass opens (uniform uploads and buffer growth
//! happen there), then [`ScenePass::render`] inside the pass to record the
//! draws. The pass owns a depth buffer that tracks the surface size; call
//! [`ScenePass::ensure_depth_size`] before rendering if the window may have
//! resized.

use glam::{Mat4, Vec3};

use crate::gpu::GpuContext;
use crate::mesh::{Mesh, Transform, Vertex};

/// World-space position of the single scene light.
pub const LIGHT_POSITION: Vec3 = Vec3::new(15.0, 15.0, 15.0);

/// Per-frame camera data resolved by the caller: the desktop camera's
/// matrices, or an active VR pose provider's view in place of the camera's.
#[derive(Clone, Copy, Debug)]
pub struct FrameCamera {
    pub projection: Mat4,
    pub view: Mat4,
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniforms {
    proj: [[f32; 4]; 4],
    view: [[f32; 4]; 4],
    light_pos: [f32; 3],
    _pad: f32,
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ModelUniforms {
    model: [[f32; 4]; 4],
    normal: [[f32; 4]; 4],
}

/// Distinct objects' uniform slices are spaced to the uniform-offset
/// alignment floor guaranteed by wgpu's default limits.
const MODEL_STRIDE: u64 = 256;

/// Renders the shared cube mesh once per scene object.
pub struct ScenePass {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    model_bind_group_layout: wgpu::BindGroupLayout,
    model_capacity: usize,
    prepared: usize,
    pub(crate) depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl ScenePass {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("City Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/city.wgsl").into()),
        });

        // Camera uniforms (group 0), written once per frame
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniforms"),
            size: std::mem::size_of::<CameraUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
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

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        // Model uniforms (group 1): one aligned slice per object, selected
        // with a dynamic offset at draw time
        let model_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Model Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<ModelUniforms>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let model_capacity = 16;
        let (model_buffer, model_bind_group) =
            Self::create_model_buffer(gpu, &model_bind_group_layout, model_capacity);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("City Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &model_bind_group_layout],
            push_constant_ranges: &[],
        });

        let depth_view = Self::create_depth_view(gpu);

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("City Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[Vertex::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                front_face: wgpu::FrontFace::Ccw,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            model_buffer,
            model_bind_group,
            model_bind_group_layout,
            model_capacity,
            prepared: 0,
            depth_view,
            depth_size: (gpu.width(), gpu.height()),
        }
    }

    fn create_model_buffer(
        gpu: &GpuContext,
        layout: &wgpu::BindGroupLayout,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Uniforms"),
            size: MODEL_STRIDE * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ModelUniforms>() as u64),
                }),
            }],
        });

        (buffer, bind_group)
    }

    fn create_depth_view(gpu: &GpuContext) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Recreates the depth buffer if the surface size changed.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_view = Self::create_depth_view(gpu);
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    fn ensure_model_capacity(&mut self, gpu: &GpuContext, count: usize) {
        if count > self.model_capacity {
            self.model_capacity = count.next_power_of_two();
            let (buffer, bind_group) =
                Self::create_model_buffer(gpu, &self.model_bind_group_layout, self.model_capacity);
            self.model_buffer = buffer;
            self.model_bind_group = bind_group;
        }
    }

    /// Uploads one frame's uniforms before the render pass opens.
    ///
    /// Camera uniforms are written once; each object's model and normal
    /// matrices go to that object's uniform slice.
    pub fn prepare(&mut self, gpu: &GpuContext, camera: &FrameCamera, objects: &[Transform]) {
        self.ensure_model_capacity(gpu, objects.len());
        self.prepared = objects.len();

        let camera_uniforms = CameraUniforms {
            proj: camera.projection.to_cols_array_2d(),
            view: camera.view.to_cols_array_2d(),
            light_pos: LIGHT_POSITION.to_array(),
            _pad: 0.0,
        };
        gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&camera_uniforms),
        );

        for (i, transform) in objects.iter().enumerate() {
            let model = transform.matrix();
            // Normal matrix: inverse transpose, for the non-uniform scales
            let model_uniforms = ModelUniforms {
                model: model.to_cols_array_2d(),
                normal: model.inverse().transpose().to_cols_array_2d(),
            };
            gpu.queue.write_buffer(
                &self.model_buffer,
                i as u64 * MODEL_STRIDE,
                bytemuck::bytes_of(&model_uniforms),
            );
        }
    }

    /// Records the prepared objects: one indexed draw per object, all
    /// referencing the shared mesh.
    pub fn render(&self, render_pass: &mut wgpu::RenderPass, mesh: &Mesh) {
        if self.prepared == 0 {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        for i in 0..self.prepared {
            let offset = (i as u64 * MODEL_STRIDE) as u32;
            render_pass.set_bind_group(1, &self.model_bind_group, &[offset]);
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}
