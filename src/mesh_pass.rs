//! Instanced 3D mesh rendering with depth testing.
//!
//! [`MeshPass`] owns the pipeline, one [`GpuMesh`] per [`Shape`], the camera
//! uniform and a growable instance buffer. Each frame every visible entity
//! becomes one [`InstanceRaw`], and each shape is drawn with a single
//! instanced `draw_indexed` call.
//!
//! # Bindings
//!
//! - **Group 0**: camera uniforms (view-projection, eye position, light)
//! - **Vertex buffer 0**: [`Vertex3d`] per vertex
//! - **Vertex buffer 1**: [`InstanceRaw`] per instance

use std::collections::HashMap;

use glam::{Mat3, Vec3};

use crate::camera::Camera;
use crate::gpu::GpuContext;
use crate::mesh::{GpuMesh, MeshData, Vertex3d};
use crate::render::{DrawItem, batches};
use crate::scene::Shape;

/// Camera uniforms for 3D rendering.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// Camera position in world space; `w` is unused.
    pub position: [f32; 4],
    /// Light travel direction in `xyz` and the ambient term in `w`.
    pub light: [f32; 4],
}

impl CameraUniforms {
    pub fn new(camera: &Camera, aspect: f32) -> Self {
        let view_proj = camera.projection_matrix(aspect) * camera.view_matrix();
        let light = Vec3::new(-0.4, -1.0, -0.6).normalize();
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            position: camera.position.extend(1.0).to_array(),
            light: light.extend(0.25).to_array(),
        }
    }
}

/// Per-instance data streamed in vertex buffer slot 1.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of the model's upper 3x3, padded to vec4 columns.
    pub normal: [[f32; 4]; 3],
    pub color: [f32; 4],
}

impl InstanceRaw {
    const ATTRIBUTES: [wgpu::VertexAttribute; 8] = wgpu::vertex_attr_array![
        2 => Float32x4, 3 => Float32x4, 4 => Float32x4, 5 => Float32x4,
        6 => Float32x4, 7 => Float32x4, 8 => Float32x4,
        9 => Float32x4,
    ];

    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<InstanceRaw>() as u64,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &Self::ATTRIBUTES,
    };

    pub fn from_item(item: &DrawItem) -> Self {
        let normal = Mat3::from_mat4(item.model).inverse().transpose();
        Self {
            model: item.model.to_cols_array_2d(),
            normal: [
                normal.x_axis.extend(0.0).to_array(),
                normal.y_axis.extend(0.0).to_array(),
                normal.z_axis.extend(0.0).to_array(),
            ],
            color: item.color.to_array(),
        }
    }
}

const INITIAL_INSTANCE_CAPACITY: u64 = 256;

pub struct MeshPass {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    instance_capacity: u64,
    meshes: HashMap<Shape, GpuMesh>,
    pub(crate) depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl MeshPass {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

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

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[Vertex3d::LAYOUT, InstanceRaw::LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                // planes are visible from both sides; the shader flips back-face normals
                cull_mode: None,
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

        let instance_buffer = Self::create_instance_buffer(gpu, INITIAL_INSTANCE_CAPACITY);

        let meshes = Shape::ALL
            .into_iter()
            .map(|shape| {
                let data = MeshData::for_shape(shape);
                (shape, GpuMesh::upload(gpu, &data, &format!("{shape:?} Mesh")))
            })
            .collect();

        Self {
            pipeline,
            camera_buffer,
            camera_bind_group,
            instance_buffer,
            instance_capacity: INITIAL_INSTANCE_CAPACITY,
            meshes,
            depth_view: Self::create_depth_view(gpu),
            depth_size: (gpu.width(), gpu.height()),
        }
    }

    fn create_instance_buffer(gpu: &GpuContext, capacity: u64) -> wgpu::Buffer {
        gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: capacity * std::mem::size_of::<InstanceRaw>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
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

    /// Recreate the depth buffer if the surface size changed.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_view = Self::create_depth_view(gpu);
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    /// Upload camera and instance data for this frame. Grows the instance
    /// buffer to the next power of two when `items` no longer fits.
    pub fn prepare(&mut self, gpu: &GpuContext, camera: &Camera, items: &[DrawItem]) {
        let uniforms = CameraUniforms::new(camera, gpu.aspect());
        gpu.queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&uniforms));

        let needed = items.len() as u64;
        if needed > self.instance_capacity {
            self.instance_capacity = needed.next_power_of_two();
            self.instance_buffer = Self::create_instance_buffer(gpu, self.instance_capacity);
            tracing::debug!(capacity = self.instance_capacity, "grew instance buffer");
        }

        let instances: Vec<InstanceRaw> = items.iter().map(InstanceRaw::from_item).collect();
        gpu.queue
            .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
    }

    /// Issue one instanced draw per shape batch. `items` must be the slice
    /// passed to [`prepare`](Self::prepare) this frame.
    pub fn render(&self, render_pass: &mut wgpu::RenderPass, items: &[DrawItem]) {
        if items.is_empty() {
            return;
        }

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

        for (shape, instances) in batches(items) {
            let Some(mesh) = self.meshes.get(&shape) else {
                continue;
            };
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.index_count, 0, instances);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::transform::Transform;
    use approx::assert_abs_diff_eq;

    #[test]
    fn instance_layout_matches_struct() {
        assert_eq!(InstanceRaw::LAYOUT.array_stride, 128);
        let last = InstanceRaw::ATTRIBUTES[7];
        assert_eq!(last.offset, 112);
        assert_eq!(last.shader_location, 9);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let item = DrawItem {
            shape: Shape::Cube,
            model: Transform::new().scale(Vec3::new(2.0, 1.0, 1.0)).matrix(),
            color: Color::WHITE,
        };
        let raw = InstanceRaw::from_item(&item);
        assert_abs_diff_eq!(raw.normal[0][0], 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(raw.normal[1][1], 1.0, epsilon = 1e-6);
    }
}
