//! Instanced point renderer
//!
//! Each point is one instance of a 6-vertex quad expanded in clip space, so
//! sizes stay in world units and shrink with distance. Uploads happen only
//! when the mount epoch or buffer generation moves.

use bytemuck::{Pod, Zeroable};
use egui_wgpu::wgpu::{self, util::DeviceExt};
use std::sync::Arc;

use super::{UploadKey, UploadTracker};
use crate::core::{OrbitCamera, PointBuffer};

const INITIAL_CAPACITY: usize = 16_384;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuPoint {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Interleave the live positions and colors for upload.
pub fn pack_points(buffer: &PointBuffer) -> Vec<GpuPoint> {
    buffer
        .positions()
        .iter()
        .zip(buffer.colors())
        .map(|(&position, &color)| GpuPoint { position, color })
        .collect()
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PointUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// Clip-space half extent of a point at w = 1
    pub billboard: [f32; 2],
    pub _pad: [f32; 2],
}

impl PointUniforms {
    pub fn new(camera: &OrbitCamera, aspect: f32, point_size: f32) -> Self {
        let projection = camera.projection(aspect);
        let view_proj = projection * camera.view();
        let half = point_size * 0.5;
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            billboard: [projection.x_axis.x * half, projection.y_axis.y * half],
            _pad: [0.0; 2],
        }
    }
}

impl Default for PointUniforms {
    fn default() -> Self {
        Self {
            view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            billboard: [0.01, 0.01],
            _pad: [0.0; 2],
        }
    }
}

pub struct PointsRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    capacity: usize,
    count: u32,
    tracker: UploadTracker,
}

impl PointsRenderer {
    pub fn new(device: &wgpu::Device, target_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("points_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/points.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("points_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("points_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("points_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<GpuPoint>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x3, // position
                        },
                        wgpu::VertexAttribute {
                            offset: 12,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x3, // color
                        },
                    ],
                }],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            // egui's pass has no depth attachment; points blend in buffer order
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("points_uniforms"),
            contents: bytemuck::bytes_of(&PointUniforms::default()),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("points_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            pipeline,
            bind_group,
            uniform_buffer,
            instance_buffer: create_instance_buffer(device, INITIAL_CAPACITY),
            capacity: INITIAL_CAPACITY,
            count: 0,
            tracker: UploadTracker::default(),
        }
    }

    /// Forget the uploaded points (the next upload starts from scratch).
    pub fn reset(&mut self) {
        self.count = 0;
        self.tracker.clear();
    }

    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        key: UploadKey,
        points: &[GpuPoint],
        uniforms: &PointUniforms,
    ) {
        if self.tracker.is_new_mount(key) {
            self.reset();
        }

        if self.tracker.is_stale(key) {
            if points.len() > self.capacity {
                self.capacity = points.len().next_power_of_two();
                self.instance_buffer = create_instance_buffer(device, self.capacity);
                tracing::debug!(capacity = self.capacity, "point buffer grown");
            }
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(points));
            self.count = points.len() as u32;
            self.tracker.record(key);
        }

        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    pub fn needs_upload(&self, key: UploadKey) -> bool {
        self.tracker.is_stale(key)
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("points_instances"),
        size: (capacity * std::mem::size_of::<GpuPoint>()) as u64,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::VERTEX,
        mapped_at_creation: false,
    })
}

/// Per-frame draw request for the active point demo.
pub struct PointsCallback {
    pub key: UploadKey,
    /// Empty when the caller knows the GPU copy is current
    pub points: Arc<Vec<GpuPoint>>,
    pub uniforms: PointUniforms,
}

impl egui_wgpu::CallbackTrait for PointsCallback {
    fn prepare(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        _screen_descriptor: &egui_wgpu::ScreenDescriptor,
        _encoder: &mut wgpu::CommandEncoder,
        callback_resources: &mut egui_wgpu::CallbackResources,
    ) -> Vec<wgpu::CommandBuffer> {
        let Some(renderer) = callback_resources.get_mut::<PointsRenderer>() else {
            return vec![];
        };
        if self.points.is_empty() && renderer.needs_upload(self.key) {
            // Nothing to upload for a new key: keep drawing nothing rather than stale points
            renderer.reset();
        } else {
            renderer.upload(device, queue, self.key, &self.points, &self.uniforms);
        }
        vec![]
    }

    fn paint(
        &self,
        _info: egui::PaintCallbackInfo,
        render_pass: &mut wgpu::RenderPass<'static>,
        callback_resources: &egui_wgpu::CallbackResources,
    ) {
        let Some(renderer) = callback_resources.get::<PointsRenderer>() else {
            return;
        };
        if renderer.count == 0 {
            return;
        }

        render_pass.set_pipeline(&renderer.pipeline);
        render_pass.set_bind_group(0, &renderer.bind_group, &[]);
        render_pass.set_vertex_buffer(0, renderer.instance_buffer.slice(..));
        render_pass.draw(0..6, 0..renderer.count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec3, Vec4};

    #[test]
    fn test_gpu_point_layout() {
        assert_eq!(std::mem::size_of::<GpuPoint>(), 24);
        assert_eq!(std::mem::size_of::<PointUniforms>(), 80);
    }

    #[test]
    fn test_pack_interleaves_live_data() {
        let buffer = PointBuffer::from_points(vec![
            ([1.0, 2.0, 3.0], [0.1, 0.2, 0.3]),
            ([4.0, 5.0, 6.0], [0.4, 0.5, 0.6]),
        ]);
        let packed = pack_points(&buffer);
        assert_eq!(packed.len(), 2);
        assert_eq!(packed[1].position, [4.0, 5.0, 6.0]);
        assert_eq!(packed[1].color, [0.4, 0.5, 0.6]);
    }

    #[test]
    fn test_billboard_shrinks_with_fov() {
        let camera = OrbitCamera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let wide = PointUniforms::new(&camera.with_fov_degrees(90.0), 1.0, 0.1);
        let narrow = PointUniforms::new(&camera.with_fov_degrees(30.0), 1.0, 0.1);
        assert!(narrow.billboard[1] > wide.billboard[1]);
        // 90 degrees: focal length 1
        assert!((wide.billboard[1] - 0.05).abs() < 1e-5);

        let vp = Mat4::from_cols_array_2d(&wide.view_proj);
        let clip = vp * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.w - 5.0).abs() < 1e-4);
    }
}
