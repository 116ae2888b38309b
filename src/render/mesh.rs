//! Textured mesh renderer
//!
//! Indices and textures are fixed for a mount and uploaded once per epoch.
//! Vertex positions are rewritten whenever the mesh generation moves.

use bytemuck::{Pod, Zeroable};
use egui_wgpu::wgpu::{self, util::DeviceExt};
use std::sync::Arc;

use super::quad::upload_texture;
use super::{UploadKey, UploadTracker};
use crate::assets::TextureImage;
use crate::core::{OrbitCamera, TexturedMesh};

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuMeshVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
    pub layer: u32,
}

/// Interleave the live positions with the fixed uvs and layers.
pub fn pack_mesh(mesh: &TexturedMesh) -> Vec<GpuMeshVertex> {
    mesh.positions()
        .iter()
        .zip(mesh.uvs())
        .zip(mesh.layers())
        .map(|((&position, &uv), &layer)| GpuMeshVertex { position, uv, layer })
        .collect()
}

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshUniforms {
    pub view_proj: [[f32; 4]; 4],
}

impl MeshUniforms {
    pub fn new(camera: &OrbitCamera, aspect: f32) -> Self {
        Self {
            view_proj: camera.view_proj(aspect).to_cols_array_2d(),
        }
    }
}

/// What a mesh keeps for its whole mount.
pub struct MeshStatic {
    pub indices: Vec<u32>,
    pub textures: Vec<TextureImage>,
}

impl MeshStatic {
    pub fn new(mesh: &TexturedMesh, textures: &[TextureImage]) -> Self {
        Self {
            indices: mesh.indices().to_vec(),
            textures: textures.to_vec(),
        }
    }
}

pub struct MeshRenderer {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: Option<wgpu::BindGroup>,
    uniform_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
    tracker: UploadTracker,
}

impl MeshRenderer {
    pub fn new(device: &wgpu::Device, target_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh_shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let texture_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("mesh_bind_group_layout"),
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
                texture_entry(1),
                texture_entry(2),
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mesh_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<GpuMeshVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            offset: 0,
                            shader_location: 0,
                            format: wgpu::VertexFormat::Float32x3, // position
                        },
                        wgpu::VertexAttribute {
                            offset: 12,
                            shader_location: 1,
                            format: wgpu::VertexFormat::Float32x2, // uv
                        },
                        wgpu::VertexAttribute {
                            offset: 20,
                            shader_location: 2,
                            format: wgpu::VertexFormat::Uint32, // layer
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
                // Waving panels show both faces
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_uniforms"),
            contents: bytemuck::bytes_of(&MeshUniforms {
                view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::UNIFORM,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("mesh_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            pipeline,
            bind_group_layout,
            bind_group: None,
            uniform_buffer,
            sampler,
            vertex_buffer: None,
            index_buffer: None,
            index_count: 0,
            tracker: UploadTracker::default(),
        }
    }

    /// Drop everything belonging to the previous mount.
    pub fn reset(&mut self) {
        self.bind_group = None;
        self.vertex_buffer = None;
        self.index_buffer = None;
        self.index_count = 0;
        self.tracker.clear();
    }

    fn mount(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, fixed: &MeshStatic, vertex_count: usize) {
        self.reset();

        let blank = TextureImage::transparent();
        let first = upload_texture(device, queue, "mesh_texture_0", fixed.textures.first().unwrap_or(&blank));
        let second = upload_texture(device, queue, "mesh_texture_1", fixed.textures.get(1).unwrap_or(&blank));
        self.bind_group = Some(device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mesh_bind_group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&first),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&second),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        }));

        self.index_buffer = Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_indices"),
            contents: bytemuck::cast_slice(&fixed.indices),
            usage: wgpu::BufferUsages::INDEX,
        }));
        self.index_count = fixed.indices.len() as u32;

        self.vertex_buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mesh_vertices"),
            size: (vertex_count * std::mem::size_of::<GpuMeshVertex>()) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::VERTEX,
            mapped_at_creation: false,
        }));
        tracing::debug!(
            vertices = vertex_count,
            triangles = fixed.indices.len() / 3,
            "mesh mounted"
        );
    }

    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        key: UploadKey,
        fixed: &MeshStatic,
        vertices: &[GpuMeshVertex],
        uniforms: &MeshUniforms,
    ) {
        if self.tracker.is_new_mount(key) {
            if vertices.is_empty() {
                self.reset();
                return;
            }
            self.mount(device, queue, fixed, vertices.len());
        }

        if self.tracker.is_stale(key) && !vertices.is_empty() {
            if let Some(buffer) = &self.vertex_buffer {
                if buffer.size() >= std::mem::size_of_val(vertices) as u64 {
                    queue.write_buffer(buffer, 0, bytemuck::cast_slice(vertices));
                    self.tracker.record(key);
                } else {
                    tracing::warn!(vertices = vertices.len(), "mesh grew within a mount, skipped");
                }
            }
        }

        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }
}

/// Per-frame draw request for the active mesh demo.
pub struct MeshCallback {
    pub key: UploadKey,
    pub fixed: Arc<MeshStatic>,
    /// Empty when the caller knows the GPU copy is current
    pub vertices: Arc<Vec<GpuMeshVertex>>,
    pub uniforms: MeshUniforms,
}

impl egui_wgpu::CallbackTrait for MeshCallback {
    fn prepare(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        _screen_descriptor: &egui_wgpu::ScreenDescriptor,
        _encoder: &mut wgpu::CommandEncoder,
        callback_resources: &mut egui_wgpu::CallbackResources,
    ) -> Vec<wgpu::CommandBuffer> {
        let Some(renderer) = callback_resources.get_mut::<MeshRenderer>() else {
            return vec![];
        };
        renderer.upload(device, queue, self.key, &self.fixed, &self.vertices, &self.uniforms);
        vec![]
    }

    fn paint(
        &self,
        _info: egui::PaintCallbackInfo,
        render_pass: &mut wgpu::RenderPass<'static>,
        callback_resources: &egui_wgpu::CallbackResources,
    ) {
        let Some(renderer) = callback_resources.get::<MeshRenderer>() else {
            return;
        };
        let (Some(bind_group), Some(vertices), Some(indices)) =
            (&renderer.bind_group, &renderer.vertex_buffer, &renderer.index_buffer)
        else {
            return;
        };
        if renderer.index_count == 0 {
            return;
        }

        render_pass.set_pipeline(&renderer.pipeline);
        render_pass.set_bind_group(0, bind_group, &[]);
        render_pass.set_vertex_buffer(0, vertices.slice(..));
        render_pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..renderer.index_count, 0, 0..1);
    }
}
