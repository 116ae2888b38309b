//! Full-screen quad renderer for the shader demos
//!
//! One pipeline per [`ShaderProgram`], all sharing a bind group layout:
//! the quad uniforms, two texture slots and a linear sampler. Programs that
//! don't sample textures still get the transparent placeholders bound.

use egui_wgpu::wgpu::{self, util::DeviceExt};
use std::sync::Arc;

use super::{UploadKey, UploadTracker};
use crate::assets::TextureImage;
use crate::core::QuadUniforms;
use crate::demos::ShaderProgram;

const COMMON: &str = include_str!("shaders/quad_common.wgsl");

fn program_source(program: ShaderProgram) -> &'static str {
    match program {
        ShaderProgram::Circle => include_str!("shaders/circle.wgsl"),
        ShaderProgram::Raymarch => include_str!("shaders/raymarch.wgsl"),
        ShaderProgram::Smoke => include_str!("shaders/smoke.wgsl"),
        ShaderProgram::Tiles => include_str!("shaders/tiles.wgsl"),
        ShaderProgram::BoxReveal => include_str!("shaders/box_reveal.wgsl"),
    }
}

fn program_label(program: ShaderProgram) -> &'static str {
    match program {
        ShaderProgram::Circle => "quad_circle",
        ShaderProgram::Raymarch => "quad_raymarch",
        ShaderProgram::Smoke => "quad_smoke",
        ShaderProgram::Tiles => "quad_tiles",
        ShaderProgram::BoxReveal => "quad_box_reveal",
    }
}

pub struct QuadRenderer {
    pipelines: Vec<(ShaderProgram, wgpu::RenderPipeline)>,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    uniform_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    tracker: UploadTracker,
}

impl QuadRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_format: wgpu::TextureFormat,
    ) -> Self {
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
            label: Some("quad_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
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
            label: Some("quad_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipelines = ShaderProgram::ALL
            .iter()
            .map(|&program| {
                let label = program_label(program);
                let source = format!("{}\n{}", COMMON, program_source(program));
                let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some(label),
                    source: wgpu::ShaderSource::Wgsl(source.into()),
                });
                let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some(label),
                    layout: Some(&pipeline_layout),
                    vertex: wgpu::VertexState {
                        module: &shader,
                        entry_point: Some("vs_main"),
                        buffers: &[],
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
                    depth_stencil: None,
                    multisample: wgpu::MultisampleState::default(),
                    multiview: None,
                    cache: None,
                });
                (program, pipeline)
            })
            .collect();

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_uniforms"),
            contents: bytemuck::bytes_of(&QuadUniforms::default()),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::UNIFORM,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("quad_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_group = create_bind_group(
            device,
            queue,
            &bind_group_layout,
            &uniform_buffer,
            &sampler,
            &[],
        );

        Self {
            pipelines,
            bind_group_layout,
            bind_group,
            uniform_buffer,
            sampler,
            tracker: UploadTracker::default(),
        }
    }

    /// Upload the mounted demo's textures into slots 0 and 1.
    pub fn set_textures(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        textures: &[TextureImage],
    ) {
        self.bind_group = create_bind_group(
            device,
            queue,
            &self.bind_group_layout,
            &self.uniform_buffer,
            &self.sampler,
            textures,
        );
        tracing::debug!(count = textures.len(), "quad textures uploaded");
    }

    fn pipeline(&self, program: ShaderProgram) -> Option<&wgpu::RenderPipeline> {
        self.pipelines
            .iter()
            .find(|(p, _)| *p == program)
            .map(|(_, pipeline)| pipeline)
    }
}

pub(super) fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    label: &str,
    image: &TextureImage,
) -> wgpu::TextureView {
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: image.width,
                height: image.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            // Unorm keeps GPU sampling in line with the CPU painter
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        &image.rgba,
    );
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_bind_group(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    uniform_buffer: &wgpu::Buffer,
    sampler: &wgpu::Sampler,
    textures: &[TextureImage],
) -> wgpu::BindGroup {
    let blank = TextureImage::transparent();
    let left = upload_texture(device, queue, "quad_texture_l", textures.first().unwrap_or(&blank));
    let right = upload_texture(device, queue, "quad_texture_r", textures.get(1).unwrap_or(&blank));

    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("quad_bind_group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&left),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&right),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

/// Per-frame draw request for the active shader demo.
pub struct QuadCallback {
    pub program: ShaderProgram,
    pub uniforms: QuadUniforms,
    pub epoch: u64,
    pub textures: Arc<Vec<TextureImage>>,
}

impl egui_wgpu::CallbackTrait for QuadCallback {
    fn prepare(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        _screen_descriptor: &egui_wgpu::ScreenDescriptor,
        _encoder: &mut wgpu::CommandEncoder,
        callback_resources: &mut egui_wgpu::CallbackResources,
    ) -> Vec<wgpu::CommandBuffer> {
        let Some(renderer) = callback_resources.get_mut::<QuadRenderer>() else {
            return vec![];
        };

        // Textures belong to a mount; generation is unused for quads
        let key = UploadKey {
            epoch: self.epoch,
            generation: 0,
        };
        if renderer.tracker.is_stale(key) {
            renderer.set_textures(device, queue, &self.textures);
            renderer.tracker.record(key);
        }
        queue.write_buffer(&renderer.uniform_buffer, 0, bytemuck::bytes_of(&self.uniforms));
        vec![]
    }

    fn paint(
        &self,
        _info: egui::PaintCallbackInfo,
        render_pass: &mut wgpu::RenderPass<'static>,
        callback_resources: &egui_wgpu::CallbackResources,
    ) {
        let Some(renderer) = callback_resources.get::<QuadRenderer>() else {
            return;
        };
        let Some(pipeline) = renderer.pipeline(self.program) else {
            return;
        };

        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, &renderer.bind_group, &[]);
        render_pass.draw(0..3, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_program_has_a_source() {
        for &program in ShaderProgram::ALL {
            let source = program_source(program);
            assert!(source.contains("fn fs_main"), "{program:?}");
            assert!(!source.contains("fn vs_main"), "{program:?} reuses the shared vertex stage");
        }
        assert!(COMMON.contains("fn vs_main"));
    }

    #[test]
    fn test_uniform_block_matches_wgsl() {
        assert_eq!(std::mem::size_of::<QuadUniforms>(), 64);
        assert!(COMMON.contains("resolution: vec2<f32>"));
        assert!(COMMON.contains("params1: vec4<f32>"));
    }
}
