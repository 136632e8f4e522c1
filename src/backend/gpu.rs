use std::borrow::Cow;

use rustc_hash::FxHashMap;
use slotmap::SlotMap;
use smol_str::SmolStr;
use wgpu::util::DeviceExt;

use super::{GpuBackend, PipelineCache, PipelineId, UniformRegion, check_frame};
use crate::config::{RuntimeConfig, ShaderDebugFlags};
use crate::error::BackendError;
use crate::geometry::BoxConstants;
use crate::style::{CompiledStyle, StyleIdentity};

/// Fixed vertex stage shared by every style pipeline. Six vertices, two
/// triangles, corners derived from the vertex index.
const QUAD_VERTEX_SHADER: &str = "#version 450
layout(location=0) out vec2 uv;
layout(location=1) out vec2 dim;
layout(set=1, binding=0) uniform BoxConstants { vec2 position; vec2 scale; ivec2 dimensions; } quad;
void main() {
    int i = int(gl_VertexIndex);
    float x = (i == 1 || i == 4 || i == 5) ? 1.0 : 0.0;
    float y = (i == 2 || i == 3 || i == 5) ? 1.0 : 0.0;
    uv = vec2(x, y);
    dim = quad.scale * vec2(quad.dimensions);
    vec2 ndc = quad.position + quad.scale * (uv * 2.0 - vec2(1.0));
    gl_Position = vec4(ndc.x, -ndc.y, 0.0, 1.0);
}
";

const EMPTY_BLOCK: &str = "uniform UBO {  } ubo;";
const PLACEHOLDER_BLOCK: &str = "uniform UBO { vec4 unused_block; } ubo;";

struct StylePipeline {
    pipeline: wgpu::RenderPipeline,
    uniform_layout: wgpu::BindGroupLayout,
    image_count: usize,
}

struct GpuRegion {
    pipeline: PipelineId,
    staging: Vec<Vec<u8>>,
    uniform_buffers: Vec<wgpu::Buffer>,
    box_buffers: Vec<wgpu::Buffer>,
    uniform_groups: Vec<wgpu::BindGroup>,
    box_groups: Vec<wgpu::BindGroup>,
}

struct GpuImage {
    view: wgpu::TextureView,
}

#[derive(Clone, Copy)]
struct RecordedDraw {
    pipeline: PipelineId,
    region: UniformRegion,
    frame: usize,
}

/// Device-backed implementation. Draws are recorded by the element tree and
/// replayed into a render pass by [`WgpuBackend::encode`].
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,
    frames_in_flight: usize,
    shader_debug: ShaderDebugFlags,
    clear_color: wgpu::Color,
    vertex_module: wgpu::ShaderModule,
    box_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    pipelines: PipelineCache<StylePipeline>,
    regions: SlotMap<UniformRegion, GpuRegion>,
    images: FxHashMap<SmolStr, GpuImage>,
    draws: Vec<RecordedDraw>,
}

impl WgpuBackend {
    pub fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        format: wgpu::TextureFormat,
        config: &RuntimeConfig,
    ) -> Result<Self, BackendError> {
        let vertex_ir = parse_glsl(
            "quad.vert",
            QUAD_VERTEX_SHADER,
            naga::ShaderStage::Vertex,
            config.shader_debug,
        )?;
        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Quad Vertex Shader"),
            source: wgpu::ShaderSource::Naga(Cow::Owned(vertex_ir)),
        });

        let box_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Box Constants Layout"),
            entries: &[uniform_entry(0, wgpu::ShaderStages::VERTEX)],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Image Background Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        Ok(Self {
            device,
            queue,
            format,
            frames_in_flight: config.frames_in_flight,
            shader_debug: config.shader_debug,
            clear_color: config.clear_color.to_wgpu_color(),
            vertex_module,
            box_layout,
            sampler,
            pipelines: PipelineCache::new(),
            regions: SlotMap::with_key(),
            images: FxHashMap::default(),
            draws: Vec::new(),
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Registers an already decoded image under `key`, replacing any
    /// previous upload with that key.
    pub fn insert_image(&mut self, key: impl Into<SmolStr>, image: &image::RgbaImage) {
        let key = key.into();
        let gpu = upload_image(&self.device, &self.queue, &key, image);
        self.images.insert(key, gpu);
    }

    fn load_image(&mut self, key: &SmolStr) -> Result<(), BackendError> {
        if self.images.contains_key(key) {
            return Ok(());
        }
        let decoded = image::open(key.as_str()).map_err(|e| BackendError::Image {
            key: key.clone(),
            message: e.to_string(),
        })?;
        let rgba = decoded.to_rgba8();
        log::debug!("loaded image {key} ({}x{})", rgba.width(), rgba.height());
        let gpu = upload_image(&self.device, &self.queue, key, &rgba);
        self.images.insert(key.clone(), gpu);
        Ok(())
    }

    fn create_style_pipeline(
        &self,
        compiled: &CompiledStyle,
    ) -> Result<StylePipeline, BackendError> {
        if self.shader_debug.contains(ShaderDebugFlags::SOURCE) {
            log::debug!(
                "fragment shader for {}:\n{}",
                compiled.identity,
                compiled.fragment_source
            );
        }
        // Empty interface blocks are rejected by the GLSL frontend.
        let source = if compiled.uniform_size == 0 {
            Cow::Owned(compiled.fragment_source.replace(EMPTY_BLOCK, PLACEHOLDER_BLOCK))
        } else {
            Cow::Borrowed(compiled.fragment_source.as_str())
        };
        let fragment_ir = parse_glsl(
            compiled.identity.as_str(),
            &source,
            naga::ShaderStage::Fragment,
            self.shader_debug,
        )?;
        let fragment_module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(compiled.identity.as_str()),
            source: wgpu::ShaderSource::Naga(Cow::Owned(fragment_ir)),
        });

        let mut entries = vec![uniform_entry(0, wgpu::ShaderStages::FRAGMENT)];
        for index in 0..compiled.image_count as u32 {
            let binding = crate::style::shader::FIRST_TEXTURE_BINDING + index * 2;
            entries.push(wgpu::BindGroupLayoutEntry {
                binding,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            });
            entries.push(wgpu::BindGroupLayoutEntry {
                binding: binding + 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            });
        }
        let uniform_layout = self
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Style Uniform Layout"),
                entries: &entries,
            });

        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Style Pipeline Layout"),
                bind_group_layouts: &[Some(&uniform_layout), Some(&self.box_layout)],
                immediate_size: 0,
            });

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(compiled.identity.as_str()),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &self.vertex_module,
                    entry_point: Some("main"),
                    buffers: &[],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &fragment_module,
                    entry_point: Some("main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    ..Default::default()
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview_mask: None,
                cache: None,
            });

        log::debug!("created pipeline for {}", compiled.identity);
        Ok(StylePipeline {
            pipeline,
            uniform_layout,
            image_count: compiled.image_count,
        })
    }

    /// Replays the draws recorded since the last call into one render pass
    /// over `target`, clearing it first when `clear` is set.
    pub fn encode(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        clear: bool,
    ) -> Result<(), BackendError> {
        let draws = std::mem::take(&mut self.draws);
        let load = if clear {
            wgpu::LoadOp::Clear(self.clear_color)
        } else {
            wgpu::LoadOp::Load
        };

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Styled Quads"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
                resolve_target: None,
            })],
            ..Default::default()
        });

        for draw in draws {
            let pipeline = self
                .pipelines
                .get(draw.pipeline)
                .ok_or(BackendError::PipelineMissing)?;
            let region = self
                .regions
                .get(draw.region)
                .ok_or(BackendError::RegionMissing)?;
            pass.set_pipeline(&pipeline.pipeline);
            pass.set_bind_group(0, &region.uniform_groups[draw.frame], &[]);
            pass.set_bind_group(1, &region.box_groups[draw.frame], &[]);
            pass.draw(0..6, 0..1);
        }
        Ok(())
    }
}

impl GpuBackend for WgpuBackend {
    fn frames_in_flight(&self) -> usize {
        self.frames_in_flight
    }

    fn get_or_create_pipeline(
        &mut self,
        identity: &StyleIdentity,
        compile: &dyn Fn() -> CompiledStyle,
    ) -> Result<PipelineId, BackendError> {
        if let Some(id) = self.pipelines.lookup(identity) {
            return Ok(id);
        }
        let pipeline = self.create_style_pipeline(&compile())?;
        self.pipelines
            .get_or_try_insert_with(identity, || Ok(pipeline))
    }

    fn allocate_uniforms(
        &mut self,
        pipeline: PipelineId,
        size: usize,
        images: &[SmolStr],
    ) -> Result<UniformRegion, BackendError> {
        for key in images {
            self.load_image(key)?;
        }
        let entry = self
            .pipelines
            .get(pipeline)
            .ok_or(BackendError::PipelineMissing)?;
        if entry.image_count != images.len() {
            return Err(BackendError::Device(format!(
                "pipeline expects {} images, got {}",
                entry.image_count,
                images.len()
            )));
        }

        let buffer_size = padded_uniform_size(size);
        let mut region = GpuRegion {
            pipeline,
            staging: vec![vec![0; buffer_size]; self.frames_in_flight],
            uniform_buffers: Vec::with_capacity(self.frames_in_flight),
            box_buffers: Vec::with_capacity(self.frames_in_flight),
            uniform_groups: Vec::with_capacity(self.frames_in_flight),
            box_groups: Vec::with_capacity(self.frames_in_flight),
        };

        for _ in 0..self.frames_in_flight {
            let uniform_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Style Uniform Buffer"),
                size: buffer_size as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            let box_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("Box Constants Buffer"),
                size: std::mem::size_of::<BoxConstants>() as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });

            let mut entries = vec![wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }];
            for (index, key) in images.iter().enumerate() {
                let binding = crate::style::shader::FIRST_TEXTURE_BINDING + index as u32 * 2;
                let image = self.images.get(key).ok_or_else(|| BackendError::Image {
                    key: key.clone(),
                    message: "image was not uploaded".to_string(),
                })?;
                entries.push(wgpu::BindGroupEntry {
                    binding,
                    resource: wgpu::BindingResource::TextureView(&image.view),
                });
                entries.push(wgpu::BindGroupEntry {
                    binding: binding + 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                });
            }

            let uniform_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Style Uniform Bind Group"),
                layout: &entry.uniform_layout,
                entries: &entries,
            });
            let box_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Box Constants Bind Group"),
                layout: &self.box_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: box_buffer.as_entire_binding(),
                }],
            });

            region.uniform_buffers.push(uniform_buffer);
            region.box_buffers.push(box_buffer);
            region.uniform_groups.push(uniform_group);
            region.box_groups.push(box_group);
        }

        Ok(self.regions.insert(region))
    }

    fn uniform_slot(
        &mut self,
        region: UniformRegion,
        frame: usize,
    ) -> Result<&mut [u8], BackendError> {
        check_frame(frame, self.frames_in_flight)?;
        let region = self
            .regions
            .get_mut(region)
            .ok_or(BackendError::RegionMissing)?;
        Ok(region.staging[frame].as_mut_slice())
    }

    fn draw_unit_quad(
        &mut self,
        pipeline: PipelineId,
        constants: BoxConstants,
        region: UniformRegion,
        frame: usize,
    ) -> Result<(), BackendError> {
        check_frame(frame, self.frames_in_flight)?;
        let entry = self.regions.get(region).ok_or(BackendError::RegionMissing)?;
        if entry.pipeline != pipeline {
            return Err(BackendError::PipelineMissing);
        }
        self.queue
            .write_buffer(&entry.uniform_buffers[frame], 0, &entry.staging[frame]);
        self.queue.write_buffer(
            &entry.box_buffers[frame],
            0,
            bytemuck::bytes_of(&constants),
        );
        self.draws.push(RecordedDraw {
            pipeline,
            region,
            frame,
        });
        Ok(())
    }
}

/// Uniform buffers are rounded up to 16 bytes and never empty.
pub(crate) fn padded_uniform_size(size: usize) -> usize {
    crate::style::uniform::align_to(size.max(1), 16)
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

pub(crate) fn parse_glsl(
    label: &str,
    source: &str,
    stage: naga::ShaderStage,
    debug: ShaderDebugFlags,
) -> Result<naga::Module, BackendError> {
    let mut frontend = naga::front::glsl::Frontend::default();
    let options = naga::front::glsl::Options::from(stage);
    let module = frontend
        .parse(&options, source)
        .map_err(|e| BackendError::ShaderCompile {
            identity: SmolStr::new(label),
            message: e.to_string(),
        })?;

    if debug.contains(ShaderDebugFlags::VALIDATE) {
        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .map_err(|e| BackendError::ShaderCompile {
            identity: SmolStr::new(label),
            message: e.to_string(),
        })?;
    }
    Ok(module)
}

fn upload_image(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    key: &SmolStr,
    image: &image::RgbaImage,
) -> GpuImage {
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some(key.as_str()),
            size: wgpu::Extent3d {
                width: image.width().max(1),
                height: image.height().max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        image.as_raw(),
    );
    GpuImage {
        view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
    }
}
