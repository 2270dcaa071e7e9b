use std::collections::{HashMap, HashSet};
use std::ops::Range;
use std::rc::Rc;

use crate::coords::AffineMatrix;
use crate::paint::{Bitmap, PaintError, Rgb24, TextureId};
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::DrawList;

use super::TileConfig;
use super::mesh::TileVertex;
use super::select::{TileCandidate, TileSelection, check_tile_size, classify};
use super::uniforms::{TILE_UNIFORM_SIZE, TileUniforms, align_to, uniform_binding_size};

/// Frame-wide parameters applied to every tile draw.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TileFrame {
    /// Placed in the `translation` uniform; moves geometry, not the tiling grid.
    pub transform: AffineMatrix,
    pub world_alpha: f32,
    pub tint: Rgb24,
}

impl Default for TileFrame {
    fn default() -> Self {
        Self {
            transform: AffineMatrix::IDENTITY,
            world_alpha: 1.0,
            tint: Rgb24::NEUTRAL,
        }
    }
}

/// Per-frame counters returned by [`TileRenderer::render`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct TileStats {
    pub drawn: u32,
    /// Texture still loading.
    pub deferred: u32,
    /// Left to the raster path: not an untransformed repeating texture fill,
    /// or no closed outline.
    pub skipped: u32,
    /// Textures uploaded this frame.
    pub uploads: u32,
}

/// Uploaded texture plus its bind group.
struct GpuTile {
    /// Untinted source the upload was made from.
    source: Rc<Bitmap>,
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

/// Resident textures are per texture and tint.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
struct TileKey {
    texture: TextureId,
    tint: Rgb24,
}

enum Upload {
    Resident,
    Uploaded,
    /// Tinter produced no bitmap, or the pipeline is not ready.
    Pending,
}

struct TileDraw {
    key: TileKey,
    indices: Range<u32>,
    uniform_offset: u32,
}

/// Renderer for repeating texture fills.
///
/// Draws every record whose fill brush is an untransformed, repeating
/// [`TextureBrush`](crate::paint::TextureBrush); everything else belongs to the
/// raster path. Uploads are cached per texture and tint and evicted once a
/// frame stops using them.
#[derive(Default)]
pub struct TileRenderer {
    config: TileConfig,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    uniform_layout: Option<wgpu::BindGroupLayout>,
    texture_layout: Option<wgpu::BindGroupLayout>,
    sampler: Option<wgpu::Sampler>,

    uniform_buffer: Option<wgpu::Buffer>,
    uniform_bind_group: Option<wgpu::BindGroup>,
    uniform_stride: u64,
    uniform_capacity: usize,

    vertex_buffer: Option<wgpu::Buffer>,
    vertex_capacity: usize,
    index_buffer: Option<wgpu::Buffer>,
    index_capacity: usize,

    textures: HashMap<TileKey, GpuTile>,
}

impl TileRenderer {
    pub fn new(config: TileConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[inline]
    pub fn config(&self) -> &TileConfig {
        &self.config
    }

    /// Number of textures currently resident on the GPU.
    #[inline]
    pub fn resident_textures(&self) -> usize {
        self.textures.len()
    }

    /// Draws every selected record into `target`.
    ///
    /// Fails when a texture cannot be uploaded; nothing is drawn in that case.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        draw_list: &mut DrawList,
        frame: &TileFrame,
    ) -> Result<TileStats, PaintError> {
        self.ensure_pipeline(ctx);
        self.ensure_sampler(ctx);

        let mut stats = TileStats::default();
        let mut draws: Vec<TileDraw> = Vec::new();
        let mut uniforms: Vec<TileUniforms> = Vec::new();
        let mut vertices: Vec<TileVertex> = Vec::new();
        let mut indices: Vec<u32> = Vec::new();
        let mut used: HashSet<TileKey> = HashSet::new();

        for item in draw_list.iter_in_paint_order() {
            let candidate = match classify(&item.record, self.config.circle_segments) {
                TileSelection::Draw(candidate) => candidate,
                TileSelection::Deferred => {
                    stats.deferred += 1;
                    continue;
                }
                TileSelection::Skipped => {
                    stats.skipped += 1;
                    continue;
                }
            };

            let key = TileKey {
                texture: candidate.texture.id(),
                tint: frame.tint,
            };
            match self.ensure_texture(ctx, key, &candidate)? {
                Upload::Resident => {}
                Upload::Uploaded => stats.uploads += 1,
                Upload::Pending => {
                    stats.deferred += 1;
                    continue;
                }
            }
            used.insert(key);

            let base = vertices.len() as u32;
            let first = indices.len() as u32;
            vertices.extend_from_slice(&candidate.mesh.vertices);
            indices.extend(candidate.mesh.indices.iter().map(|i| base + i));

            draws.push(TileDraw {
                key,
                indices: first..indices.len() as u32,
                uniform_offset: 0,
            });
            // uploads are already tinted
            uniforms.push(TileUniforms::new(
                &frame.transform,
                ctx.viewport,
                Rgb24::NEUTRAL,
                candidate.alpha * frame.world_alpha,
                candidate.source.width(),
                candidate.source.height(),
            ));
        }

        self.textures.retain(|key, _| used.contains(key));

        if draws.is_empty() {
            return Ok(stats);
        }

        self.ensure_uniform_capacity(ctx, draws.len());
        self.ensure_geometry_capacity(ctx, vertices.len(), indices.len());

        let stride = self.uniform_stride as usize;
        let mut uniform_bytes = vec![0u8; stride * uniforms.len()];
        for (i, (u, draw)) in uniforms.iter().zip(draws.iter_mut()).enumerate() {
            let offset = i * stride;
            uniform_bytes[offset..offset + TILE_UNIFORM_SIZE as usize]
                .copy_from_slice(bytemuck::bytes_of(u));
            draw.uniform_offset = offset as u32;
        }

        let Some(uniform_buffer) = self.uniform_buffer.as_ref() else {
            return Ok(stats);
        };
        let Some(vertex_buffer) = self.vertex_buffer.as_ref() else {
            return Ok(stats);
        };
        let Some(index_buffer) = self.index_buffer.as_ref() else {
            return Ok(stats);
        };
        ctx.queue.write_buffer(uniform_buffer, 0, &uniform_bytes);
        ctx.queue.write_buffer(vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        ctx.queue.write_buffer(index_buffer, 0, bytemuck::cast_slice(&indices));

        let Some(pipeline) = self.pipeline.as_ref() else {
            return Ok(stats);
        };
        let Some(uniform_bind_group) = self.uniform_bind_group.as_ref() else {
            return Ok(stats);
        };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tincture tile pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(0, vertex_buffer.slice(..));
        rpass.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        for draw in &draws {
            let Some(tile) = self.textures.get(&draw.key) else {
                continue;
            };
            rpass.set_bind_group(0, uniform_bind_group, &[draw.uniform_offset]);
            rpass.set_bind_group(1, &tile.bind_group, &[]);
            rpass.draw_indexed(draw.indices.clone(), 0, 0..1);
            stats.drawn += 1;
        }

        Ok(stats)
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.target_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tincture tile shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/tile.wgsl").into()),
        });

        let uniform_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("tincture tile uniform bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: Some(uniform_binding_size()),
                    },
                    count: None,
                }],
            });

        let texture_layout =
            ctx.device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("tincture tile texture bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout =
            ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("tincture tile pipeline layout"),
                bind_group_layouts: &[&uniform_layout, &texture_layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("tincture tile pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[TileVertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.target_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.target_format);
        self.pipeline = Some(pipeline);
        self.uniform_layout = Some(uniform_layout);
        self.texture_layout = Some(texture_layout);
        // Bind groups reference the old layouts.
        self.uniform_buffer = None;
        self.uniform_bind_group = None;
        self.uniform_capacity = 0;
        self.textures.clear();
    }

    fn ensure_sampler(&mut self, ctx: &RenderCtx<'_>) {
        if self.sampler.is_some() {
            return;
        }
        let filter = self.config.filter.to_wgpu();
        self.sampler = Some(ctx.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("tincture tile sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: filter,
            min_filter: filter,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        }));
    }

    /// Uploads the candidate's bitmap for `key.tint` unless the same source is
    /// already resident under `key`.
    fn ensure_texture(
        &mut self,
        ctx: &RenderCtx<'_>,
        key: TileKey,
        candidate: &TileCandidate,
    ) -> Result<Upload, PaintError> {
        if self.textures.get(&key).is_some_and(|t| Rc::ptr_eq(&t.source, &candidate.source)) {
            return Ok(Upload::Resident);
        }
        let (Some(layout), Some(sampler)) = (self.texture_layout.as_ref(), self.sampler.as_ref())
        else {
            return Ok(Upload::Pending);
        };

        let (width, height) = (candidate.source.width(), candidate.source.height());
        check_tile_size(width, height, ctx.device.limits().max_texture_dimension_2d)?;
        let Some(bitmap) = candidate.pixels(key.tint) else {
            return Ok(Upload::Pending);
        };

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("tincture tile texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &bitmap.premultiplied_flipped(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tincture tile texture bind group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        log::debug!(
            "uploaded tile texture {} ({width}x{height}, tint {})",
            key.texture.get(),
            key.tint.to_hex()
        );
        self.textures.insert(
            key,
            GpuTile {
                source: Rc::clone(&candidate.source),
                _texture: texture,
                bind_group,
            },
        );
        Ok(Upload::Uploaded)
    }

    fn ensure_uniform_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.uniform_capacity && self.uniform_buffer.is_some() {
            return;
        }
        let Some(layout) = self.uniform_layout.as_ref() else {
            return;
        };

        let alignment = u64::from(ctx.device.limits().min_uniform_buffer_offset_alignment);
        let stride = align_to(TILE_UNIFORM_SIZE, alignment);
        let new_cap = required.next_power_of_two().max(64);

        let buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tincture tile uniform buffer"),
            size: stride * new_cap as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tincture tile uniform bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: Some(uniform_binding_size()),
                }),
            }],
        });

        self.uniform_stride = stride;
        self.uniform_capacity = new_cap;
        self.uniform_buffer = Some(buffer);
        self.uniform_bind_group = Some(bind_group);
    }

    fn ensure_geometry_capacity(&mut self, ctx: &RenderCtx<'_>, vertices: usize, indices: usize) {
        if vertices > self.vertex_capacity || self.vertex_buffer.is_none() {
            let cap = vertices.next_power_of_two().max(64);
            self.vertex_buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("tincture tile vbo"),
                size: (cap * std::mem::size_of::<TileVertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.vertex_capacity = cap;
        }
        if indices > self.index_capacity || self.index_buffer.is_none() {
            let cap = indices.next_power_of_two().max(64);
            self.index_buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("tincture tile ibo"),
                size: (cap * std::mem::size_of::<u32>()) as u64,
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.index_capacity = cap;
        }
    }
}

fn premul_alpha_blend() -> wgpu::BlendState {
    let component = wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
        operation: wgpu::BlendOperation::Add,
    };
    wgpu::BlendState {
        color: component,
        alpha: component,
    }
}
