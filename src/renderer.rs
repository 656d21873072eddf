use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::core::{GpuContext, Viewport};
use crate::environment::EnvironmentMap;
use crate::error::{Result, SceneError};
use crate::geometry::Mesh;
use crate::shading::GlassParams;
use crate::state::SceneState;
use crate::types::{
    BackgroundUniform, CameraUniform, GlassUniform, LightsUniform, LiquidUniform, ObjectUniform,
    Vertex,
};

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Fixed-function state that differs between the three materials
#[derive(Debug, Clone, Copy)]
struct PipelineOptions {
    blend: wgpu::BlendState,
    depth_write: bool,
    /// Winding of visible faces; `None` draws both sides
    front_face: Option<wgpu::FrontFace>,
}

impl PipelineOptions {
    const OPAQUE: Self = Self {
        blend: wgpu::BlendState::REPLACE,
        depth_write: true,
        front_face: None,
    };

    fn transparent(depth_write: bool, mirrored: bool) -> Self {
        Self {
            blend: wgpu::BlendState::ALPHA_BLENDING,
            depth_write,
            // A negative-determinant transform reverses the mesh winding
            front_face: Some(if mirrored {
                wgpu::FrontFace::Cw
            } else {
                wgpu::FrontFace::Ccw
            }),
        }
    }
}

/// First non-sRGB format the surface supports, else its preferred one.
/// Shader output is written as-is, without an sRGB encode.
fn pick_surface_format(formats: &[wgpu::TextureFormat]) -> Result<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first().copied())
        .ok_or(SceneError::NoSurfaceFormat)
}

/// GPU buffers for one scene object
struct MeshDraw {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    object_buffer: wgpu::Buffer,
    material_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl MeshDraw {
    fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        label: &str,
        mesh: &Mesh,
        material: &[u8],
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertices", label)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Indices", label)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let object_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Object", label)),
            contents: bytemuck::cast_slice(&[ObjectUniform::new(glam::Mat4::IDENTITY, 0.0)]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let material_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Material", label)),
            contents: material,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: object_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: material_buffer.as_entire_binding(),
                },
            ],
            label: Some(&format!("{} Bind Group", label)),
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count(),
            object_buffer,
            material_buffer,
            bind_group,
        }
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(1, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Draws the background, the glass backdrop and the liquid sphere, in that order.
pub struct Renderer {
    gpu: GpuContext,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
    camera_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    background_pipeline: wgpu::RenderPipeline,
    glass_pipeline: wgpu::RenderPipeline,
    liquid_pipeline: wgpu::RenderPipeline,
    background: MeshDraw,
    backdrop: Option<MeshDraw>,
    liquid: MeshDraw,
    glass: GlassParams,
    environment_layout: wgpu::BindGroupLayout,
    environment_sampler: wgpu::Sampler,
    environment_bind_group: wgpu::BindGroup,
}

impl Renderer {
    pub async fn new(window: Arc<Window>, state: &SceneState) -> Result<Self> {
        let size = window.inner_size();
        let viewport = Viewport::new(size.width.max(1), size.height.max(1));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;
        let gpu = GpuContext::new_with_surface(&instance, &surface).await?;
        let device = gpu.device();

        let surface_config = Self::create_surface_config(&surface, gpu.adapter(), viewport)?;
        surface.configure(device, &surface_config);
        let depth_view = Self::create_depth_view(device, viewport);

        let scene = state.scene();

        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[state.camera().to_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let lights_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lights Buffer"),
            contents: bytemuck::cast_slice(&[scene.lights.to_uniform()]),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let frame_layout = Self::create_uniform_layout(
            device,
            "frame_bind_group_layout",
            [std::mem::size_of::<CameraUniform>(), std::mem::size_of::<LightsUniform>()],
        );
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
            ],
            label: Some("frame_bind_group"),
        });

        let background_layout = Self::create_uniform_layout(
            device,
            "background_bind_group_layout",
            [std::mem::size_of::<ObjectUniform>(), std::mem::size_of::<BackgroundUniform>()],
        );
        let glass_layout = Self::create_uniform_layout(
            device,
            "glass_bind_group_layout",
            [std::mem::size_of::<ObjectUniform>(), std::mem::size_of::<GlassUniform>()],
        );
        let liquid_layout = Self::create_uniform_layout(
            device,
            "liquid_bind_group_layout",
            [std::mem::size_of::<ObjectUniform>(), std::mem::size_of::<LiquidUniform>()],
        );
        let environment_layout = Self::create_environment_layout(device);

        let format = surface_config.format;
        let mirrored = |transform: &crate::types::Transform| transform.matrix().determinant() < 0.0;
        let background_pipeline = Self::create_pipeline(
            device,
            "Background",
            include_str!("shaders/background.wgsl"),
            &[&frame_layout, &background_layout],
            format,
            PipelineOptions::OPAQUE,
        );
        let glass_pipeline = Self::create_pipeline(
            device,
            "Glass",
            include_str!("shaders/glass.wgsl"),
            &[&frame_layout, &glass_layout, &environment_layout],
            format,
            PipelineOptions::transparent(
                false,
                scene.backdrop.as_ref().is_some_and(|b| mirrored(&b.transform)),
            ),
        );
        let liquid_pipeline = Self::create_pipeline(
            device,
            "Liquid",
            include_str!("shaders/liquid.wgsl"),
            &[&frame_layout, &liquid_layout],
            format,
            PipelineOptions::transparent(true, mirrored(&scene.liquid.transform)),
        );

        let background = MeshDraw::new(
            device,
            &background_layout,
            "Background",
            &scene.background.mesh,
            bytemuck::bytes_of(&BackgroundUniform::from(&scene.background_shading)),
        );
        let backdrop = scene.backdrop.as_ref().map(|backdrop| {
            MeshDraw::new(
                device,
                &glass_layout,
                "Backdrop",
                &backdrop.mesh,
                bytemuck::bytes_of(&GlassUniform::new(&scene.glass, false)),
            )
        });
        let liquid = MeshDraw::new(
            device,
            &liquid_layout,
            "Liquid",
            &scene.liquid.mesh,
            bytemuck::bytes_of(&LiquidUniform::from(&scene.liquid_shading)),
        );

        let environment_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Environment Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let placeholder = EnvironmentMap::solid(glam::Vec3::ZERO);
        let environment_bind_group = Self::create_environment_bind_group(
            &gpu,
            &environment_layout,
            &environment_sampler,
            &placeholder,
        );

        log::info!(
            "Renderer ready: {}x{} {:?}, {} triangles",
            viewport.width,
            viewport.height,
            format,
            scene.triangle_count()
        );

        let mut renderer = Self {
            gpu,
            surface,
            surface_config,
            depth_view,
            camera_buffer,
            frame_bind_group,
            background_pipeline,
            glass_pipeline,
            liquid_pipeline,
            background,
            backdrop,
            liquid,
            glass: scene.glass,
            environment_layout,
            environment_sampler,
            environment_bind_group,
        };

        // The map may already be decoded when the window comes up late
        if let Some(map) = state.environment().map() {
            renderer.upload_environment(map);
        }

        Ok(renderer)
    }

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        viewport: Viewport,
    ) -> Result<wgpu::SurfaceConfiguration> {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = pick_surface_format(&surface_caps.formats)?;

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: viewport.width,
            height: viewport.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    fn create_depth_view(device: &wgpu::Device, viewport: Viewport) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: viewport.width.max(1),
                height: viewport.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Two uniform buffers visible to both stages.
    fn create_uniform_layout(
        device: &wgpu::Device,
        label: &str,
        sizes: [usize; 2],
    ) -> wgpu::BindGroupLayout {
        let entries: Vec<_> = sizes
            .iter()
            .enumerate()
            .map(|(binding, size)| wgpu::BindGroupLayoutEntry {
                binding: binding as u32,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(*size as u64),
                },
                count: None,
            })
            .collect();

        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &entries,
            label: Some(label),
        })
    }

    fn create_environment_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::NonFiltering),
                    count: None,
                },
            ],
            label: Some("environment_bind_group_layout"),
        })
    }

    fn create_environment_bind_group(
        gpu: &GpuContext,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        map: &EnvironmentMap,
    ) -> wgpu::BindGroup {
        let (width, height) = map.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = gpu.device().create_texture(&wgpu::TextureDescriptor {
            label: Some("Environment Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba32Float,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        gpu.queue().write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(map.pixels()),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 16),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        gpu.device().create_bind_group(&wgpu::BindGroupDescriptor {
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
            label: Some("environment_bind_group"),
        })
    }

    fn create_pipeline(
        device: &wgpu::Device,
        label: &str,
        source: &str,
        bind_group_layouts: &[&wgpu::BindGroupLayout],
        format: wgpu::TextureFormat,
        options: PipelineOptions,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&format!("{} Shader", label)),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} Pipeline Layout", label)),
            bind_group_layouts,
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{} Pipeline", label)),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(options.blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: options.front_face.unwrap_or(wgpu::FrontFace::Ccw),
                cull_mode: options.front_face.map(|_| wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: options.depth_write,
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
        })
    }

    /// Bind a decoded environment map for the glass reflections.
    pub fn upload_environment(&mut self, map: &EnvironmentMap) {
        self.environment_bind_group = Self::create_environment_bind_group(
            &self.gpu,
            &self.environment_layout,
            &self.environment_sampler,
            map,
        );

        if let Some(backdrop) = &self.backdrop {
            self.gpu.queue().write_buffer(
                &backdrop.material_buffer,
                0,
                bytemuck::bytes_of(&GlassUniform::new(&self.glass, true)),
            );
        }

        let (width, height) = map.dimensions();
        log::info!("Environment texture uploaded ({}x{})", width, height);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if Viewport::new(width, height).is_empty() {
            return;
        }

        self.surface_config.width = width;
        self.surface_config.height = height;
        self.reconfigure();
    }

    /// Reapply the current surface configuration, e.g. after the surface was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(self.gpu.device(), &self.surface_config);
        self.depth_view = Self::create_depth_view(
            self.gpu.device(),
            Viewport::new(self.surface_config.width, self.surface_config.height),
        );
    }

    pub fn render(&mut self, state: &SceneState) -> std::result::Result<(), wgpu::SurfaceError> {
        let queue = self.gpu.queue();
        let scene = state.scene();

        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[state.camera().to_uniform()]),
        );
        queue.write_buffer(
            &self.background.object_buffer,
            0,
            bytemuck::cast_slice(&[ObjectUniform::new(
                scene.background.transform.matrix(),
                state.driver().background_time(),
            )]),
        );
        if let (Some(draw), Some(object)) = (&self.backdrop, &scene.backdrop) {
            queue.write_buffer(
                &draw.object_buffer,
                0,
                bytemuck::cast_slice(&[ObjectUniform::new(object.transform.matrix(), 0.0)]),
            );
        }
        queue.write_buffer(
            &self.liquid.object_buffer,
            0,
            bytemuck::cast_slice(&[ObjectUniform::new(
                state.liquid_model(),
                state.driver().liquid_time(),
            )]),
        );

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

            render_pass.set_pipeline(&self.background_pipeline);
            self.background.draw(&mut render_pass);

            if let Some(backdrop) = &self.backdrop {
                render_pass.set_pipeline(&self.glass_pipeline);
                render_pass.set_bind_group(2, &self.environment_bind_group, &[]);
                backdrop.draw(&mut render_pass);
            }

            render_pass.set_pipeline(&self.liquid_pipeline);
            self.liquid.draw(&mut render_pass);
        }

        queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}
