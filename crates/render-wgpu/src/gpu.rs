use crate::cube::{GpuCube, vertex_layouts};
use crate::error::{RenderError, validated};
use crate::shaders;
use crate::uniforms::FrameUniforms;
use cubeshade_common::Rgba;
use cubeshade_scene::{CubeMesh, CubeRole, FramePlan};

/// Depth buffer with at least 24 bits of precision.
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

/// Surface, device and queue for one window.
///
/// The surface uses a linear (non-sRGB) format when one is offered, so shader
/// output and the clear color reach the screen without gamma encoding.
pub struct GpuContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
}

impl GpuContext {
    /// Create a surface for `target` and a device able to present to it.
    pub fn new(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<Self, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(target)?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(RenderError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("cubeshade_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format =
            linear_surface_format(&surface_caps.formats).ok_or(RenderError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        tracing::info!(
            format = ?surface_format,
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.width = width.max(1);
        self.config.height = height.max(1);
        self.surface.configure(&self.device, &self.config);
    }

    /// Reconfigure after the surface was lost or went stale.
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }
}

/// wgpu renderer for the pulsing and orbiting cubes.
pub struct WgpuRenderer {
    pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    pulsing: GpuCube,
    orbiting: GpuCube,
    depth_texture: wgpu::TextureView,
}

impl WgpuRenderer {
    /// Build the pipeline and upload both cubes.
    ///
    /// Shader and pipeline validation failures are returned, never deferred.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        pulsing_mesh: CubeMesh,
        orbiting_mesh: CubeMesh,
    ) -> Result<Self, RenderError> {
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame_uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_layout = uniform_layout(
            device,
            "frame_bind_group_layout",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
        );
        let object_layout =
            uniform_layout(device, "object_bind_group_layout", wgpu::ShaderStages::VERTEX);

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("cube_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let shader = validated(
            device,
            || {
                device.create_shader_module(wgpu::ShaderModuleDescriptor {
                    label: Some("cube_shader"),
                    source: wgpu::ShaderSource::Wgsl(shaders::CUBE_SHADER.into()),
                })
            },
            RenderError::ShaderCompilation,
        )?;

        let buffers = vertex_layouts();
        let pipeline = validated(
            device,
            || {
                device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                    label: Some("cube_pipeline"),
                    layout: Some(&pipeline_layout),
                    vertex: wgpu::VertexState {
                        module: &shader,
                        entry_point: Some("vs_main"),
                        compilation_options: Default::default(),
                        buffers: &buffers,
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
                        topology: wgpu::PrimitiveTopology::TriangleList,
                        front_face: wgpu::FrontFace::Ccw,
                        cull_mode: Some(wgpu::Face::Back),
                        ..Default::default()
                    },
                    depth_stencil: Some(wgpu::DepthStencilState {
                        format: DEPTH_FORMAT,
                        depth_write_enabled: true,
                        depth_compare: wgpu::CompareFunction::LessEqual,
                        stencil: Default::default(),
                        bias: Default::default(),
                    }),
                    multisample: Default::default(),
                    multiview: None,
                    cache: None,
                })
            },
            RenderError::PipelineLink,
        )?;

        let pulsing = GpuCube::new(device, &object_layout, "pulsing_cube", pulsing_mesh);
        let orbiting = GpuCube::new(device, &object_layout, "orbiting_cube", orbiting_mesh);
        let depth_texture = Self::create_depth_texture(device, width, height);

        tracing::debug!(
            pulsing_indices = pulsing.index_count(),
            orbiting_indices = orbiting.index_count(),
            "cube pipeline ready"
        );

        Ok(Self {
            pipeline,
            frame_buffer,
            frame_bind_group,
            pulsing,
            orbiting,
            depth_texture,
        })
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn cube(&self, role: CubeRole) -> &GpuCube {
        match role {
            CubeRole::Pulsing => &self.pulsing,
            CubeRole::Orbiting => &self.orbiting,
        }
    }

    fn cube_mut(&mut self, role: CubeRole) -> &mut GpuCube {
        match role {
            CubeRole::Pulsing => &mut self.pulsing,
            CubeRole::Orbiting => &mut self.orbiting,
        }
    }

    /// Recolor one face of one cube. See [`GpuCube::update_face_color`].
    pub fn update_face_color(
        &mut self,
        queue: &wgpu::Queue,
        role: CubeRole,
        face: usize,
        color: Rgba,
    ) -> bool {
        self.cube_mut(role).update_face_color(queue, face, color)
    }

    /// Render one frame: upload uniforms, clear, draw both cubes.
    ///
    /// Uniform uploads are checked for device errors before anything is
    /// drawn with them.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        frame: &FramePlan,
    ) -> Result<(), RenderError> {
        validated(
            device,
            || {
                queue.write_buffer(
                    &self.frame_buffer,
                    0,
                    bytemuck::bytes_of(&FrameUniforms::from(frame)),
                );
                for draw in &frame.draws {
                    self.cube(draw.role).write_object(queue, draw);
                }
            },
            |message| RenderError::Device {
                stage: "uniform upload",
                message,
            },
        )?;

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let clear = frame.clear_color;
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.r as f64,
                            g: clear.g as f64,
                            b: clear.b as f64,
                            a: clear.a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for draw in &frame.draws {
                self.cube(draw.role).draw(&mut pass);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    /// Free both cubes' device buffers ahead of device teardown.
    pub fn release(&mut self) {
        self.pulsing.release();
        self.orbiting.release();
        self.frame_buffer.destroy();
        tracing::info!("cube buffers released");
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        width: u32,
        height: u32,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// First non-sRGB format, else whatever the surface offers first.
fn linear_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat;

    #[test]
    fn prefers_linear_surface_format() {
        let offered = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
        assert_eq!(
            linear_surface_format(&offered),
            Some(TextureFormat::Bgra8Unorm)
        );
    }

    #[test]
    fn falls_back_to_first_offered_format() {
        let offered = [TextureFormat::Rgba8UnormSrgb, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(
            linear_surface_format(&offered),
            Some(TextureFormat::Rgba8UnormSrgb)
        );
        assert_eq!(linear_surface_format(&[]), None);
    }
}
