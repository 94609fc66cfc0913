use anyhow::Result;
use clap::Parser;
use cubeshade_common::ColorPreset;
use cubeshade_input::Key;
use cubeshade_render_wgpu::{GpuContext, RenderError, WgpuRenderer};
use cubeshade_scene::lighting::{CHANNEL_RANGE, SHININESS_RANGE};
use cubeshade_scene::{
    AspectMode, CubeRole, FramePipeline, ProjectionConfig, SceneState, orbiting_cube_mesh,
    pulsing_cube_mesh,
};
use egui::Context as EguiContext;
use glam::Vec3;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "cubeshade-desktop", about = "Lit pulsing and orbiting cubes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Derive the projection aspect ratio from the window instead of 1024:768
    #[arg(long)]
    viewport_aspect: bool,

    /// Initial window width
    #[arg(long, default_value = "500")]
    width: u32,

    /// Initial window height
    #[arg(long, default_value = "500")]
    height: u32,

    /// Start with animation running
    #[arg(long)]
    animate: bool,
}

fn bound_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::KeyU => Some(Key::U),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::Space => Some(Key::Space),
        _ => None,
    }
}

/// Application state.
struct AppState {
    scene: SceneState,
    pipeline: FramePipeline,
    last_frame: Instant,
}

impl AppState {
    fn new(cli: &Cli) -> Self {
        let mut scene = SceneState::default();
        scene.clock.set_enabled(cli.animate);

        let projection = if cli.viewport_aspect {
            ProjectionConfig {
                aspect: AspectMode::Viewport,
                ..ProjectionConfig::default()
            }
        } else {
            ProjectionConfig::default()
        };

        Self {
            scene,
            pipeline: FramePipeline::new(projection),
            last_frame: Instant::now(),
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        if let Some(key) = bound_key(code) {
            self.scene.apply(key.action());
        }
    }

    /// Draw the lighting panel. Returns the preset picked for face 0, if it
    /// changed this frame.
    fn draw_ui(&mut self, ctx: &EguiContext) -> Option<ColorPreset> {
        let mut picked = None;

        egui::Window::new("Lighting properties")
            .auto_sized()
            .show(ctx, |ui| {
                let lighting = &mut self.scene.lighting;
                ui.add(
                    egui::Slider::new(&mut lighting.shininess, SHININESS_RANGE).text("Shininess"),
                );
                vec3_sliders(ui, "Ambient", &mut lighting.ambient_strength);
                vec3_sliders(ui, "Diffuse", &mut lighting.diffuse_strength);
                vec3_sliders(ui, "Specular", &mut lighting.specular_strength);
                vec3_sliders(ui, "Background", &mut lighting.background);

                let mut selected = self.scene.face_preset;
                egui::ComboBox::from_label("Cube face 1 color")
                    .selected_text(selected.name())
                    .show_ui(ui, |ui| {
                        for preset in ColorPreset::ALL {
                            ui.selectable_value(&mut selected, preset, preset.name());
                        }
                    });
                if selected != self.scene.face_preset {
                    self.scene.face_preset = selected;
                    picked = Some(selected);
                }

                ui.separator();
                let cam = &self.scene.camera;
                ui.label(format!(
                    "Camera: d={:.2} az={:.2} el={:.2}",
                    cam.distance(),
                    cam.azimuth(),
                    cam.elevation()
                ));
                ui.small("Arrows: orbit/zoom | U/D: elevation | Space: animate");
            });

        // typed-in slider values can land outside the range
        self.scene.lighting.clamp_to_ranges();
        picked
    }
}

fn vec3_sliders(ui: &mut egui::Ui, name: &str, value: &mut Vec3) {
    let mut channels = value.to_array();
    ui.horizontal(|ui| {
        for channel in &mut channels {
            ui.add(egui::Slider::new(channel, CHANNEL_RANGE).max_decimals(2));
        }
        ui.label(name);
    });
    *value = Vec3::from_array(channels);
}

/// Window-bound resources, created on first resume.
struct Gpu {
    window: Arc<Window>,
    context: GpuContext,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    state: AppState,
    initial_size: PhysicalSize<u32>,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    fatal: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(cli: &Cli) -> Self {
        Self {
            state: AppState::new(cli),
            initial_size: PhysicalSize::new(cli.width, cli.height),
            gpu: None,
            egui_ctx: EguiContext::default(),
            fatal: None,
        }
    }

    fn init_gpu(&self, event_loop: &ActiveEventLoop) -> Result<Gpu> {
        let attrs = Window::default_attributes()
            .with_title("cubeshade")
            .with_inner_size(self.initial_size);
        let window = Arc::new(event_loop.create_window(attrs)?);

        let size = window.inner_size();
        let context = GpuContext::new(window.clone(), size.width, size.height)?;
        let surface_format = context.config.format;

        let renderer = WgpuRenderer::new(
            &context.device,
            surface_format,
            size.width,
            size.height,
            pulsing_cube_mesh(),
            orbiting_cube_mesh(),
        )?;

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&context.device, surface_format, None, 1, false);

        Ok(Gpu {
            window,
            context,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: RenderError) {
        tracing::error!("{err}");
        self.fatal = Some(err.into());
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        let dt = (now - self.state.last_frame).as_secs_f64().min(0.1);
        self.state.last_frame = now;
        self.state.scene.update(dt);

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let output = match gpu.context.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.context.reconfigure();
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let plan = self
            .state
            .scene
            .plan_frame(&self.state.pipeline, gpu.context.size());
        if let Err(err) = gpu
            .renderer
            .render(&gpu.context.device, &gpu.context.queue, &view, &plan)
        {
            self.fail(event_loop, err);
            return;
        }

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let mut picked = None;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            picked = self.state.draw_ui(ctx);
        });

        if let Some(preset) = picked {
            gpu.renderer.update_face_color(
                &gpu.context.queue,
                CubeRole::Pulsing,
                0,
                preset.rgba(),
            );
        }

        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        let (width, height) = gpu.context.size();
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: full_output.pixels_per_point,
        };

        let device = &gpu.context.device;
        let queue = &gpu.context.queue;
        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("egui_encoder"),
        });
        gpu.egui_renderer.update_buffers(
            device,
            queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match self.init_gpu(event_loop) {
            Ok(gpu) => self.gpu = Some(gpu),
            Err(err) => {
                tracing::error!("startup failed: {err:#}");
                self.fatal = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.context.resize(new_size.width, new_size.height);
                    let (width, height) = gpu.context.size();
                    gpu.renderer.resize(&gpu.context.device, width, height);
                }
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.state.handle_key(key);
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // cube buffers go before the device and surface they belong to
        if let Some(mut gpu) = self.gpu.take() {
            gpu.renderer.release();
            drop(gpu);
        }
        tracing::info!("cubeshade-desktop shut down");
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("cubeshade-desktop starting");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(&cli);
    event_loop.run_app(&mut app)?;

    if let Some(err) = app.fatal {
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubeshade_input::Action;

    #[test]
    fn arrow_keys_are_bound() {
        assert_eq!(bound_key(KeyCode::ArrowLeft), Some(Key::Left));
        assert_eq!(bound_key(KeyCode::Space), Some(Key::Space));
        assert_eq!(bound_key(KeyCode::KeyW), None);
    }

    #[test]
    fn key_presses_move_camera() {
        let cli = Cli::parse_from(["cubeshade-desktop"]);
        let mut state = AppState::new(&cli);
        let d0 = state.scene.camera.distance();
        state.handle_key(KeyCode::ArrowDown);
        assert!(state.scene.camera.distance() > d0);
        state.handle_key(KeyCode::KeyQ);
        assert!(state.scene.camera.distance() > d0);
    }

    #[test]
    fn space_toggles_animation() {
        let cli = Cli::parse_from(["cubeshade-desktop"]);
        let mut state = AppState::new(&cli);
        assert!(!state.scene.clock.is_enabled());
        state.handle_key(KeyCode::Space);
        assert!(state.scene.clock.is_enabled());
        assert_eq!(Key::Space.action(), Action::ToggleAnimation);
    }

    #[test]
    fn cli_defaults_match_reference_window() {
        let cli = Cli::parse_from(["cubeshade-desktop"]);
        assert_eq!((cli.width, cli.height), (500, 500));
        let state = AppState::new(&cli);
        assert_eq!(
            state.pipeline.projection.aspect,
            AspectMode::Fixed(cubeshade_scene::frame::REFERENCE_ASPECT)
        );
    }

    #[test]
    fn panel_keeps_lighting_in_range() {
        let cli = Cli::parse_from(["cubeshade-desktop"]);
        let mut state = AppState::new(&cli);
        state.scene.lighting.shininess = 500.0;
        state.scene.lighting.background = Vec3::new(-0.5, 0.5, 2.0);

        let ctx = EguiContext::default();
        let mut picked = Some(ColorPreset::Cyan);
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            picked = state.draw_ui(ctx);
        });

        assert_eq!(picked, None);
        assert_eq!(state.scene.lighting.shininess, 200.0);
        assert_eq!(state.scene.lighting.background, Vec3::new(0.0, 0.5, 1.0));
    }

    #[test]
    fn viewport_flag_switches_aspect_mode() {
        let cli = Cli::parse_from(["cubeshade-desktop", "--viewport-aspect", "--animate"]);
        let state = AppState::new(&cli);
        assert_eq!(state.pipeline.projection.aspect, AspectMode::Viewport);
        assert!(state.scene.clock.is_enabled());
    }
}
