use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use flyline_common::Viewport;
use flyline_input::{InputEvent, InputSink, Key, MouseButton};
use flyline_render::FramePlan;
use flyline_render_wgpu::WgpuRenderer;
use flyline_sim::{AppState, DemoConfig, DemoMode};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{CursorGrabMode, Window, WindowId};

/// Longest frame step fed to the simulation, in seconds.
const MAX_FRAME_DT: f32 = 0.1;

#[derive(Parser)]
#[command(name = "flyline-desktop", about = "Fly camera and line drawing demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Demo mode: viewer, sketch or combined (overrides the config file)
    #[arg(short, long)]
    mode: Option<DemoMode>,
}

/// Fatal failures while creating the window or graphics context.
#[derive(Debug, thiserror::Error)]
enum GpuInitError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible graphics adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
}

fn map_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::Space => Key::Space,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyC => Key::C,
        KeyCode::Escape => Key::Escape,
        _ => return None,
    })
}

fn map_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

fn draw_ui(ctx: &EguiContext, state: &mut AppState) {
    let summary = state.summary();
    egui::Window::new("flyline")
        .default_pos([10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| {
            ui.label("Hello");
            ui.checkbox(&mut state.toggles.draw_square, "Draw square");
            ui.checkbox(&mut state.toggles.wireframe, "Wireframe mode");
            ui.separator();
            ui.label(format!("Mode: {}", summary.mode));
            if summary.mode.has_camera() {
                ui.label(format!(
                    "Camera: ({:.2}, {:.2}, {:.2})",
                    summary.position.x, summary.position.y, summary.position.z
                ));
                ui.label(format!(
                    "Yaw {:.1}  Pitch {:.1}  {}",
                    summary.yaw,
                    summary.pitch,
                    if summary.airborne { "airborne" } else { "grounded" }
                ));
            }
            if summary.mode.has_line_tool() {
                let line = if summary.line_ready {
                    "ready"
                } else if summary.line_clicks == 1 {
                    "waiting for second click"
                } else {
                    "empty"
                };
                ui.label(format!("Line: {line}"));
            }
            ui.separator();
            ui.small("LMB: look / draw | Esc: release | WASD: move | Space: jump");
            ui.small("P: wireframe | C: clear line");
        });
}

/// Window plus everything needed to draw into it.
struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    renderer: WgpuRenderer,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(
        event_loop: &ActiveEventLoop,
        settings: &DemoConfig,
        egui_ctx: &EguiContext,
    ) -> Result<Self, GpuInitError> {
        let attrs = Window::default_attributes()
            .with_title(settings.window.title.clone())
            .with_inner_size(PhysicalSize::new(
                settings.window.width,
                settings.window.height,
            ));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(GpuInitError::NoAdapter)?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("flyline_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GpuInitError::NoSurfaceFormat)?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
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

        let renderer = WgpuRenderer::new(&device, surface_format);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend ({})",
            adapter.get_info().backend.to_str(),
            adapter.get_info().name
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            renderer,
            egui_winit,
            egui_renderer,
        })
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.config.width, self.config.height)
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
    }

    fn set_cursor_captured(&self, captured: bool) {
        let result = if captured {
            self.window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined))
        } else {
            self.window.set_cursor_grab(CursorGrabMode::None)
        };
        if let Err(e) = result {
            tracing::warn!("cursor grab not supported: {e}");
        }
        self.window.set_cursor_visible(!captured);
    }

    /// Draw the plan and the GUI overlay, then present.
    fn draw(&mut self, plan: &FramePlan, egui_ctx: &EguiContext, state: &mut AppState) {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
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

        self.renderer.render(&self.device, &self.queue, &view, plan);

        let raw_input = self.egui_winit.take_egui_input(&self.window);
        let full_output = egui_ctx.run(raw_input, |ctx| draw_ui(ctx, state));
        self.egui_winit
            .handle_platform_output(&self.window, full_output.platform_output);

        let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.config.width, self.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
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
            self.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        output.present();
    }
}

struct GpuApp {
    settings: DemoConfig,
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    last_frame: Instant,
    /// Cursor position, kept accumulating from raw motion while captured.
    cursor: (f64, f64),
    init_error: Option<GpuInitError>,
}

impl GpuApp {
    fn new(settings: DemoConfig) -> Self {
        Self {
            state: AppState::new(&settings),
            settings,
            gpu: None,
            egui_ctx: EguiContext::default(),
            last_frame: Instant::now(),
            cursor: (0.0, 0.0),
            init_error: None,
        }
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(MAX_FRAME_DT);
        self.last_frame = now;

        let outcome = self.state.update(dt);

        let Some(gpu) = &mut self.gpu else {
            return;
        };
        if let Some(captured) = outcome.capture_changed {
            gpu.set_cursor_captured(captured);
        }

        let plan = FramePlan::build(&self.state);
        gpu.draw(&plan, &self.egui_ctx, &mut self.state);
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match Gpu::new(event_loop, &self.settings, &self.egui_ctx) {
            Ok(gpu) => {
                self.state.set_viewport(gpu.viewport());
                self.last_frame = Instant::now();
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("{e}");
                self.init_error = Some(e);
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
        let Some(gpu) = &mut self.gpu else {
            return;
        };

        // The overlay gets first pick of input unless the camera owns the mouse.
        if !self.state.toggles.mouse_captured {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed && overlay_may_swallow(&event) {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                tracing::info!("close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                gpu.resize(new_size);
                let viewport = gpu.viewport();
                self.state.push_event(InputEvent::Resized(viewport));
            }
            WindowEvent::Focused(false) => {
                self.state.push_event(InputEvent::FocusLost);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: key_state,
                        ..
                    },
                ..
            } => {
                if let Some(key) = map_key(code) {
                    self.state.push_event(InputEvent::Key {
                        key,
                        pressed: key_state == ElementState::Pressed,
                    });
                }
            }
            WindowEvent::MouseInput {
                button,
                state: btn_state,
                ..
            } => {
                if let Some(button) = map_button(button) {
                    self.state.push_event(InputEvent::Button {
                        button,
                        pressed: btn_state == ElementState::Pressed,
                    });
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                if !self.state.toggles.mouse_captured {
                    self.cursor = (position.x, position.y);
                    self.state
                        .push_event(InputEvent::cursor(position.x, position.y));
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.state.toggles.mouse_captured {
                self.cursor.0 += delta.0;
                self.cursor.1 += delta.1;
                self.state
                    .push_event(InputEvent::cursor(self.cursor.0, self.cursor.1));
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut settings = DemoConfig::load_or_default(cli.config.as_deref())
        .context("failed to load config")?;
    if let Some(mode) = cli.mode {
        settings.mode = mode;
    }

    tracing::info!("flyline-desktop starting in {} mode", settings.mode);

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(settings);
    event_loop.run_app(&mut app)?;

    if let Some(e) = app.init_error.take() {
        anyhow::bail!("graphics initialisation failed: {e}");
    }

    tracing::info!("flyline-desktop shut down");
    Ok(())
}

/// Whether egui may keep `event` from the app state when it consumes it.
/// Releases and focus loss always get through, otherwise a button released
/// over the panel stays held and the next click is not a press edge.
fn overlay_may_swallow(event: &WindowEvent) -> bool {
    match event {
        WindowEvent::KeyboardInput { event, .. } => event.state == ElementState::Pressed,
        WindowEvent::MouseInput { state, .. } => *state == ElementState::Pressed,
        WindowEvent::Focused(false) => false,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_demo_keys() {
        assert_eq!(map_key(KeyCode::KeyW), Some(Key::W));
        assert_eq!(map_key(KeyCode::Space), Some(Key::Space));
        assert_eq!(map_key(KeyCode::Escape), Some(Key::Escape));
        assert_eq!(map_key(KeyCode::KeyQ), None);
    }

    #[test]
    fn maps_mouse_buttons() {
        assert_eq!(
            map_button(winit::event::MouseButton::Left),
            Some(MouseButton::Left)
        );
        assert_eq!(map_button(winit::event::MouseButton::Back), None);
    }

    #[test]
    fn overlay_never_swallows_releases() {
        // SAFETY: the id is only compared, never passed to the platform.
        let device_id = unsafe { winit::event::DeviceId::dummy() };
        let press = WindowEvent::MouseInput {
            device_id,
            state: ElementState::Pressed,
            button: winit::event::MouseButton::Left,
        };
        let release = WindowEvent::MouseInput {
            device_id,
            state: ElementState::Released,
            button: winit::event::MouseButton::Left,
        };
        assert!(overlay_may_swallow(&press));
        assert!(!overlay_may_swallow(&release));
        assert!(!overlay_may_swallow(&WindowEvent::Focused(false)));
        assert!(overlay_may_swallow(&WindowEvent::Focused(true)));
    }

    #[test]
    fn release_over_overlay_keeps_next_click_an_edge() {
        let mut state = AppState::new(&DemoConfig {
            mode: DemoMode::Sketch,
            ..DemoConfig::default()
        });
        state.push_events([
            InputEvent::cursor(100.0, 100.0),
            InputEvent::click(MouseButton::Left),
            // Released over the panel: still forwarded.
            InputEvent::release(MouseButton::Left),
        ]);
        state.update(1.0 / 60.0);
        assert_eq!(state.line.click_count(), 1);

        state.push_events([
            InputEvent::cursor(700.0, 700.0),
            InputEvent::click(MouseButton::Left),
        ]);
        state.update(1.0 / 60.0);
        assert!(state.line.is_ready());
    }

    #[test]
    fn cli_mode_parses() {
        let cli = Cli::parse_from(["flyline-desktop", "--mode", "sketch", "-v"]);
        assert_eq!(cli.mode, Some(DemoMode::Sketch));
        assert!(cli.verbose);
        assert!(cli.config.is_none());
    }
}
