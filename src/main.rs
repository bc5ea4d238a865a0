use std::sync::Arc;

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use tracing::{error, info};
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{Key, NamedKey},
    window::Window,
};

use boing::{controller, logging, model, ui, view};

use controller::{FrameContext, InputEvent, InputProcessor, InputState};
use model::{build_uv_sphere, Camera, CameraMode, Mesh};
use view::render::{self, LightingUniform, TransformsUniform};
use view::{GpuContext, RenderState, SceneResources};

const SPHERE_RADIUS: f32 = 0.25;
const SPHERE_STACKS: u32 = 18;
const SPHERE_SLICES: u32 = 36;

const FIXED_CAMERA_EYE: Vec3 = Vec3::new(0.0, 0.0, 4.5);

/// Smallest window height the resize keys can shrink to.
const MIN_WINDOW_HEIGHT: u32 = 90;

struct App {
    window: Arc<Window>,
    gpu: GpuContext,
    size: winit::dpi::PhysicalSize<u32>,

    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    scene: SceneResources,
    render_state: RenderState,
    triangle_count: u32,

    egui_state: egui_winit::State,
    egui_ctx: egui::Context,

    frame: FrameContext,
    input_state: InputState,
    input_processor: InputProcessor,

    last_frame_time: std::time::Instant,
    fps: f32,
    frame_count: u32,
    fps_timer: f32,
}

impl App {
    async fn new(window: Arc<Window>, mesh: Mesh) -> Self {
        let size = window.inner_size();

        let gpu = GpuContext::new(window.clone(), size.width, size.height).await;

        let depth_format = wgpu::TextureFormat::Depth32Float;
        let (depth_texture, depth_view) =
            render::create_depth_texture(&gpu.device, size.width, size.height);

        let scene = render::create_scene_resources(&gpu.device);
        gpu.queue.write_buffer(
            &scene.lighting_buffer,
            0,
            bytemuck::bytes_of(&LightingUniform::default()),
        );

        let pipes = render::create_sphere_pipelines(
            &gpu.device,
            gpu.format,
            &scene.bind_group_layout,
            depth_format,
        );

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );
        let egui_renderer =
            egui_wgpu::Renderer::new(&gpu.device, gpu.format, egui_wgpu::RendererOptions::default());

        let triangle_count = mesh.triangle_count();
        let mut render_state = RenderState {
            width: size.width,
            height: size.height,
            pipeline: pipes.pipeline,
            wireframe_pipeline: pipes.wireframe_pipeline,
            wireframe_mode: false,
            sphere: None,
            egui_renderer,
        };
        render_state.set_mesh(&gpu.device, &mesh);

        let camera = Camera::fixed(FIXED_CAMERA_EYE, Vec3::ZERO, size.width, size.height);
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        let frame = FrameContext::new(camera, &mut Pcg32::seed_from_u64(seed));

        Self {
            window,
            gpu,
            size,
            depth_texture,
            depth_view,
            scene,
            render_state,
            triangle_count,
            egui_state,
            egui_ctx,
            frame,
            input_state: InputState::new(),
            input_processor: InputProcessor::default(),
            last_frame_time: std::time::Instant::now(),
            fps: 0.0,
            frame_count: 0,
            fps_timer: 0.0,
        }
    }

    fn input(&mut self, event: &WindowEvent) -> bool {
        // First let egui process the event
        let egui_captured = self
            .egui_state
            .on_window_event(self.window.as_ref(), event)
            .consumed;
        if egui_captured {
            return true;
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state,
                        logical_key,
                        repeat,
                        ..
                    },
                ..
            } => {
                if let Some(name) = key_name(logical_key) {
                    match state {
                        ElementState::Pressed => {
                            if !repeat && self.input_processor.wants_to_toggle_camera(&name) {
                                self.toggle_camera();
                            }
                            self.input_state.process_event(&InputEvent::KeyDown(name));
                        }
                        ElementState::Released => {
                            self.input_state.process_event(&InputEvent::KeyUp(name));
                        }
                    }
                }
                true
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if *button == MouseButton::Left {
                    self.input_state.process_event(&InputEvent::LookButton {
                        is_down: *state == ElementState::Pressed,
                    });
                }
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input_state.process_event(&InputEvent::PointerMoved {
                    x: position.x as f32,
                    y: position.y as f32,
                });
                true
            }
            WindowEvent::Focused(false) => {
                self.input_state.process_event(&InputEvent::FocusLost);
                true
            }
            _ => false,
        }
    }

    fn toggle_camera(&mut self) {
        let (w, h) = (self.gpu.config.width, self.gpu.config.height);
        self.frame.camera = match self.frame.camera.mode {
            CameraMode::Fixed { eye, .. } => {
                let mut camera = Camera::free(eye, w, h);
                camera.set_look_at(self.frame.body.position);
                camera
            }
            CameraMode::Free { .. } => Camera::fixed(FIXED_CAMERA_EYE, Vec3::ZERO, w, h),
        };
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.gpu.resize(new_size.width, new_size.height);

            let (depth_texture, depth_view) =
                render::create_depth_texture(&self.gpu.device, new_size.width, new_size.height);
            self.depth_texture = depth_texture;
            self.depth_view = depth_view;

            self.render_state.width = new_size.width;
            self.render_state.height = new_size.height;
            self.frame.camera.set_aspect(new_size.width, new_size.height);
        }
    }

    /// Grow or shrink the window by one pixel of height, keeping 16:9.
    fn adjust_window(&self, delta: i32) {
        let height = (self.gpu.config.height as i32 + delta).max(MIN_WINDOW_HEIGHT as i32) as u32;
        let width = height * 16 / 9;
        let _ = self
            .window
            .request_inner_size(winit::dpi::PhysicalSize::new(width, height));
    }

    /// One simulation frame. Returns false when the exit key asks to quit.
    fn update(&mut self, dt: f32) -> bool {
        self.frame_count += 1;
        self.fps_timer += dt;
        if self.fps_timer >= 1.0 {
            self.fps = self.frame_count as f32 / self.fps_timer;
            self.frame_count = 0;
            self.fps_timer = 0.0;
        }

        let snapshot = self.input_processor.snapshot(&self.input_state);
        if snapshot.exit {
            return false;
        }
        if snapshot.window_grow {
            self.adjust_window(1);
        }
        if snapshot.window_shrink {
            self.adjust_window(-1);
        }

        let out = self.frame.advance(dt, &snapshot);
        self.frame.log_telemetry();

        let transforms = TransformsUniform::new(out.world, out.view, out.proj);
        self.gpu.queue.write_buffer(
            &self.scene.transforms_buffer,
            0,
            bytemuck::bytes_of(&transforms),
        );
        self.render_state.wireframe_mode = out.wireframe;

        true
    }

    fn render_ui(&mut self) -> (Vec<egui::epaint::ClippedShape>, egui::TexturesDelta) {
        let raw_input = self.egui_state.take_egui_input(&self.window);
        let telemetry = self.frame.telemetry();
        let camera_mode = self.frame.camera.mode;
        let stats = ui::OverlayStats {
            fps: self.fps,
            triangle_count: self.triangle_count,
            wireframe: self.render_state.wireframe_mode,
        };

        let output = self.egui_ctx.run(raw_input, |ctx| {
            ui::draw_overlay(ctx, &telemetry, &camera_mode, &stats);
        });

        self.egui_state
            .handle_platform_output(&self.window, output.platform_output);
        (output.shapes, output.textures_delta)
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let (shapes, textures_delta) = self.render_ui();
        let pixels_per_point = self.window.scale_factor() as f32;
        let primitives = self.egui_ctx.tessellate(shapes, pixels_per_point);

        self.render_state.draw_frame(
            &self.gpu.device,
            &self.gpu.queue,
            &self.gpu.surface,
            &self.depth_view,
            &self.scene.scene_bind_group,
            &primitives,
            &textures_delta,
            pixels_per_point,
        )
    }
}

/// Map a winit logical key onto the names the bindings use.
fn key_name(key: &Key) -> Option<String> {
    match key {
        Key::Character(c) => Some(c.to_string()),
        Key::Named(NamedKey::Space) => Some(" ".to_string()),
        Key::Named(NamedKey::Escape) => Some("Escape".to_string()),
        Key::Named(NamedKey::ArrowUp) => Some("ArrowUp".to_string()),
        Key::Named(NamedKey::ArrowDown) => Some("ArrowDown".to_string()),
        _ => None,
    }
}

fn main() {
    logging::init();

    let mesh = match build_uv_sphere(SPHERE_RADIUS, SPHERE_STACKS, SPHERE_SLICES) {
        Ok(mesh) => mesh,
        Err(e) => {
            error!("sphere mesh construction failed: {e}");
            std::process::exit(1);
        }
    };
    info!(
        vertices = mesh.vertices.len(),
        triangles = mesh.triangle_count(),
        "sphere mesh built"
    );

    let event_loop = EventLoop::new().unwrap();
    let window_attributes = Window::default_attributes()
        .with_title("boing")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
    let window = event_loop.create_window(window_attributes).unwrap();
    let window = Arc::new(window);

    let mut app = pollster::block_on(App::new(window.clone(), mesh));

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == app.window.id() => {
                if !app.input(event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(physical_size) => {
                            app.resize(*physical_size);
                        }
                        WindowEvent::RedrawRequested => {
                            let now = std::time::Instant::now();
                            let dt = (now - app.last_frame_time).as_secs_f32();
                            app.last_frame_time = now;

                            if !app.update(dt) {
                                elwt.exit();
                                return;
                            }

                            match app.render() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::Lost) => app.resize(app.size),
                                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                                Err(e) => error!("surface error: {e:?}"),
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            _ => {}
        })
        .unwrap();
}
