//! Viewer application state: window, renderer, input, scene, tooltip.

use anyhow::Result;
use glam::{Mat4, Vec3};
use std::sync::Arc;
use winit::event::{Event, MouseButton, WindowEvent};
use winit::event_loop::EventLoopWindowTarget;
use winit::keyboard::KeyCode;
use winit::window::{Window, WindowBuilder};

use crate::asset::{load_model, ModelSource};
use crate::camera::{OrbitCamera, OrbitController};
use crate::config::ViewerConfig;
use crate::mesh::{uv_sphere, GpuMesh};
use crate::picking::{pick_marker, screen_to_ray, Tooltip, MARKER_RADIUS};
use crate::pipeline::{ModelBinding, ModelUniform};
use crate::scene::SceneState;
use crate::ui;
use crate::window::InputState;
use crate::Renderer;

/// Initial camera eye position.
const CAMERA_EYE: Vec3 = Vec3::new(3.0, 3.0, 5.0);

/// Marker sphere color: opaque red, unlit.
const MARKER_COLOR: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// App action to communicate with the main event loop.
pub enum AppAction {
    /// Keep running.
    Continue,
    /// Quit the application.
    Quit,
}

/// One uploaded mesh with its per-draw uniform.
struct DrawItem {
    gpu: GpuMesh,
    binding: ModelBinding,
}

/// The viewer application.
pub struct ViewerApp {
    window: Arc<Window>,
    renderer: Renderer,
    input: InputState,
    controller: OrbitController,
    scene: SceneState,
    tooltip: Tooltip,
    model_draws: Vec<DrawItem>,
    marker_mesh: Option<GpuMesh>,
    marker_bindings: Vec<ModelBinding>,
    mouse_sensitivity: f32,
    zoom_sensitivity: f32,
}

impl ViewerApp {
    /// Create the viewer: window, GPU, model load, marker setup.
    pub fn new(
        event_loop: &EventLoopWindowTarget<()>,
        config: &ViewerConfig,
        source: ModelSource,
    ) -> Result<Self> {
        tracing::info!("Initializing viewer...");

        let window = WindowBuilder::new()
            .with_title(config.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(config.width, config.height))
            .build(event_loop)?;
        let window = Arc::new(window);

        let camera = OrbitCamera::from_eye(
            CAMERA_EYE,
            Vec3::ZERO,
            config.fov_degrees.to_radians(),
            config.width as f32 / config.height as f32,
        );
        let controller = OrbitController::new(
            &camera,
            config.damping,
            config.min_distance,
            config.max_distance,
        );

        let mut renderer = Renderer::new(camera, config.vsync);
        pollster::block_on(renderer.initialize_gpu(window.clone()))?;

        // Load the model up front; failure leaves an empty scene and is not fatal
        let scene = SceneState::from_load_result(&source, load_model(&source));

        let mut app = Self {
            window,
            renderer,
            input: InputState::new(),
            controller,
            scene,
            tooltip: Tooltip::new(),
            model_draws: Vec::new(),
            marker_mesh: None,
            marker_bindings: Vec::new(),
            mouse_sensitivity: config.mouse_sensitivity,
            zoom_sensitivity: config.zoom_sensitivity,
        };
        app.upload_scene();

        Ok(app)
    }

    /// Upload model meshes and marker spheres to the GPU.
    fn upload_scene(&mut self) {
        let SceneState::Ready(model) = &self.scene else {
            return;
        };
        let Some(resources) = self.renderer.render_resources() else {
            return;
        };

        for mesh in &model.meshes {
            let gpu = GpuMesh::from_mesh_data(resources.device, mesh);
            let binding = resources.pipeline.create_model_binding(
                resources.device,
                ModelUniform::new(Mat4::IDENTITY, mesh.base_color, false),
            );
            self.model_draws.push(DrawItem { gpu, binding });
        }

        // One shared sphere mesh, translated per marker
        let sphere = uv_sphere(MARKER_RADIUS, 32, 32, MARKER_COLOR);
        self.marker_mesh = Some(GpuMesh::from_mesh_data(resources.device, &sphere));
        for marker in &model.markers {
            let binding = resources.pipeline.create_model_binding(
                resources.device,
                ModelUniform::new(Mat4::from_translation(marker.position), MARKER_COLOR, true),
            );
            self.marker_bindings.push(binding);
        }

        tracing::info!(
            meshes = self.model_draws.len(),
            markers = self.marker_bindings.len(),
            "scene uploaded"
        );
    }

    /// Handle an event.
    pub fn handle_event(
        &mut self,
        event: &Event<()>,
        _elwt: &EventLoopWindowTarget<()>,
    ) -> AppAction {
        // Let the overlay see events first
        if let Event::WindowEvent { ref event, .. } = event {
            if let Some(mut ui) = self.renderer.ui_mut() {
                ui.handle_event(&self.window, event);
            }
            self.input.handle_event(event);
        }

        match event {
            Event::WindowEvent { event, window_id } if *window_id == self.window.id() => {
                match event {
                    WindowEvent::CloseRequested => {
                        return AppAction::Quit;
                    }
                    WindowEvent::KeyboardInput { event, .. } => {
                        if let winit::keyboard::PhysicalKey::Code(KeyCode::Escape) =
                            event.physical_key
                        {
                            if event.state.is_pressed() {
                                return AppAction::Quit;
                            }
                        }
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        self.update_hover((position.x as f32, position.y as f32));
                    }
                    WindowEvent::Resized(new_size) => {
                        self.renderer.resize((new_size.width, new_size.height));
                    }
                    WindowEvent::RedrawRequested => {
                        self.update_and_render();
                    }
                    _ => {}
                }
            }
            Event::AboutToWait => {
                self.window.request_redraw();
            }
            _ => {}
        }

        AppAction::Continue
    }

    /// Re-run the hover pick for the current cursor position.
    ///
    /// The first marker (in registration order) hit by the pointer ray wins;
    /// tooltip state is set exactly once per event.
    fn update_hover(&mut self, cursor: (f32, f32)) {
        let size = self
            .renderer
            .size()
            .unwrap_or_else(|| self.window.inner_size().into());

        let ray = screen_to_ray(cursor, size, self.renderer.camera());
        let markers = self.scene.markers();
        let hovered = pick_marker(markers, &ray).map(|hit| &markers[hit.index]);
        self.tooltip.apply_hover(hovered, cursor);
    }

    fn update_and_render(&mut self) {
        // Orbit: left-drag rotates, scroll zooms
        if self.input.is_mouse_pressed(MouseButton::Left) {
            let delta = self.input.cursor_delta;
            self.controller.rotate(
                delta.0 as f32 * self.mouse_sensitivity,
                delta.1 as f32 * self.mouse_sensitivity,
            );
        }
        if self.input.scroll_delta != 0.0 {
            self.controller.zoom(self.input.scroll_delta * self.zoom_sensitivity);
        }
        self.controller.apply(self.renderer.camera_mut());

        self.render();
    }

    fn render(&mut self) {
        let Some(frame) = self.renderer.begin_frame() else {
            return;
        };
        let Some(resources) = self.renderer.render_resources() else {
            return;
        };

        let mut encoder = resources
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = resources.pipeline.begin_render_pass(&mut encoder, &frame.view);
            render_pass.set_pipeline(resources.pipeline.pipeline());
            render_pass.set_bind_group(0, resources.pipeline.camera_bind_group(), &[]);

            for draw in &self.model_draws {
                render_pass.set_bind_group(1, &draw.binding.bind_group, &[]);
                render_pass.set_vertex_buffer(0, draw.gpu.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(draw.gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..draw.gpu.index_count, 0, 0..1);
            }

            if let Some(sphere) = &self.marker_mesh {
                render_pass.set_vertex_buffer(0, sphere.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(sphere.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                for binding in &self.marker_bindings {
                    render_pass.set_bind_group(1, &binding.bind_group, &[]);
                    render_pass.draw_indexed(0..sphere.index_count, 0, 0..1);
                }
            }
        }

        // Tooltip overlay
        if let Some(mut ui) = self.renderer.ui_mut() {
            let size = self.window.inner_size();
            let pixels_per_point = self.window.scale_factor() as f32;
            let screen_descriptor = egui_wgpu::ScreenDescriptor {
                size_in_pixels: [size.width, size.height],
                pixels_per_point,
            };

            ui.render(
                resources.device,
                resources.queue,
                &mut encoder,
                &frame.view,
                screen_descriptor,
                &self.window,
                |ctx| {
                    ui::render_tooltip(ctx, &self.tooltip, pixels_per_point);
                },
            );
        }

        resources.queue.submit(std::iter::once(encoder.finish()));
        frame.present();

        self.input.reset_frame();
    }
}
