#![warn(missing_docs)]
//! astroview: a native glTF model viewer with hover-picked annotations.
//!
//! Loads one GLB asset, renders it with an orbit camera and basic lighting,
//! and shows a tooltip when the pointer hovers one of a fixed set of markers
//! placed on the model.

use std::cell::RefCell;

pub mod app;
pub mod asset;
pub mod camera;
pub mod config;
pub mod mesh;
pub mod picking;
pub mod pipeline;
pub mod scene;
pub mod ui;
pub mod window;

pub use asset::{load_model, ModelSource, DEFAULT_MODEL_URL};
pub use camera::{CameraUniform, OrbitCamera, OrbitController};
pub use config::ViewerConfig;
pub use mesh::{uv_sphere, GpuMesh, MeshData, MeshVertex};
pub use picking::{
    pick_marker, ray_sphere_intersection, screen_to_ray, Marker, MarkerHit, Ray, Tooltip,
    MARKER_RADIUS,
};
pub use pipeline::{LightUniform, ModelBinding, ModelPipeline, ModelUniform, RenderContext};
pub use scene::{default_markers, SceneModel, SceneState};
pub use ui::UiManager;
pub use window::InputState;

/// Main renderer owning GPU resources.
pub struct Renderer {
    context: Option<RenderContext>,
    pipeline: Option<ModelPipeline>,
    camera: OrbitCamera,
    ui: Option<RefCell<UiManager>>,
    vsync: bool,
}

impl Renderer {
    /// Construct a renderer; GPU resources are created by `initialize_gpu`.
    pub fn new(camera: OrbitCamera, vsync: bool) -> Self {
        Self {
            context: None,
            pipeline: None,
            camera,
            ui: None,
            vsync,
        }
    }

    /// Initialize GPU resources with a window (async).
    pub async fn initialize_gpu(
        &mut self,
        window: std::sync::Arc<winit::window::Window>,
    ) -> anyhow::Result<()> {
        let context = RenderContext::new(window.clone(), self.vsync).await?;
        let pipeline = ModelPipeline::new(&context)?;
        let ui = UiManager::new(&context.device, context.config.format, &window);

        self.camera.set_aspect(context.aspect_ratio());

        self.context = Some(context);
        self.pipeline = Some(pipeline);
        self.ui = Some(RefCell::new(ui));

        Ok(())
    }

    /// Get mutable reference to UI manager via RefCell.
    pub fn ui_mut(&self) -> Option<std::cell::RefMut<'_, UiManager>> {
        self.ui.as_ref().map(|cell| cell.borrow_mut())
    }

    /// Get mutable reference to the camera.
    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    /// Get reference to the camera.
    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Current backbuffer size in pixels.
    pub fn size(&self) -> Option<(u32, u32)> {
        self.context.as_ref().map(|ctx| ctx.size)
    }

    /// Resize surface, depth buffer, and camera aspect.
    pub fn resize(&mut self, new_size: (u32, u32)) {
        if let Some(context) = &mut self.context {
            context.resize(new_size);
            self.camera.set_aspect(context.aspect_ratio());

            if let Some(pipeline) = &mut self.pipeline {
                pipeline.resize(&context.device, new_size);
            }
        }
    }

    /// Begin a new frame: acquire the backbuffer and upload the camera uniform.
    pub fn begin_frame(&mut self) -> Option<FrameContext> {
        let context = self.context.as_ref()?;
        let pipeline = self.pipeline.as_ref()?;

        let output = context.surface.get_current_texture().ok()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        pipeline.update_camera(&context.queue, &self.camera);

        Some(FrameContext {
            output: Some(output),
            view,
        })
    }

    /// Get render resources for drawing.
    pub fn render_resources(&self) -> Option<RenderResources<'_>> {
        let context = self.context.as_ref()?;
        let pipeline = self.pipeline.as_ref()?;

        Some(RenderResources {
            device: &context.device,
            queue: &context.queue,
            pipeline,
        })
    }
}

/// Frame rendering context.
pub struct FrameContext {
    output: Option<wgpu::SurfaceTexture>,
    /// The texture view for this frame.
    pub view: wgpu::TextureView,
}

impl FrameContext {
    /// Finish the frame and present.
    pub fn present(self) {
        if let Some(output) = self.output {
            output.present();
        }
    }
}

/// Resources needed for rendering.
pub struct RenderResources<'a> {
    /// GPU device.
    pub device: &'a wgpu::Device,
    /// Command queue.
    pub queue: &'a wgpu::Queue,
    /// Model rendering pipeline.
    pub pipeline: &'a ModelPipeline,
}
