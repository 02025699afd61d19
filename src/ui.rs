//! egui overlay integration and the hover tooltip.

use egui_wgpu::ScreenDescriptor;

use crate::picking::Tooltip;

/// UI overlay manager using egui.
pub struct UiManager {
    context: egui::Context,
    renderer: egui_wgpu::Renderer,
    state: egui_winit::State,
}

impl UiManager {
    /// Create a new UI manager.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &winit::window::Window,
    ) -> Self {
        let context = egui::Context::default();

        let viewport_id = context.viewport_id();
        let state = egui_winit::State::new(context.clone(), viewport_id, window, None, None);

        let renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1);

        Self {
            context,
            renderer,
            state,
        }
    }

    /// Handle window event. Returns true if egui consumed it.
    pub fn handle_event(
        &mut self,
        window: &winit::window::Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Render the overlay with custom content.
    pub fn render<F>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        screen_descriptor: ScreenDescriptor,
        window: &winit::window::Window,
        ui_fn: F,
    ) where
        F: FnOnce(&egui::Context),
    {
        let raw_input = self.state.take_egui_input(window);
        let full_output = self.context.run(raw_input, ui_fn);

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .context
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        for (id, image_delta) in full_output.textures_delta.set {
            self.renderer.update_texture(device, queue, id, &image_delta);
        }

        self.renderer
            .update_buffers(device, queue, encoder, &paint_jobs, &screen_descriptor);

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load, // Don't clear, render over existing content
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            self.renderer
                .render(&mut render_pass, &paint_jobs, &screen_descriptor);
        }

        for id in full_output.textures_delta.free {
            self.renderer.free_texture(&id);
        }
    }
}

/// Draw the hover tooltip as a dark rounded label at its anchor position.
///
/// Positions are physical pixels; egui works in points, so divide by the
/// pixels-per-point scale.
pub fn render_tooltip(ctx: &egui::Context, tooltip: &Tooltip, pixels_per_point: f32) {
    if !tooltip.visible {
        return;
    }

    let pos = egui::pos2(
        tooltip.screen_pos.0 / pixels_per_point,
        tooltip.screen_pos.1 / pixels_per_point,
    );

    egui::Area::new(egui::Id::new("hover_tooltip"))
        .fixed_pos(pos)
        .interactable(false)
        .show(ctx, |ui| {
            egui::Frame::none()
                .fill(egui::Color32::from_black_alpha(153))
                .rounding(5.0)
                .inner_margin(5.0)
                .show(ui, |ui| {
                    ui.label(egui::RichText::new(&tooltip.text).color(egui::Color32::WHITE));
                });
        });
}
