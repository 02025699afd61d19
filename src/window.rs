//! Pointer input tracking with winit.

use std::collections::HashSet;
use winit::event::{MouseButton, MouseScrollDelta, WindowEvent};

/// Pointer input state accumulated between frames.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Absolute cursor position (x, y) in physical pixels.
    pub cursor_pos: (f64, f64),
    /// Cursor delta accumulated this frame.
    pub cursor_delta: (f64, f64),
    /// Mouse buttons currently held.
    pub mouse_buttons: HashSet<MouseButton>,
    /// Scroll delta accumulated this frame.
    pub scroll_delta: f32,
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a mouse button is currently pressed.
    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    /// Reset per-frame accumulators (deltas and scroll).
    pub fn reset_frame(&mut self) {
        self.cursor_delta = (0.0, 0.0);
        self.scroll_delta = 0.0;
    }

    /// Handle a window event and update state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        use winit::event::ElementState;

        match event {
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => {
                    self.mouse_buttons.insert(*button);
                }
                ElementState::Released => {
                    self.mouse_buttons.remove(button);
                }
            },
            WindowEvent::CursorMoved { position, .. } => {
                let new_pos = (position.x, position.y);
                self.cursor_delta.0 += new_pos.0 - self.cursor_pos.0;
                self.cursor_delta.1 += new_pos.1 - self.cursor_pos.1;
                self.cursor_pos = new_pos;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match *delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => (pos.y / 120.0) as f32,
                };
                self.scroll_delta += scroll;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_frame_clears_accumulators() {
        let mut input = InputState::new();
        input.cursor_delta = (5.0, -3.0);
        input.scroll_delta = 2.0;
        input.cursor_pos = (100.0, 200.0);

        input.reset_frame();

        assert_eq!(input.cursor_delta, (0.0, 0.0));
        assert_eq!(input.scroll_delta, 0.0);
        // Absolute position survives the frame boundary
        assert_eq!(input.cursor_pos, (100.0, 200.0));
    }
}
