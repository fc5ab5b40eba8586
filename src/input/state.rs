//! Input state management
//!
//! Polls macroquad once per frame: key presses become [`ViewerAction`]s,
//! left-button drag and the wheel drive the orbit camera.

use macroquad::prelude::*;
use super::{action_for_key, ViewerAction};

/// Zoom change per wheel notch (sign only; units differ per platform)
const WHEEL_ZOOM_STEP: f32 = 0.1;

#[derive(Debug, Default)]
pub struct InputState {
    last_mouse: Option<Vec2>,
    actions: Vec<ViewerAction>,
    /// Mouse movement while dragging this frame (pixels)
    pub drag: Vec2,
    /// Zoom factor for this frame (1.0 = none)
    pub zoom: f32,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            ..Self::default()
        }
    }

    /// Call once per frame before reading actions. `ui_hovered` suppresses
    /// orbiting while the pointer is over a slider window.
    pub fn poll(&mut self, ui_hovered: bool) {
        self.actions.clear();
        let mut pressed: Vec<KeyCode> = get_keys_pressed().into_iter().collect();
        // HashSet order is arbitrary; keep a stable order within a frame
        pressed.sort_by_key(|k| *k as u32);
        self.actions.extend(pressed.into_iter().filter_map(action_for_key));

        let mouse = Vec2::from(mouse_position());
        self.drag = Vec2::ZERO;
        if is_mouse_button_down(MouseButton::Left) && !ui_hovered {
            if let Some(last) = self.last_mouse {
                self.drag = mouse - last;
            }
            self.last_mouse = Some(mouse);
        } else {
            self.last_mouse = None;
        }

        let (_, wheel_y) = mouse_wheel();
        self.zoom = if wheel_y > 0.0 {
            1.0 - WHEEL_ZOOM_STEP
        } else if wheel_y < 0.0 {
            1.0 + WHEEL_ZOOM_STEP
        } else {
            1.0
        };
    }

    /// Actions from keys pressed this frame
    pub fn actions(&self) -> &[ViewerAction] {
        &self.actions
    }
}
