//! Mouse and keyboard handling for the orbit camera.
//!
//! Left drag orbits the camera around its target, right drag turns it in
//! place and the wheel dollies toward the target. Holding any button grabs
//! the cursor.

use orrery_render::Camera;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};
use winit::keyboard::Key;
use winit::window::{CursorGrabMode, Window};

/// Pixels of a touchpad scroll that count as one wheel line.
const PIXELS_PER_LINE: f64 = 40.0;

/// Something the controller cannot do itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    GrabCursor,
    ReleaseCursor,
    ToggleWireframe,
    Relevel,
}

/// Turns window and device events into camera motion.
#[derive(Debug, Clone)]
pub struct CameraController {
    orbit_sensitivity: f64,
    dolly_sensitivity: f64,
    left: bool,
    right: bool,
}

impl CameraController {
    pub fn new(orbit_sensitivity: f64, dolly_sensitivity: f64) -> Self {
        Self {
            orbit_sensitivity,
            dolly_sensitivity,
            left: false,
            right: false,
        }
    }

    /// Track drag buttons. Any press grabs the cursor, any release frees it.
    pub fn on_mouse_button(&mut self, button: MouseButton, state: ElementState) -> InputAction {
        let pressed = state.is_pressed();
        match button {
            MouseButton::Left => self.left = pressed,
            MouseButton::Right => self.right = pressed,
            _ => {}
        }
        if pressed {
            InputAction::GrabCursor
        } else {
            InputAction::ReleaseCursor
        }
    }

    /// Raw mouse motion in pixels. Screen Y grows downward, so moving the
    /// mouse up pitches up.
    pub fn on_mouse_motion(&self, dx: f64, dy: f64, camera: &mut Camera) {
        let yaw = -dx * self.orbit_sensitivity;
        let pitch = -dy * self.orbit_sensitivity;
        if self.left {
            camera.orbit(yaw, pitch);
        } else if self.right {
            camera.rotate(yaw, pitch);
        }
    }

    /// Scrolling away from the user moves the camera closer.
    pub fn on_scroll(&self, delta: MouseScrollDelta, camera: &mut Camera) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => f64::from(y),
            MouseScrollDelta::PixelDelta(pos) => pos.y / PIXELS_PER_LINE,
        };
        if lines != 0.0 {
            camera.dolly(lines * self.dolly_sensitivity);
        }
    }

    /// `w` toggles wireframe, `c` re-levels the camera. Key repeat is ignored.
    pub fn on_key(&self, key: &Key, state: ElementState, repeat: bool) -> Option<InputAction> {
        if !state.is_pressed() || repeat {
            return None;
        }
        match key {
            Key::Character(c) if c.as_str() == "w" => Some(InputAction::ToggleWireframe),
            Key::Character(c) if c.as_str() == "c" => Some(InputAction::Relevel),
            _ => None,
        }
    }

    /// True while a drag button is held.
    pub fn is_dragging(&self) -> bool {
        self.left || self.right
    }
}

/// Hide and lock the cursor, or show and free it.
pub fn set_cursor_grabbed(window: &Window, grabbed: bool) {
    if grabbed {
        if window.set_cursor_grab(CursorGrabMode::Locked).is_err()
            && let Err(err) = window.set_cursor_grab(CursorGrabMode::Confined)
        {
            tracing::debug!("Cursor grab unavailable: {err}");
        }
        window.set_cursor_visible(false);
    } else {
        if let Err(err) = window.set_cursor_grab(CursorGrabMode::None) {
            tracing::debug!("Cursor release failed: {err}");
        }
        window.set_cursor_visible(true);
    }
}
