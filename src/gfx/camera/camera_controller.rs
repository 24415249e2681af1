use std::collections::HashSet;

use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::fly_camera::{CameraMovement, FlyCamera};

/// Pixels of scroll treated as one wheel line
const PIXELS_PER_LINE: f32 = 40.0;

/// Translates window input into camera updates and pick requests
///
/// All cursor and button state that a callback-driven window loop would
/// otherwise keep in globals lives here and is applied once per frame with
/// [`InputController::apply`].
pub struct InputController {
    pub constrain_pitch: bool,
    held_movement: HashSet<CameraMovement>,
    last_cursor: Option<(f32, f32)>,
    cursor: (f32, f32),
    pending_look: (f32, f32),
    pending_zoom: f32,
    pending_click: Option<(f32, f32)>,
    is_look_pressed: bool,
}

impl InputController {
    pub fn new() -> Self {
        Self {
            constrain_pitch: true,
            held_movement: HashSet::new(),
            last_cursor: None,
            cursor: (0.0, 0.0),
            pending_look: (0.0, 0.0),
            pending_zoom: 0.0,
            pending_click: None,
            is_look_pressed: false,
        }
    }

    /// Feeds one winit window event; returns true if it was consumed
    pub fn process_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::KeyboardInput { event, .. } => match event.physical_key {
                PhysicalKey::Code(code) => self.handle_key(code, event.state),
                PhysicalKey::Unidentified(_) => false,
            },
            WindowEvent::CursorMoved {
                position: PhysicalPosition { x, y },
                ..
            } => {
                self.handle_cursor_moved(*x as f32, *y as f32);
                true
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.handle_mouse_button(*button, *state);
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => {
                        *y as f32 / PIXELS_PER_LINE
                    }
                };
                self.handle_scroll(lines);
                true
            }
            _ => false,
        }
    }

    pub fn handle_key(&mut self, code: KeyCode, state: ElementState) -> bool {
        let movement = match code {
            KeyCode::KeyW => CameraMovement::Forward,
            KeyCode::KeyS => CameraMovement::Backward,
            KeyCode::KeyA => CameraMovement::Left,
            KeyCode::KeyD => CameraMovement::Right,
            KeyCode::Space => CameraMovement::Up,
            KeyCode::ControlLeft => CameraMovement::Down,
            _ => return false,
        };

        match state {
            ElementState::Pressed => self.held_movement.insert(movement),
            ElementState::Released => self.held_movement.remove(&movement),
        };
        true
    }

    /// Records a cursor position in window pixels (top-left origin)
    ///
    /// The first position only primes the tracker; later ones accumulate look
    /// deltas while the look button is held.
    pub fn handle_cursor_moved(&mut self, x: f32, y: f32) {
        self.cursor = (x, y);

        let (last_x, last_y) = self.last_cursor.unwrap_or((x, y));
        self.last_cursor = Some((x, y));

        if self.is_look_pressed {
            // Window y grows downwards, pitch grows upwards
            self.pending_look.0 += x - last_x;
            self.pending_look.1 += last_y - y;
        }
    }

    /// Right button drags the view; releasing the left button requests a pick
    pub fn handle_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match (button, state) {
            (MouseButton::Right, state) => {
                self.is_look_pressed = state == ElementState::Pressed;
            }
            (MouseButton::Left, ElementState::Released) => {
                self.pending_click = Some(self.cursor);
            }
            _ => {}
        }
    }

    pub fn handle_scroll(&mut self, lines: f32) {
        self.pending_zoom += lines;
    }

    /// Applies held movement and accumulated look/zoom input to the camera
    pub fn apply(&mut self, camera: &mut FlyCamera, delta_time: f32) {
        for movement in &self.held_movement {
            camera.process_movement(*movement, delta_time);
        }

        let (dx, dy) = std::mem::take(&mut self.pending_look);
        if dx != 0.0 || dy != 0.0 {
            camera.process_look(dx, dy, self.constrain_pitch);
        }

        let zoom = std::mem::take(&mut self.pending_zoom);
        if zoom != 0.0 {
            camera.process_zoom(zoom);
        }
    }

    /// Returns the cursor position of a pending click, once
    pub fn take_click(&mut self) -> Option<(f32, f32)> {
        self.pending_click.take()
    }

    /// Last cursor position in window pixels (top-left origin)
    pub fn cursor(&self) -> (f32, f32) {
        self.cursor
    }

    pub fn is_moving(&self) -> bool {
        !self.held_movement.is_empty()
    }
}

impl Default for InputController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Point3};

    #[test]
    fn test_held_keys_move_camera_each_frame() {
        let mut controller = InputController::new();
        let mut camera = FlyCamera::default();
        camera.movement_speed = 1.0;

        assert!(controller.handle_key(KeyCode::KeyW, ElementState::Pressed));
        controller.apply(&mut camera, 1.0);
        controller.apply(&mut camera, 1.0);
        assert!((camera.position - Point3::new(0.0, 0.0, -2.0)).magnitude() < 1e-5);

        controller.handle_key(KeyCode::KeyW, ElementState::Released);
        assert!(!controller.is_moving());
        controller.apply(&mut camera, 1.0);
        assert!((camera.position - Point3::new(0.0, 0.0, -2.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_unmapped_key_is_not_consumed() {
        let mut controller = InputController::new();
        assert!(!controller.handle_key(KeyCode::KeyQ, ElementState::Pressed));
        assert!(!controller.is_moving());
    }

    #[test]
    fn test_first_cursor_event_does_not_rotate() {
        let mut controller = InputController::new();
        let mut camera = FlyCamera::default();
        controller.handle_mouse_button(MouseButton::Right, ElementState::Pressed);

        controller.handle_cursor_moved(400.0, 300.0);
        controller.apply(&mut camera, 0.016);
        assert_eq!(camera.yaw(), FlyCamera::default().yaw());

        controller.handle_cursor_moved(410.0, 280.0);
        controller.apply(&mut camera, 0.016);
        // 10px right and 20px up, scaled by the default sensitivity
        assert!((camera.yaw() - (FlyCamera::default().yaw() + 1.0)).abs() < 1e-4);
        assert!((camera.pitch() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_cursor_moves_without_look_button_only_track_position() {
        let mut controller = InputController::new();
        let mut camera = FlyCamera::default();

        controller.handle_cursor_moved(10.0, 10.0);
        controller.handle_cursor_moved(200.0, 50.0);
        controller.apply(&mut camera, 0.016);

        assert_eq!(camera.pitch(), 0.0);
        assert_eq!(controller.cursor(), (200.0, 50.0));
    }

    #[test]
    fn test_left_release_queues_single_click() {
        let mut controller = InputController::new();
        controller.handle_cursor_moved(120.0, 80.0);
        controller.handle_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert_eq!(controller.take_click(), None);

        controller.handle_mouse_button(MouseButton::Left, ElementState::Released);
        assert_eq!(controller.take_click(), Some((120.0, 80.0)));
        assert_eq!(controller.take_click(), None);
    }

    #[test]
    fn test_scroll_zooms_camera() {
        let mut controller = InputController::new();
        let mut camera = FlyCamera::default();

        controller.handle_scroll(2.0);
        controller.handle_scroll(3.0);
        controller.apply(&mut camera, 0.016);
        assert_eq!(camera.zoom(), 40.0);
    }
}
