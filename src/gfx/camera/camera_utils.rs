use winit::event::WindowEvent;

use super::{camera_controller::InputController, fly_camera::FlyCamera};

/// Camera together with the input controller that drives it
pub struct CameraManager {
    pub camera: FlyCamera,
    pub controller: InputController,
}

impl CameraManager {
    pub fn new(camera: FlyCamera, controller: InputController) -> Self {
        Self { camera, controller }
    }

    pub fn process_event(&mut self, event: &WindowEvent) -> bool {
        self.controller.process_window_event(event)
    }

    /// Applies this frame's accumulated input to the camera
    pub fn update(&mut self, delta_time: f32) {
        self.controller.apply(&mut self.camera, delta_time);
    }
}
