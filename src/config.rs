//! Viewer configuration
//!
//! Built with `Default` plus `with_*` methods, for example:
//!
//! ```no_run
//! use vantage::config::ViewerConfig;
//!
//! let config = ViewerConfig::default()
//!     .with_title("Backpack")
//!     .with_window_size(1600, 900)
//!     .with_model_path("assets/backpack/backpack.obj");
//! ```

use std::path::PathBuf;

use cgmath::{Matrix4, Point3, SquareMatrix, Vector3};

use crate::gfx::model::ObjImporter;

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub camera_position: Point3<f32>,
    /// Degrees; -90 looks down -Z
    pub camera_yaw: f32,
    pub camera_pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    pub clear_color: [f64; 3],
    pub model_path: Option<PathBuf>,
    pub model_transform: Matrix4<f32>,
    /// Uploaded as the `tint` uniform for the model's scene entry
    pub model_tint: Option<Vector3<f32>>,
    pub importer: ObjImporter,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Vantage".to_string(),
            width: 1200,
            height: 800,
            camera_position: Point3::new(0.0, 0.0, 3.0),
            camera_yaw: -90.0,
            camera_pitch: 0.0,
            movement_speed: 2.5,
            mouse_sensitivity: 0.1,
            clear_color: [0.1, 0.2, 0.3],
            model_path: None,
            model_transform: Matrix4::identity(),
            model_tint: None,
            // Images upload top row first, OBJ texture space starts at the bottom
            importer: ObjImporter::new().with_flip_v(true),
        }
    }
}

impl ViewerConfig {
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_owned();
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    /// Initial camera pose; angles in degrees
    pub fn with_camera(mut self, position: Point3<f32>, yaw: f32, pitch: f32) -> Self {
        self.camera_position = position;
        self.camera_yaw = yaw;
        self.camera_pitch = pitch;
        self
    }

    pub fn with_movement_speed(mut self, speed: f32) -> Self {
        self.movement_speed = speed;
        self
    }

    pub fn with_mouse_sensitivity(mut self, sensitivity: f32) -> Self {
        self.mouse_sensitivity = sensitivity;
        self
    }

    pub fn with_clear_color(mut self, r: f64, g: f64, b: f64) -> Self {
        self.clear_color = [r, g, b];
        self
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    pub fn with_model_transform(mut self, transform: Matrix4<f32>) -> Self {
        self.model_transform = transform;
        self
    }

    pub fn with_model_tint(mut self, tint: Vector3<f32>) -> Self {
        self.model_tint = Some(tint);
        self
    }

    pub fn with_importer(mut self, importer: ObjImporter) -> Self {
        self.importer = importer;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_look_down_negative_z() {
        let config = ViewerConfig::default();
        assert_eq!(config.camera_yaw, -90.0);
        assert_eq!(config.camera_pitch, 0.0);
        assert!(config.importer.flip_v);
        assert!(config.model_path.is_none());
    }

    #[test]
    fn test_builder_overrides() {
        let config = ViewerConfig::default()
            .with_title("Crate")
            .with_window_size(0, 600)
            .with_camera(Point3::new(1.0, 2.0, 3.0), 0.0, -10.0)
            .with_clear_color(0.0, 0.0, 0.0)
            .with_model_path("crate.obj")
            .with_model_tint(Vector3::new(1.0, 0.5, 0.5));

        assert_eq!(config.title, "Crate");
        assert_eq!((config.width, config.height), (1, 600));
        assert_eq!(config.camera_position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(config.camera_pitch, -10.0);
        assert_eq!(config.clear_color, [0.0, 0.0, 0.0]);
        assert_eq!(config.model_path, Some(PathBuf::from("crate.obj")));
        assert_eq!(config.model_tint, Some(Vector3::new(1.0, 0.5, 0.5)));
    }
}
