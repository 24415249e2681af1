//! # Vantage Prelude
//!
//! Commonly used types in one import:
//!
//! ```no_run
//! use vantage::prelude::*;
//!
//! let mut scene: Scene<GpuShader> = Scene::new();
//! let camera = FlyCamera::default();
//! scene.refresh_matrices(&camera, 800.0, 600.0);
//! ```

// Re-export core application types
pub use crate::app::ViewerApp;
pub use crate::config::ViewerConfig;
pub use crate::error::{AssetError, RenderError};

// Re-export graphics and scene types
pub use crate::gfx::arena::{Arena, Handle};
pub use crate::gfx::camera::{CameraManager, CameraMovement, FlyCamera, InputController};
pub use crate::gfx::model::{AssetImporter, Mesh, Model, ObjImporter, Vertex3D};
pub use crate::gfx::picking::{BoundingExtent, Ray};
pub use crate::gfx::rendering::{GpuShader, RenderEngine};
pub use crate::gfx::resources::{ImageDecoder, ImageFileDecoder, TextureCache, TextureFactory, TextureKind};
pub use crate::gfx::scene::{PickResult, Scene, SceneEntry};
pub use crate::gfx::shader::{ShaderProgram, UniformValue};

// Re-export math types
pub use cgmath::{Deg, Matrix4, Point3, Vector3};
