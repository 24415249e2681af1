//! # Scene Management Module
//!
//! An ordered list of renderable entries, each pairing a model handle with a
//! model-to-world transform, a shader handle and vec3 uniform overrides.
//!
//! ## Key Components
//!
//! - [`Scene`] - Entry list plus the camera matrices of the last refresh
//! - [`SceneEntry`] - What to draw, where, and with which shader
//! - [`PickResult`] - Nearest entry under a screen point
//!
//! ## Usage
//!
//! ```no_run
//! use vantage::gfx::arena::Arena;
//! use vantage::gfx::camera::FlyCamera;
//! use vantage::gfx::model::Model;
//! use vantage::gfx::rendering::GpuShader;
//! use vantage::gfx::scene::Scene;
//!
//! let camera = FlyCamera::default();
//! let models: Arena<Model> = Arena::new();
//! let mut scene: Scene<GpuShader> = Scene::new();
//!
//! // Once per frame, before picking or drawing
//! scene.refresh_matrices(&camera, 800.0, 600.0);
//! let hit = scene.pick_closest(400.0, 300.0, 800.0, 600.0, &models);
//! ```

pub mod scene;

// Re-export main types
pub use scene::{PickResult, Scene, SceneEntry, Vec3Uniform, PICK_RANGE, Z_FAR, Z_NEAR};
