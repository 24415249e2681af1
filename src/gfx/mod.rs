//! # Graphics Module
//!
//! Camera, models, picking, scene composition and the wgpu backend.
//!
//! ## Architecture Overview
//!
//! - **Camera System** ([`camera`]) - Fly camera and the input controller driving it
//! - **Models** ([`model`]) - OBJ import, meshes, per-model bounding extents
//! - **Resources** ([`resources`]) - Image decoding, texture cache, GPU textures
//! - **Picking** ([`picking`]) - Screen rays and the ray/OBB slab test
//! - **Scene Management** ([`scene`]) - Entry list, pick resolution and draw order
//! - **Shaders** ([`shader`]) - The [`ShaderProgram`](shader::ShaderProgram) interface
//! - **Rendering Pipeline** ([`rendering`]) - wgpu device, pipeline and frame submission
//!
//! Models and shaders are stored in [`arena::Arena`]s owned by the host; the
//! scene only keeps handles into them.

pub mod arena;
pub mod camera;
pub mod model;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod shader;

// Re-export commonly used types
pub use camera::FlyCamera;
pub use rendering::render_engine::RenderEngine;
pub use scene::Scene;
