//! Core rendering functionality
//!
//! Handles the model pipeline, GPU uniform recording and frame rendering.

pub mod gpu_shader;
pub mod render_engine;

// Re-export main types
pub use gpu_shader::{model_uniform_layout, DrawCommand, GpuShader, DIFFUSE_SAMPLER};
pub use render_engine::RenderEngine;
