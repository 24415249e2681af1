//! Shader program interface
//!
//! The scene talks to GPU programs only through [`ShaderProgram`]: activate,
//! set named uniforms, dispatch a mesh draw. Uniform names that do not
//! resolve to an active uniform are ignored, so callers can upload the
//! standard set (`model`, `view`, `projection`, `viewPos`) to any program.
//!
//! [`UniformLayout`] and [`UniformBlock`] give backends a CPU-side std140
//! block that resolves those names to byte offsets.

pub mod program;
pub mod uniform_block;

pub use program::{ShaderProgram, UniformValue};
pub use uniform_block::{UniformBlock, UniformKind, UniformLayout};
