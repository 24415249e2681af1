// src/lib.rs
//! Vantage 3D scene viewer
//!
//! A fly-camera model viewer built on wgpu and winit: OBJ models with
//! per-model texture caching, screen-space ray picking against oriented
//! bounding boxes, and a shader-agnostic draw path.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod prelude;

// Re-export main types for convenience
pub use app::ViewerApp;
pub use config::ViewerConfig;
pub use error::{AssetError, RenderError};
