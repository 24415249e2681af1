// src/gfx/resources/mod.rs
//! Texture resources
//!
//! Image decoding, the per-model texture cache and the wgpu textures behind
//! its handles.

pub mod image_decoder;
pub mod texture_cache;
pub mod texture_resource;

// Re-export main types
pub use image_decoder::{DecodedImage, ImageDecoder, ImageFileDecoder, PixelFormat};
pub use texture_cache::{MeshTexture, TextureCache, TextureFactory, TextureHandle, TextureKind};
pub use texture_resource::{GpuTextureStore, TextureResource};
