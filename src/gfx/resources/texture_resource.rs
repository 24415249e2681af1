//! Texture resource management for wgpu
//!
//! Provides GPU textures for material maps (with a CPU-built mip chain) and
//! the depth buffer used by the render engine.

use std::sync::Arc;

use crate::error::AssetError;

use super::image_decoder::{DecodedImage, PixelFormat};
use super::texture_cache::{TextureFactory, TextureHandle};

/// Colour used for textures whose image could not be decoded
const PLACEHOLDER_RGBA: [u8; 4] = [255, 0, 255, 255];

/// GPU texture resource containing texture, view, and sampler
#[derive(Clone)]
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    /// Standard depth buffer format used throughout the engine
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Creates a depth texture matching the surface configuration
    pub fn create_depth_texture(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        label: &str,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            lod_min_clamp: 0.0,
            lod_max_clamp: 100.0,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// Uploads a decoded image with a full mip chain
    ///
    /// Single-channel images become `R8Unorm`; RGB and RGBA images become
    /// `Rgba8UnormSrgb`. Sampling repeats on every axis, filters linearly
    /// and blends between mip levels.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &DecodedImage,
        label: &str,
    ) -> Self {
        let (format, channels, base) = match image.format() {
            Some(PixelFormat::R8) => (wgpu::TextureFormat::R8Unorm, 1, image.pixels.clone()),
            _ => (wgpu::TextureFormat::Rgba8UnormSrgb, 4, image.to_rgba8()),
        };
        let levels = build_mip_chain(base, image.width.max(1), image.height.max(1), channels);

        let size = wgpu::Extent3d {
            width: image.width.max(1),
            height: image.height.max(1),
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: levels.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip_level, level) in levels.iter().enumerate() {
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &texture,
                    mip_level: mip_level as u32,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                &level.pixels,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(channels * level.width),
                    rows_per_image: Some(level.height),
                },
                wgpu::Extent3d {
                    width: level.width,
                    height: level.height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some(&format!("{} Sampler", label)),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
        }
    }

    /// 1x1 magenta texture standing in for images that failed to decode
    pub fn placeholder(device: &wgpu::Device, queue: &wgpu::Queue, label: &str) -> Self {
        let image = DecodedImage {
            width: 1,
            height: 1,
            channels: 4,
            pixels: PLACEHOLDER_RGBA.to_vec(),
        };
        Self::from_image(device, queue, &image, label)
    }
}

/// One level of a mip chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipLevel {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Builds every mip level down to 1x1 with a 2x2 box filter
///
/// Odd edges clamp to the last row/column.
pub fn build_mip_chain(base: Vec<u8>, width: u32, height: u32, channels: u32) -> Vec<MipLevel> {
    let mut levels = vec![MipLevel {
        width,
        height,
        pixels: base,
    }];

    while let Some(last) = levels.last() {
        if last.width == 1 && last.height == 1 {
            break;
        }
        let next = downsample(last, channels as usize);
        levels.push(next);
    }

    levels
}

fn downsample(level: &MipLevel, channels: usize) -> MipLevel {
    let width = (level.width / 2).max(1);
    let height = (level.height / 2).max(1);
    let src_w = level.width as usize;
    let src_h = level.height as usize;

    let mut pixels = Vec::with_capacity(width as usize * height as usize * channels);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let x0 = (x * 2).min(src_w - 1);
            let x1 = (x * 2 + 1).min(src_w - 1);
            let y0 = (y * 2).min(src_h - 1);
            let y1 = (y * 2 + 1).min(src_h - 1);

            for c in 0..channels {
                let sample = |sx: usize, sy: usize| level.pixels[(sy * src_w + sx) * channels + c] as u32;
                let sum = sample(x0, y0) + sample(x1, y0) + sample(x0, y1) + sample(x1, y1);
                pixels.push(((sum + 2) / 4) as u8);
            }
        }
    }

    MipLevel {
        width,
        height,
        pixels,
    }
}

/// Owns the GPU textures created for models and resolves their handles
pub struct GpuTextureStore {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    textures: Vec<TextureResource>,
}

impl GpuTextureStore {
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        Self {
            device,
            queue,
            textures: Vec::new(),
        }
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&TextureResource> {
        self.textures.get(handle.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl TextureFactory for GpuTextureStore {
    fn create_texture(&mut self, image: Option<&DecodedImage>, label: &str) -> TextureHandle {
        let resource = match image {
            Some(image) if image.format().is_some() => {
                TextureResource::from_image(&self.device, &self.queue, image, label)
            }
            Some(image) => {
                let err = AssetError::UnsupportedChannels {
                    path: label.into(),
                    channels: image.channels,
                };
                log::warn!("{}, using placeholder", err);
                TextureResource::placeholder(&self.device, &self.queue, label)
            }
            None => TextureResource::placeholder(&self.device, &self.queue, label),
        };

        self.textures.push(resource);
        TextureHandle(self.textures.len() as u32 - 1)
    }
}
