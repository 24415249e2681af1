//! Image decoding for material textures

use std::path::Path;

use crate::error::AssetError;

/// GPU-facing pixel layout chosen from an image's channel count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    R8,
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    pub fn from_channels(channels: u8) -> Option<Self> {
        match channels {
            1 => Some(PixelFormat::R8),
            3 => Some(PixelFormat::Rgb8),
            4 => Some(PixelFormat::Rgba8),
            _ => None,
        }
    }
}

/// Tightly packed 8-bit pixels, rows top to bottom
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// 1 = single channel, 3 = RGB, 4 = RGBA
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn format(&self) -> Option<PixelFormat> {
        PixelFormat::from_channels(self.channels)
    }

    /// Pixels widened to RGBA; single-channel images are replicated into RGB
    pub fn to_rgba8(&self) -> Vec<u8> {
        match self.channels {
            4 => self.pixels.clone(),
            3 => self
                .pixels
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 255])
                .collect(),
            _ => self
                .pixels
                .iter()
                .flat_map(|&v| [v, v, v, 255])
                .collect(),
        }
    }
}

/// Turns an image file into pixels
pub trait ImageDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, AssetError>;
}

/// [`ImageDecoder`] backed by the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFileDecoder {
    /// Flip rows so the first row is the bottom of the image, as
    /// bottom-left texture coordinates expect
    pub flip_vertically: bool,
}

impl ImageFileDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flip_vertically(mut self, flip: bool) -> Self {
        self.flip_vertically = flip;
        self
    }
}

impl ImageDecoder for ImageFileDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, AssetError> {
        let mut img = image::open(path).map_err(|err| AssetError::ImageDecode {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        if self.flip_vertically {
            img = img.flipv();
        }

        let (width, height) = (img.width(), img.height());
        let (channels, pixels) = match img.color().channel_count() {
            1 => (1, img.into_luma8().into_raw()),
            3 => (3, img.into_rgb8().into_raw()),
            // Luma+alpha and wider formats are normalized to RGBA8
            _ => (4, img.into_rgba8().into_raw()),
        };

        Ok(DecodedImage {
            width,
            height,
            channels,
            pixels,
        })
    }
}
