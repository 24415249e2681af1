//! Error types for asset loading
//!
//! Everything that can fail while turning files on disk into models and
//! textures is reported through [`AssetError`]. Rendering and picking never
//! fail; see the scene module for how stale state is treated.

use std::path::PathBuf;

/// Failure while importing a model or decoding one of its textures
#[derive(Debug, Clone, thiserror::Error)]
pub enum AssetError {
    /// The importer could not read or parse the model file
    #[error("failed to import '{path}': {reason}")]
    Import { path: PathBuf, reason: String },

    /// The importer produced a scene without a root node
    #[error("'{path}' produced no scene root")]
    MissingRoot { path: PathBuf },

    /// An image file could not be decoded
    #[error("failed to decode image '{path}': {reason}")]
    ImageDecode { path: PathBuf, reason: String },

    /// The decoded image uses a channel layout the texture upload cannot map
    #[error("unsupported channel count {channels} in '{path}'")]
    UnsupportedChannels { path: PathBuf, channels: u8 },
}

impl AssetError {
    /// Path of the file that caused the failure
    pub fn path(&self) -> &std::path::Path {
        match self {
            AssetError::Import { path, .. }
            | AssetError::MissingRoot { path }
            | AssetError::ImageDecode { path, .. }
            | AssetError::UnsupportedChannels { path, .. } => path,
        }
    }
}

/// Failure while bringing up the wgpu device and window surface
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("surface reports no supported texture formats")]
    NoSurfaceFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_file() {
        let err = AssetError::MissingRoot {
            path: PathBuf::from("models/crate.obj"),
        };
        assert_eq!(err.to_string(), "'models/crate.obj' produced no scene root");
        assert_eq!(err.path(), std::path::Path::new("models/crate.obj"));

        let err = AssetError::UnsupportedChannels {
            path: PathBuf::from("a.png"),
            channels: 2,
        };
        assert!(err.to_string().contains("channel count 2"));
    }
}
