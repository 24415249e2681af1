//! Per-model texture deduplication
//!
//! While a model loads, several sub-meshes often reference the same image.
//! [`TextureCache`] makes sure each distinct path is decoded and uploaded
//! once; later references get the handle created the first time.

use std::collections::HashMap;
use std::fmt;

use super::image_decoder::{DecodedImage, ImageDecoder};

/// Opaque reference to a texture created by a [`TextureFactory`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Semantic role of a material texture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Diffuse,
    Specular,
    Normal,
    Height,
}

impl TextureKind {
    /// Prefix of the sampler uniform name, e.g. `texture_diffuse` in
    /// `material.texture_diffuse1`
    pub fn uniform_prefix(self) -> &'static str {
        match self {
            TextureKind::Diffuse => "texture_diffuse",
            TextureKind::Specular => "texture_specular",
            TextureKind::Normal => "texture_normal",
            TextureKind::Height => "texture_height",
        }
    }
}

impl fmt::Display for TextureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TextureKind::Diffuse => "diffuse",
            TextureKind::Specular => "specular",
            TextureKind::Normal => "normal",
            TextureKind::Height => "height",
        };
        f.write_str(name)
    }
}

/// GPU texture creation primitive
///
/// Implementations apply a fixed sampling policy: mipmaps, repeat wrapping,
/// trilinear minification and linear magnification.
pub trait TextureFactory {
    /// Creates a texture from decoded pixels, or a placeholder when `image` is `None`
    fn create_texture(&mut self, image: Option<&DecodedImage>, label: &str) -> TextureHandle;
}

/// A texture as resolved for one mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshTexture {
    pub handle: TextureHandle,
    pub kind: TextureKind,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    path: String,
    texture: MeshTexture,
}

/// Path-keyed texture cache owned by a single model
#[derive(Debug, Default)]
pub struct TextureCache {
    entries: Vec<CacheEntry>,
    by_path: HashMap<String, usize>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached texture for `path`, decoding and uploading it on first use
    ///
    /// A path keeps the tag it was first loaded with. A decode failure is
    /// logged and still produces (and caches) a placeholder texture so the
    /// mesh remains drawable.
    pub fn load_or_reuse(
        &mut self,
        path: &str,
        kind: TextureKind,
        decoder: &dyn ImageDecoder,
        factory: &mut dyn TextureFactory,
    ) -> MeshTexture {
        if let Some(&index) = self.by_path.get(path) {
            return self.entries[index].texture;
        }

        let image = match decoder.decode(std::path::Path::new(path)) {
            Ok(image) => Some(image),
            Err(err) => {
                log::warn!("texture {} failed to load, using placeholder: {}", path, err);
                None
            }
        };

        let handle = factory.create_texture(image.as_ref(), path);
        let texture = MeshTexture { handle, kind };
        log::debug!("loaded {} texture '{}' as {:?}", kind, path, handle);

        self.by_path.insert(path.to_string(), self.entries.len());
        self.entries.push(CacheEntry {
            path: path.to_string(),
            texture,
        });
        texture
    }

    pub fn get(&self, path: &str) -> Option<MeshTexture> {
        self.by_path.get(path).map(|&index| self.entries[index].texture)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached paths in load order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.path.as_str())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::AssetError;
    use std::cell::RefCell;
    use std::path::{Path, PathBuf};

    /// Decoder that serves 1x1 images for any path not listed as broken
    #[derive(Default)]
    pub(crate) struct CountingDecoder {
        pub broken: Vec<String>,
        pub decoded: RefCell<Vec<PathBuf>>,
    }

    impl ImageDecoder for CountingDecoder {
        fn decode(&self, path: &Path) -> Result<DecodedImage, AssetError> {
            self.decoded.borrow_mut().push(path.to_path_buf());
            if self.broken.iter().any(|b| Path::new(b) == path) {
                return Err(AssetError::ImageDecode {
                    path: path.to_path_buf(),
                    reason: "corrupt".to_string(),
                });
            }
            Ok(DecodedImage {
                width: 1,
                height: 1,
                channels: 4,
                pixels: vec![255; 4],
            })
        }
    }

    /// Factory that hands out sequential handles and remembers what it got
    #[derive(Default)]
    pub(crate) struct CountingFactory {
        pub created: Vec<(String, bool)>,
    }

    impl TextureFactory for CountingFactory {
        fn create_texture(&mut self, image: Option<&DecodedImage>, label: &str) -> TextureHandle {
            self.created.push((label.to_string(), image.is_some()));
            TextureHandle(self.created.len() as u32 - 1)
        }
    }

    #[test]
    fn test_same_path_is_decoded_once() {
        let decoder = CountingDecoder::default();
        let mut factory = CountingFactory::default();
        let mut cache = TextureCache::new();

        let first = cache.load_or_reuse("wood.png", TextureKind::Diffuse, &decoder, &mut factory);
        let second = cache.load_or_reuse("wood.png", TextureKind::Diffuse, &decoder, &mut factory);

        assert_eq!(first, second);
        assert_eq!(decoder.decoded.borrow().len(), 1);
        assert_eq!(factory.created.len(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_distinct_paths_get_distinct_handles() {
        let decoder = CountingDecoder::default();
        let mut factory = CountingFactory::default();
        let mut cache = TextureCache::new();

        let diffuse = cache.load_or_reuse("d.png", TextureKind::Diffuse, &decoder, &mut factory);
        let specular = cache.load_or_reuse("s.png", TextureKind::Specular, &decoder, &mut factory);

        assert_ne!(diffuse.handle, specular.handle);
        assert_eq!(specular.kind, TextureKind::Specular);
        assert_eq!(cache.paths().collect::<Vec<_>>(), vec!["d.png", "s.png"]);
    }

    #[test]
    fn test_reuse_keeps_first_tag() {
        let decoder = CountingDecoder::default();
        let mut factory = CountingFactory::default();
        let mut cache = TextureCache::new();

        cache.load_or_reuse("shared.png", TextureKind::Diffuse, &decoder, &mut factory);
        let again = cache.load_or_reuse("shared.png", TextureKind::Specular, &decoder, &mut factory);
        assert_eq!(again.kind, TextureKind::Diffuse);
    }

    #[test]
    fn test_decode_failure_still_allocates_placeholder() {
        let decoder = CountingDecoder {
            broken: vec!["missing.png".to_string()],
            ..Default::default()
        };
        let mut factory = CountingFactory::default();
        let mut cache = TextureCache::new();

        let texture = cache.load_or_reuse("missing.png", TextureKind::Diffuse, &decoder, &mut factory);
        assert_eq!(factory.created, vec![("missing.png".to_string(), false)]);
        assert_eq!(cache.get("missing.png"), Some(texture));

        // The failure is cached like any other texture
        cache.load_or_reuse("missing.png", TextureKind::Diffuse, &decoder, &mut factory);
        assert_eq!(decoder.decoded.borrow().len(), 1);
    }

    #[test]
    fn test_uniform_prefixes() {
        assert_eq!(TextureKind::Diffuse.uniform_prefix(), "texture_diffuse");
        assert_eq!(TextureKind::Height.to_string(), "height");
    }
}
