use std::path::Path;

use cgmath::Vector3;

use crate::error::AssetError;
use crate::gfx::picking::BoundingExtent;
use crate::gfx::resources::{ImageDecoder, MeshTexture, TextureCache, TextureFactory};
use crate::gfx::shader::ShaderProgram;

use super::importer::{AssetImporter, MeshRecord};
use super::mesh::Mesh;

/// A loaded model: its sub-meshes, their textures and a local bounding extent
#[derive(Debug, Default)]
pub struct Model {
    meshes: Vec<Mesh>,
    textures: TextureCache,
    extent: Option<BoundingExtent>,
    loaded: bool,
}

impl Model {
    /// Imports `path` and resolves every referenced texture
    ///
    /// Textures are decoded once per distinct path. The extent covers every
    /// vertex position of every sub-mesh, in model space.
    pub fn load(
        path: impl AsRef<Path>,
        importer: &dyn AssetImporter,
        decoder: &dyn ImageDecoder,
        factory: &mut dyn TextureFactory,
    ) -> Result<Self, AssetError> {
        let path = path.as_ref();

        let scene = importer.import(path).map_err(|err| {
            log::error!("failed to import model: {}", err);
            err
        })?;
        let root = scene.root.ok_or_else(|| {
            let err = AssetError::MissingRoot {
                path: path.to_path_buf(),
            };
            log::error!("failed to import model: {}", err);
            err
        })?;

        let mut records: Vec<&MeshRecord> = Vec::new();
        root.walk_meshes(&mut |record| records.push(record));

        let mut model = Model {
            loaded: true,
            ..Default::default()
        };

        for record in records {
            let textures: Vec<MeshTexture> = record
                .textures
                .iter()
                .map(|(kind, texture_path)| {
                    model
                        .textures
                        .load_or_reuse(texture_path, *kind, decoder, factory)
                })
                .collect();

            for &position in &record.positions {
                match model.extent.as_mut() {
                    Some(extent) => extent.include(position),
                    None => model.extent = Some(BoundingExtent::from_point(position)),
                }
            }

            model.meshes.push(Mesh::from_record(record, textures));
        }

        log::info!(
            "loaded model {} ({} meshes, {} textures)",
            path.display(),
            model.meshes.len(),
            model.textures.len()
        );

        Ok(model)
    }

    /// Like [`Model::load`], but a failure leaves an empty model behind
    ///
    /// The error has already been logged by `load`.
    pub fn load_or_empty(
        path: impl AsRef<Path>,
        importer: &dyn AssetImporter,
        decoder: &dyn ImageDecoder,
        factory: &mut dyn TextureFactory,
    ) -> Self {
        Self::load(path, importer, decoder, factory).unwrap_or_default()
    }

    /// Builds a model from meshes that are already in memory
    pub fn from_meshes(meshes: Vec<Mesh>) -> Self {
        let extent = BoundingExtent::from_points(
            meshes
                .iter()
                .flat_map(|mesh| mesh.vertices().iter().map(|v| v.position)),
        );

        Self {
            meshes,
            textures: TextureCache::new(),
            extent,
            loaded: true,
        }
    }

    /// `false` for the empty model left by a failed [`Model::load_or_empty`]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn extent(&self) -> Option<&BoundingExtent> {
        self.extent.as_ref()
    }

    pub fn min_extent(&self) -> Option<Vector3<f32>> {
        self.extent.map(|extent| extent.min)
    }

    pub fn max_extent(&self) -> Option<Vector3<f32>> {
        self.extent.map(|extent| extent.max)
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn texture_cache(&self) -> &TextureCache {
        &self.textures
    }

    /// Draws every sub-mesh with `shader`
    pub fn draw(&self, shader: &mut dyn ShaderProgram) {
        for mesh in &self.meshes {
            mesh.draw(shader);
        }
    }

    /// Creates GPU buffers for every sub-mesh
    pub fn upload(&mut self, device: &wgpu::Device) {
        for mesh in &mut self.meshes {
            mesh.upload(device);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::model::importer::{ImportedNode, ImportedScene};
    use crate::gfx::model::Vertex3D;
    use crate::gfx::resources::texture_cache::tests::{CountingDecoder, CountingFactory};
    use crate::gfx::resources::TextureKind;

    /// Importer that hands back a prepared scene for any path
    struct InMemoryImporter(Result<ImportedScene, AssetError>);

    impl AssetImporter for InMemoryImporter {
        fn import(&self, _path: &Path) -> Result<ImportedScene, AssetError> {
            self.0.clone()
        }
    }

    fn record(positions: Vec<[f32; 3]>, textures: &[(TextureKind, &str)]) -> MeshRecord {
        MeshRecord {
            name: "mesh".to_string(),
            indices: (0..positions.len() as u32).collect(),
            positions,
            textures: textures
                .iter()
                .map(|(kind, path)| (*kind, path.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    fn two_level_scene() -> ImportedScene {
        let parent = record(
            vec![[0.0, 2.0, -1.0], [1.0, -3.0, 0.5]],
            &[(TextureKind::Diffuse, "wood.png"), (TextureKind::Specular, "shine.png")],
        );
        let child = record(
            vec![[-4.0, 0.0, 0.25]],
            &[(TextureKind::Diffuse, "wood.png")],
        );

        ImportedScene {
            root: Some(ImportedNode {
                name: "root".to_string(),
                meshes: vec![parent],
                children: vec![ImportedNode {
                    name: "child".to_string(),
                    meshes: vec![child],
                    children: Vec::new(),
                }],
            }),
        }
    }

    #[test]
    fn test_extent_covers_every_mesh() {
        let importer = InMemoryImporter(Ok(two_level_scene()));
        let decoder = CountingDecoder::default();
        let mut factory = CountingFactory::default();

        let model = Model::load("crate.obj", &importer, &decoder, &mut factory).unwrap();

        assert!(model.is_loaded());
        assert_eq!(model.meshes().len(), 2);
        assert_eq!(model.min_extent(), Some(Vector3::new(-4.0, -3.0, -1.0)));
        assert_eq!(model.max_extent(), Some(Vector3::new(1.0, 2.0, 0.5)));
    }

    #[test]
    fn test_shared_texture_is_loaded_once() {
        let importer = InMemoryImporter(Ok(two_level_scene()));
        let decoder = CountingDecoder::default();
        let mut factory = CountingFactory::default();

        let model = Model::load("crate.obj", &importer, &decoder, &mut factory).unwrap();

        assert_eq!(decoder.decoded.borrow().len(), 2);
        assert_eq!(factory.created.len(), 2);
        assert_eq!(model.texture_cache().len(), 2);

        let parent_diffuse = model.meshes()[0].textures()[0];
        let child_diffuse = model.meshes()[1].textures()[0];
        assert_eq!(parent_diffuse.handle, child_diffuse.handle);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let importer = InMemoryImporter(Ok(ImportedScene { root: None }));
        let decoder = CountingDecoder::default();
        let mut factory = CountingFactory::default();

        let err = Model::load("empty.obj", &importer, &decoder, &mut factory).unwrap_err();
        assert!(matches!(err, AssetError::MissingRoot { .. }));
    }

    #[test]
    fn test_load_or_empty_leaves_model_without_extent() {
        let importer = InMemoryImporter(Err(AssetError::Import {
            path: "broken.obj".into(),
            reason: "bad face".to_string(),
        }));
        let decoder = CountingDecoder::default();
        let mut factory = CountingFactory::default();

        let model = Model::load_or_empty("broken.obj", &importer, &decoder, &mut factory);
        assert!(!model.is_loaded());
        assert!(model.meshes().is_empty());
        assert_eq!(model.extent(), None);
        assert!(factory.created.is_empty());
    }

    #[test]
    fn test_root_without_vertices_has_no_extent() {
        let importer = InMemoryImporter(Ok(ImportedScene {
            root: Some(ImportedNode::default()),
        }));
        let decoder = CountingDecoder::default();
        let mut factory = CountingFactory::default();

        let model = Model::load("hollow.obj", &importer, &decoder, &mut factory).unwrap();
        assert!(model.is_loaded());
        assert_eq!(model.min_extent(), None);
    }

    #[test]
    fn test_from_meshes_folds_extent() {
        let vertex = |x: f32| Vertex3D {
            position: [x, x * 2.0, 0.0],
            normal: [0.0, 0.0, 1.0],
            tex_coords: [0.0, 0.0],
        };
        let model = Model::from_meshes(vec![Mesh::new(
            vec![vertex(-1.0), vertex(3.0)],
            vec![0, 1, 0],
            Vec::new(),
        )]);

        assert_eq!(model.min_extent(), Some(Vector3::new(-1.0, -2.0, 0.0)));
        assert_eq!(model.max_extent(), Some(Vector3::new(3.0, 6.0, 0.0)));
    }
}
