//! Model file import
//!
//! An [`AssetImporter`] turns a model file into a node tree of
//! [`MeshRecord`]s: plain vertex attributes, triangle indices and the
//! material texture paths the mesh references. Nothing here touches the GPU.

use std::path::Path;

use crate::error::AssetError;
use crate::gfx::resources::TextureKind;

/// Raw geometry and material references for one mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshRecord {
    pub name: String,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
    /// Texture slots in material order; paths are resolved against the model directory
    pub textures: Vec<(TextureKind, String)>,
}

/// Node of an imported scene graph
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedNode {
    pub name: String,
    pub meshes: Vec<MeshRecord>,
    pub children: Vec<ImportedNode>,
}

impl ImportedNode {
    /// Visits this node's meshes, then its children's, depth first
    pub fn walk_meshes<'a>(&'a self, visit: &mut impl FnMut(&'a MeshRecord)) {
        for mesh in &self.meshes {
            visit(mesh);
        }
        for child in &self.children {
            child.walk_meshes(visit);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportedScene {
    pub root: Option<ImportedNode>,
}

/// Reads a model file into an [`ImportedScene`]
pub trait AssetImporter {
    fn import(&self, path: &Path) -> Result<ImportedScene, AssetError>;
}

/// Wavefront OBJ/MTL importer backed by `tobj`
#[derive(Debug, Clone, Copy)]
pub struct ObjImporter {
    pub triangulate: bool,
    /// Store `1 - v` so textures uploaded top row first map the right way up
    pub flip_v: bool,
}

impl Default for ObjImporter {
    fn default() -> Self {
        Self {
            triangulate: true,
            flip_v: false,
        }
    }
}

impl ObjImporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flip_v(mut self, flip_v: bool) -> Self {
        self.flip_v = flip_v;
        self
    }

    pub fn with_triangulate(mut self, triangulate: bool) -> Self {
        self.triangulate = triangulate;
        self
    }

    fn convert_mesh(
        &self,
        model: &tobj::Model,
        materials: &[tobj::Material],
        directory: &Path,
    ) -> MeshRecord {
        let mesh = &model.mesh;

        let positions: Vec<[f32; 3]> = mesh
            .positions
            .chunks_exact(3)
            .map(|p| [p[0], p[1], p[2]])
            .collect();

        // Use normals from the file if they line up with the positions, otherwise calculate them
        let normals = if mesh.normals.len() == mesh.positions.len() {
            mesh.normals
                .chunks_exact(3)
                .map(|n| [n[0], n[1], n[2]])
                .collect()
        } else {
            calculate_vertex_normals(&positions, &mesh.indices)
        };

        let tex_coords = if mesh.texcoords.len() / 2 == positions.len() {
            mesh.texcoords
                .chunks_exact(2)
                .map(|t| if self.flip_v { [t[0], 1.0 - t[1]] } else { [t[0], t[1]] })
                .collect()
        } else {
            vec![[0.0, 0.0]; positions.len()]
        };

        let mut textures = Vec::new();
        if let Some(material) = mesh.material_id.and_then(|id| materials.get(id)) {
            let slots = [
                (TextureKind::Diffuse, &material.diffuse_texture),
                (TextureKind::Specular, &material.specular_texture),
                (TextureKind::Normal, &material.normal_texture),
                (TextureKind::Height, &material.ambient_texture),
            ];
            for (kind, texture) in slots {
                if let Some(file) = texture.as_deref().filter(|f| !f.is_empty()) {
                    let resolved = directory.join(file).to_string_lossy().into_owned();
                    textures.push((kind, resolved));
                }
            }
        }

        MeshRecord {
            name: model.name.clone(),
            positions,
            normals,
            tex_coords,
            indices: mesh.indices.clone(),
            textures,
        }
    }
}

impl AssetImporter for ObjImporter {
    fn import(&self, path: &Path) -> Result<ImportedScene, AssetError> {
        let (models, materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                triangulate: self.triangulate,
                single_index: true,
                ..Default::default()
            },
        )
        .map_err(|err| AssetError::Import {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;

        if models.is_empty() {
            return Err(AssetError::MissingRoot {
                path: path.to_path_buf(),
            });
        }

        let materials = materials.unwrap_or_else(|err| {
            log::warn!("no usable MTL for {}: {}", path.display(), err);
            Vec::new()
        });

        let directory = path.parent().unwrap_or_else(|| Path::new(""));
        let meshes = models
            .iter()
            .map(|model| self.convert_mesh(model, &materials, directory))
            .collect();

        Ok(ImportedScene {
            root: Some(ImportedNode {
                name: path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                meshes,
                children: Vec::new(),
            }),
        })
    }
}

/// Averaged face normals for meshes that ship without normals
pub fn calculate_vertex_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut normals = vec![[0.0f32; 3]; positions.len()];

    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
        if i0 >= positions.len() || i1 >= positions.len() || i2 >= positions.len() {
            continue;
        }
        let (v0, v1, v2) = (positions[i0], positions[i1], positions[i2]);

        let edge1 = [v1[0] - v0[0], v1[1] - v0[1], v1[2] - v0[2]];
        let edge2 = [v2[0] - v0[0], v2[1] - v0[1], v2[2] - v0[2]];
        let face_normal = [
            edge1[1] * edge2[2] - edge1[2] * edge2[1],
            edge1[2] * edge2[0] - edge1[0] * edge2[2],
            edge1[0] * edge2[1] - edge1[1] * edge2[0],
        ];

        for index in [i0, i1, i2] {
            for axis in 0..3 {
                normals[index][axis] += face_normal[axis];
            }
        }
    }

    for normal in &mut normals {
        let length = (normal[0].powi(2) + normal[1].powi(2) + normal[2].powi(2)).sqrt();
        if length > 0.0 {
            for component in normal.iter_mut() {
                *component /= length;
            }
        }
    }

    normals
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("vantage-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const TWO_QUADS: &str = "\
mtllib quads.mtl
o left
v -2 0 0
v -1 0 0
v -1 1 0
v -2 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
usemtl painted
f 1/1 2/2 3/3 4/4
o right
v 1 0 0
v 2 0 0
v 2 1 -3
v 1 1 0
usemtl painted
f 5/1 6/2 7/3 8/4
";

    const MTL: &str = "\
newmtl painted
Kd 1 1 1
map_Kd paint.png
map_Ks shine.png
";

    #[test]
    fn test_obj_with_shared_material() {
        let dir = scratch_dir("obj-shared");
        fs::write(dir.join("quads.obj"), TWO_QUADS).unwrap();
        fs::write(dir.join("quads.mtl"), MTL).unwrap();

        let scene = ObjImporter::new().import(&dir.join("quads.obj")).unwrap();
        let root = scene.root.expect("root node");
        assert_eq!(root.meshes.len(), 2);

        let left = &root.meshes[0];
        assert_eq!(left.positions.len(), 4);
        assert_eq!(left.indices.len(), 6); // quad triangulated
        assert_eq!(left.normals.len(), 4);
        assert_eq!(left.tex_coords[2], [1.0, 1.0]);

        let paint = dir.join("paint.png").to_string_lossy().into_owned();
        let shine = dir.join("shine.png").to_string_lossy().into_owned();
        for mesh in &root.meshes {
            assert_eq!(
                mesh.textures,
                vec![(TextureKind::Diffuse, paint.clone()), (TextureKind::Specular, shine.clone())]
            );
        }

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_flip_v() {
        let dir = scratch_dir("obj-flip");
        fs::write(dir.join("quads.obj"), TWO_QUADS).unwrap();
        fs::write(dir.join("quads.mtl"), MTL).unwrap();

        let scene = ObjImporter::new()
            .with_flip_v(true)
            .import(&dir.join("quads.obj"))
            .unwrap();
        let root = scene.root.unwrap();
        assert_eq!(root.meshes[0].tex_coords[0], [0.0, 1.0]);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_mtl_is_not_fatal() {
        let dir = scratch_dir("obj-no-mtl");
        fs::write(dir.join("quads.obj"), TWO_QUADS).unwrap();

        let scene = ObjImporter::new().import(&dir.join("quads.obj")).unwrap();
        let root = scene.root.unwrap();
        assert!(root.meshes.iter().all(|m| m.textures.is_empty()));

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_file_is_import_error() {
        let err = ObjImporter::new()
            .import(Path::new("no/such/model.obj"))
            .unwrap_err();
        assert!(matches!(err, AssetError::Import { .. }));
    }

    #[test]
    fn test_calculated_normals_face_out_of_ccw_triangle() {
        let positions = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let normals = calculate_vertex_normals(&positions, &[0, 1, 2]);
        for normal in normals {
            assert_eq!(normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_walk_visits_children() {
        let leaf = |name: &str| MeshRecord {
            name: name.to_string(),
            ..Default::default()
        };
        let root = ImportedNode {
            name: "root".into(),
            meshes: vec![leaf("a")],
            children: vec![ImportedNode {
                name: "child".into(),
                meshes: vec![leaf("b"), leaf("c")],
                children: Vec::new(),
            }],
        };

        let mut names = Vec::new();
        root.walk_meshes(&mut |mesh| names.push(mesh.name.clone()));
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
