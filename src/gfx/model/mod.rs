//! # Models
//!
//! Imported geometry ready for drawing and picking.
//!
//! - [`importer`] reads model files into plain mesh records
//! - [`Mesh`] interleaves a record into [`Vertex3D`]s and binds its textures when drawn
//! - [`Model`] owns the meshes, a per-model texture cache and the local bounding extent

pub mod importer;
pub mod mesh;
pub mod model;
pub mod vertex;

pub use importer::{AssetImporter, ImportedNode, ImportedScene, MeshRecord, ObjImporter};
pub use mesh::{Mesh, MeshBuffers};
pub use model::Model;
pub use vertex::Vertex3D;
