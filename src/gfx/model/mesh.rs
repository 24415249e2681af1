use crate::gfx::resources::{MeshTexture, TextureKind};
use crate::gfx::shader::ShaderProgram;

use super::importer::MeshRecord;
use super::vertex::Vertex3D;

/// Vertex and index buffers of an uploaded mesh
#[derive(Debug)]
pub struct MeshBuffers {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

/// Drawable geometry with its resolved material textures
#[derive(Debug, Default)]
pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    textures: Vec<MeshTexture>,
    buffers: Option<MeshBuffers>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex3D>, indices: Vec<u32>, textures: Vec<MeshTexture>) -> Self {
        Self {
            vertices,
            indices,
            textures,
            buffers: None,
        }
    }

    /// Interleaves an imported record; `textures` are already resolved
    pub fn from_record(record: &MeshRecord, textures: Vec<MeshTexture>) -> Self {
        let vertices = record
            .positions
            .iter()
            .enumerate()
            .map(|(i, &position)| Vertex3D {
                position,
                normal: record.normals.get(i).copied().unwrap_or([0.0, 0.0, 0.0]),
                tex_coords: record.tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
            })
            .collect();

        Self::new(vertices, record.indices.clone(), textures)
    }

    pub fn vertices(&self) -> &[Vertex3D] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn textures(&self) -> &[MeshTexture] {
        &self.textures
    }

    /// GPU buffers, once [`Mesh::upload`] has run
    pub fn buffers(&self) -> Option<&MeshBuffers> {
        self.buffers.as_ref()
    }

    /// Creates the vertex and index buffers; a no-op if already uploaded
    pub fn upload(&mut self, device: &wgpu::Device) {
        if self.buffers.is_some() || self.indices.is_empty() {
            return;
        }

        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertex Buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );

        let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Index Buffer"),
                contents: bytemuck::cast_slice(&self.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        self.buffers = Some(MeshBuffers {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        });
    }

    /// Binds texture units and submits the mesh
    ///
    /// Texture `i` goes to unit `i`; its sampler uniform is
    /// `material.<prefix><n>`, with `n` counting from 1 per texture kind.
    pub fn draw(&self, shader: &mut dyn ShaderProgram) {
        let mut counters = [0u32; 4];

        for (unit, texture) in self.textures.iter().enumerate() {
            let counter = &mut counters[kind_slot(texture.kind)];
            *counter += 1;
            let name = format!("material.{}{}", texture.kind.uniform_prefix(), counter);
            shader.set_int(&name, unit as i32);
        }

        shader.draw_mesh(self);
    }
}

fn kind_slot(kind: TextureKind) -> usize {
    match kind {
        TextureKind::Diffuse => 0,
        TextureKind::Specular => 1,
        TextureKind::Normal => 2,
        TextureKind::Height => 3,
    }
}
