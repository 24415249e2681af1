//! [`ShaderProgram`] backend for the wgpu model pipeline
//!
//! wgpu has no per-uniform setters, so [`GpuShader`] keeps the uniforms in a
//! CPU-side std140 block and snapshots it into a [`DrawCommand`] on every
//! `draw_mesh`. The render engine replays those commands once per frame.

use std::collections::HashMap;

use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::gfx::model::Mesh;
use crate::gfx::resources::{TextureHandle, TextureKind};
use crate::gfx::shader::{ShaderProgram, UniformBlock, UniformKind, UniformLayout, UniformValue};

/// Sampler uniform the model shader reads its base colour from
pub const DIFFUSE_SAMPLER: &str = "material.texture_diffuse1";

/// Everything needed to issue one indexed draw
#[derive(Debug, Clone)]
pub struct DrawCommand {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    /// Uniform block bytes as they were when the mesh was submitted
    pub uniforms: Vec<u8>,
    pub diffuse: Option<TextureHandle>,
}

/// Uniform block of the model shader, in WGSL declaration order
pub fn model_uniform_layout() -> UniformLayout {
    UniformLayout::new()
        .with_field("model", UniformKind::Mat4)
        .with_field("view", UniformKind::Mat4)
        .with_field("projection", UniformKind::Mat4)
        .with_field("viewPos", UniformKind::Vec3)
        .with_field("tint", UniformKind::Vec3)
}

pub struct GpuShader {
    label: String,
    block: UniformBlock,
    samplers: HashMap<String, i32>,
    in_use: bool,
    commands: Vec<DrawCommand>,
}

impl GpuShader {
    /// A model shader with identity matrices and a white tint
    pub fn new(label: &str) -> Self {
        let mut block = UniformBlock::new(model_uniform_layout());
        for matrix in ["model", "view", "projection"] {
            block.write(matrix, UniformValue::Mat4(Matrix4::identity()));
        }
        block.write("tint", UniformValue::Vec3(Vector3::new(1.0, 1.0, 1.0)));

        Self {
            label: label.to_string(),
            block,
            samplers: HashMap::new(),
            in_use: false,
            commands: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn uniforms(&self) -> &UniformBlock {
        &self.block
    }

    /// Draws recorded since the last call; the program goes inactive until
    /// `use_program` runs again
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        self.in_use = false;
        std::mem::take(&mut self.commands)
    }

    pub fn pending_draws(&self) -> usize {
        self.commands.len()
    }
}

impl ShaderProgram for GpuShader {
    fn use_program(&mut self) {
        self.in_use = true;
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        if self.block.write(name, value) {
            return;
        }
        if let (true, UniformValue::Int(unit)) = (name.starts_with("material."), value) {
            self.samplers.insert(name.to_string(), unit);
        }
    }

    fn draw_mesh(&mut self, mesh: &Mesh) {
        if !self.in_use {
            log::warn!("shader '{}' drew without use_program", self.label);
        }

        let Some(buffers) = mesh.buffers() else {
            log::debug!("shader '{}' skipped a mesh that was never uploaded", self.label);
            return;
        };

        // The sampler uniform names a texture unit; unit i is the mesh's i-th texture
        let diffuse = self
            .samplers
            .get(DIFFUSE_SAMPLER)
            .and_then(|&unit| usize::try_from(unit).ok())
            .and_then(|unit| mesh.textures().get(unit))
            .filter(|texture| texture.kind == TextureKind::Diffuse)
            .map(|texture| texture.handle);

        self.commands.push(DrawCommand {
            vertex_buffer: buffers.vertex_buffer.clone(),
            index_buffer: buffers.index_buffer.clone(),
            index_count: buffers.index_count,
            uniforms: self.block.as_bytes().to_vec(),
            diffuse,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_matches_wgsl_struct() {
        let layout = model_uniform_layout();
        assert_eq!(layout.offset_of("model"), Some(0));
        assert_eq!(layout.offset_of("view"), Some(64));
        assert_eq!(layout.offset_of("projection"), Some(128));
        assert_eq!(layout.offset_of("viewPos"), Some(192));
        assert_eq!(layout.offset_of("tint"), Some(208));
        assert_eq!(layout.size(), 224);
    }

    #[test]
    fn test_new_shader_defaults() {
        let shader = GpuShader::new("model");
        assert_eq!(
            shader.uniforms().read("tint"),
            Some(UniformValue::Vec3(Vector3::new(1.0, 1.0, 1.0)))
        );
        assert_eq!(
            shader.uniforms().read("view"),
            Some(UniformValue::Mat4(Matrix4::identity()))
        );
    }

    #[test]
    fn test_unknown_uniforms_are_ignored() {
        let mut shader = GpuShader::new("model");
        let before = shader.uniforms().as_bytes().to_vec();

        shader.set_float("shininess", 32.0);
        shader.set_vec3_xyz("lightColor", 1.0, 1.0, 1.0);
        // Right name, wrong type
        shader.set_float("tint", 0.5);

        assert_eq!(shader.uniforms().as_bytes(), &before[..]);
    }

    #[test]
    fn test_meshes_without_buffers_are_not_recorded() {
        let mut shader = GpuShader::new("model");
        shader.use_program();
        shader.set_int(DIFFUSE_SAMPLER, 0);
        shader.draw_mesh(&Mesh::new(Vec::new(), vec![0, 1, 2], Vec::new()));

        assert_eq!(shader.pending_draws(), 0);
        assert!(shader.take_commands().is_empty());
    }
}
