use cgmath::{Matrix4, Vector3};

use crate::gfx::model::Mesh;

/// Value of a single named uniform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec3(Vector3<f32>),
    Mat4(Matrix4<f32>),
}

/// A compiled GPU program with named uniforms and a draw entry point
pub trait ShaderProgram {
    /// Makes this program the active one for subsequent uniform writes and draws
    fn use_program(&mut self);

    /// Sets a named uniform; names that do not resolve are silently ignored
    fn set_uniform(&mut self, name: &str, value: UniformValue);

    /// Submits one mesh with the uniforms currently set
    fn draw_mesh(&mut self, mesh: &Mesh);

    fn set_bool(&mut self, name: &str, value: bool) {
        self.set_uniform(name, UniformValue::Bool(value));
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.set_uniform(name, UniformValue::Int(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.set_uniform(name, UniformValue::Float(value));
    }

    fn set_vec3(&mut self, name: &str, value: Vector3<f32>) {
        self.set_uniform(name, UniformValue::Vec3(value));
    }

    fn set_vec3_xyz(&mut self, name: &str, x: f32, y: f32, z: f32) {
        self.set_vec3(name, Vector3::new(x, y, z));
    }

    fn set_mat4(&mut self, name: &str, value: Matrix4<f32>) {
        self.set_uniform(name, UniformValue::Mat4(value));
    }
}
