use cgmath::{perspective, Matrix4, Point3, SquareMatrix, Vector3};

use crate::gfx::arena::{Arena, Handle};
use crate::gfx::camera::FlyCamera;
use crate::gfx::model::Model;
use crate::gfx::picking::{self, Ray};
use crate::gfx::shader::ShaderProgram;

/// Near clip plane distance
pub const Z_NEAR: f32 = 0.1;
/// Far clip plane distance
pub const Z_FAR: f32 = 100.0;
/// Hits at or beyond this distance are never picked
pub const PICK_RANGE: f32 = 100.0;

/// A named vec3 uniform applied before an entry's model is drawn
#[derive(Debug, Clone, PartialEq)]
pub struct Vec3Uniform {
    pub name: String,
    pub value: Vector3<f32>,
}

impl Vec3Uniform {
    pub fn new(name: impl Into<String>, value: Vector3<f32>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// One renderable: which model, where, and with which shader
#[derive(Debug)]
pub struct SceneEntry<S> {
    pub model: Handle<Model>,
    pub transform: Matrix4<f32>,
    pub shader: Handle<S>,
    /// Applied in order, so a repeated name ends with its last value
    pub overrides: Vec<Vec3Uniform>,
}

impl<S> SceneEntry<S> {
    pub fn new(model: Handle<Model>, transform: Matrix4<f32>, shader: Handle<S>) -> Self {
        Self {
            model,
            transform,
            shader,
            overrides: Vec::new(),
        }
    }

    pub fn with_override(mut self, name: impl Into<String>, value: Vector3<f32>) -> Self {
        self.overrides.push(Vec3Uniform::new(name, value));
        self
    }
}

/// Nearest entry under a screen point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickResult {
    /// Position in [`Scene::entries`]
    pub entry_index: usize,
    pub model: Handle<Model>,
    pub distance: f32,
}

/// Ordered list of scene entries plus the camera matrices of the last refresh
///
/// The scene only holds handles; models and shaders live in arenas owned by
/// the caller and the camera is passed to [`Scene::refresh_matrices`].
/// Picking and drawing both use the matrices captured by the most recent
/// refresh, so call it once per frame before either.
#[derive(Debug)]
pub struct Scene<S> {
    entries: Vec<SceneEntry<S>>,
    view: Matrix4<f32>,
    projection: Matrix4<f32>,
    camera_position: Point3<f32>,
}

impl<S> Default for Scene<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            camera_position: Point3::new(0.0, 0.0, 0.0),
        }
    }
}

impl<S: ShaderProgram> Scene<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, entry: SceneEntry<S>) -> usize {
        self.entries.push(entry);
        self.entries.len() - 1
    }

    pub fn clear_entries(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[SceneEntry<S>] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [SceneEntry<S>] {
        &mut self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn view(&self) -> Matrix4<f32> {
        self.view
    }

    pub fn projection(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn camera_position(&self) -> Point3<f32> {
        self.camera_position
    }

    /// Captures the camera's view matrix, position and a perspective
    /// projection for a `width` x `height` viewport
    pub fn refresh_matrices(&mut self, camera: &FlyCamera, width: f32, height: f32) {
        let aspect = if height > 0.0 { width / height } else { 1.0 };

        self.view = camera.view_matrix();
        self.projection = perspective(camera.fovy(), aspect, Z_NEAR, Z_FAR);
        self.camera_position = camera.position;
    }

    /// World-space ray through pixel `(x, y)`, measured from the bottom-left
    pub fn screen_point_to_world_ray(&self, x: f32, y: f32, width: f32, height: f32) -> Ray {
        picking::screen_point_to_world_ray((x, y), (width, height), &self.projection, &self.view)
    }

    /// Nearest entry whose oriented bounds the ray through `(x, y)` hits
    ///
    /// Entries are tested in order and a later hit only wins when strictly
    /// closer, so equal distances resolve to the earlier entry. Entries with
    /// a stale model handle or an empty model are skipped.
    pub fn pick_closest(
        &self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        models: &Arena<Model>,
    ) -> Option<PickResult> {
        let ray = self.screen_point_to_world_ray(x, y, width, height);

        let mut best: Option<PickResult> = None;
        let mut best_distance = PICK_RANGE;

        for (entry_index, entry) in self.entries.iter().enumerate() {
            let Some(extent) = models.get(entry.model).and_then(Model::extent) else {
                continue;
            };

            if let Some(distance) = ray.intersect_obb(&entry.transform, extent) {
                if distance < best_distance {
                    best_distance = distance;
                    best = Some(PickResult {
                        entry_index,
                        model: entry.model,
                        distance,
                    });
                }
            }
        }

        best
    }

    /// Draws every entry in order
    ///
    /// Per entry: activate its shader, apply the vec3 overrides, upload
    /// `viewPos`, `view`, `projection` and `model`, then draw the model.
    pub fn draw(&self, models: &Arena<Model>, shaders: &mut Arena<S>) {
        for (index, entry) in self.entries.iter().enumerate() {
            let Some(model) = models.get(entry.model) else {
                log::warn!("scene entry {} refers to a removed model, skipping", index);
                continue;
            };
            let Some(shader) = shaders.get_mut(entry.shader) else {
                log::warn!("scene entry {} refers to a removed shader, skipping", index);
                continue;
            };

            shader.use_program();
            for uniform in &entry.overrides {
                shader.set_vec3(&uniform.name, uniform.value);
            }

            let view_pos = self.camera_position;
            shader.set_vec3_xyz("viewPos", view_pos.x, view_pos.y, view_pos.z);
            shader.set_mat4("view", self.view);
            shader.set_mat4("projection", self.projection);
            shader.set_mat4("model", entry.transform);

            model.draw(shader);
        }
    }
}
