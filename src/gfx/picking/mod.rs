//! # Object Picking
//!
//! Ray casting from screen coordinates into the scene.
//!
//! ## How it works
//!
//! 1. **Screen to Ray**: un-project a pixel through the inverse projection and
//!    inverse view matrices to get a world-space [`Ray`]
//! 2. **Ray-OBB Intersection**: slab-test the ray against each model's local
//!    [`BoundingExtent`], oriented and positioned by the model transform
//! 3. **Selection**: the scene keeps the nearest hit (see `Scene::pick_closest`)
//!
//! Screen coordinates use a bottom-left origin, as OpenGL-style clip space does.

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, SquareMatrix, Vector3, Vector4};

/// Below this `|dir · axis|` the ray is treated as parallel to a slab
///
/// Absolute rather than relative, so very large or very small scenes can
/// misclassify near-parallel rays.
pub const PARALLEL_EPSILON: f32 = 0.001;

/// Upper end of the slab interval; hits further away are not reported
pub const MAX_RAY_DISTANCE: f32 = 100_000.0;

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Ray origin point in world space
    pub origin: Point3<f32>,
    /// Ray direction (normalized)
    pub direction: Vector3<f32>,
}

impl Ray {
    /// Create a new ray; the direction is normalized
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }

    /// Distance along the ray to the box `extent` placed by `transform`
    pub fn intersect_obb(&self, transform: &Matrix4<f32>, extent: &BoundingExtent) -> Option<f32> {
        intersect_obb(self.origin, self.direction, transform, extent.min, extent.max)
    }
}

/// Axis-aligned bounds of a model in its local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingExtent {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl BoundingExtent {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Degenerate extent containing exactly one point
    pub fn from_point(point: [f32; 3]) -> Self {
        let p = Vector3::from(point);
        Self::new(p, p)
    }

    /// Component-wise min/max over `points`; `None` when there are none
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = [f32; 3]>,
    {
        let mut points = points.into_iter();
        let mut extent = Self::from_point(points.next()?);
        for point in points {
            extent.include(point);
        }
        Some(extent)
    }

    /// Grows the extent to contain `point`
    pub fn include(&mut self, point: [f32; 3]) {
        self.min.x = self.min.x.min(point[0]);
        self.min.y = self.min.y.min(point[1]);
        self.min.z = self.min.z.min(point[2]);
        self.max.x = self.max.x.max(point[0]);
        self.max.y = self.max.y.max(point[1]);
        self.max.z = self.max.z.max(point[2]);
    }

    pub fn merge(&mut self, other: &BoundingExtent) {
        self.include(other.min.into());
        self.include(other.max.into());
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

/// Slab test of a ray against an oriented box
///
/// The box is `[local_min, local_max]` in the space spanned by the first
/// three columns of `transform`, offset by its translation column. The
/// interval starts at `[0, MAX_RAY_DISTANCE]` and is narrowed axis by axis,
/// stopping at the first axis that empties it. Returns the entry distance.
pub fn intersect_obb(
    origin: Point3<f32>,
    direction: Vector3<f32>,
    transform: &Matrix4<f32>,
    local_min: Vector3<f32>,
    local_max: Vector3<f32>,
) -> Option<f32> {
    let mut t_min = 0.0f32;
    let mut t_max = MAX_RAY_DISTANCE;

    let box_position = transform.w.truncate();
    let delta = box_position - origin.to_vec();

    for i in 0..3 {
        let axis = transform[i].truncate();
        let e = axis.dot(delta);
        let f = direction.dot(axis);

        if f.abs() > PARALLEL_EPSILON {
            // Distances to the near and far planes of this slab
            let mut t1 = (e + local_min[i]) / f;
            let mut t2 = (e + local_max[i]) / f;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }

            t_max = t_max.min(t2);
            t_min = t_min.max(t1);

            if t_max < t_min {
                return None;
            }
        } else if -e + local_min[i] > 0.0 || -e + local_max[i] < 0.0 {
            // Parallel to the slab and outside it
            return None;
        }
    }

    Some(t_min)
}

/// World-space ray through a pixel
///
/// `screen` is in pixels from the bottom-left corner of a `size` viewport.
/// Two clip-space points (near plane and mid depth) are un-projected through
/// the inverse projection and then the inverse view, with a perspective
/// divide after each step. The ray starts at the near point.
///
/// A singular matrix is treated as identity.
pub fn screen_point_to_world_ray(
    screen: (f32, f32),
    size: (f32, f32),
    projection: &Matrix4<f32>,
    view: &Matrix4<f32>,
) -> Ray {
    let ndc_x = (screen.0 / size.0 - 0.5) * 2.0;
    let ndc_y = (screen.1 / size.1 - 0.5) * 2.0;

    let inverse_projection = projection.invert().unwrap_or_else(Matrix4::identity);
    let inverse_view = view.invert().unwrap_or_else(Matrix4::identity);

    let unproject = |clip: Vector4<f32>| {
        let mut camera = inverse_projection * clip;
        camera /= camera.w;
        let mut world = inverse_view * camera;
        world /= world.w;
        Point3::new(world.x, world.y, world.z)
    };

    let start = unproject(Vector4::new(ndc_x, ndc_y, -1.0, 1.0));
    let end = unproject(Vector4::new(ndc_x, ndc_y, 0.0, 1.0));

    Ray::new(start, end - start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{perspective, Deg, Rad};

    fn unit_box() -> BoundingExtent {
        BoundingExtent::new(Vector3::new(-0.5, -0.5, -0.5), Vector3::new(0.5, 0.5, 0.5))
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_extent_from_points() {
        let points = [[0.0, 2.0, -1.0], [1.0, -3.0, 0.5], [-4.0, 0.0, 0.25]];
        let extent = BoundingExtent::from_points(points).unwrap();

        assert_eq!(extent.min, Vector3::new(-4.0, -3.0, -1.0));
        assert_eq!(extent.max, Vector3::new(1.0, 2.0, 0.5));

        // Order independent
        let reversed = BoundingExtent::from_points(points.iter().rev().copied()).unwrap();
        assert_eq!(extent, reversed);

        assert_eq!(BoundingExtent::from_points(Vec::new()), None);
    }

    #[test]
    fn test_extent_merge_and_center() {
        let mut a = unit_box();
        a.merge(&BoundingExtent::new(Vector3::new(1.0, 0.0, 0.0), Vector3::new(2.5, 0.1, 0.1)));
        assert_eq!(a.max, Vector3::new(2.5, 0.5, 0.5));
        assert_eq!(a.center(), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(a.size(), Vector3::new(3.0, 1.0, 1.0));
    }

    #[test]
    fn test_ray_hits_unit_box_front_face() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, -1.0));
        let distance = ray.intersect_obb(&Matrix4::identity(), &unit_box()).unwrap();
        assert!(close(distance, 4.5));
        assert!(close(ray.point_at(distance).z, 0.5));
    }

    #[test]
    fn test_parallel_ray_outside_slab_misses() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(ray.intersect_obb(&Matrix4::identity(), &unit_box()), None);
    }

    #[test]
    fn test_ray_pointing_away_misses() {
        let ray = Ray::new(Point3::new(0.0, 0.0, 5.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(ray.intersect_obb(&Matrix4::identity(), &unit_box()), None);
    }

    #[test]
    fn test_origin_inside_box_reports_zero() {
        let ray = Ray::new(Point3::new(0.1, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(ray.intersect_obb(&Matrix4::identity(), &unit_box()), Some(0.0));
    }

    #[test]
    fn test_translated_box() {
        let transform = Matrix4::from_translation(Vector3::new(3.0, 0.0, -10.0));
        let ray = Ray::new(Point3::new(3.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(close(ray.intersect_obb(&transform, &unit_box()).unwrap(), 9.5));

        let off_axis = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(off_axis.intersect_obb(&transform, &unit_box()), None);
    }

    #[test]
    fn test_rotated_box_uses_local_axes() {
        // A long thin box along local X, rotated to lie along world Z
        let extent = BoundingExtent::new(Vector3::new(-2.0, -0.1, -0.1), Vector3::new(2.0, 0.1, 0.1));
        let transform = Matrix4::from_angle_y(Deg(90.0));

        // Along world X the rotated box is only 0.2 thick
        let across = Ray::new(Point3::new(-5.0, 0.0, 1.5), Vector3::new(1.0, 0.0, 0.0));
        assert!(across.intersect_obb(&transform, &extent).is_some());

        // Without rotation the same ray would miss the thin Z extent
        assert_eq!(across.intersect_obb(&Matrix4::identity(), &extent), None);
    }

    #[test]
    fn test_hits_beyond_max_distance_are_dropped() {
        let transform = Matrix4::from_translation(Vector3::new(0.0, 0.0, -200_000.0));
        let ray = Ray::new(Point3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(ray.intersect_obb(&transform, &unit_box()), None);
    }

    #[test]
    fn test_center_pixel_ray_looks_forward() {
        let projection = perspective(Rad::from(Deg(45.0)), 800.0 / 600.0, 0.1, 100.0);
        let view = Matrix4::look_at_rh(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, -1.0),
            Vector3::unit_y(),
        );

        let ray = screen_point_to_world_ray((400.0, 300.0), (800.0, 600.0), &projection, &view);
        assert!(close(ray.direction.x, 0.0));
        assert!(close(ray.direction.y, 0.0));
        assert!(close(ray.direction.z, -1.0));
        // Starts on the near plane
        assert!(close(ray.origin.z, -0.1));
        assert!(close(ray.origin.x, 0.0) && close(ray.origin.y, 0.0));
    }

    #[test]
    fn test_corner_pixel_ray_leans_up_and_right() {
        let projection = perspective(Deg(45.0), 1.0, 0.1, 100.0);
        let view = Matrix4::look_at_rh(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, -1.0),
            Vector3::unit_y(),
        );

        // Bottom-left origin: (w, h) is the top-right corner
        let ray = screen_point_to_world_ray((100.0, 100.0), (100.0, 100.0), &projection, &view);
        let half_fov = (22.5f32).to_radians().tan();
        assert!(close(ray.direction.x / -ray.direction.z, half_fov));
        assert!(close(ray.direction.y / -ray.direction.z, half_fov));
    }
}
