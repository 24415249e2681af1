use cgmath::{Deg, InnerSpace, Matrix4, Point3, Vector3};

/// Default yaw in degrees; -90 looks down the negative Z axis
pub const YAW: f32 = -90.0;
pub const PITCH: f32 = 0.0;
pub const SPEED: f32 = 2.5;
pub const SENSITIVITY: f32 = 0.1;
pub const ZOOM: f32 = 45.0;

/// Pitch limit applied when look input is constrained
pub const MAX_PITCH: f32 = 89.0;
pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 45.0;

/// Direction for keyboard-driven camera translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// First-person camera driven by yaw/pitch angles
///
/// `front`, `right` and `up` always form a right-handed orthonormal basis
/// derived from `yaw` and `pitch`; they are only reachable through getters
/// so the basis cannot drift out of sync with the angles.
#[derive(Debug, Clone, Copy)]
pub struct FlyCamera {
    pub position: Point3<f32>,
    front: Vector3<f32>,
    up: Vector3<f32>,
    right: Vector3<f32>,
    world_up: Vector3<f32>,
    yaw: f32,
    pitch: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    zoom: f32,
}

impl FlyCamera {
    /// Creates a camera at `position` with +Y as world up and the default orientation
    pub fn new(position: Point3<f32>) -> Self {
        Self::with_orientation(position, Vector3::unit_y(), YAW, PITCH)
    }

    pub fn with_orientation(position: Point3<f32>, world_up: Vector3<f32>, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            front: -Vector3::unit_z(), // Recomputed below
            up: world_up,
            right: Vector3::unit_x(),
            world_up,
            yaw,
            pitch,
            movement_speed: SPEED,
            mouse_sensitivity: SENSITIVITY,
            zoom: ZOOM,
        };
        camera.update_vectors();
        camera
    }

    /// View matrix looking from `position` along `front`
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// Translates the camera by `movement_speed * delta_time` along one axis
    pub fn process_movement(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        let offset = match direction {
            CameraMovement::Forward => self.front,
            CameraMovement::Backward => -self.front,
            CameraMovement::Right => self.right,
            CameraMovement::Left => -self.right,
            CameraMovement::Up => self.world_up,
            CameraMovement::Down => -self.world_up,
        };
        self.position += offset * velocity;
    }

    /// Applies raw look deltas scaled by `mouse_sensitivity`
    ///
    /// With `constrain_pitch` the pitch is clamped to ±89° so `front` never
    /// becomes parallel to world up.
    pub fn process_look(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-MAX_PITCH, MAX_PITCH);
        }

        self.update_vectors();
    }

    /// Narrows the field of view by `scroll_delta` degrees, within [1°, 45°]
    pub fn process_zoom(&mut self, scroll_delta: f32) {
        self.zoom = (self.zoom - scroll_delta).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Sets yaw and pitch directly (degrees); pitch is not clamped
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch;
        self.update_vectors();
    }

    pub fn front(&self) -> Vector3<f32> {
        self.front
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn world_up(&self) -> Vector3<f32> {
        self.world_up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn fovy(&self) -> Deg<f32> {
        Deg(self.zoom)
    }

    fn update_vectors(&mut self) {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();

        self.front = Vector3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(Point3::new(0.0, 0.0, 0.0))
    }
}
