use flyline_input::{InputState, Key};
use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Pitch is held inside this many degrees of straight up or down.
pub const PITCH_LIMIT: f32 = 89.0;

/// Which walk directions are held this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    /// W/S/A/D from the held-key set.
    pub fn from_input(input: &InputState) -> Self {
        Self {
            forward: input.key_down(Key::W),
            backward: input.key_down(Key::S),
            left: input.key_down(Key::A),
            right: input.key_down(Key::D),
        }
    }

    pub fn is_idle(&self) -> bool {
        !(self.forward || self.backward || self.left || self.right)
    }
}

/// First-person camera driven by cursor samples and held keys.
///
/// Yaw and pitch are stored in degrees. `front` is recomputed whenever they
/// change, so it is always unit length.
#[derive(Debug, Clone)]
pub struct CameraController {
    pub position: Vec3,
    yaw: f32,
    pitch: f32,
    front: Vec3,
    up: Vec3,
    pub sensitivity: f32,
    pub speed: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Last cursor sample; `None` until the first sample after capture.
    last_cursor: Option<(f64, f64)>,
}

impl Default for CameraController {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl CameraController {
    pub fn from_config(config: &CameraConfig) -> Self {
        let pitch = config.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        Self {
            position: config.position,
            yaw: config.yaw,
            pitch,
            front: direction(config.yaw, pitch),
            up: Vec3::Y,
            sensitivity: config.sensitivity,
            speed: config.speed,
            fov_degrees: config.fov_degrees,
            near: config.near,
            far: config.far,
            last_cursor: None,
        }
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// `front` flattened onto the ground plane.
    pub fn horizontal_front(&self) -> Vec3 {
        Vec3::new(self.front.x, 0.0, self.front.z).normalize_or_zero()
    }

    pub fn horizontal_right(&self) -> Vec3 {
        self.horizontal_front().cross(self.up).normalize_or_zero()
    }

    /// Re-arm the first-sample latch. Call when capture mode begins.
    pub fn begin_capture(&mut self) {
        self.last_cursor = None;
    }

    /// Feed an absolute cursor sample. The first sample after
    /// [`begin_capture`](Self::begin_capture) only latches the position.
    /// Returns whether the view rotated.
    pub fn look(&mut self, x: f64, y: f64) -> bool {
        let Some((last_x, last_y)) = self.last_cursor.replace((x, y)) else {
            return false;
        };
        let dx = (x - last_x) as f32;
        let dy = (y - last_y) as f32;
        if dx == 0.0 && dy == 0.0 {
            return false;
        }
        self.rotate(dx, dy);
        true
    }

    /// Rotate by a screen-space cursor delta in pixels. Screen Y grows
    /// downward, so a positive `dy` pitches the view down.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch -= dy * self.sensitivity;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.front = direction(self.yaw, self.pitch);
    }

    /// Walk along the ground plane. Never changes `position.y`.
    pub fn walk(&mut self, intent: MoveIntent, dt: f32) {
        if intent.is_idle() {
            return;
        }
        let step = self.speed * dt;
        let front = self.horizontal_front();
        let right = self.horizontal_right();
        if intent.forward {
            self.position += front * step;
        }
        if intent.backward {
            self.position -= front * step;
        }
        if intent.left {
            self.position -= right * step;
        }
        if intent.right {
            self.position += right * step;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

/// Unit view direction for yaw/pitch in degrees.
fn direction(yaw: f32, pitch: f32) -> Vec3 {
    let (yaw, pitch) = (yaw.to_radians(), pitch.to_radians());
    Vec3::new(
        yaw.cos() * pitch.cos(),
        pitch.sin(),
        yaw.sin() * pitch.cos(),
    )
    .normalize()
}
