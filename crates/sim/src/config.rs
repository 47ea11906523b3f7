use std::path::Path;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Errors from loading or validating a [`DemoConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("unknown demo mode {0:?} (expected viewer, sketch or combined)")]
    UnknownMode(String),
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Which demo behaviours are active in the shared loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoMode {
    /// Free-fly camera over the square.
    Viewer,
    /// 2D click-to-draw line tool.
    Sketch,
    /// Both at once: a left click captures the mouse and feeds the line tool.
    #[default]
    Combined,
}

impl DemoMode {
    pub fn has_camera(self) -> bool {
        matches!(self, Self::Viewer | Self::Combined)
    }

    pub fn has_line_tool(self) -> bool {
        matches!(self, Self::Sketch | Self::Combined)
    }

    pub fn has_square(self) -> bool {
        self.has_camera()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Sketch => "sketch",
            Self::Combined => "combined",
        }
    }
}

impl FromStr for DemoMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "viewer" => Ok(Self::Viewer),
            "sketch" => Ok(Self::Sketch),
            "combined" => Ok(Self::Combined),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for DemoMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "flyline".to_string(),
            width: 800,
            height: 800,
        }
    }
}

/// Camera tunables. Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Degrees of rotation per pixel of cursor motion.
    pub sensitivity: f32,
    /// Walking speed in units per second.
    pub speed: f32,
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 2.0),
            yaw: -90.0,
            pitch: 0.0,
            sensitivity: 0.1,
            speed: 2.5,
            fov_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// How jump motion is advanced each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Integrator {
    /// One explicit Euler step per frame using the frame's dt.
    #[default]
    Euler,
    /// Euler steps of a constant size, driven by an accumulator.
    FixedStep,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Initial upward velocity in units per second.
    pub jump_speed: f32,
    /// Vertical acceleration in units per second squared. Must be negative.
    pub gravity: f32,
    /// Height under which the camera counts as standing on the ground.
    pub ground_epsilon: f32,
    pub integrator: Integrator,
    /// Step size in seconds for [`Integrator::FixedStep`].
    pub fixed_step: f32,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            jump_speed: 2.5,
            gravity: -9.81,
            ground_epsilon: 0.001,
            integrator: Integrator::Euler,
            fixed_step: 1.0 / 120.0,
        }
    }
}

/// Complete demo configuration. Every field has a default, so an empty
/// file is a valid config.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub mode: DemoMode,
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub jump: JumpConfig,
}

impl DemoConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: DemoConfig = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(invalid("window", "width and height must be non-zero"));
        }

        // Comparisons are written so that NaN fails them.
        let cam = &self.camera;
        if !positive(cam.sensitivity) {
            return Err(invalid("camera.sensitivity", "must be positive"));
        }
        if !non_negative(cam.speed) {
            return Err(invalid("camera.speed", "must not be negative"));
        }
        if !(-89.0..=89.0).contains(&cam.pitch) {
            return Err(invalid("camera.pitch", "must lie within [-89, 89]"));
        }
        if !(positive(cam.fov_degrees) && cam.fov_degrees < 180.0) {
            return Err(invalid("camera.fov_degrees", "must lie within (0, 180)"));
        }
        if !(positive(cam.near) && cam.far > cam.near) {
            return Err(invalid("camera.near", "need 0 < near < far"));
        }

        let jump = &self.jump;
        if !positive(-jump.gravity) {
            return Err(invalid("jump.gravity", "must be negative (downward)"));
        }
        if !positive(jump.jump_speed) {
            return Err(invalid("jump.jump_speed", "must be positive"));
        }
        if !non_negative(jump.ground_epsilon) {
            return Err(invalid("jump.ground_epsilon", "must not be negative"));
        }
        if !positive(jump.fixed_step) {
            return Err(invalid("jump.fixed_step", "must be positive"));
        }
        Ok(())
    }
}

fn positive(v: f32) -> bool {
    v > 0.0
}

fn non_negative(v: f32) -> bool {
    v >= 0.0
}
