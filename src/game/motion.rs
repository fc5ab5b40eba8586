//! Motion Controller
//!
//! Discrete key-press motion: one fixed step per press, no held-key motion.
//! The character moves in its own frame; the camera pans in its view frame.

use crate::config::{CameraConfig, MovementConfig};
use crate::math::Vec3;
use super::transform::Transform;

/// One discrete move of the character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterMove {
    Forward,
    Backward,
    Left,
    Right,
}

/// One discrete pan of the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraPan {
    Forward,
    Backward,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionController {
    pub step: f32,
    pub camera_step: f32,
}

impl MotionController {
    pub fn new(config: &MovementConfig) -> Self {
        Self {
            step: config.step,
            camera_step: config.camera_step,
        }
    }

    /// Apply one move. Left/right turn in place by 90 degrees and then step
    /// along the new facing, so the character ends up displaced sideways
    /// and facing the way it went.
    pub fn move_character(&self, transform: &mut Transform, mv: CharacterMove) {
        match mv {
            CharacterMove::Forward => transform.translate_z(-self.step),
            CharacterMove::Backward => transform.translate_z(self.step),
            CharacterMove::Left => {
                transform.rotate_y(90.0);
                transform.translate_z(-self.step);
            }
            CharacterMove::Right => {
                transform.rotate_y(-90.0);
                transform.translate_z(-self.step);
            }
        }
    }

    pub fn pan_camera(&self, camera: &mut CameraRig, pan: CameraPan) {
        let direction = camera.direction();
        let offset = match pan {
            CameraPan::Forward => direction * self.camera_step,
            CameraPan::Backward => direction * -self.camera_step,
            CameraPan::Left => camera.up.cross(direction).normalize() * self.camera_step,
            CameraPan::Right => direction.cross(camera.up).normalize() * self.camera_step,
        };
        camera.pan(offset);
    }
}

/// Perspective camera orbiting a target point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
    pub orbit_sensitivity: f32,
}

/// Closest the camera may zoom towards its target
const MIN_DISTANCE: f32 = 10.0;
/// Keeps the orbit away from the poles where `up` and the view align
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

impl CameraRig {
    pub fn new(config: &CameraConfig) -> Self {
        Self {
            position: config.position,
            target: config.target,
            up: Vec3::UP,
            fov: config.fov,
            near: config.near,
            far: config.far,
            aspect: 1.0,
            orbit_sensitivity: config.orbit_sensitivity,
        }
    }

    /// Normalized world-space view direction
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    pub fn distance(&self) -> f32 {
        (self.target - self.position).len()
    }

    /// Translate camera and orbit target together (view direction is kept).
    /// Projection parameters are untouched.
    pub fn pan(&mut self, offset: Vec3) {
        self.position = self.position + offset;
        self.target = self.target + offset;
    }

    /// Rotate around the target by a mouse drag of (dx, dy) pixels
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        let offset = self.position - self.target;
        let radius = offset.len();
        if radius == 0.0 {
            return;
        }

        let mut yaw = offset.x.atan2(offset.z);
        let mut pitch = (offset.y / radius).clamp(-1.0, 1.0).asin();
        yaw -= dx * self.orbit_sensitivity;
        pitch = (pitch + dy * self.orbit_sensitivity).clamp(-MAX_PITCH, MAX_PITCH);

        let (sp, cp) = pitch.sin_cos();
        let (sy, cy) = yaw.sin_cos();
        self.position = self.target + Vec3::new(radius * cp * sy, radius * sp, radius * cp * cy);
    }

    /// Move towards (factor < 1) or away from (factor > 1) the target
    pub fn zoom(&mut self, factor: f32) {
        if factor <= 0.0 {
            return;
        }
        let radius = (self.distance() * factor).clamp(MIN_DISTANCE, self.far.max(MIN_DISTANCE));
        self.position = self.target - self.direction() * radius;
    }

    /// Track the window size (resize)
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.aspect = width / height;
        }
    }
}
