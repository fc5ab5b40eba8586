//! Transform Component
//!
//! World transform of the character: position, euler rotation (degrees) and
//! uniform scale. Local-axis moves go through the rotation matrix so they
//! match "translate along my own Z" semantics of a scene graph object.

use serde::{Deserialize, Serialize};
use crate::math::{mat4_from_position_rotation, mat4_rotation, mat4_transform_vector, Mat4, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    /// Rotation in euler angles (degrees)
    pub rotation: Vec3,
    /// Scale factor (uniform for simplicity)
    pub scale: f32,
}

impl Transform {
    /// Identity transform (origin, no rotation, scale 1)
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: 1.0,
    };

    pub fn from_position_rotation(position: Vec3, rotation: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale: 1.0,
        }
    }

    pub fn to_matrix(&self) -> Mat4 {
        let base = mat4_from_position_rotation(self.position, self.rotation);
        if (self.scale - 1.0).abs() < 0.0001 {
            base
        } else {
            let mut result = base;
            for row in result.iter_mut().take(3) {
                for value in row.iter_mut().take(3) {
                    *value *= self.scale;
                }
            }
            result
        }
    }

    /// Translate by a world-space offset
    pub fn translate(&mut self, offset: Vec3) {
        self.position = self.position + offset;
    }

    /// Translate along the object's own axes
    pub fn translate_local(&mut self, offset: Vec3) {
        let world = mat4_transform_vector(&mat4_rotation(self.rotation), offset);
        self.translate(world);
    }

    /// Translate along the local Z axis (negative moves the way the model faces)
    pub fn translate_z(&mut self, distance: f32) {
        self.translate_local(Vec3::new(0.0, 0.0, distance));
    }

    /// Rotate about the vertical axis
    pub fn rotate_y(&mut self, degrees: f32) {
        self.rotation.y += degrees;
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).len() < 1e-3
    }

    #[test]
    fn test_transform_to_matrix() {
        let t = Transform::from_position_rotation(Vec3::new(10.0, 20.0, 30.0), Vec3::ZERO);
        let m = t.to_matrix();

        assert!((m[0][3] - 10.0).abs() < 0.001);
        assert!((m[1][3] - 20.0).abs() < 0.001);
        assert!((m[2][3] - 30.0).abs() < 0.001);
    }

    #[test]
    fn test_translate_z_follows_yaw() {
        let mut t = Transform::IDENTITY;
        t.translate_z(-50.0);
        assert!(close(t.position, Vec3::new(0.0, 0.0, -50.0)));

        t.rotate_y(90.0);
        t.translate_z(-50.0);
        assert!(close(t.position, Vec3::new(-50.0, 0.0, -50.0)));
    }

    #[test]
    fn test_translate_local_ignores_position() {
        let mut t = Transform::from_position_rotation(Vec3::new(5.0, 0.0, 5.0), Vec3::new(0.0, -90.0, 0.0));
        t.translate_local(Vec3::new(0.0, 0.0, 10.0));
        assert!(close(t.position, Vec3::new(-5.0, 0.0, 5.0)));
    }

    #[test]
    fn test_scale_applies_to_basis_only() {
        let mut t = Transform::from_position_rotation(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO);
        t.scale = 2.0;
        let m = t.to_matrix();
        assert!((m[0][0] - 2.0).abs() < 1e-5);
        assert!((m[0][3] - 1.0).abs() < 1e-5);
    }
}
