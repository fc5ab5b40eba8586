//! Blob Shadows
//!
//! Dark discs on the ground under the character and the obstacle cubes.
//! The higher something is above the floor, the larger and fainter its
//! shadow, which makes the jump height readable from any camera angle.

use crate::math::Vec3;
use super::character::Character;
use super::collision::Obstacle;

/// Floor height the shadows are projected onto
pub const FLOOR_Y: f32 = 0.0;

/// Lift above the floor so the disc does not z-fight with the ground
const SHADOW_LIFT: f32 = 0.5;

/// Heights above this cast no shadow
const MAX_SHADOW_HEIGHT: f32 = 400.0;

/// Radius multiplier at `MAX_SHADOW_HEIGHT` (1.0 on the floor)
const MAX_SHADOW_GROWTH: f32 = 2.5;

/// Darkness on the floor (0-255)
const MAX_SHADOW_ALPHA: u8 = 120;

/// Darkness at `MAX_SHADOW_HEIGHT`
const MIN_SHADOW_ALPHA: u8 = 30;

/// Footprint used when the character has no geometry
const DEFAULT_FOOTPRINT: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlobShadow {
    /// Disc centre, just above the floor
    pub center: Vec3,
    pub radius: f32,
    pub alpha: u8,
}

/// Shadow of something `height` above the floor at (x, z) whose footprint
/// has radius `footprint`. None below the floor or too high up.
pub fn blob_shadow(x: f32, z: f32, height: f32, footprint: f32) -> Option<BlobShadow> {
    if !(0.0..=MAX_SHADOW_HEIGHT).contains(&height) {
        return None;
    }

    let t = height / MAX_SHADOW_HEIGHT;
    let radius = footprint * (1.0 + (MAX_SHADOW_GROWTH - 1.0) * t);
    let alpha = MAX_SHADOW_ALPHA - ((MAX_SHADOW_ALPHA - MIN_SHADOW_ALPHA) as f32 * t) as u8;

    Some(BlobShadow {
        center: Vec3::new(x, FLOOR_Y + SHADOW_LIFT, z),
        radius,
        alpha,
    })
}

/// Shadow under the character's origin, sized by its current pose
pub fn character_shadow(character: &Character) -> Option<BlobShadow> {
    let bounds = character.world_bounds();
    let footprint = if bounds.is_empty() {
        DEFAULT_FOOTPRINT
    } else {
        let size = bounds.max - bounds.min;
        size.x.max(size.z) * 0.5
    };
    let position = character.transform.position;
    blob_shadow(position.x, position.z, position.y - FLOOR_Y, footprint)
}

/// Shadow under a floating cube, measured from its bottom face
pub fn obstacle_shadow(obstacle: &Obstacle) -> Option<BlobShadow> {
    let half = obstacle.size * 0.5;
    let bottom = obstacle.position.y - half;
    blob_shadow(obstacle.position.x, obstacle.position.z, bottom - FLOOR_Y, half)
}
