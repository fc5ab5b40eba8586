//! Viewer Game Module
//!
//! Everything that changes while the viewer runs, independent of drawing:
//!
//! - Character: the active animated object and its resource handles
//! - AnimationPlayer: one clip at a time, played once with a finished event
//! - AssetSwapper: token-ordered asset loads replacing the character
//! - MotionController / CameraRig: discrete key steps and the orbit camera
//! - JumpEffect: timed sine overlay on the character's height
//! - Collision: AABB sweep against the static obstacle cubes
//! - Shadows: blob shadows under the character and the cubes
//! - Events: per-tick queues systems report through
//! - ViewerSession: owns all of the above and runs the tick

pub mod animation;
pub mod character;
pub mod collision;
pub mod event;
pub mod jump;
pub mod motion;
pub mod runtime;
pub mod shadow;
pub mod swapper;
pub mod transform;

// Re-export main types
pub use character::Character;
pub use motion::{CameraPan, CharacterMove};
pub use runtime::ViewerSession;
