//! Viewer action definitions
//!
//! Keyboard layout:
//! - W/S = step character forward/backward
//! - A/D = turn left/right and step
//! - Arrow keys = pan camera
//! - Space = jump
//! - 1..5 = load Idle, Walk, Run, Jump, Dying

use macroquad::prelude::KeyCode;
use crate::asset::AnimationName;
use crate::game::{CameraPan, CharacterMove};

/// Everything a key press can ask the viewer to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerAction {
    Move(CharacterMove),
    Pan(CameraPan),
    Jump,
    Load(AnimationName),
}

/// Action bound to `key`, if any. One press is one action; repeats and
/// releases are not distinguished.
pub fn action_for_key(key: KeyCode) -> Option<ViewerAction> {
    let action = match key {
        KeyCode::W => ViewerAction::Move(CharacterMove::Forward),
        KeyCode::S => ViewerAction::Move(CharacterMove::Backward),
        KeyCode::A => ViewerAction::Move(CharacterMove::Left),
        KeyCode::D => ViewerAction::Move(CharacterMove::Right),

        KeyCode::Up => ViewerAction::Pan(CameraPan::Forward),
        KeyCode::Down => ViewerAction::Pan(CameraPan::Backward),
        KeyCode::Left => ViewerAction::Pan(CameraPan::Left),
        KeyCode::Right => ViewerAction::Pan(CameraPan::Right),

        KeyCode::Space => ViewerAction::Jump,

        KeyCode::Key1 => ViewerAction::Load(AnimationName::from_number(1)?),
        KeyCode::Key2 => ViewerAction::Load(AnimationName::from_number(2)?),
        KeyCode::Key3 => ViewerAction::Load(AnimationName::from_number(3)?),
        KeyCode::Key4 => ViewerAction::Load(AnimationName::from_number(4)?),
        KeyCode::Key5 => ViewerAction::Load(AnimationName::from_number(5)?),

        _ => return None,
    };
    Some(action)
}
