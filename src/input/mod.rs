//! Input handling
//!
//! Maps keyboard presses to viewer actions and tracks the mouse for the
//! orbit camera.

mod actions;
mod state;

pub use actions::*;
pub use state::*;
