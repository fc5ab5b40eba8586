//! Jump Effect
//!
//! Timed vertical overlay driven by the caller once per tick. It runs on its
//! own clock, separate from the animation player's timeline:
//!
//! ```text
//! y(progress) = height * sin(progress * PI),  progress = clamp(elapsed / duration, 0, 1)
//! ```

use std::f32::consts::PI;
use crate::config::JumpConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JumpState {
    Ready,
    Active { started_at: f64 },
    Complete,
}

/// Sampled state of an active jump
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpFrame {
    pub progress: f32,
    /// Vertical position to apply to the character
    pub height: f32,
    /// Set on the frame progress reaches 1; the effect is complete after it
    pub finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpEffect {
    pub height: f32,
    pub duration: f64,
    state: JumpState,
}

impl JumpEffect {
    pub fn new(config: &JumpConfig) -> Self {
        Self {
            height: config.height,
            duration: config.duration,
            state: JumpState::Ready,
        }
    }

    pub fn state(&self) -> JumpState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, JumpState::Active { .. })
    }

    /// Start (or restart) the jump at `now` seconds
    pub fn trigger(&mut self, now: f64) {
        self.state = JumpState::Active { started_at: now };
    }

    pub fn progress_at(&self, now: f64) -> Option<f32> {
        let JumpState::Active { started_at } = self.state else { return None };
        if self.duration <= 0.0 {
            return Some(1.0);
        }
        Some(((now - started_at) / self.duration).clamp(0.0, 1.0) as f32)
    }

    /// Height for a given progress. Exact zero at both ends.
    pub fn height_at(&self, progress: f32) -> f32 {
        if progress <= 0.0 || progress >= 1.0 {
            return 0.0;
        }
        self.height * (progress * PI).sin()
    }

    /// Sample the jump at `now`. Returns None unless active; the frame with
    /// `finished` set moves the effect to `Complete`.
    pub fn advance(&mut self, now: f64) -> Option<JumpFrame> {
        let progress = self.progress_at(now)?;
        let finished = progress >= 1.0;
        if finished {
            self.state = JumpState::Complete;
        }
        Some(JumpFrame {
            progress,
            height: self.height_at(progress),
            finished,
        })
    }
}
