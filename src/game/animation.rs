//! Animation Player
//!
//! Plays one clip of a character at a time, once through. The frame a clip
//! runs out, `update` reports it so the runtime can queue the follow-up
//! asset. No blending: `play` replaces whatever was running.

use crate::asset::AnimationClip;
use crate::math::Vec3;

/// A play-once clip reached its end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFinished {
    pub clip: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct ClipAction {
    clip: usize,
    time: f32,
    finished: bool,
}

#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    clips: Vec<AnimationClip>,
    action: Option<ClipAction>,
    /// Hold the last frame after the clip ends (else snap to rest pose)
    pub clamp_when_finished: bool,
}

impl AnimationPlayer {
    /// Player for `clips`, or None when there is nothing to play
    pub fn new(clips: Vec<AnimationClip>) -> Option<Self> {
        if clips.is_empty() {
            return None;
        }
        Some(Self {
            clips,
            action: None,
            clamp_when_finished: false,
        })
    }

    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }

    pub fn clip(&self, index: usize) -> Option<&AnimationClip> {
        self.clips.get(index)
    }

    /// Index of the clip currently bound (playing or holding its last frame)
    pub fn current_clip(&self) -> Option<usize> {
        self.action.map(|a| a.clip)
    }

    pub fn time(&self) -> f32 {
        self.action.map(|a| a.time).unwrap_or(0.0)
    }

    pub fn is_playing(&self) -> bool {
        self.action.map(|a| !a.finished).unwrap_or(false)
    }

    /// Start `index` from the beginning. Returns false for a missing clip.
    pub fn play(&mut self, index: usize) -> bool {
        if index >= self.clips.len() {
            return false;
        }
        self.action = Some(ClipAction {
            clip: index,
            time: 0.0,
            finished: false,
        });
        true
    }

    pub fn stop(&mut self) {
        self.action = None;
    }

    /// Advance by `dt` seconds
    pub fn update(&mut self, dt: f32) -> Option<AnimationFinished> {
        let action = self.action.as_mut()?;
        if action.finished {
            return None;
        }
        let duration = self.clips[action.clip].duration;
        action.time += dt.max(0.0);
        if action.time < duration {
            return None;
        }
        action.time = duration;
        action.finished = true;
        Some(AnimationFinished { clip: action.clip })
    }

    /// Sampled translation of mesh part `part` in the current pose
    pub fn part_offset(&self, part: usize) -> Vec3 {
        let Some(action) = self.action else { return Vec3::ZERO };
        if action.finished && !self.clamp_when_finished {
            return Vec3::ZERO;
        }
        self.clips[action.clip]
            .tracks
            .iter()
            .filter(|t| t.part == part)
            .fold(Vec3::ZERO, |acc, t| acc + t.sample(action.time))
    }
}
