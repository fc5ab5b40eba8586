//! Asset Swapper
//!
//! Owns the active character and the loads that may replace it. Requests are
//! never cancelled; each one gets a token and only the latest issued token is
//! allowed to attach, so a slow load finishing after a fast one is dropped
//! instead of winning the race.

use crate::asset::{AnimationName, AssetSource, AsyncOp, CharacterAsset, ResourcePool};
use crate::math::Vec3;
use super::character::Character;
use super::event::{AssetLoaded, Events, LoadFailed};

/// Identifies one `request` call. Later requests compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

struct PendingLoad {
    token: RequestToken,
    name: AnimationName,
    op: AsyncOp<CharacterAsset>,
}

pub struct AssetSwapper {
    next_token: u64,
    latest: Option<RequestToken>,
    pending: Vec<PendingLoad>,
    active: Option<Character>,
    idle_reference: Option<Vec3>,
}

impl AssetSwapper {
    pub fn new() -> Self {
        Self {
            next_token: 0,
            latest: None,
            pending: Vec::new(),
            active: None,
            idle_reference: None,
        }
    }

    /// Start loading `name`. Returns at once; the result is picked up by `poll`.
    pub fn request(&mut self, name: AnimationName, source: &dyn AssetSource) -> RequestToken {
        let token = RequestToken(self.next_token);
        self.next_token += 1;
        self.latest = Some(token);

        tracing::debug!(?token, %name, "requesting asset");
        self.pending.push(PendingLoad {
            token,
            name,
            op: source.load(name),
        });
        token
    }

    /// Number of loads that have not completed yet
    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    pub fn character(&self) -> Option<&Character> {
        self.active.as_ref()
    }

    pub fn character_mut(&mut self) -> Option<&mut Character> {
        self.active.as_mut()
    }

    /// Position of the character at the most recent Idle load
    pub fn idle_reference(&self) -> Option<Vec3> {
        self.idle_reference
    }

    /// Collect finished loads. The latest request attaches (or reports
    /// `LoadFailed`); completions of superseded requests are discarded.
    pub fn poll(&mut self, pool: &mut ResourcePool, events: &mut Events) {
        let mut completed = Vec::new();
        let mut still_pending = Vec::with_capacity(self.pending.len());

        for mut load in self.pending.drain(..) {
            if load.op.is_complete() {
                completed.push(load);
            } else {
                still_pending.push(load);
            }
        }
        self.pending = still_pending;

        for load in completed {
            let PendingLoad { token, name, op } = load;
            let Some(result) = op.take() else { continue };

            if Some(token) != self.latest {
                tracing::info!(?token, %name, ok = result.is_ok(), "discarding superseded load");
                continue;
            }

            match result {
                Ok(asset) => {
                    self.attach(name, asset, pool);
                    events.asset_loaded.send(AssetLoaded { token, name });
                }
                Err(error) => {
                    tracing::warn!(?token, %name, %error, "asset load failed, keeping current character");
                    events.load_failed.send(LoadFailed { token, name, error });
                }
            }
        }
    }

    fn attach(&mut self, name: AnimationName, asset: CharacterAsset, pool: &mut ResourcePool) {
        if let Some(previous) = self.active.take() {
            let freed = previous.release(pool);
            tracing::debug!(freed, "released previous character");
        }

        let mut character = Character::instantiate(name, asset, pool);
        if name == AnimationName::Idle {
            self.idle_reference = Some(character.transform.position);
        }
        if let Some(player) = character.animation.as_mut() {
            player.clamp_when_finished = true;
            player.play(0);
        }

        tracing::info!(%name, clips = character.clip_count(), "asset loaded");
        self.active = Some(character);
    }
}

impl Default for AssetSwapper {
    fn default() -> Self {
        Self::new()
    }
}
