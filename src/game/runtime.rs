//! Viewer Runtime
//!
//! The session context that owns everything the viewer mutates: camera,
//! active character (through the swapper), jump effect, obstacles and the
//! GPU resource pool. Input arrives through `handle_action`; the render
//! loop calls `tick` once per frame and then draws from the session.

use std::collections::BTreeSet;
use crate::asset::{AnimationName, AssetSource, ResourcePool};
use crate::config::ViewerConfig;
use crate::input::ViewerAction;
use crate::scene::SceneParams;
use super::collision::{spawn_obstacles, sweep_character, Obstacle, ObstacleId};
use super::event::{CollisionEvent, Events};
use super::jump::JumpEffect;
use super::motion::{CameraRig, MotionController};
use super::swapper::{AssetSwapper, RequestToken};

/// Clip played for the jump (the second clip of the asset)
const JUMP_CLIP: usize = 1;

pub struct ViewerSession {
    pub config: ViewerConfig,
    pub camera: CameraRig,
    pub motion: MotionController,
    pub swapper: AssetSwapper,
    pub jump: JumpEffect,
    pub obstacles: Vec<Obstacle>,
    /// Obstacles overlapping the character after the last tick
    pub contacts: BTreeSet<ObstacleId>,
    /// Events of the last tick; cleared when the next tick starts
    pub events: Events,
    pub resources: ResourcePool,
    pub scene: SceneParams,
    /// One-line HUD message about the last load
    pub status: String,
    source: Box<dyn AssetSource>,
}

impl ViewerSession {
    pub fn new(config: ViewerConfig, source: Box<dyn AssetSource>, obstacle_seed: u64) -> Self {
        let obstacles = spawn_obstacles(&config.obstacles, obstacle_seed);
        tracing::info!(count = obstacles.len(), seed = obstacle_seed, "spawned obstacles");

        Self {
            camera: CameraRig::new(&config.camera),
            motion: MotionController::new(&config.movement),
            swapper: AssetSwapper::new(),
            jump: JumpEffect::new(&config.jump),
            obstacles,
            contacts: BTreeSet::new(),
            events: Events::new(),
            resources: ResourcePool::new(),
            scene: SceneParams::new(&config.scene),
            status: String::new(),
            source,
            config,
        }
    }

    /// Load the configured initial asset
    pub fn start(&mut self) -> RequestToken {
        let initial = self.config.assets.initial;
        self.load(initial)
    }

    pub fn load(&mut self, name: AnimationName) -> RequestToken {
        self.status = format!("Loading {}...", name);
        self.swapper.request(name, self.source.as_ref())
    }

    pub fn handle_action(&mut self, action: ViewerAction, now: f64) {
        match action {
            ViewerAction::Load(name) => {
                self.load(name);
            }
            ViewerAction::Move(mv) => {
                if let Some(character) = self.swapper.character_mut() {
                    self.motion.move_character(&mut character.transform, mv);
                }
            }
            ViewerAction::Pan(pan) => self.motion.pan_camera(&mut self.camera, pan),
            ViewerAction::Jump => self.start_jump(now),
        }
    }

    /// Play the jump clip and start the height overlay. Needs a character
    /// with at least two clips; otherwise nothing happens.
    fn start_jump(&mut self, now: f64) {
        let Some(character) = self.swapper.character_mut() else { return };
        if character.clip_count() <= JUMP_CLIP {
            tracing::debug!(clips = character.clip_count(), "jump ignored, no jump clip");
            return;
        }
        if let Some(player) = character.animation.as_mut() {
            player.play(JUMP_CLIP);
        }
        if self.jump.is_active() {
            tracing::debug!("restarting jump");
        }
        self.jump.trigger(now);
    }

    /// Advance one frame: animation, jump overlay, pending loads, collisions
    pub fn tick(&mut self, now: f64, dt: f32) {
        self.events.clear_all();

        if let Some(finished) = self
            .swapper
            .character_mut()
            .and_then(|c| c.animation.as_mut())
            .and_then(|p| p.update(dt))
        {
            tracing::debug!(clip = finished.clip, "clip finished");
            self.events.animation_finished.send(finished);
        }
        if !self.events.animation_finished.is_empty() {
            tracing::info!("animation finished, returning to idle");
            self.load(AnimationName::Idle);
        }

        if let Some(frame) = self.jump.advance(now) {
            tracing::trace!(progress = frame.progress, height = frame.height, "jump");
            if let Some(character) = self.swapper.character_mut() {
                character.transform.position.y = frame.height;
                if frame.finished {
                    if let Some(player) = character.animation.as_mut() {
                        player.stop();
                    }
                }
            }
            if frame.finished {
                tracing::info!("jump landed, returning to idle");
                self.load(AnimationName::Idle);
            }
        }

        self.swapper.poll(&mut self.resources, &mut self.events);

        self.update_contacts();
        self.update_status();
    }

    fn update_contacts(&mut self) {
        let contacts = match self.swapper.character() {
            Some(character) => sweep_character(character, &self.obstacles),
            None => BTreeSet::new(),
        };

        for id in contacts.difference(&self.contacts) {
            tracing::debug!(obstacle = id.0, "collision started");
        }
        for id in self.contacts.difference(&contacts) {
            tracing::debug!(obstacle = id.0, "collision ended");
        }
        for &obstacle in &contacts {
            self.events.collision.send(CollisionEvent { obstacle });
        }
        self.contacts = contacts;
    }

    fn update_status(&mut self) {
        if let Some(loaded) = self.events.asset_loaded.iter().last() {
            tracing::debug!(token = ?loaded.token, "status: loaded");
            self.status = format!("{} loaded", loaded.name);
        }
        if let Some(failed) = self.events.load_failed.iter().last() {
            tracing::debug!(token = ?failed.token, "status: failed");
            self.status = format!("Failed to load {}: {}", failed.name, failed.error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use crate::asset::{cube_asset, AssetError, CharacterAsset};
    use crate::game::{CameraPan, CharacterMove};
    use crate::game::swapper::tests::ManualSource;
    use crate::math::Vec3;

    fn session() -> (ViewerSession, Rc<ManualSource>) {
        let source = Rc::new(ManualSource::default());
        let config = ViewerConfig::default();
        let mut session = ViewerSession::new(config, Box::new(Rc::clone(&source)), 7);
        session.obstacles.clear();
        (session, source)
    }

    fn asset_at(position: Vec3, clips: usize) -> CharacterAsset {
        CharacterAsset { position, ..cube_asset(clips, false) }
    }

    #[test]
    fn test_number_keys_request_in_order() {
        let (mut session, source) = session();
        for name in AnimationName::ALL {
            session.handle_action(ViewerAction::Load(name), 0.0);
        }
        assert_eq!(*source.requested.borrow(), AnimationName::ALL.to_vec());

        // Resolving out of order still ends on the last key pressed
        for i in [4, 0, 3, 1, 2] {
            source.complete(i, Ok(asset_at(Vec3::ZERO, 1)));
            session.tick(0.0, 0.0);
        }
        assert_eq!(session.swapper.character().unwrap().name, AnimationName::Dying);
        assert_eq!(source.requested.borrow().len(), 5);
    }

    #[test]
    fn test_jump_lands_and_returns_to_idle_reference() {
        let (mut session, source) = session();
        let home = Vec3::new(10.0, 0.0, -20.0);

        session.start();
        source.complete(0, Ok(asset_at(home, 2)));
        session.tick(0.0, 0.0);
        assert_eq!(session.swapper.idle_reference(), Some(home));

        session.handle_action(ViewerAction::Move(CharacterMove::Forward), 0.0);
        session.handle_action(ViewerAction::Jump, 1.0);
        assert_eq!(
            session.swapper.character().unwrap().animation.as_ref().unwrap().current_clip(),
            Some(JUMP_CLIP)
        );

        session.tick(1.3, 0.3);
        let y = session.swapper.character().unwrap().transform.position.y;
        assert!((y - 100.0).abs() < 1e-2);

        session.tick(1.7, 0.4);
        let character = session.swapper.character().unwrap();
        assert_eq!(character.transform.position.y, 0.0);
        assert_eq!(character.animation.as_ref().unwrap().current_clip(), None);
        assert_eq!(source.requested.borrow().last(), Some(&AnimationName::Idle));

        source.complete(1, Ok(asset_at(home, 2)));
        session.tick(1.8, 0.1);
        assert_eq!(session.swapper.character().unwrap().transform.position, home);
        assert_eq!(session.swapper.idle_reference(), Some(home));
    }

    #[test]
    fn test_move_during_jump_keeps_both() {
        let (mut session, source) = session();
        session.start();
        source.complete(0, Ok(asset_at(Vec3::ZERO, 2)));
        session.tick(0.0, 0.0);

        session.handle_action(ViewerAction::Jump, 1.0);
        session.tick(1.15, 0.15);
        session.handle_action(ViewerAction::Move(CharacterMove::Forward), 1.15);
        session.tick(1.3, 0.15);

        // Move owns X/Z, the jump owns Y
        let position = session.swapper.character().unwrap().transform.position;
        assert!(position.x.abs() < 1e-3);
        assert!((position.y - 100.0).abs() < 1e-2);
        assert!((position.z + 50.0).abs() < 1e-3);
        assert!(session.jump.is_active());
    }

    #[test]
    fn test_jump_needs_two_clips() {
        let (mut session, source) = session();
        session.handle_action(ViewerAction::Jump, 0.0);
        assert!(!session.jump.is_active());

        session.start();
        source.complete(0, Ok(asset_at(Vec3::ZERO, 1)));
        session.tick(0.0, 0.0);
        session.handle_action(ViewerAction::Jump, 0.0);
        assert!(!session.jump.is_active());
    }

    #[test]
    fn test_finished_clip_requests_idle() {
        let (mut session, source) = session();
        session.load(AnimationName::Run);
        source.complete(0, Ok(asset_at(Vec3::ZERO, 1)));
        session.tick(0.0, 0.0);

        session.tick(0.5, 0.5);
        assert_eq!(source.requested.borrow().len(), 1);
        session.tick(1.1, 0.6);
        assert_eq!(*source.requested.borrow(), vec![AnimationName::Run, AnimationName::Idle]);
        assert_eq!(session.events.animation_finished.len(), 1);
    }

    #[test]
    fn test_moves_without_character_are_ignored() {
        let (mut session, _source) = session();
        session.handle_action(ViewerAction::Move(CharacterMove::Left), 0.0);
        session.tick(0.0, 0.016);
        assert!(session.swapper.character().is_none());
        assert!(session.contacts.is_empty());
    }

    #[test]
    fn test_camera_pan_action() {
        let (mut session, _source) = session();
        let before = session.camera.position;
        session.handle_action(ViewerAction::Pan(CameraPan::Forward), 0.0);
        assert!(((session.camera.position - before).len() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn test_contacts_follow_character() {
        let (mut session, source) = session();
        session.obstacles = vec![Obstacle::new(ObstacleId(9), Vec3::new(0.0, 0.5, -50.0), 2.0)];
        session.start();
        source.complete(0, Ok(asset_at(Vec3::ZERO, 0)));
        session.tick(0.0, 0.0);
        assert!(session.contacts.is_empty());

        session.handle_action(ViewerAction::Move(CharacterMove::Forward), 0.0);
        session.tick(0.1, 0.1);
        assert!(session.contacts.contains(&ObstacleId(9)));
        assert_eq!(session.events.collision.len(), 1);

        session.handle_action(ViewerAction::Move(CharacterMove::Backward), 0.1);
        session.tick(0.2, 0.1);
        assert!(session.contacts.is_empty());
    }

    #[test]
    fn test_failed_load_sets_status() {
        let (mut session, source) = session();
        session.load(AnimationName::Walk);
        source.complete(0, Err(AssetError::Io("missing".into())));
        session.tick(0.0, 0.0);
        assert!(session.status.starts_with("Failed to load Walk"));
        assert!(session.swapper.character().is_none());
    }
}
