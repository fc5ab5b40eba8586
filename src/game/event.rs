//! Event System
//!
//! Systems report what happened during a tick through typed queues instead
//! of calling each other:
//!
//! 1. Animation player runs out of a clip → `AnimationFinished`
//! 2. Runtime reads it → requests the Idle asset
//! 3. Swapper attaches the new character → `AssetLoaded`
//! 4. HUD reads `AssetLoaded` / `LoadFailed` → status line

use crate::asset::{AnimationName, AssetError};
use super::animation::AnimationFinished;
use super::collision::ObstacleId;
use super::swapper::RequestToken;

/// A queue for events of a single type.
/// Events are collected during the frame and drained at specific points.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A requested asset became the active character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetLoaded {
    pub token: RequestToken,
    pub name: AnimationName,
}

/// A requested asset could not be loaded; the previous character stays
#[derive(Debug, Clone, PartialEq)]
pub struct LoadFailed {
    pub token: RequestToken,
    pub name: AnimationName,
    pub error: AssetError,
}

/// The character's bounds overlap an obstacle this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub obstacle: ObstacleId,
}

/// Container for all viewer events
#[derive(Debug, Default)]
pub struct Events {
    pub animation_finished: EventQueue<AnimationFinished>,
    pub asset_loaded: EventQueue<AssetLoaded>,
    pub load_failed: EventQueue<LoadFailed>,
    pub collision: EventQueue<CollisionEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all event queues. Called when a tick starts.
    pub fn clear_all(&mut self) {
        self.animation_finished.clear();
        self.asset_loaded.clear();
        self.load_failed.clear();
        self.collision.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_queue() {
        let mut queue: EventQueue<i32> = EventQueue::new();

        queue.send(1);
        queue.send(2);
        queue.send(3);

        assert_eq!(queue.len(), 3);

        let collected: Vec<_> = queue.iter().copied().collect();
        assert_eq!(collected, vec![1, 2, 3]);

        queue.clear();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_events_container() {
        let mut events = Events::new();
        events.animation_finished.send(AnimationFinished { clip: 0 });
        events.collision.send(CollisionEvent { obstacle: ObstacleId(3) });

        assert_eq!(events.animation_finished.len(), 1);

        events.clear_all();
        assert!(events.animation_finished.is_empty());
        assert!(events.collision.is_empty());
    }
}
