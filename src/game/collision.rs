//! Collision System
//!
//! Brute-force AABB sweep of the character against the obstacle cubes.
//! Character bounds are rebuilt from the live pose every call; obstacles
//! never move, so their bounds are computed once when they are spawned.
//! Overlaps are reported, not resolved.

use std::collections::BTreeSet;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use crate::config::ObstacleConfig;
use crate::math::{Aabb, Vec3};
use super::character::Character;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId(pub usize);

/// A static cube in the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub position: Vec3,
    pub size: f32,
    bounds: Aabb,
}

impl Obstacle {
    pub fn new(id: ObstacleId, position: Vec3, size: f32) -> Self {
        Self {
            id,
            position,
            size,
            bounds: Aabb::from_center_size(position, Vec3::new(size, size, size)),
        }
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }
}

/// Scatter `config.count` cubes on the X/Z plane at `config.height`
pub fn spawn_obstacles(config: &ObstacleConfig, seed: u64) -> Vec<Obstacle> {
    let mut rng = StdRng::seed_from_u64(seed);
    let spread = config.spread.max(0.0);
    let coordinate = |rng: &mut StdRng| {
        if spread > 0.0 {
            rng.gen_range(-spread..spread)
        } else {
            0.0
        }
    };

    (0..config.count)
        .map(|i| {
            let x = coordinate(&mut rng);
            let z = coordinate(&mut rng);
            Obstacle::new(ObstacleId(i), Vec3::new(x, config.height, z), config.size)
        })
        .collect()
}

/// Obstacles whose bounds intersect `bounds` (closed intervals on all axes)
pub fn sweep(bounds: &Aabb, obstacles: &[Obstacle]) -> BTreeSet<ObstacleId> {
    if bounds.is_empty() {
        return BTreeSet::new();
    }
    obstacles
        .iter()
        .filter(|o| bounds.intersects(o.bounds()))
        .map(|o| o.id)
        .collect()
}

/// Sweep using the character's current world-space bounds
pub fn sweep_character(character: &Character, obstacles: &[Obstacle]) -> BTreeSet<ObstacleId> {
    sweep(&character.world_bounds(), obstacles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::{cube_asset, AnimationName, ResourcePool};

    fn unit_box_at(center: Vec3) -> Aabb {
        Aabb::from_center_size(center, Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_disjoint_obstacles_report_nothing() {
        let obstacles = vec![
            Obstacle::new(ObstacleId(0), Vec3::new(10.0, 0.0, 0.0), 2.0),
            Obstacle::new(ObstacleId(1), Vec3::new(0.0, 10.0, 0.0), 2.0),
            // Overlaps on X and Y, separated on Z only
            Obstacle::new(ObstacleId(2), Vec3::new(0.0, 0.0, 1.6), 2.0),
        ];
        assert!(sweep(&unit_box_at(Vec3::ZERO), &obstacles).is_empty());
    }

    #[test]
    fn test_overlap_on_all_axes_is_reported() {
        let obstacles = vec![
            Obstacle::new(ObstacleId(0), Vec3::new(10.0, 0.0, 0.0), 2.0),
            Obstacle::new(ObstacleId(1), Vec3::new(0.5, 0.5, 0.5), 2.0),
        ];
        let hits = sweep(&unit_box_at(Vec3::ZERO), &obstacles);
        assert_eq!(hits.into_iter().collect::<Vec<_>>(), vec![ObstacleId(1)]);
    }

    #[test]
    fn test_touching_counts_as_overlap() {
        // Character spans x in [-0.5, 0.5]; obstacle spans [0.5, 2.5]
        let obstacles = vec![Obstacle::new(ObstacleId(4), Vec3::new(1.5, 0.0, 0.0), 2.0)];
        assert!(sweep(&unit_box_at(Vec3::ZERO), &obstacles).contains(&ObstacleId(4)));
    }

    #[test]
    fn test_empty_character_bounds_hit_nothing() {
        let obstacles = vec![Obstacle::new(ObstacleId(0), Vec3::ZERO, 1000.0)];
        assert!(sweep(&Aabb::EMPTY, &obstacles).is_empty());
    }

    #[test]
    fn test_sweep_tracks_character_movement() {
        let mut pool = ResourcePool::new();
        let mut character = Character::instantiate(AnimationName::Idle, cube_asset(0, false), &mut pool);
        let obstacles = vec![Obstacle::new(ObstacleId(0), Vec3::new(0.0, 0.5, -50.0), 2.0)];

        assert!(sweep_character(&character, &obstacles).is_empty());
        character.transform.translate_z(-50.0);
        assert!(sweep_character(&character, &obstacles).contains(&ObstacleId(0)));
    }

    #[test]
    fn test_spawn_is_seeded_and_in_range() {
        let config = ObstacleConfig::default();
        let a = spawn_obstacles(&config, 42);
        let b = spawn_obstacles(&config, 42);
        assert_eq!(a, b);
        assert_eq!(a.len(), 150);
        for o in &a {
            assert!(o.position.x >= -800.0 && o.position.x < 800.0);
            assert!(o.position.z >= -800.0 && o.position.z < 800.0);
            assert_eq!(o.position.y, 100.0);
        }
    }

    #[test]
    fn test_zero_spread_stacks_at_origin() {
        let config = ObstacleConfig { count: 3, spread: 0.0, ..ObstacleConfig::default() };
        assert!(spawn_obstacles(&config, 1).iter().all(|o| o.position.x == 0.0 && o.position.z == 0.0));
    }
}
