//! Character
//!
//! The one animated object the viewer shows. Built from a decoded
//! [`CharacterAsset`]; owns its GPU resource handles until `release`.

use crate::asset::{AnimationName, CharacterAsset, ResourceHandle, ResourceKind, ResourcePool, TextureData};
use crate::math::{mat4_transform_point, Aabb, Vec3};
use super::animation::AnimationPlayer;
use super::transform::Transform;

/// Drawable piece of a character plus the resources backing it
#[derive(Debug)]
pub struct CharacterPart {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u16>,
    pub color: [u8; 4],
    /// Pixels for the renderer to upload, keyed by the texture handle id
    pub texture_data: Option<TextureData>,
    geometry: Option<ResourceHandle>,
    material: Option<ResourceHandle>,
    texture: Option<ResourceHandle>,
}

impl CharacterPart {
    pub fn texture_id(&self) -> Option<u64> {
        self.texture.as_ref().map(|h| h.id())
    }
}

#[derive(Debug)]
pub struct Character {
    pub name: AnimationName,
    pub transform: Transform,
    pub parts: Vec<CharacterPart>,
    /// Present only when the asset carried at least one clip
    pub animation: Option<AnimationPlayer>,
}

impl Character {
    /// Register the asset's resources and build the character (no player yet)
    pub fn instantiate(name: AnimationName, asset: CharacterAsset, pool: &mut ResourcePool) -> Self {
        let parts = asset
            .parts
            .into_iter()
            .map(|part| {
                let geometry = (!part.indices.is_empty()).then(|| pool.allocate(ResourceKind::Geometry));
                let material = Some(pool.allocate(ResourceKind::Material));
                let texture = part.texture.as_ref().map(|_| pool.allocate(ResourceKind::Texture));
                CharacterPart {
                    positions: part.positions,
                    uvs: part.uvs,
                    indices: part.indices,
                    color: part.color,
                    texture_data: part.texture,
                    geometry,
                    material,
                    texture,
                }
            })
            .collect();

        Self {
            name,
            transform: Transform::from_position_rotation(asset.position, asset.rotation),
            parts,
            animation: AnimationPlayer::new(asset.clips),
        }
    }

    pub fn clip_count(&self) -> usize {
        self.animation.as_ref().map(|p| p.clip_count()).unwrap_or(0)
    }

    /// Animated offset of part `index` in the current pose
    pub fn part_offset(&self, index: usize) -> Vec3 {
        self.animation
            .as_ref()
            .map(|p| p.part_offset(index))
            .unwrap_or(Vec3::ZERO)
    }

    /// World-space bounds of the current pose and transform
    pub fn world_bounds(&self) -> Aabb {
        let matrix = self.transform.to_matrix();
        let mut bounds = Aabb::EMPTY;
        for (index, part) in self.parts.iter().enumerate() {
            let offset = self.part_offset(index);
            for &p in &part.positions {
                bounds.expand(mat4_transform_point(&matrix, p + offset));
            }
        }
        bounds
    }

    /// Free geometry, material and texture of every part. Each release is
    /// independent; parts missing a resource are skipped. Returns the number
    /// of resources freed.
    pub fn release(mut self, pool: &mut ResourcePool) -> usize {
        let mut freed = 0;
        for part in &mut self.parts {
            for handle in [part.material.take(), part.texture.take(), part.geometry.take()]
                .into_iter()
                .flatten()
            {
                if pool.release(handle) {
                    freed += 1;
                }
            }
        }
        freed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::cube_asset;

    #[test]
    fn test_instantiate_registers_resources() {
        let mut pool = ResourcePool::new();
        let character = Character::instantiate(AnimationName::Idle, cube_asset(2, true), &mut pool);

        assert_eq!(pool.live_count_of(ResourceKind::Geometry), 1);
        assert_eq!(pool.live_count_of(ResourceKind::Material), 1);
        assert_eq!(pool.live_count_of(ResourceKind::Texture), 1);
        assert_eq!(character.clip_count(), 2);
        assert!(character.parts[0].texture_id().is_some());
    }

    #[test]
    fn test_release_frees_everything_once() {
        let mut pool = ResourcePool::new();
        let character = Character::instantiate(AnimationName::Walk, cube_asset(0, false), &mut pool);
        assert!(character.animation.is_none());
        assert_eq!(pool.live_count(), 2);

        assert_eq!(character.release(&mut pool), 2);
        assert_eq!(pool.live_count(), 0);
    }

    #[test]
    fn test_world_bounds_follow_transform() {
        let mut pool = ResourcePool::new();
        let mut character = Character::instantiate(AnimationName::Idle, cube_asset(0, false), &mut pool);
        character.transform.scale = 10.0;
        character.transform.position = Vec3::new(100.0, 0.0, 0.0);

        let bounds = character.world_bounds();
        assert!((bounds.min.x - 95.0).abs() < 1e-3);
        assert!((bounds.max.x - 105.0).abs() < 1e-3);
        assert!((bounds.max.y - 10.0).abs() < 1e-3);
    }
}
