//! Character Assets
//!
//! Everything between a file on disk and a character the viewer can attach:
//!
//! ```text
//! FileAssetSource::load(Walk)        -> AsyncOp<CharacterAsset>   (returns immediately)
//!   background read + decode          -> models/ron/Walk.ron
//! AsyncOp polled each frame           -> Ok(asset) | Err(AssetError)
//! Character::instantiate(asset, pool) -> registers GPU resources in ResourcePool
//! ```

mod asset;
mod async_ops;
mod resources;
mod source;

pub use asset::{AnimationClip, AnimationName, AssetError, CharacterAsset, TextureData};
#[cfg(test)]
pub(crate) use asset::{cube_asset, Keyframe, Track};
pub use async_ops::AsyncOp;
#[cfg(test)]
pub(crate) use async_ops::{pending, Completer};
pub use resources::{ResourceHandle, ResourceKind, ResourcePool};
pub use source::{AssetSource, FileAssetSource};
