//! Math primitives shared by the game logic and the renderer

mod aabb;
mod vec;

pub use aabb::Aabb;
pub use vec::*;
