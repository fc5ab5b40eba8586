//! Viewer configuration
//!
//! Tunables live in an optional `viewer.ron` file. Every section falls back to
//! defaults field by field, so a config only needs the values it overrides:
//!
//! ```ron
//! (
//!     movement: (step: 25.0),
//!     obstacles: (count: 40, seed: Some(7)),
//! )
//! ```

use std::path::Path;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::asset::AnimationName;
use crate::math::Vec3;

/// Default config file, resolved relative to the working directory
pub const CONFIG_FILE: &str = "viewer.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Character and camera step distances (one step per key press)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    pub step: f32,
    pub camera_step: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self { step: 50.0, camera_step: 20.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    /// Peak height reached at half the duration
    pub height: f32,
    /// Seconds from take-off to landing
    pub duration: f64,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self { height: 100.0, duration: 0.6 }
    }
}

/// Obstacle pool generated once at startup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub count: usize,
    /// Cube edge length
    pub size: f32,
    /// Cubes are scattered uniformly in [-spread, spread) on X and Z
    pub spread: f32,
    /// Cube centre height (level with the character)
    pub height: f32,
    /// Fixed seed for reproducible layouts; time-seeded when None
    pub seed: Option<u64>,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            count: 150,
            size: 40.0,
            spread: 800.0,
            height: 100.0,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: Vec3,
    /// Orbit pivot the camera initially looks at
    pub target: Vec3,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Radians of orbit per pixel of mouse drag
    pub orbit_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vec3::new(100.0, 200.0, 300.0),
            target: Vec3::new(0.0, 100.0, 0.0),
            fov: 45.0,
            near: 1.0,
            far: 2000.0,
            orbit_sensitivity: 0.005,
        }
    }
}

/// Where character assets are found: `<dir>/<format>/<Name>.<format>`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub dir: String,
    pub format: String,
    pub initial: AnimationName,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            dir: "models".to_string(),
            format: "ron".to_string(),
            initial: AnimationName::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub light_intensity: f32,
    pub fog_distance: f32,
    /// Background and fog colour (0xRRGGBB)
    pub fog_color: u32,
    pub ground_size: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            light_intensity: 5.0,
            fog_distance: 1000.0,
            fog_color: 0xa0a0a0,
            ground_size: 2000.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub movement: MovementConfig,
    pub jump: JumpConfig,
    pub obstacles: ObstacleConfig,
    pub camera: CameraConfig,
    pub assets: AssetConfig,
    pub scene: SceneConfig,
}

impl ViewerConfig {
    pub fn from_ron(s: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Load `path` if it exists, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring config file");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_reference_constants() {
        let config = ViewerConfig::default();
        assert_eq!(config.movement.step, 50.0);
        assert_eq!(config.movement.camera_step, 20.0);
        assert_eq!(config.jump.height, 100.0);
        assert_eq!(config.jump.duration, 0.6);
        assert_eq!(config.obstacles.count, 150);
        assert_eq!(config.assets.initial, AnimationName::Idle);
    }

    #[test]
    fn test_partial_config_keeps_other_defaults() {
        let config = ViewerConfig::from_ron("(movement: (step: 25.0), obstacles: (seed: Some(7)))").unwrap();
        assert_eq!(config.movement.step, 25.0);
        assert_eq!(config.movement.camera_step, 20.0);
        assert_eq!(config.obstacles.seed, Some(7));
        assert_eq!(config.obstacles.count, 150);
        assert_eq!(config.camera, CameraConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "(jump: (height: 40.0), assets: (initial: Walk))").unwrap();

        let config = ViewerConfig::load(file.path()).unwrap();
        assert_eq!(config.jump.height, 40.0);
        assert_eq!(config.assets.initial, AnimationName::Walk);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "(movement: (step: \"far\"))").unwrap();

        assert!(matches!(ViewerConfig::load(file.path()), Err(ConfigError::Parse(_))));
        assert_eq!(ViewerConfig::load_or_default(file.path()), ViewerConfig::default());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = ViewerConfig::load_or_default(&dir.path().join(CONFIG_FILE));
        assert_eq!(config, ViewerConfig::default());
    }
}
