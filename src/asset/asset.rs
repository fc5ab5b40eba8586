//! Character Asset Definition
//!
//! On-disk description of an animated character: mesh parts with their
//! materials, plus zero or more animation clips. Files are RON, optionally
//! brotli-compressed; the format is detected from the first byte.

use std::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use crate::math::Vec3;

/// The closed set of canned animations a character can be loaded with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnimationName {
    Idle,
    Walk,
    Run,
    Jump,
    Dying,
}

impl AnimationName {
    /// Number-key order (1..=5)
    pub const ALL: [AnimationName; 5] = [
        AnimationName::Idle,
        AnimationName::Walk,
        AnimationName::Run,
        AnimationName::Jump,
        AnimationName::Dying,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationName::Idle => "Idle",
            AnimationName::Walk => "Walk",
            AnimationName::Run => "Run",
            AnimationName::Jump => "Jump",
            AnimationName::Dying => "Dying",
        }
    }

    /// Asset selected by number key `n` (1-based)
    pub fn from_number(n: usize) -> Option<AnimationName> {
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for AnimationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for asset operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssetError {
    #[error("I/O error: {0}")]
    Io(String),
    #[error("decompression failed: {0}")]
    Decompress(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("invalid asset: {0}")]
    Validation(String),
    #[error("loader stopped before completing")]
    Disconnected,
}

impl From<std::io::Error> for AssetError {
    fn from(e: std::io::Error) -> Self {
        AssetError::Io(e.to_string())
    }
}

/// Raw RGBA8 texture pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextureData {
    pub width: u16,
    pub height: u16,
    pub rgba: Vec<u8>,
}

/// One drawable piece of the character with its own material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshPart {
    pub name: String,
    /// Vertex positions in object space
    pub positions: Vec<Vec3>,
    /// Per-vertex texture coordinates (empty when untextured)
    #[serde(default)]
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list
    pub indices: Vec<u16>,
    /// Material base colour (RGBA8)
    pub color: [u8; 4],
    /// Optional colour map
    #[serde(default)]
    pub texture: Option<TextureData>,
}

/// Part offset at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub offset: Vec3,
}

/// Keyframes translating a single mesh part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub part: usize,
    pub keyframes: Vec<Keyframe>,
}

impl Track {
    /// Linear interpolation between surrounding keyframes, held at both ends
    pub fn sample(&self, time: f32) -> Vec3 {
        let Some(first) = self.keyframes.first() else { return Vec3::ZERO };
        if time <= first.time {
            return first.offset;
        }
        for pair in self.keyframes.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if time <= b.time {
                let span = b.time - a.time;
                if span <= 0.0 {
                    return b.offset;
                }
                return a.offset.lerp(b.offset, (time - a.time) / span);
            }
        }
        self.keyframes.last().map(|k| k.offset).unwrap_or(Vec3::ZERO)
    }
}

/// A named animation sequence with a fixed playback duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    /// Seconds
    pub duration: f32,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// A complete character asset as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterAsset {
    /// Authored world position the character appears at
    #[serde(default)]
    pub position: Vec3,
    /// Authored rotation (euler degrees)
    #[serde(default)]
    pub rotation: Vec3,
    pub parts: Vec<MeshPart>,
    #[serde(default)]
    pub clips: Vec<AnimationClip>,
}

impl CharacterAsset {
    /// Decode from bytes (supports both compressed and uncompressed RON)
    pub fn load_from_bytes(data: &[u8]) -> Result<Self, AssetError> {
        // RON text starts with '(' or whitespace; anything else is brotli
        let is_ron = data
            .first()
            .map(|&b| b == b'(' || b.is_ascii_whitespace())
            .unwrap_or(false);

        let ron_str = if is_ron {
            String::from_utf8_lossy(data).to_string()
        } else {
            let mut decompressed = Vec::new();
            brotli::BrotliDecompress(&mut std::io::Cursor::new(data), &mut decompressed)
                .map_err(|e| AssetError::Decompress(e.to_string()))?;
            String::from_utf8_lossy(&decompressed).to_string()
        };

        let asset: Self = ron::from_str(&ron_str).map_err(|e| AssetError::Decode(e.to_string()))?;
        asset.validate()?;
        Ok(asset)
    }

    /// Serialize to compressed RON
    #[cfg(test)]
    pub fn to_bytes(&self) -> Result<Vec<u8>, AssetError> {
        let config = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .indentor("  ".to_string());
        let ron_data = ron::ser::to_string_pretty(self, config)
            .map_err(|e| AssetError::Decode(e.to_string()))?;

        let mut compressed = Vec::new();
        brotli::BrotliCompress(
            &mut std::io::Cursor::new(ron_data.as_bytes()),
            &mut compressed,
            &brotli::enc::BrotliEncoderParams {
                quality: 6,
                lgwin: 22,
                ..Default::default()
            },
        )
        .map_err(|e| AssetError::Io(format!("compression failed: {}", e)))?;
        Ok(compressed)
    }

    /// Reject data the renderer or animation player cannot use
    pub fn validate(&self) -> Result<(), AssetError> {
        if !self.position.is_finite() || !self.rotation.is_finite() {
            return Err(AssetError::Validation("non-finite transform".into()));
        }

        for part in &self.parts {
            if part.indices.len() % 3 != 0 {
                return Err(AssetError::Validation(format!(
                    "part '{}': index count {} is not a triangle list",
                    part.name,
                    part.indices.len()
                )));
            }
            if let Some(&bad) = part.indices.iter().find(|&&i| i as usize >= part.positions.len()) {
                return Err(AssetError::Validation(format!(
                    "part '{}': index {} out of range ({} vertices)",
                    part.name,
                    bad,
                    part.positions.len()
                )));
            }
            if !part.positions.iter().all(|p| p.is_finite()) {
                return Err(AssetError::Validation(format!("part '{}': non-finite vertex", part.name)));
            }
            if !part.uvs.is_empty() && part.uvs.len() != part.positions.len() {
                return Err(AssetError::Validation(format!(
                    "part '{}': {} uvs for {} vertices",
                    part.name,
                    part.uvs.len(),
                    part.positions.len()
                )));
            }
            if let Some(tex) = &part.texture {
                let expected = tex.width as usize * tex.height as usize * 4;
                if tex.rgba.len() != expected {
                    return Err(AssetError::Validation(format!(
                        "part '{}': texture has {} bytes, expected {}",
                        part.name,
                        tex.rgba.len(),
                        expected
                    )));
                }
            }
        }

        for clip in &self.clips {
            if !(clip.duration.is_finite() && clip.duration >= 0.0) {
                return Err(AssetError::Validation(format!("clip '{}': bad duration", clip.name)));
            }
            for track in &clip.tracks {
                if track.part >= self.parts.len() {
                    return Err(AssetError::Validation(format!(
                        "clip '{}': track targets missing part {}",
                        clip.name, track.part
                    )));
                }
                if track.keyframes.windows(2).any(|w| w[1].time < w[0].time) {
                    return Err(AssetError::Validation(format!(
                        "clip '{}': keyframes out of order",
                        clip.name
                    )));
                }
            }
        }

        Ok(())
    }
}

/// A unit cube part, optionally textured, with `clip_count` empty clips
#[cfg(test)]
pub(crate) fn cube_asset(clip_count: usize, textured: bool) -> CharacterAsset {
    let positions = vec![
        Vec3::new(-0.5, 0.0, -0.5),
        Vec3::new(0.5, 0.0, -0.5),
        Vec3::new(0.5, 1.0, -0.5),
        Vec3::new(-0.5, 1.0, -0.5),
        Vec3::new(-0.5, 0.0, 0.5),
        Vec3::new(0.5, 0.0, 0.5),
        Vec3::new(0.5, 1.0, 0.5),
        Vec3::new(-0.5, 1.0, 0.5),
    ];
    let texture = textured.then(|| TextureData { width: 1, height: 1, rgba: vec![255, 0, 0, 255] });
    CharacterAsset {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        parts: vec![MeshPart {
            name: "body".into(),
            positions,
            uvs: Vec::new(),
            indices: vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7],
            color: [200, 180, 160, 255],
            texture,
        }],
        clips: (0..clip_count)
            .map(|i| AnimationClip { name: format!("clip{}", i), duration: 1.0, tracks: Vec::new() })
            .collect(),
    }
}
