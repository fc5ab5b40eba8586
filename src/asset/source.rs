//! Asset Sources
//!
//! Where character assets come from. The viewer only sees the
//! [`AssetSource`] trait: `load` returns immediately with a pollable handle.

use std::path::PathBuf;
use crate::config::AssetConfig;
use super::async_ops::{pending, AsyncOp};
use super::{AnimationName, AssetError, CharacterAsset};

/// Anything that can start loading a named character asset
pub trait AssetSource {
    fn load(&self, name: AnimationName) -> AsyncOp<CharacterAsset>;
}

/// Loads `<dir>/<format>/<Name>.<format>` from disk (or over HTTP on wasm)
#[derive(Debug, Clone)]
pub struct FileAssetSource {
    dir: PathBuf,
    format: String,
}

impl FileAssetSource {
    pub fn new(dir: impl Into<PathBuf>, format: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            format: format.into(),
        }
    }

    pub fn from_config(config: &AssetConfig) -> Self {
        Self::new(&config.dir, config.format.clone())
    }

    pub fn path_for(&self, name: AnimationName) -> PathBuf {
        self.dir
            .join(&self.format)
            .join(format!("{}.{}", name, self.format))
    }
}

impl AssetSource for FileAssetSource {
    #[cfg(not(target_arch = "wasm32"))]
    fn load(&self, name: AnimationName) -> AsyncOp<CharacterAsset> {
        let (completer, op) = pending();
        let path = self.path_for(name);

        std::thread::spawn(move || {
            let result = std::fs::read(&path)
                .map_err(AssetError::from)
                .and_then(|bytes| CharacterAsset::load_from_bytes(&bytes));
            completer.complete(result);
        });

        op
    }

    #[cfg(target_arch = "wasm32")]
    fn load(&self, name: AnimationName) -> AsyncOp<CharacterAsset> {
        use macroquad::experimental::coroutines::start_coroutine;

        let (completer, op) = pending();
        let path = self.path_for(name).to_string_lossy().to_string();

        start_coroutine(async move {
            let result = macroquad::file::load_file(&path)
                .await
                .map_err(|e| AssetError::Io(e.to_string()))
                .and_then(|bytes| CharacterAsset::load_from_bytes(&bytes));
            completer.complete(result);
        });

        op
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::asset::cube_asset;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    fn wait(mut op: AsyncOp<CharacterAsset>) -> Result<CharacterAsset, AssetError> {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !op.is_complete() {
            assert!(Instant::now() < deadline, "load did not finish");
            std::thread::sleep(Duration::from_millis(1));
        }
        op.take().unwrap()
    }

    #[test]
    fn test_path_convention() {
        let source = FileAssetSource::new("models", "fbx");
        assert_eq!(source.path_for(AnimationName::Walk), PathBuf::from("models/fbx/Walk.fbx"));
    }

    #[test]
    fn test_loads_from_disk() {
        let dir = TempDir::new().unwrap();
        let source = FileAssetSource::new(dir.path(), "ron");
        let asset = cube_asset(2, false);

        std::fs::create_dir_all(dir.path().join("ron")).unwrap();
        std::fs::write(source.path_for(AnimationName::Run), asset.to_bytes().unwrap()).unwrap();

        assert_eq!(wait(source.load(AnimationName::Run)).unwrap(), asset);
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let source = FileAssetSource::new(dir.path(), "ron");
        assert!(matches!(wait(source.load(AnimationName::Dying)), Err(AssetError::Io(_))));
    }
}
