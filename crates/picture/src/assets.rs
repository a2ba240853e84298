//! Asset Loading
//!
//! Picture files and window skins are read through [`AssetLoader`].

use std::path::{Path, PathBuf};

use image::RgbaImage;
use log::debug;

use crate::error::{PictureError, PictureResult};

/// Source of host images
pub trait AssetLoader {
    /// Load a picture by name
    fn load_picture(&mut self, name: &str) -> PictureResult<RgbaImage>;

    /// Load a system image such as a window skin
    fn load_system(&mut self, name: &str) -> PictureResult<RgbaImage>;
}

/// Loads `<root>/pictures/<name>.png` and `<root>/system/<name>.png`
#[derive(Debug, Clone)]
pub struct DirectoryAssets {
    root: PathBuf,
}

impl DirectoryAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn load(&self, folder: &str, name: &str) -> PictureResult<RgbaImage> {
        let path = self.root.join(folder).join(format!("{}.png", name));
        if !path.is_file() {
            return Err(PictureError::AssetNotFound(path.display().to_string()));
        }
        let decoded = image::open(&path)?.to_rgba8();
        debug!(
            "Loaded {} ({}x{})",
            path.display(),
            decoded.width(),
            decoded.height()
        );
        Ok(decoded)
    }
}

impl AssetLoader for DirectoryAssets {
    fn load_picture(&mut self, name: &str) -> PictureResult<RgbaImage> {
        self.load("pictures", name)
    }

    fn load_system(&mut self, name: &str) -> PictureResult<RgbaImage> {
        self.load("system", name)
    }
}

/// Loader with no assets at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetLoader for NoAssets {
    fn load_picture(&mut self, name: &str) -> PictureResult<RgbaImage> {
        Err(PictureError::AssetNotFound(name.to_string()))
    }

    fn load_system(&mut self, name: &str) -> PictureResult<RgbaImage> {
        Err(PictureError::AssetNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_picture() {
        let mut assets = DirectoryAssets::new("/nonexistent");
        let result = assets.load_picture("Castle");
        match result {
            Err(PictureError::AssetNotFound(path)) => {
                assert!(path.ends_with("pictures/Castle.png"))
            }
            other => panic!("unexpected result {:?}", other.map(|i| i.dimensions())),
        }
    }

    #[test]
    fn test_directory_round_trip() {
        let root = std::env::temp_dir().join(format!("dtext-assets-{}", std::process::id()));
        std::fs::create_dir_all(root.join("system")).unwrap();
        let skin = RgbaImage::from_pixel(4, 3, image::Rgba([9, 8, 7, 255]));
        skin.save(root.join("system").join("Window.png")).unwrap();

        let mut assets = DirectoryAssets::new(&root);
        let loaded = assets.load_system("Window").unwrap();
        assert_eq!(loaded, skin);

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_no_assets() {
        assert!(NoAssets.load_system("Window").is_err());
    }
}
