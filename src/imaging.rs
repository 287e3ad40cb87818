use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::GenericImageView;
use serde::{Deserialize, Serialize};

/// A decoded-and-validated input image.
///
/// Decoding happens once at load time to reject bad paths and corrupt
/// files; OCR later re-reads the file from `path`. Dimensions are kept so
/// a presentation layer can size a preview without decoding again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadedImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Open and fully decode `path`, accepting the raster formats the `image`
/// crate understands (PNG, JPEG, GIF, BMP, TIFF among others). The format
/// is sniffed from content, not the file extension.
pub fn load_image(path: &Path) -> Result<LoadedImage> {
    let reader = image::ImageReader::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("failed to probe image format of {}", path.display()))?;

    let decoded = reader
        .decode()
        .with_context(|| format!("failed to decode {}", path.display()))?;

    let (width, height) = decoded.dimensions();
    tracing::debug!("Decoded {} ({}x{})", path.display(), width, height);

    Ok(LoadedImage {
        path: path.to_path_buf(),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_a_real_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("white.png");
        image::RgbImage::from_pixel(8, 4, image::Rgb([255, 255, 255]))
            .save(&path)
            .unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.width, 8);
        assert_eq!(loaded.height, 4);
        assert_eq!(loaded.path, path);
    }

    #[test]
    fn rejects_a_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_image(&dir.path().join("nope.png")).is_err());
    }

    #[test]
    fn rejects_garbage_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.png");
        std::fs::write(&path, b"this is not an image").unwrap();
        assert!(load_image(&path).is_err());
    }
}
