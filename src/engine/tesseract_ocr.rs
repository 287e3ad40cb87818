use anyhow::{Context, Result};

use super::{OcrEngine, OcrOptions, PageLayout};
use crate::imaging::LoadedImage;

/// Tesseract-backed recognizer.
///
/// A fresh Tesseract handle is built per call: the underlying API is not
/// thread-safe, and per-call construction keeps this adapter `Send + Sync`
/// without a lock.
pub struct TesseractOcr {
    datapath: Option<String>,
}

impl TesseractOcr {
    /// Use the system-installed tessdata directory.
    pub fn new() -> Self {
        Self { datapath: None }
    }

    /// Point Tesseract at a specific tessdata directory.
    pub fn with_datapath(datapath: impl Into<String>) -> Self {
        Self {
            datapath: Some(datapath.into()),
        }
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new()
    }
}

fn page_seg_mode(layout: PageLayout) -> &'static str {
    match layout {
        PageLayout::UniformBlock => "6",
        PageLayout::Auto => "3",
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &LoadedImage, options: &OcrOptions) -> Result<String> {
        let path = image
            .path
            .to_str()
            .context("image path is not valid UTF-8")?;

        let tess = tesseract::Tesseract::new(self.datapath.as_deref(), Some(&options.language))
            .with_context(|| format!("failed to initialize Tesseract for '{}'", options.language))?;
        let tess = tess
            .set_variable("tessedit_pageseg_mode", page_seg_mode(options.layout))
            .context("failed to set page segmentation mode")?;
        let mut tess = tess
            .set_image(path)
            .with_context(|| format!("Tesseract could not read {}", image.path.display()))?;

        let text = tess.get_text().context("text recognition failed")?;
        tracing::debug!(
            "Recognized {} chars from {}",
            text.len(),
            image.path.display()
        );
        Ok(text)
    }
}
