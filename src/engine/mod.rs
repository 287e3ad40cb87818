pub mod system_tts;
pub mod tesseract_ocr;

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::imaging::LoadedImage;

/// Page layout hint forwarded to the recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageLayout {
    /// A single uniform block of text, the right mode for scanned
    /// paragraphs and the default.
    UniformBlock,
    /// Fully automatic page segmentation.
    Auto,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::UniformBlock
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrOptions {
    pub language: String,
    pub layout: PageLayout,
}

impl Default for OcrOptions {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            layout: PageLayout::default(),
        }
    }
}

/// Speech parameters, applied once before the first utterance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechSettings {
    /// Multiplier over the platform's normal speaking rate.
    pub rate: f32,
    /// Output volume in `0.0..=1.0`.
    pub volume: f32,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            rate: 1.0,
            volume: 0.8,
        }
    }
}

/// How a synthesis call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    Completed,
    Interrupted,
}

/// OCR specialization: image -> text
pub trait OcrEngine: Send + Sync {
    /// Recognize text in the image. Returning an empty string is not an
    /// error; it means no text was found.
    fn recognize(&self, image: &LoadedImage, options: &OcrOptions) -> Result<String>;
}

/// Speech specialization: text -> audible output
pub trait SpeechEngine: Send + Sync {
    /// Apply rate and volume. Called once at session construction; there is
    /// no per-utterance reconfiguration.
    fn configure(&self, settings: &SpeechSettings) -> Result<()>;

    /// Speak `text`, blocking the calling thread until the utterance
    /// finishes or [`SpeechEngine::interrupt`] fires.
    fn speak(&self, text: &str) -> Result<SpeakOutcome>;

    /// Abort an in-progress `speak`. Callable from any thread; a no-op when
    /// nothing is being spoken.
    fn interrupt(&self);
}

/// Build the default engine pair: Tesseract recognition and the platform
/// voice stack for output.
pub fn create_default_engines() -> Result<(Arc<dyn OcrEngine>, Arc<dyn SpeechEngine>)> {
    Ok((
        Arc::new(tesseract_ocr::TesseractOcr::new()),
        Arc::new(system_tts::SystemTts::new()?),
    ))
}
