use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::ErrorReport;
use crate::imaging::LoadedImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackStatus {
    Idle,
    Speaking,
    Stopping,
}

impl Default for PlaybackStatus {
    fn default() -> Self {
        Self::Idle
    }
}

/// Mutable session fields. Lives behind the session's single mutex; nothing
/// outside [`crate::Session`] writes to it.
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub image: Option<LoadedImage>,
    pub extracted_text: String,
    pub has_text: bool,
    pub status: PlaybackStatus,
    pub last_error: Option<ErrorReport>,
    /// Bumped on every `play`; a finished synthesis task may only settle
    /// `status` while its generation still matches.
    pub play_generation: u64,
}

impl SessionState {
    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    /// A new image invalidates any previously extracted text.
    pub fn set_image(&mut self, image: LoadedImage) {
        self.image = Some(image);
        self.extracted_text.clear();
        self.has_text = false;
        self.status = PlaybackStatus::Idle;
        self.last_error = None;
    }

    /// Stores the raw recognizer output; emptiness is judged on the trimmed
    /// string so whitespace-only results do not count as text.
    pub fn set_extracted_text(&mut self, text: String) {
        self.has_text = !text.trim().is_empty();
        self.extracted_text = text;
        self.last_error = None;
    }

    pub fn reset(&mut self) {
        self.image = None;
        self.extracted_text.clear();
        self.has_text = false;
        self.status = PlaybackStatus::Idle;
        self.last_error = None;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            has_image: self.has_image(),
            has_text: self.has_text,
            status: self.status,
            image_path: self.image.as_ref().map(|image| image.path.clone()),
            extracted_text: self.extracted_text.clone(),
            last_error: self.last_error.clone(),
        }
    }
}

/// Read-only view of the session handed to presentation layers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub has_image: bool,
    pub has_text: bool,
    pub status: PlaybackStatus,
    pub image_path: Option<PathBuf>,
    pub extracted_text: String,
    pub last_error: Option<ErrorReport>,
}
