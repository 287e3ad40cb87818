use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything a session operation can fail with. Errors never escape an
/// operation untyped; each one is also recorded into the observable
/// `last_error` before it is returned.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to load image: {0:#}")]
    ImageLoad(#[source] anyhow::Error),

    #[error("text recognition failed: {0:#}")]
    Ocr(#[source] anyhow::Error),

    #[error("speech synthesis failed: {0:#}")]
    Speech(#[source] anyhow::Error),

    #[error("cannot {operation}: {detail}")]
    InvalidState {
        operation: &'static str,
        detail: String,
    },

    #[error("no text available to play")]
    EmptyText,
}

impl SessionError {
    pub(crate) fn invalid_state(operation: &'static str, detail: impl Into<String>) -> Self {
        Self::InvalidState {
            operation,
            detail: detail.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ImageLoad(_) => ErrorKind::ImageLoad,
            Self::Ocr(_) => ErrorKind::Ocr,
            Self::Speech(_) => ErrorKind::Speech,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::EmptyText => ErrorKind::EmptyText,
        }
    }

    pub(crate) fn report(&self) -> ErrorReport {
        ErrorReport {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ImageLoad,
    Ocr,
    Speech,
    InvalidState,
    EmptyText,
}

/// The (status, message) pair surfaced to presentation layers through
/// [`crate::SessionSnapshot::last_error`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_variants() {
        assert_eq!(
            SessionError::ImageLoad(anyhow::anyhow!("bad file")).kind(),
            ErrorKind::ImageLoad
        );
        assert_eq!(SessionError::EmptyText.kind(), ErrorKind::EmptyText);
        assert_eq!(
            SessionError::invalid_state("play", "already speaking").kind(),
            ErrorKind::InvalidState
        );
    }

    #[test]
    fn report_carries_the_display_message() {
        let report = SessionError::invalid_state("stop", "playback is idle").report();
        assert_eq!(report.kind, ErrorKind::InvalidState);
        assert_eq!(report.message, "cannot stop: playback is idle");
    }
}
