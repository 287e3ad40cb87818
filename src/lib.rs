//! Reads images aloud: load a picture, extract its text with OCR, then
//! speak the result through the platform voice stack.
//!
//! The crate is presentation-agnostic. A host (desktop shell, CLI, web
//! bridge) constructs a [`Session`] with an OCR and a speech engine, drives
//! the operations, and renders the [`SessionSnapshot`]s it polls or
//! receives through a [`SessionObserver`].

pub mod engine;

mod error;
mod imaging;
mod observer;
mod session;
mod state;

pub use error::{ErrorKind, ErrorReport, SessionError};
pub use imaging::LoadedImage;
pub use observer::SessionObserver;
pub use session::{ExtractionOutcome, Session};
pub use state::{PlaybackStatus, SessionSnapshot};

/// Install a default `tracing` subscriber printing to stderr.
///
/// Hosts that already configure `tracing` should skip this.
pub fn init_tracing() {
    tracing_subscriber::fmt::init();
}
