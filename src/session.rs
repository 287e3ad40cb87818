use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::engine::{OcrEngine, OcrOptions, SpeakOutcome, SpeechEngine, SpeechSettings};
use crate::error::SessionError;
use crate::imaging;
use crate::observer::SessionObserver;
use crate::state::{PlaybackStatus, SessionState, SessionSnapshot};

type ObserverList = Mutex<Vec<Arc<dyn SessionObserver>>>;

/// Result of a [`Session::extract_text`] call that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// Text was recognized and stored.
    Extracted,
    /// The recognizer returned an empty or whitespace-only string. Not an
    /// error; `has_text` stays false.
    NoTextFound,
}

/// The session state machine. One per application run.
///
/// All state writes are serialized behind a single mutex. The only
/// concurrent writer is the background synthesis thread spawned by
/// [`Session::play`], and its sole write is the generation-guarded settle
/// of `status` back to idle.
pub struct Session {
    state: Arc<Mutex<SessionState>>,
    observers: Arc<ObserverList>,
    ocr: Arc<dyn OcrEngine>,
    speech: Arc<dyn SpeechEngine>,
    ocr_options: OcrOptions,
    speech_thread: Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    /// Build a session with default OCR options and speech settings.
    pub fn new(
        ocr: Arc<dyn OcrEngine>,
        speech: Arc<dyn SpeechEngine>,
    ) -> Result<Self, SessionError> {
        Self::with_options(ocr, speech, OcrOptions::default(), &SpeechSettings::default())
    }

    /// The speech engine is configured here, once; per-utterance
    /// reconfiguration is not supported.
    pub fn with_options(
        ocr: Arc<dyn OcrEngine>,
        speech: Arc<dyn SpeechEngine>,
        ocr_options: OcrOptions,
        speech_settings: &SpeechSettings,
    ) -> Result<Self, SessionError> {
        speech
            .configure(speech_settings)
            .map_err(SessionError::Speech)?;

        Ok(Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            observers: Arc::new(Mutex::new(Vec::new())),
            ocr,
            speech,
            ocr_options,
            speech_thread: Mutex::new(None),
        })
    }

    /// Current state, for presentation layers that poll.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().unwrap().snapshot()
    }

    /// Register an observer; it fires after every state change.
    pub fn subscribe(&self, observer: Arc<dyn SessionObserver>) {
        self.observers.lock().unwrap().push(observer);
    }

    /// Load and decode-validate an image, replacing whatever was loaded
    /// before. A new image invalidates previously extracted text.
    ///
    /// Loading while speech is in progress interrupts playback first, the
    /// same way [`Session::stop`] would. Validation runs before the
    /// interrupt, so a failed load leaves the session untouched, ongoing
    /// playback included.
    pub fn load_image(&self, path: &Path) -> Result<SessionSnapshot, SessionError> {
        let image = match imaging::load_image(path) {
            Ok(image) => image,
            Err(e) => return Err(self.record(SessionError::ImageLoad(e))),
        };

        self.halt_speech_if_active();

        let snapshot = {
            let mut state = self.state.lock().unwrap();
            state.set_image(image);
            state.snapshot()
        };
        tracing::info!("Image loaded: {}", path.display());
        self.notify(&snapshot);
        Ok(snapshot)
    }

    /// Run text recognition over the loaded image, synchronously.
    ///
    /// Rejected while playback is active: extracted text is immutable for
    /// the lifetime of an utterance.
    pub fn extract_text(&self) -> Result<ExtractionOutcome, SessionError> {
        let image = {
            let state = self.state.lock().unwrap();
            if state.status != PlaybackStatus::Idle {
                let err = SessionError::invalid_state(
                    "extract text",
                    format!("playback is {:?}", state.status),
                );
                drop(state);
                return Err(self.record(err));
            }
            match state.image.clone() {
                Some(image) => image,
                None => {
                    drop(state);
                    return Err(
                        self.record(SessionError::invalid_state("extract text", "no image loaded"))
                    );
                }
            }
        };

        tracing::info!("Extracting text from {}", image.path.display());
        // The recognizer runs outside the lock; its result is written back
        // under it. User-facing operations are single-threaded by contract,
        // so nothing else rewrites the image meanwhile.
        let text = match self.ocr.recognize(&image, &self.ocr_options) {
            Ok(text) => text,
            Err(e) => return Err(self.record(SessionError::Ocr(e))),
        };

        let (outcome, snapshot) = {
            let mut state = self.state.lock().unwrap();
            state.set_extracted_text(text);
            let outcome = if state.has_text {
                ExtractionOutcome::Extracted
            } else {
                ExtractionOutcome::NoTextFound
            };
            (outcome, state.snapshot())
        };
        match outcome {
            ExtractionOutcome::Extracted => tracing::info!("Text extracted"),
            ExtractionOutcome::NoTextFound => tracing::info!("No text found in image"),
        }
        self.notify(&snapshot);
        Ok(outcome)
    }

    /// Start reading the extracted text aloud.
    ///
    /// Returns immediately after dispatch; synthesis runs on a background
    /// thread, and the status settles back to idle on natural completion,
    /// interrupt, or failure.
    pub fn play(&self) -> Result<SessionSnapshot, SessionError> {
        let (text, generation, snapshot) = {
            let mut state = self.state.lock().unwrap();
            if state.status != PlaybackStatus::Idle {
                let err =
                    SessionError::invalid_state("play", format!("playback is {:?}", state.status));
                drop(state);
                return Err(self.record(err));
            }
            if !state.has_text || state.extracted_text.trim().is_empty() {
                drop(state);
                return Err(self.record(SessionError::EmptyText));
            }

            state.play_generation += 1;
            state.status = PlaybackStatus::Speaking;
            state.last_error = None;
            (
                state.extracted_text.clone(),
                state.play_generation,
                state.snapshot(),
            )
        };
        tracing::info!("Playback started ({} chars)", text.len());
        self.notify(&snapshot);

        let state = Arc::clone(&self.state);
        let observers = Arc::clone(&self.observers);
        let speech = Arc::clone(&self.speech);

        let handle = std::thread::spawn(move || {
            let result = speech.speak(&text);

            let settled = {
                let mut guard = state.lock().unwrap();
                if guard.play_generation != generation {
                    // A newer play owns the status now.
                    return;
                }
                match guard.status {
                    PlaybackStatus::Speaking | PlaybackStatus::Stopping => {
                        guard.status = PlaybackStatus::Idle;
                    }
                    // A foreground stop already settled it.
                    PlaybackStatus::Idle => return,
                }
                match result {
                    Ok(SpeakOutcome::Completed) => tracing::info!("Playback finished"),
                    Ok(SpeakOutcome::Interrupted) => tracing::info!("Playback interrupted"),
                    Err(e) => {
                        let err = SessionError::Speech(e);
                        tracing::warn!("{}", err);
                        guard.last_error = Some(err.report());
                    }
                }
                guard.snapshot()
            };
            notify_observers(&observers, &settled);
        });

        // Only the latest handle is retained; a superseded thread has
        // already returned or will exit on the generation check.
        *self.speech_thread.lock().unwrap() = Some(handle);

        Ok(snapshot)
    }

    /// Interrupt in-progress playback.
    ///
    /// Calling `stop` while idle is an error, not a silent no-op: every
    /// operation invoked in a state that forbids it reports invalid state.
    pub fn stop(&self) -> Result<SessionSnapshot, SessionError> {
        let (generation, stopping) = {
            let mut state = self.state.lock().unwrap();
            if state.status != PlaybackStatus::Speaking {
                let err =
                    SessionError::invalid_state("stop", format!("playback is {:?}", state.status));
                drop(state);
                return Err(self.record(err));
            }
            state.status = PlaybackStatus::Stopping;
            (state.play_generation, state.snapshot())
        };
        self.notify(&stopping);

        self.speech.interrupt();

        let snapshot = {
            let mut state = self.state.lock().unwrap();
            // The synthesis thread may have settled first; either way the
            // status lands on idle.
            if state.play_generation == generation && state.status == PlaybackStatus::Stopping {
                state.status = PlaybackStatus::Idle;
            }
            state.snapshot()
        };
        tracing::info!("Playback stopped");
        self.notify(&snapshot);
        Ok(snapshot)
    }

    /// Reset the session to its initial state: no image, no text, idle.
    ///
    /// Active playback is interrupted first so the voice does not keep
    /// reading text the session no longer holds. Idempotent.
    pub fn clear(&self) -> SessionSnapshot {
        self.halt_speech_if_active();

        let snapshot = {
            let mut state = self.state.lock().unwrap();
            state.reset();
            state.snapshot()
        };
        tracing::info!("Session cleared");
        self.notify(&snapshot);
        snapshot
    }

    /// Interrupt playback if any is active. Safe against a synthesis task
    /// finishing at the same moment: both writers funnel through the state
    /// lock and both settle on idle.
    fn halt_speech_if_active(&self) {
        let generation = {
            let mut state = self.state.lock().unwrap();
            match state.status {
                PlaybackStatus::Idle => return,
                PlaybackStatus::Speaking => state.status = PlaybackStatus::Stopping,
                PlaybackStatus::Stopping => {}
            }
            state.play_generation
        };

        self.speech.interrupt();

        let mut state = self.state.lock().unwrap();
        if state.play_generation == generation && state.status == PlaybackStatus::Stopping {
            state.status = PlaybackStatus::Idle;
        }
    }

    /// Record a failure into the observable last-error slot, then hand it
    /// back to the caller. Core fields are left as they were.
    fn record(&self, error: SessionError) -> SessionError {
        let snapshot = {
            let mut state = self.state.lock().unwrap();
            state.last_error = Some(error.report());
            state.snapshot()
        };
        tracing::warn!("{}", error);
        self.notify(&snapshot);
        error
    }

    fn notify(&self, snapshot: &SessionSnapshot) {
        notify_observers(&self.observers, snapshot);
    }
}

fn notify_observers(observers: &ObserverList, snapshot: &SessionSnapshot) {
    let observers = observers.lock().unwrap().clone();
    for observer in observers {
        observer.state_changed(snapshot);
    }
}
