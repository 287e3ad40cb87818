use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use tts::Tts;

use super::{SpeakOutcome, SpeechEngine, SpeechSettings};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Speech synthesis through the platform voice stack.
///
/// One engine handle lives for the process lifetime. The platform `speak`
/// call is asynchronous, so [`SystemTts::speak`] dispatches the utterance
/// and then polls until it drains, which gives callers the blocking
/// contract the session's background thread relies on.
pub struct SystemTts {
    inner: Mutex<Tts>,
    interrupted: AtomicBool,
}

// Safety: the platform handle is only ever touched through `inner`, and the
// interrupt flag is atomic, so concurrent `speak`/`interrupt` calls cannot
// race on the backend.
unsafe impl Send for SystemTts {}
unsafe impl Sync for SystemTts {}

impl SystemTts {
    pub fn new() -> Result<Self> {
        let tts = Tts::default().context("failed to initialize speech synthesis")?;
        Ok(Self {
            inner: Mutex::new(tts),
            interrupted: AtomicBool::new(false),
        })
    }
}

impl SpeechEngine for SystemTts {
    fn configure(&self, settings: &SpeechSettings) -> Result<()> {
        let mut tts = self.inner.lock().unwrap();

        let rate = (tts.normal_rate() * settings.rate).clamp(tts.min_rate(), tts.max_rate());
        tts.set_rate(rate).context("failed to set speaking rate")?;

        let volume = settings
            .volume
            .clamp(tts.min_volume(), tts.max_volume());
        tts.set_volume(volume).context("failed to set volume")?;

        tracing::info!("Speech configured (rate {:.1}, volume {:.2})", rate, volume);
        Ok(())
    }

    fn speak(&self, text: &str) -> Result<SpeakOutcome> {
        self.interrupted.store(false, Ordering::SeqCst);
        {
            let mut tts = self.inner.lock().unwrap();
            tts.speak(text, true).context("failed to start utterance")?;
        }

        loop {
            std::thread::sleep(POLL_INTERVAL);

            if self.interrupted.load(Ordering::SeqCst) {
                return Ok(SpeakOutcome::Interrupted);
            }

            let speaking = self
                .inner
                .lock()
                .unwrap()
                .is_speaking()
                .context("failed to query utterance state")?;
            if !speaking {
                return Ok(if self.interrupted.load(Ordering::SeqCst) {
                    SpeakOutcome::Interrupted
                } else {
                    SpeakOutcome::Completed
                });
            }
        }
    }

    fn interrupt(&self) {
        self.interrupted.store(true, Ordering::SeqCst);
        if let Err(e) = self.inner.lock().unwrap().stop() {
            tracing::warn!("Failed to stop utterance: {}", e);
        }
    }
}
