//! Minimal end-to-end driver: load one image, extract its text, read it
//! aloud through the system voice.
//!
//! ```sh
//! cargo run --example read_aloud -- scanned-page.png
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use read_to_me::engine::create_default_engines;
use read_to_me::{ExtractionOutcome, PlaybackStatus, Session};

fn main() -> Result<()> {
    read_to_me::init_tracing();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: read_aloud <image-file>")?;

    let (ocr, speech) = create_default_engines()?;
    let session = Session::new(ocr, speech)?;

    session.load_image(&path)?;

    match session.extract_text()? {
        ExtractionOutcome::Extracted => {}
        ExtractionOutcome::NoTextFound => {
            tracing::warn!("No text was detected in the image");
            return Ok(());
        }
    }

    println!("{}", serde_json::to_string_pretty(&session.snapshot())?);

    session.play()?;
    while session.snapshot().status != PlaybackStatus::Idle {
        std::thread::sleep(Duration::from_millis(100));
    }

    Ok(())
}
