use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use crate::alert::domain::alert_sink::AlertSink;

/// Audio alert backed by `rodio`.
///
/// The encoded cue is read once at construction and kept in memory. Each
/// `play` spawns a short-lived playback thread; the rodio output stream is
/// not `Send`, so it is created and dropped inside that thread. Playback
/// failures are logged and never surface to the pipeline.
pub struct RodioAlertSink {
    cue: Arc<Vec<u8>>,
}

impl RodioAlertSink {
    /// Load an encoded audio cue (any format rodio's decoder understands)
    /// from disk.
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let cue = fs::read(path)
            .map_err(|e| format!("failed to read alert sound {}: {e}", path.display()))?;
        Ok(Self { cue: Arc::new(cue) })
    }
}

impl AlertSink for RodioAlertSink {
    fn play(&self) -> Result<(), Box<dyn std::error::Error>> {
        let cue = Arc::clone(&self.cue);
        std::thread::spawn(move || {
            if let Err(e) = play_blocking(&cue) {
                log::warn!("alert playback failed: {e}");
            }
        });
        Ok(())
    }
}

fn play_blocking(cue: &Arc<Vec<u8>>) -> Result<(), Box<dyn std::error::Error>> {
    let (_stream, handle) = rodio::OutputStream::try_default()?;
    let sink = rodio::Sink::try_new(&handle)?;
    let source = rodio::Decoder::new(Cursor::new(cue.to_vec()))?;
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}
