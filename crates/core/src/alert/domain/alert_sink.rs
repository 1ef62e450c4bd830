/// Domain interface for the audible alert cue.
///
/// `play` is fire-and-forget: implementations should return promptly and
/// perform playback off the sampling thread.
pub trait AlertSink: Send {
    fn play(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// Sink that does nothing, for sessions running without audio.
pub struct NullAlertSink;

impl AlertSink for NullAlertSink {
    fn play(&self) -> Result<(), Box<dyn std::error::Error>> {
        Ok(())
    }
}
