use crate::shared::frame::Frame;

/// Domain interface for the live frame supply.
///
/// `acquire` returns the next available frame, or `Ok(None)` while the
/// source has nothing decodable yet (warming up, between frames, or
/// drained). Errors are per-attempt; callers retry on the next sample.
pub trait FrameSource: Send {
    fn acquire(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>>;

    /// Pixel dimensions of the stream, once known.
    fn dimensions(&self) -> Option<(u32, u32)>;
}
