use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::video::domain::frame_source::FrameSource;

/// Pull-based frame supply decoding via ffmpeg-next (libavformat +
/// libavcodec).
///
/// Works for files and for anything libavformat can open as an input URL
/// (e.g. `v4l2` devices, network streams). Each `acquire` decodes exactly
/// one frame, converted to RGB24. With `loop_playback` set, a drained file
/// is reopened from the start, which makes short clips behave like an
/// endless camera feed.
pub struct FfmpegFrameSource {
    path: PathBuf,
    loop_playback: bool,
    open: Option<OpenSource>,
    ended: bool,
    frame_index: usize,
}

// Safety: FfmpegFrameSource is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegFrameSource {}

impl FfmpegFrameSource {
    pub fn new(path: impl Into<PathBuf>, loop_playback: bool) -> Self {
        Self {
            path: path.into(),
            loop_playback,
            open: None,
            ended: false,
            frame_index: 0,
        }
    }
}

impl FrameSource for FfmpegFrameSource {
    fn acquire(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        if self.ended {
            return Ok(None);
        }

        let mut reopened = false;
        loop {
            if self.open.is_none() {
                self.open = Some(OpenSource::open(&self.path)?);
            }
            let Some(src) = self.open.as_mut() else {
                return Ok(None);
            };

            if let Some(frame) = src.next_frame(self.frame_index)? {
                self.frame_index += 1;
                return Ok(Some(frame));
            }

            // Stream drained
            self.open = None;
            if !self.loop_playback {
                self.ended = true;
                return Ok(None);
            }
            if reopened {
                // Source yields no frames at all; don't spin on it
                return Ok(None);
            }
            reopened = true;
            log::debug!("reached end of {}, looping", self.path.display());
        }
    }

    fn dimensions(&self) -> Option<(u32, u32)> {
        self.open.as_ref().map(|s| (s.width, s.height))
    }
}

/// One opened input: demuxer, decoder, and RGB24 scaler.
struct OpenSource {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    stream_index: usize,
    width: u32,
    height: u32,
    flushing: bool,
}

impl OpenSource {
    fn open(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let ictx = ffmpeg_next::format::input(path)?;
        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("no video stream found")?;
        let stream_index = stream.index();

        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;
        let width = decoder.width();
        let height = decoder.height();

        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        Ok(Self {
            ictx,
            decoder,
            scaler,
            stream_index,
            width,
            height,
            flushing: false,
        })
    }

    /// Decode the next frame, or `None` once the stream is exhausted.
    fn next_frame(
        &mut self,
        frame_index: usize,
    ) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        loop {
            if let Some(frame) = self.try_receive(frame_index)? {
                return Ok(Some(frame));
            }
            if self.flushing {
                return Ok(None);
            }

            let Some((stream, packet)) = self.ictx.packets().next() else {
                let _ = self.decoder.send_eof();
                self.flushing = true;
                continue;
            };
            if stream.index() != self.stream_index {
                continue;
            }
            if self.decoder.send_packet(&packet).is_err() {
                continue;
            }
        }
    }

    fn try_receive(
        &mut self,
        frame_index: usize,
    ) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        if self.decoder.receive_frame(&mut decoded).is_err() {
            return Ok(None);
        }

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
        self.scaler.run(&decoded, &mut rgb_frame)?;

        let pixels = extract_rgb_pixels(&rgb_frame, self.width, self.height);
        Ok(Some(Frame::new(pixels, self.width, self.height, frame_index)))
    }
}

/// Copies pixel data from an ffmpeg frame into a contiguous RGB buffer.
///
/// ffmpeg frames may pad each row (stride > width*3); the padding is
/// stripped here so downstream code sees tightly-packed pixels.
fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let w = width as usize;
    let h = height as usize;

    let mut pixels = Vec::with_capacity(w * h * 3);
    for row in 0..h {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + w * 3]);
    }
    pixels
}
