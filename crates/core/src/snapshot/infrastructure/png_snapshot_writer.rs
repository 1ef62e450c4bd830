use std::fs;
use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::snapshot::domain::snapshot_writer::SnapshotWriter;

/// Persists frames as PNG files in a fixed output directory using the
/// `image` crate.
pub struct PngSnapshotWriter {
    dir: PathBuf,
}

impl PngSnapshotWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SnapshotWriter for PngSnapshotWriter {
    fn save(&self, frame: &Frame, name: &str) -> Result<PathBuf, Box<dyn std::error::Error>> {
        fs::create_dir_all(&self.dir)?;

        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("frame buffer does not match its dimensions")?;

        let path = self.dir.join(format!("{name}.png"));
        img.save(&path)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_frame(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for _ in 0..(width * height) {
            data.extend_from_slice(&rgb);
        }
        Frame::new(data, width, height, 0)
    }

    #[test]
    fn test_save_creates_png_with_name() {
        let dir = tempfile::tempdir().unwrap();
        let writer = PngSnapshotWriter::new(dir.path());
        let frame = make_frame(100, 80, [50, 100, 200]);

        let path = writer.save(&frame, "person-detected-test").unwrap();
        assert_eq!(path, dir.path().join("person-detected-test.png"));
        assert!(path.exists());
        assert!(fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_save_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("captures").join("today");
        let writer = PngSnapshotWriter::new(&nested);
        let frame = make_frame(10, 10, [0, 0, 0]);

        writer.save(&frame, "snap").unwrap();
        assert!(nested.join("snap.png").exists());
    }

    #[test]
    fn test_saved_pixels_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let writer = PngSnapshotWriter::new(dir.path());
        let frame = make_frame(50, 50, [50, 100, 200]);

        let path = writer.save(&frame, "snap").unwrap();
        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.width(), 50);
        assert_eq!(img.height(), 50);
        assert_eq!(img.get_pixel(0, 0).0, [50, 100, 200]);
    }

    #[test]
    fn test_save_under_file_path_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"x").unwrap();

        let writer = PngSnapshotWriter::new(blocker.join("captures"));
        let frame = make_frame(10, 10, [0, 0, 0]);
        assert!(writer.save(&frame, "snap").is_err());
    }
}
