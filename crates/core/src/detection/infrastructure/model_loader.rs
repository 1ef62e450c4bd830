use std::path::PathBuf;

use crossbeam_channel::{bounded, Receiver};

use crate::detection::domain::object_detector::ObjectDetector;

use super::model_resolver;
use super::onnx_coco_detector::OnnxCocoDetector;

/// Outcome of a background model load. Errors are stringified because the
/// underlying causes are not `Send`-friendly across the channel boundary.
pub type LoadResult = Result<Box<dyn ObjectDetector>, String>;

#[derive(Clone, Debug)]
pub struct ModelLoadRequest {
    pub name: String,
    pub url: String,
    pub bundled_dir: Option<PathBuf>,
    pub confidence: f64,
}

/// Resolve and initialize the detector on a background thread.
///
/// The receiver delivers exactly one message. The sampler polls it while the
/// pipeline is warming up; dropping the receiver abandons the load.
pub fn spawn_load(request: ModelLoadRequest) -> Receiver<LoadResult> {
    let (tx, rx) = bounded(1);
    std::thread::spawn(move || {
        let result = load(&request).map_err(|e| e.to_string());
        if tx.send(result).is_err() {
            log::debug!("model load finished after the session was dropped");
        }
    });
    rx
}

fn load(request: &ModelLoadRequest) -> Result<Box<dyn ObjectDetector>, Box<dyn std::error::Error>> {
    let path = model_resolver::resolve(
        &request.name,
        &request.url,
        request.bundled_dir.as_deref(),
        Some(Box::new(|downloaded, total| {
            if total > 0 {
                log::debug!("model download: {downloaded}/{total} bytes");
            }
        })),
    )?;
    let detector = OnnxCocoDetector::new(&path, request.confidence)?;
    Ok(Box::new(detector))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_spawn_load_delivers_error_for_invalid_model() {
        let tmp = tempfile::TempDir::new().unwrap();
        let bundled = tmp.path().join("models");
        std::fs::create_dir_all(&bundled).unwrap();
        // Present but not a valid ONNX graph
        std::fs::write(bundled.join("not_a_model.onnx"), b"garbage").unwrap();

        let rx = spawn_load(ModelLoadRequest {
            name: "not_a_model.onnx".to_string(),
            url: "http://invalid.nonexistent.example.com/model.onnx".to_string(),
            bundled_dir: Some(bundled),
            confidence: 0.5,
        });

        let result = rx.recv_timeout(Duration::from_secs(30)).unwrap();
        assert!(result.is_err());
    }
}
