//! Live person-detection pipeline: frame sampling, inference, overlay
//! rendering, and rate-limited alerting/snapshot side effects.
//!
//! Each bounded context keeps its `domain` layer free of I/O; concrete
//! backends (ffmpeg, ONNX Runtime, rodio, PNG files) live under
//! `infrastructure`.

pub mod alert;
pub mod detection;
pub mod overlay;
pub mod pipeline;
pub mod shared;
pub mod snapshot;
pub mod video;
