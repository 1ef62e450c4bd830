pub const COCO_MODEL_NAME: &str = "yolov8n.onnx";
pub const COCO_MODEL_URL: &str =
    "https://github.com/sentrycam/sentrycam/releases/download/v0.1.0/yolov8n.onnx";

/// The single class of interest for counting, overlay, and alerting.
pub const TARGET_LABEL: &str = "person";

/// Sampling period of the detection loop.
pub const TICK_INTERVAL_MS: u64 = 200;

/// Minimum gap between audible alert cues.
pub const ALERT_COOLDOWN_MS: u64 = 5_000;

/// Minimum gap between automatic snapshot captures.
pub const SNAPSHOT_COOLDOWN_MS: u64 = 10_000;

pub const DEFAULT_CONFIDENCE: f64 = 0.5;
