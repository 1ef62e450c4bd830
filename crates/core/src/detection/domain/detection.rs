/// Axis-aligned box in frame pixel coordinates (top-left origin).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Clamp the box to `[0, width] x [0, height]`, shrinking as needed.
    pub fn clamped(&self, frame_width: u32, frame_height: u32) -> Self {
        let fw = frame_width as f64;
        let fh = frame_height as f64;
        let x1 = self.x.clamp(0.0, fw);
        let y1 = self.y.clamp(0.0, fh);
        let x2 = self.right().clamp(0.0, fw);
        let y2 = self.bottom().clamp(0.0, fh);
        Self {
            x: x1,
            y: y1,
            width: (x2 - x1).max(0.0),
            height: (y2 - y1).max(0.0),
        }
    }
}

/// One classified object reported by a detector for a single frame.
///
/// `confidence` is normalized to `[0.0, 1.0]`.
#[derive(Clone, Debug)]
pub struct Detection {
    pub label: String,
    pub confidence: f64,
    pub bbox: BoundingBox,
}

impl Detection {
    pub fn new(label: impl Into<String>, confidence: f64, bbox: BoundingBox) -> Self {
        let confidence = confidence.clamp(0.0, 1.0);
        Self {
            label: label.into(),
            confidence,
            bbox,
        }
    }

    pub fn matches(&self, label: &str) -> bool {
        self.label == label
    }

    /// Confidence as a percentage, the form shown on label chips.
    pub fn confidence_percent(&self) -> f64 {
        self.confidence * 100.0
    }
}

/// Count detections carrying the given class label.
pub fn count_matching(detections: &[Detection], label: &str) -> usize {
    detections.iter().filter(|d| d.matches(label)).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn person(conf: f64) -> Detection {
        Detection::new("person", conf, BoundingBox::new(10.0, 10.0, 50.0, 80.0))
    }

    #[test]
    fn test_bounding_box_edges() {
        let b = BoundingBox::new(10.0, 20.0, 30.0, 40.0);
        assert_relative_eq!(b.right(), 40.0);
        assert_relative_eq!(b.bottom(), 60.0);
    }

    #[test]
    fn test_clamped_shrinks_out_of_bounds_box() {
        let b = BoundingBox::new(-5.0, 90.0, 50.0, 50.0).clamped(100, 100);
        assert_relative_eq!(b.x, 0.0);
        assert_relative_eq!(b.width, 45.0);
        assert_relative_eq!(b.y, 90.0);
        assert_relative_eq!(b.height, 10.0);
    }

    #[test]
    fn test_clamped_leaves_interior_box_untouched() {
        let b = BoundingBox::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(b.clamped(100, 100), b);
    }

    #[test]
    fn test_confidence_is_clamped_to_unit_range() {
        assert_relative_eq!(person(1.7).confidence, 1.0);
        assert_relative_eq!(person(-0.2).confidence, 0.0);
    }

    #[test]
    fn test_matches_is_exact() {
        let d = person(0.9);
        assert!(d.matches("person"));
        assert!(!d.matches("Person"));
        assert!(!d.matches("dog"));
    }

    #[test]
    fn test_confidence_percent() {
        assert_relative_eq!(person(0.873).confidence_percent(), 87.3);
    }

    #[test]
    fn test_count_matching() {
        let dets = vec![
            person(0.9),
            Detection::new("dog", 0.8, BoundingBox::new(0.0, 0.0, 10.0, 10.0)),
            person(0.7),
        ];
        assert_eq!(count_matching(&dets, "person"), 2);
        assert_eq!(count_matching(&dets, "cat"), 0);
        assert_eq!(count_matching(&[], "person"), 0);
    }
}
