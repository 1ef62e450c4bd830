use crate::detection::domain::detection::{count_matching, Detection};

use super::surface::OverlaySurface;

/// Box outline stroke width, in pixels.
const BOX_STROKE: i32 = 3;

/// Glyph scale for chip text (5x7 font at 2x reads at normal video sizes).
const TEXT_SCALE: i32 = 2;

/// Chip padding around the text, in pixels.
const CHIP_PAD_X: i32 = 5;
const CHIP_PAD_Y: i32 = 4;

/// Boxes whose top edge is within this many pixels of the surface top get
/// their chip drawn below the box instead of above it.
const CHIP_EDGE_MARGIN: f64 = 30.0;

/// Vertical offset of the chip: raised above the box top, or dropped below
/// the box bottom near the top edge.
const CHIP_RAISE: i32 = 25;
const CHIP_DROP: i32 = 5;

const BOX_COLOR: [u8; 4] = [0, 255, 0, 255];
const CHIP_COLOR: [u8; 4] = [0, 255, 0, 255];
const TEXT_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Draws bounding boxes and label chips for detections of a single target
/// class. Stateless apart from the configured label; every call starts from
/// a fresh transparent surface.
pub struct OverlayRenderer {
    target_label: String,
}

impl OverlayRenderer {
    pub fn new(target_label: impl Into<String>) -> Self {
        Self {
            target_label: target_label.into(),
        }
    }

    pub fn target_label(&self) -> &str {
        &self.target_label
    }

    /// Redraw the surface for one frame's detections.
    ///
    /// The surface is resized to the frame dimensions and fully cleared
    /// first, so detections from earlier frames can never linger. Returns
    /// the number of detections matching the target label.
    pub fn render(
        &self,
        surface: &mut OverlaySurface,
        frame_width: u32,
        frame_height: u32,
        detections: &[Detection],
    ) -> usize {
        surface.reset(frame_width, frame_height);

        for det in detections.iter().filter(|d| d.matches(&self.target_label)) {
            let bbox = det.bbox.clamped(frame_width, frame_height);
            let x = bbox.x.round() as i32;
            let y = bbox.y.round() as i32;
            let w = (bbox.width.round() as i32).max(1);
            let h = (bbox.height.round() as i32).max(1);

            surface.stroke_rect(x, y, w, h, BOX_STROKE, BOX_COLOR);

            let text = format!("{} {:.1}%", det.label, det.confidence_percent());
            let text_w = OverlaySurface::text_width(&text, TEXT_SCALE);
            let text_h = OverlaySurface::text_height(TEXT_SCALE);

            let chip_y = if bbox.y > CHIP_EDGE_MARGIN {
                y - CHIP_RAISE
            } else {
                y + h + CHIP_DROP
            };
            surface.fill_rect(
                x,
                chip_y,
                text_w + 2 * CHIP_PAD_X,
                text_h + 2 * CHIP_PAD_Y,
                CHIP_COLOR,
            );
            surface.draw_text(x + CHIP_PAD_X, chip_y + CHIP_PAD_Y, &text, TEXT_SCALE, TEXT_COLOR);
        }
        count_matching(detections, &self.target_label)
    }
}
