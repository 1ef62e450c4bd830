use super::glyphs::{self, GLYPH_HEIGHT, GLYPH_SPACING, GLYPH_WIDTH};

pub const SURFACE_CHANNELS: usize = 4; // RGBA

/// An RGBA overlay buffer drawn above the video, sized to match the frame.
///
/// Fully transparent where nothing has been drawn. All drawing primitives
/// clip to the surface bounds, so callers can pass coordinates straight from
/// detection output without range checks.
#[derive(Clone, Debug)]
pub struct OverlaySurface {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl OverlaySurface {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            width: 0,
            height: 0,
        }
    }

    /// Match the surface to the given dimensions and reset every pixel to
    /// transparent. Called before each redraw.
    pub fn reset(&mut self, width: u32, height: u32) {
        let len = (width as usize) * (height as usize) * SURFACE_CHANNELS;
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.data = vec![0u8; len];
        } else {
            self.data.fill(0);
        }
    }

    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_blank(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * SURFACE_CHANNELS;
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, rgba: [u8; 4]) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * SURFACE_CHANNELS;
        self.data[idx..idx + SURFACE_CHANNELS].copy_from_slice(&rgba);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, rgba: [u8; 4]) {
        for py in y..y + h {
            for px in x..x + w {
                self.set_pixel(px, py, rgba);
            }
        }
    }

    /// Rectangle outline of the given stroke thickness, drawn inward.
    pub fn stroke_rect(&mut self, x: i32, y: i32, w: i32, h: i32, thickness: i32, rgba: [u8; 4]) {
        let t = thickness.min(w / 2 + 1).min(h / 2 + 1).max(1);
        self.fill_rect(x, y, w, t, rgba); // top
        self.fill_rect(x, y + h - t, w, t, rgba); // bottom
        self.fill_rect(x, y, t, h, rgba); // left
        self.fill_rect(x + w - t, y, t, h, rgba); // right
    }

    /// Draw `text` with its top-left corner at `(x, y)`, each glyph pixel
    /// scaled to `scale` x `scale` surface pixels. Unsupported characters
    /// leave an empty cell.
    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, scale: i32, rgba: [u8; 4]) {
        let advance = ((GLYPH_WIDTH + GLYPH_SPACING) as i32) * scale;
        let mut cursor_x = x;
        for ch in text.chars() {
            if let Some(rows) = glyphs::glyph(ch) {
                for (row_idx, row) in rows.iter().enumerate() {
                    for col in 0..GLYPH_WIDTH {
                        if row & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                            continue;
                        }
                        let px = cursor_x + (col as i32) * scale;
                        let py = y + (row_idx as i32) * scale;
                        self.fill_rect(px, py, scale, scale, rgba);
                    }
                }
            }
            cursor_x += advance;
        }
    }

    /// Pixel height of text drawn at the given scale.
    pub fn text_height(scale: i32) -> i32 {
        (GLYPH_HEIGHT as i32) * scale
    }

    /// Pixel width of text drawn at the given scale.
    pub fn text_width(text: &str, scale: i32) -> i32 {
        (glyphs::text_width(text) as i32) * scale
    }
}

impl Default for OverlaySurface {
    fn default() -> Self {
        Self::new()
    }
}
