// Screen canvas and region geometry for the fixed 320x200 SEQ display.
//
// The canvas persists across frames: pixels a frame does not touch keep
// the previous frame's content, so frames can only be applied in playback
// order.

/// Screen width in pixels.
pub const SCREEN_WIDTH: usize = 320;
/// Screen height in pixels.
pub const SCREEN_HEIGHT: usize = 200;
/// Total pixel count of one screen.
pub const SCREEN_PIXELS: usize = SCREEN_WIDTH * SCREEN_HEIGHT;

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

/// Persistent 320x200 indexed-color pixel buffer, row-major.
///
/// One palette index per pixel. A fresh canvas is all zeros, matching the
/// state the original player draws the first frame over.
#[derive(Clone, PartialEq, Eq)]
pub struct Canvas {
    pixels: Box<[u8; SCREEN_PIXELS]>,
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            pixels: Box::new([0u8; SCREEN_PIXELS]),
        }
    }
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Canvas({SCREEN_WIDTH}x{SCREEN_HEIGHT})")
    }
}

impl Canvas {
    /// A zeroed canvas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a canvas from a full-screen pixel buffer.
    /// Returns `None` unless `pixels` is exactly 64000 bytes.
    pub fn from_pixels(pixels: &[u8]) -> Option<Self> {
        if pixels.len() != SCREEN_PIXELS {
            return None;
        }
        let mut canvas = Self::new();
        canvas.pixels.copy_from_slice(pixels);
        Some(canvas)
    }

    /// The whole screen, row-major.
    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels[..]
    }

    /// Mutable view of the whole screen.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels[..]
    }

    /// One full screen row.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        &self.pixels[y * SCREEN_WIDTH..(y + 1) * SCREEN_WIDTH]
    }

    /// Pixel at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * SCREEN_WIDTH + x]
    }

    /// Extract a region's pixels as a flat `width * height` buffer.
    pub fn copy_rect(&self, rect: Rect) -> Vec<u8> {
        let width = rect.width();
        let mut out = Vec::with_capacity(width * rect.height());
        for y in rect.top as usize..rect.bottom as usize {
            let start = y * SCREEN_WIDTH + rect.left as usize;
            out.extend_from_slice(&self.pixels[start..start + width]);
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Region rectangle
// ---------------------------------------------------------------------------

/// The rectangular sub-area of the canvas one frame updates.
///
/// `right` and `bottom` are exclusive. Frame headers carry left/top plus
/// width/height; [`Rect::from_frame`] converts between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub left: u16,
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
}

impl Rect {
    /// The full 320x200 screen.
    pub const FULL_SCREEN: Rect = Rect {
        left: 0,
        top: 0,
        right: SCREEN_WIDTH as u16,
        bottom: SCREEN_HEIGHT as u16,
    };

    pub fn new(left: u16, top: u16, right: u16, bottom: u16) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Build a rect from frame-header geometry (left/top + width/height).
    pub fn from_frame(left: u16, top: u16, width: u16, height: u16) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        (self.right - self.left) as usize
    }

    #[inline]
    pub fn height(&self) -> usize {
        (self.bottom - self.top) as usize
    }

    /// A valid frame region: non-empty and within the 320x200 screen.
    pub fn in_bounds(&self) -> bool {
        self.left < self.right
            && self.top < self.bottom
            && self.right as usize <= SCREEN_WIDTH
            && self.bottom as usize <= SCREEN_HEIGHT
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_canvas_is_zeroed() {
        let canvas = Canvas::new();
        assert!(canvas.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn from_pixels_rejects_wrong_size() {
        assert!(Canvas::from_pixels(&[0u8; 100]).is_none());
        assert!(Canvas::from_pixels(&vec![0u8; SCREEN_PIXELS]).is_some());
    }

    #[test]
    fn copy_rect_extracts_rows() {
        let mut canvas = Canvas::new();
        for y in 0..SCREEN_HEIGHT {
            for x in 0..SCREEN_WIDTH {
                canvas.pixels_mut()[y * SCREEN_WIDTH + x] = (x % 7 + y % 5) as u8;
            }
        }
        let rect = Rect::new(10, 20, 14, 23);
        let out = canvas.copy_rect(rect);
        assert_eq!(out.len(), 4 * 3);
        for (i, &b) in out.iter().enumerate() {
            let x = 10 + i % 4;
            let y = 20 + i / 4;
            assert_eq!(b, canvas.pixel(x, y));
        }
    }

    #[test]
    fn rect_bounds() {
        assert!(Rect::FULL_SCREEN.in_bounds());
        assert!(Rect::new(0, 0, 1, 1).in_bounds());
        assert!(!Rect::new(0, 0, 0, 1).in_bounds()); // empty
        assert!(!Rect::new(0, 0, 321, 1).in_bounds());
        assert!(!Rect::new(10, 199, 20, 201).in_bounds());
    }

    #[test]
    fn rect_from_frame_matches_exclusive_edges() {
        let rect = Rect::from_frame(10, 20, 30, 40);
        assert_eq!(rect.right, 40);
        assert_eq!(rect.bottom, 60);
        assert_eq!(rect.width(), 30);
        assert_eq!(rect.height(), 40);
    }
}
