// Frame differencer: minimal changed bounding box between two canvases.
//
// Encoder side only. Scan order matches the original tool: rows from the
// top, rows from the bottom, then columns from the left and right over
// the full screen height.

use super::canvas::{Canvas, Rect, SCREEN_HEIGHT, SCREEN_WIDTH};

/// Smallest rectangle covering every pixel that differs between
/// `previous` and `current`.
///
/// When the two canvases are identical the result degenerates to a 1x1
/// rectangle at the origin rather than an empty one: existing decoders
/// assume `width, height >= 1`, so a no-change frame still carries one
/// pixel.
pub fn changed_rect(previous: &Canvas, current: &Canvas) -> Rect {
    let row_differs = |y: usize| previous.row(y) != current.row(y);
    let col_differs = |x: usize| (0..SCREEN_HEIGHT).any(|y| previous.pixel(x, y) != current.pixel(x, y));

    let Some(top) = (0..SCREEN_HEIGHT).find(|&y| row_differs(y)) else {
        return Rect::new(0, 0, 1, 1);
    };
    // A differing row exists, so the remaining scans always terminate.
    let bottom = (top..SCREEN_HEIGHT).rev().find(|&y| row_differs(y)).unwrap_or(top) + 1;
    let left = (0..SCREEN_WIDTH).find(|&x| col_differs(x)).unwrap_or(0);
    let right = (left..SCREEN_WIDTH).rev().find(|&x| col_differs(x)).unwrap_or(left) + 1;

    Rect::new(left as u16, top as u16, right as u16, bottom as u16)
}
