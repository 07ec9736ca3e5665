// Frame application: raw row copies and run-length opcode streams.
//
// Both paths mutate the persistent canvas in place. On error the canvas
// keeps whatever was written before the failure; callers that need
// atomicity must snapshot the canvas before applying a frame (documented
// contract, matching the original player).

use log::trace;

use super::canvas::{Canvas, Rect, SCREEN_WIDTH};
use super::opcode::{Opcode, OpcodeIterator};

// ---------------------------------------------------------------------------
// Decoder error
// ---------------------------------------------------------------------------

/// Errors raised while decoding a sequence. All are fatal to the session:
/// the canvas is cumulative, so skipping a corrupt frame would silently
/// desynchronize every later frame.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("palette chunk too short or inconsistent")]
    MalformedPaletteChunk,
    #[error("unsupported extended opcode selector {0}")]
    UnsupportedOpcode(u8),
    #[error("opcode or literal stream ended early")]
    TruncatedStream,
    #[error("frame region outside the 320x200 screen")]
    InvalidRegion,
}

// ---------------------------------------------------------------------------
// Raw frames
// ---------------------------------------------------------------------------

/// Apply a raw frame: `height` rows of `width` uncompressed bytes, copied
/// into the canvas at the region's top-left corner.
pub fn apply_raw(payload: &[u8], canvas: &mut Canvas, rect: Rect) -> Result<(), DecodeError> {
    if !rect.in_bounds() {
        return Err(DecodeError::InvalidRegion);
    }
    let width = rect.width();
    if payload.len() < width * rect.height() {
        return Err(DecodeError::TruncatedStream);
    }

    let left = rect.left as usize;
    for (i, row) in (rect.top as usize..rect.bottom as usize).enumerate() {
        let src = &payload[i * width..(i + 1) * width];
        let dst = row * SCREEN_WIDTH + left;
        canvas.pixels_mut()[dst..dst + width].copy_from_slice(src);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Run-length frames
// ---------------------------------------------------------------------------

/// Apply a run-length frame: interpret `opcodes` against `literals`,
/// writing into the canvas region.
///
/// The write cursor starts at the region's top-left corner; skip-class
/// opcodes leave the previous frame's pixels in place. The stream is
/// consumed until exhausted.
pub fn apply_delta(
    opcodes: &[u8],
    literals: &[u8],
    canvas: &mut Canvas,
    rect: Rect,
) -> Result<(), DecodeError> {
    if !rect.in_bounds() {
        return Err(DecodeError::InvalidRegion);
    }

    let left = rect.left as usize;
    let top = rect.top as usize;
    let width = rect.width();
    let height = rect.height();

    let mut row = top;
    let mut col = left;
    let mut lit = 0usize;

    for code in OpcodeIterator::new(opcodes) {
        match code? {
            Opcode::NextLine => {
                row += 1;
                col = left;
            }
            Opcode::Skip(n) => col += n as usize,
            Opcode::LongSkip(n) => col += n as usize,
            Opcode::Copy(n) => copy_span(canvas, literals, &mut lit, row, &mut col, n as usize)?,
            Opcode::LongCopy(n) => {
                copy_span(canvas, literals, &mut lit, row, &mut col, n as usize)?;
            }
            Opcode::CopyRest => {
                let done = col.checked_sub(left).ok_or(DecodeError::InvalidRegion)?;
                let rest = width.checked_sub(done).ok_or(DecodeError::InvalidRegion)?;
                copy_span(canvas, literals, &mut lit, row, &mut col, rest)?;
                row += 1;
                col = left;
            }
            Opcode::CopyRows(count) => {
                let count = expand_row_count(count, row, top, height)?;
                for _ in 0..count {
                    col = left;
                    copy_span(canvas, literals, &mut lit, row, &mut col, width)?;
                    row += 1;
                }
            }
            Opcode::SkipRows(count) => {
                row += expand_row_count(count, row, top, height)?;
            }
        }
    }

    trace!(
        "delta applied: {} opcode bytes, {lit} of {} literal bytes used",
        opcodes.len(),
        literals.len()
    );
    Ok(())
}

/// A zero row count means "the rest of the region".
fn expand_row_count(
    count: u16,
    row: usize,
    top: usize,
    height: usize,
) -> Result<usize, DecodeError> {
    if count != 0 {
        return Ok(count as usize);
    }
    let done = row.checked_sub(top).ok_or(DecodeError::InvalidRegion)?;
    height.checked_sub(done).ok_or(DecodeError::InvalidRegion)
}

/// Copy `n` literal bytes to `(row, col)` and advance both cursors.
///
/// The literal bounds are checked before any pixel is written, so a failed
/// span leaves the canvas untouched by that span.
fn copy_span(
    canvas: &mut Canvas,
    literals: &[u8],
    lit: &mut usize,
    row: usize,
    col: &mut usize,
    n: usize,
) -> Result<(), DecodeError> {
    let src = literals
        .get(*lit..*lit + n)
        .ok_or(DecodeError::TruncatedStream)?;
    let end = col.checked_add(n).ok_or(DecodeError::InvalidRegion)?;
    if row >= super::canvas::SCREEN_HEIGHT || end > SCREEN_WIDTH {
        return Err(DecodeError::InvalidRegion);
    }
    let dst = row * SCREEN_WIDTH + *col;
    canvas.pixels_mut()[dst..dst + n].copy_from_slice(src);
    *lit += n;
    *col = end;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
