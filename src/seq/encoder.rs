// Frame encoding: raw payloads and greedy run-length selection.
//
// The original tool only ever emitted raw frames (its compressor was left
// unfinished), so raw remains the compatible default. Run-length encoding
// is an opt-in improvement: a greedy, row-oriented pass that mirrors the
// decoder's cursor model, with the guarantee that applying the result
// against the same previous canvas reproduces the frame pixels exactly.

use super::canvas::{Canvas, Rect, SCREEN_WIDTH};
use super::header::FrameKind;
use super::opcode::{LONG_COUNT_MAX, Opcode, SHORT_COUNT_MAX};

// ---------------------------------------------------------------------------
// Encoder error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("frame region degenerate or outside the 320x200 screen")]
    InvalidRegion,
    #[error("sequence exceeds {} frames", u16::MAX)]
    TooManyFrames,
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Frame payload selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// Store every frame as uncompressed rows, matching the original tool
    /// byte-for-byte.
    #[default]
    None,
    /// Greedy run-length encoding against the previous frame; falls back
    /// to raw when the opcode stream would not be smaller.
    RunLength,
}

/// Configuration for a sequence encoding session.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    pub compression: Compression,
    /// Transparency key written into each frame header.
    pub color_key: u8,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            compression: Compression::None,
            color_key: 0xFF,
        }
    }
}

// ---------------------------------------------------------------------------
// Encoded frame
// ---------------------------------------------------------------------------

/// One frame's payload, ready for the container writer.
///
/// For raw frames the literal stream is the region pixels and the opcode
/// stream is empty.
#[derive(Debug, Clone)]
pub struct EncodedFrame {
    pub kind: FrameKind,
    pub rect: Rect,
    pub opcodes: Vec<u8>,
    pub literals: Vec<u8>,
}

/// Encode one frame region, choosing raw or run-length per `compression`.
///
/// `pixels` is the flat `width * height` region buffer; `previous` is the
/// canvas state the decoder will hold when this frame is applied.
pub fn encode_frame(
    previous: &Canvas,
    rect: Rect,
    pixels: &[u8],
    compression: Compression,
) -> Result<EncodedFrame, EncodeError> {
    if !rect.in_bounds() || pixels.len() != rect.width() * rect.height() {
        return Err(EncodeError::InvalidRegion);
    }

    if compression == Compression::RunLength {
        let (opcodes, literals) = encode_delta(previous, rect, pixels)?;
        if opcodes.len() + literals.len() < pixels.len() {
            return Ok(EncodedFrame {
                kind: FrameKind::RunLength,
                rect,
                opcodes,
                literals,
            });
        }
    }

    Ok(EncodedFrame {
        kind: FrameKind::Raw,
        rect,
        opcodes: Vec::new(),
        literals: pixels.to_vec(),
    })
}

// ---------------------------------------------------------------------------
// Run-length stream construction
// ---------------------------------------------------------------------------

/// Produce an opcode/literal stream pair whose application against
/// `previous` yields `pixels` over `rect`.
///
/// Every row and every column of the region is accounted for by exactly
/// one skip or copy operation: unchanged row groups become `SkipRows`,
/// fully-changed row groups become `CopyRows`, and mixed rows alternate
/// skip and copy runs closed by `CopyRest` or a trailing skip plus
/// `NextLine`.
pub fn encode_delta(
    previous: &Canvas,
    rect: Rect,
    pixels: &[u8],
) -> Result<(Vec<u8>, Vec<u8>), EncodeError> {
    if !rect.in_bounds() || pixels.len() != rect.width() * rect.height() {
        return Err(EncodeError::InvalidRegion);
    }

    let width = rect.width();
    let height = rect.height();
    let left = rect.left as usize;
    let top = rect.top as usize;

    let prev_row = |r: usize| {
        let start = (top + r) * SCREEN_WIDTH + left;
        &previous.pixels()[start..start + width]
    };
    let cur_row = |r: usize| &pixels[r * width..(r + 1) * width];

    let mut opcodes = Vec::new();
    let mut literals = Vec::new();

    let mut r = 0;
    while r < height {
        if cur_row(r) == prev_row(r) {
            let mut run = 1;
            while r + run < height && cur_row(r + run) == prev_row(r + run) {
                run += 1;
            }
            emit_skip_rows(run, &mut opcodes);
            r += run;
        } else if row_fully_changed(cur_row(r), prev_row(r)) {
            let mut run = 1;
            while r + run < height && row_fully_changed(cur_row(r + run), prev_row(r + run)) {
                run += 1;
            }
            // Region height tops out at 200, well under the 11-bit count.
            Opcode::CopyRows(run as u16).emit(&mut opcodes);
            for i in 0..run {
                literals.extend_from_slice(cur_row(r + i));
            }
            r += run;
        } else {
            encode_mixed_row(cur_row(r), prev_row(r), &mut opcodes, &mut literals);
            r += 1;
        }
    }

    Ok((opcodes, literals))
}

fn row_fully_changed(cur: &[u8], prev: &[u8]) -> bool {
    cur.iter().zip(prev).all(|(c, p)| c != p)
}

/// Encode one row that mixes changed and unchanged spans.
fn encode_mixed_row(cur: &[u8], prev: &[u8], opcodes: &mut Vec<u8>, literals: &mut Vec<u8>) {
    let width = cur.len();
    let mut c = 0;
    while c < width {
        let changed = cur[c] != prev[c];
        let mut run = 1;
        while c + run < width && (cur[c + run] != prev[c + run]) == changed {
            run += 1;
        }

        if changed {
            if c + run == width {
                // Remainder of the line; also advances the row.
                Opcode::CopyRest.emit(opcodes);
            } else {
                emit_copy(run, opcodes);
            }
            literals.extend_from_slice(&cur[c..c + run]);
        } else {
            emit_skip(run, opcodes);
            if c + run == width {
                Opcode::NextLine.emit(opcodes);
            }
        }
        c += run;
    }
}

fn emit_skip(mut n: usize, opcodes: &mut Vec<u8>) {
    while n > SHORT_COUNT_MAX as usize {
        let take = n.min(LONG_COUNT_MAX as usize);
        Opcode::LongSkip(take as u16).emit(opcodes);
        n -= take;
    }
    if n > 0 {
        Opcode::Skip(n as u8).emit(opcodes);
    }
}

fn emit_copy(mut n: usize, opcodes: &mut Vec<u8>) {
    while n > SHORT_COUNT_MAX as usize {
        let take = n.min(LONG_COUNT_MAX as usize);
        Opcode::LongCopy(take as u16).emit(opcodes);
        n -= take;
    }
    if n > 0 {
        Opcode::Copy(n as u8).emit(opcodes);
    }
}

fn emit_skip_rows(mut n: usize, opcodes: &mut Vec<u8>) {
    while n > 0 {
        let take = n.min(LONG_COUNT_MAX as usize);
        Opcode::SkipRows(take as u16).emit(opcodes);
        n -= take;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
