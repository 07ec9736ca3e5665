// Run-length opcode grammar for SEQ delta frames.
//
// Three opcode classes share the byte space:
//
//   0xC0..=0xFF  skip class:  low 6 bits = column skip, 0 = next line
//   0x80..=0xBF  copy class:  low 6 bits = literal count, 0 = rest of line
//   0x00..=0x7F  extended:    selector in bits 3..7, 11-bit count from
//                             bits 0..3 plus a second opcode byte
//
// Only extended selectors 2 (skip), 3 (copy), 6 (copy rows) and 7 (skip
// rows) are defined; anything else is an unsupported opcode.

use super::decoder::DecodeError;

/// Largest count an extended-class opcode can carry (11 bits).
pub const LONG_COUNT_MAX: u16 = 0x7FF;

/// Largest count a single-byte skip/copy opcode can carry.
pub const SHORT_COUNT_MAX: u8 = 0x3F;

// Extended-class selectors (`op >> 3`).
const EXT_SKIP: u8 = 2;
const EXT_COPY: u8 = 3;
const EXT_COPY_ROWS: u8 = 6;
const EXT_SKIP_ROWS: u8 = 7;

// ---------------------------------------------------------------------------
// Opcode
// ---------------------------------------------------------------------------

/// One decoded opcode with its operand.
///
/// A single classification point replaces the bit-masking switch of the
/// original decoder; [`Opcode::parse`] and [`Opcode::emit`] are exact
/// inverses over well-formed streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    /// Move the write cursor to the start of the next row.
    NextLine,
    /// Advance `n` columns (1..=63), keeping the pixels underneath.
    Skip(u8),
    /// Copy `n` literal bytes (1..=63) to the cursor.
    Copy(u8),
    /// Copy literals for the remainder of the row, then move to the next.
    CopyRest,
    /// Advance up to 2047 columns.
    LongSkip(u16),
    /// Copy up to 2047 literal bytes.
    LongCopy(u16),
    /// Copy `n` full-width literal rows; 0 = the rest of the region.
    CopyRows(u16),
    /// Skip `n` rows; 0 = the rest of the region.
    SkipRows(u16),
}

impl Opcode {
    /// Classify the opcode at `pos`, returning it and the bytes consumed
    /// (1 or 2).
    pub fn parse(stream: &[u8], pos: usize) -> Result<(Opcode, usize), DecodeError> {
        let op = *stream.get(pos).ok_or(DecodeError::TruncatedStream)?;

        if op & 0xC0 == 0xC0 {
            let n = op & 0x3F;
            let code = if n == 0 {
                Opcode::NextLine
            } else {
                Opcode::Skip(n)
            };
            return Ok((code, 1));
        }

        if op & 0x80 != 0 {
            let n = op & 0x3F;
            let code = if n == 0 {
                Opcode::CopyRest
            } else {
                Opcode::Copy(n)
            };
            return Ok((code, 1));
        }

        // Extended class: the count spills into a second opcode byte.
        let op2 = *stream.get(pos + 1).ok_or(DecodeError::TruncatedStream)?;
        let count = (u16::from(op & 0x07) << 8) | u16::from(op2);
        let code = match op >> 3 {
            EXT_SKIP => Opcode::LongSkip(count),
            EXT_COPY => Opcode::LongCopy(count),
            EXT_COPY_ROWS => Opcode::CopyRows(count),
            EXT_SKIP_ROWS => Opcode::SkipRows(count),
            other => return Err(DecodeError::UnsupportedOpcode(other)),
        };
        Ok((code, 2))
    }

    /// Serialize this opcode (1 or 2 bytes). Inverse of [`Opcode::parse`].
    pub fn emit(&self, out: &mut Vec<u8>) {
        match *self {
            Opcode::NextLine => out.push(0xC0),
            Opcode::Skip(n) => {
                debug_assert!((1..=SHORT_COUNT_MAX).contains(&n));
                out.push(0xC0 | n);
            }
            Opcode::CopyRest => out.push(0x80),
            Opcode::Copy(n) => {
                debug_assert!((1..=SHORT_COUNT_MAX).contains(&n));
                out.push(0x80 | n);
            }
            Opcode::LongSkip(count) => emit_extended(EXT_SKIP, count, out),
            Opcode::LongCopy(count) => emit_extended(EXT_COPY, count, out),
            Opcode::CopyRows(count) => emit_extended(EXT_COPY_ROWS, count, out),
            Opcode::SkipRows(count) => emit_extended(EXT_SKIP_ROWS, count, out),
        }
    }
}

fn emit_extended(selector: u8, count: u16, out: &mut Vec<u8>) {
    debug_assert!(count <= LONG_COUNT_MAX);
    out.push((selector << 3) | (count >> 8) as u8);
    out.push((count & 0xFF) as u8);
}

// ---------------------------------------------------------------------------
// Opcode iterator
// ---------------------------------------------------------------------------

/// Iterate over the opcodes of one frame's opcode stream.
pub struct OpcodeIterator<'a> {
    stream: &'a [u8],
    pos: usize,
}

impl<'a> OpcodeIterator<'a> {
    pub fn new(stream: &'a [u8]) -> Self {
        Self { stream, pos: 0 }
    }

    /// Byte position of the next unread opcode.
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl Iterator for OpcodeIterator<'_> {
    type Item = Result<Opcode, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.stream.len() {
            return None;
        }
        match Opcode::parse(self.stream, self.pos) {
            Ok((code, consumed)) => {
                self.pos += consumed;
                Some(Ok(code))
            }
            Err(e) => {
                // Poison the iterator; a failed classification is fatal.
                self.pos = self.stream.len();
                Some(Err(e))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
