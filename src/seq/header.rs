// Container and frame header binary layout.
//
// All integers are little-endian. The container opens with a u16 frame
// count and an i32-sized palette chunk; each frame then carries a fixed
// 28-byte header followed (at `payload_offset`, an absolute file
// position) by its payload. The original tool always places the payload
// immediately after the header, but readers honor the offset by seeking.

use std::io::{self, Read, Write};

use super::canvas::Rect;

/// Size of the fixed per-frame header in bytes.
pub const FRAME_HEADER_SIZE: usize = 28;

// ---------------------------------------------------------------------------
// Frame kind
// ---------------------------------------------------------------------------

/// Payload encoding of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Uncompressed rows: `height` rows of `width` bytes.
    Raw,
    /// Opcode stream plus literal stream, applied against the previous
    /// canvas state.
    RunLength,
}

impl FrameKind {
    /// Header byte value: 0 = raw, any nonzero value = run-length.
    fn from_byte(b: u8) -> Self {
        if b == 0 {
            FrameKind::Raw
        } else {
            FrameKind::RunLength
        }
    }

    fn to_byte(self) -> u8 {
        match self {
            FrameKind::Raw => 0,
            FrameKind::RunLength => 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Frame header
// ---------------------------------------------------------------------------

/// Parsed 28-byte frame header.
#[derive(Debug, Clone)]
pub struct FrameHeader {
    pub width: u16,
    pub height: u16,
    pub left: u16,
    pub top: u16,
    /// Transparency key; the original tool writes 0xFF.
    pub color_key: u8,
    pub kind: FrameKind,
    /// Literal stream length. For raw frames this is the full pixel count.
    pub literal_len: u16,
    /// Opcode stream length; zero for raw frames.
    pub rle_len: u16,
    /// Absolute byte position of the payload from the start of the file.
    pub payload_offset: u32,
}

impl FrameHeader {
    /// The canvas region this frame updates.
    pub fn rect(&self) -> Rect {
        Rect::from_frame(self.left, self.top, self.width, self.height)
    }

    /// Write the 28-byte header.
    ///
    /// Field order matches the original emitter: geometry, color key and
    /// kind, then the byte counts interleaved with reserved pad fields,
    /// then the absolute payload offset.
    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut buf = [0u8; FRAME_HEADER_SIZE];
        buf[0..2].copy_from_slice(&self.width.to_le_bytes());
        buf[2..4].copy_from_slice(&self.height.to_le_bytes());
        buf[4..6].copy_from_slice(&self.left.to_le_bytes());
        buf[6..8].copy_from_slice(&self.top.to_le_bytes());
        buf[8] = self.color_key;
        buf[9] = self.kind.to_byte();
        // buf[10..12] reserved
        buf[12..14].copy_from_slice(&self.literal_len.to_le_bytes());
        // buf[14..16] reserved
        buf[16..18].copy_from_slice(&self.rle_len.to_le_bytes());
        // buf[18..24] reserved
        buf[24..28].copy_from_slice(&self.payload_offset.to_le_bytes());
        w.write_all(&buf)
    }

    /// Read and parse a 28-byte header.
    pub fn read<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut buf = [0u8; FRAME_HEADER_SIZE];
        r.read_exact(&mut buf)?;
        Ok(Self {
            width: u16::from_le_bytes([buf[0], buf[1]]),
            height: u16::from_le_bytes([buf[2], buf[3]]),
            left: u16::from_le_bytes([buf[4], buf[5]]),
            top: u16::from_le_bytes([buf[6], buf[7]]),
            color_key: buf[8],
            kind: FrameKind::from_byte(buf[9]),
            literal_len: u16::from_le_bytes([buf[12], buf[13]]),
            rle_len: u16::from_le_bytes([buf[16], buf[17]]),
            payload_offset: u32::from_le_bytes([buf[24], buf[25], buf[26], buf[27]]),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
