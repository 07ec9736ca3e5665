// SCI1.1 palette chunk parsing and emission.
//
// A SEQ file carries exactly one palette chunk, right after the frame
// count. The chunk layout is the SCI1.1 resource palette: a small header
// with a start index, entry count and format flag, followed by RGB
// triples (with one extra flag byte per entry in the "variable" format).

use super::decoder::DecodeError;

/// Number of palette entries.
pub const PALETTE_COLORS: usize = 256;

/// Highest number of entries one palette chunk can carry.
///
/// The chunk's count field only ever has its low byte populated, so entry
/// 255 never round-trips through a chunk. Kept at 255 for compatibility
/// with the original tool chain rather than widened.
pub const MAX_CHUNK_COLORS: u8 = 255;

/// Size of the palette chunk the encoder emits.
pub const PALETTE_CHUNK_SIZE: usize = 1024;

// Byte offsets within the chunk (SCI1.1 palette resource).
const OFFSET_START: usize = 25;
const OFFSET_COUNT: usize = 29;
const OFFSET_FORMAT: usize = 32;
const OFFSET_DATA: usize = 37;

/// Format flag value for "variable": one skipped flag byte per entry.
const FORMAT_VARIABLE: u8 = 0;

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// 256 RGB triples, shared by reference with the display side.
///
/// Mutated in place when a chunk is parsed; entries a chunk does not cover
/// keep their previous values.
#[derive(Clone, PartialEq, Eq)]
pub struct Palette {
    entries: [[u8; 3]; PALETTE_COLORS],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            entries: [[0; 3]; PALETTE_COLORS],
        }
    }
}

impl std::fmt::Debug for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Palette({PALETTE_COLORS} entries)")
    }
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// RGB triple for one entry.
    #[inline]
    pub fn rgb(&self, index: u8) -> [u8; 3] {
        self.entries[index as usize]
    }

    #[inline]
    pub fn set(&mut self, index: u8, r: u8, g: u8, b: u8) {
        self.entries[index as usize] = [r, g, b];
    }

    /// All entries in index order.
    pub fn entries(&self) -> &[[u8; 3]; PALETTE_COLORS] {
        &self.entries
    }
}

// ---------------------------------------------------------------------------
// Chunk codec
// ---------------------------------------------------------------------------

/// Parse a palette chunk into `palette`.
///
/// Reads the start index (LE u16 at offset 25), entry count (LE u16 at
/// offset 29) and format flag (offset 32), then the RGB triples from
/// offset 37. Entries outside `[start, start + count)` are left untouched.
pub fn parse_chunk(chunk: &[u8], palette: &mut Palette) -> Result<(), DecodeError> {
    if chunk.len() < OFFSET_DATA {
        return Err(DecodeError::MalformedPaletteChunk);
    }

    let start = u16::from_le_bytes([chunk[OFFSET_START], chunk[OFFSET_START + 1]]) as usize;
    let count = u16::from_le_bytes([chunk[OFFSET_COUNT], chunk[OFFSET_COUNT + 1]]) as usize;
    let variable = chunk[OFFSET_FORMAT] == FORMAT_VARIABLE;

    let mut pos = OFFSET_DATA;
    for color in start..start + count {
        if color >= PALETTE_COLORS {
            return Err(DecodeError::MalformedPaletteChunk);
        }
        if variable {
            // One flag byte per entry, not interpreted.
            pos += 1;
        }
        let rgb = chunk
            .get(pos..pos + 3)
            .ok_or(DecodeError::MalformedPaletteChunk)?;
        palette.set(color as u8, rgb[0], rgb[1], rgb[2]);
        pos += 3;
    }

    Ok(())
}

/// Build the palette chunk the encoder writes once per sequence.
///
/// Fixed format, start index 0, `active_count` entries. The emitted header
/// bytes match the original SeqMaker output exactly (bytes 10, 31 and 32
/// set to 1, count low byte at 29); the count high byte is never
/// populated, hence [`MAX_CHUNK_COLORS`].
pub fn build_chunk(palette: &Palette, active_count: u8) -> Vec<u8> {
    let mut chunk = vec![0u8; PALETTE_CHUNK_SIZE];
    chunk[10] = 1;
    chunk[OFFSET_COUNT] = active_count;
    chunk[31] = 1;
    chunk[OFFSET_FORMAT] = 1; // fixed format: no per-entry flag byte

    let mut pos = OFFSET_DATA;
    for entry in palette.entries {
        chunk[pos..pos + 3].copy_from_slice(&entry);
        pos += 3;
    }
    chunk
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
