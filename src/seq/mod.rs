// SEQ animation container format.
//
// A SEQ file is a sequence of palette-indexed 320x200 frames, each either
// stored raw or run-length compressed against the previous decoded frame.
//
// # Modules
//
// - `canvas`  — Persistent 320x200 pixel buffer and region rectangles
// - `palette` — SCI1.1 palette chunk parsing and emission
// - `diff`    — Minimal changed bounding box between frames
// - `opcode`  — Run-length opcode grammar (classification and emission)
// - `decoder` — Raw and run-length frame application
// - `encoder` — Raw and run-length frame construction
// - `header`  — Container/frame header binary layout

pub mod canvas;
pub mod decoder;
pub mod diff;
pub mod encoder;
pub mod header;
pub mod opcode;
pub mod palette;

// Re-export key types for convenience.
pub use canvas::{Canvas, Rect, SCREEN_HEIGHT, SCREEN_PIXELS, SCREEN_WIDTH};
pub use decoder::DecodeError;
pub use diff::changed_rect;
pub use encoder::{Compression, EncodeError, EncodeOptions, EncodedFrame};
pub use header::{FRAME_HEADER_SIZE, FrameHeader, FrameKind};
pub use opcode::{Opcode, OpcodeIterator};
pub use palette::{MAX_CHUNK_COLORS, PALETTE_CHUNK_SIZE, PALETTE_COLORS, Palette};
