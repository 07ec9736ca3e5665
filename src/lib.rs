//! Seqvid: encoder/decoder for the Sierra SCI1.1 SEQ animation container.
//!
//! A SEQ file holds a palette chunk and a sequence of palette-indexed
//! 320x200 frames. Each frame is either stored raw or run-length
//! compressed against the previous decoded frame; undrawn regions keep
//! the previous frame's pixels, so frames must be applied in order.
//!
//! The crate provides:
//! - The format codec itself (`seq`): palette chunk, opcode grammar,
//!   frame differencer, raw/run-length frame encoding and decoding
//! - Sequential container sessions (`session`)
//! - File-oriented helpers (`io`)
//!
//! # Quick Start
//!
//! ```no_run
//! use std::io::Cursor;
//! use seqvid::seq::{Palette, SCREEN_PIXELS};
//! use seqvid::session::{SeqReader, SeqWriter};
//!
//! let palette = Palette::new();
//! let mut writer = SeqWriter::new(Cursor::new(Vec::new()), &palette).unwrap();
//! writer.add_frame(&vec![7u8; SCREEN_PIXELS]).unwrap();
//! let bytes = writer.finish().unwrap().into_inner();
//!
//! let mut reader = SeqReader::new(Cursor::new(bytes)).unwrap();
//! while let Some(canvas) = reader.next_frame().unwrap() {
//!     // hand the canvas plus reader.palette() to a display or exporter
//!     let _ = canvas.pixels();
//! }
//! ```

pub mod io;
pub mod seq;
pub mod session;
