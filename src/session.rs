// Sequence container sessions: sequential decode and append-only encode.
//
// A session owns the persistent canvas and the palette. Frames can only
// be decoded in playback order — frame i's rendering depends on the
// canvas state left by frames 0..i — and appended frames are diffed
// against the previously appended frame.

use std::io::{Read, Seek, SeekFrom, Write};

use log::{debug, trace};

use crate::seq::canvas::Canvas;
use crate::seq::decoder::{self, DecodeError};
use crate::seq::diff::changed_rect;
use crate::seq::encoder::{self, EncodeError, EncodeOptions};
use crate::seq::header::{FRAME_HEADER_SIZE, FrameHeader, FrameKind};
use crate::seq::palette::{self, MAX_CHUNK_COLORS, Palette};

/// Upper bound on the palette chunk size a reader will allocate. Real
/// chunks are 1024 bytes; anything past this is a corrupt size field.
const MAX_PALETTE_CHUNK_SIZE: i32 = 64 * 1024;

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Sequential SEQ decoder.
///
/// `new` parses the frame count and the palette chunk; each
/// [`next_frame`](SeqReader::next_frame) call then applies one frame to
/// the owned canvas and returns it. Payload buffers are reused across
/// frames.
#[derive(Debug)]
pub struct SeqReader<R> {
    reader: R,
    canvas: Canvas,
    palette: Palette,
    frame_count: u16,
    frames_decoded: u16,
    last_header: Option<FrameHeader>,
    /// Reusable payload buffer (grows to the largest frame, never shrinks).
    payload: Vec<u8>,
}

impl<R: Read + Seek> SeqReader<R> {
    /// Open a sequence: read the frame count and the palette chunk.
    pub fn new(mut reader: R) -> Result<Self, DecodeError> {
        let mut buf2 = [0u8; 2];
        reader.read_exact(&mut buf2)?;
        let frame_count = u16::from_le_bytes(buf2);

        let mut buf4 = [0u8; 4];
        reader.read_exact(&mut buf4)?;
        let chunk_size = i32::from_le_bytes(buf4);
        if !(0..=MAX_PALETTE_CHUNK_SIZE).contains(&chunk_size) {
            return Err(DecodeError::MalformedPaletteChunk);
        }

        let mut chunk = vec![0u8; chunk_size as usize];
        reader.read_exact(&mut chunk)?;
        let mut palette = Palette::new();
        palette::parse_chunk(&chunk, &mut palette)?;

        debug!("seq opened: {frame_count} frames, {chunk_size}-byte palette chunk");
        Ok(Self {
            reader,
            canvas: Canvas::new(),
            palette,
            frame_count,
            frames_decoded: 0,
            last_header: None,
            payload: Vec::new(),
        })
    }

    /// Total frames announced by the container header.
    pub fn frame_count(&self) -> u16 {
        self.frame_count
    }

    /// Frames applied to the canvas so far.
    pub fn frames_decoded(&self) -> u16 {
        self.frames_decoded
    }

    /// The canvas in its current (cumulative) state.
    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// The palette parsed from the container's palette chunk.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Header of the most recently decoded frame.
    pub fn last_header(&self) -> Option<&FrameHeader> {
        self.last_header.as_ref()
    }

    /// Decode the next frame into the canvas.
    ///
    /// Returns `Ok(None)` once all frames have been applied. On error the
    /// canvas may hold a partially applied frame; the session is not
    /// usable afterwards.
    pub fn next_frame(&mut self) -> Result<Option<&Canvas>, DecodeError> {
        if self.frames_decoded >= self.frame_count {
            return Ok(None);
        }

        let header = FrameHeader::read(&mut self.reader)?;
        let rect = header.rect();
        if !rect.in_bounds() {
            return Err(DecodeError::InvalidRegion);
        }
        trace!(
            "frame {}: {:?} {}x{} at ({}, {}), payload at {}",
            self.frames_decoded,
            header.kind,
            header.width,
            header.height,
            header.left,
            header.top,
            header.payload_offset
        );

        // Headers and payloads need not be contiguous; the offset is
        // authoritative. The next header follows the payload.
        self.reader
            .seek(SeekFrom::Start(u64::from(header.payload_offset)))?;

        match header.kind {
            FrameKind::Raw => {
                self.payload.resize(rect.width() * rect.height(), 0);
                self.reader.read_exact(&mut self.payload)?;
                decoder::apply_raw(&self.payload, &mut self.canvas, rect)?;
            }
            FrameKind::RunLength => {
                let total = header.rle_len as usize + header.literal_len as usize;
                self.payload.resize(total, 0);
                self.reader.read_exact(&mut self.payload)?;
                let (opcodes, literals) = self.payload.split_at(header.rle_len as usize);
                decoder::apply_delta(opcodes, literals, &mut self.canvas, rect)?;
            }
        }

        self.last_header = Some(header);
        self.frames_decoded += 1;
        Ok(Some(&self.canvas))
    }

    /// Decode every remaining frame, invoking `visit` with the frame
    /// number, the canvas snapshot and the palette after each one.
    pub fn decode_all<F>(&mut self, mut visit: F) -> Result<(), DecodeError>
    where
        F: FnMut(u16, &Canvas, &Palette),
    {
        while self.next_frame()?.is_some() {
            visit(self.frames_decoded - 1, &self.canvas, &self.palette);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Append-only SEQ encoder.
///
/// Frames are full 320x200 pixel buffers; each is diffed against the
/// previously appended frame (initially the zero canvas, matching the
/// decoder's starting state) and written as a raw or run-length record.
/// The frame count is backpatched on [`finish`](SeqWriter::finish).
pub struct SeqWriter<W: Write + Seek> {
    writer: W,
    options: EncodeOptions,
    previous: Canvas,
    frames: u32,
    raw_frames: u32,
    rle_frames: u32,
}

impl<W: Write + Seek> SeqWriter<W> {
    /// Start a sequence with default options (raw frames only).
    pub fn new(writer: W, palette: &Palette) -> Result<Self, EncodeError> {
        Self::with_options(writer, palette, EncodeOptions::default())
    }

    /// Start a sequence: write a frame-count placeholder and the palette
    /// chunk.
    pub fn with_options(
        mut writer: W,
        palette: &Palette,
        options: EncodeOptions,
    ) -> Result<Self, EncodeError> {
        writer.write_all(&0u16.to_le_bytes())?;
        let chunk = palette::build_chunk(palette, MAX_CHUNK_COLORS);
        writer.write_all(&(chunk.len() as i32).to_le_bytes())?;
        writer.write_all(&chunk)?;
        Ok(Self {
            writer,
            options,
            previous: Canvas::new(),
            frames: 0,
            raw_frames: 0,
            rle_frames: 0,
        })
    }

    /// Frames appended so far.
    pub fn frames_written(&self) -> u32 {
        self.frames
    }

    /// Raw frame records written so far.
    pub fn raw_frames(&self) -> u32 {
        self.raw_frames
    }

    /// Run-length frame records written so far.
    pub fn rle_frames(&self) -> u32 {
        self.rle_frames
    }

    /// Append one full-screen frame.
    ///
    /// `pixels` must be exactly 64000 bytes. The changed bounding box
    /// against the previous frame is computed, encoded per the session
    /// options and written as a header plus payload; the payload offset
    /// points immediately past the header.
    pub fn add_frame(&mut self, pixels: &[u8]) -> Result<(), EncodeError> {
        if self.frames >= u32::from(u16::MAX) {
            return Err(EncodeError::TooManyFrames);
        }
        let current =
            Canvas::from_pixels(pixels).ok_or(EncodeError::InvalidRegion)?;
        let rect = changed_rect(&self.previous, &current);
        let region_pixels = current.copy_rect(rect);
        let frame = encoder::encode_frame(
            &self.previous,
            rect,
            &region_pixels,
            self.options.compression,
        )?;

        let header_pos = self.writer.stream_position()?;
        let payload_offset = header_pos + FRAME_HEADER_SIZE as u64;
        let header = FrameHeader {
            width: rect.width() as u16,
            height: rect.height() as u16,
            left: rect.left,
            top: rect.top,
            color_key: self.options.color_key,
            kind: frame.kind,
            literal_len: frame.literals.len() as u16,
            rle_len: frame.opcodes.len() as u16,
            payload_offset: payload_offset as u32,
        };
        header.write(&mut self.writer)?;
        self.writer.write_all(&frame.opcodes)?;
        self.writer.write_all(&frame.literals)?;

        match frame.kind {
            FrameKind::Raw => self.raw_frames += 1,
            FrameKind::RunLength => self.rle_frames += 1,
        }
        debug!(
            "frame {}: {:?} {}x{} at ({}, {}), {} payload bytes",
            self.frames,
            frame.kind,
            header.width,
            header.height,
            header.left,
            header.top,
            frame.opcodes.len() + frame.literals.len()
        );

        self.previous = current;
        self.frames += 1;
        Ok(())
    }

    /// Backpatch the frame count and return the writer.
    pub fn finish(mut self) -> Result<W, EncodeError> {
        self.writer.seek(SeekFrom::Start(0))?;
        self.writer.write_all(&(self.frames as u16).to_le_bytes())?;
        self.writer.seek(SeekFrom::End(0))?;
        self.writer.flush()?;
        debug!(
            "seq finished: {} frames ({} raw, {} run-length)",
            self.frames, self.raw_frames, self.rle_frames
        );
        Ok(self.writer)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
