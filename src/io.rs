// File-level helpers for writing and reading SEQ containers.
//
// Wraps the session types with buffered I/O and returns summary stats.
// SHA-256 checksums are computed when the `file-io` feature is enabled.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::Path;

#[cfg(feature = "file-io")]
use std::io::Read;

#[cfg(feature = "file-io")]
use sha2::Digest;

use crate::seq::canvas::Canvas;
use crate::seq::decoder::DecodeError;
use crate::seq::encoder::{EncodeError, EncodeOptions};
use crate::seq::palette::Palette;
use crate::session::{SeqReader, SeqWriter};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by [`write_seq`].
#[derive(Debug, Clone)]
pub struct EncodeStats {
    /// Frames written.
    pub frames: u32,
    /// Frames stored as raw records.
    pub raw_frames: u32,
    /// Frames stored as run-length records.
    pub rle_frames: u32,
    /// Output file size in bytes.
    pub output_size: u64,
    /// SHA-256 of the output file (if `file-io` is enabled).
    pub output_sha256: Option<[u8; 32]>,
}

/// Statistics returned by [`read_seq`].
#[derive(Debug, Clone)]
pub struct DecodeStats {
    /// Frames decoded.
    pub frames: u32,
    /// Input file size in bytes.
    pub input_size: u64,
    /// SHA-256 of the final canvas state (if `file-io` is enabled).
    pub canvas_sha256: Option<[u8; 32]>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file-level operations.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

// ---------------------------------------------------------------------------
// Whole-file encode/decode
// ---------------------------------------------------------------------------

/// Write a SEQ file from full-screen frames.
///
/// Each element of `frames` must be a 64000-byte 320x200 pixel buffer.
pub fn write_seq<P: AsRef<Path>>(
    path: P,
    palette: &Palette,
    frames: &[Vec<u8>],
    options: EncodeOptions,
) -> Result<EncodeStats, IoError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = SeqWriter::with_options(BufWriter::new(file), palette, options)?;
    for frame in frames {
        writer.add_frame(frame)?;
    }
    let frames_written = writer.frames_written();
    let raw_frames = writer.raw_frames();
    let rle_frames = writer.rle_frames();
    let buf_writer = writer.finish()?;
    buf_writer.into_inner().map_err(|e| e.into_error())?;

    let output_size = std::fs::metadata(path)?.len();
    Ok(EncodeStats {
        frames: frames_written,
        raw_frames,
        rle_frames,
        output_size,
        output_sha256: file_sha256(path)?,
    })
}

/// Read a SEQ file, invoking `visit` with each decoded frame.
pub fn read_seq<P, F>(path: P, visit: F) -> Result<DecodeStats, IoError>
where
    P: AsRef<Path>,
    F: FnMut(u16, &Canvas, &Palette),
{
    let path = path.as_ref();
    let input_size = std::fs::metadata(path)?.len();
    let file = File::open(path)?;
    let mut reader = SeqReader::new(BufReader::new(file))?;
    reader.decode_all(visit)?;

    Ok(DecodeStats {
        frames: u32::from(reader.frames_decoded()),
        input_size,
        canvas_sha256: canvas_sha256(reader.canvas()),
    })
}

// ---------------------------------------------------------------------------
// Checksums
// ---------------------------------------------------------------------------

#[cfg(feature = "file-io")]
fn file_sha256(path: &Path) -> Result<Option<[u8; 32]>, IoError> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut hasher = sha2::Sha256::new();
    let mut buf = [0u8; 64 * 1024];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(Some(hasher.finalize().into()))
}

#[cfg(not(feature = "file-io"))]
fn file_sha256(_path: &Path) -> Result<Option<[u8; 32]>, IoError> {
    Ok(None)
}

#[cfg(feature = "file-io")]
fn canvas_sha256(canvas: &Canvas) -> Option<[u8; 32]> {
    let mut hasher = sha2::Sha256::new();
    hasher.update(canvas.pixels());
    Some(hasher.finalize().into())
}

#[cfg(not(feature = "file-io"))]
fn canvas_sha256(_canvas: &Canvas) -> Option<[u8; 32]> {
    None
}
