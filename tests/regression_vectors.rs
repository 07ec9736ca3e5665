// Hand-built byte vectors pinning the opcode grammar and container
// layout to the behavior of the original player. These streams are
// written as raw bytes on purpose: they must keep decoding the same way
// even if the emitter changes.

use std::io::Cursor;

use seqvid::seq::{Canvas, DecodeError, Palette, Rect, decoder, palette};
use seqvid::session::SeqReader;

fn apply(opcodes: &[u8], literals: &[u8], rect: Rect) -> Canvas {
    let mut canvas = Canvas::new();
    decoder::apply_delta(opcodes, literals, &mut canvas, rect).unwrap();
    canvas
}

#[test]
fn skip_class_vector() {
    // C5       skip 5 columns
    // 81 'A'   copy 1
    // C0       next line
    // 82 'B''C' copy 2
    let rect = Rect::new(0, 0, 10, 2);
    let canvas = apply(&[0xC5, 0x81, 0xC0, 0x82], b"ABC", rect);
    assert_eq!(canvas.pixel(5, 0), b'A');
    assert_eq!(canvas.pixel(0, 1), b'B');
    assert_eq!(canvas.pixel(1, 1), b'C');
    assert_eq!(canvas.pixel(0, 0), 0);
}

#[test]
fn copy_rest_vector() {
    // 83 copy 3, 80 copy remainder (7 bytes of a 10-wide row)
    let rect = Rect::new(20, 5, 30, 6);
    let canvas = apply(&[0x83, 0x80], b"abcdefghij", rect);
    assert_eq!(&canvas.row(5)[20..30], b"abcdefghij");
}

#[test]
fn extended_skip_and_copy_vector() {
    // 10 64    long skip 0x064 (100 columns)
    // 18 96    long copy 0x096 (150 bytes)
    let rect = Rect::new(0, 0, 320, 1);
    let literals: Vec<u8> = (0..150u8).map(|i| i.wrapping_add(1)).collect();
    let canvas = apply(&[0x10, 0x64, 0x18, 0x96], &literals, rect);
    assert!(canvas.row(0)[..100].iter().all(|&p| p == 0));
    assert_eq!(&canvas.row(0)[100..250], &literals[..]);
    assert!(canvas.row(0)[250..].iter().all(|&p| p == 0));
}

#[test]
fn copy_rows_vector() {
    // 30 02: copy 2 full-width rows
    let rect = Rect::new(100, 50, 104, 53);
    let canvas = apply(&[0x30, 0x02], &[1, 2, 3, 4, 5, 6, 7, 8], rect);
    assert_eq!(&canvas.row(50)[100..104], &[1, 2, 3, 4]);
    assert_eq!(&canvas.row(51)[100..104], &[5, 6, 7, 8]);
    assert!(canvas.row(52)[100..104].iter().all(|&p| p == 0));
}

#[test]
fn skip_rows_then_copy_rest_of_region_vector() {
    // 38 01: skip 1 row; 30 00: copy rows for the rest of the region
    let rect = Rect::new(0, 0, 2, 3);
    let canvas = apply(&[0x38, 0x01, 0x30, 0x00], &[9, 8, 7, 6], rect);
    assert_eq!(&canvas.row(0)[..2], &[0, 0]);
    assert_eq!(&canvas.row(1)[..2], &[9, 8]);
    assert_eq!(&canvas.row(2)[..2], &[7, 6]);
}

#[test]
fn unsupported_selector_partial_write_vector() {
    // 81 'X' then 20 00 (selector 4): the copy sticks, the rest fails.
    let mut canvas = Canvas::new();
    let rect = Rect::new(0, 0, 4, 1);
    let err = decoder::apply_delta(&[0x81, 0x20, 0x00], b"X", &mut canvas, rect).unwrap_err();
    assert!(matches!(err, DecodeError::UnsupportedOpcode(4)));
    assert_eq!(canvas.pixel(0, 0), b'X');
}

#[test]
fn truncated_extended_opcode_vector() {
    let mut canvas = Canvas::new();
    let rect = Rect::new(0, 0, 4, 1);
    let err = decoder::apply_delta(&[0x18], &[], &mut canvas, rect).unwrap_err();
    assert!(matches!(err, DecodeError::TruncatedStream));
}

#[test]
fn palette_chunk_vector_variable_format() {
    // Variable format: flag byte before each triple.
    let mut chunk = vec![0u8; 37 + 8];
    chunk[25] = 4; // start = 4
    chunk[29] = 2; // count = 2
    chunk[32] = 0; // variable
    chunk[37..45].copy_from_slice(&[0xEE, 10, 11, 12, 0xEE, 13, 14, 15]);

    let mut pal = Palette::new();
    palette::parse_chunk(&chunk, &mut pal).unwrap();
    assert_eq!(pal.rgb(4), [10, 11, 12]);
    assert_eq!(pal.rgb(5), [13, 14, 15]);
    assert_eq!(pal.rgb(3), [0, 0, 0]);
    assert_eq!(pal.rgb(6), [0, 0, 0]);
}

#[test]
fn container_vector_single_raw_frame() {
    // A minimal container assembled by hand: one 2x1 raw frame at (3, 4).
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&1u16.to_le_bytes()); // frame count

    let mut chunk = vec![0u8; 37 + 3];
    chunk[29] = 1; // one color
    chunk[32] = 1; // fixed format
    chunk[37..40].copy_from_slice(&[40, 50, 60]);
    bytes.extend_from_slice(&(chunk.len() as i32).to_le_bytes());
    bytes.extend_from_slice(&chunk);

    let header_pos = bytes.len();
    let payload_offset = (header_pos + 28) as u32;
    let mut header = [0u8; 28];
    header[0..2].copy_from_slice(&2u16.to_le_bytes()); // width
    header[2..4].copy_from_slice(&1u16.to_le_bytes()); // height
    header[4..6].copy_from_slice(&3u16.to_le_bytes()); // left
    header[6..8].copy_from_slice(&4u16.to_le_bytes()); // top
    header[8] = 0xFF; // color key
    header[9] = 0; // raw
    header[12..14].copy_from_slice(&2u16.to_le_bytes()); // literal bytes
    header[24..28].copy_from_slice(&payload_offset.to_le_bytes());
    bytes.extend_from_slice(&header);
    bytes.extend_from_slice(&[0xAA, 0xBB]);

    let mut reader = SeqReader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(reader.frame_count(), 1);
    assert_eq!(reader.palette().rgb(0), [40, 50, 60]);
    let canvas = reader.next_frame().unwrap().unwrap();
    assert_eq!(canvas.pixel(3, 4), 0xAA);
    assert_eq!(canvas.pixel(4, 4), 0xBB);
    assert!(reader.next_frame().unwrap().is_none());
}

#[test]
fn truncated_container_is_an_io_error() {
    let bytes = vec![0x01, 0x00, 0xFF]; // frame count, then garbage
    let err = SeqReader::new(Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, DecodeError::Io(_)));
}

#[test]
fn negative_palette_chunk_size_is_malformed() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&(-5i32).to_le_bytes());
    let err = SeqReader::new(Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, DecodeError::MalformedPaletteChunk));
}

#[test]
fn absurd_palette_chunk_size_is_malformed() {
    // A corrupt size field must not trigger a giant allocation.
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&1u16.to_le_bytes());
    bytes.extend_from_slice(&i32::MAX.to_le_bytes());
    let err = SeqReader::new(Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, DecodeError::MalformedPaletteChunk));
}
