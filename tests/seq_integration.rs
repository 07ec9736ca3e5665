// End-to-end container tests: write a sequence, read it back, compare
// canvas states frame by frame.

use std::io::Cursor;

use seqvid::seq::{
    Canvas, Compression, EncodeOptions, FrameKind, Palette, Rect, SCREEN_PIXELS, SCREEN_WIDTH,
    decoder,
};
use seqvid::session::{SeqReader, SeqWriter};

fn solid(value: u8) -> Vec<u8> {
    vec![value; SCREEN_PIXELS]
}

fn test_palette() -> Palette {
    let mut palette = Palette::new();
    for i in 0..=254u8 {
        palette.set(i, i, 255 - i, i.wrapping_mul(3));
    }
    palette
}

#[test]
fn two_frame_sequence_with_run_length_delta() {
    // Frame 0: raw, full screen, solid 7. Frame 1: a sparse 20x5 window
    // at (10, 10) whose corners pin the changed bounding box; enough of
    // the window is unchanged for run-length to beat raw.
    let frame0 = solid(7);
    let mut frame1 = frame0.clone();
    for &(x, y) in &[(10, 10), (29, 10), (10, 14), (29, 14), (20, 12)] {
        frame1[y * SCREEN_WIDTH + x] = 3;
    }

    let options = EncodeOptions {
        compression: Compression::RunLength,
        ..Default::default()
    };
    let mut writer =
        SeqWriter::with_options(Cursor::new(Vec::new()), &test_palette(), options).unwrap();
    writer.add_frame(&frame0).unwrap();
    writer.add_frame(&frame1).unwrap();
    assert_eq!(writer.raw_frames(), 1);
    assert_eq!(writer.rle_frames(), 1);
    let bytes = writer.finish().unwrap().into_inner();

    let mut reader = SeqReader::new(Cursor::new(bytes)).unwrap();
    assert_eq!(reader.frame_count(), 2);

    let canvas = reader.next_frame().unwrap().unwrap();
    assert_eq!(canvas.pixels(), &frame0[..]);
    let header = reader.last_header().unwrap();
    assert_eq!(header.kind, FrameKind::Raw);
    assert_eq!((header.width, header.height), (320, 200));

    let canvas = reader.next_frame().unwrap().unwrap();
    assert_eq!(canvas.pixels(), &frame1[..]);
    let header = reader.last_header().unwrap();
    assert_eq!(header.kind, FrameKind::RunLength);
    assert_eq!((header.left, header.top), (10, 10));
    assert_eq!((header.width, header.height), (20, 5));

    assert!(reader.next_frame().unwrap().is_none());
}

#[test]
fn full_screen_raw_frame_replaces_any_canvas() {
    let mut canvas = Canvas::new();
    for (i, p) in canvas.pixels_mut().iter_mut().enumerate() {
        *p = i as u8;
    }
    let replacement = solid(42);
    decoder::apply_raw(&replacement, &mut canvas, Rect::FULL_SCREEN).unwrap();
    assert_eq!(canvas.pixels(), &replacement[..]);
}

#[test]
fn palette_survives_the_container() {
    let palette = test_palette();
    let mut writer = SeqWriter::new(Cursor::new(Vec::new()), &palette).unwrap();
    writer.add_frame(&solid(0)).unwrap();
    let bytes = writer.finish().unwrap().into_inner();

    let reader = SeqReader::new(Cursor::new(bytes)).unwrap();
    for i in 0..=254u8 {
        assert_eq!(reader.palette().rgb(i), palette.rgb(i));
    }
    // Entry 255 cannot round-trip through the palette chunk.
    assert_eq!(reader.palette().rgb(255), [0, 0, 0]);
}

#[test]
fn long_animation_round_trips_with_both_codecs() {
    // A moving block over a static background, the shape of input the
    // delta path is meant for.
    let mut frames = Vec::new();
    let background = solid(1);
    for step in 0..12usize {
        let mut frame = background.clone();
        let x0 = 8 * step;
        for y in 50..70 {
            for x in x0..x0 + 16 {
                frame[y * SCREEN_WIDTH + x] = 200;
            }
        }
        frames.push(frame);
    }

    for compression in [Compression::None, Compression::RunLength] {
        let options = EncodeOptions {
            compression,
            ..Default::default()
        };
        let mut writer =
            SeqWriter::with_options(Cursor::new(Vec::new()), &test_palette(), options).unwrap();
        for frame in &frames {
            writer.add_frame(frame).unwrap();
        }
        let bytes = writer.finish().unwrap().into_inner();

        let mut reader = SeqReader::new(Cursor::new(bytes)).unwrap();
        for expected in &frames {
            let canvas = reader.next_frame().unwrap().unwrap();
            assert_eq!(canvas.pixels(), &expected[..]);
        }
        assert!(reader.next_frame().unwrap().is_none());
    }
}

#[test]
fn random_noise_frames_round_trip() {
    // Worst case for the differencer and the run-length fallback: noise
    // touches nearly every pixel, so frames degrade to full-screen raw.
    use rand::{Rng, SeedableRng, rngs::StdRng};
    let mut rng = StdRng::seed_from_u64(0xD1CE);
    let frames: Vec<Vec<u8>> = (0..3)
        .map(|_| (0..SCREEN_PIXELS).map(|_| rng.random()).collect())
        .collect();

    let options = EncodeOptions {
        compression: Compression::RunLength,
        ..Default::default()
    };
    let mut writer =
        SeqWriter::with_options(Cursor::new(Vec::new()), &test_palette(), options).unwrap();
    for frame in &frames {
        writer.add_frame(frame).unwrap();
    }
    let bytes = writer.finish().unwrap().into_inner();

    let mut reader = SeqReader::new(Cursor::new(bytes)).unwrap();
    for expected in &frames {
        let canvas = reader.next_frame().unwrap().unwrap();
        assert_eq!(canvas.pixels(), &expected[..]);
    }
}

#[test]
fn run_length_output_is_smaller_for_sparse_motion() {
    let background = solid(1);
    let mut moved = background.clone();
    for y in 100..110 {
        for x in 160..170 {
            moved[y * SCREEN_WIDTH + x] = 9;
        }
    }
    let frames = [background, moved];

    let mut sizes = Vec::new();
    for compression in [Compression::None, Compression::RunLength] {
        let options = EncodeOptions {
            compression,
            ..Default::default()
        };
        let mut writer =
            SeqWriter::with_options(Cursor::new(Vec::new()), &test_palette(), options).unwrap();
        for frame in &frames {
            writer.add_frame(frame).unwrap();
        }
        sizes.push(writer.finish().unwrap().into_inner().len());
    }
    // Frame 1 is a 10x10 block of solid change: raw stores 100 bytes,
    // run-length stores a CopyRows opcode plus the same 100 literals, so
    // it falls back to raw and the files match. Sparse change is where
    // run-length wins; verify with a dotted frame instead.
    assert!(sizes[1] <= sizes[0]);

    let mut dotted = solid(1);
    for i in (0..SCREEN_PIXELS).step_by(997) {
        dotted[i] = 5;
    }
    let frames = [solid(1), dotted];
    let mut sizes = Vec::new();
    for compression in [Compression::None, Compression::RunLength] {
        let options = EncodeOptions {
            compression,
            ..Default::default()
        };
        let mut writer =
            SeqWriter::with_options(Cursor::new(Vec::new()), &test_palette(), options).unwrap();
        for frame in &frames {
            writer.add_frame(frame).unwrap();
        }
        sizes.push(writer.finish().unwrap().into_inner().len());
    }
    assert!(sizes[1] < sizes[0], "rle={} raw={}", sizes[1], sizes[0]);
}

#[cfg(feature = "file-io")]
mod file_io {
    use super::*;
    use seqvid::io::{read_seq, write_seq};

    #[test]
    fn whole_file_round_trip_with_stats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anim.seq");

        let mut frames = vec![solid(7)];
        let mut second = solid(7);
        second[123] = 9;
        frames.push(second.clone());

        let options = EncodeOptions {
            compression: Compression::RunLength,
            ..Default::default()
        };
        let stats = write_seq(&path, &test_palette(), &frames, options).unwrap();
        assert_eq!(stats.frames, 2);
        assert_eq!(stats.raw_frames + stats.rle_frames, 2);
        assert_eq!(stats.output_size, std::fs::metadata(&path).unwrap().len());
        assert!(stats.output_sha256.is_some());

        let mut last = Vec::new();
        let decode_stats = read_seq(&path, |_n, canvas, _palette| {
            last = canvas.pixels().to_vec();
        })
        .unwrap();
        assert_eq!(decode_stats.frames, 2);
        assert_eq!(decode_stats.input_size, stats.output_size);
        assert_eq!(last, second);
    }
}
