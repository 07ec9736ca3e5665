#![no_main]
use libfuzzer_sys::fuzz_target;
use seqvid::seq::{Canvas, Rect, SCREEN_HEIGHT, SCREEN_WIDTH, decoder, encoder};

fuzz_target!(|data: &[u8]| {
    if data.len() < 5 {
        return;
    }

    // Derive a region from the first four bytes.
    let left = (data[0] as u16) % (SCREEN_WIDTH as u16);
    let top = (data[1] as u16) % (SCREEN_HEIGHT as u16);
    let width = 1 + (data[2] as u16) % (SCREEN_WIDTH as u16 - left);
    let height = 1 + (data[3] as u16) % (SCREEN_HEIGHT as u16 - top);
    let rect = Rect::from_frame(left, top, width, height);

    // Fill the previous canvas and the frame pixels from the remainder.
    let payload = &data[4..];
    let mut previous = Canvas::new();
    for (i, p) in previous.pixels_mut().iter_mut().enumerate() {
        *p = payload[i % payload.len()];
    }
    let pixels: Vec<u8> = (0..rect.width() * rect.height())
        .map(|i| payload[i.wrapping_mul(7) % payload.len()])
        .collect();

    // Round-trip law: decoding the encoded stream reproduces the pixels.
    let (opcodes, literals) = encoder::encode_delta(&previous, rect, &pixels).unwrap();
    let mut canvas = previous.clone();
    decoder::apply_delta(&opcodes, &literals, &mut canvas, rect).unwrap();
    assert_eq!(canvas.copy_rect(rect), pixels);
});
