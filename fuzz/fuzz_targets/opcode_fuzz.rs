#![no_main]
use libfuzzer_sys::fuzz_target;
use seqvid::seq::{Canvas, Rect, decoder};

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // First byte splits the input into opcode and literal streams.
    let split = (data[0] as usize).min(data.len() - 1);
    let (opcodes, literals) = data[1..].split_at(split);

    // Arbitrary opcode streams must either apply cleanly or error;
    // writes may never escape the canvas.
    let mut canvas = Canvas::new();
    let _ = decoder::apply_delta(opcodes, literals, &mut canvas, Rect::FULL_SCREEN);

    let _ = decoder::apply_delta(opcodes, literals, &mut canvas, Rect::new(10, 10, 30, 15));
});
