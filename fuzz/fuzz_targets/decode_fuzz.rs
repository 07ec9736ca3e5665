#![no_main]
use libfuzzer_sys::fuzz_target;
use seqvid::session::SeqReader;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Fuzz the container reader with arbitrary bytes.
    // The reader must never panic — only return errors.
    if let Ok(mut reader) = SeqReader::new(Cursor::new(data)) {
        while let Ok(Some(_)) = reader.next_frame() {}
    }
});
