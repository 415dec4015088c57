#![no_main]
use libfuzzer_sys::fuzz_target;
use logpacker::compress;
use logpacker::io::{PackOptions, unpack};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must never panic, only pass through or fail with an I/O error.
    let _ = compress::decompress_all(data);
    let _ = compress::compress_all(data);

    // Also through the gzip layer.
    let mut out = Vec::new();
    let _ = unpack(data, &mut out, &PackOptions::default());
});
