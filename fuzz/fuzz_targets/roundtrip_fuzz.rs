#![no_main]
use libfuzzer_sys::fuzz_target;
use logpacker::compress::{compress_all, decompress_all};

const LEVELS: [&str; 5] = ["INFO", "ERROR", "WARN", "DEBUG", "TRACE"];

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // Build a canonical log from the input: 4 control bytes per line.
    let crlf = data[0] & 1 != 0;
    let ending = if crlf { "\r\n" } else { "\n" };
    let mut ms: i64 = 1_700_000_000_000;
    let mut seq: i64 = 1_000_000_000;
    let mut plain = String::new();

    for chunk in data[1..].chunks(4) {
        let b = |i: usize| chunk.get(i).copied().unwrap_or(0);
        if b(0) % 7 == 0 && !plain.is_empty() {
            plain.push_str("\tat Foo.bar(Foo.java:");
            plain.push_str(&b(1).to_string());
            plain.push(')');
        } else {
            ms += i64::from(i16::from_le_bytes([b(1), b(2)]));
            seq += i64::from(b(3) as i8) * if b(0) & 0x80 != 0 { 50 } else { 1 };
            let Some(ts) = chrono::DateTime::from_timestamp_millis(ms) else {
                return;
            };
            let level = LEVELS[b(0) as usize % LEVELS.len()];
            plain.push_str(&format!(
                "{} {seq:<6} {level:<5} msg {}",
                ts.naive_utc().format("%Y-%m-%d %H:%M:%S,%3f"),
                b(2)
            ));
        }
        plain.push_str(ending);
    }

    let packed = compress_all(plain.as_bytes()).unwrap();
    let restored = decompress_all(&packed).unwrap();
    assert_eq!(restored, plain.as_bytes());
});
