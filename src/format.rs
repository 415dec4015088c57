// Input classification: binary vs. text, and the line-ending convention.
//
// Both checks look at a bounded prefix of the stream. The prefix is read
// once and replayed in front of the remaining input, so callers see the
// whole stream from the start even when the source cannot seek (stdin,
// a gzip decoder).

use std::io::{self, Cursor, Read};

/// Number of leading bytes scanned for a NUL byte.
pub const BINARY_PROBE_LEN: usize = 1024;

/// Number of leading bytes scanned for a carriage return.
pub const LINE_ENDING_PROBE_LEN: usize = 2000;

const PROBE_LEN: usize = if BINARY_PROBE_LEN > LINE_ENDING_PROBE_LEN {
    BINARY_PROBE_LEN
} else {
    LINE_ENDING_PROBE_LEN
};

/// A reader that yields the probed prefix followed by the rest of the input.
pub type Replay<R> = io::Chain<Cursor<Vec<u8>>, R>;

// ---------------------------------------------------------------------------
// LineEnding
// ---------------------------------------------------------------------------

/// Line terminator written to the output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_bytes(self) -> &'static [u8] {
        match self {
            Self::Lf => b"\n",
            Self::CrLf => b"\r\n",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "lf",
            Self::CrLf => "crlf",
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Result of probing the head of a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// A NUL byte appeared in the first [`BINARY_PROBE_LEN`] bytes.
    pub binary: bool,
    /// Terminator to use when writing lines.
    pub line_ending: LineEnding,
}

/// True if any of the first [`BINARY_PROBE_LEN`] bytes of `prefix` is NUL.
pub fn is_binary(prefix: &[u8]) -> bool {
    prefix.iter().take(BINARY_PROBE_LEN).any(|&b| b == 0)
}

/// True if any of the first [`LINE_ENDING_PROBE_LEN`] bytes of `prefix` is CR.
pub fn is_crlf(prefix: &[u8]) -> bool {
    prefix.iter().take(LINE_ENDING_PROBE_LEN).any(|&b| b == b'\r')
}

/// Classify a prefix that has already been read.
pub fn classify_prefix(prefix: &[u8]) -> Classification {
    Classification {
        binary: is_binary(prefix),
        line_ending: if is_crlf(prefix) {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        },
    }
}

/// Probe the head of `reader` and hand back a reader positioned at the start.
///
/// Reads at most `max(BINARY_PROBE_LEN, LINE_ENDING_PROBE_LEN)` bytes; a
/// shorter stream is classified on whatever it contains.
pub fn classify<R: Read>(mut reader: R) -> io::Result<(Classification, Replay<R>)> {
    let mut prefix = Vec::with_capacity(PROBE_LEN);
    (&mut reader)
        .take(PROBE_LEN as u64)
        .read_to_end(&mut prefix)?;
    let class = classify_prefix(&prefix);
    Ok((class, Cursor::new(prefix).chain(reader)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nul_byte_marks_binary() {
        assert!(is_binary(b"abc\0def"));
        assert!(!is_binary(b"plain text\n"));
        assert!(!is_binary(b""));
    }

    #[test]
    fn nul_beyond_probe_is_ignored() {
        let mut data = vec![b'a'; BINARY_PROBE_LEN];
        data.push(0);
        assert!(!is_binary(&data));
        data[BINARY_PROBE_LEN - 1] = 0;
        assert!(is_binary(&data));
    }

    #[test]
    fn carriage_return_selects_crlf() {
        assert!(is_crlf(b"line\r\n"));
        assert!(!is_crlf(b"line\n"));

        let mut data = vec![b'x'; LINE_ENDING_PROBE_LEN];
        data.extend_from_slice(b"\r\n");
        assert!(!is_crlf(&data));
    }

    #[test]
    fn classify_replays_the_prefix() {
        let data: Vec<u8> = (0..5000u32).map(|i| b'a' + (i % 26) as u8).collect();
        let (class, mut replay) = classify(&data[..]).unwrap();
        assert!(!class.binary);
        assert_eq!(class.line_ending, LineEnding::Lf);

        let mut all = Vec::new();
        replay.read_to_end(&mut all).unwrap();
        assert_eq!(all, data);
    }

    #[test]
    fn classify_short_and_empty_streams() {
        let (class, mut replay) = classify(&b"a\r\nb"[..]).unwrap();
        assert_eq!(class.line_ending, LineEnding::CrLf);
        let mut all = Vec::new();
        replay.read_to_end(&mut all).unwrap();
        assert_eq!(all, b"a\r\nb");

        let (class, _) = classify(&b""[..]).unwrap();
        assert!(!class.binary);
        assert_eq!(class.line_ending, LineEnding::Lf);
    }
}
