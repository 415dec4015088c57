// Packed → plain line decoder.
//
// LineDecoder mirrors the encoder's baseline:
//   - the first line must carry an absolute timestamp; it seeds the baseline
//   - an absolute timestamp replaces the baseline time, a delta is added to it
//   - a sequence token above MAX_SEQUENCE_DELTA is absolute and replaces the
//     baseline sequence, anything else is added to it
//   - output is the canonical plain form (sequence padded to 6, level to 5)

use std::io::{self, Read, Write};

use chrono::TimeDelta;

use crate::record::{self, Line, LogRecord, PackedRecord, TimeField};

use super::stream::{self, LineCodec, TransformStats};
use super::{Baseline, MAX_SEQUENCE_DELTA, Resets};

// ---------------------------------------------------------------------------
// LineDecoder
// ---------------------------------------------------------------------------

/// Decodes packed lines back into canonical plain lines.
#[derive(Debug, Clone, Default)]
pub struct LineDecoder {
    baseline: Option<Baseline>,
}

impl LineDecoder {
    /// Create a decoder for a new stream; the first line must be absolute.
    pub fn new() -> Self {
        Self { baseline: None }
    }

    /// Create a decoder that continues from a known baseline.
    pub fn with_baseline(baseline: Baseline) -> Self {
        Self {
            baseline: Some(baseline),
        }
    }

    pub fn baseline(&self) -> Option<Baseline> {
        self.baseline
    }

    /// Parse and decode one packed line. Returns `None` (and writes nothing)
    /// if the line is not a record.
    pub fn decode_line(&mut self, line: &str, out: &mut String) -> Option<Resets> {
        match record::parse_packed(line) {
            Line::Record(rec) => self.decode_record(&rec, out),
            Line::Raw(_) => None,
        }
    }

    /// Decode one packed record, appending the plain line to `out`.
    ///
    /// Returns `None` without touching the baseline when the record cannot be
    /// resolved: a relative timestamp with no baseline yet, or a delta that
    /// leaves the representable date range.
    pub fn decode_record(&mut self, rec: &PackedRecord<'_>, out: &mut String) -> Option<Resets> {
        let level = record::expand_level(rec.level);

        let Some(mut baseline) = self.baseline else {
            let TimeField::Absolute(time) = rec.time else {
                return None;
            };
            self.baseline = Some(Baseline {
                time,
                sequence: rec.sequence,
            });
            record::write_plain(
                out,
                &LogRecord {
                    timestamp: time,
                    sequence: rec.sequence,
                    level,
                    message: rec.message,
                },
            );
            return Some(Resets::SEED);
        };

        let mut resets = Resets::default();

        let timestamp = match rec.time {
            TimeField::Absolute(time) => {
                baseline.time = time;
                resets.time = true;
                time
            }
            TimeField::Relative(delta) => baseline
                .time
                .checked_add_signed(TimeDelta::try_milliseconds(delta)?)?,
        };

        let sequence = if rec.sequence > MAX_SEQUENCE_DELTA {
            baseline.sequence = rec.sequence;
            resets.sequence = true;
            rec.sequence
        } else {
            baseline.sequence.wrapping_add(rec.sequence)
        };

        self.baseline = Some(baseline);
        record::write_plain(
            out,
            &LogRecord {
                timestamp,
                sequence,
                level,
                message: rec.message,
            },
        );
        Some(resets)
    }
}

impl LineCodec for LineDecoder {
    fn transform(&mut self, line: &str, out: &mut String) -> Option<Resets> {
        self.decode_line(line, out)
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Decode a packed log stream back into plain lines.
///
/// Binary input, and input whose first line is not an absolute packed
/// record, is copied unchanged. Only I/O errors are returned.
pub fn decompress<R: Read, W: Write>(input: R, output: W) -> io::Result<TransformStats> {
    stream::run(&mut LineDecoder::new(), input, output)
}

/// Decode an in-memory packed log.
pub fn decompress_all(input: &[u8]) -> io::Result<Vec<u8>> {
    let mut output = Vec::with_capacity(input.len() * 2);
    decompress(input, &mut output)?;
    Ok(output)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compress::TransformMode;
    use crate::record::timestamp::PLAIN_FORMAT;
    use chrono::NaiveDateTime;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, PLAIN_FORMAT).unwrap()
    }

    fn decode_lines(lines: &[&str]) -> Vec<String> {
        let mut dec = LineDecoder::new();
        lines
            .iter()
            .map(|line| {
                let mut out = String::new();
                match dec.decode_line(line, &mut out) {
                    Some(_) => out,
                    None => line.to_string(),
                }
            })
            .collect()
    }

    #[test]
    fn scenario_decodes_to_canonical_lines() {
        let out = decode_lines(&["20240101000000000 100 1 start", "500 1 0 fail"]);
        assert_eq!(
            out,
            [
                "2024-01-01 00:00:00,000 100    INFO  start",
                "2024-01-01 00:00:00,500 101    ERROR fail",
            ]
        );
    }

    #[test]
    fn first_line_must_be_absolute() {
        let mut dec = LineDecoder::new();
        let mut out = String::new();
        assert!(dec.decode_line("500 1 0 fail", &mut out).is_none());
        assert!(out.is_empty());
        assert!(dec.baseline().is_none());
    }

    #[test]
    fn absolute_timestamp_resets_baseline() {
        let mut dec = LineDecoder::new();
        let mut out = String::new();
        dec.decode_line("20240101000000000 100 1 a", &mut out);
        out.clear();
        let resets = dec
            .decode_line("20240101000005000 3 1 b", &mut out)
            .unwrap();
        assert!(resets.time);
        assert!(!resets.sequence);
        assert_eq!(out, "2024-01-01 00:00:05,000 103    INFO  b");

        out.clear();
        dec.decode_line("20 1 1 c", &mut out);
        assert_eq!(out, "2024-01-01 00:00:05,020 101    INFO  c");
    }

    #[test]
    fn large_sequence_token_is_absolute() {
        let out = decode_lines(&[
            "20240101000000000 10 1 a",
            "5 1000 1 b",
            "6 7 1 c",
            "7 -3 WARN d",
        ]);
        assert_eq!(out[1], "2024-01-01 00:00:00,005 1000   INFO  b");
        assert_eq!(out[2], "2024-01-01 00:00:00,006 1007   INFO  c");
        assert_eq!(out[3], "2024-01-01 00:00:00,007 997    WARN  d");
    }

    #[test]
    fn out_of_range_delta_is_raw() {
        let mut dec = LineDecoder::with_baseline(Baseline {
            time: ts("2024-01-01 00:00:00,000"),
            sequence: 0,
        });
        let before = dec.baseline();
        let mut out = String::new();
        assert!(
            dec.decode_line("9223372036854775807 1 1 far", &mut out)
                .is_none()
        );
        assert!(out.is_empty());
        assert_eq!(dec.baseline(), before);
    }

    #[test]
    fn decompress_stream_keeps_raw_lines() {
        let input = b"20240101000000000 100 1 start\r\n\
                      \tat Foo.bar(Foo.java:1)\r\n\
                      500 1 0 fail";
        let mut out = Vec::new();
        let stats = decompress(&input[..], &mut out).unwrap();
        assert_eq!(
            out,
            b"2024-01-01 00:00:00,000 100    INFO  start\r\n\
              \tat Foo.bar(Foo.java:1)\r\n\
              2024-01-01 00:00:00,500 101    ERROR fail"
        );
        assert_eq!(stats.mode, TransformMode::Lines);
        assert_eq!(stats.raw_lines, 1);
    }

    #[test]
    fn decompress_all_falls_back_on_relative_head() {
        let input = b"500 1 0 fail\n20240101000000000 100 1 start\n";
        assert_eq!(decompress_all(input).unwrap(), input);
    }
}
