// Plain → packed line encoder.
//
// LineEncoder keeps the rolling baseline for one stream:
//   - the first record is written fully absolute and seeds the baseline
//   - later records are written as deltas from the baseline unless a delta
//     exceeds its bound, in which case that field is written absolute and
//     becomes the new baseline
//   - negative deltas never reset the baseline
//   - lines that are not records do not touch the baseline

use std::io::{self, Read, Write};

use crate::record::{self, Line, LogRecord, PackedRecord, TimeField};

use super::stream::{self, LineCodec, TransformStats};
use super::{Baseline, MAX_SEQUENCE_DELTA, MAX_TIME_DELTA_MS, Resets};

// ---------------------------------------------------------------------------
// LineEncoder
// ---------------------------------------------------------------------------

/// Encodes plain records into packed lines against a rolling baseline.
///
/// # Example
/// ```
/// use logpacker::compress::LineEncoder;
///
/// let mut enc = LineEncoder::new();
/// let mut out = String::new();
/// enc.encode_line("2024-01-01 00:00:00,000 100    INFO  start", &mut out).unwrap();
/// assert_eq!(out, "20240101000000000 100 1 start");
///
/// out.clear();
/// enc.encode_line("2024-01-01 00:00:00,500 101    ERROR fail", &mut out).unwrap();
/// assert_eq!(out, "500 1 0 fail");
/// ```
#[derive(Debug, Clone, Default)]
pub struct LineEncoder {
    baseline: Option<Baseline>,
}

impl LineEncoder {
    /// Create an encoder for a new stream; the first record seeds the baseline.
    pub fn new() -> Self {
        Self { baseline: None }
    }

    /// Create an encoder that continues from a known baseline.
    pub fn with_baseline(baseline: Baseline) -> Self {
        Self {
            baseline: Some(baseline),
        }
    }

    pub fn baseline(&self) -> Option<Baseline> {
        self.baseline
    }

    /// Parse and encode one plain line. Returns `None` (and writes nothing)
    /// if the line is not a record.
    pub fn encode_line(&mut self, line: &str, out: &mut String) -> Option<Resets> {
        match record::parse_plain(line) {
            Line::Record(rec) => Some(self.encode_record(&rec, out)),
            Line::Raw(_) => None,
        }
    }

    /// Encode one record, appending the packed line to `out`.
    pub fn encode_record(&mut self, rec: &LogRecord<'_>, out: &mut String) -> Resets {
        let level = record::compress_level(rec.level);

        let Some(mut baseline) = self.baseline else {
            self.baseline = Some(Baseline {
                time: rec.timestamp,
                sequence: rec.sequence,
            });
            record::write_packed(
                out,
                &PackedRecord {
                    time: TimeField::Absolute(rec.timestamp),
                    sequence: rec.sequence,
                    level,
                    message: rec.message,
                },
            );
            return Resets::SEED;
        };

        let mut resets = Resets::default();

        let time_delta = rec
            .timestamp
            .signed_duration_since(baseline.time)
            .num_milliseconds();
        let time = if time_delta > MAX_TIME_DELTA_MS {
            baseline.time = rec.timestamp;
            resets.time = true;
            TimeField::Absolute(rec.timestamp)
        } else {
            TimeField::Relative(time_delta)
        };

        let sequence_delta = rec.sequence.wrapping_sub(baseline.sequence);
        let sequence = if sequence_delta > MAX_SEQUENCE_DELTA {
            baseline.sequence = rec.sequence;
            resets.sequence = true;
            rec.sequence
        } else {
            sequence_delta
        };

        self.baseline = Some(baseline);
        record::write_packed(
            out,
            &PackedRecord {
                time,
                sequence,
                level,
                message: rec.message,
            },
        );
        resets
    }
}

impl LineCodec for LineEncoder {
    fn transform(&mut self, line: &str, out: &mut String) -> Option<Resets> {
        self.encode_line(line, out)
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Encode a plain log stream into its packed form.
///
/// Binary input, and input whose first line is not a record, is copied
/// unchanged. Only I/O errors are returned.
pub fn compress<R: Read, W: Write>(input: R, output: W) -> io::Result<TransformStats> {
    stream::run(&mut LineEncoder::new(), input, output)
}

/// Encode an in-memory log.
pub fn compress_all(input: &[u8]) -> io::Result<Vec<u8>> {
    let mut output = Vec::with_capacity(input.len() / 2);
    compress(input, &mut output)?;
    Ok(output)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
