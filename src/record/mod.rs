// Record grammar for structured log lines.
//
// Two textual shapes describe the same record:
//
//   plain:   2024-01-01 00:00:00,500 101    ERROR fail
//   packed:  500 1 0 fail
//
// - `timestamp`: the two timestamp layouts (plain and compact)
// - `level`: level abbreviation in the packed form
// - `grammar`: field splitting, parsing, and rendering of both shapes

pub mod grammar;
pub mod level;
pub mod timestamp;

use chrono::NaiveDateTime;

pub use grammar::{Line, parse_packed, parse_plain, write_packed, write_plain};
pub use level::{compress_level, expand_level};

/// Longest level token (in characters) the grammar accepts.
pub const MAX_LEVEL_LEN: usize = 5;

/// One structured log line in its plain form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRecord<'a> {
    pub timestamp: NaiveDateTime,
    pub sequence: i64,
    pub level: &'a str,
    /// Everything after the level, verbatim.
    pub message: &'a str,
}

/// The timestamp token of a packed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeField {
    /// A full compact timestamp; resets the baseline.
    Absolute(NaiveDateTime),
    /// Milliseconds relative to the current baseline.
    Relative(i64),
}

/// One structured log line in its packed form.
///
/// `sequence` is the raw number token: an absolute value or a delta,
/// depending on the baseline rules applied by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedRecord<'a> {
    pub time: TimeField,
    pub sequence: i64,
    pub level: &'a str,
    pub message: &'a str,
}
