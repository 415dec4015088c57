// Parsing and rendering of plain and packed lines.
//
// Fields are separated by single spaces. Runs of spaces collapse, leading
// spaces are skipped, and the last field takes the remainder of the line
// (internal and trailing spaces included). A line that does not fit the
// grammar comes back as `Line::Raw` and is carried through untouched.

use std::fmt::Write;

use super::{LogRecord, MAX_LEVEL_LEN, PackedRecord, TimeField, timestamp};

const PLAIN_FIELDS: usize = 5;
const PACKED_FIELDS: usize = 4;

const SEQUENCE_WIDTH: usize = 6;
const LEVEL_WIDTH: usize = 5;

/// Outcome of parsing one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a, T> {
    Record(T),
    Raw(&'a str),
}

impl<T> Line<'_, T> {
    pub fn record(self) -> Option<T> {
        match self {
            Self::Record(r) => Some(r),
            Self::Raw(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Field splitting
// ---------------------------------------------------------------------------

/// Split `line` into exactly `N` space-separated fields, the last one
/// taking the rest of the line. Returns `None` when fewer fields exist.
fn split_fields<const N: usize>(line: &str) -> Option<[&str; N]> {
    let mut fields = [""; N];
    let mut rest = line;
    for (i, field) in fields.iter_mut().enumerate() {
        rest = rest.trim_start_matches(' ');
        if rest.is_empty() {
            return None;
        }
        if i + 1 == N {
            *field = rest;
            break;
        }
        let end = rest.find(' ')?;
        *field = &rest[..end];
        rest = &rest[end..];
    }
    Some(fields)
}

fn level_fits(level: &str) -> bool {
    level.chars().count() <= MAX_LEVEL_LEN
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a plain log line: `date time number level message`.
pub fn parse_plain(line: &str) -> Line<'_, LogRecord<'_>> {
    let Some([date, time, number, level, message]) = split_fields::<PLAIN_FIELDS>(line) else {
        return Line::Raw(line);
    };
    let (Some(timestamp), Ok(sequence)) = (timestamp::parse_plain(date, time), number.parse())
    else {
        return Line::Raw(line);
    };
    if !level_fits(level) {
        return Line::Raw(line);
    }
    Line::Record(LogRecord {
        timestamp,
        sequence,
        level,
        message,
    })
}

/// Parse a packed line: `time-or-delta number-or-delta level message`.
///
/// The first token is tried as a compact timestamp before it is tried as a
/// millisecond delta.
pub fn parse_packed(line: &str) -> Line<'_, PackedRecord<'_>> {
    let Some([time, number, level, message]) = split_fields::<PACKED_FIELDS>(line) else {
        return Line::Raw(line);
    };
    let Ok(sequence) = number.parse() else {
        return Line::Raw(line);
    };
    if !level_fits(level) {
        return Line::Raw(line);
    }
    let time = match timestamp::parse_compact(time) {
        Some(t) => TimeField::Absolute(t),
        None => match time.parse() {
            Ok(delta) => TimeField::Relative(delta),
            Err(_) => return Line::Raw(line),
        },
    };
    Line::Record(PackedRecord {
        time,
        sequence,
        level,
        message,
    })
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the canonical plain form: sequence padded to 6, level to 5.
pub fn write_plain(out: &mut String, record: &LogRecord<'_>) {
    timestamp::write_plain(out, &record.timestamp);
    let _ = write!(
        out,
        " {:<seq_w$} {:<lvl_w$} {}",
        record.sequence,
        record.level,
        record.message,
        seq_w = SEQUENCE_WIDTH,
        lvl_w = LEVEL_WIDTH,
    );
}

/// Render the packed form. The level is written as given; abbreviation is
/// the encoder's job (see [`super::compress_level`]).
pub fn write_packed(out: &mut String, record: &PackedRecord<'_>) {
    match record.time {
        TimeField::Absolute(t) => timestamp::write_compact(out, &t),
        TimeField::Relative(delta) => {
            let _ = write!(out, "{delta}");
        }
    }
    let _ = write!(out, " {} {} {}", record.sequence, record.level, record.message);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
