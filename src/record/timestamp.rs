// Timestamp layouts.
//
//   plain:   yyyy-MM-dd HH:mm:ss,fff   (split across two fields)
//   compact: yyyyMMddHHmmssfff         (exactly 17 digits)
//
// Both have millisecond resolution. Leap-second values are rejected so that
// every accepted timestamp renders back to the text it was parsed from.

use std::fmt::Write;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

pub const PLAIN_DATE_FORMAT: &str = "%Y-%m-%d";
pub const PLAIN_TIME_FORMAT: &str = "%H:%M:%S,%3f";
pub const PLAIN_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";
pub const COMPACT_FORMAT: &str = "%Y%m%d%H%M%S%3f";

// `9` marks a digit position, anything else is a literal separator.
const PLAIN_DATE_SHAPE: &[u8] = b"9999-99-99";
const PLAIN_TIME_SHAPE: &[u8] = b"99:99:99,999";
const COMPACT_LEN: usize = 17;

/// Parse the `yyyy-MM-dd` and `HH:mm:ss,fff` fields of a plain line.
pub fn parse_plain(date: &str, time: &str) -> Option<NaiveDateTime> {
    if !has_shape(date, PLAIN_DATE_SHAPE) || !has_shape(time, PLAIN_TIME_SHAPE) {
        return None;
    }
    let date = NaiveDate::parse_from_str(date, PLAIN_DATE_FORMAT).ok()?;
    let time = NaiveTime::parse_from_str(time, PLAIN_TIME_FORMAT).ok()?;
    if is_leap(&time) {
        return None;
    }
    Some(date.and_time(time))
}

/// Parse a `yyyyMMddHHmmssfff` token.
pub fn parse_compact(token: &str) -> Option<NaiveDateTime> {
    if token.len() != COMPACT_LEN || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let parsed = NaiveDateTime::parse_from_str(token, COMPACT_FORMAT).ok()?;
    if is_leap(&parsed.time()) {
        return None;
    }
    Some(parsed)
}

pub fn write_plain(out: &mut String, timestamp: &NaiveDateTime) {
    let _ = write!(out, "{}", timestamp.format(PLAIN_FORMAT));
}

pub fn write_compact(out: &mut String, timestamp: &NaiveDateTime) {
    let _ = write!(out, "{}", timestamp.format(COMPACT_FORMAT));
}

/// chrono tolerates signs and padding inside numeric fields, so the exact
/// layout is checked before parsing.
fn has_shape(field: &str, shape: &[u8]) -> bool {
    field.len() == shape.len()
        && field.bytes().zip(shape).all(|(b, &s)| match s {
            b'9' => b.is_ascii_digit(),
            _ => b == s,
        })
}

fn is_leap(time: &NaiveTime) -> bool {
    time.nanosecond() >= 1_000_000_000
}
