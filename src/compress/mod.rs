// Delta coding of structured log streams.
//
// This module turns plain log lines into packed lines and back:
//
// - `encoder`: LineEncoder, plain lines → packed lines, `compress()`
// - `decoder`: LineDecoder, packed lines → canonical plain lines, `decompress()`
// - `stream`: Stream driver shared by both directions (fallback policy, stats)
// - `secondary`: Outer byte compression applied after the line transform

pub mod decoder;
pub mod encoder;
pub mod secondary;
pub mod stream;

use chrono::NaiveDateTime;

pub use decoder::{LineDecoder, decompress, decompress_all};
pub use encoder::{LineEncoder, compress, compress_all};
pub use secondary::SecondaryCompression;
pub use stream::{TransformMode, TransformStats};

/// Largest time delta (ms) written as a delta; anything above is absolute.
pub const MAX_TIME_DELTA_MS: i64 = 999;

/// Largest sequence delta written as a delta; anything above is absolute.
///
/// The decoder uses the same bound to tell an absolute sequence number from
/// a delta.
pub const MAX_SEQUENCE_DELTA: i64 = 999;

/// The last absolute timestamp and sequence number deltas are taken against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Baseline {
    pub time: NaiveDateTime,
    pub sequence: i64,
}

/// Which baseline fields a line reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resets {
    pub time: bool,
    pub sequence: bool,
}

impl Resets {
    /// The first record of a stream seeds both fields.
    pub const SEED: Self = Self {
        time: true,
        sequence: true,
    };
}
