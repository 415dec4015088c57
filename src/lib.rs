//! Logpacker: reversible delta packing for structured log files.
//!
//! Lines of the form `<date> <time> <number> <level> <message>` are rewritten
//! so that timestamps and sequence numbers are stored as small deltas against
//! the last absolute value, and the result is gzipped. Anything that does not
//! fit the grammar passes through untouched.
//!
//! The crate provides:
//! - Input classification (`format`)
//! - The record grammar for plain and packed lines (`record`)
//! - The line encoder/decoder and outer compression (`compress`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use logpacker::compress::{compress_all, decompress_all};
//!
//! let log = b"2024-01-01 00:00:00,000 100    INFO  start\n\
//!             2024-01-01 00:00:00,500 101    ERROR fail\n";
//!
//! let packed = compress_all(log).unwrap();
//! assert_eq!(packed, b"20240101000000000 100 1 start\n500 1 0 fail\n");
//! assert_eq!(decompress_all(&packed).unwrap(), log);
//! ```

pub mod compress;
pub mod format;
pub mod io;
pub mod record;

#[cfg(feature = "cli")]
pub mod cli;

pub use compress::{compress, decompress};
