// Secondary (outer) compression applied to the packed text.
//
// The line transform only removes redundancy between neighbouring lines;
// a general-purpose byte compressor runs afterwards. Gzip is the built-in
// choice (feature-gated behind `gzip`), `None` leaves the packed text as is.

use std::io::{self, Read, Write};

#[cfg(feature = "gzip")]
use flate2::{Compression, read::MultiGzDecoder, write::GzEncoder};

/// Gzip level used when none is given.
pub const DEFAULT_GZIP_LEVEL: u32 = 6;

/// Outer compression around the packed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondaryCompression {
    /// Packed text is written as is.
    None,
    /// Gzip container, level 0-9.
    #[cfg(feature = "gzip")]
    Gzip { level: u32 },
}

impl Default for SecondaryCompression {
    fn default() -> Self {
        #[cfg(feature = "gzip")]
        {
            Self::Gzip {
                level: DEFAULT_GZIP_LEVEL,
            }
        }
        #[cfg(not(feature = "gzip"))]
        {
            Self::None
        }
    }
}

impl SecondaryCompression {
    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "none",
            #[cfg(feature = "gzip")]
            Self::Gzip { .. } => "gzip",
        }
    }

    /// Wrap `inner` so that bytes written are compressed.
    pub fn writer<W: Write>(self, inner: W) -> SecondaryWriter<W> {
        match self {
            Self::None => SecondaryWriter::Plain(inner),
            #[cfg(feature = "gzip")]
            Self::Gzip { level } => {
                SecondaryWriter::Gzip(GzEncoder::new(inner, Compression::new(level.min(9))))
            }
        }
    }

    /// Wrap `inner` so that bytes read are decompressed.
    pub fn reader<R: Read>(self, inner: R) -> SecondaryReader<R> {
        match self {
            Self::None => SecondaryReader::Plain(inner),
            #[cfg(feature = "gzip")]
            Self::Gzip { .. } => SecondaryReader::Gzip(MultiGzDecoder::new(inner)),
        }
    }
}

// ---------------------------------------------------------------------------
// Writer
// ---------------------------------------------------------------------------

/// Compressing writer returned by [`SecondaryCompression::writer`].
///
/// Call [`finish`](Self::finish) when done; dropping a gzip writer without
/// finishing it loses trailer errors.
pub enum SecondaryWriter<W: Write> {
    Plain(W),
    #[cfg(feature = "gzip")]
    Gzip(GzEncoder<W>),
}

impl<W: Write> SecondaryWriter<W> {
    /// Write any trailer and return the inner writer.
    pub fn finish(self) -> io::Result<W> {
        match self {
            Self::Plain(w) => Ok(w),
            #[cfg(feature = "gzip")]
            Self::Gzip(enc) => enc.finish(),
        }
    }
}

impl<W: Write> Write for SecondaryWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Plain(w) => w.write(buf),
            #[cfg(feature = "gzip")]
            Self::Gzip(enc) => enc.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Plain(w) => w.flush(),
            #[cfg(feature = "gzip")]
            Self::Gzip(enc) => enc.flush(),
        }
    }
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// Decompressing reader returned by [`SecondaryCompression::reader`].
pub enum SecondaryReader<R: Read> {
    Plain(R),
    #[cfg(feature = "gzip")]
    Gzip(MultiGzDecoder<R>),
}

impl<R: Read> SecondaryReader<R> {
    pub fn into_inner(self) -> R {
        match self {
            Self::Plain(r) => r,
            #[cfg(feature = "gzip")]
            Self::Gzip(dec) => dec.into_inner(),
        }
    }
}

impl<R: Read> Read for SecondaryReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Plain(r) => r.read(buf),
            #[cfg(feature = "gzip")]
            Self::Gzip(dec) => dec.read(buf),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(secondary: SecondaryCompression, data: &[u8]) -> Vec<u8> {
        let mut w = secondary.writer(Vec::new());
        w.write_all(data).unwrap();
        let compressed = w.finish().unwrap();

        let mut r = secondary.reader(&compressed[..]);
        let mut out = Vec::new();
        r.read_to_end(&mut out).unwrap();
        out
    }

    #[test]
    fn none_is_passthrough() {
        let mut w = SecondaryCompression::None.writer(Vec::new());
        w.write_all(b"abc").unwrap();
        assert_eq!(w.finish().unwrap(), b"abc");
        assert_eq!(roundtrip(SecondaryCompression::None, b"abc"), b"abc");
    }

    #[cfg(feature = "gzip")]
    #[test]
    fn gzip_roundtrip_all_levels() {
        let data: Vec<u8> = b"500 1 1 heartbeat ok\n".repeat(200);
        for level in 0..=9 {
            let secondary = SecondaryCompression::Gzip { level };
            assert_eq!(roundtrip(secondary, &data), data, "level {level}");
        }
    }

    #[cfg(feature = "gzip")]
    #[test]
    fn gzip_shrinks_repetitive_text() {
        let data: Vec<u8> = b"1 1 1 heartbeat ok\n".repeat(1000);
        let mut w = SecondaryCompression::default().writer(Vec::new());
        w.write_all(&data).unwrap();
        let compressed = w.finish().unwrap();
        assert!(compressed.len() < data.len() / 10);
        assert_eq!(&compressed[..2], &[0x1f, 0x8b]);
    }

    #[cfg(feature = "gzip")]
    #[test]
    fn gzip_rejects_plain_text() {
        let mut r = SecondaryCompression::default().reader(&b"not gzip at all"[..]);
        let mut out = Vec::new();
        assert!(r.read_to_end(&mut out).is_err());
    }

    #[cfg(feature = "gzip")]
    #[test]
    fn gzip_empty_stream() {
        assert!(roundtrip(SecondaryCompression::default(), b"").is_empty());
    }
}
