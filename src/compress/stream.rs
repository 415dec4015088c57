// Stream driver shared by the encoder and decoder.
//
// One forward pass over the input, applying the fallback policy uniformly:
//   - binary input (NUL in the probed prefix) is copied unchanged
//   - if the first line is not a record, the whole stream is copied unchanged
//   - later lines that are not records are copied unchanged, one by one
//
// Lines are split on LF. In CRLF mode the CR before each LF is stripped and
// every written line ends in CRLF. A final line without a terminator is
// written without one.

use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};

use crate::format::{self, LineEnding};

use super::Resets;

pub(crate) const BUF_SIZE: usize = 64 * 1024; // 64 KiB

/// One direction of the line transform.
pub(crate) trait LineCodec {
    /// Transform `line` into `out`, or return `None` if it is not a record.
    ///
    /// `out` is left untouched when `None` is returned.
    fn transform(&mut self, line: &str, out: &mut String) -> Option<Resets>;
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// How a stream was handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransformMode {
    /// Copied unchanged because it looked binary.
    Binary,
    /// Copied unchanged because it was empty or its first line is not a record.
    #[default]
    Verbatim,
    /// Transformed line by line.
    Lines,
}

impl TransformMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Verbatim => "verbatim",
            Self::Lines => "lines",
        }
    }
}

/// Statistics returned by `compress()` and `decompress()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformStats {
    pub mode: TransformMode,
    pub line_ending: LineEnding,
    /// Lines handled in `Lines` mode (records plus raw lines).
    pub lines: u64,
    /// Lines transformed as records.
    pub records: u64,
    /// Lines copied unchanged.
    pub raw_lines: u64,
    /// Absolute timestamps written or read, including the first record.
    pub time_resets: u64,
    /// Absolute sequence numbers written or read, including the first record.
    pub sequence_resets: u64,
    pub bytes_in: u64,
    pub bytes_out: u64,
}

impl TransformStats {
    fn count(&mut self, outcome: Option<Resets>) {
        self.lines += 1;
        match outcome {
            Some(resets) => {
                self.records += 1;
                self.time_resets += u64::from(resets.time);
                self.sequence_resets += u64::from(resets.sequence);
            }
            None => self.raw_lines += 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Byte counting adapter
// ---------------------------------------------------------------------------

/// Counts bytes passing through a reader or writer.
pub(crate) struct Counted<T> {
    inner: T,
    count: u64,
}

impl<T> Counted<T> {
    pub(crate) fn new(inner: T) -> Self {
        Self { inner, count: 0 }
    }

    pub(crate) fn count(&self) -> u64 {
        self.count
    }
}

impl<R: Read> Read for Counted<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count += n as u64;
        Ok(n)
    }
}

impl<W: Write> Write for Counted<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.count += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Run `codec` over `input`, writing to `output`. Output is flushed on success.
pub(crate) fn run<C, R, W>(codec: &mut C, input: R, output: W) -> io::Result<TransformStats>
where
    C: LineCodec,
    R: Read,
    W: Write,
{
    let mut input = Counted::new(input);
    let mut output = Counted::new(BufWriter::with_capacity(BUF_SIZE, output));

    let mut stats = transform(codec, &mut input, &mut output)?;
    output.flush()?;

    stats.bytes_in = input.count();
    stats.bytes_out = output.count();
    log::debug!(
        "{} stream ({}): {} lines, {} records, {} raw, {} time resets, {} sequence resets, {} -> {} bytes",
        stats.mode.as_str(),
        stats.line_ending.as_str(),
        stats.lines,
        stats.records,
        stats.raw_lines,
        stats.time_resets,
        stats.sequence_resets,
        stats.bytes_in,
        stats.bytes_out,
    );
    Ok(stats)
}

fn transform<C, R, W>(codec: &mut C, input: R, output: &mut W) -> io::Result<TransformStats>
where
    C: LineCodec,
    R: Read,
    W: Write,
{
    let (class, mut input) = format::classify(input)?;
    let ending = class.line_ending;
    let mut stats = TransformStats {
        line_ending: ending,
        ..Default::default()
    };

    if class.binary {
        log::debug!("NUL byte in stream head, copying verbatim");
        stats.mode = TransformMode::Binary;
        io::copy(&mut input, output)?;
        return Ok(stats);
    }

    let mut reader = BufReader::with_capacity(BUF_SIZE, input);
    let mut raw = Vec::new();
    let mut text = String::new();

    if reader.read_until(b'\n', &mut raw)? == 0 {
        return Ok(stats);
    }

    let (body, terminated) = split_line(&raw, ending);
    let Some(resets) = transform_line(codec, body, &mut text) else {
        log::debug!("first line is not a record, copying verbatim");
        output.write_all(&raw)?;
        io::copy(&mut reader, output)?;
        return Ok(stats);
    };

    stats.mode = TransformMode::Lines;
    stats.count(Some(resets));
    write_line(output, text.as_bytes(), terminated, ending)?;

    loop {
        raw.clear();
        text.clear();
        if reader.read_until(b'\n', &mut raw)? == 0 {
            break;
        }
        let (body, terminated) = split_line(&raw, ending);
        let outcome = transform_line(codec, body, &mut text);
        stats.count(outcome);
        match outcome {
            Some(_) => write_line(output, text.as_bytes(), terminated, ending)?,
            None => {
                log::trace!("line {}: raw", stats.lines);
                write_line(output, body, terminated, ending)?;
            }
        }
    }

    Ok(stats)
}

/// Lines that are not UTF-8 are never records.
fn transform_line<C: LineCodec>(codec: &mut C, body: &[u8], out: &mut String) -> Option<Resets> {
    let line = std::str::from_utf8(body).ok()?;
    codec.transform(line, out)
}

/// Strip the terminator from a line read with `read_until(b'\n')`.
///
/// Returns the line body and whether a terminator was present.
fn split_line(raw: &[u8], ending: LineEnding) -> (&[u8], bool) {
    let Some(body) = raw.strip_suffix(b"\n") else {
        return (raw, false);
    };
    match ending {
        LineEnding::CrLf => (body.strip_suffix(b"\r").unwrap_or(body), true),
        LineEnding::Lf => (body, true),
    }
}

fn write_line<W: Write>(
    output: &mut W,
    body: &[u8],
    terminated: bool,
    ending: LineEnding,
) -> io::Result<()> {
    output.write_all(body)?;
    if terminated {
        output.write_all(ending.as_bytes())?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
