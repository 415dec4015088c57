// File-level pipeline: line transform plus secondary compression.
//
// `pack()`/`unpack()` work on any Read/Write pair; `pack_file()` and
// `unpack_file()` wrap them with buffered file handling. The packed text
// streams straight into the gzip encoder (and out of the gzip decoder), so
// no temporary file is staged. Optionally computes a streaming SHA-256 of
// the plain log on both sides (feature-gated behind `file-io`), so a round
// trip can be checked by comparing digests.

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

#[cfg(feature = "file-io")]
use sha2::Digest;

use crate::compress::secondary::SecondaryCompression;
use crate::compress::stream::{BUF_SIZE, Counted};
use crate::compress::{TransformStats, decoder, encoder};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for the file pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackOptions {
    /// Compression applied to the packed text.
    pub secondary: SecondaryCompression,
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `pack()`.
#[derive(Debug, Clone)]
pub struct PackStats {
    /// Plain log size in bytes.
    pub log_size: u64,
    /// Packed output size in bytes (after secondary compression).
    pub packed_size: u64,
    /// Line transform details.
    pub transform: TransformStats,
    /// SHA-256 of the plain log (if `file-io` feature is enabled).
    pub log_sha256: Option<[u8; 32]>,
}

/// Statistics returned by `unpack()`.
#[derive(Debug, Clone)]
pub struct UnpackStats {
    /// Packed input size in bytes (before secondary decompression).
    pub packed_size: u64,
    /// Restored log size in bytes.
    pub log_size: u64,
    /// Line transform details.
    pub transform: TransformStats,
    /// SHA-256 of the restored log (if `file-io` feature is enabled).
    pub log_sha256: Option<[u8; 32]>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for the file pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    /// The input file could not be opened.
    #[error("input file: {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    /// The output file could not be created.
    #[error("output file: {}: {source}", path.display())]
    Create { path: PathBuf, source: io::Error },
    /// Read, write, or gzip failure while streaming.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

// ---------------------------------------------------------------------------
// Streams
// ---------------------------------------------------------------------------

/// Encode the plain log read from `input` and write the packed form to `output`.
pub fn pack<R: Read, W: Write>(
    input: R,
    output: W,
    opts: &PackOptions,
) -> Result<PackStats, PackError> {
    let mut sink = opts.secondary.writer(Counted::new(output));

    #[cfg(feature = "file-io")]
    let (transform, log_sha256) = {
        let mut reader = HashingReader::new(input);
        let transform = encoder::compress(&mut reader, &mut sink)?;
        (transform, Some(reader.finalize()))
    };
    #[cfg(not(feature = "file-io"))]
    let (transform, log_sha256) = (encoder::compress(input, &mut sink)?, None);

    let mut counted = sink.finish()?;
    counted.flush()?;

    log::info!(
        "packed {} bytes into {} bytes ({})",
        transform.bytes_in,
        counted.count(),
        opts.secondary.name()
    );

    Ok(PackStats {
        log_size: transform.bytes_in,
        packed_size: counted.count(),
        transform,
        log_sha256,
    })
}

/// Decode the packed form read from `input` and write the plain log to `output`.
pub fn unpack<R: Read, W: Write>(
    input: R,
    output: W,
    opts: &PackOptions,
) -> Result<UnpackStats, PackError> {
    let mut source = opts.secondary.reader(Counted::new(input));

    #[cfg(feature = "file-io")]
    let (transform, log_sha256) = {
        let mut writer = HashingWriter::new(output);
        let transform = decoder::decompress(&mut source, &mut writer)?;
        writer.flush()?;
        (transform, Some(writer.finalize()))
    };
    #[cfg(not(feature = "file-io"))]
    let (transform, log_sha256) = (decoder::decompress(&mut source, output)?, None);

    let packed_size = source.into_inner().count();

    log::info!(
        "unpacked {} bytes into {} bytes ({})",
        packed_size,
        transform.bytes_out,
        opts.secondary.name()
    );

    Ok(UnpackStats {
        packed_size,
        log_size: transform.bytes_out,
        transform,
        log_sha256,
    })
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

/// Pack the log at `input_path` into `output_path`, replacing any existing file.
pub fn pack_file(
    input_path: &Path,
    output_path: &Path,
    opts: &PackOptions,
) -> Result<PackStats, PackError> {
    let (input, mut output) = open_pair(input_path, output_path)?;
    let stats = pack(input, &mut output, opts)?;
    output.flush()?;
    Ok(stats)
}

/// Unpack `input_path` into the log at `output_path`, replacing any existing file.
pub fn unpack_file(
    input_path: &Path,
    output_path: &Path,
    opts: &PackOptions,
) -> Result<UnpackStats, PackError> {
    let (input, mut output) = open_pair(input_path, output_path)?;
    let stats = unpack(input, &mut output, opts)?;
    output.flush()?;
    Ok(stats)
}

fn open_pair(input_path: &Path, output_path: &Path) -> Result<(File, BufWriter<File>), PackError> {
    let input = File::open(input_path).map_err(|source| PackError::Open {
        path: input_path.to_path_buf(),
        source,
    })?;
    let output = File::create(output_path).map_err(|source| PackError::Create {
        path: output_path.to_path_buf(),
        source,
    })?;
    Ok((input, BufWriter::with_capacity(BUF_SIZE, output)))
}

// ---------------------------------------------------------------------------
// Hashing adapters (used with file-io feature)
// ---------------------------------------------------------------------------

#[cfg(feature = "file-io")]
struct HashingReader<R: Read> {
    inner: R,
    hasher: sha2::Sha256,
}

#[cfg(feature = "file-io")]
impl<R: Read> HashingReader<R> {
    fn new(inner: R) -> Self {
        Self {
            inner,
            hasher: sha2::Sha256::new(),
        }
    }

    fn finalize(self) -> [u8; 32] {
        self.hasher.finalize().into()
    }
}

#[cfg(feature = "file-io")]
impl<R: Read> Read for HashingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }
}

#[cfg(feature = "file-io")]
struct HashingWriter<W: Write> {
    inner: W,
    hasher: sha2::Sha256,
}

#[cfg(feature = "file-io")]
impl<W: Write> HashingWriter<W> {
    fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: sha2::Sha256::new(),
        }
    }

    fn finalize(self) -> [u8; 32] {
        self.hasher.finalize().into()
    }
}

#[cfg(feature = "file-io")]
impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
