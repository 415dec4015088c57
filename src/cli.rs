// Command-line front end for logpacker.
//
// One flat command: pack by default, `-d` to unpack. Input and output are
// positional and fall back to stdin/stdout, so the tool works both as
// `logpacker [-d] <input> <output>` and inside a pipeline.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, ValueHint};

use crate::compress::TransformStats;
use crate::compress::secondary::{DEFAULT_GZIP_LEVEL, SecondaryCompression};
use crate::compress::stream::BUF_SIZE;
use crate::io::{PackOptions, PackStats, UnpackStats, pack, unpack};

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// Reversible delta packer for structured log files.
#[derive(Parser, Debug)]
#[command(
    name = "logpacker",
    version,
    about = "Reversible delta packer for structured log files"
)]
struct Cli {
    /// Unpack INPUT instead of packing it.
    #[arg(short = 'd', long)]
    decompress: bool,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,

    /// Output stats as JSON to stderr.
    #[arg(long = "json")]
    json_output: bool,

    /// Write output to stdout.
    #[arg(short = 'c', long)]
    stdout: bool,

    /// Gzip level (0-9).
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u32).range(0..=9), default_value_t = DEFAULT_GZIP_LEVEL)]
    level: u32,

    /// Skip the outer gzip pass (pack) or expect plain packed text (unpack).
    #[arg(long = "no-gzip")]
    no_gzip: bool,

    /// Input file (default: stdin).
    #[arg(value_hint = ValueHint::FilePath)]
    input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(value_hint = ValueHint::FilePath)]
    output: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Resolved options (flattened from Cli)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Pack,
    Unpack,
}

impl Command {
    fn name(self) -> &'static str {
        match self {
            Self::Pack => "pack",
            Self::Unpack => "unpack",
        }
    }
}

#[derive(Debug)]
struct Options {
    command: Command,
    use_stdout: bool,
    force: bool,
    quiet: bool,
    verbose: u8,
    level: u32,
    no_gzip: bool,
    input_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
    json_output: bool,
}

fn resolve_options(cli: Cli) -> Options {
    Options {
        command: if cli.decompress {
            Command::Unpack
        } else {
            Command::Pack
        },
        use_stdout: cli.stdout,
        force: cli.force,
        quiet: cli.quiet,
        verbose: cli.verbose.min(2),
        level: cli.level,
        no_gzip: cli.no_gzip,
        input_file: cli.input,
        output_file: cli.output,
        json_output: cli.json_output,
    }
}

#[cfg(any(test, feature = "fuzzing"))]
pub fn fuzz_try_parse_args(args: &[String]) {
    let argv: Vec<String> = std::iter::once("logpacker".to_string())
        .chain(args.iter().cloned())
        .collect();
    if let Ok(cli) = Cli::try_parse_from(argv) {
        let opts = resolve_options(cli);
        let _ = build_pack_options(&opts);
    }
}

// ---------------------------------------------------------------------------
// Build PackOptions from CLI options
// ---------------------------------------------------------------------------

fn build_pack_options(opts: &Options) -> PackOptions {
    let secondary = if opts.no_gzip {
        SecondaryCompression::None
    } else {
        SecondaryCompression::Gzip { level: opts.level }
    };
    PackOptions { secondary }
}

// ---------------------------------------------------------------------------
// Input / output
// ---------------------------------------------------------------------------

fn open_input(opts: &Options) -> Option<Box<dyn Read>> {
    match &opts.input_file {
        Some(path) => match File::open(path) {
            Ok(f) => Some(Box::new(BufReader::with_capacity(BUF_SIZE, f))),
            Err(e) => {
                eprintln!("logpacker: input file: {}: {e}", path.display());
                None
            }
        },
        None => Some(Box::new(BufReader::new(io::stdin()))),
    }
}

fn open_output(opts: &Options) -> Option<Box<dyn Write>> {
    match (opts.use_stdout, &opts.output_file) {
        (true, _) | (_, None) => Some(Box::new(BufWriter::with_capacity(
            BUF_SIZE,
            io::stdout().lock(),
        ))),
        (false, Some(path)) => {
            if path.exists() && !opts.force {
                eprintln!(
                    "logpacker: output file exists, use -f to overwrite: {}",
                    path.display()
                );
                return None;
            }
            match File::create(path) {
                Ok(f) => Some(Box::new(BufWriter::with_capacity(BUF_SIZE, f))),
                Err(e) => {
                    eprintln!("logpacker: output file: {}: {e}", path.display());
                    None
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Reporting
// ---------------------------------------------------------------------------

fn hex(digest: &[u8; 32]) -> String {
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn report_transform(opts: &Options, t: &TransformStats) {
    eprintln!(
        "logpacker: {}: mode: {}, line ending: {}, lines: {}, records: {}, raw lines: {}",
        opts.command.name(),
        t.mode.as_str(),
        t.line_ending.as_str(),
        t.lines,
        t.records,
        t.raw_lines
    );
    if opts.verbose > 1 {
        eprintln!(
            "logpacker: {}: time resets: {}, sequence resets: {}",
            opts.command.name(),
            t.time_resets,
            t.sequence_resets
        );
    }
}

fn transform_json(t: &TransformStats) -> serde_json::Value {
    serde_json::json!({
        "mode": t.mode.as_str(),
        "line_ending": t.line_ending.as_str(),
        "lines": t.lines,
        "records": t.records,
        "raw_lines": t.raw_lines,
        "time_resets": t.time_resets,
        "sequence_resets": t.sequence_resets,
    })
}

// ---------------------------------------------------------------------------
// Pack command
// ---------------------------------------------------------------------------

fn cmd_pack(opts: &Options) -> i32 {
    let pack_opts = build_pack_options(opts);

    let Some(input) = open_input(opts) else {
        return 1;
    };
    let Some(output) = open_output(opts) else {
        return 1;
    };

    let stats: PackStats = match pack(input, output, &pack_opts) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("logpacker: pack: {e}");
            return 1;
        }
    };

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "logpacker: pack: log size: {}, packed size: {}, secondary: {}",
            stats.log_size,
            stats.packed_size,
            pack_opts.secondary.name()
        );
        report_transform(opts, &stats.transform);
        if opts.verbose > 1
            && let Some(digest) = &stats.log_sha256
        {
            eprintln!("logpacker: pack: log sha256: {}", hex(digest));
        }
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": "pack",
            "log_size": stats.log_size,
            "packed_size": stats.packed_size,
            "secondary": pack_opts.secondary.name(),
            "level": opts.level,
            "transform": transform_json(&stats.transform),
            "log_sha256": stats.log_sha256.as_ref().map(hex),
        });
        eprintln!("{json:#}");
    }

    0
}

// ---------------------------------------------------------------------------
// Unpack command
// ---------------------------------------------------------------------------

fn cmd_unpack(opts: &Options) -> i32 {
    let pack_opts = build_pack_options(opts);

    let Some(input) = open_input(opts) else {
        return 1;
    };
    let Some(output) = open_output(opts) else {
        return 1;
    };

    let stats: UnpackStats = match unpack(input, output, &pack_opts) {
        Ok(stats) => stats,
        Err(e) => {
            eprintln!("logpacker: unpack: {e}");
            return 1;
        }
    };

    if opts.verbose > 0 && !opts.quiet {
        eprintln!(
            "logpacker: unpack: packed size: {}, log size: {}, secondary: {}",
            stats.packed_size,
            stats.log_size,
            pack_opts.secondary.name()
        );
        report_transform(opts, &stats.transform);
        if opts.verbose > 1
            && let Some(digest) = &stats.log_sha256
        {
            eprintln!("logpacker: unpack: log sha256: {}", hex(digest));
        }
    }

    if opts.json_output {
        let json = serde_json::json!({
            "command": "unpack",
            "packed_size": stats.packed_size,
            "log_size": stats.log_size,
            "secondary": pack_opts.secondary.name(),
            "transform": transform_json(&stats.transform),
            "log_sha256": stats.log_sha256.as_ref().map(hex),
        });
        eprintln!("{json:#}");
    }

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap and runs the command.
pub fn run() -> ! {
    let cli = Cli::parse();
    let mut opts = resolve_options(cli);

    let default_filter = match opts.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    // -c overrides the output filename.
    if opts.use_stdout
        && let Some(path) = opts.output_file.take()
        && !opts.quiet
    {
        eprintln!(
            "logpacker: warning: -c option overrides output filename: {}",
            path.display()
        );
    }

    let exit_code = match opts.command {
        Command::Pack => cmd_pack(&opts),
        Command::Unpack => cmd_unpack(&opts),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
