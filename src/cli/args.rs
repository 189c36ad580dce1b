//! Command-line argument parsing for `mgzcat` / `mgunzip`.
//!
//! Flags are declared with clap's derive API in [`Cli`]; [`parse_args_from`]
//! then resolves them against the alias defaults from [`CliInit`] into a
//! [`ParsedArgs`]: one operation mode, a [`Prefs`] value, the input list,
//! and the display level to apply.
//!
//! Combinations clap cannot express return an `Err` whose message begins
//! with `"bad usage: "`. `--help` and `--version` come back as a
//! `clap::Error` inside the `anyhow::Error`; the caller lets clap print them.

use anyhow::anyhow;
use clap::{ArgAction, Parser};

use crate::cli::constants::PROGRAM_NAME;
use crate::cli::init::CliInit;
use crate::cli::op_mode::OpMode;
use crate::config::DISPLAY_LEVEL_DEFAULT;
use crate::decoder::{HeaderCrcPolicy, TailPolicy};
use crate::io::file_io::STDIN_MARK;
use crate::io::prefs::Prefs;

/// Decompress concatenated gzip members as one stream.
#[derive(Debug, Parser)]
#[command(name = PROGRAM_NAME, version = crate::VERSION_STRING)]
pub struct Cli {
    /// Input files; `-` or none reads stdin.
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,

    /// Decompress `name.gz` to `name` instead of writing to stdout.
    #[arg(short = 'd', long)]
    pub decompress: bool,

    /// Write to stdout (overrides -d and the mgunzip alias).
    #[arg(short = 'c', long = "stdout")]
    pub to_stdout: bool,

    /// Output file; requires a single input.
    #[arg(short = 'o', long, value_name = "OUT")]
    pub output: Option<String>,

    /// Overwrite existing output files.
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Remove each source file after it decompressed successfully.
    #[arg(long = "rm")]
    pub remove_source: bool,

    /// Set the output file's mtime from the first member header.
    #[arg(long)]
    pub restore_mtime: bool,

    /// Test integrity; write nothing.
    #[arg(short = 't', long, conflicts_with_all = ["list", "lines"])]
    pub test: bool,

    /// List members: offset, sizes, ratio, name.
    #[arg(short = 'l', long, conflicts_with = "lines")]
    pub list: bool,

    /// Print decoded text line by line; errors name the failing line.
    #[arg(long)]
    pub lines: bool,

    /// Ignore garbage after the last valid member.
    #[arg(long)]
    pub lenient_tail: bool,

    /// Fail members whose header CRC16 does not match.
    #[arg(long, conflicts_with = "warn_header_crc")]
    pub verify_header_crc: bool,

    /// Report header CRC16 mismatches without failing.
    #[arg(long)]
    pub warn_header_crc: bool,

    /// Stop after the first member of each input.
    #[arg(long)]
    pub single_member: bool,

    /// Less output; repeat for silence.
    #[arg(short = 'q', long, action = ArgAction::Count)]
    pub quiet: u8,

    /// More output; repeat for member-level tracing.
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Resolved command line.
#[derive(Debug, Clone)]
pub struct ParsedArgs {
    pub op_mode: OpMode,
    pub prefs: Prefs,
    /// Never empty; stdin is spelled [`STDIN_MARK`].
    pub files: Vec<String>,
    pub output: Option<String>,
    pub display_level: u32,
}

// ── Public API ─────────────────────────────────────────────────────────────────

/// Parse `std::env::args()` using `init` as the starting state.
pub fn parse_args(init: CliInit) -> anyhow::Result<ParsedArgs> {
    let argv: Vec<String> = std::env::args().collect();
    parse_args_from(init, &argv)
}

/// Parse an explicit argument list; `argv[0]` is the program name.
pub fn parse_args_from(init: CliInit, argv: &[String]) -> anyhow::Result<ParsedArgs> {
    let cli = Cli::try_parse_from(argv)?;
    resolve(init, cli)
}

fn resolve(init: CliInit, cli: Cli) -> anyhow::Result<ParsedArgs> {
    let CliInit { mut prefs, op_mode: default_mode } = init;

    let op_mode = if cli.list {
        OpMode::List
    } else if cli.test {
        OpMode::Test
    } else if cli.lines {
        OpMode::Lines
    } else if cli.to_stdout {
        OpMode::Cat
    } else if cli.decompress || cli.output.is_some() {
        OpMode::Decompress
    } else {
        default_mode
    };

    let mut files = cli.files;
    if files.is_empty() {
        files.push(STDIN_MARK.to_owned());
    }

    if cli.output.is_some() {
        if op_mode != OpMode::Decompress {
            return Err(anyhow!("bad usage: -o cannot be combined with -c, -t, -l or --lines"));
        }
        if files.len() != 1 {
            return Err(anyhow!("bad usage: -o requires exactly one input file"));
        }
    }
    if op_mode == OpMode::Decompress && cli.output.is_none() && files.iter().any(|f| f == STDIN_MARK) {
        return Err(anyhow!("bad usage: cannot derive an output name for stdin; use -o or -c"));
    }

    prefs.set_overwrite(cli.force);
    prefs.set_keep_source(!cli.remove_source);
    prefs.set_restore_mtime(cli.restore_mtime);
    prefs.set_test_mode(op_mode == OpMode::Test);
    prefs.set_to_stdout(op_mode.writes_stdout());
    prefs.set_single_member(cli.single_member);
    if cli.lenient_tail {
        prefs.set_tail_policy(TailPolicy::Lenient);
    }
    if cli.verify_header_crc {
        prefs.set_header_crc(HeaderCrcPolicy::Verify);
    } else if cli.warn_header_crc {
        prefs.set_header_crc(HeaderCrcPolicy::Warn);
    }

    let display_level = (DISPLAY_LEVEL_DEFAULT + u32::from(cli.verbose))
        .saturating_sub(u32::from(cli.quiet))
        .min(4);

    Ok(ParsedArgs {
        op_mode,
        prefs,
        files,
        output: cli.output,
        display_level,
    })
}
