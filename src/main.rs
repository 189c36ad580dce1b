//! Binary entry point for the `mgzcat` command-line tool.
//!
//! # Control flow
//!
//! 1. [`detect_alias`] inspects `argv[0]` (`mgunzip` implies decompress to
//!    files).
//! 2. [`parse_args`] processes all flags and builds a [`ParsedArgs`] value.
//! 3. [`run`] dispatches to the I/O layer and returns an exit code.

use std::io::{self, BufRead, BufReader, IsTerminal, Write};

use anyhow::Context;

use multigz::cli::args::{parse_args, ParsedArgs};
use multigz::cli::constants::{welcome_message, PROGRAM_NAME};
use multigz::cli::init::detect_alias;
use multigz::cli::op_mode::OpMode;
use multigz::display::set_display_level;
use multigz::io::file_io::{is_stdin, open_src_file};
use multigz::io::{
    decompress_filename, decompress_multiple_filenames, display_members_info, Prefs, STDIN_MARK,
};
use multigz::MultiGzDecoder;

// ── Line mode ─────────────────────────────────────────────────────────────────

/// Decode each input and print it line by line. Text is expected to be
/// UTF-8; an error names the input and the 1-based line it was reading.
fn print_lines(files: &[String], prefs: &Prefs) -> anyhow::Result<u64> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut total = 0u64;

    for file in files {
        let label = if is_stdin(file) { "stdin" } else { file.as_str() };
        let src = open_src_file(file).with_context(|| format!("{}: cannot open", label))?;
        let decoder = MultiGzDecoder::from_bufread_with_options(src, prefs.decode);
        for (i, line) in BufReader::new(decoder).lines().enumerate() {
            let line = line.with_context(|| format!("{}: line {}", label, i + 1))?;
            writeln!(out, "{}", line)?;
            total += 1;
        }
    }
    out.flush()?;
    Ok(total)
}

// ── Dispatch ──────────────────────────────────────────────────────────────────

/// Execute the operation selected by argument parsing.
///
/// Returns the process exit code (0 = success, 1 = any failure).
fn run(args: ParsedArgs) -> i32 {
    let ParsedArgs { op_mode, prefs, files, output, display_level } = args;
    set_display_level(display_level);
    multigz::displaylevel!(3, "{}", welcome_message());

    if files.iter().any(|f| f == STDIN_MARK) && io::stdin().is_terminal() {
        multigz::displaylevel!(1, "{}: refusing to read from a console\n", PROGRAM_NAME);
        return 1;
    }

    let srcs: Vec<&str> = files.iter().map(|s| s.as_str()).collect();
    let result: anyhow::Result<()> = match op_mode {
        OpMode::List => display_members_info(&srcs, prefs.decode).map_err(Into::into),
        OpMode::Lines => print_lines(&files, &prefs).map(|n| {
            multigz::displaylevel!(4, "{} lines\n", n);
        }),
        OpMode::Decompress if output.is_some() => {
            let dst = output.as_deref().unwrap_or_default();
            decompress_filename(srcs[0], dst, &prefs)
                .map(|_| ())
                .with_context(|| srcs[0].to_owned())
        }
        OpMode::Cat | OpMode::Test | OpMode::Decompress => {
            // Per-file failures are reported as they happen.
            decompress_multiple_filenames(&srcs, &prefs).map(|_| ()).map_err(Into::into)
        }
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            multigz::displaylevel!(1, "{}: {:#}\n", PROGRAM_NAME, e);
            1
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let argv0 = std::env::args().next().unwrap_or_else(|| PROGRAM_NAME.to_owned());
    let init = detect_alias(&argv0);

    let args = match parse_args(init) {
        Ok(a) => a,
        Err(e) => {
            if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
                clap_err.exit();
            }
            eprintln!("{}: {}", PROGRAM_NAME, e);
            std::process::exit(1);
        }
    };

    std::process::exit(run(args));
}
