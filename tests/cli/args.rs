// Integration tests for src/cli/args.rs: flag resolution through the public API.

use multigz::cli::args::{parse_args_from, ParsedArgs};
use multigz::cli::init::detect_alias;
use multigz::cli::op_mode::OpMode;
use multigz::io::STDIN_MARK;
use multigz::{HeaderCrcPolicy, TailPolicy};

fn parse(exe: &str, args: &[&str]) -> anyhow::Result<ParsedArgs> {
    let argv: Vec<String> = std::iter::once(exe)
        .chain(args.iter().copied())
        .map(String::from)
        .collect();
    parse_args_from(detect_alias(exe), &argv)
}

#[test]
fn cat_is_the_default() {
    let p = parse("mgzcat", &["a.gz", "b.gz"]).unwrap();
    assert_eq!(p.op_mode, OpMode::Cat);
    assert!(p.prefs.to_stdout);
    assert!(p.prefs.keep_source);
    assert_eq!(p.files.len(), 2);
}

#[test]
fn full_decompress_command() {
    let p = parse(
        "mgzcat",
        &["-d", "-f", "--rm", "--restore-mtime", "--lenient-tail", "--single-member", "x.gz"],
    )
    .unwrap();
    assert_eq!(p.op_mode, OpMode::Decompress);
    assert!(p.prefs.overwrite && !p.prefs.keep_source && p.prefs.restore_mtime);
    assert_eq!(p.prefs.decode.tail_policy, TailPolicy::Lenient);
    assert!(p.prefs.decode.single_member);
    assert_eq!(p.prefs.decode.header_crc, HeaderCrcPolicy::Ignore);
}

#[test]
fn list_with_stdin() {
    let p = parse("mgzcat", &["-l"]).unwrap();
    assert_eq!(p.op_mode, OpMode::List);
    assert_eq!(p.files, vec![STDIN_MARK.to_owned()]);
}

#[test]
fn help_and_version_surface_as_clap_errors() {
    for flag in ["--help", "--version"] {
        let err = parse("mgzcat", &[flag]).unwrap_err();
        let clap_err = err.downcast_ref::<clap::Error>().unwrap();
        assert!(matches!(
            clap_err.kind(),
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
        ));
    }
}

#[test]
fn bad_usage_messages() {
    let err = parse("mgzcat", &["-o", "out", "a.gz", "b.gz"]).unwrap_err();
    assert!(err.to_string().starts_with("bad usage:"));
}
