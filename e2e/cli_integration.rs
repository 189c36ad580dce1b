// e2e/cli_integration.rs: CLI integration tests
//
// Tests the `mgzcat` binary as a black-box CLI tool using std::process::Command.
// Covers stdout streaming, file decompression, exit codes, test mode,
// list mode, line mode, and the decoder policy flags.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use flate2::write::GzEncoder;
use flate2::{Compression, GzBuilder};
use tempfile::TempDir;

fn mgzcat_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_mgzcat"))
}

fn gz(data: &[u8]) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

/// The two-member fixture: "11 12\n21 22\n" + "31 32\n41 42\n".
fn two_member_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    let mut bytes = gz(b"11 12\n21 22\n");
    bytes.extend_from_slice(&gz(b"31 32\n41 42\n"));
    fs::write(&path, bytes).unwrap();
    path
}

fn run(args: &[&str], dir: &Path) -> Output {
    Command::new(mgzcat_bin())
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .output()
        .expect("failed to run mgzcat")
}

fn run_with_stdin(args: &[&str], input: &[u8]) -> Output {
    let mut child = Command::new(mgzcat_bin())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn mgzcat");
    child.stdin.take().unwrap().write_all(input).unwrap();
    child.wait_with_output().unwrap()
}

// ── 1. Streaming to stdout ────────────────────────────────────────────────────

#[test]
fn test_cli_cat_two_members() {
    let dir = TempDir::new().unwrap();
    let f = two_member_file(dir.path(), "test-multi.txt.gz");
    let out = run(&[f.to_str().unwrap()], dir.path());
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(out.stdout, b"11 12\n21 22\n31 32\n41 42\n");
}

#[test]
fn test_cli_cat_several_files_in_order() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.gz");
    let b = dir.path().join("b.gz");
    fs::write(&a, gz(b"from a\n")).unwrap();
    fs::write(&b, gz(b"from b\n")).unwrap();
    let out = run(&[a.to_str().unwrap(), b.to_str().unwrap()], dir.path());
    assert!(out.status.success());
    assert_eq!(out.stdout, b"from a\nfrom b\n");
}

#[test]
fn test_cli_stdin() {
    let mut input = gz(b"piped ");
    input.extend_from_slice(&gz(b"input"));
    let out = run_with_stdin(&[], &input);
    assert!(out.status.success());
    assert_eq!(out.stdout, b"piped input");

    let out = run_with_stdin(&["-"], &input);
    assert_eq!(out.stdout, b"piped input");
}

#[test]
fn test_cli_empty_stdin_is_empty_output() {
    let out = run_with_stdin(&[], b"");
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
}

// ── 2. --version / --help ────────────────────────────────────────────────────

#[test]
fn test_cli_version() {
    let out = run(&["--version"], Path::new("."));
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")), "got: {stdout}");
}

#[test]
fn test_cli_help() {
    let out = run(&["--help"], Path::new("."));
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout).to_lowercase();
    assert!(stdout.contains("usage"), "got: {stdout}");
    assert!(stdout.contains("--lenient-tail"));
}

// ── 3. Decompress to files ───────────────────────────────────────────────────

#[test]
fn test_cli_decompress_strips_suffix() {
    let dir = TempDir::new().unwrap();
    let f = two_member_file(dir.path(), "data.txt.gz");
    let out = run(&["-d", f.to_str().unwrap()], dir.path());
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(out.stdout.is_empty());
    assert_eq!(fs::read(dir.path().join("data.txt")).unwrap(), b"11 12\n21 22\n31 32\n41 42\n");
    assert!(f.exists(), "source is kept without --rm");
}

#[test]
fn test_cli_decompress_explicit_output() {
    let dir = TempDir::new().unwrap();
    let f = two_member_file(dir.path(), "in.gz");
    let dst = dir.path().join("elsewhere.txt");
    let out = run(&["-o", dst.to_str().unwrap(), f.to_str().unwrap()], dir.path());
    assert!(out.status.success());
    assert_eq!(fs::read(&dst).unwrap().len(), 24);
}

#[test]
fn test_cli_refuses_overwrite_without_force() {
    let dir = TempDir::new().unwrap();
    let f = two_member_file(dir.path(), "x.gz");
    let dst = dir.path().join("x");
    fs::write(&dst, b"precious").unwrap();

    let out = run(&["-d", f.to_str().unwrap()], dir.path());
    assert!(!out.status.success());
    assert_eq!(fs::read(&dst).unwrap(), b"precious");

    let out = run(&["-d", "-f", f.to_str().unwrap()], dir.path());
    assert!(out.status.success());
    assert_eq!(fs::read(&dst).unwrap().len(), 24);
}

#[test]
fn test_cli_rm_and_restore_mtime() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("dated.gz");
    let mut enc = GzBuilder::new().mtime(1_111_111_111).write(Vec::new(), Compression::default());
    enc.write_all(b"timestamped").unwrap();
    fs::write(&src, enc.finish().unwrap()).unwrap();

    let out = run(&["-d", "--rm", "--restore-mtime", src.to_str().unwrap()], dir.path());
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(!src.exists());
    let meta = fs::metadata(dir.path().join("dated")).unwrap();
    assert_eq!(
        filetime::FileTime::from_last_modification_time(&meta).unix_seconds(),
        1_111_111_111
    );
}

#[test]
fn test_cli_mgunzip_alias() {
    let dir = TempDir::new().unwrap();
    let alias = dir.path().join("mgunzip");
    if fs::copy(mgzcat_bin(), &alias).is_err() {
        return;
    }
    let f = two_member_file(dir.path(), "aliased.gz");
    let out = Command::new(&alias)
        .arg(f.to_str().unwrap())
        .stdin(Stdio::null())
        .output()
        .unwrap();
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
    assert!(dir.path().join("aliased").exists());
}

// ── 4. Test mode ─────────────────────────────────────────────────────────────

#[test]
fn test_cli_test_mode_valid() {
    let dir = TempDir::new().unwrap();
    let f = two_member_file(dir.path(), "ok.gz");
    let out = run(&["-t", f.to_str().unwrap()], dir.path());
    assert!(out.status.success());
    assert!(out.stdout.is_empty());
}

#[test]
fn test_cli_test_mode_corrupted() {
    let dir = TempDir::new().unwrap();
    let f = dir.path().join("bad.gz");
    let mut bytes = gz(b"some payload that will be damaged");
    let n = bytes.len();
    bytes[n - 6] ^= 0x40;
    fs::write(&f, bytes).unwrap();
    let out = run(&["-t", f.to_str().unwrap()], dir.path());
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("bad.gz"), "stderr: {stderr}");
}

// ── 5. Errors and exit codes ─────────────────────────────────────────────────

#[test]
fn test_cli_trailing_garbage_strict_and_lenient() {
    let dir = TempDir::new().unwrap();
    let f = dir.path().join("tail.gz");
    let mut bytes = gz(b"body\n");
    bytes.extend_from_slice(b"\0\0\0\0garbage");
    fs::write(&f, bytes).unwrap();

    let out = run(&[f.to_str().unwrap()], dir.path());
    assert!(!out.status.success());
    assert_eq!(out.stdout, b"body\n", "partial output is kept");

    let out = run(&["--lenient-tail", f.to_str().unwrap()], dir.path());
    assert!(out.status.success());
    assert_eq!(out.stdout, b"body\n");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("trailing garbage"), "stderr: {stderr}");

    let out = run(&["-q", "--lenient-tail", f.to_str().unwrap()], dir.path());
    assert!(out.stderr.is_empty());
}

#[test]
fn test_cli_missing_file() {
    let dir = TempDir::new().unwrap();
    let out = run(&["does-not-exist.gz"], dir.path());
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn test_cli_unknown_flag() {
    let out = run(&["--no-such-flag"], Path::new("."));
    assert!(!out.status.success());
}

#[test]
fn test_cli_single_member_flag() {
    let dir = TempDir::new().unwrap();
    let f = two_member_file(dir.path(), "two.gz");
    let out = run(&["--single-member", f.to_str().unwrap()], dir.path());
    assert!(out.status.success());
    assert_eq!(out.stdout, b"11 12\n21 22\n");
}

// ── 6. List and line modes ───────────────────────────────────────────────────

#[test]
fn test_cli_list() {
    let dir = TempDir::new().unwrap();
    let f = dir.path().join("listed.gz");
    let mut enc = GzBuilder::new().filename("inner.txt").write(Vec::new(), Compression::default());
    enc.write_all(b"11 12\n21 22\n").unwrap();
    let mut bytes = enc.finish().unwrap();
    bytes.extend_from_slice(&gz(b"31 32\n41 42\n"));
    fs::write(&f, bytes).unwrap();

    let out = run(&["-l", f.to_str().unwrap()], dir.path());
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("inner.txt"), "got: {stdout}");
    assert!(stdout.contains("Uncompressed"));
    let total = stdout.lines().last().unwrap();
    assert!(total.trim_start().starts_with('2'), "total row: {total}");
}

#[test]
fn test_cli_lines_mode() {
    let dir = TempDir::new().unwrap();
    let f = two_member_file(dir.path(), "lines.gz");
    let out = run(&["--lines", f.to_str().unwrap()], dir.path());
    assert!(out.status.success());
    assert_eq!(out.stdout, b"11 12\n21 22\n31 32\n41 42\n");
}

#[test]
fn test_cli_lines_mode_reports_failing_line() {
    let dir = TempDir::new().unwrap();
    let f = dir.path().join("broken.gz");
    let mut bytes = gz(b"line one\nline two\n");
    bytes.extend_from_slice(b"\x1f\x8b\x08\xe0");
    fs::write(&f, bytes).unwrap();
    let out = run(&["--lines", f.to_str().unwrap()], dir.path());
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(out.stdout, b"line one\nline two\n");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("line 3"), "stderr: {stderr}");
}
