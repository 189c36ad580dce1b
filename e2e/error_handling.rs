// e2e/error_handling.rs: error reporting end-to-end tests
//
// Feeds malformed inputs through both the library and the `mgzcat`
// binary and checks that each failure is classified, located at the right
// absolute offset and member, and reported with a non-zero exit code.

use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::TempDir;

use multigz::{
    DecodeOptions, ErrorKind, GzError, HeaderDefect, IntegrityFailure, MultiGzDecoder, TailPolicy,
};

fn gz(data: &[u8]) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

/// Decode `input` fully and return what was produced plus the error.
fn decode_err(input: &[u8], options: DecodeOptions) -> (Vec<u8>, GzError) {
    let mut decoder = MultiGzDecoder::with_options(input, options);
    let mut out = Vec::new();
    let mut buf = [0u8; 512];
    loop {
        match decoder.read(&mut buf) {
            Ok(0) => panic!("expected an error, decoded {} bytes", out.len()),
            Ok(n) => out.extend_from_slice(&buf[..n]),
            Err(e) => {
                let gz_err = GzError::from_io(&e).expect("error carries a GzError").clone();
                return (out, gz_err);
            }
        }
    }
}

fn mgzcat_stderr(input: &[u8], extra: &[&str]) -> (Option<i32>, Vec<u8>, String) {
    let dir = TempDir::new().unwrap();
    let path: PathBuf = dir.path().join("input.gz");
    fs::write(&path, input).unwrap();
    let out = Command::new(env!("CARGO_BIN_EXE_mgzcat"))
        .args(extra)
        .arg(&path)
        .stdin(Stdio::null())
        .output()
        .unwrap();
    (out.status.code(), out.stdout, String::from_utf8_lossy(&out.stderr).into_owned())
}

// ── 1. Library classification ────────────────────────────────────────────────

#[test]
fn test_not_gzip_second_member() {
    let first = gz(b"11 12\n21 22\n");
    let mut input = first.clone();
    input.extend_from_slice(b"PK\x03\x04 not a gzip member");

    let (out, err) = decode_err(&input, DecodeOptions::default());
    assert_eq!(out, b"11 12\n21 22\n");
    assert_eq!(err.kind(), &ErrorKind::NotGzip);
    assert_eq!(err.offset(), first.len() as u64);
    assert_eq!(err.member(), Some(1));
}

#[test]
fn test_unsupported_method() {
    let mut input = gz(b"x");
    input[2] = 7;
    let (_, err) = decode_err(&input, DecodeOptions::default());
    assert_eq!(err.kind(), &ErrorKind::UnsupportedMethod(7));
    assert_eq!(err.offset(), 2);
    assert_eq!(err.member(), Some(0));
}

#[test]
fn test_reserved_flags() {
    let mut input = gz(b"x");
    input[3] = 0x80;
    let (_, err) = decode_err(&input, DecodeOptions::default());
    assert_eq!(err.kind(), &ErrorKind::MalformedHeader(HeaderDefect::ReservedFlags(0x80)));
    assert_eq!(err.offset(), 3);
}

#[test]
fn test_truncation_in_each_section() {
    let member = gz(b"the quick brown fox jumps over the lazy dog");
    // Header and footer fields fail exactly where the bytes stop.
    for cut in [5, member.len() - 3] {
        let (_, err) = decode_err(&member[..cut], DecodeOptions::default());
        assert_eq!(err.kind(), &ErrorKind::Truncated, "cut at {cut}");
        assert_eq!(err.offset(), cut as u64, "cut at {cut}");
    }
    let (_, err) = decode_err(&member[..member.len() - 12], DecodeOptions::default());
    assert_eq!(err.kind(), &ErrorKind::Truncated);
}

#[test]
fn test_corrupt_deflate_block() {
    let mut input = gz(b"x");
    // BTYPE = 11 is reserved.
    input[10] = 0x07;
    let (_, err) = decode_err(&input, DecodeOptions::default());
    assert!(
        matches!(err.kind(), ErrorKind::CompressedDataCorrupt(_)),
        "got {:?}",
        err.kind()
    );
    assert_eq!(err.member(), Some(0));
}

#[test]
fn test_crc_and_size_mismatch_located_at_footer() {
    let data = b"integrity matters";
    let good = gz(data);
    let footer_at = (good.len() - 8) as u64;

    let mut bad_crc = good.clone();
    bad_crc[good.len() - 8] ^= 0xff;
    let (out, err) = decode_err(&bad_crc, DecodeOptions::default());
    assert_eq!(out, data, "payload is delivered before the footer is checked");
    assert!(matches!(
        err.kind(),
        ErrorKind::IntegrityCheckFailed(IntegrityFailure::CrcMismatch { .. })
    ));
    assert_eq!(err.offset(), footer_at);

    let mut bad_size = good.clone();
    bad_size[good.len() - 4] ^= 0x01;
    let (_, err) = decode_err(&bad_size, DecodeOptions::default());
    assert!(matches!(
        err.kind(),
        ErrorKind::IntegrityCheckFailed(IntegrityFailure::SizeMismatch { .. })
    ));
    assert_eq!(err.offset(), footer_at);
}

#[test]
fn test_failed_decoder_stays_failed() {
    let mut decoder = MultiGzDecoder::new(&b"\x1f\x8b\x09"[..]);
    let mut buf = [0u8; 16];
    let first = decoder.read(&mut buf).unwrap_err();
    let second = decoder.read(&mut buf).unwrap_err();
    assert_eq!(GzError::from_io(&first), GzError::from_io(&second));
}

#[test]
fn test_lenient_tail_never_hides_first_member() {
    let options = DecodeOptions::default().tail_policy(TailPolicy::Lenient);
    let (_, err) = decode_err(b"definitely not gzip", options);
    assert_eq!(err.kind(), &ErrorKind::NotGzip);
    assert_eq!(err.offset(), 0);
}

#[test]
fn test_lenient_tail_does_not_hide_bad_footer() {
    let mut input = gz(b"one");
    let n = input.len();
    input[n - 5] ^= 0x10;
    input.extend_from_slice(&gz(b"two"));
    let options = DecodeOptions::default().tail_policy(TailPolicy::Lenient);
    let (_, err) = decode_err(&input, options);
    assert!(matches!(err.kind(), ErrorKind::IntegrityCheckFailed(_)));
}

// ── 2. CLI reporting ─────────────────────────────────────────────────────────

#[test]
fn test_cli_reports_offset_and_member() {
    let first = gz(b"hello\n");
    let mut input = first.clone();
    input.extend_from_slice(b"\x1f\x8b\x08\x40rest");

    let (code, stdout, stderr) = mgzcat_stderr(&input, &[]);
    assert_eq!(code, Some(1));
    assert_eq!(stdout, b"hello\n");
    assert!(stderr.contains("reserved flag bits"), "stderr: {stderr}");
    assert!(
        stderr.contains(&format!("offset {}", first.len() + 3)),
        "stderr: {stderr}"
    );
    assert!(stderr.contains("member #1"), "stderr: {stderr}");
}

#[test]
fn test_cli_truncated_input() {
    let input = gz(b"cut short");
    let (code, _, stderr) = mgzcat_stderr(&input[..input.len() - 4], &["-t"]);
    assert_eq!(code, Some(1));
    assert!(stderr.contains("unexpected end of input"), "stderr: {stderr}");
}

#[test]
fn test_cli_header_crc_policies() {
    let mut header = vec![0x1f, 0x8b, 0x08, 0x02, 0, 0, 0, 0, 0, 0xff, 0xad, 0xde];
    let mut enc = flate2::write::DeflateEncoder::new(Vec::new(), Compression::default());
    enc.write_all(b"crc16").unwrap();
    header.extend_from_slice(&enc.finish().unwrap());
    header.extend_from_slice(&crc32fast::hash(b"crc16").to_le_bytes());
    header.extend_from_slice(&5u32.to_le_bytes());

    let (code, stdout, _) = mgzcat_stderr(&header, &[]);
    assert_eq!(code, Some(0));
    assert_eq!(stdout, b"crc16");

    let (code, stdout, stderr) = mgzcat_stderr(&header, &["--warn-header-crc"]);
    assert_eq!(code, Some(0));
    assert_eq!(stdout, b"crc16");
    assert!(stderr.contains("header crc16 mismatch"), "stderr: {stderr}");

    let (code, stdout, stderr) = mgzcat_stderr(&header, &["--verify-header-crc"]);
    assert_eq!(code, Some(1));
    assert!(stdout.is_empty());
    assert!(stderr.contains("offset 10"), "stderr: {stderr}");
}
