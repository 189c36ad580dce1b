// Integration tests for src/io/decompress.rs: file-level decompression.
//
// Coverage:
//   - decompress_stream: multi-member output, stats, test mode
//   - decompress_filename: explicit destination, overwrite policy,
//     missing source leaves no output, partial output on corruption
//   - decompress_multiple_filenames: suffix stripping, --rm, mtime restore,
//     stdout mode counts, failure summary

use std::fs;
use std::io::{Cursor, Write};

use flate2::write::GzEncoder;
use flate2::{Compression, GzBuilder};
use multigz::io::decompress::{decompress_filename, decompress_multiple_filenames, decompress_stream};
use multigz::io::{Prefs, NUL_MARK};
use multigz::{ErrorKind, GzError};

fn gz(data: &[u8]) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

fn gz_mtime(data: &[u8], mtime: u32) -> Vec<u8> {
    let mut enc = GzBuilder::new().mtime(mtime).write(Vec::new(), Compression::fast());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

#[test]
fn stream_reports_member_count_and_sizes() {
    let mut input = gz(b"one\n");
    input.extend_from_slice(&gz(b"two\n"));
    input.extend_from_slice(&gz(b"three\n"));
    let mut out = Vec::new();
    let stats = decompress_stream(Cursor::new(&input), &mut out, &Prefs::default()).unwrap();
    assert_eq!(out, b"one\ntwo\nthree\n");
    assert_eq!(stats.members, 3);
    assert_eq!(stats.decompressed_bytes, 14);
    assert_eq!(stats.compressed_bytes, input.len() as u64);
}

#[test]
fn explicit_destination() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in.gz");
    let dst = dir.path().join("custom-name");
    let mut bytes = gz(b"11 12\n21 22\n");
    bytes.extend_from_slice(&gz(b"31 32\n41 42\n"));
    fs::write(&src, bytes).unwrap();

    let stats = decompress_filename(src.to_str().unwrap(), dst.to_str().unwrap(), &Prefs::default()).unwrap();
    assert_eq!(stats.members, 2);
    assert_eq!(fs::read(&dst).unwrap(), b"11 12\n21 22\n31 32\n41 42\n");
    assert!(src.exists());
}

#[test]
fn existing_destination_needs_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in.gz");
    let dst = dir.path().join("out");
    fs::write(&src, gz(b"fresh")).unwrap();
    fs::write(&dst, b"stale").unwrap();

    let err = decompress_filename(src.to_str().unwrap(), dst.to_str().unwrap(), &Prefs::default()).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::AlreadyExists);
    assert_eq!(fs::read(&dst).unwrap(), b"stale");

    let mut prefs = Prefs::default();
    prefs.set_overwrite(true);
    decompress_filename(src.to_str().unwrap(), dst.to_str().unwrap(), &prefs).unwrap();
    assert_eq!(fs::read(&dst).unwrap(), b"fresh");
}

#[test]
fn test_mode_creates_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in.gz");
    let dst = dir.path().join("out");
    fs::write(&src, gz(b"payload")).unwrap();
    let mut prefs = Prefs::default();
    prefs.set_test_mode(true);
    let stats = decompress_filename(src.to_str().unwrap(), dst.to_str().unwrap(), &prefs).unwrap();
    assert_eq!(stats.decompressed_bytes, 7);
    assert!(!dst.exists());
}

#[test]
fn corrupt_member_keeps_partial_output() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in.gz");
    let dst = dir.path().join("out");
    let mut bytes = gz(b"good part\n");
    bytes.extend_from_slice(b"\x1f\x8bjunk");
    fs::write(&src, bytes).unwrap();

    let err = decompress_filename(src.to_str().unwrap(), dst.to_str().unwrap(), &Prefs::default()).unwrap_err();
    let gz_err = GzError::from_io(&err).unwrap();
    assert_eq!(gz_err.kind(), &ErrorKind::UnsupportedMethod(b'j'));
    assert_eq!(fs::read(&dst).unwrap(), b"good part\n");
}

#[test]
fn multiple_files_strip_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.txt.gz");
    let b = dir.path().join("b.log.gz");
    fs::write(&a, gz(b"aaa")).unwrap();
    fs::write(&b, [gz(b"b1"), gz(b"b2")].concat()).unwrap();

    let srcs = [a.to_str().unwrap(), b.to_str().unwrap()];
    let stats = decompress_multiple_filenames(&srcs, &Prefs::default()).unwrap();
    assert_eq!(stats.members, 3);
    assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), b"aaa");
    assert_eq!(fs::read(dir.path().join("b.log")).unwrap(), b"b1b2");
}

#[test]
fn rm_and_restore_mtime() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("dated.gz");
    fs::write(&src, gz_mtime(b"old news", 1_234_567_890)).unwrap();

    let mut prefs = Prefs::default();
    prefs.set_keep_source(false);
    prefs.set_restore_mtime(true);
    decompress_multiple_filenames(&[src.to_str().unwrap()], &prefs).unwrap();

    let dst = dir.path().join("dated");
    assert!(!src.exists());
    let meta = fs::metadata(&dst).unwrap();
    assert_eq!(
        filetime::FileTime::from_last_modification_time(&meta).unix_seconds(),
        1_234_567_890
    );
}

#[test]
fn zero_mtime_is_not_restored() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("undated.gz");
    fs::write(&src, gz_mtime(b"x", 0)).unwrap();
    let mut prefs = Prefs::default();
    prefs.set_restore_mtime(true);
    decompress_multiple_filenames(&[src.to_str().unwrap()], &prefs).unwrap();
    let meta = fs::metadata(dir.path().join("undated")).unwrap();
    assert!(filetime::FileTime::from_last_modification_time(&meta).unix_seconds() > 0);
}

#[test]
fn failures_are_counted_and_others_processed() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.gz");
    let bad = dir.path().join("bad.gz");
    let odd = dir.path().join("odd.bin");
    fs::write(&good, gz(b"fine")).unwrap();
    fs::write(&bad, b"not gzip").unwrap();
    fs::write(&odd, gz(b"x")).unwrap();

    let srcs = [bad.to_str().unwrap(), odd.to_str().unwrap(), good.to_str().unwrap()];
    let err = decompress_multiple_filenames(&srcs, &Prefs::default()).unwrap_err();
    assert_eq!(err.to_string(), "1 file(s) failed; 1 file(s) skipped");
    assert_eq!(fs::read(dir.path().join("good")).unwrap(), b"fine");
}

#[test]
fn null_destination_discards() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("in.gz");
    fs::write(&src, gz(b"discard me")).unwrap();
    let stats = decompress_filename(src.to_str().unwrap(), NUL_MARK, &Prefs::default()).unwrap();
    assert_eq!(stats.decompressed_bytes, 10);
}
