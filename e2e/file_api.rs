// e2e/file_api.rs: library file-API end-to-end tests
//
// Drives the public library surface against real files on disk:
// MultiGzDecoder over std::fs::File, decompress_filename,
// decompress_multiple_filenames, and scan_members.

use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::{Compression, GzBuilder};
use tempfile::TempDir;

use multigz::io::{decompress_filename, decompress_multiple_filenames, scan_members, Prefs};
use multigz::{DecodeOptions, DecoderState, MultiGzDecoder};

fn gz(data: &[u8]) -> Vec<u8> {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

/// Deterministic compressible data of `len` bytes.
fn payload(len: usize, seed: u32) -> Vec<u8> {
    let words = [b"alpha ".as_ref(), b"beta ", b"gamma\n", b"delta ", b"epsilon "];
    let mut out = Vec::with_capacity(len);
    let mut state = seed;
    while out.len() < len {
        state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        out.extend_from_slice(words[(state >> 16) as usize % words.len()]);
    }
    out.truncate(len);
    out
}

fn write_members(path: &Path, parts: &[&[u8]]) -> Vec<u8> {
    let mut bytes = Vec::new();
    let mut expected = Vec::new();
    for part in parts {
        bytes.extend_from_slice(&gz(part));
        expected.extend_from_slice(part);
    }
    fs::write(path, bytes).unwrap();
    expected
}

// ── 1. MultiGzDecoder over a File ────────────────────────────────────────────

#[test]
fn test_decoder_over_file_large_members() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("large.gz");
    let a = payload(300_000, 1);
    let b = payload(5, 2);
    let c = payload(1_000_000, 3);
    let expected = write_members(&path, &[&a, &b, &c]);

    let mut decoder = MultiGzDecoder::new(File::open(&path).unwrap());
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).unwrap();

    assert_eq!(out, expected);
    assert_eq!(decoder.members_decoded(), 3);
    assert_eq!(decoder.state(), DecoderState::Exhausted);
    assert_eq!(decoder.total_in(), fs::metadata(&path).unwrap().len());
    assert_eq!(decoder.total_out(), expected.len() as u64);
}

#[test]
fn test_decoder_from_bufread_small_buffer() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("small-buf.gz");
    let expected = write_members(&path, &[b"first member\n", b"", b"third member\n"]);

    let reader = BufReader::with_capacity(7, File::open(&path).unwrap());
    let mut decoder = MultiGzDecoder::from_bufread(reader);
    let mut out = Vec::new();
    let mut chunk = [0u8; 3];
    loop {
        let n = decoder.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        out.extend_from_slice(&chunk[..n]);
    }
    assert_eq!(out, expected);
    assert_eq!(decoder.members_decoded(), 3);
}

#[test]
fn test_decoder_header_fields_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("named.gz");
    let mut enc = GzBuilder::new()
        .filename("report.csv")
        .comment("nightly")
        .mtime(1_600_000_000)
        .write(Vec::new(), Compression::fast());
    enc.write_all(b"a,b,c\n").unwrap();
    fs::write(&path, enc.finish().unwrap()).unwrap();

    let mut decoder = MultiGzDecoder::new(File::open(&path).unwrap());
    let mut out = String::new();
    decoder.read_to_string(&mut out).unwrap();
    assert_eq!(out, "a,b,c\n");

    let header = decoder.last_header().unwrap();
    assert_eq!(header.filename_lossy().as_deref(), Some("report.csv"));
    assert_eq!(header.comment_lossy().as_deref(), Some("nightly"));
    assert!(header.mtime().is_some());
}

// ── 2. decompress_filename ───────────────────────────────────────────────────

#[test]
fn test_decompress_filename_to_file() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("in.gz");
    let dst = dir.path().join("out.bin");
    let expected = write_members(&src, &[&payload(70_000, 9), &payload(70_000, 10)]);

    let stats = decompress_filename(
        src.to_str().unwrap(),
        dst.to_str().unwrap(),
        &Prefs::default(),
    )
    .unwrap();
    assert_eq!(stats.members, 2);
    assert_eq!(stats.decompressed_bytes, expected.len() as u64);
    assert_eq!(fs::read(&dst).unwrap(), expected);
}

#[test]
fn test_decompress_filename_test_mode_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("in.gz");
    let dst = dir.path().join("never.txt");
    write_members(&src, &[b"checked only"]);

    let mut prefs = Prefs::default();
    prefs.set_test_mode(true);
    let stats = decompress_filename(src.to_str().unwrap(), dst.to_str().unwrap(), &prefs).unwrap();
    assert_eq!(stats.decompressed_bytes, 12);
    assert!(!dst.exists());
}

#[test]
fn test_decompress_filename_keeps_partial_output() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("partial.gz");
    let dst = dir.path().join("partial.txt");
    let mut bytes = gz(b"complete first member");
    bytes.extend_from_slice(&gz(b"second")[..12]);
    fs::write(&src, bytes).unwrap();

    let err = decompress_filename(src.to_str().unwrap(), dst.to_str().unwrap(), &Prefs::default())
        .unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    assert_eq!(fs::read(&dst).unwrap(), b"complete first member");
}

// ── 3. decompress_multiple_filenames ─────────────────────────────────────────

#[test]
fn test_decompress_multiple_derives_names() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.txt.gz");
    let b = dir.path().join("b.txt.gz");
    let ea = write_members(&a, &[b"aaa", b"AAA"]);
    let eb = write_members(&b, &[b"bbb"]);

    let mut prefs = Prefs::default();
    prefs.set_to_stdout(false);
    let stats = decompress_multiple_filenames(
        &[a.to_str().unwrap(), b.to_str().unwrap()],
        &prefs,
    )
    .unwrap();
    assert_eq!(stats.members, 3);
    assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), ea);
    assert_eq!(fs::read(dir.path().join("b.txt")).unwrap(), eb);
}

#[test]
fn test_decompress_multiple_continues_after_failure() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.gz");
    let good = dir.path().join("good.gz");
    let odd = dir.path().join("odd.zip");
    fs::write(&bad, b"plain text, not gzip").unwrap();
    write_members(&good, &[b"good data"]);
    fs::write(&odd, b"whatever").unwrap();

    let mut prefs = Prefs::default();
    prefs.set_to_stdout(false);
    let err = decompress_multiple_filenames(
        &[bad.to_str().unwrap(), good.to_str().unwrap(), odd.to_str().unwrap()],
        &prefs,
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "1 file(s) failed; 1 file(s) skipped");
    assert_eq!(fs::read(dir.path().join("good")).unwrap(), b"good data");
}

#[test]
fn test_decompress_multiple_remove_source() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("gone.gz");
    write_members(&src, &[b"bye"]);

    let mut prefs = Prefs::default();
    prefs.set_to_stdout(false);
    prefs.set_keep_source(false);
    decompress_multiple_filenames(&[src.to_str().unwrap()], &prefs).unwrap();
    assert!(!src.exists());
    assert_eq!(fs::read(dir.path().join("gone")).unwrap(), b"bye");
}

#[test]
fn test_decompress_multiple_test_mode_ignores_suffix() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("no-suffix");
    write_members(&src, &[b"tested"]);

    let mut prefs = Prefs::default();
    prefs.set_test_mode(true);
    let stats = decompress_multiple_filenames(&[src.to_str().unwrap()], &prefs).unwrap();
    assert_eq!(stats.decompressed_bytes, 6);
}

// ── 4. scan_members ──────────────────────────────────────────────────────────

#[test]
fn test_scan_members_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scan.gz");
    let sizes = [0usize, 1, 4_096, 100_000];
    let parts: Vec<Vec<u8>> = sizes.iter().map(|&n| payload(n, n as u32)).collect();
    let refs: Vec<&[u8]> = parts.iter().map(|p| p.as_slice()).collect();
    write_members(&path, &refs);

    let file = BufReader::new(File::open(&path).unwrap());
    let members = scan_members(file, DecodeOptions::default()).unwrap();
    assert_eq!(members.len(), sizes.len());

    let mut offset = 0;
    for (m, &size) in members.iter().zip(sizes.iter()) {
        assert_eq!(m.start_offset, offset);
        assert_eq!(m.uncompressed_len, size as u64);
        offset += m.compressed_len;
    }
    assert_eq!(offset, fs::metadata(&path).unwrap().len());
}
