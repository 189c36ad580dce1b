//! Interoperability tests against other gzip implementations.
//!
//! Members produced by flate2 (at every compression level, with and without
//! optional header fields) and by the system `gzip` binary must decode to
//! exactly what `flate2::read::MultiGzDecoder` and `gzip -dc` produce. If the
//! system `gzip` binary is not found those tests print a skip message and
//! return without failing.

use std::io::{Read, Write};
use std::process::{Command, Stdio};

use flate2::write::GzEncoder;
use flate2::{Compression, GzBuilder};

use multigz::MultiGzDecoder;

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the path to the system `gzip` binary, or `None` if not found.
fn system_gzip() -> Option<String> {
    if let Ok(p) = std::env::var("GZIP_BIN") {
        if std::path::Path::new(&p).exists() {
            return Some(p);
        }
    }
    let out = Command::new("which").arg("gzip").output().ok()?;
    if out.status.success() {
        let path = String::from_utf8_lossy(&out.stdout).trim().to_string();
        if !path.is_empty() {
            return Some(path);
        }
    }
    None
}

/// Path to the `mgzcat` binary (set by Cargo at compile time).
fn mgzcat() -> &'static str {
    env!("CARGO_BIN_EXE_mgzcat")
}

/// Mixed text and binary-ish content, 64 KiB.
fn fixture() -> Vec<u8> {
    let mut out = Vec::with_capacity(64 * 1024);
    let mut state = 0x2545_f491u32;
    let mut line = 0u32;
    while out.len() < 64 * 1024 {
        line += 1;
        out.extend_from_slice(format!("{line:06} record field={} ", line % 17).as_bytes());
        for _ in 0..8 {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            out.push((state & 0xff) as u8);
        }
        out.push(b'\n');
    }
    out.truncate(64 * 1024);
    out
}

fn ours(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    MultiGzDecoder::new(input).read_to_end(&mut out).expect("multigz decode");
    out
}

fn flate2_multi(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    flate2::read::MultiGzDecoder::new(input)
        .read_to_end(&mut out)
        .expect("flate2 decode");
    out
}

fn pipe(bin: &str, args: &[&str], input: &[u8]) -> Vec<u8> {
    let mut child = Command::new(bin)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("spawn");
    let mut stdin = child.stdin.take().unwrap();
    let data = input.to_vec();
    let writer = std::thread::spawn(move || stdin.write_all(&data));
    let out = child.wait_with_output().expect("wait");
    writer.join().unwrap().expect("write stdin");
    assert!(out.status.success(), "{bin} {args:?} failed");
    out.stdout
}

// ─────────────────────────────────────────────────────────────────────────────
// flate2-produced members
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_interop_flate2_all_levels() {
    let data = fixture();
    let mut stream = Vec::new();
    for level in 0..=9 {
        let mut enc = GzEncoder::new(Vec::new(), Compression::new(level));
        enc.write_all(&data[..(level as usize + 1) * 6_000]).unwrap();
        stream.extend_from_slice(&enc.finish().unwrap());
    }
    assert_eq!(ours(&stream), flate2_multi(&stream));
}

#[test]
fn test_interop_flate2_optional_headers() {
    let data = fixture();
    let mut stream = Vec::new();
    let builders = [
        GzBuilder::new(),
        GzBuilder::new().filename("name.txt"),
        GzBuilder::new().comment("a comment"),
        GzBuilder::new().extra(vec![b'A', b'P', 2, 0, 0xbe, 0xef]),
        GzBuilder::new().filename("all").comment("fields").mtime(42).operating_system(11),
    ];
    for (i, builder) in builders.into_iter().enumerate() {
        let mut enc = builder.write(Vec::new(), Compression::default());
        enc.write_all(&data[i * 1_000..(i + 1) * 9_000]).unwrap();
        stream.extend_from_slice(&enc.finish().unwrap());
    }
    assert_eq!(ours(&stream), flate2_multi(&stream));
}

#[test]
fn test_interop_flate2_single_member_matches_gz_decoder() {
    let data = fixture();
    let mut enc = GzEncoder::new(Vec::new(), Compression::best());
    enc.write_all(&data).unwrap();
    let member = enc.finish().unwrap();

    let mut expected = Vec::new();
    flate2::read::GzDecoder::new(&member[..]).read_to_end(&mut expected).unwrap();
    assert_eq!(ours(&member), expected);
    assert_eq!(expected, data);
}

// ─────────────────────────────────────────────────────────────────────────────
// System gzip
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_interop_gzip_members_decode() {
    let Some(gzip) = system_gzip() else {
        eprintln!("SKIP: system gzip not found");
        return;
    };
    let data = fixture();
    let mut stream = pipe(&gzip, &["-c", "-1"], &data[..20_000]);
    stream.extend_from_slice(&pipe(&gzip, &["-c", "-9"], &data[20_000..]));
    assert_eq!(ours(&stream), data);
}

#[test]
fn test_interop_gzip_reads_same_as_mgzcat() {
    let Some(gzip) = system_gzip() else {
        eprintln!("SKIP: system gzip not found");
        return;
    };
    let data = fixture();
    let mut stream = Vec::new();
    for chunk in data.chunks(10_000) {
        let mut enc = GzEncoder::new(Vec::new(), Compression::fast());
        enc.write_all(chunk).unwrap();
        stream.extend_from_slice(&enc.finish().unwrap());
    }
    let reference = pipe(&gzip, &["-dc"], &stream);
    let ours_cli = pipe(mgzcat(), &[], &stream);
    assert_eq!(ours_cli, reference);
    assert_eq!(ours_cli, data);
}
