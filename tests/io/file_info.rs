// Integration tests for src/io/file_info.rs: member listing.

use std::fs;
use std::io::{Cursor, Write};

use flate2::{Compression, GzBuilder};
use multigz::io::{display_members_info, scan_members};
use multigz::{DecodeOptions, TailPolicy};

fn member(data: &[u8], name: Option<&str>) -> Vec<u8> {
    let mut b = GzBuilder::new();
    if let Some(n) = name {
        b = b.filename(n);
    }
    let mut enc = b.write(Vec::new(), Compression::default());
    enc.write_all(data).unwrap();
    enc.finish().unwrap()
}

#[test]
fn offsets_partition_the_input() {
    let members: Vec<Vec<u8>> = (0..5)
        .map(|i| member(&vec![b'a' + i as u8; 1000 * (i + 1)], Some(&format!("part{}", i))))
        .collect();
    let input = members.concat();
    let infos = scan_members(Cursor::new(input.clone()), DecodeOptions::default()).unwrap();
    assert_eq!(infos.len(), 5);

    let mut offset = 0u64;
    for (i, info) in infos.iter().enumerate() {
        assert_eq!(info.index, i as u64);
        assert_eq!(info.start_offset, offset);
        assert_eq!(info.compressed_len, members[i].len() as u64);
        assert_eq!(info.uncompressed_len, 1000 * (i as u64 + 1));
        assert_eq!(info.filename.as_deref(), Some(format!("part{}", i).as_str()));
        assert!(info.ratio().unwrap() < 100.0);
        offset += info.compressed_len;
    }
    assert_eq!(offset, input.len() as u64);
}

#[test]
fn lenient_scan_stops_at_garbage() {
    let mut input = member(b"kept", None);
    input.extend_from_slice(b"trailing junk");
    let strict = scan_members(Cursor::new(input.clone()), DecodeOptions::default());
    assert!(strict.is_err());
    let lenient = DecodeOptions::default().tail_policy(TailPolicy::Lenient);
    let infos = scan_members(Cursor::new(input), lenient).unwrap();
    assert_eq!(infos.len(), 1);
    assert_eq!(infos[0].uncompressed_len, 4);
}

#[test]
fn display_reports_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.gz");
    fs::write(&good, member(b"ok", Some("ok.txt"))).unwrap();
    let missing = dir.path().join("missing.gz");

    assert!(display_members_info(&[good.to_str().unwrap()], DecodeOptions::default()).is_ok());
    assert!(display_members_info(
        &[missing.to_str().unwrap(), good.to_str().unwrap()],
        DecodeOptions::default()
    )
    .is_err());
}
