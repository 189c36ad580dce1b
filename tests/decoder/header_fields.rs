// Optional header fields are parsed, exposed, and skipped correctly.

use std::io::{Cursor, Read};

use multigz::member::Flags;
use multigz::{DecodeOptions, HeaderCrcPolicy, MemberHeader, MultiGzDecoder};

use crate::{decode_with, gz_with_header};

fn header_variants() -> Vec<MemberHeader> {
    let mut out = Vec::new();
    for bits in 0u8..32 {
        let mut h = MemberHeader::new();
        h.flags = Flags::from_bits(bits & (Flags::TEXT | Flags::HCRC));
        if bits & Flags::EXTRA != 0 {
            h.extra = Some(vec![b'X', b'Y', 3, 0, 1, 2, 3]);
        }
        if bits & Flags::NAME != 0 {
            h.filename = Some(b"name.txt".to_vec());
        }
        if bits & Flags::COMMENT != 0 {
            h.comment = Some(b"comment text".to_vec());
        }
        h.modification_time = u32::from(bits) * 1000;
        out.push(h);
    }
    out
}

#[test]
fn every_flag_combination_decodes() {
    let verify = DecodeOptions::default().header_crc(HeaderCrcPolicy::Verify);
    for h in header_variants() {
        let payload = format!("flags {:05b}\n", h.encode()[3]);
        let input = gz_with_header(&h, payload.as_bytes());
        assert_eq!(decode_with(&input, verify).unwrap(), payload.as_bytes());
    }
}

#[test]
fn all_flag_combinations_concatenated() {
    let variants = header_variants();
    let mut input = Vec::new();
    let mut expected = Vec::new();
    for (i, h) in variants.iter().enumerate() {
        let payload = format!("member {}\n", i);
        input.extend_from_slice(&gz_with_header(h, payload.as_bytes()));
        expected.extend_from_slice(payload.as_bytes());
    }
    assert_eq!(decode_with(&input, DecodeOptions::default()).unwrap(), expected);
}

#[test]
fn last_header_exposes_fields() {
    let mut h = MemberHeader::new();
    h.filename = Some(b"report.csv".to_vec());
    h.comment = Some(b"nightly".to_vec());
    h.extra = Some(vec![b'A', b'P', 2, 0, 9, 9]);
    h.modification_time = 1_600_000_000;
    h.os = 3;
    let input = gz_with_header(&h, b"a,b\n1,2\n");

    let mut d = MultiGzDecoder::new(Cursor::new(input));
    let mut out = Vec::new();
    d.read_to_end(&mut out).unwrap();
    let parsed = d.last_header().unwrap();
    assert_eq!(parsed.filename_lossy().as_deref(), Some("report.csv"));
    assert_eq!(parsed.comment_lossy().as_deref(), Some("nightly"));
    assert_eq!(parsed.os, 3);
    assert!(parsed.mtime().is_some());
    let subfields = parsed.extra_subfields().unwrap();
    assert_eq!(subfields.len(), 1);
    assert_eq!(subfields[0].id, *b"AP");
    assert_eq!(subfields[0].data, &[9, 9]);
}

#[test]
fn latin1_filename_is_kept_as_bytes() {
    let mut h = MemberHeader::new();
    h.filename = Some(vec![b'c', 0xe9, b'.', b't']);
    let input = gz_with_header(&h, b"x");
    let mut d = MultiGzDecoder::new(Cursor::new(input));
    let mut out = Vec::new();
    d.read_to_end(&mut out).unwrap();
    assert_eq!(d.last_header().unwrap().filename.as_deref(), Some(&[b'c', 0xe9, b'.', b't'][..]));
}
