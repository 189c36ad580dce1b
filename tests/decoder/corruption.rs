// Damaged input: every failure is reported, located, and repeatable.

use std::io::{Cursor, Read};

use multigz::member::Flags;
use multigz::{
    DecodeOptions, DecoderState, ErrorKind, HeaderCrcPolicy, HeaderDefect, IntegrityFailure,
    MemberHeader, MultiGzDecoder, TailPolicy,
};

use crate::{decode, decode_with, gz, gz_error, gz_with_header};

const LINES: &[u8] = b"11 12\n21 22\n31 32\n41 42\n";

#[test]
fn reserved_flag_bit_is_malformed_at_offset_3() {
    let mut input = gz(LINES);
    input[3] |= 0x20;
    let err = gz_error(decode(&input));
    assert_eq!(err.kind(), &ErrorKind::MalformedHeader(HeaderDefect::ReservedFlags(input[3])));
    assert_eq!(err.offset(), 3);
    assert_eq!(err.member(), Some(0));
}

#[test]
fn fname_cut_after_one_byte_is_truncated_at_11() {
    let mut header = MemberHeader::new();
    header.filename = Some(b"lines.txt".to_vec());
    let input = gz_with_header(&header, LINES);
    let err = gz_error(decode(&input[..11]));
    assert_eq!(err.kind(), &ErrorKind::Truncated);
    assert_eq!(err.offset(), 11);
}

#[test]
fn wrong_magic_is_not_gzip() {
    let err = gz_error(decode(b"PK\x03\x04 not a gzip file"));
    assert_eq!(err.kind(), &ErrorKind::NotGzip);
    assert_eq!(err.offset(), 0);
}

#[test]
fn non_deflate_method_is_unsupported() {
    let mut input = gz(LINES);
    input[2] = 7;
    let err = gz_error(decode(&input));
    assert_eq!(err.kind(), &ErrorKind::UnsupportedMethod(7));
    assert_eq!(err.offset(), 2);
}

#[test]
fn every_truncation_point_fails() {
    let input = gz(LINES);
    for cut in 1..input.len() {
        let err = gz_error(decode(&input[..cut]));
        assert_eq!(err.kind(), &ErrorKind::Truncated, "cut at {}", cut);
    }
}

#[test]
fn flipped_payload_byte_never_yields_wrong_output() {
    let data: Vec<u8> = (0..4000u32).map(|i| (i * i % 97) as u8).collect();
    let input = gz(&data);
    let footer_start = input.len() - 8;
    for pos in 10..footer_start {
        let mut bad = input.clone();
        bad[pos] ^= 0xff;
        match decode(&bad) {
            // Some flips only touch bits the inflater never looks at.
            Ok(out) => assert_eq!(out, data, "byte {} produced wrong output", pos),
            // A damaged block length can send the inflater past the footer,
            // which then reads as truncation.
            Err(e) => {
                let err = multigz::GzError::from_io(&e).unwrap();
                assert!(
                    matches!(
                        err.kind(),
                        ErrorKind::CompressedDataCorrupt(_)
                            | ErrorKind::IntegrityCheckFailed(_)
                            | ErrorKind::Truncated
                    ),
                    "byte {}: unexpected {:?}",
                    pos,
                    err.kind()
                );
            }
        }
    }
}

#[test]
fn stored_block_length_past_input_is_truncated() {
    let data = b"data";
    let mut input = MemberHeader::new().encode();
    let len: u16 = 100;
    input.push(0x01);
    input.extend_from_slice(&len.to_le_bytes());
    input.extend_from_slice(&(!len).to_le_bytes());
    input.extend_from_slice(data);
    input.extend_from_slice(&crc32fast::hash(data).to_le_bytes());
    input.extend_from_slice(&(data.len() as u32).to_le_bytes());

    let err = gz_error(decode(&input));
    assert_eq!(err.kind(), &ErrorKind::Truncated);
    assert_eq!(err.member(), Some(0));
}

#[test]
fn extra_subfield_longer_than_xlen_is_malformed() {
    let mut header = MemberHeader::new();
    header.extra = Some(vec![b'A', b'B', 10, 0, 1, 2]);
    let input = gz_with_header(&header, b"data");
    let err = gz_error(decode(&input));
    assert_eq!(
        err.kind(),
        &ErrorKind::MalformedHeader(HeaderDefect::ExtraSubfieldOverrun { xlen: 6, subfield_end: 14 })
    );
    assert_eq!(err.offset(), 10);
    assert_eq!(err.member(), Some(0));
}

#[test]
fn crc_mismatch_is_located_at_footer() {
    let mut input = gz(LINES);
    let footer = input.len() - 8;
    input[footer] ^= 0x01;
    let err = gz_error(decode(&input));
    assert!(matches!(
        err.kind(),
        ErrorKind::IntegrityCheckFailed(IntegrityFailure::CrcMismatch { .. })
    ));
    assert_eq!(err.offset() as usize, footer);
}

#[test]
fn isize_mismatch_is_reported() {
    let mut input = gz(LINES);
    let isize_at = input.len() - 4;
    input[isize_at] = input[isize_at].wrapping_add(1);
    let err = gz_error(decode(&input));
    assert_eq!(
        err.kind(),
        &ErrorKind::IntegrityCheckFailed(IntegrityFailure::SizeMismatch {
            expected: LINES.len() as u32 + 1,
            actual: LINES.len() as u32,
        })
    );
}

#[test]
fn error_in_second_member_keeps_first_output() {
    let first = gz(b"first member\n");
    let mut second = gz(b"second member\n");
    second[3] = 0xe0;
    let mut input = first.clone();
    input.extend_from_slice(&second);

    let mut d = MultiGzDecoder::new(Cursor::new(input));
    let mut out = Vec::new();
    let err = d.read_to_end(&mut out).unwrap_err();
    assert_eq!(out, b"first member\n");
    let gz_err = multigz::GzError::from_io(&err).unwrap();
    assert_eq!(gz_err.member(), Some(1));
    assert_eq!(gz_err.offset(), first.len() as u64 + 3);
}

#[test]
fn failed_state_repeats_the_same_error() {
    let mut input = gz(LINES);
    input.extend_from_slice(b"\x1f\x8b\x09");
    let mut d = MultiGzDecoder::new(Cursor::new(input));
    let mut out = Vec::new();
    let first = d.read_to_end(&mut out).unwrap_err();
    assert_eq!(d.state(), DecoderState::Failed);
    let mut buf = [0u8; 32];
    for _ in 0..3 {
        let again = d.read(&mut buf).unwrap_err();
        assert_eq!(again.kind(), first.kind());
        assert_eq!(
            multigz::GzError::from_io(&again),
            multigz::GzError::from_io(&first)
        );
    }
    assert_eq!(d.error().map(|e| e.kind()), Some(&ErrorKind::UnsupportedMethod(9)));
}

#[test]
fn io_error_kinds_follow_the_failure() {
    let input = gz(LINES);
    let err = decode(&input[..input.len() - 1]).unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
    let err = decode(b"garbage").unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}

// ── Trailing data policy ────────────────────────────────────────────────────

#[test]
fn zero_padding_after_member() {
    let mut input = gz(LINES);
    input.extend_from_slice(&[0u8; 512]);
    assert_eq!(gz_error(decode(&input)).kind(), &ErrorKind::NotGzip);
    let lenient = DecodeOptions::default().tail_policy(TailPolicy::Lenient);
    assert_eq!(decode_with(&input, lenient).unwrap(), LINES);
}

#[test]
fn lenient_tail_never_hides_a_broken_first_member() {
    let lenient = DecodeOptions::default().tail_policy(TailPolicy::Lenient);
    let mut input = gz(LINES);
    input.truncate(input.len() - 2);
    assert_eq!(gz_error(decode_with(&input, lenient)).kind(), &ErrorKind::Truncated);
}

#[test]
fn lenient_tail_ignores_bad_header_after_valid_member() {
    let lenient = DecodeOptions::default().tail_policy(TailPolicy::Lenient);
    let mut input = gz(LINES);
    let mut tail = gz(b"never decoded");
    tail[3] = Flags::RESERVED;
    input.extend_from_slice(&tail);
    assert_eq!(decode_with(&input, lenient).unwrap(), LINES);
}

// ── Header CRC policy ───────────────────────────────────────────────────────

fn member_with_bad_hcrc() -> (Vec<u8>, usize) {
    let mut header = MemberHeader::new();
    header.flags = Flags::from_bits(Flags::HCRC);
    header.filename = Some(b"f".to_vec());
    let mut input = gz_with_header(&header, LINES);
    let crc_at = header.encode().len() - 2;
    input[crc_at] ^= 0x55;
    (input, crc_at)
}

#[test]
fn header_crc_ignored_by_default() {
    let (input, _) = member_with_bad_hcrc();
    assert_eq!(decode(&input).unwrap(), LINES);
    let warn = DecodeOptions::default().header_crc(HeaderCrcPolicy::Warn);
    assert_eq!(decode_with(&input, warn).unwrap(), LINES);
}

#[test]
fn header_crc_verified_on_request() {
    let (input, crc_at) = member_with_bad_hcrc();
    let verify = DecodeOptions::default().header_crc(HeaderCrcPolicy::Verify);
    let err = gz_error(decode_with(&input, verify));
    assert!(matches!(err.kind(), ErrorKind::HeaderChecksum { .. }));
    assert_eq!(err.offset() as usize, crc_at);
}
