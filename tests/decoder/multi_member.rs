// Concatenation behaviour: member order, empty inputs, single-member mode.

use std::io::{Cursor, Read};

use multigz::{DecodeOptions, DecoderState, MultiGzDecoder};

use crate::{decode, decode_with, gz};

#[test]
fn two_line_members_concatenate() {
    let mut input = gz(b"11 12\n21 22\n");
    input.extend_from_slice(&gz(b"31 32\n41 42\n"));
    assert_eq!(decode(&input).unwrap(), b"11 12\n21 22\n31 32\n41 42\n");
}

#[test]
fn same_bytes_in_one_member_decode_identically() {
    let single = gz(b"11 12\n21 22\n31 32\n41 42\n");
    let mut split = gz(b"11 12\n21 22\n");
    split.extend_from_slice(&gz(b"31 32\n41 42\n"));
    assert_eq!(decode(&single).unwrap(), decode(&split).unwrap());
}

#[test]
fn many_members_keep_order() {
    let parts: Vec<Vec<u8>> = (0..50u32)
        .map(|i| format!("member {} says {}\n", i, "x".repeat(i as usize)).into_bytes())
        .collect();
    let input: Vec<u8> = parts.iter().flat_map(|p| gz(p)).collect();
    let expected: Vec<u8> = parts.concat();
    assert_eq!(decode(&input).unwrap(), expected);
}

#[test]
fn zero_members_is_empty_output() {
    let mut d = MultiGzDecoder::new(Cursor::new(Vec::<u8>::new()));
    let mut out = Vec::new();
    assert_eq!(d.read_to_end(&mut out).unwrap(), 0);
    assert_eq!(d.state(), DecoderState::Exhausted);
    assert_eq!(d.members_decoded(), 0);
}

#[test]
fn single_member_round_trip() {
    let data: Vec<u8> = (0..200_000u32).map(|i| (i.wrapping_mul(31) >> 3) as u8).collect();
    assert_eq!(decode(&gz(&data)).unwrap(), data);
}

#[test]
fn single_member_mode_matches_multi_mode_on_one_member() {
    let input = gz(b"only one member here");
    let multi = decode(&input).unwrap();
    let single = decode_with(&input, DecodeOptions::default().single_member(true)).unwrap();
    assert_eq!(multi, single);
}

#[test]
fn single_member_mode_leaves_rest_unread() {
    let first = gz(b"first");
    let second = gz(b"second");
    let mut input = first.clone();
    input.extend_from_slice(&second);

    let opts = DecodeOptions::default().single_member(true);
    let mut d = MultiGzDecoder::from_bufread_with_options(Cursor::new(input), opts);
    let mut out = Vec::new();
    d.read_to_end(&mut out).unwrap();
    assert_eq!(out, b"first");

    // The source sits on the second member; a fresh decoder picks it up.
    let rest = d.into_inner();
    assert_eq!(rest.position(), first.len() as u64);
    let mut d2 = MultiGzDecoder::from_bufread(rest);
    let mut out2 = Vec::new();
    d2.read_to_end(&mut out2).unwrap();
    assert_eq!(out2, b"second");
}

#[test]
fn exhausted_reads_keep_returning_zero() {
    let mut d = MultiGzDecoder::new(Cursor::new(gz(b"z")));
    let mut out = Vec::new();
    d.read_to_end(&mut out).unwrap();
    let mut buf = [0u8; 4];
    for _ in 0..5 {
        assert_eq!(d.read(&mut buf).unwrap(), 0);
    }
    assert_eq!(d.state(), DecoderState::Exhausted);
}

#[test]
fn diagnostics_track_progress() {
    let a = gz(b"alpha");
    let b = gz(b"beta");
    let mut input = a.clone();
    input.extend_from_slice(&b);
    let mut d = MultiGzDecoder::new(Cursor::new(input.clone()));
    assert!(d.last_header().is_none());
    let mut out = Vec::new();
    d.read_to_end(&mut out).unwrap();
    assert_eq!(d.members_decoded(), 2);
    assert_eq!(d.total_in(), input.len() as u64);
    assert_eq!(d.total_out(), 9);
    assert!(d.last_header().is_some());
    assert!(d.error().is_none());
    d.close();
}
