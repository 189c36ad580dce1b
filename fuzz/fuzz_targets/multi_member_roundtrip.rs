#![no_main]
use std::io::{Read, Write};

use flate2::write::GzEncoder;
use flate2::Compression;
use libfuzzer_sys::fuzz_target;
use multigz::MultiGzDecoder;

fuzz_target!(|data: &[u8]| {
    // Split the input into members at every 0xff byte, compress each one,
    // and check the concatenation decodes back to the original bytes.
    let mut stream = Vec::new();
    let mut members = 0u64;
    for part in data.split(|&b| b == 0xff) {
        let mut enc = GzEncoder::new(Vec::new(), Compression::new(u32::from(members as u8 % 10)));
        enc.write_all(part).unwrap();
        stream.extend_from_slice(&enc.finish().unwrap());
        members += 1;
    }
    let expected: Vec<u8> = data.iter().copied().filter(|&b| b != 0xff).collect();

    let mut decoder = MultiGzDecoder::new(&stream[..]);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).expect("self-produced stream must decode");

    assert_eq!(out, expected);
    assert_eq!(decoder.members_decoded(), members);
    assert_eq!(decoder.total_in(), stream.len() as u64);
});
