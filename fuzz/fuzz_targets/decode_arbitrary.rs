#![no_main]
use std::io::Read;

use libfuzzer_sys::fuzz_target;
use multigz::{DecodeOptions, DecoderState, GzError, HeaderCrcPolicy, MultiGzDecoder, TailPolicy};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must never panic. Every error has to carry a GzError
    // whose offset lies inside the input, and the decoder must stay failed.
    let options = DecodeOptions::default()
        .tail_policy(if data.first().map_or(false, |b| b & 1 == 1) {
            TailPolicy::Lenient
        } else {
            TailPolicy::Strict
        })
        .header_crc(HeaderCrcPolicy::Verify);

    let mut decoder = MultiGzDecoder::with_options(data, options);
    let mut buf = [0u8; 4096];
    loop {
        match decoder.read(&mut buf) {
            Ok(0) => {
                assert_eq!(decoder.state(), DecoderState::Exhausted);
                break;
            }
            Ok(_) => {}
            Err(e) => {
                let err = GzError::from_io(&e).expect("decoder errors carry a GzError");
                assert!(err.offset() <= data.len() as u64);
                assert_eq!(decoder.state(), DecoderState::Failed);
                assert!(decoder.read(&mut buf).is_err());
                break;
            }
        }
    }
});
