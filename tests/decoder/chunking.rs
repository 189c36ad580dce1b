// Output must not depend on how the caller or the source slices the bytes.

use std::io::{BufReader, Cursor, Read};

use multigz::MultiGzDecoder;

use crate::gz;

fn sample_input() -> (Vec<u8>, Vec<u8>) {
    let parts: [&[u8]; 4] = [
        b"11 12\n21 22\n",
        b"",
        &[0xabu8; 70_000],
        b"31 32\n41 42\n",
    ];
    let input = parts.iter().flat_map(|p| gz(p)).collect();
    (input, parts.concat())
}

fn read_in_chunks<R: Read>(mut r: R, chunk: usize) -> Vec<u8> {
    let mut out = Vec::new();
    let mut buf = vec![0u8; chunk];
    loop {
        let n = r.read(&mut buf).unwrap();
        if n == 0 {
            return out;
        }
        out.extend_from_slice(&buf[..n]);
    }
}

#[test]
fn caller_buffer_size_does_not_matter() {
    let (input, expected) = sample_input();
    for chunk in [1usize, 2, 7, 64, 4096, 1 << 20] {
        let d = MultiGzDecoder::new(Cursor::new(input.clone()));
        assert_eq!(read_in_chunks(d, chunk), expected, "chunk {}", chunk);
    }
}

#[test]
fn source_buffer_size_does_not_matter() {
    let (input, expected) = sample_input();
    for cap in [1usize, 3, 10, 257] {
        let src = BufReader::with_capacity(cap, Cursor::new(input.clone()));
        let d = MultiGzDecoder::from_bufread(src);
        assert_eq!(read_in_chunks(d, 999), expected, "capacity {}", cap);
    }
}

/// A source that hands out at most one byte per read.
struct Trickle {
    data: Vec<u8>,
    pos: usize,
}

impl Read for Trickle {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.pos >= self.data.len() || buf.is_empty() {
            return Ok(0);
        }
        buf[0] = self.data[self.pos];
        self.pos += 1;
        Ok(1)
    }
}

#[test]
fn one_byte_source_reads() {
    let (input, expected) = sample_input();
    let d = MultiGzDecoder::new(Trickle { data: input, pos: 0 });
    assert_eq!(read_in_chunks(d, 333), expected);
}
