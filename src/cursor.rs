//! Sequential byte cursor over a buffered source.
//!
//! [`ByteCursor`] is the only thing in the crate that touches the underlying
//! `BufRead`. It keeps an exact count of consumed bytes so every error can be
//! located, and it can optionally feed consumed bytes into a CRC32 so the
//! header parser can check FHCRC without buffering the header.
//!
//! All multi-byte integers in the gzip format are little-endian; the cursor
//! exposes no big-endian readers.

use std::io::{self, BufRead};

use crate::error::{ErrorKind, GzError};

pub struct ByteCursor<R> {
    inner: R,
    /// Bytes consumed from `inner` since construction.
    offset: u64,
    /// Running CRC32 of consumed bytes while a header is being parsed.
    header_crc: Option<crc32fast::Hasher>,
}

impl<R: BufRead> ByteCursor<R> {
    pub fn new(inner: R) -> Self {
        ByteCursor { inner, offset: 0, header_crc: None }
    }

    /// Absolute offset of the next unread byte.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    // ─────────────────────────────────────────────────────────────────────
    // Raw buffer access (used by the inflater)
    // ─────────────────────────────────────────────────────────────────────

    /// Return the currently buffered bytes, refilling if empty.
    /// An empty slice means the source is exhausted.
    pub fn fill_buf(&mut self) -> Result<&[u8], GzError> {
        loop {
            match self.inner.fill_buf() {
                Ok(_) => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(GzError::io(&e, self.offset)),
            }
        }
        // Second call returns the already-filled buffer without I/O.
        self.inner
            .fill_buf()
            .map_err(|e| GzError::io(&e, self.offset))
    }

    /// Mark `amt` buffered bytes as consumed.
    pub fn consume(&mut self, amt: usize) {
        if amt == 0 {
            return;
        }
        self.inner.consume(amt);
        self.offset += amt as u64;
    }

    /// `true` when no more bytes can be read. Does not consume anything.
    pub fn is_at_eof(&mut self) -> Result<bool, GzError> {
        Ok(self.fill_buf()?.is_empty())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Field readers
    // ─────────────────────────────────────────────────────────────────────

    /// Fill `buf` completely or fail with `Truncated` at the offset where
    /// the source ran dry. Bytes read before that point stay consumed.
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), GzError> {
        let mut filled = 0;
        while filled < buf.len() {
            let avail = self.fill_buf()?;
            if avail.is_empty() {
                return Err(GzError::new(ErrorKind::Truncated, self.offset));
            }
            let n = avail.len().min(buf.len() - filled);
            buf[filled..filled + n].copy_from_slice(&avail[..n]);
            self.consume(n);
            self.record(&buf[filled..filled + n]);
            filled += n;
        }
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8, GzError> {
        let mut b = [0u8; 1];
        self.read_exact(&mut b)?;
        Ok(b[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, GzError> {
        let mut b = [0u8; 2];
        self.read_exact(&mut b)?;
        Ok(u16::from_le_bytes(b))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, GzError> {
        let mut b = [0u8; 4];
        self.read_exact(&mut b)?;
        Ok(u32::from_le_bytes(b))
    }

    /// Read `len` bytes into a fresh vector.
    pub fn read_vec(&mut self, len: usize) -> Result<Vec<u8>, GzError> {
        let mut v = vec![0u8; len];
        self.read_exact(&mut v)?;
        Ok(v)
    }

    /// Read up to and including the next 0x00 byte. The terminator is
    /// consumed but not returned.
    pub fn read_zero_terminated(&mut self) -> Result<Vec<u8>, GzError> {
        let mut out = Vec::new();
        loop {
            let avail = self.fill_buf()?;
            if avail.is_empty() {
                return Err(GzError::new(ErrorKind::Truncated, self.offset));
            }
            match avail.iter().position(|&b| b == 0) {
                Some(nul) => {
                    let start = out.len();
                    out.extend_from_slice(&avail[..nul]);
                    self.consume(nul + 1);
                    self.record(&out[start..]);
                    self.record(&[0]);
                    return Ok(out);
                }
                None => {
                    let start = out.len();
                    out.extend_from_slice(avail);
                    self.consume(out.len() - start);
                    self.record(&out[start..]);
                }
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Header CRC recording
    // ─────────────────────────────────────────────────────────────────────

    /// Start feeding every consumed byte into a fresh CRC32.
    pub fn begin_header_crc(&mut self) {
        self.header_crc = Some(crc32fast::Hasher::new());
    }

    /// Feed bytes a field reader just consumed into the header CRC.
    /// `consume` itself never records, so inflater input is never hashed.
    fn record(&mut self, bytes: &[u8]) {
        if let Some(crc) = self.header_crc.as_mut() {
            crc.update(bytes);
        }
    }

    /// Stop recording and return the CRC32 of the bytes seen since
    /// [`begin_header_crc`](Self::begin_header_crc).
    pub fn end_header_crc(&mut self) -> Option<u32> {
        self.header_crc.take().map(|h| h.finalize())
    }
}
