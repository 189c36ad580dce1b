//! Raw DEFLATE adapter.
//!
//! Wraps `miniz_oxide`'s streaming inflater in headerless mode and drives it
//! from a [`ByteCursor`]. The inflater hands back any whole bytes it read
//! past the end-of-block marker, so after [`RawInflater::inflate`] reports
//! `finished` the cursor sits exactly on the first footer byte of the
//! member. That property is what lets the next member be found without any
//! delimiter.

use std::io::BufRead;

use miniz_oxide::inflate::stream::{inflate, InflateState};
use miniz_oxide::{DataFormat, MZError, MZFlush, MZStatus};

use crate::cursor::ByteCursor;
use crate::error::{ErrorKind, GzError};

/// Result of one [`RawInflater::inflate`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InflateStep {
    /// Bytes written into the caller's buffer.
    pub written: usize,
    /// The DEFLATE stream signalled its end; no more output will follow.
    pub finished: bool,
}

/// Single-pass inflater for one member's payload. [`reset`](Self::reset)
/// before reusing it for the next member.
pub struct RawInflater {
    state: Box<InflateState>,
    finished: bool,
    /// Compressed bytes consumed since the last reset.
    total_in: u64,
}

impl Default for RawInflater {
    fn default() -> Self {
        Self::new()
    }
}

impl RawInflater {
    pub fn new() -> Self {
        RawInflater {
            state: InflateState::new_boxed(DataFormat::Raw),
            finished: false,
            total_in: 0,
        }
    }

    pub fn reset(&mut self) {
        self.state = InflateState::new_boxed(DataFormat::Raw);
        self.finished = false;
        self.total_in = 0;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Compressed bytes consumed for the current member.
    pub fn total_in(&self) -> u64 {
        self.total_in
    }

    /// Decompress into `out`, pulling compressed bytes from `cursor`.
    ///
    /// Returns as soon as some output is available or the stream ends.
    /// `written == 0 && !finished` never happens for a non-empty `out`.
    pub fn inflate<R: BufRead>(
        &mut self,
        cursor: &mut ByteCursor<R>,
        out: &mut [u8],
    ) -> Result<InflateStep, GzError> {
        if self.finished || out.is_empty() {
            return Ok(InflateStep { written: 0, finished: self.finished });
        }

        loop {
            let input = cursor.fill_buf()?;
            let eof = input.is_empty();
            let res = inflate(&mut self.state, input, out, MZFlush::None);
            cursor.consume(res.bytes_consumed);
            self.total_in += res.bytes_consumed as u64;

            match res.status {
                Ok(MZStatus::StreamEnd) => {
                    self.finished = true;
                    return Ok(InflateStep { written: res.bytes_written, finished: true });
                }
                Ok(MZStatus::Ok) | Err(MZError::Buf) if res.bytes_written > 0 => {
                    return Ok(InflateStep { written: res.bytes_written, finished: false });
                }
                // The source ran dry before the end-of-block marker.
                Ok(MZStatus::Ok) | Err(MZError::Buf) if eof => {
                    return Err(GzError::new(ErrorKind::Truncated, cursor.offset()));
                }
                // Input consumed, nothing produced yet: keep feeding.
                Ok(MZStatus::Ok) => continue,
                Err(MZError::Buf) => {
                    return Err(GzError::new(
                        ErrorKind::CompressedDataCorrupt("inflater made no progress"),
                        cursor.offset(),
                    ));
                }
                Ok(MZStatus::NeedDict) => {
                    return Err(GzError::new(
                        ErrorKind::CompressedDataCorrupt("preset dictionary requested"),
                        cursor.offset(),
                    ));
                }
                Err(MZError::Data) => {
                    return Err(GzError::new(
                        ErrorKind::CompressedDataCorrupt("invalid deflate stream"),
                        cursor.offset(),
                    ));
                }
                Err(_) => {
                    return Err(GzError::new(
                        ErrorKind::CompressedDataCorrupt("inflater error"),
                        cursor.offset(),
                    ));
                }
            }
        }
    }
}
