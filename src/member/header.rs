//! Member header parsing.
//!
//! [`read_header`] consumes one RFC 1952 member header from a
//! [`ByteCursor`] and leaves the cursor on the first byte of the raw DEFLATE
//! payload. Every error is located at the byte that caused it:
//!
//! | Failure | Offset reported |
//! |---------|-----------------|
//! | magic mismatch | member start |
//! | CM ≠ 8 | member start + 2 |
//! | reserved FLG bits | member start + 3 |
//! | FEXTRA subfield overruns XLEN | first byte of XLEN |
//! | source ends early | first missing byte |
//! | FHCRC mismatch | first byte of the CRC16 field |

use std::borrow::Cow;
use std::io::BufRead;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::cursor::ByteCursor;
use crate::displaylevel;
use crate::error::{ErrorKind, GzError, HeaderDefect};
use crate::member::types::{Flags, CM_DEFLATE, FIXED_HEADER_SIZE, FLG_OFFSET, GZIP_MAGIC};

// ─────────────────────────────────────────────────────────────────────────────
// HeaderCrcPolicy
// ─────────────────────────────────────────────────────────────────────────────

/// What to do with the optional FHCRC field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderCrcPolicy {
    /// Parse and store the field, never compare it.
    #[default]
    Ignore,
    /// Compare, and report a mismatch at display level 2 without failing.
    Warn,
    /// Compare, and fail with `HeaderChecksum` on mismatch.
    Verify,
}

// ─────────────────────────────────────────────────────────────────────────────
// MemberHeader
// ─────────────────────────────────────────────────────────────────────────────

/// Decoded member header. Everything except `flags` and the method byte is
/// informational and is not interpreted by the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MemberHeader {
    pub flags: Flags,
    /// Always `CM_DEFLATE` for a successfully parsed header.
    pub compression_method: u8,
    /// Seconds since the Unix epoch; 0 means unknown.
    pub modification_time: u32,
    pub extra_flags: u8,
    pub os: u8,
    /// FEXTRA payload, without the XLEN prefix.
    pub extra: Option<Vec<u8>>,
    /// FNAME bytes, without the terminator. ISO 8859-1 per the RFC.
    pub filename: Option<Vec<u8>>,
    /// FCOMMENT bytes, without the terminator.
    pub comment: Option<Vec<u8>>,
    /// Stored FHCRC value.
    pub header_crc16: Option<u16>,
    /// Bytes the header occupied in the stream.
    pub header_len: u64,
}

/// One `SI1 SI2 LEN data` entry of the FEXTRA field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtraSubfield<'a> {
    pub id: [u8; 2],
    pub data: &'a [u8],
}

impl MemberHeader {
    /// Header with no optional fields, as most compressors write it.
    pub fn new() -> Self {
        MemberHeader {
            compression_method: CM_DEFLATE,
            os: 255,
            ..MemberHeader::default()
        }
    }

    /// MTIME as a timestamp, or `None` when the producer left it at 0.
    pub fn mtime(&self) -> Option<SystemTime> {
        match self.modification_time {
            0 => None,
            secs => Some(UNIX_EPOCH + Duration::from_secs(u64::from(secs))),
        }
    }

    /// FNAME decoded for display. Non-UTF-8 bytes are replaced.
    pub fn filename_lossy(&self) -> Option<Cow<'_, str>> {
        self.filename.as_deref().map(String::from_utf8_lossy)
    }

    pub fn comment_lossy(&self) -> Option<Cow<'_, str>> {
        self.comment.as_deref().map(String::from_utf8_lossy)
    }

    /// Split FEXTRA into its subfields.
    ///
    /// Fails when a subfield's LEN runs past the end of the field. An empty
    /// or absent FEXTRA yields an empty list.
    pub fn extra_subfields(&self) -> Result<Vec<ExtraSubfield<'_>>, HeaderDefect> {
        let extra = match &self.extra {
            Some(e) => e.as_slice(),
            None => return Ok(Vec::new()),
        };
        let mut out = Vec::new();
        let mut pos = 0usize;
        while pos < extra.len() {
            if extra.len() - pos < 4 {
                return Err(HeaderDefect::ExtraSubfieldOverrun {
                    xlen: extra.len() as u16,
                    subfield_end: pos + 4,
                });
            }
            let id = [extra[pos], extra[pos + 1]];
            let len = u16::from_le_bytes([extra[pos + 2], extra[pos + 3]]) as usize;
            let end = pos + 4 + len;
            if end > extra.len() {
                return Err(HeaderDefect::ExtraSubfieldOverrun {
                    xlen: extra.len() as u16,
                    subfield_end: end,
                });
            }
            out.push(ExtraSubfield { id, data: &extra[pos + 4..end] });
            pos = end;
        }
        Ok(out)
    }

    /// Serialize the header. FLG is derived from which optional fields are
    /// present (plus FTEXT from `flags`); FHCRC is computed when
    /// `flags` has it set.
    pub fn encode(&self) -> Vec<u8> {
        let mut flg = self.flags.bits() & Flags::TEXT;
        if self.flags.has_header_crc() {
            flg |= Flags::HCRC;
        }
        if self.extra.is_some() {
            flg |= Flags::EXTRA;
        }
        if self.filename.is_some() {
            flg |= Flags::NAME;
        }
        if self.comment.is_some() {
            flg |= Flags::COMMENT;
        }

        let mut out = Vec::with_capacity(FIXED_HEADER_SIZE + 2);
        out.extend_from_slice(&GZIP_MAGIC);
        out.push(self.compression_method);
        out.push(flg);
        out.extend_from_slice(&self.modification_time.to_le_bytes());
        out.push(self.extra_flags);
        out.push(self.os);
        if let Some(extra) = &self.extra {
            out.extend_from_slice(&(extra.len() as u16).to_le_bytes());
            out.extend_from_slice(extra);
        }
        if let Some(name) = &self.filename {
            out.extend_from_slice(name);
            out.push(0);
        }
        if let Some(comment) = &self.comment {
            out.extend_from_slice(comment);
            out.push(0);
        }
        if flg & Flags::HCRC != 0 {
            let crc16 = (crc32fast::hash(&out) & 0xffff) as u16;
            out.extend_from_slice(&crc16.to_le_bytes());
        }
        out
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parse one member header starting at the cursor's current position.
///
/// On success the cursor sits on the first payload byte. On failure the
/// cursor position is unspecified; callers treat the stream as failed.
pub fn read_header<R: BufRead>(
    cursor: &mut ByteCursor<R>,
    crc_policy: HeaderCrcPolicy,
) -> Result<MemberHeader, GzError> {
    let start = cursor.offset();

    cursor.begin_header_crc();
    let fields = read_fields(cursor, start);
    // Stop recording on every path so the payload never feeds the hasher.
    let computed = cursor.end_header_crc().unwrap_or(0);
    let mut header = fields?;

    if header.flags.has_header_crc() {
        let crc_offset = cursor.offset();
        let stored = cursor.read_u16_le()?;
        header.header_crc16 = Some(stored);
        let actual = (computed & 0xffff) as u16;
        if stored != actual {
            match crc_policy {
                HeaderCrcPolicy::Ignore => {}
                HeaderCrcPolicy::Warn => {
                    displaylevel!(
                        2,
                        "warning: header crc16 mismatch at offset {} (stored 0x{:04x}, computed 0x{:04x})\n",
                        crc_offset,
                        stored,
                        actual
                    );
                }
                HeaderCrcPolicy::Verify => {
                    return Err(GzError::new(
                        ErrorKind::HeaderChecksum { expected: stored, actual },
                        crc_offset,
                    ));
                }
            }
        }
    }

    header.header_len = cursor.offset() - start;
    Ok(header)
}

/// Everything up to, but not including, the FHCRC field.
fn read_fields<R: BufRead>(cursor: &mut ByteCursor<R>, start: u64) -> Result<MemberHeader, GzError> {
    // Check the magic one byte at a time so a lone stray byte reads as
    // "not gzip" rather than "truncated".
    if cursor.read_u8()? != GZIP_MAGIC[0] {
        return Err(GzError::new(ErrorKind::NotGzip, start));
    }
    if cursor.read_u8()? != GZIP_MAGIC[1] {
        return Err(GzError::new(ErrorKind::NotGzip, start));
    }

    let cm = cursor.read_u8()?;
    if cm != CM_DEFLATE {
        return Err(GzError::new(ErrorKind::UnsupportedMethod(cm), start + 2));
    }

    let flags = Flags::from_bits(cursor.read_u8()?);
    if flags.reserved_bits() != 0 {
        return Err(GzError::new(
            ErrorKind::MalformedHeader(HeaderDefect::ReservedFlags(flags.bits())),
            start + FLG_OFFSET,
        ));
    }

    let modification_time = cursor.read_u32_le()?;
    let extra_flags = cursor.read_u8()?;
    let os = cursor.read_u8()?;

    let mut xlen_offset = 0;
    let extra = if flags.has_extra() {
        xlen_offset = cursor.offset();
        let xlen = cursor.read_u16_le()?;
        Some(cursor.read_vec(usize::from(xlen))?)
    } else {
        None
    };
    let filename = if flags.has_name() {
        Some(cursor.read_zero_terminated()?)
    } else {
        None
    };
    let comment = if flags.has_comment() {
        Some(cursor.read_zero_terminated()?)
    } else {
        None
    };

    let header = MemberHeader {
        flags,
        compression_method: cm,
        modification_time,
        extra_flags,
        os,
        extra,
        filename,
        comment,
        header_crc16: None,
        header_len: 0,
    };
    header
        .extra_subfields()
        .map_err(|defect| GzError::new(ErrorKind::MalformedHeader(defect), xlen_offset))?;
    Ok(header)
}
