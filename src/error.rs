//! Error taxonomy for gzip decoding.
//!
//! Every failure carries three pieces of location data:
//! - the [`ErrorKind`] (what went wrong),
//! - the absolute byte offset in the multi-member stream where it was
//!   detected,
//! - the 0-based index of the member being processed, when one was.
//!
//! [`GzError`] converts into [`std::io::Error`] so it can travel through
//! `Read::read`; [`GzError::from_io`] recovers the typed value on the other
//! side.

use core::fmt;
use std::io;

// ─────────────────────────────────────────────────────────────────────────────
// Error details
// ─────────────────────────────────────────────────────────────────────────────

/// Why a member header was rejected as structurally malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderDefect {
    /// One or more of FLG bits 5–7 is set; holds the full FLG byte.
    ReservedFlags(u8),
    /// An FEXTRA subfield declares more bytes than XLEN leaves room for.
    ExtraSubfieldOverrun { xlen: u16, subfield_end: usize },
}

/// Which footer field disagreed with the decoded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegrityFailure {
    /// Stored CRC32 vs. CRC32 of the bytes actually produced.
    CrcMismatch { expected: u32, actual: u32 },
    /// Stored ISIZE vs. produced byte count mod 2^32.
    SizeMismatch { expected: u32, actual: u32 },
}

// ─────────────────────────────────────────────────────────────────────────────
// ErrorKind
// ─────────────────────────────────────────────────────────────────────────────

/// Classification of a decoding failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Magic bytes mismatch where a member was expected.
    NotGzip,
    /// CM byte is not 8 (DEFLATE); holds the byte found.
    UnsupportedMethod(u8),
    /// Reserved flag bits set, or inconsistent length fields.
    MalformedHeader(HeaderDefect),
    /// Source ended mid-field, mid-header, mid-payload or mid-footer.
    Truncated,
    /// The inflater rejected the compressed payload.
    CompressedDataCorrupt(&'static str),
    /// Footer CRC32 or ISIZE mismatch.
    IntegrityCheckFailed(IntegrityFailure),
    /// FHCRC mismatch (only raised under `HeaderCrcPolicy::Verify`).
    HeaderChecksum { expected: u16, actual: u16 },
    /// The underlying source failed; not a format error.
    Io { kind: io::ErrorKind, message: String },
}

impl ErrorKind {
    /// Short stable identifier for the kind, used in CLI diagnostics.
    pub fn error_name(&self) -> &'static str {
        match self {
            ErrorKind::NotGzip => "not_gzip",
            ErrorKind::UnsupportedMethod(_) => "unsupported_method",
            ErrorKind::MalformedHeader(_) => "malformed_header",
            ErrorKind::Truncated => "truncated",
            ErrorKind::CompressedDataCorrupt(_) => "compressed_data_corrupt",
            ErrorKind::IntegrityCheckFailed(_) => "integrity_check_failed",
            ErrorKind::HeaderChecksum { .. } => "header_checksum",
            ErrorKind::Io { .. } => "io",
        }
    }

    /// The `io::ErrorKind` this failure maps to when surfaced through `Read`.
    pub fn io_kind(&self) -> io::ErrorKind {
        match self {
            ErrorKind::Truncated => io::ErrorKind::UnexpectedEof,
            ErrorKind::Io { kind, .. } => *kind,
            _ => io::ErrorKind::InvalidData,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotGzip => f.write_str("not in gzip format"),
            ErrorKind::UnsupportedMethod(cm) => {
                write!(f, "unsupported compression method {cm} (expected 8)")
            }
            ErrorKind::MalformedHeader(HeaderDefect::ReservedFlags(flg)) => {
                write!(f, "malformed header: reserved flag bits set (FLG=0x{flg:02x})")
            }
            ErrorKind::MalformedHeader(HeaderDefect::ExtraSubfieldOverrun { xlen, subfield_end }) => {
                write!(
                    f,
                    "malformed header: extra subfield ends at {subfield_end}, past XLEN {xlen}"
                )
            }
            ErrorKind::Truncated => f.write_str("unexpected end of input"),
            ErrorKind::CompressedDataCorrupt(detail) => {
                write!(f, "invalid compressed data: {detail}")
            }
            ErrorKind::IntegrityCheckFailed(IntegrityFailure::CrcMismatch { expected, actual }) => {
                write!(
                    f,
                    "crc32 mismatch: footer says 0x{expected:08x}, data is 0x{actual:08x}"
                )
            }
            ErrorKind::IntegrityCheckFailed(IntegrityFailure::SizeMismatch { expected, actual }) => {
                write!(f, "length mismatch: footer says {expected}, data is {actual}")
            }
            ErrorKind::HeaderChecksum { expected, actual } => {
                write!(
                    f,
                    "header crc16 mismatch: header says 0x{expected:04x}, computed 0x{actual:04x}"
                )
            }
            ErrorKind::Io { message, .. } => write!(f, "read error: {message}"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GzError
// ─────────────────────────────────────────────────────────────────────────────

/// A located decoding failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GzError {
    kind: ErrorKind,
    offset: u64,
    member: Option<u64>,
}

impl GzError {
    pub fn new(kind: ErrorKind, offset: u64) -> Self {
        GzError { kind, offset, member: None }
    }

    /// Attach the index of the member being processed.
    pub fn in_member(mut self, member: u64) -> Self {
        self.member = Some(member);
        self
    }

    /// Wrap a failure of the underlying source.
    pub fn io(err: &io::Error, offset: u64) -> Self {
        GzError::new(
            ErrorKind::Io { kind: err.kind(), message: err.to_string() },
            offset,
        )
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Absolute offset in the whole input where the problem was detected.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// 0-based member index, if the failure happened inside a member.
    pub fn member(&self) -> Option<u64> {
        self.member
    }

    /// Recover a `GzError` that was surfaced through `Read::read`.
    pub fn from_io(err: &io::Error) -> Option<&GzError> {
        err.get_ref()?.downcast_ref::<GzError>()
    }
}

impl fmt::Display for GzError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.kind, self.offset)?;
        if let Some(m) = self.member {
            write!(f, " (member #{m})")?;
        }
        Ok(())
    }
}

impl std::error::Error for GzError {}

impl From<GzError> for io::Error {
    fn from(err: GzError) -> io::Error {
        io::Error::new(err.kind.io_kind(), err)
    }
}
