//! Member footer: CRC32 and ISIZE of the decompressed payload.

use std::io::BufRead;

use crate::cursor::ByteCursor;
use crate::error::{ErrorKind, GzError, IntegrityFailure};
use crate::member::types::FOOTER_SIZE;

/// The 8 bytes that close every member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberFooter {
    pub crc32: u32,
    /// Uncompressed length mod 2^32.
    pub isize: u32,
}

impl MemberFooter {
    /// Compare against what the decoder actually produced.
    ///
    /// The CRC is checked first; a payload that fails both reports the CRC
    /// mismatch since it is the stronger signal.
    pub fn validate(&self, actual_crc: u32, produced: u64) -> Result<(), IntegrityFailure> {
        if self.crc32 != actual_crc {
            return Err(IntegrityFailure::CrcMismatch {
                expected: self.crc32,
                actual: actual_crc,
            });
        }
        let actual_size = produced as u32; // mod 2^32
        if self.isize != actual_size {
            return Err(IntegrityFailure::SizeMismatch {
                expected: self.isize,
                actual: actual_size,
            });
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> [u8; FOOTER_SIZE] {
        let mut out = [0u8; FOOTER_SIZE];
        out[..4].copy_from_slice(&self.crc32.to_le_bytes());
        out[4..].copy_from_slice(&self.isize.to_le_bytes());
        out
    }
}

/// Read CRC32 then ISIZE, both little-endian.
pub fn read_footer<R: BufRead>(cursor: &mut ByteCursor<R>) -> Result<MemberFooter, GzError> {
    let crc32 = cursor.read_u32_le()?;
    let isize = cursor.read_u32_le()?;
    Ok(MemberFooter { crc32, isize })
}

/// Read the footer and validate it in one step. Integrity failures are
/// located at the first footer byte.
pub fn read_and_validate_footer<R: BufRead>(
    cursor: &mut ByteCursor<R>,
    actual_crc: u32,
    produced: u64,
) -> Result<MemberFooter, GzError> {
    let at = cursor.offset();
    let footer = read_footer(cursor)?;
    footer
        .validate(actual_crc, produced)
        .map_err(|f| GzError::new(ErrorKind::IntegrityCheckFailed(f), at))?;
    Ok(footer)
}
