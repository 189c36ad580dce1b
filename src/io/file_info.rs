//! Member listing for the `--list` flag.
//!
//! Walks every member of one or more gzip files, decoding each payload so
//! that the uncompressed sizes are real rather than read from ISIZE, and
//! prints a table: one row per member, then a total per file.
//!
//! Entry points: [`scan_members`] (library) and
//! [`display_members_info`] (CLI).

use std::io::{self, BufRead, Read};
use std::time::SystemTime;

use crate::config::OUTPUT_CHUNK_SIZE;
use crate::decoder::{DecodeOptions, MemberSummary, MultiGzDecoder};
use crate::display::display_level;
use crate::displaylevel;
use crate::io::file_io::{is_stdin, open_src_file};
use crate::member::os_name;

// ---------------------------------------------------------------------------
// MemberInfo
// ---------------------------------------------------------------------------

/// Listing row for one member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    pub index: u64,
    pub start_offset: u64,
    /// Whole member on the wire: header, payload, and footer.
    pub compressed_len: u64,
    pub uncompressed_len: u64,
    pub crc32: u32,
    pub filename: Option<String>,
    pub comment: Option<String>,
    pub mtime: Option<SystemTime>,
    pub os: u8,
}

impl MemberInfo {
    /// Compressed size as a percentage of the uncompressed size.
    pub fn ratio(&self) -> Option<f64> {
        if self.uncompressed_len == 0 {
            None
        } else {
            Some(self.compressed_len as f64 / self.uncompressed_len as f64 * 100.0)
        }
    }
}

impl From<MemberSummary> for MemberInfo {
    fn from(s: MemberSummary) -> Self {
        MemberInfo {
            index: s.index,
            start_offset: s.start_offset,
            compressed_len: s.member_len,
            uncompressed_len: s.uncompressed_len,
            crc32: s.footer.crc32,
            filename: s.header.filename_lossy().map(|n| n.into_owned()),
            comment: s.header.comment_lossy().map(|c| c.into_owned()),
            mtime: s.header.mtime(),
            os: s.header.os,
        }
    }
}

// ---------------------------------------------------------------------------
// scan_members
// ---------------------------------------------------------------------------

/// Decode every member of `reader` and describe each one.
///
/// Fails on the first invalid member, like a plain decode would.
pub fn scan_members<R: BufRead>(reader: R, options: DecodeOptions) -> io::Result<Vec<MemberInfo>> {
    let mut decoder = MultiGzDecoder::from_bufread_with_options(reader, options.record_members(true));
    let mut buf = vec![0u8; OUTPUT_CHUNK_SIZE];
    let mut members = Vec::new();
    loop {
        let n = decoder.read(&mut buf)?;
        members.extend(decoder.take_member_summaries().into_iter().map(MemberInfo::from));
        if n == 0 {
            return Ok(members);
        }
    }
}

// ---------------------------------------------------------------------------
// display_members_info
// ---------------------------------------------------------------------------

/// Human-readable byte count: `1.50M`, `512`, ...
fn to_human(mut size: f64) -> String {
    const UNITS: &[&str] = &["", "K", "M", "G", "T", "P"];
    let mut i = 0usize;
    while size >= 1024.0 && i + 1 < UNITS.len() {
        size /= 1024.0;
        i += 1;
    }
    if i == 0 {
        format!("{}", size as u64)
    } else {
        format!("{:.2}{}", size, UNITS[i])
    }
}

fn format_ratio(info: Option<f64>) -> String {
    match info {
        Some(r) => format!("{:.2}%", r),
        None => "-".to_owned(),
    }
}

fn format_mtime(mtime: Option<SystemTime>) -> String {
    match mtime.and_then(|t| t.duration_since(SystemTime::UNIX_EPOCH).ok()) {
        Some(d) => d.as_secs().to_string(),
        None => "-".to_owned(),
    }
}

/// Print the member table for each of `paths`.
///
/// At display level 3 and above the mtime, OS, and comment columns are
/// added. A file that fails to scan is reported and listing continues;
/// the first error is returned at the end.
pub fn display_members_info(paths: &[&str], options: DecodeOptions) -> io::Result<()> {
    let verbose = display_level() >= 3;
    let mut first_err = None;

    for &path in paths {
        let label = if is_stdin(path) { "stdin" } else { path };
        let members = match open_src_file(path).and_then(|r| scan_members(r, options)) {
            Ok(m) => m,
            Err(e) => {
                displaylevel!(1, "mgzcat: {}: {}\n", label, e);
                first_err.get_or_insert(e);
                continue;
            }
        };

        println!("{}:", label);
        if verbose {
            println!(
                "{:>6} {:>12} {:>11} {:>13} {:>8} {:>10} {:>8} {:>12}  {}",
                "Member", "Offset", "Compressed", "Uncompressed", "Ratio", "CRC32", "OS", "MTime", "Name"
            );
        } else {
            println!(
                "{:>6} {:>12} {:>11} {:>13} {:>8}  {}",
                "Member", "Offset", "Compressed", "Uncompressed", "Ratio", "Name"
            );
        }

        let mut total_c = 0u64;
        let mut total_u = 0u64;
        for m in &members {
            total_c += m.compressed_len;
            total_u += m.uncompressed_len;
            let name = m.filename.as_deref().unwrap_or("-");
            if verbose {
                println!(
                    "{:>6} {:>12} {:>11} {:>13} {:>8} {:>10} {:>8} {:>12}  {}",
                    m.index,
                    m.start_offset,
                    to_human(m.compressed_len as f64),
                    to_human(m.uncompressed_len as f64),
                    format_ratio(m.ratio()),
                    format!("{:08x}", m.crc32),
                    os_name(m.os),
                    format_mtime(m.mtime),
                    name
                );
                if let Some(comment) = &m.comment {
                    println!("{:>8}comment: {}", "", comment);
                }
            } else {
                println!(
                    "{:>6} {:>12} {:>11} {:>13} {:>8}  {}",
                    m.index,
                    m.start_offset,
                    to_human(m.compressed_len as f64),
                    to_human(m.uncompressed_len as f64),
                    format_ratio(m.ratio()),
                    name
                );
            }
        }

        let total_ratio = if total_u == 0 {
            None
        } else {
            Some(total_c as f64 / total_u as f64 * 100.0)
        };
        println!(
            "{:>6} {:>12} {:>11} {:>13} {:>8}",
            members.len(),
            "total",
            to_human(total_c as f64),
            to_human(total_u as f64),
            format_ratio(total_ratio)
        );
    }

    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
