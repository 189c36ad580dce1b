//! File-level decompression.
//!
//! Three entry points, from smallest to largest:
//!
//! - [`decompress_stream`] pumps any buffered source through a
//!   [`MultiGzDecoder`] into any writer.
//! - [`decompress_filename`] resolves a source and destination path
//!   (sentinels included), then applies the post-success file actions:
//!   mtime restoration and source removal.
//! - [`decompress_multiple_filenames`] runs [`decompress_filename`] over a
//!   list, deriving output names by stripping [`GZ_EXTENSION`].
//!
//! Output already written when an error is detected is kept; nothing is
//! rolled back.

use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::time::{Duration, Instant, SystemTime};

use crate::config::{GZ_EXTENSION, OUTPUT_CHUNK_SIZE, REFRESH_RATE_NS};
use crate::decoder::MultiGzDecoder;
use crate::display::display_level;
use crate::displaylevel;
use crate::io::file_io::{is_stdin, open_dst_file, open_src_file, NUL_MARK, STDOUT_MARK};
use crate::io::prefs::Prefs;

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Totals for one or more decompressed inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecompressStats {
    /// Members validated.
    pub members: u64,
    /// Compressed bytes consumed.
    pub compressed_bytes: u64,
    /// Decompressed bytes produced (written, unless in test mode).
    pub decompressed_bytes: u64,
    /// MTIME of the first member, when it carried one.
    pub first_mtime: Option<SystemTime>,
}

impl DecompressStats {
    fn absorb(&mut self, other: &DecompressStats) {
        self.members += other.members;
        self.compressed_bytes += other.compressed_bytes;
        self.decompressed_bytes += other.decompressed_bytes;
        if self.first_mtime.is_none() {
            self.first_mtime = other.first_mtime;
        }
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Limits progress-line refreshes to one per [`REFRESH_RATE_NS`].
struct ProgressGate {
    interval: Duration,
    last: Option<Instant>,
}

impl ProgressGate {
    fn new() -> Self {
        ProgressGate { interval: Duration::from_nanos(REFRESH_RATE_NS), last: None }
    }

    /// `true` when a refresh is due at `now`; the first call always is.
    fn ready(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

// ---------------------------------------------------------------------------
// decompress_stream
// ---------------------------------------------------------------------------

/// Decode every member of `src` into `dst`.
///
/// In test mode the decoded bytes are counted and discarded. Format errors
/// come back as `io::Error`s carrying a [`crate::GzError`].
pub fn decompress_stream<R: BufRead, W: Write>(
    src: R,
    dst: &mut W,
    prefs: &Prefs,
) -> io::Result<DecompressStats> {
    let mut decoder = MultiGzDecoder::from_bufread_with_options(src, prefs.decode);
    let mut buf = vec![0u8; OUTPUT_CHUNK_SIZE];
    let mut first_mtime = None;
    let mut first_seen = false;
    let mut progress = ProgressGate::new();

    loop {
        let n = decoder.read(&mut buf)?;
        if !first_seen {
            if let Some(header) = decoder.last_header() {
                first_mtime = header.mtime();
                first_seen = true;
            }
        }
        if n == 0 {
            break;
        }
        if !prefs.test_mode {
            dst.write_all(&buf[..n])?;
        }
        if display_level() >= 3 && progress.ready(Instant::now()) {
            displaylevel!(3, "\rDecoded : {} MiB   ", decoder.total_out() >> 20);
        }
    }
    dst.flush()?;
    displaylevel!(3, "\r{:79}\r", "");

    Ok(DecompressStats {
        members: decoder.members_decoded(),
        compressed_bytes: decoder.total_in(),
        decompressed_bytes: decoder.total_out(),
        first_mtime,
    })
}

// ---------------------------------------------------------------------------
// decompress_filename
// ---------------------------------------------------------------------------

fn restore_mtime(dst: &str, mtime: SystemTime) {
    let ft = filetime::FileTime::from_system_time(mtime);
    if let Err(e) = filetime::set_file_mtime(dst, ft) {
        displaylevel!(2, "mgzcat: {}: cannot set modification time: {}\n", dst, e);
    }
}

/// Decompress `src` into `dst`.
///
/// `src` may be [`STDIN_MARK`](crate::io::STDIN_MARK); `dst` may be
/// [`STDOUT_MARK`] or [`NUL_MARK`]. The destination is only created once the
/// source has opened. In test mode `dst` is ignored.
pub fn decompress_filename(src: &str, dst: &str, prefs: &Prefs) -> io::Result<DecompressStats> {
    let input = open_src_file(src)?;
    let dst = if prefs.test_mode { NUL_MARK } else { dst };
    let mut output = open_dst_file(dst, prefs)?;

    let stats = decompress_stream(input, &mut output, prefs)?;
    let (is_regular, to_stdout) = (output.is_regular, output.is_stdout);
    drop(output);

    if is_regular {
        if prefs.restore_mtime {
            if let Some(mtime) = stats.first_mtime {
                restore_mtime(dst, mtime);
            }
        }
        if !prefs.keep_source && !is_stdin(src) {
            fs::remove_file(src)?;
            displaylevel!(4, "mgzcat: removed {}\n", src);
        }
    }

    let label = if is_stdin(src) { "stdin" } else { src };
    if prefs.test_mode {
        displaylevel!(2, "{:<20} : OK ({} members, {} bytes)\n", label, stats.members, stats.decompressed_bytes);
    } else if !to_stdout {
        displaylevel!(2, "{:<20} : decoded {} bytes\n", label, stats.decompressed_bytes);
    }
    Ok(stats)
}

// ---------------------------------------------------------------------------
// decompress_multiple_filenames
// ---------------------------------------------------------------------------

/// Output name for `src`, or `None` when it lacks the `.gz` suffix.
pub fn output_filename(src: &str) -> Option<&str> {
    src.strip_suffix(GZ_EXTENSION).filter(|stem| !stem.is_empty())
}

/// Decompress every file in `srcs`.
///
/// With `prefs.to_stdout` (or in test mode) all outputs go to the same
/// stream; otherwise each `name.gz` becomes `name`. A failing file is
/// reported and the rest are still processed; the returned error then
/// summarizes the failures.
pub fn decompress_multiple_filenames(srcs: &[&str], prefs: &Prefs) -> io::Result<DecompressStats> {
    let mut total = DecompressStats::default();
    let mut failed = 0usize;
    let mut skipped = 0usize;

    for &src in srcs {
        let dst = if prefs.to_stdout || prefs.test_mode {
            STDOUT_MARK
        } else {
            match output_filename(src) {
                Some(stem) => stem,
                None => {
                    displaylevel!(
                        1,
                        "mgzcat: {}: unknown suffix (expected {}); ignored\n",
                        src,
                        GZ_EXTENSION
                    );
                    skipped += 1;
                    continue;
                }
            }
        };

        match decompress_filename(src, dst, prefs) {
            Ok(stats) => total.absorb(&stats),
            Err(e) => {
                displaylevel!(1, "mgzcat: {}: {}\n", src, e);
                failed += 1;
            }
        }
    }

    if failed + skipped > 0 {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("{} file(s) failed; {} file(s) skipped", failed, skipped),
        ));
    }
    Ok(total)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
