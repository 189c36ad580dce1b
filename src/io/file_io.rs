//! Source and destination resolution.
//!
//! - [`open_src_file`] maps a path string to a buffered reader, handling the
//!   stdin sentinel and rejecting directories.
//! - [`open_dst_file`] maps a path string to a [`DstFile`], handling the
//!   stdout and null sentinels and enforcing the overwrite preference.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use crate::config::INPUT_BUFFER_SIZE;
use crate::displaylevel;
use crate::io::prefs::Prefs;

// ---------------------------------------------------------------------------
// Sentinel strings
// ---------------------------------------------------------------------------

/// Read from standard input.
pub const STDIN_MARK: &str = "-";

/// Write to standard output.
pub const STDOUT_MARK: &str = "stdout";

/// Discard output.
#[cfg(windows)]
pub const NUL_MARK: &str = "nul";
#[cfg(not(windows))]
pub const NUL_MARK: &str = "/dev/null";

#[inline]
pub fn is_stdin(s: &str) -> bool {
    s == STDIN_MARK
}

#[inline]
pub fn is_stdout(s: &str) -> bool {
    s == STDOUT_MARK
}

#[inline]
pub fn is_dev_null(s: &str) -> bool {
    s == NUL_MARK
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Open `path` for buffered reading. Directories are refused with
/// [`io::ErrorKind::InvalidInput`].
pub fn open_src_file(path: &str) -> io::Result<Box<dyn BufRead>> {
    if is_stdin(path) {
        displaylevel!(4, "Using stdin for input\n");
        return Ok(Box::new(BufReader::with_capacity(INPUT_BUFFER_SIZE, io::stdin())));
    }

    if fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false) {
        displaylevel!(1, "mgzcat: {} is a directory -- ignored\n", path);
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{}: is a directory", path),
        ));
    }

    let f = File::open(path)?;
    Ok(Box::new(BufReader::with_capacity(INPUT_BUFFER_SIZE, f)))
}

// ---------------------------------------------------------------------------
// Destination
// ---------------------------------------------------------------------------

/// A write target produced by [`open_dst_file`].
pub struct DstFile {
    inner: Box<dyn Write>,
    pub is_stdout: bool,
    /// A regular file was created on disk.
    pub is_regular: bool,
}

impl Write for DstFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Open a destination for writing.
///
/// Without `prefs.overwrite` an existing file is left alone and the call
/// fails with [`io::ErrorKind::AlreadyExists`].
pub fn open_dst_file(path: &str, prefs: &Prefs) -> io::Result<DstFile> {
    if is_stdout(path) {
        displaylevel!(4, "Using stdout for output\n");
        return Ok(DstFile {
            inner: Box::new(io::stdout()),
            is_stdout: true,
            is_regular: false,
        });
    }

    if is_dev_null(path) {
        return Ok(DstFile {
            inner: Box::new(io::sink()),
            is_stdout: false,
            is_regular: false,
        });
    }

    if !prefs.overwrite && Path::new(path).exists() {
        displaylevel!(1, "mgzcat: {} already exists; not overwritten\n", path);
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{}: already exists; not overwritten", path),
        ));
    }

    let f = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    Ok(DstFile {
        inner: Box::new(io::BufWriter::new(f)),
        is_stdout: false,
        is_regular: true,
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
