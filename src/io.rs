//! File-level operations built on [`crate::decoder::MultiGzDecoder`].
//!
//! This module assembles the I/O sub-modules and re-exports the symbols
//! consumed by the CLI and library users.

pub mod decompress;
pub mod file_info;
pub mod file_io;
pub mod prefs;

// ── Core type re-exports ─────────────────────────────────────────────────────
pub use decompress::DecompressStats;
pub use file_info::MemberInfo;
pub use prefs::Prefs;

// ── Special I/O sentinels ────────────────────────────────────────────────────
pub use file_io::{NUL_MARK, STDIN_MARK, STDOUT_MARK};

// ── Decompression ────────────────────────────────────────────────────────────
pub use decompress::{decompress_filename, decompress_multiple_filenames, decompress_stream};

// ── Listing (--list) ─────────────────────────────────────────────────────────
pub use file_info::{display_members_info, scan_members};
