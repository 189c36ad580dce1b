// config.rs: Compile-time configuration constants.
//
// Runtime knobs live in `DecodeOptions` (library) and `io::prefs::Prefs`
// (file layer); the values here are their defaults plus buffer sizing.

use crate::decoder::{HeaderCrcPolicy, TailPolicy};

// Size of the `BufReader` placed in front of a plain `Read` source.
// Large enough that one refill usually covers a whole member header.
pub const INPUT_BUFFER_SIZE: usize = 64 * 1024;

// Chunk size of the decode-and-write loops in the file layer and of
// member scanning for `--list`.
pub const OUTPUT_CHUNK_SIZE: usize = 32 * 1024;

// Minimum interval between two progress-line refreshes (level 3).
pub const REFRESH_RATE_NS: u64 = 200_000_000;

// What to do with bytes after the last valid member.
// Strict by default: trailing garbage fails the stream.
pub const DEFAULT_TAIL_POLICY: TailPolicy = TailPolicy::Strict;

// Whether FHCRC is checked. Most producers never set it and most consumers
// never look at it, so the default only parses the field.
pub const DEFAULT_HEADER_CRC_POLICY: HeaderCrcPolicy = HeaderCrcPolicy::Ignore;

// Suffix stripped from input names to derive output names.
pub const GZ_EXTENSION: &str = ".gz";

// Default notification level for the CLI (2 = warnings and results).
pub const DISPLAY_LEVEL_DEFAULT: u32 = 2;
