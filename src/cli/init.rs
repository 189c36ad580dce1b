//! CLI initialization and binary-alias detection.
//!
//! Installed as `mgunzip` (hard or symbolic link), the binary decompresses
//! to files by default instead of streaming to stdout. [`detect_alias`]
//! inspects `argv[0]` before any flag parsing and returns a [`CliInit`]
//! carrying those defaults; the argument parser layers explicit flags on
//! top.

use std::path::Path;

use crate::cli::constants::MGUNZIP;
use crate::cli::op_mode::OpMode;
use crate::io::prefs::Prefs;

/// Initial CLI state derived from the binary name.
#[derive(Debug, Clone)]
pub struct CliInit {
    pub prefs: Prefs,
    /// Mode used when no mode flag is given.
    pub op_mode: OpMode,
}

/// File stem of `argv0`, so `/usr/bin/mgunzip.exe` yields `mgunzip`.
fn exe_stem(argv0: &str) -> &str {
    Path::new(argv0)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(argv0)
}

/// Detect the default operation mode from `argv[0]`.
pub fn detect_alias(argv0: &str) -> CliInit {
    let op_mode = if exe_stem(argv0) == MGUNZIP {
        OpMode::Decompress
    } else {
        OpMode::Cat
    };
    CliInit {
        prefs: Prefs::default(),
        op_mode,
    }
}
