//! Notification level and the `displaylevel!` family of macros.
//!
//! The library and the binary share one process-wide level:
//!
//! | Level | Meaning |
//! |-------|---------|
//! | 0 | silent |
//! | 1 | errors only |
//! | 2 | warnings and results (default) |
//! | 3 | progress |
//! | 4 | verbose: one line per member boundary |
//!
//! Everything goes to stderr so decompressed data on stdout stays clean.
//! The level is diagnostic only; it never changes what a decoder emits.

use std::io::Write;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::config::DISPLAY_LEVEL_DEFAULT;

pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(DISPLAY_LEVEL_DEFAULT);

/// Returns the current display level.
#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Sets the display level.
#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

/// Write `msg` to stderr if the current level is at least `level`.
///
/// Flushes stderr at verbose levels so member-boundary traces interleave
/// correctly with any output the caller writes itself.
pub fn display_at(level: u32, msg: &str) {
    if display_level() >= level {
        let mut err = std::io::stderr().lock();
        let _ = err.write_all(msg.as_bytes());
        if display_level() >= 4 {
            let _ = err.flush();
        }
    }
}

/// Print to stderr when the display level is at least `$level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::display::display_level() >= $level {
            $crate::display::display_at($level, &format!($($arg)*));
        }
    };
}
