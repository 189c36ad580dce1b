// multigz: streaming decoder for concatenated gzip members (RFC 1952)

pub mod config;
pub mod display;
pub mod error;
pub mod cursor;
pub mod member;
pub mod inflate;
pub mod decoder;
pub mod io;
pub mod cli;

// ── Version constants ─────────────────────────────────────────────────────────
pub const VERSION_MAJOR: u32 = 0;
pub const VERSION_MINOR: u32 = 1;
pub const VERSION_RELEASE: u32 = 0;
pub const VERSION_NUMBER: u32 = VERSION_MAJOR * 100 * 100 + VERSION_MINOR * 100 + VERSION_RELEASE;
pub const VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

/// Runtime version number, `major * 10000 + minor * 100 + release`.
pub fn version_number() -> u32 {
    VERSION_NUMBER
}

pub fn version_string() -> &'static str {
    VERSION_STRING
}

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use decoder::{DecodeOptions, DecoderState, HeaderCrcPolicy, MemberSummary, MultiGzDecoder, TailPolicy};
pub use error::{ErrorKind, GzError, HeaderDefect, IntegrityFailure};
pub use member::{MemberFooter, MemberHeader};
