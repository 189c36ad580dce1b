// prefs.rs: file-layer preferences.
//
// `Prefs` is a plain value type: the CLI builds one from its flags and hands
// a shared reference to every file operation. Decoder behaviour lives in the
// embedded `DecodeOptions`; the remaining fields only matter once real files
// are involved.

use crate::decoder::{DecodeOptions, HeaderCrcPolicy, TailPolicy};

/// Preferences for [`crate::io::decompress`] operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefs {
    pub decode: DecodeOptions,
    /// Decode and validate only; nothing is written.
    pub test_mode: bool,
    /// Replace an existing destination file.
    pub overwrite: bool,
    /// Keep the source file after a successful decompression.
    pub keep_source: bool,
    /// Set the output file's mtime from the first member's MTIME field.
    pub restore_mtime: bool,
    /// Send every input to stdout instead of a derived file name.
    pub to_stdout: bool,
}

impl Default for Prefs {
    fn default() -> Self {
        Prefs {
            decode: DecodeOptions::default(),
            test_mode: false,
            overwrite: false,
            keep_source: true,
            restore_mtime: false,
            to_stdout: false,
        }
    }
}

impl Prefs {
    pub fn new() -> Self {
        Self::default()
    }

    // Setters return the value stored, the way the CLI layer expects.

    pub fn set_test_mode(&mut self, yes: bool) -> bool {
        self.test_mode = yes;
        self.test_mode
    }

    pub fn set_overwrite(&mut self, yes: bool) -> bool {
        self.overwrite = yes;
        self.overwrite
    }

    pub fn set_keep_source(&mut self, yes: bool) -> bool {
        self.keep_source = yes;
        self.keep_source
    }

    pub fn set_restore_mtime(&mut self, yes: bool) -> bool {
        self.restore_mtime = yes;
        self.restore_mtime
    }

    pub fn set_to_stdout(&mut self, yes: bool) -> bool {
        self.to_stdout = yes;
        self.to_stdout
    }

    pub fn set_tail_policy(&mut self, policy: TailPolicy) -> TailPolicy {
        self.decode.tail_policy = policy;
        self.decode.tail_policy
    }

    pub fn set_header_crc(&mut self, policy: HeaderCrcPolicy) -> HeaderCrcPolicy {
        self.decode.header_crc = policy;
        self.decode.header_crc
    }

    pub fn set_single_member(&mut self, yes: bool) -> bool {
        self.decode.single_member = yes;
        self.decode.single_member
    }
}
