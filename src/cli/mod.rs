//! Command-line interface for the `mgzcat` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`constants`] | Program identity strings and the alias names. |
//! | [`op_mode`]   | `OpMode`: what the binary should do with its inputs. |
//! | [`init`]      | `CliInit`: defaults derived from the binary name (`mgunzip` alias). |
//! | [`args`]      | `ParsedArgs`: clap-derived flags resolved into preferences and a mode. |
//!
//! Typical call sequence: `detect_alias` → `parse_args` → dispatch to the I/O layer.

pub mod args;
pub mod constants;
pub mod init;
pub mod op_mode;
