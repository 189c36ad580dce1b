//! Operation mode selection.

/// What the CLI should do with its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpMode {
    /// Decompress every input to stdout, one continuous stream.
    Cat,
    /// Decompress each `name.gz` to `name` (or to `-o OUT`).
    Decompress,
    /// Decode and validate; write nothing.
    Test,
    /// Print the member table.
    List,
    /// Decode as text and print line by line, naming the failing line on error.
    Lines,
}

impl OpMode {
    /// Modes whose output is the decompressed data on stdout.
    pub fn writes_stdout(self) -> bool {
        matches!(self, OpMode::Cat | OpMode::Lines)
    }
}
