// cli/constants.rs: program identity strings.

pub const PROGRAM_NAME: &str = "mgzcat";

/// Alias that decompresses to files by default, like `gunzip`.
pub const MGUNZIP: &str = "mgunzip";

/// Banner printed at display level 3 and above.
pub fn welcome_message() -> String {
    format!(
        "*** {} v{} {}-bit ***\n",
        PROGRAM_NAME,
        crate::VERSION_STRING,
        std::mem::size_of::<*const ()>() * 8
    )
}
