//! Gzip member structure: header, footer, and wire constants.

pub mod footer;
pub mod header;
pub mod types;

pub use footer::{read_and_validate_footer, read_footer, MemberFooter};
pub use header::{read_header, ExtraSubfield, HeaderCrcPolicy, MemberHeader};
pub use types::{os_name, Flags, CM_DEFLATE, FIXED_HEADER_SIZE, FOOTER_SIZE, GZIP_MAGIC};
