//! Wire-format constants and the FLG bit set.

// ─────────────────────────────────────────────────────────────────────────────
// Fixed header fields
// ─────────────────────────────────────────────────────────────────────────────

/// ID1 ID2.
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// The only compression method gzip defines.
pub const CM_DEFLATE: u8 = 8;

/// ID1 ID2 CM FLG MTIME(4) XFL OS.
pub const FIXED_HEADER_SIZE: usize = 10;

/// CRC32 + ISIZE.
pub const FOOTER_SIZE: usize = 8;

/// Offset of FLG from the start of a member.
pub const FLG_OFFSET: u64 = 3;

// ─────────────────────────────────────────────────────────────────────────────
// Flags
// ─────────────────────────────────────────────────────────────────────────────

/// The FLG byte of a member header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags(u8);

impl Flags {
    pub const TEXT: u8 = 1 << 0;
    pub const HCRC: u8 = 1 << 1;
    pub const EXTRA: u8 = 1 << 2;
    pub const NAME: u8 = 1 << 3;
    pub const COMMENT: u8 = 1 << 4;
    /// Bits 5–7; must be zero.
    pub const RESERVED: u8 = 0b1110_0000;

    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Flags(bits)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn contains(self, bit: u8) -> bool {
        self.0 & bit == bit
    }

    /// Returns the reserved bits that are set, if any.
    #[inline]
    pub const fn reserved_bits(self) -> u8 {
        self.0 & Self::RESERVED
    }

    pub fn is_text(self) -> bool {
        self.contains(Self::TEXT)
    }

    pub fn has_header_crc(self) -> bool {
        self.contains(Self::HCRC)
    }

    pub fn has_extra(self) -> bool {
        self.contains(Self::EXTRA)
    }

    pub fn has_name(self) -> bool {
        self.contains(Self::NAME)
    }

    pub fn has_comment(self) -> bool {
        self.contains(Self::COMMENT)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// OS byte
// ─────────────────────────────────────────────────────────────────────────────

/// Human-readable name for the OS byte, as listed in RFC 1952 §2.3.1.
pub fn os_name(os: u8) -> &'static str {
    match os {
        0 => "FAT",
        1 => "Amiga",
        2 => "VMS",
        3 => "Unix",
        4 => "VM/CMS",
        5 => "Atari TOS",
        6 => "HPFS",
        7 => "Macintosh",
        8 => "Z-System",
        9 => "CP/M",
        10 => "TOPS-20",
        11 => "NTFS",
        12 => "QDOS",
        13 => "Acorn RISCOS",
        255 => "unknown",
        _ => "undefined",
    }
}
