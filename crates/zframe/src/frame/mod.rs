//! Zstandard frame format.
//!
//! Frame header, block header and skippable frame codecs (RFC 8878).
//!
//! ## Frame Structure
//!
//! ```text
//! +-------------------+
//! | Magic_Number      | 4 bytes (0xFD2FB528)
//! +-------------------+
//! | Frame_Header      | 2-14 bytes
//! +-------------------+
//! | Data_Block(s)     | 3-byte header + content each
//! +-------------------+
//! | Content_Checksum  | 0-4 bytes (optional)
//! +-------------------+
//! ```
//!
//! ## References
//!
//! - [RFC 8878 Section 3.1](https://datatracker.ietf.org/doc/html/rfc8878#section-3.1)

mod block;
#[cfg(feature = "xxhash")]
mod checksum;
mod header;
mod skippable;

pub use block::{BlockHeader, BlockType};
#[cfg(feature = "xxhash")]
pub use checksum::Xxh64Checksum;
pub use header::{FrameDescriptor, FrameHeader, FrameHeaderBuilder, WindowDescriptor};
pub use skippable::{is_skippable_magic, SkippableFrame};

/// Zstd magic number (little-endian: 0xFD2FB528).
pub const ZSTD_MAGIC: u32 = 0xFD2FB528;

/// Skippable frame magic range: 0x184D2A50 to 0x184D2A5F.
pub const SKIPPABLE_MAGIC_LOW: u32 = 0x184D2A50;
pub const SKIPPABLE_MAGIC_HIGH: u32 = 0x184D2A5F;

/// Content checksum length in bytes.
pub const CHECKSUM_SIZE: usize = 4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_constants() {
        assert_eq!(ZSTD_MAGIC.to_le_bytes(), [0x28, 0xB5, 0x2F, 0xFD]);
        assert_eq!(SKIPPABLE_MAGIC_HIGH - SKIPPABLE_MAGIC_LOW, 15);
    }
}
