//! Skippable frames.
//!
//! ```text
//! +-------------------+
//! | Magic_Number      | 4 bytes (0x184D2A50 - 0x184D2A5F)
//! +-------------------+
//! | Frame_Size        | 4 bytes (little-endian)
//! +-------------------+
//! | User_Data         | Frame_Size bytes, never interpreted
//! +-------------------+
//! ```

use super::{SKIPPABLE_MAGIC_HIGH, SKIPPABLE_MAGIC_LOW};
use crate::le::read_u32;
use std::ops::Range;
use zframe_core::{Error, Result};

/// Whether `magic` identifies a skippable frame. All 16 values are equivalent.
#[inline]
pub fn is_skippable_magic(magic: u32) -> bool {
    (SKIPPABLE_MAGIC_LOW..=SKIPPABLE_MAGIC_HIGH).contains(&magic)
}

/// A recognized skippable frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippableFrame {
    /// The magic number the frame was written with.
    pub magic: u32,
    /// Declared payload length.
    pub frame_size: u32,
}

impl SkippableFrame {
    /// Magic number plus frame size field.
    pub const HEADER_SIZE: usize = 8;

    /// Read the skippable frame header at the start of `data`.
    ///
    /// Fails with [`Error::MalformedMagic`] when the magic is outside the
    /// skippable range and [`Error::TruncatedInput`] when the declared payload
    /// runs past the end of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let magic = read_u32(data, "skippable frame magic")?;
        if !is_skippable_magic(magic) {
            return Err(Error::MalformedMagic { magic, offset: 0 });
        }
        let frame_size = read_u32(&data[4..], "skippable frame size")?;

        let frame = Self { magic, frame_size };
        if data.len() < frame.total_size() {
            return Err(Error::truncated(
                "skippable frame payload",
                frame.total_size(),
                data.len(),
            ));
        }
        Ok(frame)
    }

    /// Range of the opaque payload, relative to the start of the frame.
    pub fn payload_range(&self) -> Range<usize> {
        Self::HEADER_SIZE..self.total_size()
    }

    /// Bytes occupied by the whole frame.
    pub fn total_size(&self) -> usize {
        Self::HEADER_SIZE + self.frame_size as usize
    }

    /// Append a skippable frame carrying `payload`.
    ///
    /// `variant` selects one of the 16 magic numbers (low nibble).
    pub fn encode(variant: u8, payload: &[u8], output: &mut Vec<u8>) -> Result<()> {
        if variant > 0x0F {
            return Err(Error::MalformedMagic {
                magic: SKIPPABLE_MAGIC_LOW + variant as u32,
                offset: output.len(),
            });
        }
        let frame_size = u32::try_from(payload.len()).map_err(|_| {
            Error::frame_descriptor(format!(
                "skippable payload of {} bytes exceeds u32 frame size",
                payload.len()
            ))
        })?;
        output.extend_from_slice(&(SKIPPABLE_MAGIC_LOW + variant as u32).to_le_bytes());
        output.extend_from_slice(&frame_size.to_le_bytes());
        output.extend_from_slice(payload);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sixteen_magics_are_skippable() {
        for i in 0..16 {
            assert!(is_skippable_magic(SKIPPABLE_MAGIC_LOW + i));
        }
        assert!(!is_skippable_magic(SKIPPABLE_MAGIC_LOW - 1));
        assert!(!is_skippable_magic(SKIPPABLE_MAGIC_HIGH + 1));
        assert!(!is_skippable_magic(super::super::ZSTD_MAGIC));
    }

    #[test]
    fn test_parse_skippable() {
        let mut data = Vec::new();
        SkippableFrame::encode(0x7, b"metadata", &mut data).unwrap();
        data.extend_from_slice(b"trailing");

        let frame = SkippableFrame::parse(&data).unwrap();
        assert_eq!(frame.magic, 0x184D2A57);
        assert_eq!(frame.frame_size, 8);
        assert_eq!(&data[frame.payload_range()], b"metadata");
        assert_eq!(frame.total_size(), 16);
    }

    #[test]
    fn test_payload_is_opaque() {
        // Payload that looks like a zstd frame is not interpreted
        let mut data = Vec::new();
        SkippableFrame::encode(0, &[0x28, 0xB5, 0x2F, 0xFD, 0xFF], &mut data).unwrap();
        let frame = SkippableFrame::parse(&data).unwrap();
        assert_eq!(frame.frame_size, 5);
    }

    #[test]
    fn test_truncated_payload() {
        let data = [0x50, 0x2A, 0x4D, 0x18, 0x10, 0x00, 0x00, 0x00, 0xAA];
        assert!(matches!(
            SkippableFrame::parse(&data),
            Err(Error::TruncatedInput {
                required: 24,
                available: 9,
                ..
            })
        ));
    }

    #[test]
    fn test_non_skippable_magic() {
        let data = [0x28, 0xB5, 0x2F, 0xFD, 0, 0, 0, 0];
        assert!(matches!(
            SkippableFrame::parse(&data),
            Err(Error::MalformedMagic {
                magic: 0xFD2FB528,
                ..
            })
        ));
    }

    #[test]
    fn test_encode_rejects_bad_variant() {
        let mut out = Vec::new();
        assert!(SkippableFrame::encode(16, b"", &mut out).is_err());
        assert!(out.is_empty());
    }
}
