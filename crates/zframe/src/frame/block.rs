//! Zstd block header codec.
//!
//! Each data block in a Zstd frame has a 3-byte header.

use zframe_core::{Error, Result};

/// Block types in Zstd.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    /// Raw block - uncompressed data.
    Raw,
    /// RLE block - single byte repeated.
    Rle,
    /// Compressed block - literals and sequences sections.
    Compressed,
    /// Reserved - decodes, but a frame containing it is corrupt.
    Reserved,
}

impl BlockType {
    /// Map the 2-bit type field. All four values are representable.
    pub fn from_field(field: u8) -> Self {
        match field & 0x03 {
            0 => BlockType::Raw,
            1 => BlockType::Rle,
            2 => BlockType::Compressed,
            _ => BlockType::Reserved,
        }
    }

    /// The 2-bit type field.
    pub fn field(self) -> u8 {
        match self {
            BlockType::Raw => 0,
            BlockType::Rle => 1,
            BlockType::Compressed => 2,
            BlockType::Reserved => 3,
        }
    }
}

/// Parsed block header.
///
/// ```text
/// Bytes 0-2 (little-endian 24-bit value):
///   Bit 0:     Last_Block flag
///   Bits 1-2:  Block_Type
///   Bits 3-23: Block_Size (21 bits)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    /// Whether this is the last block in the frame.
    pub last_block: bool,
    /// Block type.
    pub block_type: BlockType,
    /// Block size field.
    /// For Raw and Compressed: bytes of block content.
    /// For RLE: number of times the single content byte repeats.
    pub block_size: usize,
}

impl BlockHeader {
    /// Block header size in bytes.
    pub const SIZE: usize = 3;

    const LAST_BLOCK_MASK: u32 = 0x01;
    const TYPE_SHIFT: u32 = 1;
    const TYPE_MASK: u32 = 0x03;
    const SIZE_SHIFT: u32 = 3;
    const SIZE_BITS: u32 = 21;

    /// Largest value the block size field can hold (2^21 - 1).
    pub const MAX_FIELD_SIZE: usize = (1 << Self::SIZE_BITS) - 1;

    /// Create a header from its fields.
    pub fn new(last_block: bool, block_type: BlockType, block_size: usize) -> Self {
        Self {
            last_block,
            block_type,
            block_size,
        }
    }

    /// Decode a block header from the first 3 bytes of `data`.
    ///
    /// A Reserved block type decodes successfully; use
    /// [`BlockHeader::validate`] before consuming the block.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let bytes = data
            .get(..Self::SIZE)
            .ok_or_else(|| Error::truncated("block header", Self::SIZE, data.len()))?;
        let raw = bytes[0] as u32 | (bytes[1] as u32) << 8 | (bytes[2] as u32) << 16;

        Ok(Self {
            last_block: raw & Self::LAST_BLOCK_MASK != 0,
            block_type: BlockType::from_field(((raw >> Self::TYPE_SHIFT) & Self::TYPE_MASK) as u8),
            block_size: (raw >> Self::SIZE_SHIFT) as usize,
        })
    }

    /// Reject the Reserved block type.
    ///
    /// `offset` is the position of the header, reported in the error.
    pub fn validate(&self, offset: usize) -> Result<()> {
        match self.block_type {
            BlockType::Reserved => Err(Error::ReservedBlockType { offset }),
            BlockType::Raw | BlockType::Rle | BlockType::Compressed => Ok(()),
        }
    }

    /// Pack the header into 3 bytes.
    pub fn encode(&self) -> Result<[u8; 3]> {
        self.validate(0)?;
        if self.block_size > Self::MAX_FIELD_SIZE {
            return Err(Error::BlockSizeOverflow {
                size: self.block_size,
            });
        }
        let raw = (self.block_size as u32) << Self::SIZE_SHIFT
            | (self.block_type.field() as u32) << Self::TYPE_SHIFT
            | u32::from(self.last_block);
        let [b0, b1, b2, _] = raw.to_le_bytes();
        Ok([b0, b1, b2])
    }

    /// Bytes of block content that follow the header in the frame.
    /// For RLE blocks this is 1 (the byte to repeat).
    pub fn content_size(&self) -> usize {
        match self.block_type {
            BlockType::Raw | BlockType::Compressed => self.block_size,
            BlockType::Rle => 1,
            BlockType::Reserved => 0,
        }
    }

    /// Regenerated size when it is known from the header alone.
    pub fn regenerated_size(&self) -> Option<usize> {
        match self.block_type {
            BlockType::Raw | BlockType::Rle => Some(self.block_size),
            BlockType::Compressed | BlockType::Reserved => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_type_fields() {
        for field in 0..4u8 {
            assert_eq!(BlockType::from_field(field).field(), field);
        }
        assert_eq!(BlockType::from_field(3), BlockType::Reserved);
    }

    #[test]
    fn test_raw_block_header() {
        // (100 << 3) | (0 << 1) | 0 = 0x320
        let header = BlockHeader::decode(&[0x20, 0x03, 0x00]).unwrap();
        assert!(!header.last_block);
        assert_eq!(header.block_type, BlockType::Raw);
        assert_eq!(header.block_size, 100);
        assert_eq!(header.content_size(), 100);
        assert_eq!(header.regenerated_size(), Some(100));
    }

    #[test]
    fn test_rle_block_header() {
        // (1000 << 3) | (1 << 1) | 1 = 0x1F43
        let header = BlockHeader::decode(&[0x43, 0x1F, 0x00]).unwrap();
        assert!(header.last_block);
        assert_eq!(header.block_type, BlockType::Rle);
        assert_eq!(header.block_size, 1000);
        assert_eq!(header.content_size(), 1);
        assert_eq!(header.regenerated_size(), Some(1000));
    }

    #[test]
    fn test_compressed_block_header() {
        // (50000 << 3) | (2 << 1) | 0 = 0x61A84
        let header = BlockHeader::decode(&[0x84, 0x1A, 0x06]).unwrap();
        assert_eq!(header.block_type, BlockType::Compressed);
        assert_eq!(header.block_size, 50000);
        assert_eq!(header.content_size(), 50000);
        assert_eq!(header.regenerated_size(), None);
    }

    #[test]
    fn test_reserved_block_type_decodes_but_fails_validation() {
        // (0 << 3) | (3 << 1) | 0 = 6
        let header = BlockHeader::decode(&[0x06, 0x00, 0x00]).unwrap();
        assert_eq!(header.block_type, BlockType::Reserved);
        assert!(matches!(
            header.validate(42),
            Err(Error::ReservedBlockType { offset: 42 })
        ));
        assert!(header.encode().is_err());
    }

    #[test]
    fn test_size_field_boundaries() {
        for size in [0, 1, BlockHeader::MAX_FIELD_SIZE] {
            for block_type in [BlockType::Raw, BlockType::Rle, BlockType::Compressed] {
                for last in [false, true] {
                    let header = BlockHeader::new(last, block_type, size);
                    let bytes = header.encode().unwrap();
                    assert_eq!(BlockHeader::decode(&bytes).unwrap(), header);
                }
            }
        }
    }

    #[test]
    fn test_max_field_size_bytes() {
        let bytes = BlockHeader::new(true, BlockType::Raw, BlockHeader::MAX_FIELD_SIZE)
            .encode()
            .unwrap();
        assert_eq!(bytes, [0xF9, 0xFF, 0xFF]);
    }

    #[test]
    fn test_encode_rejects_overflow() {
        let header = BlockHeader::new(false, BlockType::Raw, 1 << 21);
        assert!(matches!(
            header.encode(),
            Err(Error::BlockSizeOverflow { size }) if size == 1 << 21
        ));
    }

    #[test]
    fn test_last_flag_does_not_leak_into_size() {
        let header = BlockHeader::decode(&[0x21, 0x03, 0x00]).unwrap();
        assert!(header.last_block);
        assert_eq!(header.block_size, 100);
    }

    #[test]
    fn test_header_too_short() {
        assert!(matches!(
            BlockHeader::decode(&[0x00, 0x00]),
            Err(Error::TruncatedInput {
                required: 3,
                available: 2,
                ..
            })
        ));
    }
}
