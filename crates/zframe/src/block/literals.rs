//! Literals section header codec.
//!
//! ```text
//! Literals_Section_Header (1-5 bytes, little-endian bit packing):
//!   Bits 0-1: Literals_Block_Type
//!   Bits 2-3: Size_Format
//!   Then Regenerated_Size and, for Compressed/Treeless, Compressed_Size
//! ```
//!
//! | Type         | Format | Streams | Size bits | Header bytes |
//! |--------------|--------|---------|-----------|--------------|
//! | Raw / RLE    | 00, 10 | 1       | 5         | 1            |
//! | Raw / RLE    | 01     | 1       | 12        | 2            |
//! | Raw / RLE    | 11     | 1       | 20        | 3            |
//! | Compressed   | 00     | 1       | 10 + 10   | 3            |
//! | Compressed   | 01     | 4       | 10 + 10   | 3            |
//! | Compressed   | 10     | 4       | 14 + 14   | 4            |
//! | Compressed   | 11     | 4       | 18 + 18   | 5            |
//!
//! Treeless shares the Compressed layouts.

use crate::le::{read_le, write_le};
use std::ops::Range;
use zframe_core::{Error, Result};

/// Literals block type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralsBlockType {
    /// Raw literals - uncompressed bytes.
    Raw,
    /// RLE literals - single byte repeated.
    Rle,
    /// Huffman compressed literals with a new tree.
    Compressed,
    /// Huffman compressed using the previous tree.
    Treeless,
}

impl LiteralsBlockType {
    /// Parse block type from the 2-bit field.
    pub fn from_field(field: u8) -> Self {
        match field & 0x03 {
            0 => LiteralsBlockType::Raw,
            1 => LiteralsBlockType::Rle,
            2 => LiteralsBlockType::Compressed,
            _ => LiteralsBlockType::Treeless,
        }
    }

    /// The 2-bit field.
    pub fn field(self) -> u8 {
        match self {
            LiteralsBlockType::Raw => 0,
            LiteralsBlockType::Rle => 1,
            LiteralsBlockType::Compressed => 2,
            LiteralsBlockType::Treeless => 3,
        }
    }

    /// Whether the header carries a compressed size and stream count.
    pub fn is_huffman(self) -> bool {
        matches!(
            self,
            LiteralsBlockType::Compressed | LiteralsBlockType::Treeless
        )
    }
}

/// Header layout selected by block type and size format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    header_size: usize,
    size_bits: u32,
    num_streams: usize,
}

impl Layout {
    fn select(block_type: LiteralsBlockType, size_format: u8) -> Result<Self> {
        let (header_size, size_bits, num_streams) = match (block_type.is_huffman(), size_format) {
            (false, 0b00 | 0b10) => (1, 5, 1),
            (false, 0b01) => (2, 12, 1),
            (false, 0b11) => (3, 20, 1),
            (true, 0b00) => (3, 10, 1),
            (true, 0b01) => (3, 10, 4),
            (true, 0b10) => (4, 14, 4),
            (true, 0b11) => (5, 18, 4),
            (_, format) => {
                return Err(Error::size_format(format!(
                    "size format {format:#04b} is not defined for {block_type:?} literals"
                )))
            }
        };
        Ok(Self {
            header_size,
            size_bits,
            num_streams,
        })
    }

    fn max_size(&self) -> usize {
        (1 << self.size_bits) - 1
    }
}

/// Parsed literals section header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiteralsHeader {
    /// Block type.
    pub block_type: LiteralsBlockType,
    /// 2-bit size format. The one-byte Raw/RLE layout is always 0b00, since
    /// its bit 3 belongs to the size.
    pub size_format: u8,
    /// Regenerated (uncompressed) size.
    pub regenerated_size: usize,
    /// Compressed size, present for Compressed and Treeless.
    pub compressed_size: Option<usize>,
}

impl LiteralsHeader {
    /// Decode the header at the start of `input`.
    pub fn decode(input: &[u8]) -> Result<Self> {
        let first = *input
            .first()
            .ok_or_else(|| Error::truncated("literals section header", 1, 0))?;
        let block_type = LiteralsBlockType::from_field(first);
        let mut size_format = (first >> 2) & 0x03;
        let layout = Layout::select(block_type, size_format)?;
        if !block_type.is_huffman() && layout.header_size == 1 {
            // Bit 3 is the low size bit; report the format as 00
            size_format = 0b00;
        }

        let raw = read_le(input, layout.header_size, "literals section header")?;
        let mask = layout.max_size() as u64;

        let (regenerated_size, compressed_size) = if block_type.is_huffman() {
            let regen = (raw >> 4) & mask;
            let comp = (raw >> (4 + layout.size_bits)) & mask;
            (regen as usize, Some(comp as usize))
        } else if layout.header_size == 1 {
            // Single bit size format: size starts at bit 3
            ((raw >> 3) as usize & layout.max_size(), None)
        } else {
            (((raw >> 4) & mask) as usize, None)
        };

        Ok(Self {
            block_type,
            size_format,
            regenerated_size,
            compressed_size,
        })
    }

    /// Header for raw literals with the smallest size format.
    pub fn raw(regenerated_size: usize) -> Result<Self> {
        Self::uncompressed(LiteralsBlockType::Raw, regenerated_size)
    }

    /// Header for RLE literals with the smallest size format.
    pub fn rle(regenerated_size: usize) -> Result<Self> {
        Self::uncompressed(LiteralsBlockType::Rle, regenerated_size)
    }

    fn uncompressed(block_type: LiteralsBlockType, size: usize) -> Result<Self> {
        let size_format = match size {
            0..=0x1F => 0b00,
            0x20..=0xFFF => 0b01,
            0x1000..=0xF_FFFF => 0b11,
            _ => {
                return Err(Error::size_format(format!(
                    "regenerated size {size} exceeds 20 bits"
                )))
            }
        };
        Ok(Self {
            block_type,
            size_format,
            regenerated_size: size,
            compressed_size: None,
        })
    }

    /// Header for Huffman literals with the smallest size format for the
    /// requested stream count (1 or 4).
    pub fn huffman(
        block_type: LiteralsBlockType,
        regenerated_size: usize,
        compressed_size: usize,
        num_streams: usize,
    ) -> Result<Self> {
        if !block_type.is_huffman() {
            return Err(Error::size_format(format!(
                "{block_type:?} literals carry no compressed size"
            )));
        }
        let largest = regenerated_size.max(compressed_size);
        let size_format = match (num_streams, largest) {
            (1, 0..=0x3FF) => 0b00,
            (4, 0..=0x3FF) => 0b01,
            (4, 0x400..=0x3FFF) => 0b10,
            (4, 0x4000..=0x3_FFFF) => 0b11,
            (1 | 4, _) => {
                return Err(Error::size_format(format!(
                    "size {largest} does not fit a {num_streams}-stream header"
                )))
            }
            _ => {
                return Err(Error::size_format(format!(
                    "stream count must be 1 or 4, got {num_streams}"
                )))
            }
        };
        Ok(Self {
            block_type,
            size_format,
            regenerated_size,
            compressed_size: Some(compressed_size),
        })
    }

    /// Header length in bytes.
    pub fn header_size(&self) -> Result<usize> {
        Layout::select(self.block_type, self.size_format).map(|l| l.header_size)
    }

    /// Number of Huffman streams: always 1 for Raw/RLE.
    pub fn num_streams(&self) -> Result<usize> {
        Layout::select(self.block_type, self.size_format).map(|l| l.num_streams)
    }

    /// Bytes of section content following the header.
    pub fn content_size(&self) -> usize {
        match self.block_type {
            LiteralsBlockType::Raw => self.regenerated_size,
            LiteralsBlockType::Rle => 1,
            LiteralsBlockType::Compressed | LiteralsBlockType::Treeless => {
                self.compressed_size.unwrap_or(0)
            }
        }
    }

    /// Encode the header, rejecting sizes the size format cannot carry.
    pub fn encode(&self, output: &mut Vec<u8>) -> Result<()> {
        let layout = Layout::select(self.block_type, self.size_format)?;
        if !self.block_type.is_huffman() && self.size_format == 0b10 {
            return Err(Error::size_format(format!(
                "size format 0b10 overlaps the size field of {:?} literals; use 0b00",
                self.block_type
            )));
        }
        let max = layout.max_size();
        if self.regenerated_size > max {
            return Err(Error::size_format(format!(
                "regenerated size {} exceeds {} bits",
                self.regenerated_size, layout.size_bits
            )));
        }

        let prefix = (self.block_type.field() | (self.size_format << 2)) as u64;
        let raw = match (self.block_type.is_huffman(), self.compressed_size) {
            (true, Some(comp)) if comp <= max => {
                prefix
                    | (self.regenerated_size as u64) << 4
                    | (comp as u64) << (4 + layout.size_bits)
            }
            (true, Some(comp)) => {
                return Err(Error::size_format(format!(
                    "compressed size {comp} exceeds {} bits",
                    layout.size_bits
                )))
            }
            (true, None) => {
                return Err(Error::size_format(format!(
                    "{:?} literals need a compressed size",
                    self.block_type
                )))
            }
            (false, Some(_)) => {
                return Err(Error::size_format(format!(
                    "{:?} literals carry no compressed size",
                    self.block_type
                )))
            }
            // Single bit size format: size starts at bit 3
            (false, None) if layout.header_size == 1 => {
                (self.block_type.field() as u64) | (self.regenerated_size as u64) << 3
            }
            (false, None) => prefix | (self.regenerated_size as u64) << 4,
        };

        write_le(output, raw, layout.header_size);
        Ok(())
    }
}

/// Four-stream jump table: three little-endian u16 stream sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpTable {
    /// Sizes of all four streams; the fourth is derived.
    pub stream_sizes: [usize; 4],
}

impl JumpTable {
    /// Jump table length in bytes.
    pub const SIZE: usize = 6;

    /// Decode the jump table at the start of `data`.
    ///
    /// `total_stream_bytes` counts the jump table and all four streams. The
    /// fourth stream is `total_stream_bytes - 6 - s1 - s2 - s3`; a negative
    /// result fails with [`Error::NegativeStreamSize`].
    pub fn decode(data: &[u8], total_stream_bytes: usize) -> Result<Self> {
        let s1 = read_le(data, 2, "jump table")? as usize;
        let s2 = read_le(&data[2..], 2, "jump table")? as usize;
        let s3 = read_le(&data[4..], 2, "jump table")? as usize;

        let declared = Self::SIZE + s1 + s2 + s3;
        let s4 = total_stream_bytes
            .checked_sub(declared)
            .ok_or(Error::NegativeStreamSize {
                total: total_stream_bytes,
                declared,
            })?;

        Ok(Self {
            stream_sizes: [s1, s2, s3, s4],
        })
    }

    /// Encode the first three stream sizes.
    pub fn encode(&self, output: &mut Vec<u8>) -> Result<()> {
        for &size in &self.stream_sizes[..3] {
            let size = u16::try_from(size).map_err(|_| {
                Error::size_format(format!("stream size {size} exceeds the 16-bit jump table entry"))
            })?;
            output.extend_from_slice(&size.to_le_bytes());
        }
        Ok(())
    }

    /// Stream ranges relative to the start of the jump table.
    pub fn stream_ranges(&self) -> [Range<usize>; 4] {
        let mut start = Self::SIZE;
        self.stream_sizes.map(|size| {
            let range = start..start + size;
            start += size;
            range
        })
    }
}

/// Byte length of a Huffman tree description, from its header byte alone.
///
/// - `header < 128`: FSE-compressed weights of `header` bytes follow.
/// - `header >= 128`: `header - 127` 4-bit weights follow, two per byte.
///
/// The returned length includes the header byte.
pub fn huffman_tree_description_size(header: u8) -> usize {
    if header < 128 {
        1 + header as usize
    } else {
        let num_weights = (header - 127) as usize;
        1 + num_weights.div_ceil(2)
    }
}

/// Huffman stream ranges of a literals section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamLayout {
    /// Raw or RLE literals: no Huffman streams.
    None,
    /// One stream.
    Single(Range<usize>),
    /// Four streams behind a jump table.
    Four {
        jump_table: JumpTable,
        streams: [Range<usize>; 4],
    },
}

impl StreamLayout {
    /// Stream ranges in order.
    pub fn streams(&self) -> &[Range<usize>] {
        match self {
            StreamLayout::None => &[],
            StreamLayout::Single(range) => std::slice::from_ref(range),
            StreamLayout::Four { streams, .. } => streams,
        }
    }
}

/// Literals section located inside a block.
///
/// Ranges are relative to the start of the section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralsSection {
    /// Decoded header.
    pub header: LiteralsHeader,
    /// Section content after the header.
    pub content: Range<usize>,
    /// Huffman tree description (Compressed only).
    pub tree_description: Option<Range<usize>>,
    /// Huffman streams handed to the entropy decoder.
    pub streams: StreamLayout,
}

impl LiteralsSection {
    /// Locate the literals section at the start of `input`.
    ///
    /// Four-stream jump tables are validated before any stream range is
    /// returned.
    pub fn parse(input: &[u8]) -> Result<Self> {
        let header = LiteralsHeader::decode(input)?;
        let header_size = header.header_size()?;
        let end = header_size + header.content_size();
        if input.len() < end {
            return Err(Error::truncated("literals section", end, input.len()));
        }
        let content = header_size..end;

        let (tree_description, streams_start) = match header.block_type {
            LiteralsBlockType::Raw | LiteralsBlockType::Rle => {
                return Ok(Self {
                    header,
                    content,
                    tree_description: None,
                    streams: StreamLayout::None,
                })
            }
            LiteralsBlockType::Compressed => {
                let tree_header = *input.get(header_size).ok_or_else(|| {
                    Error::truncated("huffman tree description", 1, header.content_size())
                })?;
                let tree_end = header_size + huffman_tree_description_size(tree_header);
                if tree_end > end {
                    return Err(Error::truncated(
                        "huffman tree description",
                        tree_end - header_size,
                        header.content_size(),
                    ));
                }
                (Some(header_size..tree_end), tree_end)
            }
            LiteralsBlockType::Treeless => (None, header_size),
        };

        let total_stream_bytes = end - streams_start;
        let streams = match header.num_streams()? {
            1 => StreamLayout::Single(streams_start..end),
            _ => {
                if total_stream_bytes < JumpTable::SIZE {
                    return Err(Error::truncated(
                        "jump table",
                        JumpTable::SIZE,
                        total_stream_bytes,
                    ));
                }
                let jump_table = JumpTable::decode(&input[streams_start..], total_stream_bytes)?;
                let streams = jump_table
                    .stream_ranges()
                    .map(|r| streams_start + r.start..streams_start + r.end);
                StreamLayout::Four {
                    jump_table,
                    streams,
                }
            }
        };

        Ok(Self {
            header,
            content,
            tree_description,
            streams,
        })
    }

    /// Bytes occupied by the whole section.
    pub fn section_size(&self) -> usize {
        self.content.end
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn encoded(header: &LiteralsHeader) -> Vec<u8> {
        let mut out = Vec::new();
        header.encode(&mut out).unwrap();
        out
    }

    #[test]
    fn test_literals_block_type_parsing() {
        for field in 0..4u8 {
            assert_eq!(LiteralsBlockType::from_field(field).field(), field);
        }
        assert!(!LiteralsBlockType::Raw.is_huffman());
        assert!(LiteralsBlockType::Treeless.is_huffman());
    }

    #[test]
    fn test_zero_byte_is_empty_raw() {
        let header = LiteralsHeader::decode(&[0x00]).unwrap();
        assert_eq!(header.block_type, LiteralsBlockType::Raw);
        assert_eq!(header.num_streams().unwrap(), 1);
        assert_eq!(header.header_size().unwrap(), 1);
        assert_eq!(header.regenerated_size, 0);
    }

    #[test]
    fn test_raw_literals_5bit_size() {
        // (5 << 3) | (0 << 2) | 0 = 0x28
        let header = LiteralsHeader::decode(&[0x28]).unwrap();
        assert_eq!(header.regenerated_size, 5);
        assert_eq!(header.compressed_size, None);
        assert_eq!(header.content_size(), 5);
    }

    #[test]
    fn test_format_10_uses_bit_3_as_size() {
        // Odd 5-bit sizes set bit 3, which reads as size format 10: 17 << 3 = 0x88
        let header = LiteralsHeader::decode(&[0x88]).unwrap();
        assert_eq!(header.size_format, 0b00);
        assert_eq!(header.regenerated_size, 17);
        assert_eq!(header.header_size().unwrap(), 1);
        assert_eq!(header, LiteralsHeader::raw(17).unwrap());

        let mut out = Vec::new();
        header.encode(&mut out).unwrap();
        assert_eq!(out, [0x88]);
    }

    #[test]
    fn test_encode_rejects_format_10_for_raw() {
        // Bit 3 would carry format 10 and the even size at once
        let header = LiteralsHeader {
            block_type: LiteralsBlockType::Raw,
            size_format: 0b10,
            regenerated_size: 16,
            compressed_size: None,
        };
        assert!(matches!(
            header.encode(&mut Vec::new()),
            Err(Error::InvalidSizeFormat(_))
        ));

        let rle = LiteralsHeader {
            block_type: LiteralsBlockType::Rle,
            ..header
        };
        assert!(rle.encode(&mut Vec::new()).is_err());
    }

    #[test]
    fn test_rle_literals_5bit_size() {
        // (10 << 3) | (0 << 2) | 1 = 0x51
        let header = LiteralsHeader::decode(&[0x51]).unwrap();
        assert_eq!(header.block_type, LiteralsBlockType::Rle);
        assert_eq!(header.regenerated_size, 10);
        assert_eq!(header.content_size(), 1);
    }

    #[test]
    fn test_raw_literals_12bit_size() {
        // size 256: byte0 = (0 << 4) | (1 << 2), byte1 = 16
        let header = LiteralsHeader::decode(&[0x04, 0x10]).unwrap();
        assert_eq!(header.regenerated_size, 256);
        assert_eq!(header.header_size().unwrap(), 2);
    }

    #[test]
    fn test_raw_literals_20bit_size() {
        let header = LiteralsHeader::raw(0xF_FFFF).unwrap();
        let bytes = encoded(&header);
        assert_eq!(bytes, [0xFC, 0xFF, 0xFF]);
        assert_eq!(LiteralsHeader::decode(&bytes).unwrap(), header);
    }

    #[test]
    fn test_compressed_layouts() {
        let cases = [
            (1, 1000, 900, 0b00, 3),
            (4, 1000, 900, 0b01, 3),
            (4, 16383, 1024, 0b10, 4),
            (4, 131072, 90000, 0b11, 5),
        ];
        for (streams, regen, comp, format, size) in cases {
            let header =
                LiteralsHeader::huffman(LiteralsBlockType::Compressed, regen, comp, streams)
                    .unwrap();
            assert_eq!(header.size_format, format);
            assert_eq!(header.num_streams().unwrap(), streams);
            let bytes = encoded(&header);
            assert_eq!(bytes.len(), size);
            let decoded = LiteralsHeader::decode(&bytes).unwrap();
            assert_eq!(decoded, header);
            assert_eq!(decoded.compressed_size, Some(comp));
        }
    }

    #[test]
    fn test_compressed_bit_positions() {
        // Format 00, regen = 0x3FF, comp = 0: regen fills bits 4-13
        let bytes = [0xF2, 0x3F, 0x00];
        let header = LiteralsHeader::decode(&bytes).unwrap();
        assert_eq!(header.regenerated_size, 0x3FF);
        assert_eq!(header.compressed_size, Some(0));

        // Format 00, regen = 0, comp = 0x3FF: comp fills bits 14-23
        let bytes = [0x02, 0xC0, 0xFF];
        let header = LiteralsHeader::decode(&bytes).unwrap();
        assert_eq!(header.regenerated_size, 0);
        assert_eq!(header.compressed_size, Some(0x3FF));
    }

    #[test]
    fn test_single_stream_limited_to_10_bits() {
        let result = LiteralsHeader::huffman(LiteralsBlockType::Compressed, 1024, 10, 1);
        assert!(matches!(result, Err(Error::InvalidSizeFormat(_))));
        let result = LiteralsHeader::huffman(LiteralsBlockType::Compressed, 10, 10, 2);
        assert!(matches!(result, Err(Error::InvalidSizeFormat(_))));
    }

    #[test]
    fn test_encode_rejects_oversized_fields() {
        let header = LiteralsHeader {
            block_type: LiteralsBlockType::Raw,
            size_format: 0b00,
            regenerated_size: 32,
            compressed_size: None,
        };
        assert!(header.encode(&mut Vec::new()).is_err());

        let header = LiteralsHeader {
            block_type: LiteralsBlockType::Treeless,
            size_format: 0b01,
            regenerated_size: 10,
            compressed_size: Some(1024),
        };
        assert!(header.encode(&mut Vec::new()).is_err());
    }

    #[test]
    fn test_raw_rejects_21_bit_size() {
        assert!(LiteralsHeader::raw(1 << 20).is_err());
    }

    #[test]
    fn test_truncated_header() {
        // Format 11 raw needs 3 bytes
        assert!(matches!(
            LiteralsHeader::decode(&[0x0C, 0x00]),
            Err(Error::TruncatedInput { .. })
        ));
        assert!(LiteralsHeader::decode(&[]).is_err());
    }

    #[test]
    fn test_jump_table_fourth_stream() {
        let jump = JumpTable {
            stream_sizes: [10, 20, 30, 0],
        };
        let mut bytes = Vec::new();
        jump.encode(&mut bytes).unwrap();
        assert_eq!(bytes, [10, 0, 20, 0, 30, 0]);

        let decoded = JumpTable::decode(&bytes, 6 + 10 + 20 + 30 + 40).unwrap();
        assert_eq!(decoded.stream_sizes, [10, 20, 30, 40]);
        let ranges = decoded.stream_ranges();
        assert_eq!(ranges[0], 6..16);
        assert_eq!(ranges[3], 66..106);
    }

    #[test]
    fn test_jump_table_negative_fourth_stream() {
        let bytes = [100, 0, 100, 0, 100, 0];
        assert!(matches!(
            JumpTable::decode(&bytes, 200),
            Err(Error::NegativeStreamSize {
                total: 200,
                declared: 306
            })
        ));
        // Exactly zero is fine
        assert_eq!(JumpTable::decode(&bytes, 306).unwrap().stream_sizes[3], 0);
    }

    #[test]
    fn test_tree_description_size() {
        assert_eq!(huffman_tree_description_size(0), 1);
        assert_eq!(huffman_tree_description_size(40), 41);
        assert_eq!(huffman_tree_description_size(127), 128);
        // 1 weight -> 1 byte, 2 weights -> 1 byte, 3 weights -> 2 bytes
        assert_eq!(huffman_tree_description_size(128), 2);
        assert_eq!(huffman_tree_description_size(129), 2);
        assert_eq!(huffman_tree_description_size(130), 3);
        assert_eq!(huffman_tree_description_size(255), 65);
    }

    #[test]
    fn test_section_raw() {
        let mut input = vec![0x28];
        input.extend_from_slice(b"Hello");
        input.extend_from_slice(b"sequences");

        let section = LiteralsSection::parse(&input).unwrap();
        assert_eq!(section.content, 1..6);
        assert_eq!(&input[section.content.clone()], b"Hello");
        assert_eq!(section.streams, StreamLayout::None);
        assert_eq!(section.section_size(), 6);
    }

    #[test]
    fn test_section_rle() {
        let section = LiteralsSection::parse(&[0x51, b'X', 0xAA]).unwrap();
        assert_eq!(section.content, 1..2);
        assert_eq!(section.section_size(), 2);
    }

    #[test]
    fn test_section_truncated_raw() {
        let input = [0x50, b'H', b'e', b'l', b'l', b'o'];
        assert!(matches!(
            LiteralsSection::parse(&input),
            Err(Error::TruncatedInput { .. })
        ));
    }

    #[test]
    fn test_section_single_stream() {
        // Compressed, 1 stream, regen 20, comp 8: tree header 0x83 (4 weights, 2 bytes)
        let header = LiteralsHeader::huffman(LiteralsBlockType::Compressed, 20, 8, 1).unwrap();
        let mut input = encoded(&header);
        input.extend_from_slice(&[0x83, 0x11, 0x22, 0xA0, 0xA1, 0xA2, 0xA3, 0xA4]);

        let section = LiteralsSection::parse(&input).unwrap();
        assert_eq!(section.tree_description, Some(3..6));
        assert_eq!(section.streams, StreamLayout::Single(6..11));
        assert_eq!(section.section_size(), 11);
    }

    #[test]
    fn test_section_four_streams_treeless() {
        // Treeless: streams start right after the header
        let header = LiteralsHeader::huffman(LiteralsBlockType::Treeless, 40, 16, 4).unwrap();
        let mut input = encoded(&header);
        input.extend_from_slice(&[2, 0, 3, 0, 1, 0]);
        input.extend_from_slice(&[0xEE; 10]);

        let section = LiteralsSection::parse(&input).unwrap();
        assert_eq!(section.tree_description, None);
        let StreamLayout::Four { jump_table, streams } = &section.streams else {
            panic!("expected four streams");
        };
        assert_eq!(jump_table.stream_sizes, [2, 3, 1, 4]);
        assert_eq!(streams[0], 9..11);
        assert_eq!(streams[3], 15..19);
        assert_eq!(section.streams.streams().len(), 4);
    }

    #[test]
    fn test_section_negative_stream_rejected() {
        let header = LiteralsHeader::huffman(LiteralsBlockType::Treeless, 40, 8, 4).unwrap();
        let mut input = encoded(&header);
        input.extend_from_slice(&[5, 0, 5, 0, 5, 0, 0xEE, 0xEE]);

        assert!(matches!(
            LiteralsSection::parse(&input),
            Err(Error::NegativeStreamSize { .. })
        ));
    }

    #[test]
    fn test_section_tree_longer_than_content() {
        // comp 4 but tree header says 10 bytes
        let header = LiteralsHeader::huffman(LiteralsBlockType::Compressed, 20, 4, 1).unwrap();
        let mut input = encoded(&header);
        input.extend_from_slice(&[9, 0, 0, 0]);
        assert!(matches!(
            LiteralsSection::parse(&input),
            Err(Error::TruncatedInput { .. })
        ));
    }
}
