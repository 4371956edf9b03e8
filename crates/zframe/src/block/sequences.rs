//! Sequences section header codec.
//!
//! Sequences are LZ77-style commands: (literal_length, offset, match_length).
//! This module only reads the section header; the symbol tables and the
//! bitstream that follow belong to the entropy decoder.
//!
//! ## Number_of_Sequences
//!
//! | byte0       | count                               | bytes |
//! |-------------|-------------------------------------|-------|
//! | 0           | 0 (section ends here)               | 1     |
//! | 1-127       | byte0                               | 1     |
//! | 128-254     | ((byte0 - 128) << 8) + byte1        | 2     |
//! | 255         | byte1 + (byte2 << 8) + 0x7F00       | 3     |
//!
//! ## Symbol Compression Modes
//!
//! ```text
//! Bits 7-6: Literals_Lengths_Mode
//! Bits 5-4: Offsets_Mode
//! Bits 3-2: Match_Lengths_Mode
//! Bits 1-0: Reserved (must be 0)
//! ```

use zframe_core::{Error, Result};

/// Largest count the 3-byte form can carry.
pub const MAX_SEQUENCES: usize = 0x7F00 + 0xFFFF;

const LONG_FORM_BASE: usize = 0x7F00;

/// Symbol decoding mode for one of the three sequence tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolMode {
    /// Predefined FSE distribution.
    Predefined,
    /// RLE mode - single symbol repeated.
    Rle,
    /// FSE table described in the stream.
    Fse,
    /// Reuse the previous block's table.
    Repeat,
}

impl SymbolMode {
    /// Parse mode from the 2-bit field.
    pub fn from_field(field: u8) -> Self {
        match field & 0x03 {
            0 => SymbolMode::Predefined,
            1 => SymbolMode::Rle,
            2 => SymbolMode::Fse,
            _ => SymbolMode::Repeat,
        }
    }

    /// The 2-bit field.
    pub fn field(self) -> u8 {
        match self {
            SymbolMode::Predefined => 0,
            SymbolMode::Rle => 1,
            SymbolMode::Fse => 2,
            SymbolMode::Repeat => 3,
        }
    }
}

/// The three sequence symbol tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolTableKind {
    /// Literal length codes, bits 7-6 of the mode byte.
    LiteralLength,
    /// Offset codes, bits 5-4 of the mode byte.
    Offset,
    /// Match length codes, bits 3-2 of the mode byte.
    MatchLength,
}

impl SymbolTableKind {
    /// All tables in stream order.
    pub const ALL: [SymbolTableKind; 3] = [
        SymbolTableKind::LiteralLength,
        SymbolTableKind::Offset,
        SymbolTableKind::MatchLength,
    ];

    /// Human readable table name.
    pub fn name(self) -> &'static str {
        match self {
            SymbolTableKind::LiteralLength => "literal length",
            SymbolTableKind::Offset => "offset",
            SymbolTableKind::MatchLength => "match length",
        }
    }
}

/// Decoded Symbol_Compression_Modes byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionModes {
    pub literal_lengths: SymbolMode,
    pub offsets: SymbolMode,
    pub match_lengths: SymbolMode,
}

impl CompressionModes {
    const RESERVED_MASK: u8 = 0x03;

    /// Decode the mode byte, rejecting nonzero reserved bits.
    pub fn decode(byte: u8) -> Result<Self> {
        if byte & Self::RESERVED_MASK != 0 {
            return Err(Error::InvalidSequenceModeByte { byte });
        }
        Ok(Self {
            literal_lengths: SymbolMode::from_field(byte >> 6),
            offsets: SymbolMode::from_field(byte >> 4),
            match_lengths: SymbolMode::from_field(byte >> 2),
        })
    }

    /// Pack into one byte with the reserved bits clear.
    pub fn encode(&self) -> u8 {
        self.literal_lengths.field() << 6 | self.offsets.field() << 4 | self.match_lengths.field() << 2
    }

    /// Mode of one table.
    pub fn get(&self, kind: SymbolTableKind) -> SymbolMode {
        match kind {
            SymbolTableKind::LiteralLength => self.literal_lengths,
            SymbolTableKind::Offset => self.offsets,
            SymbolTableKind::MatchLength => self.match_lengths,
        }
    }
}

/// Parsed sequences section header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencesHeader {
    /// Number of sequences.
    pub num_sequences: usize,
    /// Table modes; `None` exactly when there are no sequences.
    pub modes: Option<CompressionModes>,
    /// Header length in bytes (count field plus mode byte).
    pub header_size: usize,
}

impl SequencesHeader {
    /// Decode the header at the start of the sequences section.
    pub fn decode(input: &[u8]) -> Result<Self> {
        let (num_sequences, count_size) = Self::decode_count(input)?;

        if num_sequences == 0 {
            return Ok(Self {
                num_sequences,
                modes: None,
                header_size: count_size,
            });
        }

        let mode_byte = *input
            .get(count_size)
            .ok_or_else(|| Error::truncated("sequence mode byte", count_size + 1, input.len()))?;

        Ok(Self {
            num_sequences,
            modes: Some(CompressionModes::decode(mode_byte)?),
            header_size: count_size + 1,
        })
    }

    /// Decode Number_of_Sequences.
    ///
    /// Returns the count and the number of bytes consumed.
    pub fn decode_count(input: &[u8]) -> Result<(usize, usize)> {
        let need = |n: usize| {
            if input.len() < n {
                Err(Error::truncated("sequence count", n, input.len()))
            } else {
                Ok(())
            }
        };
        need(1)?;

        let byte0 = input[0] as usize;
        match byte0 {
            0..=127 => Ok((byte0, 1)),
            128..=254 => {
                need(2)?;
                Ok((((byte0 - 128) << 8) + input[1] as usize, 2))
            }
            _ => {
                need(3)?;
                Ok((
                    input[1] as usize + ((input[2] as usize) << 8) + LONG_FORM_BASE,
                    3,
                ))
            }
        }
    }

    /// Encode Number_of_Sequences in its shortest form.
    pub fn encode_count(count: usize, output: &mut Vec<u8>) -> Result<()> {
        match count {
            0..=127 => output.push(count as u8),
            128..=0x7EFF => {
                output.push(((count >> 8) + 128) as u8);
                output.push(count as u8);
            }
            _ if count <= MAX_SEQUENCES => {
                let rest = count - LONG_FORM_BASE;
                output.push(255);
                output.push(rest as u8);
                output.push((rest >> 8) as u8);
            }
            _ => {
                return Err(Error::size_format(format!(
                    "sequence count {count} exceeds {MAX_SEQUENCES}"
                )))
            }
        }
        Ok(())
    }

    /// Header for `num_sequences` sequences with the given modes.
    pub fn new(num_sequences: usize, modes: CompressionModes) -> Result<Self> {
        let mut scratch = Vec::with_capacity(3);
        Self::encode_count(num_sequences, &mut scratch)?;
        let modes = (num_sequences > 0).then_some(modes);
        Ok(Self {
            num_sequences,
            modes,
            header_size: scratch.len() + usize::from(modes.is_some()),
        })
    }

    /// Encode the count and, for a nonzero count, the mode byte.
    pub fn encode(&self, output: &mut Vec<u8>) -> Result<()> {
        Self::encode_count(self.num_sequences, output)?;
        match (self.num_sequences, self.modes) {
            (0, _) => Ok(()),
            (_, Some(modes)) => {
                output.push(modes.encode());
                Ok(())
            }
            (n, None) => Err(Error::size_format(format!(
                "{n} sequences need a compression mode byte"
            ))),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
