//! Compressed block sections.
//!
//! A compressed block contains:
//! 1. Literals Section - header, optional Huffman tree, 1 or 4 streams
//! 2. Sequences Section - header, symbol tables, bitstream
//!
//! Only the headers are decoded here. The rest is exposed as byte ranges for
//! the entropy decoder.
//!
//! ## References
//!
//! - [RFC 8878 Section 3.1.1.3](https://datatracker.ietf.org/doc/html/rfc8878#section-3.1.1.3)

mod literals;
mod sequences;

pub use literals::{
    huffman_tree_description_size, JumpTable, LiteralsBlockType, LiteralsHeader,
    LiteralsSection, StreamLayout,
};
pub use sequences::{
    CompressionModes, SequencesHeader, SymbolMode, SymbolTableKind, MAX_SEQUENCES,
};

use std::ops::Range;
use zframe_core::{Error, Result};

/// Layout of a compressed block's content.
///
/// Ranges are relative to the first byte after the block header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedBlock {
    /// Literals section.
    pub literals: LiteralsSection,
    /// Sequences section header, absent when the block ends after the
    /// literals section.
    pub sequences: Option<SequencesHeader>,
    /// Symbol tables and bitstream following the sequences header.
    pub sequence_data: Range<usize>,
}

impl CompressedBlock {
    /// Locate both sections inside `content`.
    pub fn parse(content: &[u8]) -> Result<Self> {
        let literals = LiteralsSection::parse(content)?;
        let sequences_start = literals.section_size();

        if sequences_start == content.len() {
            return Ok(Self {
                literals,
                sequences: None,
                sequence_data: sequences_start..sequences_start,
            });
        }

        let sequences = SequencesHeader::decode(&content[sequences_start..])?;
        let data_start = sequences_start + sequences.header_size;

        // A zero count carries no mode byte, tables or bitstream
        if sequences.num_sequences == 0 && data_start != content.len() {
            return Err(Error::TrailingBytes {
                what: "empty sequences section",
                extra: content.len() - data_start,
            });
        }

        Ok(Self {
            literals,
            sequences: Some(sequences),
            sequence_data: data_start..content.len(),
        })
    }

    /// Number of sequences (0 when the section is absent).
    pub fn num_sequences(&self) -> usize {
        self.sequences.map_or(0, |s| s.num_sequences)
    }

    /// Mode selected for a symbol table, if the block has sequences.
    pub fn symbol_mode(&self, kind: SymbolTableKind) -> Option<SymbolMode> {
        self.sequences
            .and_then(|s| s.modes)
            .map(|modes| modes.get(kind))
    }
}

// =============================================================================
// Tests
// =============================================================================
