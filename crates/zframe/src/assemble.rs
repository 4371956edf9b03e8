//! Frame assembler.
//!
//! Walks a buffer frame by frame and block by block, validating every
//! structural field before any byte range is handed out. Entropy decoding and
//! match execution are left to a [`BlockVisitor`].
//!
//! ```text
//! input ─► magic ─┬─ 0xFD2FB528 ─► FrameHeader ─► BlockHeader ─► content ─┐
//!                 │                                   ▲                  │
//!                 │                                   └──── !last ◄──────┤
//!                 │                                                      ▼
//!                 │                                           [Content_Checksum]
//!                 └─ 0x184D2A5? ─► SkippableFrame (payload never read)
//! ```

use crate::block::{CompressedBlock, LiteralsBlockType, SymbolMode, SymbolTableKind};
use crate::frame::{
    is_skippable_magic, BlockHeader, BlockType, FrameHeader, SkippableFrame, CHECKSUM_SIZE,
    ZSTD_MAGIC,
};
use crate::le::read_u32;
use std::ops::Range;
use tracing::{debug, trace, warn};
use zframe_core::{ContentHasher, DecoderConfig, Error, Result};

// =============================================================================
// Entropy table availability
// =============================================================================

/// Which "previous" entropy tables exist at a point in a frame.
///
/// Treeless literals reuse the last Huffman table and Repeat mode reuses the
/// last FSE table of its kind. Both are only meaningful once an earlier block
/// of the same frame supplied a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntropyState {
    huffman: bool,
    literal_lengths: bool,
    offsets: bool,
    match_lengths: bool,
}

impl EntropyState {
    /// Whether a Huffman table has been described in this frame.
    pub fn has_huffman(&self) -> bool {
        self.huffman
    }

    /// Whether a table of `kind` has been established in this frame.
    pub fn has_table(&self, kind: SymbolTableKind) -> bool {
        match kind {
            SymbolTableKind::LiteralLength => self.literal_lengths,
            SymbolTableKind::Offset => self.offsets,
            SymbolTableKind::MatchLength => self.match_lengths,
        }
    }

    fn table_mut(&mut self, kind: SymbolTableKind) -> &mut bool {
        match kind {
            SymbolTableKind::LiteralLength => &mut self.literal_lengths,
            SymbolTableKind::Offset => &mut self.offsets,
            SymbolTableKind::MatchLength => &mut self.match_lengths,
        }
    }

    /// Check the table references of `block`, then record what it defines.
    ///
    /// With `enforce` unset the state is still updated but nothing is
    /// rejected. A dictionary can supply tables, so frames with a nonzero
    /// dictionary ID are never rejected either.
    pub fn apply(
        &mut self,
        block: &CompressedBlock,
        dictionary_id: u32,
        enforce: bool,
    ) -> Result<()> {
        let enforce = enforce && dictionary_id == 0;

        match block.literals.header.block_type {
            LiteralsBlockType::Compressed => self.huffman = true,
            LiteralsBlockType::Treeless if enforce && !self.huffman => {
                return Err(Error::MissingPreviousTable { table: "huffman" });
            }
            _ => {}
        }

        let Some(modes) = block.sequences.and_then(|s| s.modes) else {
            return Ok(());
        };

        for kind in SymbolTableKind::ALL {
            if modes.get(kind) == SymbolMode::Repeat && enforce && !self.has_table(kind) {
                return Err(Error::MissingPreviousTable { table: kind.name() });
            }
        }
        for kind in SymbolTableKind::ALL {
            *self.table_mut(kind) = true;
        }
        Ok(())
    }
}

// =============================================================================
// Frame summaries
// =============================================================================

/// Block kind with the data needed to regenerate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockLayout {
    /// Content is stored verbatim.
    Raw,
    /// `byte` repeated `repeat` times.
    Rle { byte: u8, repeat: usize },
    /// Entropy coded sections.
    Compressed(CompressedBlock),
}

/// One validated block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockSummary {
    /// Decoded block header.
    pub header: BlockHeader,
    /// Offset of the block header in the input.
    pub offset: usize,
    /// Block content in the input (after the header).
    pub content: Range<usize>,
    /// Layout of the content.
    pub layout: BlockLayout,
}

/// One validated Zstandard frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSummary {
    /// Decoded frame header.
    pub header: FrameHeader,
    /// Blocks in frame order; the last one has `last_block` set.
    pub blocks: Vec<BlockSummary>,
    /// Content checksum, when the descriptor declares one.
    pub checksum: Option<u32>,
    /// Bytes of the input covered by the frame, magic number included.
    pub span: Range<usize>,
}

impl FrameSummary {
    /// Regenerated size when every block's size is known from its header.
    pub fn regenerated_size_hint(&self) -> Option<u64> {
        self.header.frame_content_size().or_else(|| {
            self.blocks
                .iter()
                .map(|b| b.header.regenerated_size().map(|s| s as u64))
                .sum()
        })
    }

    /// Compare the stored checksum with `hasher` applied to the regenerated
    /// content.
    ///
    /// Frames without a checksum always pass.
    pub fn verify_checksum(&self, content: &[u8], hasher: &impl ContentHasher) -> Result<()> {
        let Some(expected) = self.checksum else {
            return Ok(());
        };
        let actual = hasher.checksum(content);
        if expected != actual {
            return Err(Error::checksum_mismatch(expected, actual));
        }
        Ok(())
    }
}

/// A frame produced by [`FrameAssembler::next_frame`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A Zstandard frame.
    Zstd(FrameSummary),
    /// A skippable frame starting at `offset`.
    Skippable { offset: usize, frame: SkippableFrame },
}

impl Frame {
    /// Bytes of the input covered by the frame.
    pub fn span(&self) -> Range<usize> {
        match self {
            Frame::Zstd(summary) => summary.span.clone(),
            Frame::Skippable { offset, frame } => *offset..*offset + frame.total_size(),
        }
    }
}

// =============================================================================
// Visitor
// =============================================================================

/// Consumer of validated blocks.
///
/// A fresh `Context` is created when a frame starts and handed to
/// [`BlockVisitor::end_frame`] when it ends, so cross-block decoder state
/// (previous Huffman and FSE tables, history window) never outlives its frame.
/// Errors from a visitor abort the walk; wrap foreign errors with
/// [`Error::collaborator`].
pub trait BlockVisitor {
    /// Per-frame decoder state.
    type Context: Default;

    /// Called after the frame header is validated.
    fn begin_frame(&mut self, _header: &FrameHeader, _ctx: &mut Self::Context) -> Result<()> {
        Ok(())
    }

    /// Called for every block once its structure is validated.
    ///
    /// `content` is the block content; ranges inside a
    /// [`BlockLayout::Compressed`] layout index into it.
    fn block(
        &mut self,
        block: &BlockSummary,
        content: &[u8],
        ctx: &mut Self::Context,
    ) -> Result<()>;

    /// Called after the last block and the checksum are read.
    fn end_frame(&mut self, _summary: &FrameSummary, _ctx: Self::Context) -> Result<()> {
        Ok(())
    }

    /// Called for each skippable frame with its opaque payload.
    fn skippable_frame(&mut self, _frame: &SkippableFrame, _payload: &[u8]) -> Result<()> {
        Ok(())
    }
}

/// Visitor that only validates.
struct Validate;

impl BlockVisitor for Validate {
    type Context = ();

    fn block(&mut self, _block: &BlockSummary, _content: &[u8], _ctx: &mut ()) -> Result<()> {
        Ok(())
    }
}

// =============================================================================
// Assembler
// =============================================================================

/// Cursor over a buffer of concatenated frames.
///
/// The cursor only moves past a frame once the whole frame has been
/// validated. After an error it still points at the start of the failing
/// frame, and the error carries the offset of the failing field.
#[derive(Debug, Clone)]
pub struct FrameAssembler<'a> {
    input: &'a [u8],
    position: usize,
    config: DecoderConfig,
}

impl<'a> FrameAssembler<'a> {
    /// Create an assembler with the default configuration.
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, DecoderConfig::default())
    }

    /// Create an assembler with a custom configuration.
    pub fn with_config(input: &'a [u8], config: DecoderConfig) -> Self {
        Self {
            input,
            position: 0,
            config,
        }
    }

    /// Offset of the next unread frame.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether the whole input has been consumed.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Decoder configuration.
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Validate the next frame without decoding it.
    ///
    /// Returns `Ok(None)` at the end of the input.
    pub fn next_frame(&mut self) -> Result<Option<Frame>> {
        self.visit_frame(&mut Validate)
    }

    /// Validate every remaining frame.
    pub fn frames(mut self) -> Result<Vec<Frame>> {
        let mut frames = Vec::new();
        while let Some(frame) = self.next_frame()? {
            frames.push(frame);
        }
        Ok(frames)
    }

    /// Feed every remaining frame to `visitor`.
    ///
    /// Returns the number of frames visited, skippable frames included.
    pub fn walk<V: BlockVisitor>(&mut self, visitor: &mut V) -> Result<usize> {
        let mut count = 0;
        while self.visit_frame(visitor)?.is_some() {
            count += 1;
        }
        Ok(count)
    }

    /// Feed the next frame to `visitor`.
    pub fn visit_frame<V: BlockVisitor>(&mut self, visitor: &mut V) -> Result<Option<Frame>> {
        if self.is_finished() {
            return Ok(None);
        }

        let start = self.position;
        match self.read_frame(start, visitor) {
            Ok(frame) => {
                self.position = frame.span().end;
                Ok(Some(frame))
            }
            Err(err) => {
                warn!(
                    offset = start,
                    category = err.category(),
                    "Rejected frame: {}",
                    err
                );
                Err(err)
            }
        }
    }

    fn read_frame<V: BlockVisitor>(&self, start: usize, visitor: &mut V) -> Result<Frame> {
        let data = &self.input[start..];
        let magic = read_u32(data, "frame magic")?;

        if is_skippable_magic(magic) {
            let frame = SkippableFrame::parse(data)?;
            debug!(
                offset = start,
                magic,
                frame_size = frame.frame_size,
                "Skippable frame"
            );
            visitor.skippable_frame(&frame, &data[frame.payload_range()])?;
            return Ok(Frame::Skippable {
                offset: start,
                frame,
            });
        }

        if magic != ZSTD_MAGIC {
            return Err(Error::MalformedMagic {
                magic,
                offset: start,
            });
        }

        self.read_zstd_frame(start, visitor).map(Frame::Zstd)
    }

    fn read_zstd_frame<V: BlockVisitor>(
        &self,
        start: usize,
        visitor: &mut V,
    ) -> Result<FrameSummary> {
        let header_start = start + 4;
        let header = FrameHeader::decode(&self.input[header_start..])?;

        let window_size = header.window_size_with(self.config.window_formula);
        if window_size > self.config.max_window_size {
            return Err(Error::WindowTooLarge {
                window_size,
                limit: self.config.max_window_size,
            });
        }
        let block_limit = self.config.block_size_limit(window_size);

        debug!(
            offset = start,
            window_size,
            dictionary_id = header.dictionary_id(),
            content_size = ?header.frame_content_size(),
            checksum = header.has_checksum(),
            "Frame header"
        );

        let mut ctx = V::Context::default();
        visitor.begin_frame(&header, &mut ctx)?;

        let mut entropy = EntropyState::default();
        let mut blocks = Vec::new();
        let mut pos = header_start + header.header_size();

        loop {
            let block = self.read_block(pos, block_limit, &header, &mut entropy)?;
            trace!(
                offset = block.offset,
                block_type = ?block.header.block_type,
                block_size = block.header.block_size,
                last = block.header.last_block,
                "Block"
            );

            visitor.block(&block, &self.input[block.content.clone()], &mut ctx)?;
            pos = block.content.end;
            let last = block.header.last_block;
            blocks.push(block);
            if last {
                break;
            }
        }

        let checksum = if header.has_checksum() {
            let value = read_u32(&self.input[pos..], "content checksum")?;
            pos += CHECKSUM_SIZE;
            Some(value)
        } else {
            None
        };

        let summary = FrameSummary {
            header,
            blocks,
            checksum,
            span: start..pos,
        };
        visitor.end_frame(&summary, ctx)?;
        Ok(summary)
    }

    fn read_block(
        &self,
        offset: usize,
        limit: usize,
        frame: &FrameHeader,
        entropy: &mut EntropyState,
    ) -> Result<BlockSummary> {
        let header = BlockHeader::decode(&self.input[offset..])?;
        header.validate(offset)?;

        if header.block_size > limit {
            return Err(Error::BlockSizeExceedsWindow {
                size: header.block_size,
                limit,
                offset,
            });
        }

        let content_start = offset + BlockHeader::SIZE;
        let content_end = content_start + header.content_size();
        let content = self
            .input
            .get(content_start..content_end)
            .ok_or_else(|| {
                Error::truncated(
                    "block content",
                    header.content_size(),
                    self.input.len() - content_start,
                )
            })?;

        let layout = match header.block_type {
            BlockType::Raw => BlockLayout::Raw,
            BlockType::Rle => BlockLayout::Rle {
                byte: content[0],
                repeat: header.block_size,
            },
            BlockType::Compressed => {
                let block = CompressedBlock::parse(content)?;
                entropy.apply(
                    &block,
                    frame.dictionary_id(),
                    self.config.check_table_references,
                )?;
                BlockLayout::Compressed(block)
            }
            BlockType::Reserved => return Err(Error::ReservedBlockType { offset }),
        };

        Ok(BlockSummary {
            header,
            offset,
            content: content_start..content_end,
            layout,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
