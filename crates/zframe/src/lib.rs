//! # zframe
//!
//! Zstandard (RFC 8878) framing layer: frame headers, block headers,
//! literals and sequences section headers, and skippable frames.
//!
//! Every structural field is validated before a byte range is exposed. Entropy
//! decoding (Huffman, FSE) and match execution are not performed here; a
//! [`BlockVisitor`] receives each validated block together with the byte
//! ranges it needs.
//!
//! ## Quick Start
//!
//! ```rust
//! use zframe::frame::{BlockHeader, BlockType, FrameHeader, ZSTD_MAGIC};
//! use zframe::{Frame, FrameAssembler};
//!
//! let header = FrameHeader::builder().content_size(5).build().unwrap();
//! let mut data = ZSTD_MAGIC.to_le_bytes().to_vec();
//! header.encode(&mut data);
//! data.extend_from_slice(&BlockHeader::new(true, BlockType::Raw, 5).encode().unwrap());
//! data.extend_from_slice(b"hello");
//!
//! let frames = FrameAssembler::new(&data).frames().unwrap();
//! let Frame::Zstd(summary) = &frames[0] else { unreachable!() };
//! assert_eq!(summary.header.frame_content_size(), Some(5));
//! assert_eq!(&data[summary.blocks[0].content.clone()], b"hello");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          zframe                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  assemble.rs (FrameAssembler, BlockVisitor, EntropyState)   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  frame/             │  block/                               │
//! │  ├── header.rs      │  ├── literals.rs                      │
//! │  ├── block.rs       │  └── sequences.rs                     │
//! │  ├── skippable.rs   │                                       │
//! │  └── checksum.rs    │                                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  zframe-core (Error, DecoderConfig, ContentHasher)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - `xxhash`: [`frame::Xxh64Checksum`], the standard content checksum.
//! - `serde`: serialize [`DecoderConfig`].
//!
//! ## References
//!
//! - [RFC 8878 - Zstandard Compression](https://datatracker.ietf.org/doc/html/rfc8878)
//! - [Zstd Format Specification](https://github.com/facebook/zstd/blob/dev/doc/zstd_compression_format.md)

pub mod assemble;
pub mod block;
pub mod frame;
mod le;

pub use assemble::{
    BlockLayout, BlockSummary, BlockVisitor, EntropyState, Frame, FrameAssembler, FrameSummary,
};
pub use zframe_core::{
    ContentHasher, DecoderConfig, Error, Result, WindowFormula, MAX_BLOCK_SIZE,
};
