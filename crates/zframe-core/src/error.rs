//! Error types for framing operations.

use thiserror::Error;

/// Result type alias for framing operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Framing error types.
///
/// Every variant is fatal to the frame being processed. Malformed input is
/// never coerced into a default value.
#[derive(Debug, Error)]
pub enum Error {
    /// Leading four bytes match neither the frame magic nor a skippable magic.
    #[error("malformed magic number 0x{magic:08X} at offset {offset}")]
    MalformedMagic { magic: u32, offset: usize },

    /// Frame header descriptor (or a value it must describe) is invalid.
    #[error("invalid frame descriptor: {0}")]
    InvalidFrameDescriptor(String),

    /// Literals section header uses an unmapped size format or a size that
    /// does not fit the selected format.
    #[error("invalid literals size format: {0}")]
    InvalidSizeFormat(String),

    /// Sequences section mode byte has reserved bits set.
    #[error("invalid sequence mode byte 0x{byte:02X}: reserved bits must be zero")]
    InvalidSequenceModeByte { byte: u8 },

    /// Block type field holds the reserved value.
    #[error("reserved block type at offset {offset}")]
    ReservedBlockType { offset: usize },

    /// Block size does not fit the 21-bit block size field.
    #[error("block size {size} does not fit in 21 bits")]
    BlockSizeOverflow { size: usize },

    /// Declared block size is larger than the frame allows.
    #[error("block size {size} exceeds maximum {limit} at offset {offset}")]
    BlockSizeExceedsWindow {
        size: usize,
        limit: usize,
        offset: usize,
    },

    /// Fourth literals stream would have a negative size.
    #[error("negative fourth stream size: {total} total bytes, {declared} declared by jump table")]
    NegativeStreamSize { total: usize, declared: usize },

    /// Fewer bytes remain than a field requires.
    #[error("truncated input: {what} needs {required} bytes, {available} available")]
    TruncatedInput {
        what: &'static str,
        required: usize,
        available: usize,
    },

    /// Bytes follow a section that must end its block.
    #[error("{extra} unexpected bytes after {what}")]
    TrailingBytes { what: &'static str, extra: usize },

    /// Window size is larger than the configured decoder limit.
    #[error("window size {window_size} exceeds configured limit {limit}")]
    WindowTooLarge { window_size: u64, limit: u64 },

    /// A block refers to an entropy table no earlier block provided.
    #[error("{table} table referenced before any block in the frame defined it")]
    MissingPreviousTable { table: &'static str },

    /// Content checksum verification failed.
    #[error("checksum mismatch: expected 0x{expected:08x}, got 0x{actual:08x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// Failure reported by an external collaborator (entropy decoder,
    /// match executor) while it consumed a block.
    #[error("collaborator error: {0}")]
    Collaborator(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Create a truncated input error.
    pub fn truncated(what: &'static str, required: usize, available: usize) -> Self {
        Error::TruncatedInput {
            what,
            required,
            available,
        }
    }

    /// Create an invalid frame descriptor error.
    pub fn frame_descriptor(message: impl Into<String>) -> Self {
        Error::InvalidFrameDescriptor(message.into())
    }

    /// Create an invalid size format error.
    pub fn size_format(message: impl Into<String>) -> Self {
        Error::InvalidSizeFormat(message.into())
    }

    /// Create a checksum mismatch error.
    pub fn checksum_mismatch(expected: u32, actual: u32) -> Self {
        Error::ChecksumMismatch { expected, actual }
    }

    /// Wrap an error raised by a collaborator.
    pub fn collaborator(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Collaborator(err.into())
    }

    /// Get error category for log fields.
    pub fn category(&self) -> &'static str {
        match self {
            Error::MalformedMagic { .. } => "malformed_magic",
            Error::InvalidFrameDescriptor(_) => "invalid_frame_descriptor",
            Error::InvalidSizeFormat(_) => "invalid_size_format",
            Error::InvalidSequenceModeByte { .. } => "invalid_sequence_mode_byte",
            Error::ReservedBlockType { .. } => "reserved_block_type",
            Error::BlockSizeOverflow { .. } => "block_size_overflow",
            Error::BlockSizeExceedsWindow { .. } => "block_size_exceeds_window",
            Error::NegativeStreamSize { .. } => "negative_stream_size",
            Error::TruncatedInput { .. } => "truncated_input",
            Error::TrailingBytes { .. } => "trailing_bytes",
            Error::WindowTooLarge { .. } => "window_too_large",
            Error::MissingPreviousTable { .. } => "missing_previous_table",
            Error::ChecksumMismatch { .. } => "checksum_mismatch",
            Error::Collaborator(_) => "collaborator",
        }
    }
}
