//! Seams for collaborators that live outside the framing codec.
//!
//! ## Collaborators
//!
//! ```text
//! ContentHasher   32-bit content checksum (frame trailer)
//! BlockVisitor    entropy decoding + match execution (see `zframe::assemble`)
//! ```

/// Computes the 32-bit content checksum stored at the end of a frame.
///
/// The framing codec never hashes content itself; it only reads the stored
/// value and compares it with what a hasher produces for the regenerated
/// content.
pub trait ContentHasher {
    /// Hash the complete regenerated content of one frame.
    fn checksum(&self, content: &[u8]) -> u32;
}

impl<F> ContentHasher for F
where
    F: Fn(&[u8]) -> u32,
{
    fn checksum(&self, content: &[u8]) -> u32 {
        self(content)
    }
}
