//! XXH64 content checksum.
//!
//! Zstd frames store the low 32 bits of XXH64 (seed 0) of the regenerated
//! content. The hash itself comes from `xxhash-rust`.

use xxhash_rust::xxh64::xxh64;
use zframe_core::ContentHasher;

/// [`ContentHasher`] computing the Zstd content checksum.
#[derive(Debug, Clone, Copy, Default)]
pub struct Xxh64Checksum;

impl ContentHasher for Xxh64Checksum {
    #[inline]
    fn checksum(&self, content: &[u8]) -> u32 {
        (xxh64(content, 0) & 0xFFFF_FFFF) as u32
    }
}
