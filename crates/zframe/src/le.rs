//! Little-endian field helpers shared by the codecs.

use zframe_core::{Error, Result};

/// Read a little-endian unsigned integer of `width` bytes (at most 8).
pub(crate) fn read_le(data: &[u8], width: usize, what: &'static str) -> Result<u64> {
    debug_assert!(width <= 8);
    let bytes = data
        .get(..width)
        .ok_or_else(|| Error::truncated(what, width, data.len()))?;
    Ok(bytes
        .iter()
        .enumerate()
        .fold(0u64, |acc, (i, &b)| acc | ((b as u64) << (8 * i))))
}

/// Append the low `width` bytes of `value` in little-endian order.
pub(crate) fn write_le(output: &mut Vec<u8>, value: u64, width: usize) {
    debug_assert!(width <= 8);
    output.extend_from_slice(&value.to_le_bytes()[..width]);
}

/// Read a little-endian u32 from the first four bytes.
pub(crate) fn read_u32(data: &[u8], what: &'static str) -> Result<u32> {
    read_le(data, 4, what).map(|v| v as u32)
}
