//! Zstd frame header codec.
//!
//! The frame header contains the frame descriptor and optional fields:
//!
//! ```text
//! +-------------------------+-----------+
//! | Frame_Header_Descriptor | 1 byte    |
//! | [Window_Descriptor]     | 0-1 byte  |
//! | [Dictionary_ID]         | 0-4 bytes |
//! | [Frame_Content_Size]    | 0-8 bytes |
//! +-------------------------+-----------+
//! ```

use crate::le::{read_le, write_le};
use zframe_core::{Error, Result, WindowFormula};

/// Offset added to a 2-byte frame content size.
const FCS_2_BYTE_OFFSET: u64 = 256;

/// Largest value a 2-byte frame content size can carry (65535 + 256).
const FCS_2_BYTE_MAX: u64 = 0xFFFF + FCS_2_BYTE_OFFSET;

/// Frame header descriptor byte.
///
/// ```text
/// Bit 7-6: Frame_Content_Size_flag
/// Bit 5:   Single_Segment_flag
/// Bit 4:   Unused_bit (preserved, not interpreted)
/// Bit 3:   Reserved_bit (must be 0)
/// Bit 2:   Content_Checksum_flag
/// Bit 1-0: Dictionary_ID_flag
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDescriptor {
    /// Raw descriptor byte.
    raw: u8,
}

impl FrameDescriptor {
    const FCS_SHIFT: u8 = 6;
    const SINGLE_SEGMENT_BIT: u8 = 0x20;
    const UNUSED_BIT: u8 = 0x10;
    const RESERVED_BIT: u8 = 0x08;
    const CHECKSUM_BIT: u8 = 0x04;
    const DICT_ID_MASK: u8 = 0x03;

    /// Parse a frame descriptor from a byte.
    pub fn new(byte: u8) -> Result<Self> {
        if byte & Self::RESERVED_BIT != 0 {
            return Err(Error::frame_descriptor(format!(
                "reserved bit set in descriptor 0x{byte:02X}"
            )));
        }
        Ok(Self { raw: byte })
    }

    /// Assemble a descriptor from its flag groups.
    ///
    /// `fcs_flag` and `dict_flag` are 2-bit fields; wider values are rejected.
    pub fn from_flags(
        fcs_flag: u8,
        single_segment: bool,
        checksum: bool,
        dict_flag: u8,
    ) -> Result<Self> {
        if fcs_flag > 3 || dict_flag > 3 {
            return Err(Error::frame_descriptor(format!(
                "flag out of range: fcs={fcs_flag}, dictionary id={dict_flag}"
            )));
        }
        let mut raw = (fcs_flag << Self::FCS_SHIFT) | dict_flag;
        if single_segment {
            raw |= Self::SINGLE_SEGMENT_BIT;
        }
        if checksum {
            raw |= Self::CHECKSUM_BIT;
        }
        Self::new(raw)
    }

    /// Raw descriptor byte.
    #[inline]
    pub fn raw(&self) -> u8 {
        self.raw
    }

    /// Get the Frame_Content_Size_flag (bits 7-6).
    #[inline]
    pub fn frame_content_size_flag(&self) -> u8 {
        self.raw >> Self::FCS_SHIFT
    }

    /// Get the Single_Segment_flag (bit 5).
    /// When set, window size is the frame content size.
    #[inline]
    pub fn single_segment_flag(&self) -> bool {
        self.raw & Self::SINGLE_SEGMENT_BIT != 0
    }

    /// Get the unused bit (bit 4).
    #[inline]
    pub fn unused_bit(&self) -> bool {
        self.raw & Self::UNUSED_BIT != 0
    }

    /// Get the Content_Checksum_flag (bit 2).
    /// When set, a 4-byte checksum follows the last block.
    #[inline]
    pub fn content_checksum_flag(&self) -> bool {
        self.raw & Self::CHECKSUM_BIT != 0
    }

    /// Get the Dictionary_ID_flag (bits 1-0).
    #[inline]
    pub fn dictionary_id_flag(&self) -> u8 {
        self.raw & Self::DICT_ID_MASK
    }

    /// Number of bytes in the frame content size field: 0, 1, 2, 4 or 8.
    ///
    /// Flag 0 means 1 byte with the single segment flag, otherwise no field.
    pub fn content_size_field_size(&self) -> Result<usize> {
        match self.frame_content_size_flag() {
            0 if self.single_segment_flag() => Ok(1),
            0 => Ok(0),
            1 => Ok(2),
            2 => Ok(4),
            3 => Ok(8),
            flag => Err(Error::frame_descriptor(format!(
                "frame content size flag {flag} out of range"
            ))),
        }
    }

    /// Number of bytes in the dictionary ID field: 0, 1, 2 or 4.
    pub fn dictionary_id_field_size(&self) -> Result<usize> {
        match self.dictionary_id_flag() {
            0 => Ok(0),
            1 => Ok(1),
            2 => Ok(2),
            3 => Ok(4),
            flag => Err(Error::frame_descriptor(format!(
                "dictionary id flag {flag} out of range"
            ))),
        }
    }

    /// Whether this frame carries a window descriptor byte.
    #[inline]
    pub fn has_window_descriptor(&self) -> bool {
        !self.single_segment_flag()
    }

    /// Total frame header length in bytes, descriptor included and magic
    /// number excluded.
    pub fn header_size(&self) -> Result<usize> {
        Ok(1 + usize::from(self.has_window_descriptor())
            + self.dictionary_id_field_size()?
            + self.content_size_field_size()?)
    }
}

/// Window descriptor byte: exponent in bits 7-3, mantissa in bits 2-0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowDescriptor {
    raw: u8,
}

impl WindowDescriptor {
    /// Smallest window log (1 KiB).
    pub const MIN_WINDOW_LOG: u32 = 10;

    /// Wrap a raw window descriptor byte. Every byte value is valid.
    pub fn new(byte: u8) -> Self {
        Self { raw: byte }
    }

    /// Build a descriptor from its exponent (0-31) and mantissa (0-7).
    pub fn from_parts(exponent: u8, mantissa: u8) -> Result<Self> {
        if exponent > 31 || mantissa > 7 {
            return Err(Error::frame_descriptor(format!(
                "window exponent {exponent} / mantissa {mantissa} out of range"
            )));
        }
        Ok(Self {
            raw: (exponent << 3) | mantissa,
        })
    }

    /// Smallest descriptor whose window is at least `window_size` bytes.
    pub fn covering(window_size: u64) -> Result<Self> {
        Self::covering_with(window_size, WindowFormula::default())
    }

    /// [`WindowDescriptor::covering`] under an explicit formula.
    pub fn covering_with(window_size: u64, formula: WindowFormula) -> Result<Self> {
        (0..=255u8)
            .map(Self::new)
            .find(|d| d.window_size_with(formula) >= window_size)
            .ok_or_else(|| {
                Error::frame_descriptor(format!(
                    "window size {window_size} exceeds the largest descriptor"
                ))
            })
    }

    /// Raw descriptor byte.
    #[inline]
    pub fn raw(&self) -> u8 {
        self.raw
    }

    /// Exponent (top 5 bits).
    #[inline]
    pub fn exponent(&self) -> u8 {
        self.raw >> 3
    }

    /// Mantissa (low 3 bits).
    #[inline]
    pub fn mantissa(&self) -> u8 {
        self.raw & 0x07
    }

    /// `10 + exponent`.
    #[inline]
    pub fn window_log(&self) -> u32 {
        Self::MIN_WINDOW_LOG + self.exponent() as u32
    }

    /// Window size in bytes.
    ///
    /// ```text
    /// window_base = 1 << window_log
    /// window_add  = (window_log / 8) * mantissa
    /// window_size = window_base + window_add
    /// ```
    ///
    /// The largest value is (1 << 41) + 5 * 7.
    pub fn window_size(&self) -> u64 {
        self.window_size_with(WindowFormula::default())
    }

    /// Window size in bytes under `formula`.
    ///
    /// [`WindowFormula::BaseFraction`] tops out at (1 << 41) + 7 * (1 << 38).
    pub fn window_size_with(&self, formula: WindowFormula) -> u64 {
        let window_log = self.window_log() as u64;
        let window_base = 1u64 << window_log;
        let step = match formula {
            WindowFormula::LogIncrement => window_log / 8,
            WindowFormula::BaseFraction => window_base / 8,
        };
        window_base + step * self.mantissa() as u64
    }
}

/// Parsed Zstd frame header.
///
/// Fields are private: the descriptor decides which optional fields exist and
/// how wide they are, and every constructor keeps the two in agreement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameHeader {
    descriptor: FrameDescriptor,
    window_descriptor: Option<WindowDescriptor>,
    dictionary_id: u32,
    frame_content_size: Option<u64>,
}

impl FrameHeader {
    /// Length of the header that starts with `descriptor_byte`.
    ///
    /// Lets a caller request exactly the right number of bytes before any
    /// variable field is read.
    pub fn required_len(descriptor_byte: u8) -> Result<usize> {
        FrameDescriptor::new(descriptor_byte)?.header_size()
    }

    /// Decode a frame header.
    ///
    /// The buffer starts at the frame descriptor (after the magic number).
    /// Only the header bytes are read; trailing data is ignored.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let first = *data
            .first()
            .ok_or_else(|| Error::truncated("frame header descriptor", 1, 0))?;
        let descriptor = FrameDescriptor::new(first)?;
        let header_size = descriptor.header_size()?;
        if data.len() < header_size {
            return Err(Error::truncated("frame header", header_size, data.len()));
        }

        let mut offset = 1;

        let window_descriptor = if descriptor.has_window_descriptor() {
            let byte = data[offset];
            offset += 1;
            Some(WindowDescriptor::new(byte))
        } else {
            None
        };

        let dict_bytes = descriptor.dictionary_id_field_size()?;
        let dictionary_id = read_le(&data[offset..], dict_bytes, "dictionary id")? as u32;
        offset += dict_bytes;

        let fcs_bytes = descriptor.content_size_field_size()?;
        let frame_content_size = match fcs_bytes {
            0 => None,
            2 => Some(read_le(&data[offset..], 2, "frame content size")? + FCS_2_BYTE_OFFSET),
            n => Some(read_le(&data[offset..], n, "frame content size")?),
        };

        Ok(Self {
            descriptor,
            window_descriptor,
            dictionary_id,
            frame_content_size,
        })
    }

    /// Start building a header from field values.
    pub fn builder() -> FrameHeaderBuilder {
        FrameHeaderBuilder::default()
    }

    /// Frame descriptor.
    #[inline]
    pub fn descriptor(&self) -> FrameDescriptor {
        self.descriptor
    }

    /// Window descriptor, absent for single segment frames.
    #[inline]
    pub fn window_descriptor(&self) -> Option<WindowDescriptor> {
        self.window_descriptor
    }

    /// Dictionary ID (0 if not present).
    #[inline]
    pub fn dictionary_id(&self) -> u32 {
        self.dictionary_id
    }

    /// Frame content size, if declared.
    #[inline]
    pub fn frame_content_size(&self) -> Option<u64> {
        self.frame_content_size
    }

    /// Whether a content checksum follows the last block.
    #[inline]
    pub fn has_checksum(&self) -> bool {
        self.descriptor.content_checksum_flag()
    }

    /// Minimum history buffer size needed to decode this frame.
    ///
    /// Single segment frames use the frame content size exactly.
    pub fn window_size(&self) -> u64 {
        self.window_size_with(WindowFormula::default())
    }

    /// [`FrameHeader::window_size`] under an explicit formula.
    pub fn window_size_with(&self, formula: WindowFormula) -> u64 {
        match self.window_descriptor {
            Some(window) => window.window_size_with(formula),
            None => self.frame_content_size.unwrap_or(0),
        }
    }

    /// Encoded length in bytes (magic number excluded).
    pub fn header_size(&self) -> usize {
        1 + usize::from(self.window_descriptor.is_some())
            + dict_field_width(self.descriptor.dictionary_id_flag())
            + fcs_field_width(self.descriptor)
    }

    /// Encode this header, the exact inverse of [`FrameHeader::decode`].
    pub fn encode(&self, output: &mut Vec<u8>) {
        output.push(self.descriptor.raw());
        if let Some(window) = self.window_descriptor {
            output.push(window.raw());
        }
        write_le(
            output,
            self.dictionary_id as u64,
            dict_field_width(self.descriptor.dictionary_id_flag()),
        );
        match (fcs_field_width(self.descriptor), self.frame_content_size) {
            (0, _) | (_, None) => {}
            (2, Some(size)) => write_le(output, size - FCS_2_BYTE_OFFSET, 2),
            (width, Some(size)) => write_le(output, size, width),
        }
    }

    /// Encode into a fresh buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.header_size());
        self.encode(&mut out);
        out
    }
}

/// Field width for an already validated dictionary ID flag.
fn dict_field_width(flag: u8) -> usize {
    match flag {
        1 => 1,
        2 => 2,
        3 => 4,
        _ => 0,
    }
}

/// Field width for an already validated descriptor.
fn fcs_field_width(descriptor: FrameDescriptor) -> usize {
    match descriptor.frame_content_size_flag() {
        1 => 2,
        2 => 4,
        3 => 8,
        _ => usize::from(descriptor.single_segment_flag()),
    }
}

/// Builds a [`FrameHeader`] with the smallest field widths that carry the
/// requested values.
///
/// ```
/// use zframe::frame::FrameHeader;
///
/// let header = FrameHeader::builder().content_size(18).build().unwrap();
/// assert!(header.descriptor().single_segment_flag());
/// assert_eq!(header.to_bytes(), [0x20, 18]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FrameHeaderBuilder {
    window_size: Option<u64>,
    content_size: Option<u64>,
    dictionary_id: u32,
    checksum: bool,
}

impl FrameHeaderBuilder {
    /// Request a window of at least this many bytes.
    ///
    /// Without a window size the header is written in single segment mode,
    /// which requires a content size.
    pub fn window_size(mut self, bytes: u64) -> Self {
        self.window_size = Some(bytes);
        self
    }

    /// Declare the frame content size.
    pub fn content_size(mut self, bytes: u64) -> Self {
        self.content_size = Some(bytes);
        self
    }

    /// Declare a dictionary ID (0 means no dictionary).
    pub fn dictionary_id(mut self, id: u32) -> Self {
        self.dictionary_id = id;
        self
    }

    /// Announce a trailing content checksum.
    pub fn checksum(mut self, enabled: bool) -> Self {
        self.checksum = enabled;
        self
    }

    /// Pick flags and build the header.
    pub fn build(self) -> Result<FrameHeader> {
        let single_segment = self.window_size.is_none();
        if single_segment && self.content_size.is_none() {
            return Err(Error::frame_descriptor(
                "single segment frames need a content size; set a window size instead",
            ));
        }

        let window_descriptor = self.window_size.map(WindowDescriptor::covering).transpose()?;

        let fcs_flag = match self.content_size {
            None => 0,
            Some(size) if single_segment && size <= 0xFF => 0,
            Some(size) if (FCS_2_BYTE_OFFSET..=FCS_2_BYTE_MAX).contains(&size) => 1,
            Some(size) if size <= u32::MAX as u64 => 2,
            Some(_) => 3,
        };

        let dict_flag = match self.dictionary_id {
            0 => 0,
            1..=0xFF => 1,
            0x100..=0xFFFF => 2,
            _ => 3,
        };

        let descriptor = FrameDescriptor::from_flags(fcs_flag, single_segment, self.checksum, dict_flag)?;

        Ok(FrameHeader {
            descriptor,
            window_descriptor,
            dictionary_id: self.dictionary_id,
            frame_content_size: self.content_size,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
