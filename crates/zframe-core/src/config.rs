//! Decoder limits and validation switches.

/// Largest block the format allows, in bytes (128 KiB).
pub const MAX_BLOCK_SIZE: usize = 128 * 1024;

/// How a window descriptor's mantissa scales the window.
///
/// ```text
/// window_base = 1 << window_log
/// LogIncrement:  window_add = (window_log / 8) * mantissa
/// BaseFraction:  window_add = (window_base / 8) * mantissa
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WindowFormula {
    /// Mantissa steps of `window_log / 8` bytes.
    #[default]
    LogIncrement,
    /// Mantissa steps of one eighth of the base window (RFC 8878).
    BaseFraction,
}

/// Configuration for walking frames.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DecoderConfig {
    /// Largest window a frame may request (default: unlimited).
    pub max_window_size: u64,

    /// Upper bound for any block size (default: 128 KiB).
    /// Values above [`MAX_BLOCK_SIZE`] are clamped to it.
    pub max_block_size: usize,

    /// Reject Treeless literals and Repeat modes that have no earlier table
    /// in the same frame (default: true).
    pub check_table_references: bool,

    /// Window size formula (default: [`WindowFormula::LogIncrement`]).
    pub window_formula: WindowFormula,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            max_window_size: u64::MAX,
            max_block_size: MAX_BLOCK_SIZE,
            check_table_references: true,
            window_formula: WindowFormula::LogIncrement,
        }
    }
}

impl DecoderConfig {
    /// Create a config with default limits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the largest accepted window size.
    pub fn with_max_window_size(mut self, bytes: u64) -> Self {
        self.max_window_size = bytes;
        self
    }

    /// Set the block size bound.
    pub fn with_max_block_size(mut self, bytes: usize) -> Self {
        self.max_block_size = bytes;
        self
    }

    /// Enable or disable previous-table reference checks.
    pub fn with_table_reference_checks(mut self, enabled: bool) -> Self {
        self.check_table_references = enabled;
        self
    }

    /// Select the window size formula.
    pub fn with_window_formula(mut self, formula: WindowFormula) -> Self {
        self.window_formula = formula;
        self
    }

    /// Block size limit for a frame with the given window size.
    ///
    /// This is `min(window_size, max_block_size, 128 KiB)`.
    pub fn block_size_limit(&self, window_size: u64) -> usize {
        let cap = self.max_block_size.min(MAX_BLOCK_SIZE);
        usize::try_from(window_size).map_or(cap, |w| w.min(cap))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DecoderConfig::default();
        assert_eq!(config.max_window_size, u64::MAX);
        assert_eq!(config.max_block_size, 128 * 1024);
        assert!(config.check_table_references);
        assert_eq!(config.window_formula, WindowFormula::LogIncrement);
    }

    #[test]
    fn test_block_size_limit_uses_smaller_bound() {
        let config = DecoderConfig::new();
        assert_eq!(config.block_size_limit(1024), 1024);
        assert_eq!(config.block_size_limit(1 << 20), MAX_BLOCK_SIZE);
        assert_eq!(config.block_size_limit(u64::MAX), MAX_BLOCK_SIZE);
        assert_eq!(config.block_size_limit(0), 0);
    }

    #[test]
    fn test_max_block_size_is_clamped() {
        let config = DecoderConfig::new().with_max_block_size(1 << 30);
        assert_eq!(config.block_size_limit(1 << 30), MAX_BLOCK_SIZE);

        let config = DecoderConfig::new().with_max_block_size(4096);
        assert_eq!(config.block_size_limit(1 << 20), 4096);
    }

    #[test]
    fn test_builder_setters() {
        let config = DecoderConfig::new()
            .with_max_window_size(1 << 23)
            .with_table_reference_checks(false)
            .with_window_formula(WindowFormula::BaseFraction);
        assert_eq!(config.max_window_size, 1 << 23);
        assert_eq!(config.window_formula, WindowFormula::BaseFraction);
        assert!(!config.check_table_references);
    }
}
