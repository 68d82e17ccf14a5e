//! Level selection.

use spa_core::CompressionLevel;

/// Picks the concrete level for one call.
///
/// An explicit request wins over the configured default; `Auto` is resolved
/// from the payload byte length, so the result is never `Auto`.
#[derive(Debug, Clone, Copy)]
pub struct LevelSelector {
    default: CompressionLevel,
}

impl LevelSelector {
    pub fn new(default: CompressionLevel) -> Self {
        Self { default }
    }

    pub fn default_level(&self) -> CompressionLevel {
        self.default
    }

    pub fn select(&self, requested: Option<CompressionLevel>, payload_len: usize) -> CompressionLevel {
        let level = requested.unwrap_or(self.default).resolve(payload_len);
        tracing::debug!(?requested, default = %self.default, payload_len, %level, "compression level selected");
        level
    }
}

impl Default for LevelSelector {
    fn default() -> Self {
        Self::new(CompressionLevel::Auto)
    }
}
