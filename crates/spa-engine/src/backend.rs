//! Compression backends.

use spa_core::{CompressionLevel, ContentType, EngineChoice, Result};

/// One way of minifying text.
pub trait CompressorBackend: Send + Sync {
    /// Engine reported in the diagnostic header when this backend ran.
    fn engine(&self) -> EngineChoice;

    fn is_available(&self) -> bool;

    /// Minify `content` at a concrete (already resolved) level.
    fn compress(&self, content: &str, level: CompressionLevel, ty: ContentType) -> Result<String>;
}

/// The pure engine from `spa-minify`. Always available, never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackBackend;

impl CompressorBackend for FallbackBackend {
    fn engine(&self) -> EngineChoice {
        EngineChoice::Fallback
    }

    fn is_available(&self) -> bool {
        true
    }

    fn compress(&self, content: &str, level: CompressionLevel, ty: ContentType) -> Result<String> {
        Ok(spa_minify::minify(content, ty, level))
    }
}
