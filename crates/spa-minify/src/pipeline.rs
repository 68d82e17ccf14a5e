//! Minifier dispatcher: one entry point for every content type.

use spa_core::{CompressionLevel, ContentType};

use crate::{css, html, js};

/// Minification result with statistics.
#[derive(Debug, Clone)]
pub struct MinifyResult {
    pub output: String,
    pub original_len: usize,
    pub minified_len: usize,
    pub reduction_pct: f64,
    /// Concrete level that ran; never `Auto`.
    pub level: CompressionLevel,
    pub passes_applied: Vec<String>,
}

impl MinifyResult {
    pub fn ratio(&self) -> f64 {
        if self.original_len == 0 {
            return 1.0;
        }
        self.minified_len as f64 / self.original_len as f64
    }
}

/// The pure minification engine.
#[derive(Debug, Clone, Copy)]
pub struct Minifier {
    pub level: CompressionLevel,
}

impl Minifier {
    pub fn new(level: CompressionLevel) -> Self {
        Self { level }
    }

    pub fn basic() -> Self { Self::new(CompressionLevel::Basic) }
    pub fn aggressive() -> Self { Self::new(CompressionLevel::Aggressive) }
    pub fn extreme() -> Self { Self::new(CompressionLevel::Extreme) }

    /// Minify `content` as `ty`. `Auto` is resolved from the byte length first.
    pub fn minify(&self, content: &str, ty: ContentType) -> MinifyResult {
        let original_len = content.len();
        let level = self.level.resolve(original_len);
        let mut passes = Vec::new();

        let output = if level.is_disabled() {
            content.to_string()
        } else {
            match ty {
                ContentType::Html => {
                    passes.push("html".into());
                    html::minify(content, level)
                }
                ContentType::Css => {
                    passes.push("css".into());
                    css::minify(content, level)
                }
                ContentType::Js => {
                    passes.push("js".into());
                    js::minify(content, level)
                }
                // Byte compression only.
                ContentType::Json => content.to_string(),
            }
        };

        let minified_len = output.len();
        let reduction_pct = if original_len > 0 {
            (original_len.saturating_sub(minified_len) as f64 / original_len as f64) * 100.0
        } else {
            0.0
        };

        tracing::trace!(%ty, %level, original_len, minified_len, "minified");

        MinifyResult {
            output,
            original_len,
            minified_len,
            reduction_pct,
            level,
            passes_applied: passes,
        }
    }
}

impl Default for Minifier {
    fn default() -> Self {
        Self::new(CompressionLevel::Auto)
    }
}

/// Minify `content` at `level` and return only the text.
pub fn minify(content: &str, ty: ContentType, level: CompressionLevel) -> String {
    Minifier::new(level).minify(content, ty).output
}
