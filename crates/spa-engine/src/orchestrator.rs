//! Engine orchestration: level, backend, protected blocks, gzip.

use spa_core::{CompressError, CompressionConfig, CompressionLevel, ContentType, EngineChoice, Result, Strategy};
use spa_minify::{html, literal_guard};

use crate::backend::{CompressorBackend, FallbackBackend};
use crate::gzip;
use crate::level::LevelSelector;
use crate::native::NativeDelegate;
use crate::response::{CompressedResponse, CompressionResult, CompressionStats};

/// Coordinates level selection, backend choice and the gzip layer.
///
/// Stateless per call; share one instance per process so the native library
/// is resolved only once.
pub struct EngineOrchestrator {
    config: CompressionConfig,
    selector: LevelSelector,
    native: Box<dyn CompressorBackend>,
    fallback: Box<dyn CompressorBackend>,
}

impl EngineOrchestrator {
    pub fn new(config: CompressionConfig) -> Self {
        let native = NativeDelegate::from_config(&config);
        Self::with_backends(config, Box::new(native), Box::new(FallbackBackend))
    }

    /// Orchestrator with explicit backends.
    pub fn with_backends(
        config: CompressionConfig,
        native: Box<dyn CompressorBackend>,
        fallback: Box<dyn CompressorBackend>,
    ) -> Self {
        Self {
            selector: LevelSelector::new(config.level),
            config,
            native,
            fallback,
        }
    }

    /// Orchestrator configured from the `SPA_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(CompressionConfig::from_env()?))
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    pub fn native_available(&self) -> bool {
        self.native.is_available()
    }

    /// Startup check for the `native` strategy.
    pub fn require_native(&self) -> Result<()> {
        if self.native.is_available() {
            Ok(())
        } else {
            Err(CompressError::NativeUnavailable("native compressor not available".into()))
        }
    }

    /// Minify `content`. `requested` overrides the configured level.
    pub fn compress(
        &self,
        content: &str,
        ty: ContentType,
        requested: Option<CompressionLevel>,
    ) -> Result<CompressionResult> {
        let level = self.selector.select(requested, content.len());
        if level.is_disabled() || ty == ContentType::Json {
            return Ok(passthrough(content));
        }

        let (output, engine) = match ty {
            ContentType::Html => {
                let (guarded, blocks) = html::protect_preformatted(content);
                let (output, engine) = self.run(&guarded, level, ty)?;
                (literal_guard::restore(&output, &blocks), engine)
            }
            _ => self.run(content, level, ty)?,
        };

        let stats = CompressionStats {
            original_len: content.len(),
            minified_len: output.len(),
            body_len: output.len(),
        };
        Ok(CompressionResult { output, level, engine, stats })
    }

    fn run(&self, content: &str, level: CompressionLevel, ty: ContentType) -> Result<(String, EngineChoice)> {
        match self.config.strategy {
            Strategy::Fallback => self.run_fallback(content, level, ty),
            Strategy::Native => {
                tracing::debug!(%ty, %level, "native engine required");
                let output = self.native.compress(content, level, ty)?;
                Ok((output, self.native.engine()))
            }
            Strategy::Auto => {
                if !self.native.is_available() {
                    return self.run_fallback(content, level, ty);
                }
                match self.native.compress(content, level, ty) {
                    Ok(output) => Ok((output, self.native.engine())),
                    Err(e) if e.is_backend_failure() => {
                        tracing::warn!(error = %e, %ty, "native compressor failed, using fallback");
                        self.run_fallback(content, level, ty)
                    }
                    Err(e) => Err(e),
                }
            }
        }
    }

    fn run_fallback(&self, content: &str, level: CompressionLevel, ty: ContentType) -> Result<(String, EngineChoice)> {
        tracing::debug!(%ty, %level, "fallback engine selected");
        let output = self.fallback.compress(content, level, ty)?;
        Ok((output, self.fallback.engine()))
    }

    /// Minify at the configured level and gzip when enabled and accepted.
    /// Script bodies are never gzipped.
    pub fn compress_response(
        &self,
        content: &str,
        ty: ContentType,
        accept_encoding: Option<&str>,
    ) -> Result<CompressedResponse> {
        let result = self.compress(content, ty, None)?;
        Ok(self.finish(result, ty, accept_encoding))
    }

    /// Compact JSON body, gzip only.
    pub fn compress_json(
        &self,
        value: &serde_json::Value,
        accept_encoding: Option<&str>,
    ) -> Result<CompressedResponse> {
        let body = serde_json::to_string(value)?;
        Ok(self.finish(passthrough(&body), ContentType::Json, accept_encoding))
    }

    /// Rendered component HTML: extreme level, no gzip, no headers.
    pub fn compress_component(&self, html: &str) -> Result<String> {
        Ok(self.compress(html, ContentType::Html, Some(CompressionLevel::Extreme))?.output)
    }

    fn finish(&self, result: CompressionResult, ty: ContentType, accept_encoding: Option<&str>) -> CompressedResponse {
        let CompressionResult { output, level, engine, mut stats } = result;
        let plain = output.into_bytes();

        let gzip_allowed = matches!(ty, ContentType::Html | ContentType::Css | ContentType::Json);
        let (body, gzipped) = if gzip_allowed && self.config.gzip && gzip::accepts_gzip(accept_encoding) {
            match gzip::gzip(&plain, self.config.gzip_level) {
                Ok(compressed) => (compressed, true),
                Err(e) => {
                    tracing::warn!(error = %e, "gzip failed, sending plain body");
                    (plain, false)
                }
            }
        } else {
            (plain, false)
        };

        stats.body_len = body.len();
        CompressedResponse {
            body,
            content_type: ty,
            level,
            engine,
            gzipped,
            stats,
        }
    }
}

fn passthrough(content: &str) -> CompressionResult {
    CompressionResult {
        output: content.to_string(),
        level: CompressionLevel::None,
        engine: EngineChoice::Disabled,
        stats: CompressionStats {
            original_len: content.len(),
            minified_len: content.len(),
            body_len: content.len(),
        },
    }
}

impl Default for EngineOrchestrator {
    fn default() -> Self {
        Self::new(CompressionConfig::default())
    }
}

impl std::fmt::Debug for EngineOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineOrchestrator")
            .field("config", &self.config)
            .field("native", &self.native.engine())
            .field("fallback", &self.fallback.engine())
            .finish()
    }
}

impl From<CompressionConfig> for EngineOrchestrator {
    fn from(config: CompressionConfig) -> Self {
        Self::new(config)
    }
}
