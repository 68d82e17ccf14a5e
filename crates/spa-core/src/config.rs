use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CompressError, Result};
use crate::types::{CompressionLevel, Strategy};

pub const ENV_LEVEL: &str = "SPA_COMPRESSION_LEVEL";
pub const ENV_GZIP: &str = "SPA_COMPRESSION_GZIP";
pub const ENV_GZIP_LEVEL: &str = "SPA_GZIP_LEVEL";
pub const ENV_STRATEGY: &str = "SPA_COMPRESSION_STRATEGY";
pub const ENV_NATIVE_LIB: &str = "SPA_COMPRESSOR_LIB";

pub const DEFAULT_GZIP_LEVEL: u32 = 6;

/// Process-wide compression settings.
///
/// Built once at bootstrap and handed to the orchestrator; treated as
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    pub level: CompressionLevel,
    pub gzip: bool,
    pub gzip_level: u32,
    pub strategy: Strategy,
    /// Explicit native library path; takes precedence over the search list.
    pub native_library: Option<PathBuf>,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            level: CompressionLevel::Auto,
            gzip: true,
            gzip_level: DEFAULT_GZIP_LEVEL,
            strategy: Strategy::Auto,
            native_library: None,
        }
    }
}

impl CompressionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything off: level `None`, no gzip, pure engine.
    pub fn disabled() -> Self {
        Self {
            level: CompressionLevel::None,
            gzip: false,
            strategy: Strategy::Fallback,
            ..Self::default()
        }
    }

    pub fn with_level(mut self, level: CompressionLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_gzip(mut self, enabled: bool) -> Self {
        self.gzip = enabled;
        self
    }

    pub fn with_gzip_level(mut self, level: u32) -> Self {
        self.gzip_level = level.min(9);
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_native_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.native_library = Some(path.into());
        self
    }

    /// Read the `SPA_*` environment variables on top of the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(level) = lookup(ENV_LEVEL).filter(|v| !v.trim().is_empty()) {
            config.level = level.parse()?;
        }
        if let Some(gzip) = lookup(ENV_GZIP).filter(|v| !v.trim().is_empty()) {
            config.gzip = parse_flag(&gzip)?;
        }
        if let Some(gzip_level) = lookup(ENV_GZIP_LEVEL).filter(|v| !v.trim().is_empty()) {
            let parsed: u32 = gzip_level.trim().parse().map_err(|_| {
                CompressError::InvalidConfig(format!("gzip level is not a number: {gzip_level}"))
            })?;
            if parsed > 9 {
                return Err(CompressError::InvalidConfig(format!("gzip level out of range: {parsed}")));
            }
            config.gzip_level = parsed;
        }
        if let Some(strategy) = lookup(ENV_STRATEGY) {
            config.strategy = strategy.parse()?;
        }
        if let Some(path) = lookup(ENV_NATIVE_LIB).filter(|v| !v.trim().is_empty()) {
            config.native_library = Some(PathBuf::from(path.trim()));
        }

        tracing::debug!(
            level = %config.level,
            gzip = config.gzip,
            strategy = %config.strategy,
            "compression config loaded"
        );
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| CompressError::InvalidConfig(format!("{}: {e}", path.as_ref().display())))?;
        Ok(serde_json::from_str(&raw)?)
    }
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(CompressError::InvalidConfig(format!("not a boolean flag: {other}"))),
    }
}
