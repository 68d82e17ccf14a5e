use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CompressError;

/// Payload size (bytes) below which `Auto` resolves to `Basic`.
pub const AUTO_BASIC_LIMIT: usize = 1024;
/// Payload size (bytes) below which `Auto` resolves to `Aggressive`.
pub const AUTO_AGGRESSIVE_LIMIT: usize = 10 * 1024;

/// Compression intensity.
///
/// The numeric form (`0..=4`) is what configuration files and environment
/// variables carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CompressionLevel {
    None = 0,
    Auto = 1,
    Basic = 2,
    Aggressive = 3,
    Extreme = 4,
}

impl CompressionLevel {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Auto),
            2 => Some(Self::Basic),
            3 => Some(Self::Aggressive),
            4 => Some(Self::Extreme),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Resolve `Auto` from the payload byte length. Concrete levels pass through.
    pub fn resolve(self, payload_len: usize) -> Self {
        match self {
            Self::Auto => {
                if payload_len < AUTO_BASIC_LIMIT {
                    Self::Basic
                } else if payload_len < AUTO_AGGRESSIVE_LIMIT {
                    Self::Aggressive
                } else {
                    Self::Extreme
                }
            }
            other => other,
        }
    }

    /// Level handed to the native backend, which only knows three intensities.
    pub fn native_level(self) -> i32 {
        match self {
            Self::Aggressive => 2,
            Self::Extreme => 3,
            _ => 1,
        }
    }

    pub fn is_disabled(self) -> bool {
        self == Self::None
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Auto => "auto",
            Self::Basic => "basic",
            Self::Aggressive => "aggressive",
            Self::Extreme => "extreme",
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        Self::Auto
    }
}

impl TryFrom<u8> for CompressionLevel {
    type Error = CompressError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value)
            .ok_or_else(|| CompressError::InvalidConfig(format!("compression level out of range: {value}")))
    }
}

impl From<CompressionLevel> for u8 {
    fn from(level: CompressionLevel) -> Self {
        level.as_u8()
    }
}

impl FromStr for CompressionLevel {
    type Err = CompressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u8>() {
            return Self::try_from(n);
        }
        match s.to_ascii_lowercase().as_str() {
            "none" | "off" | "disabled" => Ok(Self::None),
            "auto" => Ok(Self::Auto),
            "basic" => Ok(Self::Basic),
            "aggressive" => Ok(Self::Aggressive),
            "extreme" => Ok(Self::Extreme),
            other => Err(CompressError::InvalidConfig(format!("unknown compression level: {other}"))),
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind of payload being compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Html,
    Js,
    Css,
    /// Byte-compression only; never minified textually.
    Json,
}

impl ContentType {
    pub fn mime(self) -> &'static str {
        match self {
            Self::Html => "text/html",
            Self::Js => "application/javascript",
            Self::Css => "text/css",
            Self::Json => "application/json",
        }
    }

    /// Code used by the native C ABI.
    pub fn native_code(self) -> i32 {
        match self {
            Self::Html => 0,
            Self::Css => 1,
            Self::Js => 2,
            Self::Json => 3,
        }
    }

    pub fn from_native_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Html),
            1 => Some(Self::Css),
            2 => Some(Self::Js),
            3 => Some(Self::Json),
            _ => None,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Html => "html",
            Self::Js => "js",
            Self::Css => "css",
            Self::Json => "json",
        })
    }
}

/// Engine that actually executed a compression call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineChoice {
    Native,
    Fallback,
    Disabled,
}

impl EngineChoice {
    /// Value of the `X-PhpSPA-Compression-Engine` diagnostic header.
    pub fn header_value(self) -> &'static str {
        match self {
            Self::Native => "native",
            Self::Fallback => "php",
            Self::Disabled => "disabled",
        }
    }
}

impl fmt::Display for EngineChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header_value())
    }
}

/// Operator preference for backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Prefer native, fall back silently on any native failure.
    #[default]
    Auto,
    /// Native only; unavailability or failure is fatal.
    Native,
    /// Pure engine only.
    Fallback,
}

impl FromStr for Strategy {
    type Err = CompressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Ok(Self::Auto),
            "native" => Ok(Self::Native),
            "fallback" | "php" => Ok(Self::Fallback),
            other => Err(CompressError::InvalidConfig(format!("unknown compression strategy: {other}"))),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Native => "native",
            Self::Fallback => "fallback",
        })
    }
}
