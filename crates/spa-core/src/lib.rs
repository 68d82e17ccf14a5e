//! Shared types, configuration and errors for the spa-compress engine.

pub mod config;
pub mod error;
pub mod types;

pub use config::CompressionConfig;
pub use error::{CompressError, Result};
pub use types::{CompressionLevel, ContentType, EngineChoice, Strategy};
