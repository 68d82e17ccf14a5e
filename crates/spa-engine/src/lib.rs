//! Compression engine: picks a level and a backend, protects preformatted
//! blocks, and layers gzip on top.
//!
//! Components:
//! 1. Level selection (`Auto` resolved from payload size)
//! 2. Backends: the pure `spa-minify` engine and the native library
//! 3. Native delegate (dynamic C ABI binding, resolved once)
//! 4. Gzip layer with `Accept-Encoding` negotiation
//! 5. Response headers and the axum adapter

pub mod backend;
pub mod gzip;
pub mod headers;
pub mod level;
pub mod native;
pub mod orchestrator;
pub mod response;

pub use backend::{CompressorBackend, FallbackBackend};
pub use headers::{HeaderSink, NoHttpContext, ENGINE_HEADER};
pub use level::LevelSelector;
pub use native::NativeDelegate;
pub use orchestrator::EngineOrchestrator;
pub use response::{CompressedResponse, CompressionResult, CompressionStats};
