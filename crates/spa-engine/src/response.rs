//! Compression results and the axum response adapter.

use axum::body::Body;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use spa_core::{CompressionLevel, ContentType, EngineChoice};

use crate::headers::{self, CONTENT_ENCODING, CONTENT_LENGTH, CONTENT_TYPE, ENGINE_HEADER, VARY};

/// Size statistics for one call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompressionStats {
    pub original_len: usize,
    pub minified_len: usize,
    /// Bytes actually sent; equals `minified_len` unless gzipped.
    pub body_len: usize,
}

impl CompressionStats {
    pub fn ratio(&self) -> f64 {
        if self.original_len == 0 {
            return 1.0;
        }
        self.body_len as f64 / self.original_len as f64
    }

    pub fn reduction_pct(&self) -> f64 {
        (1.0 - self.ratio()).max(0.0) * 100.0
    }
}

/// Textual result of [`EngineOrchestrator::compress`](crate::EngineOrchestrator::compress).
#[derive(Debug, Clone)]
pub struct CompressionResult {
    pub output: String,
    /// Concrete level that ran; `None` when compression was disabled.
    pub level: CompressionLevel,
    pub engine: EngineChoice,
    pub stats: CompressionStats,
}

/// A response body ready to send, with the headers that describe it.
#[derive(Debug, Clone)]
pub struct CompressedResponse {
    pub body: Vec<u8>,
    pub content_type: ContentType,
    pub level: CompressionLevel,
    pub engine: EngineChoice,
    pub gzipped: bool,
    pub stats: CompressionStats,
}

impl CompressedResponse {
    /// Headers the caller must apply, in order.
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut out = Vec::with_capacity(5);
        if self.gzipped {
            out.push((CONTENT_ENCODING, "gzip".to_string()));
            out.push((VARY, "Accept-Encoding".to_string()));
        }
        out.push((CONTENT_LENGTH, self.body.len().to_string()));
        out.push((CONTENT_TYPE, format!("{}; charset=UTF-8", self.content_type.mime())));
        out.push((ENGINE_HEADER, self.engine.header_value().to_string()));
        out
    }

    /// Apply [`headers`](Self::headers) to `sink`; no-op outside HTTP or once
    /// headers are committed.
    pub fn apply_headers<S: headers::HeaderSink + ?Sized>(&self, sink: &mut S) -> bool {
        headers::apply_headers(sink, &self.headers())
    }

    /// Plain body as text; `None` when gzipped.
    pub fn text(&self) -> Option<&str> {
        if self.gzipped {
            return None;
        }
        std::str::from_utf8(&self.body).ok()
    }
}

impl IntoResponse for CompressedResponse {
    fn into_response(self) -> Response {
        let mut header_map = HeaderMap::new();
        self.apply_headers(&mut header_map);
        (StatusCode::OK, header_map, Body::from(self.body)).into_response()
    }
}
