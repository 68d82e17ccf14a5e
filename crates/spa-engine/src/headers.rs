//! Response header contract.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

/// Diagnostic header naming the engine that actually ran.
pub const ENGINE_HEADER: &str = "X-PhpSPA-Compression-Engine";
pub const CONTENT_ENCODING: &str = "Content-Encoding";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const VARY: &str = "Vary";

/// Where response headers go.
///
/// Headers are only written in an HTTP context whose headers have not been
/// sent yet; see [`apply_headers`].
pub trait HeaderSink {
    fn is_http(&self) -> bool {
        true
    }

    fn headers_committed(&self) -> bool {
        false
    }

    fn set_header(&mut self, name: &str, value: &str);
}

impl HeaderSink for HeaderMap {
    fn set_header(&mut self, name: &str, value: &str) {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                self.insert(name, value);
            }
            _ => tracing::warn!(name, value, "skipping invalid response header"),
        }
    }
}

/// Command-line context: no headers at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHttpContext;

impl HeaderSink for NoHttpContext {
    fn is_http(&self) -> bool {
        false
    }

    fn set_header(&mut self, _name: &str, _value: &str) {}
}

/// Write `headers` to `sink` if it can still take them. Returns whether they
/// were written.
pub fn apply_headers<S, N, V>(sink: &mut S, headers: &[(N, V)]) -> bool
where
    S: HeaderSink + ?Sized,
    N: AsRef<str>,
    V: AsRef<str>,
{
    if !sink.is_http() || sink.headers_committed() {
        return false;
    }
    for (name, value) in headers {
        sink.set_header(name.as_ref(), value.as_ref());
    }
    true
}
